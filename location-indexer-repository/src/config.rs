//! Index configuration for the location indexer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Mapping from language code to the name of the index holding that language's documents.
///
/// Loaded once at startup and injected wherever an index name has to be resolved. Lookups
/// are case-insensitive on the language code. A language without an entry has no index:
/// there is no fallback to another language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, String>", into = "HashMap<String, String>")]
pub struct IndexOptions {
    indexes: HashMap<String, String>,
}

impl IndexOptions {
    /// Create options from a language → index map.
    ///
    /// # Arguments
    ///
    /// * `indexes` - Language codes mapped to index names
    pub fn new(indexes: HashMap<String, String>) -> Self {
        let indexes = indexes
            .into_iter()
            .map(|(language, index)| (language.to_lowercase(), index))
            .collect();
        Self { indexes }
    }

    /// Add or replace the index for a language.
    ///
    /// # Example
    ///
    /// ```
    /// use location_indexer_repository::IndexOptions;
    ///
    /// let options = IndexOptions::default()
    ///     .with_index("en", "locations-en")
    ///     .with_index("ru", "locations-ru");
    /// assert_eq!(options.index_for("EN"), Some("locations-en"));
    /// assert_eq!(options.index_for("ar"), None);
    /// ```
    pub fn with_index(mut self, language: impl Into<String>, index: impl Into<String>) -> Self {
        self.indexes
            .insert(language.into().to_lowercase(), index.into());
        self
    }

    /// Resolve the index name for a language code.
    pub fn index_for(&self, language: &str) -> Option<&str> {
        self.indexes
            .get(&language.to_lowercase())
            .map(String::as_str)
    }

    /// Configured language codes, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.indexes.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

impl From<HashMap<String, String>> for IndexOptions {
    fn from(indexes: HashMap<String, String>) -> Self {
        Self::new(indexes)
    }
}

impl From<IndexOptions> for HashMap<String, String> {
    fn from(options: IndexOptions) -> Self {
        options.indexes
    }
}
