//! Source location records.
//!
//! This module defines the record shape returned by the mapper service, one page at a time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Kind of a location as reported by the mapper.
///
/// `Unknown` only exists to decode values the mapper may add in the future. It is never
/// requested as a page filter and is not part of [`LocationType::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationType {
    Country,
    Locality,
    Accommodation,
    Unknown,
}

impl LocationType {
    /// Every location type the mapper can be asked for, in upload order.
    pub const ALL: [LocationType; 3] = [
        LocationType::Country,
        LocationType::Locality,
        LocationType::Accommodation,
    ];

    /// Case-insensitive lookup. Anything unrecognised maps to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "country" => LocationType::Country,
            "locality" => LocationType::Locality,
            "accommodation" => LocationType::Accommodation,
            _ => LocationType::Unknown,
        }
    }

    /// Lower-cased name, as stored in the search document and sent to the mapper.
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Country => "country",
            LocationType::Locality => "locality",
            LocationType::Accommodation => "accommodation",
            LocationType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl Serialize for LocationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LocationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from_name(raw.as_deref().unwrap_or_default()))
    }
}

/// Decode `null` as the field's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Latitude/longitude pair as sent by the mapper.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A location record fetched from the mapper.
///
/// String fields the mapper omits or sends as `null` decode as empty strings, so the
/// document builder can treat "absent" and "empty" the same way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Globally unique id, stable across re-uploads. Used as the document id.
    pub ht_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub locality: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_in_meters: Option<f64>,
    pub location_type: LocationType,
    /// Free-form sub-category, e.g. "Hotel" or "City".
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
}

impl Location {
    /// Create a location with empty optional fields.
    ///
    /// # Example
    ///
    /// ```
    /// use location_indexer_shared::{Location, LocationType};
    ///
    /// let location = Location::new("HTL-1", LocationType::Accommodation)
    ///     .with_name("Grand Hotel")
    ///     .with_locality("Dubai")
    ///     .with_country("United Arab Emirates");
    /// assert_eq!(location.name, "Grand Hotel");
    /// ```
    pub fn new(ht_id: impl Into<String>, location_type: LocationType) -> Self {
        Self {
            ht_id: ht_id.into(),
            name: String::new(),
            locality: String::new(),
            country: String::new(),
            country_code: String::new(),
            coordinates: Coordinates::default(),
            distance_in_meters: None,
            location_type,
            kind: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_locality(mut self, locality: impl Into<String>) -> Self {
        self.locality = locality.into();
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = country_code.into();
        self
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = Coordinates::new(latitude, longitude);
        self
    }
}
