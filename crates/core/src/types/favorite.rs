//! Favorite plants saved by a user.
//!
//! A user's favorites behave as a set keyed by [`PlantId`]: adding a plant that
//! is already present is a no-op, and removing a plant removes every entry for
//! it. [`FavoriteSet`] keeps its entries private so that invariant cannot be
//! broken by callers, and it re-establishes the invariant when deserializing
//! documents written before it existed.

use core::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`PlantId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlantIdError {
    /// The input is empty.
    #[error("plant id cannot be empty")]
    Empty,
    /// The input is neither a string nor a number.
    #[error("plant id must be a string or a number")]
    InvalidType,
}

/// Identifier of a plant in the external catalog.
///
/// Catalog entries use string ids, but clients sometimes send them as JSON
/// numbers; both forms normalize to the same string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PlantId(String);

impl PlantId {
    /// Parse a `PlantId` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`PlantIdError::Empty`] if the input is empty.
    pub fn parse(s: &str) -> Result<Self, PlantIdError> {
        if s.is_empty() {
            return Err(PlantIdError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Build a `PlantId` from a JSON value (string or number).
    ///
    /// # Errors
    ///
    /// Returns [`PlantIdError`] if the value is empty or of another type.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PlantIdError> {
        match value {
            serde_json::Value::String(s) => Self::parse(s),
            serde_json::Value::Number(n) => Ok(Self(n.to_string())),
            _ => Err(PlantIdError::InvalidType),
        }
    }

    /// Returns the plant id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PlantId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

/// Pet safety information copied from the catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Safety {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cats: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dogs: Option<String>,
}

/// A saved reference to a plant catalog entry.
///
/// Everything except the plant id is a denormalized copy of catalog data, kept
/// so the favorites page renders without a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub plant_id: PlantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety: Option<Safety>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Name of the reference collection the plant came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

impl Favorite {
    /// Create a favorite with only its plant id set.
    #[must_use]
    pub const fn new(plant_id: PlantId) -> Self {
        Self {
            plant_id,
            common_name: None,
            scientific_name: None,
            safety: None,
            image: None,
            collection: None,
        }
    }
}

/// Ordered set of favorites, unique by plant id.
///
/// Serializes as a plain JSON array in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet(IndexMap<PlantId, Favorite>);

impl FavoriteSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Add a favorite unless one with the same plant id already exists.
    ///
    /// Returns `true` if the favorite was inserted.
    pub fn insert(&mut self, favorite: Favorite) -> bool {
        match self.0.entry(favorite.plant_id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(favorite);
                true
            }
        }
    }

    /// Remove the favorite with the given plant id, keeping the order of
    /// the rest.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove(&mut self, plant_id: &PlantId) -> bool {
        self.0.shift_remove(plant_id).is_some()
    }

    /// Whether a favorite with this plant id is present.
    #[must_use]
    pub fn contains(&self, plant_id: &PlantId) -> bool {
        self.0.contains_key(plant_id)
    }

    #[must_use]
    pub fn get(&self, plant_id: &PlantId) -> Option<&Favorite> {
        self.0.get(plant_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Favorite> {
        self.0.values()
    }
}

impl FromIterator<Favorite> for FavoriteSet {
    /// Collect favorites, keeping the first entry seen for each plant id.
    fn from_iter<I: IntoIterator<Item = Favorite>>(iter: I) -> Self {
        let mut set = Self::new();
        for favorite in iter {
            set.insert(favorite);
        }
        set
    }
}

impl<'a> IntoIterator for &'a FavoriteSet {
    type Item = &'a Favorite;
    type IntoIter = indexmap::map::Values<'a, PlantId, Favorite>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.values()
    }
}

impl Serialize for FavoriteSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.values())
    }
}

impl<'de> Deserialize<'de> for FavoriteSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let favorites = Vec::<Favorite>::deserialize(deserializer)?;
        Ok(favorites.into_iter().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plant(id: &str) -> PlantId {
        PlantId::parse(id).unwrap()
    }

    #[test]
    fn test_plant_id_empty() {
        assert_eq!(PlantId::parse(""), Err(PlantIdError::Empty));
    }

    #[test]
    fn test_plant_id_accepts_numbers() {
        let id: PlantId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(id.as_str(), "42");
        assert_eq!(id, plant("42"));
    }

    #[test]
    fn test_plant_id_rejects_other_types() {
        assert!(serde_json::from_value::<PlantId>(json!(true)).is_err());
        assert!(serde_json::from_value::<PlantId>(json!(null)).is_err());
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = FavoriteSet::new();
        assert!(set.insert(Favorite::new(plant("rose"))));
        assert!(!set.insert(Favorite::new(plant("rose"))));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_duplicate_insert_keeps_first_entry() {
        let mut set = FavoriteSet::new();
        let mut first = Favorite::new(plant("fern"));
        first.common_name = Some("Boston Fern".to_owned());
        set.insert(first);

        let mut second = Favorite::new(plant("fern"));
        second.common_name = Some("Sword Fern".to_owned());
        set.insert(second);

        let kept = set.get(&plant("fern")).unwrap();
        assert_eq!(kept.common_name.as_deref(), Some("Boston Fern"));
    }

    #[test]
    fn test_remove() {
        let mut set: FavoriteSet = ["a", "b", "c"]
            .into_iter()
            .map(|id| Favorite::new(plant(id)))
            .collect();

        assert!(set.remove(&plant("b")));
        assert!(!set.remove(&plant("b")));
        let ids: Vec<&str> = set.iter().map(|f| f.plant_id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_remove_then_reinsert_goes_to_the_end() {
        let mut set: FavoriteSet = ["a", "b", "c"]
            .into_iter()
            .map(|id| Favorite::new(plant(id)))
            .collect();

        set.remove(&plant("a"));
        set.insert(Favorite::new(plant("a")));
        assert!(set.contains(&plant("a")));
        let ids: Vec<&str> = (&set).into_iter().map(|f| f.plant_id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn test_deserialize_dedupes_legacy_lists() {
        let set: FavoriteSet = serde_json::from_value(json!([
            {"plantId": "1", "commonName": "Aloe"},
            {"plantId": "2"},
            {"plantId": "1", "commonName": "Aloe again"},
        ]))
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(
            set.get(&plant("1")).unwrap().common_name.as_deref(),
            Some("Aloe")
        );
    }

    #[test]
    fn test_serializes_as_camel_case_array() {
        let mut favorite = Favorite::new(plant("7"));
        favorite.scientific_name = Some("Monstera deliciosa".to_owned());
        favorite.safety = Some(Safety {
            cats: Some("toxic".to_owned()),
            dogs: None,
        });
        let set: FavoriteSet = std::iter::once(favorite).collect();

        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            json!([{
                "plantId": "7",
                "scientificName": "Monstera deliciosa",
                "safety": {"cats": "toxic"}
            }])
        );
    }
}
