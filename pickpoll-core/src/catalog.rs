//! Catalog of votable items and the default product set.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised when catalog membership invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog is empty")]
    Empty,
    #[error("item name must not be empty")]
    BlankName,
    #[error("item '{name}' is missing an image reference")]
    BlankImage { name: String },
    #[error("duplicate item name '{name}'")]
    DuplicateName { name: String },
}

/// A single votable item with its lifetime counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    pub image_ref: String,
    #[serde(default)]
    pub times_shown: u32,
    #[serde(default)]
    pub clicks: u32,
}

impl Item {
    /// Create an item with zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or image reference is blank.
    pub fn new(name: impl Into<String>, image_ref: impl Into<String>) -> Result<Self, CatalogError> {
        let item = Self {
            name: name.into(),
            image_ref: image_ref.into(),
            times_shown: 0,
            clicks: 0,
        };
        item.validate()?;
        Ok(item)
    }

    /// Stable identity used for click attribution.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::BlankName);
        }
        if self.image_ref.trim().is_empty() {
            return Err(CatalogError::BlankImage {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

// Product names shipped with the stock catalog; image is `./img/<name>.<ext>`.
const DEFAULT_PRODUCTS: [(&str, &str); 19] = [
    ("bag", "jpg"),
    ("banana", "jpg"),
    ("bathroom", "jpg"),
    ("boots", "jpg"),
    ("breakfast", "jpg"),
    ("bubblegum", "jpg"),
    ("chair", "jpg"),
    ("cthulhu", "jpg"),
    ("dog-duck", "jpg"),
    ("dragon", "jpg"),
    ("pen", "jpg"),
    ("pet-sweep", "jpg"),
    ("scissors", "jpg"),
    ("shark", "jpg"),
    ("sweep", "png"),
    ("tauntaun", "jpg"),
    ("unicorn", "jpg"),
    ("water-can", "jpg"),
    ("wine-glass", "jpg"),
];

/// Ordered, membership-stable list of items.
///
/// Deserialization goes through [`Catalog::new`], so a decoded catalog always
/// satisfies the same invariants as a constructed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Item>", into = "Vec<Item>")]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Build a catalog from items, rejecting blanks and duplicate names.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or any item is invalid.
    pub fn new(items: Vec<Item>) -> Result<Self, CatalogError> {
        if items.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            item.validate()?;
            if !seen.insert(item.name.as_str()) {
                return Err(CatalogError::DuplicateName {
                    name: item.name.clone(),
                });
            }
        }
        Ok(Self { items })
    }

    /// The stock 19-product catalog with zeroed counters.
    #[must_use]
    pub fn default_products() -> Self {
        let items = DEFAULT_PRODUCTS
            .iter()
            .map(|(name, ext)| Item {
                name: (*name).to_string(),
                image_ref: format!("./img/{name}.{ext}"),
                times_shown: 0,
                clicks: 0,
            })
            .collect();
        Self { items }
    }

    /// Load a catalog from a JSON array of `{ name, imageRef }` objects.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a valid catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Item> {
        self.items.get_mut(index)
    }

    /// Index of the item with the given identity.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

impl TryFrom<Vec<Item>> for Catalog {
    type Error = CatalogError;

    fn try_from(items: Vec<Item>) -> Result<Self, Self::Error> {
        Self::new(items)
    }
}

impl From<Catalog> for Vec<Item> {
    fn from(catalog: Catalog) -> Self {
        catalog.items
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_nineteen_unique_products() {
        let catalog = Catalog::default_products();
        assert_eq!(catalog.len(), 19);
        assert!(Catalog::new(catalog.items().to_vec()).is_ok());
        assert_eq!(catalog.get(0).map(Item::id), Some("bag"));
        let sweep = catalog.position("sweep").and_then(|i| catalog.get(i)).unwrap();
        assert_eq!(sweep.image_ref, "./img/sweep.png");
        assert!(catalog.iter().all(|item| item.clicks == 0 && item.times_shown == 0));
    }

    #[test]
    fn catalog_from_json_defaults_counters() {
        let json = r#"[
            {"name": "bag", "imageRef": "./img/bag.jpg"},
            {"name": "pen", "imageRef": "./img/pen.jpg", "clicks": 3}
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().times_shown, 0);
        assert_eq!(catalog.get(1).unwrap().clicks, 3);
    }

    #[test]
    fn catalog_rejects_duplicates_and_blanks() {
        let dup = vec![
            Item::new("bag", "a.jpg").unwrap(),
            Item::new("bag", "b.jpg").unwrap(),
        ];
        assert_eq!(
            Catalog::new(dup),
            Err(CatalogError::DuplicateName {
                name: "bag".to_string()
            })
        );
        assert_eq!(Catalog::new(Vec::new()), Err(CatalogError::Empty));
        assert_eq!(Item::new("  ", "a.jpg"), Err(CatalogError::BlankName));
        assert!(matches!(
            Item::new("bag", ""),
            Err(CatalogError::BlankImage { .. })
        ));
        assert!(Catalog::from_json("[]").is_err());
        assert!(Catalog::from_json(r#"[{"name": "bag"}]"#).is_err());
    }
}
