//! Catalog domain types.
//!
//! [`Catalog`] is also the on-disk document shape: `{"items": [...]}`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::ItemId;

/// A single catalog entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    /// Content-addressed image key, present iff an image was attached.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_string_as_none"
    )]
    pub image_name: Option<String>,
}

impl Item {
    /// Whether `keyword` occurs in the name or category (case-sensitive).
    pub fn matches(&self, keyword: &str) -> bool {
        self.name.contains(keyword) || self.category.contains(keyword)
    }
}

/// The full ordered item list. Insertion order is append order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Catalog {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<Item>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First item with the given id, in insertion order.
    pub fn find(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// Items matching `keyword`, in insertion order.
    pub fn search(&self, keyword: &str) -> Vec<Item> {
        self.items
            .iter()
            .filter(|item| item.matches(keyword))
            .cloned()
            .collect()
    }

    /// Returns the id of the first item whose id was already seen.
    pub fn first_duplicate_id(&self) -> Option<&ItemId> {
        let mut seen = std::collections::HashSet::with_capacity(self.items.len());
        self.items
            .iter()
            .map(|item| &item.id)
            .find(|id| !seen.insert(*id))
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Item>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Item>>::deserialize(deserializer)?.unwrap_or_default())
}
