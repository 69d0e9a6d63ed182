use serde::{Deserialize, Serialize};

use inkshop_core::{DomainError, DomainResult, Entity, Money};

/// Item name: unique within a catalog and used as the selection key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Surrounding whitespace is dropped; an empty name is rejected.
    pub fn new(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ItemName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemName> for String {
    fn from(value: ItemName) -> Self {
        value.0
    }
}

impl PartialEq<str> for ItemName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ItemName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A drawing for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    name: ItemName,
    price: Money,
}

impl Item {
    pub fn new(name: ItemName, price: Money) -> Self {
        Self { name, price }
    }

    /// Build an item from raw text, e.g. `Item::parse("Blue Dragon", "12.50")`.
    pub fn parse(name: &str, price: &str) -> DomainResult<Self> {
        Ok(Self::new(ItemName::new(name)?, price.parse()?))
    }

    pub fn name(&self) -> &ItemName {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }
}

impl Entity for Item {
    type Id = ItemName;

    fn id(&self) -> &Self::Id {
        &self.name
    }
}
