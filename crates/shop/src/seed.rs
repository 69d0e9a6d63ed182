//! Catalog seeding.

use inkshop_core::{DomainError, DomainResult};

use crate::catalog::Catalog;
use crate::item::Item;

/// The drawings every new session starts with, as `(name, price)`.
pub const DEFAULT_ITEMS: [(&str, &str); 5] = [
    ("Space Cat", "10.00"),
    ("Blue Dragon", "12.50"),
    ("Pixel Unicorn", "8.00"),
    ("Retro Robot", "15.00"),
    ("Magic Forest", "9.99"),
];

pub fn default_catalog() -> DomainResult<Catalog> {
    let items = DEFAULT_ITEMS
        .iter()
        .map(|(name, price)| Item::parse(name, price))
        .collect::<DomainResult<Vec<_>>>()?;
    Catalog::new(items)
}

/// Parse a catalog written as `name=price` entries separated by `;`.
///
/// Example: `"Space Cat=10.00; Blue Dragon=12.50"`. Empty entries are skipped.
pub fn parse_catalog(raw: &str) -> DomainResult<Catalog> {
    let mut items = Vec::new();
    for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, price) = entry.rsplit_once('=').ok_or_else(|| {
            DomainError::validation(format!("catalog entry must be name=price: {entry:?}"))
        })?;
        items.push(Item::parse(name, price)?);
    }
    Catalog::new(items)
}
