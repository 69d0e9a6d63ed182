use std::collections::HashSet;

use serde::Serialize;

use inkshop_core::{DomainError, DomainResult};

use crate::item::{Item, ItemName};
use crate::selection::Selection;

/// Items currently for sale, in display order. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> DomainResult<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.name().as_str()) {
                return Err(DomainError::validation(format!(
                    "duplicate item name in catalog: {}",
                    item.name()
                )));
            }
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Split into `(selected, remaining)`, both in catalog order.
    pub fn partition(&self, selection: &Selection) -> (Vec<Item>, Vec<Item>) {
        self.items
            .iter()
            .cloned()
            .partition(|item| selection.is_selected(item.name().as_str()))
    }

    /// Drop every item whose name is in `names`; the rest keep their order.
    pub(crate) fn remove_all(&mut self, names: &[ItemName]) {
        let gone: HashSet<&ItemName> = names.iter().collect();
        self.items.retain(|item| !gone.contains(item.name()));
    }
}
