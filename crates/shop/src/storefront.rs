use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use inkshop_core::{Aggregate, AggregateRoot, DomainError, DomainResult, Money, SessionId};
use inkshop_events::Event;

use crate::catalog::Catalog;
use crate::item::{Item, ItemName};
use crate::selection::Selection;

/// Status text when a purchase finds nothing selected.
pub const NOTHING_SELECTED: &str = "No drawing selected.";

/// Append-only record of every item name bought in a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PurchaseLog {
    entries: Vec<ItemName>,
}

impl PurchaseLog {
    pub fn entries(&self) -> &[ItemName] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|n| n == name)
    }

    fn append<'a>(&mut self, names: impl IntoIterator<Item = &'a ItemName>) {
        self.entries.extend(names.into_iter().cloned());
    }
}

/// Aggregate root: the catalog and purchase history of one shopping session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storefront {
    id: SessionId,
    catalog: Catalog,
    purchase_log: PurchaseLog,
    spent: Money,
    version: u64,
}

impl Storefront {
    /// Open a storefront seeded with `catalog` and an empty purchase log.
    pub fn open(id: SessionId, catalog: Catalog) -> Self {
        Self {
            id,
            catalog,
            purchase_log: PurchaseLog::default(),
            spent: Money::ZERO,
            version: 0,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.id
    }

    /// Current catalog snapshot, in display order.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn purchase_log(&self) -> &PurchaseLog {
        &self.purchase_log
    }

    /// Lifetime spend of the session.
    pub fn spent(&self) -> Money {
        self.spent
    }

    /// Buy every catalog item flagged in `selection`.
    ///
    /// Selected items leave the catalog and their names are appended to the
    /// purchase log, both in catalog order. With nothing selected this is a
    /// no-op that reports [`NOTHING_SELECTED`].
    pub fn purchase(
        &mut self,
        selection: &Selection,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<PurchaseReceipt> {
        let command = StorefrontCommand::Purchase(Purchase {
            selection: selection.clone(),
            occurred_at,
        });
        let events = self.execute(&command)?;

        let outcome = match events.first() {
            Some(StorefrontEvent::ItemsPurchased(e)) => PurchaseOutcome::Purchased {
                items: e.items.iter().map(|item| item.name().clone()).collect(),
                total: e.total,
            },
            None => PurchaseOutcome::NothingSelected,
        };

        Ok(PurchaseReceipt { outcome, events })
    }
}

impl AggregateRoot for Storefront {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: Purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub selection: Selection,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorefrontCommand {
    Purchase(Purchase),
}

/// Event: ItemsPurchased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsPurchased {
    /// Bought items, in the catalog order they had.
    pub items: Vec<Item>,
    pub total: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorefrontEvent {
    ItemsPurchased(ItemsPurchased),
}

impl Event for StorefrontEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StorefrontEvent::ItemsPurchased(_) => "shop.items.purchased",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StorefrontEvent::ItemsPurchased(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Storefront {
    type Command = StorefrontCommand;
    type Event = StorefrontEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            StorefrontEvent::ItemsPurchased(e) => {
                let names: Vec<ItemName> = e.items.iter().map(|i| i.name().clone()).collect();
                self.catalog.remove_all(&names);
                self.purchase_log.append(&names);
                // handle() already rejected totals that would overflow.
                self.spent = Money::from_cents(self.spent.cents().saturating_add(e.total.cents()));
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            StorefrontCommand::Purchase(cmd) => self.handle_purchase(cmd),
        }
    }
}

impl Storefront {
    fn handle_purchase(&self, cmd: &Purchase) -> Result<Vec<StorefrontEvent>, DomainError> {
        let (selected, _remaining) = self.catalog.partition(&cmd.selection);
        if selected.is_empty() {
            return Ok(vec![]);
        }

        let total = Money::try_sum(selected.iter().map(Item::price))?;
        self.spent.checked_add(total)?;

        Ok(vec![StorefrontEvent::ItemsPurchased(ItemsPurchased {
            items: selected,
            total,
            occurred_at: cmd.occurred_at,
        })])
    }
}

/// What a purchase did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PurchaseOutcome {
    NothingSelected,
    Purchased { items: Vec<ItemName>, total: Money },
}

/// Result of [`Storefront::purchase`]: the outcome plus the events applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub outcome: PurchaseOutcome,
    pub events: Vec<StorefrontEvent>,
}

impl PurchaseReceipt {
    pub fn purchased(&self) -> &[ItemName] {
        match &self.outcome {
            PurchaseOutcome::Purchased { items, .. } => items,
            PurchaseOutcome::NothingSelected => &[],
        }
    }

    pub fn total(&self) -> Money {
        match &self.outcome {
            PurchaseOutcome::Purchased { total, .. } => *total,
            PurchaseOutcome::NothingSelected => Money::ZERO,
        }
    }

    /// Human-readable status line, with `currency` prefixed to the total.
    pub fn message(&self, currency: &str) -> String {
        match &self.outcome {
            PurchaseOutcome::NothingSelected => NOTHING_SELECTED.to_string(),
            PurchaseOutcome::Purchased { items, total } => {
                let names: Vec<&str> = items.iter().map(ItemName::as_str).collect();
                format!("You bought: {} for {currency}{total}", names.join(", "))
            }
        }
    }
}
