//! Illustration shop domain module.
//!
//! Catalog, selection and purchase rules, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage). One [`Storefront`] exists per
//! shopping session.

pub mod catalog;
pub mod item;
pub mod seed;
pub mod selection;
pub mod storefront;

pub use catalog::Catalog;
pub use item::{Item, ItemName};
pub use seed::{default_catalog, parse_catalog};
pub use selection::Selection;
pub use storefront::{
    ItemsPurchased, NOTHING_SELECTED, Purchase, PurchaseLog, PurchaseOutcome, PurchaseReceipt,
    Storefront, StorefrontCommand, StorefrontEvent,
};
