//! Names of the independently persisted collections.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A top-level collection stored under its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Products,
    Categories,
    Tables,
    Invoices,
    Customers,
    ActiveOrder,
    TakeawayCart,
    Settings,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Products,
        Collection::Categories,
        Collection::Tables,
        Collection::Invoices,
        Collection::Customers,
        Collection::ActiveOrder,
        Collection::TakeawayCart,
        Collection::Settings,
    ];

    /// Storage key.
    pub const fn key(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Categories => "categories",
            Collection::Tables => "tables",
            Collection::Invoices => "invoices",
            Collection::Customers => "customers",
            Collection::ActiveOrder => "active_order",
            Collection::TakeawayCart => "takeaway_cart",
            Collection::Settings => "settings",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
