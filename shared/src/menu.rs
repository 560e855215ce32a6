//! Menu item model

use crate::order::PortionSize;
use serde::{Deserialize, Serialize};

/// Kitchen-facing availability of a menu item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuItemStatus {
    /// Available for immediate ordering
    #[default]
    Ready,
    /// Being cooked in batches, orders accepted
    Preparing,
    /// Announced for a later service window, not orderable yet
    Scheduled,
    /// Out of stock for the day
    SoldOut,
}

impl MenuItemStatus {
    /// Whether the item can be added to a cart right now
    pub const fn is_orderable(&self) -> bool {
        matches!(self, Self::Ready | Self::Preparing)
    }
}

/// Per-size price table. A size with no entry is not offered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SizePrices {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large: Option<f64>,
}

impl SizePrices {
    /// Price for the given size, if offered
    pub fn for_size(&self, size: PortionSize) -> Option<f64> {
        match size {
            PortionSize::Small => self.small,
            PortionSize::Medium => self.medium,
            PortionSize::Large => self.large,
        }
    }

    /// Whether at least one size is offered
    pub fn any(&self) -> bool {
        self.small.is_some() || self.medium.is_some() || self.large.is_some()
    }
}

/// A dish offered by a vendor.
///
/// The menu card's headline price is the medium tier; [`MenuItem::base_price`]
/// resolves it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    /// Item ID
    pub item_id: String,
    /// Owning vendor ID
    pub vendor_id: String,
    /// Display name
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Menu section (e.g. "Mains", "Snacks")
    #[serde(default)]
    pub category: String,
    /// Prices by portion size
    pub prices: SizePrices,
    /// Availability status
    #[serde(default)]
    pub status: MenuItemStatus,
    /// Times this item appeared in a placed order line
    #[serde(default)]
    pub order_count: u64,
    /// Declared allergens
    #[serde(default)]
    pub allergens: Vec<String>,
}

impl MenuItem {
    /// Headline price: the medium tier when offered, else the first
    /// offered size.
    pub fn base_price(&self) -> Option<f64> {
        self.prices
            .medium
            .or(self.prices.small)
            .or(self.prices.large)
    }
}
