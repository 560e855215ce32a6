//! Vendor registry and menu catalog
//!
//! In-memory reference data: the four campus stalls and their menus. The
//! registry answers vendor lookups, the catalog owns menu edits (vendor
//! ownership enforced here), and `resolve_cart_line` is the single path
//! from a menu item to a priced cart line.

use dashmap::DashMap;
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::menu::{MenuItem, MenuItemStatus, SizePrices};
use shared::order::{CartLine, OrderLine, PortionSize, Reservation};
use shared::util::generate_line_id;
use shared::vendor::Vendor;

use crate::orders::money;

/// Partial menu item edit; absent fields keep their current value
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub prices: Option<SizePrices>,
    pub status: Option<MenuItemStatus>,
    pub allergens: Option<Vec<String>>,
}

/// Vendor and menu reference data, shared across handlers
#[derive(Debug, Default)]
pub struct Catalog {
    vendors: DashMap<String, Vendor>,
    items: DashMap<String, MenuItem>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            vendors: DashMap::new(),
            items: DashMap::new(),
        }
    }

    // ------------------------------------------------------------------
    // Vendors
    // ------------------------------------------------------------------

    /// Register a vendor. `AlreadyExists` if the id is taken.
    pub fn register_vendor(&self, vendor: Vendor) -> AppResult<Vendor> {
        match self.vendors.entry(vendor.vendor_id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(AppError::with_message(
                ErrorCode::AlreadyExists,
                format!("Vendor {} is already registered", vendor.vendor_id),
            )),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(vendor.clone());
                Ok(vendor)
            }
        }
    }

    /// Look up a vendor by id
    pub fn vendor(&self, vendor_id: &str) -> AppResult<Vendor> {
        self.vendors
            .get(vendor_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::VendorNotFound,
                    format!("No vendor with id {}", vendor_id),
                )
            })
    }

    /// All vendors, ordered by id
    pub fn list_vendors(&self) -> Vec<Vendor> {
        let mut vendors: Vec<Vendor> = self.vendors.iter().map(|e| e.clone()).collect();
        vendors.sort_by(|a, b| a.vendor_id.cmp(&b.vendor_id));
        vendors
    }

    pub fn vendor_count(&self) -> usize {
        self.vendors.len()
    }

    // ------------------------------------------------------------------
    // Menu items
    // ------------------------------------------------------------------

    /// Create a menu item under the acting vendor's stall.
    ///
    /// The item must target the vendor's own stall (`MenuItemNotOwned`),
    /// reference a registered vendor, carry at least one priced size, and
    /// use an id that is not already taken.
    pub fn create_item(&self, owner_vendor_id: &str, item: MenuItem) -> AppResult<MenuItem> {
        if item.vendor_id != owner_vendor_id {
            return Err(AppError::with_message(
                ErrorCode::MenuItemNotOwned,
                "Menu items can only be created under your own stall",
            ));
        }
        self.vendor(&item.vendor_id)?;
        validate_prices(&item.prices)?;

        match self.items.entry(item.item_id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(AppError::with_message(
                ErrorCode::AlreadyExists,
                format!("Menu item {} already exists", item.item_id),
            )),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                tracing::info!(item_id = %item.item_id, vendor_id = %item.vendor_id, "Menu item created");
                slot.insert(item.clone());
                Ok(item)
            }
        }
    }

    /// Apply a partial edit to an item owned by the acting vendor
    pub fn update_item(
        &self,
        owner_vendor_id: &str,
        item_id: &str,
        update: MenuItemUpdate,
    ) -> AppResult<MenuItem> {
        let mut entry = self.items.get_mut(item_id).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::MenuItemNotFound,
                format!("No menu item with id {}", item_id),
            )
        })?;
        if entry.vendor_id != owner_vendor_id {
            return Err(AppError::new(ErrorCode::MenuItemNotOwned));
        }

        if let Some(prices) = &update.prices {
            validate_prices(prices)?;
        }
        if let Some(name) = update.name {
            entry.name = name;
        }
        if let Some(description) = update.description {
            entry.description = description;
        }
        if let Some(category) = update.category {
            entry.category = category;
        }
        if let Some(prices) = update.prices {
            entry.prices = prices;
        }
        if let Some(status) = update.status {
            entry.status = status;
        }
        if let Some(allergens) = update.allergens {
            entry.allergens = allergens;
        }
        Ok(entry.clone())
    }

    /// Remove an item owned by the acting vendor
    pub fn delete_item(&self, owner_vendor_id: &str, item_id: &str) -> AppResult<MenuItem> {
        let owned = {
            let entry = self.items.get(item_id).ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::MenuItemNotFound,
                    format!("No menu item with id {}", item_id),
                )
            })?;
            entry.vendor_id == owner_vendor_id
        };
        if !owned {
            return Err(AppError::new(ErrorCode::MenuItemNotOwned));
        }
        self.items
            .remove(item_id)
            .map(|(_, item)| item)
            .ok_or_else(|| AppError::new(ErrorCode::MenuItemNotFound))
    }

    /// Move an item to a new availability status. Any move is legal, the
    /// kitchen flips items between statuses through the day.
    pub fn set_item_status(
        &self,
        owner_vendor_id: &str,
        item_id: &str,
        status: MenuItemStatus,
    ) -> AppResult<MenuItem> {
        let mut entry = self.items.get_mut(item_id).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::MenuItemNotFound,
                format!("No menu item with id {}", item_id),
            )
        })?;
        if entry.vendor_id != owner_vendor_id {
            return Err(AppError::new(ErrorCode::MenuItemNotOwned));
        }
        entry.status = status;
        Ok(entry.clone())
    }

    /// Look up a menu item by id
    pub fn item(&self, item_id: &str) -> AppResult<MenuItem> {
        self.items
            .get(item_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::MenuItemNotFound,
                    format!("No menu item with id {}", item_id),
                )
            })
    }

    /// One vendor's menu, ordered by item id
    pub fn list_items(&self, vendor_id: &str) -> AppResult<Vec<MenuItem>> {
        self.vendor(vendor_id)?;
        let mut items: Vec<MenuItem> = self
            .items
            .iter()
            .filter(|e| e.vendor_id == vendor_id)
            .map(|e| e.clone())
            .collect();
        items.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        Ok(items)
    }

    /// Every item across all stalls, ordered by vendor then item id
    pub fn list_all_items(&self) -> Vec<MenuItem> {
        let mut items: Vec<MenuItem> = self.items.iter().map(|e| e.clone()).collect();
        items.sort_by(|a, b| {
            a.vendor_id
                .cmp(&b.vendor_id)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        items
    }

    // ------------------------------------------------------------------
    // Cart line resolution
    // ------------------------------------------------------------------

    /// Resolve a menu selection into a priced cart line.
    ///
    /// Price and display names are fixed here; later menu edits do not
    /// touch lines already in a cart.
    pub fn resolve_cart_line(
        &self,
        item_id: &str,
        size: PortionSize,
        quantity: u32,
        reservation: Option<Reservation>,
    ) -> AppResult<CartLine> {
        let item = self.item(item_id)?;
        let vendor = self.vendor(&item.vendor_id)?;
        if !vendor.is_active {
            return Err(AppError::with_message(
                ErrorCode::VendorInactive,
                format!("{} is not accepting orders right now", vendor.name),
            ));
        }
        if !item.status.is_orderable() {
            return Err(AppError::with_message(
                ErrorCode::MenuItemUnavailable,
                format!("{} is currently {:?}", item.name, item.status),
            ));
        }
        let unit_price = item.prices.for_size(size).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::MenuSizeUnavailable,
                format!("{} is not offered in {:?}", item.name, size),
            )
        })?;
        money::validate_quantity(quantity)?;

        Ok(CartLine {
            line_id: generate_line_id(),
            item_id: item.item_id,
            vendor_id: vendor.vendor_id,
            vendor_name: vendor.name,
            item_name: item.name,
            size,
            unit_price,
            quantity,
            reservation,
        })
    }

    /// Bump `order_count` once per placed order line.
    ///
    /// Items deleted between cart add and checkout are skipped; the order
    /// itself is already priced and placed.
    pub fn record_order_lines(&self, lines: &[OrderLine]) {
        for line in lines {
            if let Some(mut item) = self.items.get_mut(&line.item_id) {
                item.order_count += 1;
            }
        }
    }

    // ------------------------------------------------------------------
    // Demo seed
    // ------------------------------------------------------------------

    /// Load the demo dataset: four stalls and their menus.
    pub fn seed_demo(&self) {
        for vendor in demo_vendors() {
            self.vendors.insert(vendor.vendor_id.clone(), vendor);
        }
        for item in demo_menu_items() {
            self.items.insert(item.item_id.clone(), item);
        }
        tracing::info!(
            vendors = self.vendors.len(),
            items = self.items.len(),
            "Demo catalog seeded"
        );
    }
}

fn validate_prices(prices: &SizePrices) -> AppResult<()> {
    if !prices.any() {
        return Err(AppError::with_message(
            ErrorCode::MenuPriceInvalid,
            "At least one size must be priced",
        ));
    }
    for price in [prices.small, prices.medium, prices.large].into_iter().flatten() {
        money::validate_price(price)?;
    }
    Ok(())
}

fn demo_vendors() -> Vec<Vendor> {
    vec![
        Vendor {
            vendor_id: "vendor_1".to_string(),
            name: "North Indian Delights".to_string(),
            cuisine: "North Indian, Vegetarian".to_string(),
            rating: 4.5,
            hours: "11:00 AM - 3:00 PM, 6:00 PM - 9:00 PM".to_string(),
            is_popup: false,
            is_active: true,
        },
        Vendor {
            vendor_id: "vendor_2".to_string(),
            name: "South Indian Express".to_string(),
            cuisine: "South Indian, Vegetarian".to_string(),
            rating: 4.2,
            hours: "11:00 AM - 3:00 PM".to_string(),
            is_popup: false,
            is_active: true,
        },
        Vendor {
            vendor_id: "vendor_3".to_string(),
            name: "Grill Master".to_string(),
            cuisine: "Grilled, Non-Vegetarian".to_string(),
            rating: 4.7,
            hours: "12:00 PM - 3:00 PM".to_string(),
            is_popup: false,
            is_active: true,
        },
        Vendor {
            vendor_id: "vendor_4".to_string(),
            name: "Happy Bites Pop-up".to_string(),
            cuisine: "Continental".to_string(),
            rating: 4.0,
            hours: "11:30 AM - 2:30 PM".to_string(),
            is_popup: true,
            is_active: true,
        },
    ]
}

fn demo_menu_items() -> Vec<MenuItem> {
    fn item(
        item_id: &str,
        vendor_id: &str,
        name: &str,
        description: &str,
        prices: (f64, f64, f64),
        status: MenuItemStatus,
        order_count: u64,
        allergens: &[&str],
    ) -> MenuItem {
        MenuItem {
            item_id: item_id.to_string(),
            vendor_id: vendor_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: String::new(),
            prices: SizePrices {
                small: Some(prices.0),
                medium: Some(prices.1),
                large: Some(prices.2),
            },
            status,
            order_count,
            allergens: allergens.iter().map(|a| a.to_string()).collect(),
        }
    }

    vec![
        item(
            "item_1_1",
            "vendor_1",
            "Butter Chicken",
            "Creamy tomato-based curry",
            (200.0, 250.0, 300.0),
            MenuItemStatus::Ready,
            45,
            &["dairy"],
        ),
        item(
            "item_1_2",
            "vendor_1",
            "Dal Makhani",
            "Slow-cooked lentils",
            (150.0, 180.0, 220.0),
            MenuItemStatus::Ready,
            38,
            &["dairy"],
        ),
        item(
            "item_1_3",
            "vendor_1",
            "Paneer Tikka Masala",
            "Grilled cottage cheese",
            (180.0, 220.0, 280.0),
            MenuItemStatus::Preparing,
            3,
            &["dairy"],
        ),
        item(
            "item_2_1",
            "vendor_2",
            "Masala Dosa",
            "Crispy rice crepe",
            (100.0, 120.0, 150.0),
            MenuItemStatus::Ready,
            52,
            &[],
        ),
        item(
            "item_2_2",
            "vendor_2",
            "Idli with Sambar",
            "Steamed rice cakes",
            (60.0, 80.0, 100.0),
            MenuItemStatus::Ready,
            2,
            &[],
        ),
        item(
            "item_3_1",
            "vendor_3",
            "Tandoori Chicken",
            "Smoky grilled chicken",
            (200.0, 280.0, 350.0),
            MenuItemStatus::Ready,
            40,
            &[],
        ),
        item(
            "item_4_1",
            "vendor_4",
            "Margherita Pizza",
            "Classic cheese pizza",
            (120.0, 150.0, 200.0),
            MenuItemStatus::Ready,
            25,
            &["dairy"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Catalog {
        let catalog = Catalog::new();
        catalog.seed_demo();
        catalog
    }

    fn custom_item(item_id: &str, vendor_id: &str) -> MenuItem {
        MenuItem {
            item_id: item_id.to_string(),
            vendor_id: vendor_id.to_string(),
            name: "Test Dish".to_string(),
            description: String::new(),
            category: String::new(),
            prices: SizePrices {
                small: None,
                medium: Some(99.0),
                large: None,
            },
            status: MenuItemStatus::Ready,
            order_count: 0,
            allergens: vec![],
        }
    }

    #[test]
    fn test_seed_demo_counts() {
        let catalog = seeded();
        assert_eq!(catalog.vendor_count(), 4);
        assert_eq!(catalog.list_all_items().len(), 7);
    }

    #[test]
    fn test_vendor_lookup() {
        let catalog = seeded();
        let vendor = catalog.vendor("vendor_3").unwrap();
        assert_eq!(vendor.name, "Grill Master");
        assert_eq!(vendor.rating, 4.7);

        let err = catalog.vendor("vendor_99").unwrap_err();
        assert_eq!(err.code, ErrorCode::VendorNotFound);
    }

    #[test]
    fn test_list_vendors_sorted() {
        let catalog = seeded();
        let ids: Vec<String> = catalog
            .list_vendors()
            .into_iter()
            .map(|v| v.vendor_id)
            .collect();
        assert_eq!(ids, vec!["vendor_1", "vendor_2", "vendor_3", "vendor_4"]);
    }

    #[test]
    fn test_popup_flag_seeded() {
        let catalog = seeded();
        assert!(catalog.vendor("vendor_4").unwrap().is_popup);
        assert!(!catalog.vendor("vendor_1").unwrap().is_popup);
    }

    #[test]
    fn test_resolve_cart_line_happy_path() {
        let catalog = seeded();
        let line = catalog
            .resolve_cart_line("item_2_1", PortionSize::Medium, 2, None)
            .unwrap();
        assert_eq!(line.unit_price, 120.0);
        assert_eq!(line.vendor_id, "vendor_2");
        assert_eq!(line.vendor_name, "South Indian Express");
        assert_eq!(line.item_name, "Masala Dosa");
        assert_eq!(line.quantity, 2);
        assert!(line.line_id.starts_with("line_"));
    }

    #[test]
    fn test_resolve_unknown_item() {
        let catalog = seeded();
        let err = catalog
            .resolve_cart_line("item_nope", PortionSize::Medium, 1, None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemNotFound);
    }

    #[test]
    fn test_resolve_sold_out_item() {
        let catalog = seeded();
        catalog
            .set_item_status("vendor_2", "item_2_1", MenuItemStatus::SoldOut)
            .unwrap();
        let err = catalog
            .resolve_cart_line("item_2_1", PortionSize::Medium, 1, None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemUnavailable);
    }

    #[test]
    fn test_resolve_preparing_item_is_orderable() {
        let catalog = seeded();
        // item_1_3 seeds as Preparing; batch-cooked items still take orders
        let line = catalog
            .resolve_cart_line("item_1_3", PortionSize::Small, 1, None)
            .unwrap();
        assert_eq!(line.unit_price, 180.0);
    }

    #[test]
    fn test_resolve_missing_size() {
        let catalog = seeded();
        catalog.create_item("vendor_1", custom_item("item_solo", "vendor_1")).unwrap();
        let err = catalog
            .resolve_cart_line("item_solo", PortionSize::Large, 1, None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuSizeUnavailable);
    }

    #[test]
    fn test_resolve_inactive_vendor() {
        let catalog = seeded();
        catalog
            .register_vendor(Vendor {
                vendor_id: "vendor_closed".to_string(),
                name: "Closed Stall".to_string(),
                cuisine: String::new(),
                rating: 0.0,
                hours: String::new(),
                is_popup: false,
                is_active: false,
            })
            .unwrap();
        catalog
            .create_item("vendor_closed", custom_item("item_closed", "vendor_closed"))
            .unwrap();

        let err = catalog
            .resolve_cart_line("item_closed", PortionSize::Medium, 1, None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VendorInactive);
    }

    #[test]
    fn test_resolve_quantity_bounds() {
        let catalog = seeded();
        let err = catalog
            .resolve_cart_line("item_2_1", PortionSize::Medium, 0, None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::QuantityOutOfRange);

        let err = catalog
            .resolve_cart_line("item_2_1", PortionSize::Medium, 100, None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::QuantityOutOfRange);
    }

    #[test]
    fn test_create_item_duplicate() {
        let catalog = seeded();
        let err = catalog
            .create_item("vendor_1", custom_item("item_1_1", "vendor_1"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
    }

    #[test]
    fn test_create_item_not_owned() {
        let catalog = seeded();
        let err = catalog
            .create_item("vendor_2", custom_item("item_x", "vendor_1"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemNotOwned);
    }

    #[test]
    fn test_create_item_unpriced() {
        let catalog = seeded();
        let mut item = custom_item("item_x", "vendor_1");
        item.prices = SizePrices::default();
        let err = catalog.create_item("vendor_1", item).unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuPriceInvalid);
    }

    #[test]
    fn test_create_item_negative_price() {
        let catalog = seeded();
        let mut item = custom_item("item_x", "vendor_1");
        item.prices.medium = Some(-5.0);
        let err = catalog.create_item("vendor_1", item).unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuPriceInvalid);
    }

    #[test]
    fn test_update_item() {
        let catalog = seeded();
        let updated = catalog
            .update_item(
                "vendor_2",
                "item_2_2",
                MenuItemUpdate {
                    name: Some("Idli Sambar Combo".to_string()),
                    prices: Some(SizePrices {
                        small: Some(70.0),
                        medium: Some(90.0),
                        large: None,
                    }),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Idli Sambar Combo");
        assert_eq!(updated.prices.for_size(PortionSize::Medium), Some(90.0));
        // Untouched fields survive
        assert_eq!(updated.description, "Steamed rice cakes");
    }

    #[test]
    fn test_update_item_not_owned() {
        let catalog = seeded();
        let err = catalog
            .update_item("vendor_1", "item_2_2", MenuItemUpdate::default())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemNotOwned);
    }

    #[test]
    fn test_update_item_bad_prices_rejected() {
        let catalog = seeded();
        let err = catalog
            .update_item(
                "vendor_2",
                "item_2_2",
                MenuItemUpdate {
                    prices: Some(SizePrices::default()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuPriceInvalid);
        // Original prices untouched after the rejected edit
        let item = catalog.item("item_2_2").unwrap();
        assert_eq!(item.prices.for_size(PortionSize::Medium), Some(80.0));
    }

    #[test]
    fn test_delete_item() {
        let catalog = seeded();
        catalog.delete_item("vendor_4", "item_4_1").unwrap();
        let err = catalog.item("item_4_1").unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemNotFound);
    }

    #[test]
    fn test_delete_item_not_owned() {
        let catalog = seeded();
        let err = catalog.delete_item("vendor_1", "item_4_1").unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemNotOwned);
        assert!(catalog.item("item_4_1").is_ok());
    }

    #[test]
    fn test_status_moves_freely() {
        let catalog = seeded();
        for status in [
            MenuItemStatus::SoldOut,
            MenuItemStatus::Scheduled,
            MenuItemStatus::Ready,
            MenuItemStatus::Preparing,
        ] {
            let item = catalog
                .set_item_status("vendor_3", "item_3_1", status)
                .unwrap();
            assert_eq!(item.status, status);
        }
    }

    #[test]
    fn test_record_order_lines_bumps_counts() {
        let catalog = seeded();
        let before = catalog.item("item_2_1").unwrap().order_count;
        let line = OrderLine {
            item_id: "item_2_1".to_string(),
            vendor_id: "vendor_2".to_string(),
            vendor_name: "South Indian Express".to_string(),
            item_name: "Masala Dosa".to_string(),
            size: PortionSize::Medium,
            unit_price: 120.0,
            quantity: 3,
        };
        catalog.record_order_lines(std::slice::from_ref(&line));
        // One bump per line, independent of quantity
        assert_eq!(catalog.item("item_2_1").unwrap().order_count, before + 1);

        // Lines for deleted items are skipped
        let mut ghost = line;
        ghost.item_id = "item_gone".to_string();
        catalog.record_order_lines(std::slice::from_ref(&ghost));
    }

    #[test]
    fn test_list_items_per_vendor() {
        let catalog = seeded();
        let items = catalog.list_items("vendor_1").unwrap();
        let ids: Vec<String> = items.into_iter().map(|i| i.item_id).collect();
        assert_eq!(ids, vec!["item_1_1", "item_1_2", "item_1_3"]);

        let err = catalog.list_items("vendor_99").unwrap_err();
        assert_eq!(err.code, ErrorCode::VendorNotFound);
    }

    #[test]
    fn test_register_vendor_duplicate() {
        let catalog = seeded();
        let err = catalog
            .register_vendor(catalog.vendor("vendor_1").unwrap())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
    }
}
