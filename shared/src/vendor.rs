//! Vendor (stall) model

use serde::{Deserialize, Serialize};

/// A food stall operating in the court
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vendor {
    /// Vendor ID
    pub vendor_id: String,
    /// Display name
    pub name: String,
    /// Cuisine line (e.g. "North Indian")
    #[serde(default)]
    pub cuisine: String,
    /// Average customer rating, 0.0 to 5.0
    #[serde(default)]
    pub rating: f64,
    /// Operating hours, free-form (e.g. "10:00-22:00")
    #[serde(default)]
    pub hours: String,
    /// Short-term stall without a fixed lease
    #[serde(default)]
    pub is_popup: bool,
    /// Whether the stall is currently accepting orders
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{ "vendor_id": "vendor_4", "name": "Happy Bites" }"#;
        let vendor: Vendor = serde_json::from_str(json).unwrap();
        assert_eq!(vendor.vendor_id, "vendor_4");
        assert!(vendor.is_active);
        assert!(!vendor.is_popup);
        assert_eq!(vendor.rating, 0.0);
    }

    #[test]
    fn test_roundtrip() {
        let vendor = Vendor {
            vendor_id: "vendor_3".to_string(),
            name: "Grill Master".to_string(),
            cuisine: "Barbecue".to_string(),
            rating: 4.7,
            hours: "11:00-23:00".to_string(),
            is_popup: false,
            is_active: true,
        };
        let json = serde_json::to_string(&vendor).unwrap();
        let parsed: Vendor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vendor);
    }
}
