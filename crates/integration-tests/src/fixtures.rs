//! Canned vendor payloads and local state for tests.

use apizza_core::{ServiceMethod, StoreId, StreetAddr, parse_address};
use apizza_vendor::{CacheStore, Order, OrderProduct};
use chrono::{DateTime, Utc};
use tempfile::TempDir;

pub const STORE_LOCATOR: &str = "/power/store-locator";
pub const STORE_PROFILE: &str = "/power/store/4336/profile";
pub const STORE_MENU: &str = "/power/store/4336/menu";
pub const VALIDATE_ORDER: &str = "/power/validate-order";
pub const PRICE_ORDER: &str = "/power/price-order";
pub const PLACE_ORDER: &str = "/power/place-order";

pub const LOCATOR: &str = r#"{
    "Status": 0,
    "Granularity": "Exact",
    "Stores": [
        {"StoreID": "9999", "IsOnlineNow": false, "ServiceIsOpen": {"Delivery": true, "Carryout": true}},
        {"StoreID": "4336", "IsOnlineNow": true, "ServiceIsOpen": {"Delivery": true, "Carryout": true}}
    ]
}"#;

pub const PROFILE: &str = r#"{
    "Status": 0,
    "StoreID": "4336",
    "Phone": "202-555-0100",
    "AddressDescription": "1300 L St NW\nWashington, DC 20005",
    "IsOpen": true,
    "IsOnlineNow": true,
    "IsDeliveryStore": true,
    "ServiceIsOpen": {"Delivery": true, "Carryout": true},
    "ServiceEstimatedWaitMinutes": {"Delivery": {"Min": 25, "Max": 35}, "Carryout": {"Min": 10, "Max": 15}}
}"#;

pub const MENU: &str = r#"{
    "Products": {
        "S_PIZZA": {"Code": "S_PIZZA", "Name": "Pizza", "ProductType": "Pizza", "Variants": ["14SCREEN"]},
        "F_2LCOKE": {"Code": "F_2LCOKE", "Name": "Coke", "ProductType": "Drinks", "Variants": ["2LCOKE"]}
    },
    "Variants": {
        "14SCREEN": {"Code": "14SCREEN", "Name": "Large (14\") Hand Tossed Pizza", "ProductCode": "S_PIZZA", "Price": "15.99"},
        "2LCOKE": {"Code": "2LCOKE", "Name": "2-Liter Coke", "ProductCode": "F_2LCOKE", "Price": "3.49"}
    },
    "Toppings": {
        "Pizza": {"P": {"Code": "P", "Name": "Pepperoni"}, "X": {"Code": "X", "Name": "Robust Inspired Tomato Sauce"}}
    }
}"#;

pub const OK: &str = r#"{"Status": 0, "Order": {"Status": 0, "StatusItems": []}}"#;

pub const WARNING: &str = r#"{
    "Status": 1,
    "Order": {"Status": 1, "StatusItems": [{"Code": "PriceInformationRemoved", "Message": "prices may change"}]}
}"#;

pub const FAILURE: &str = r#"{
    "Status": -1,
    "StatusItems": [{"Code": "Failure", "Message": "test msg"}],
    "Order": {"Status": -1, "StatusItems": [
        {"Code": "Failure", "Message": "test order msg"},
        {"Code": "SomeOtherCode"},
        {"PulseCode": 1, "PulseText": "this isn't the real error format"}
    ]}
}"#;

pub const PRICED: &str = r#"{"Status": 0, "Order": {"Amounts": {"Menu": 19.48, "Customer": 21.22}}}"#;

pub const PLACED: &str = r#"{"Status": 0, "Order": {"OrderID": "Xy3aB_9", "Amounts": {"Customer": 21.22}}}"#;

/// A fixed instant tests start their clocks at.
#[must_use]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
pub fn epoch() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-02-14T18:00:00Z").unwrap().to_utc()
}

#[must_use]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
pub fn white_house() -> StreetAddr {
    parse_address("1600 Pennsylvania Ave. Washington, DC 20500").unwrap()
}

/// A delivery order for store 4336 with one pizza.
#[must_use]
pub fn dinner() -> Order {
    let mut order = Order::new("dinner", StoreId::new("4336"), ServiceMethod::Delivery);
    order.address = white_house();
    order.add_product(OrderProduct::new("14SCREEN", 1));
    order
}

/// A cache in a temporary directory that lives as long as the `TempDir`.
#[must_use]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
pub fn temp_cache() -> (TempDir, CacheStore) {
    let dir = TempDir::new().unwrap();
    let cache = CacheStore::open(dir.path().join("cache").join("apizza.db")).unwrap();
    (dir, cache)
}
