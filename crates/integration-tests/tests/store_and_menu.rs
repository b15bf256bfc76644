//! Integration tests for store lookup and the menu cache.

use apizza_core::{ServiceMethod, StoreId, UserAddress};
use apizza_integration_tests::fixtures::{
    self, FAILURE, LOCATOR, MENU, PROFILE, STORE_LOCATOR, STORE_MENU, STORE_PROFILE,
};
use apizza_integration_tests::{FakeClock, FakeTransport, Method};
use apizza_vendor::menu::MenuItem;
use apizza_vendor::{ClientError, Clock, KeyValueStore, Store, VendorClient};
use chrono::TimeDelta;

fn store_transport() -> FakeTransport {
    FakeTransport::new()
        .with(Method::Get, STORE_LOCATOR, LOCATOR)
        .with(Method::Get, STORE_PROFILE, PROFILE)
        .with(Method::Get, STORE_MENU, MENU)
}

// =============================================================================
// Store locator
// =============================================================================

#[test]
fn test_nearest_store_query_parameters() {
    let transport = store_transport();
    let client = VendorClient::new(&transport);

    let store = client
        .nearest_store(&fixtures::white_house(), ServiceMethod::Delivery)
        .unwrap();
    assert_eq!(store.id, StoreId::new("4336"));
    assert_eq!(store.service, ServiceMethod::Delivery);

    let calls = transport.calls();
    let locate = &calls[0];
    assert_eq!(locate.path, STORE_LOCATOR);
    assert_eq!(locate.param("c"), Some("Washington, DC 20500"));
    assert_eq!(locate.param("s"), Some("1600 Pennsylvania Ave."));
    assert_eq!(locate.param("type"), Some("Delivery"));
    assert_eq!(transport.count(Method::Get, STORE_PROFILE), 1);
}

#[test]
fn test_user_address_locates_like_parsed_address() {
    let transport = store_transport();
    let client = VendorClient::new(&transport);
    let user = UserAddress {
        street: "1600 Pennsylvania Ave.".to_string(),
        city_name: "Washington".to_string(),
        region: "DC".to_string(),
        postal_code: "20500".to_string(),
    };

    let store = client.nearest_store(&user, ServiceMethod::Carryout).unwrap();
    assert_eq!(store.user_address.unwrap(), fixtures::white_house());

    let calls = transport.calls();
    let locate = &calls[0];
    assert_eq!(locate.param("c"), Some("Washington, DC 20500"));
    assert_eq!(locate.param("s"), Some("1600 Pennsylvania Ave."));
    assert_eq!(locate.param("type"), Some("Carryout"));
}

#[test]
fn test_locator_failure_is_reported() {
    let transport = FakeTransport::new().with(Method::Get, STORE_LOCATOR, FAILURE);
    let err = VendorClient::new(&transport)
        .nearest_store(&fixtures::white_house(), ServiceMethod::Delivery)
        .unwrap_err();
    assert!(err.to_string().starts_with("Dominos Failure (-1)"));
    assert_eq!(transport.count(Method::Get, STORE_PROFILE), 0);
}

#[test]
fn test_no_online_store_is_not_found() {
    let transport = FakeTransport::new().with(
        Method::Get,
        STORE_LOCATOR,
        r#"{"Status":0,"Stores":[{"StoreID":"9999","IsOnlineNow":false}]}"#,
    );
    let err = VendorClient::new(&transport)
        .nearest_store(&fixtures::white_house(), ServiceMethod::Delivery)
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)), "got {err:?}");
}

// =============================================================================
// Menu cache
// =============================================================================

fn located_store(client: &VendorClient<&FakeTransport, &FakeClock>) -> Store {
    client
        .nearest_store(&fixtures::white_house(), ServiceMethod::Delivery)
        .unwrap()
}

#[test]
fn test_menu_served_from_cache_within_ttl() {
    let (_dir, mut cache) = fixtures::temp_cache();
    let transport = store_transport();
    let clock = FakeClock::default();
    let client = VendorClient::with_clock(&transport, &clock);
    let store = located_store(&client);

    let first = client.menu_for(&mut cache, &store).unwrap();
    assert_eq!(transport.count(Method::Get, STORE_MENU), 1);

    for _ in 0..3 {
        clock.advance(TimeDelta::hours(3));
        let again = client.menu_for(&mut cache, &store).unwrap();
        assert_eq!(again, first);
    }
    assert_eq!(transport.count(Method::Get, STORE_MENU), 1);
}

#[test]
fn test_stale_menu_refetched_exactly_once() {
    let (_dir, mut cache) = fixtures::temp_cache();
    let transport = store_transport();
    let clock = FakeClock::default();
    let client = VendorClient::with_clock(&transport, &clock);
    let store = located_store(&client);

    client.menu_for(&mut cache, &store).unwrap();
    clock.advance(TimeDelta::hours(12) + TimeDelta::minutes(1));

    let refreshed = client.menu_for(&mut cache, &store).unwrap();
    client.menu_for(&mut cache, &store).unwrap();

    assert_eq!(transport.count(Method::Get, STORE_MENU), 2);
    assert_eq!(refreshed.fetched_at, clock.now());
}

#[test]
fn test_menu_contents_and_cache_key() {
    let (_dir, mut cache) = fixtures::temp_cache();
    let transport = store_transport();
    let clock = FakeClock::default();
    let client = VendorClient::with_clock(&transport, &clock);
    let store = located_store(&client);

    let menu = client.menu_for(&mut cache, &store).unwrap();
    match menu.find_item("14SCREEN") {
        Some(MenuItem::Variant(v)) => assert_eq!(v.price.unwrap().to_string(), "15.99"),
        other => panic!("expected variant, got {other:?}"),
    }
    assert!(cache.get("menu_4336").unwrap().is_some());

    assert!(client.clear_menu(&mut cache, &store.id).unwrap());
    client.menu_for(&mut cache, &store).unwrap();
    assert_eq!(transport.count(Method::Get, STORE_MENU), 2);
}

#[test]
fn test_corrupt_cached_menu_is_refetched() {
    let (_dir, mut cache) = fixtures::temp_cache();
    let transport = store_transport();
    let clock = FakeClock::default();
    let client = VendorClient::with_clock(&transport, &clock);
    let store = located_store(&client);

    cache.put("menu_4336", b"not a menu").unwrap();
    client.menu_for(&mut cache, &store).unwrap();
    assert_eq!(transport.count(Method::Get, STORE_MENU), 1);
}
