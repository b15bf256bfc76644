//! `apizza` with no subcommand: store location and cache dump.

use std::io::Write;

use apizza_vendor::{KeyValueStore, Transport};

use crate::app::App;
use crate::error::Result;

/// Print the nearest store's location, phone and estimated wait.
///
/// # Errors
///
/// Returns an error if the store cannot be located or output fails.
pub fn store_location<T: Transport, W: Write + ?Sized>(app: &mut App<T>, out: &mut W) -> Result<()> {
    let store = app.store()?;
    writeln!(out, "{}", store.address_description)?;
    writeln!(out)?;
    writeln!(out, "Store id: {}", store.id)?;
    writeln!(out, "Phone:    {}", store.phone)?;
    if let Some(wait) = store.wait_for(store.service) {
        writeln!(out, "Wait:     {}-{} minutes ({})", wait.min, wait.max, store.service)?;
    }
    Ok(())
}

/// Print every cache entry as `bucket/key: size`.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn dump_db<T, W: Write + ?Sized>(app: &App<T>, out: &mut W) -> Result<()> {
    writeln!(out, "{}", app.cache.path().display())?;
    for name in app.cache.bucket_names() {
        for (key, value) in app.cache.view(name).map() {
            let label = if name.is_empty() { key } else { format!("{name}/{key}") };
            writeln!(out, "  {label}: {} bytes", value.len())?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use apizza_integration_tests::FakeTransport;
    use apizza_vendor::addresses::save_address;

    use super::*;
    use crate::app::tests::{store_transport, temp_app};

    #[test]
    fn test_store_location() {
        let transport = store_transport();
        let (_dir, mut app) = temp_app(&transport);
        let mut out = Vec::new();
        store_location(&mut app, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1300 L St NW\nWashington, DC 20005\n\nStore id: 4336\nPhone:    202-555-0100\nWait:     25-35 minutes (Delivery)\n"
        );
    }

    #[test]
    fn test_dump_db() {
        let transport = FakeTransport::new();
        let (_dir, mut app) = temp_app(&transport);
        app.cache.put("user_order_dinner", b"{}").unwrap();
        let home = apizza_core::parse_address("1600 Pennsylvania Ave. Washington, DC 20500").unwrap();
        save_address(&mut app.cache, "home", &home).unwrap();

        let mut out = Vec::new();
        dump_db(&app, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("  user_order_dinner: 2 bytes\n"));
        assert!(out.contains("  addresses/home: "));
    }
}
