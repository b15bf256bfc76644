//! `apizza address`: the address book.

use std::io::Write;

use apizza_core::{Address, parse_address};
use apizza_vendor::ClientError;
use apizza_vendor::addresses::{delete_address, list_addresses, save_address};
use clap::Args;

use crate::app::App;
use crate::error::Result;

#[derive(Debug, Default, Args)]
pub struct AddressArgs {
    /// Save an address, e.g. --new home "1600 Pennsylvania Ave. Washington, DC 20500"
    #[arg(long, num_args = 2, value_names = ["NAME", "ADDRESS"])]
    pub new: Vec<String>,

    /// Delete a saved address
    #[arg(short, long, value_name = "NAME")]
    pub delete: Option<String>,
}

/// Save, delete or list named addresses.
///
/// # Errors
///
/// Returns an error if a new address does not parse, a deleted one is not
/// saved, or the cache cannot be written.
pub fn run<T, W: Write + ?Sized>(app: &mut App<T>, args: &AddressArgs, out: &mut W) -> Result<()> {
    if let [name, raw] = args.new.as_slice() {
        let addr = parse_address(raw)?;
        save_address(&mut app.cache, name, &addr)?;
        writeln!(out, "saved address {name}.")?;
        return Ok(());
    }

    if let Some(name) = &args.delete {
        if !delete_address(&mut app.cache, name)? {
            return Err(ClientError::NotFound(format!("cannot find address {name}")).into());
        }
        writeln!(out, "deleted address {name}.")?;
        return Ok(());
    }

    let book = list_addresses(&app.cache)?;
    if book.is_empty() {
        writeln!(out, "No addresses saved.")?;
        return Ok(());
    }
    for (name, addr) in book {
        writeln!(out, "{name}:")?;
        writeln!(out, "    {}", addr.line_one())?;
        writeln!(out, "    {}", addr.locality())?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use apizza_integration_tests::FakeTransport;

    use super::*;
    use crate::app::tests::temp_app;
    use crate::error::CliError;

    fn run_address<T>(app: &mut App<T>, args: &AddressArgs) -> Result<String> {
        let mut out = Vec::new();
        run(app, args, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn new(name: &str, raw: &str) -> AddressArgs {
        AddressArgs {
            new: vec![name.to_string(), raw.to_string()],
            ..AddressArgs::default()
        }
    }

    #[test]
    fn test_save_list_delete() {
        let transport = FakeTransport::new();
        let (_dir, mut app) = temp_app(&transport);
        assert_eq!(run_address(&mut app, &AddressArgs::default()).unwrap(), "No addresses saved.\n");

        let out = run_address(&mut app, &new("home", "1600 Pennsylvania Ave. Washington, DC 20500")).unwrap();
        assert_eq!(out, "saved address home.\n");
        run_address(&mut app, &new("work", "1300 L St NW Washington, DC 20005")).unwrap();

        assert_eq!(
            run_address(&mut app, &AddressArgs::default()).unwrap(),
            "home:\n    1600 Pennsylvania Ave.\n    Washington, DC 20500\n\
             work:\n    1300 L St NW\n    Washington, DC 20005\n"
        );

        let delete = AddressArgs {
            delete: Some("work".to_string()),
            ..AddressArgs::default()
        };
        assert_eq!(run_address(&mut app, &delete).unwrap(), "deleted address work.\n");
        let err = run_address(&mut app, &delete).unwrap_err();
        assert_eq!(err.to_string(), "cannot find address work");
    }

    #[test]
    fn test_unparseable_address() {
        let transport = FakeTransport::new();
        let (_dir, mut app) = temp_app(&transport);
        let err = run_address(&mut app, &new("nowhere", "somewhere")).unwrap_err();
        assert!(matches!(err, CliError::Address(_)), "got {err:?}");
    }
}
