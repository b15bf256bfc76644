//! `apizza cart`: create, edit, check and delete saved orders.

use std::io::Write;

use apizza_vendor::orders::{delete_order, get_order, list_orders, print_orders, save_order, write_order};
use apizza_vendor::{Amount, ClientError, Order, OrderProduct, Side, Transport};
use clap::Args;

use crate::app::App;
use crate::error::{CliError, Result};

#[derive(Debug, Default, Args)]
pub struct CartArgs {
    /// Order to work on; lists saved orders when omitted
    pub name: Option<String>,

    /// Start a new order at the nearest store
    #[arg(long)]
    pub new: bool,

    /// Product codes to add
    #[arg(short, long, value_name = "CODE", num_args = 1..)]
    pub add: Vec<String>,

    /// Product codes to remove
    #[arg(short, long, value_name = "CODE", num_args = 1..)]
    pub remove: Vec<String>,

    /// Product in the order that --topping applies to
    #[arg(short, long, value_name = "CODE")]
    pub product: Option<String>,

    /// Toppings as CODE[:SIDE[:AMOUNT]], e.g. P:left:1.5
    #[arg(short, long, value_name = "TOPPING", num_args = 1..)]
    pub topping: Vec<String>,

    /// Ask the vendor to validate the order
    #[arg(long)]
    pub validate: bool,

    /// Ask the vendor for the order's price
    #[arg(long)]
    pub price: bool,

    /// Delete the order
    #[arg(short, long)]
    pub delete: bool,

    /// Show order details when listing
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run `apizza cart`.
///
/// Any edit saves the order, which also validates it with the vendor.
///
/// # Errors
///
/// Returns an error if the order cannot be found or saved, an edit is
/// invalid, or the vendor rejects it.
pub fn run<T: Transport, W: Write + ?Sized>(app: &mut App<T>, args: &CartArgs, out: &mut W) -> Result<()> {
    let Some(name) = args.name.as_deref() else {
        print_orders(&app.cache, out, args.verbose, "")?;
        return Ok(());
    };

    if args.delete {
        if !delete_order(name, &mut app.cache)? {
            return Err(ClientError::NotFound(format!("cannot find order {name}")).into());
        }
        writeln!(out, "{name} deleted.")?;
        return Ok(());
    }

    let mut order = if args.new {
        if list_orders(&app.cache).iter().any(|saved| saved == name) {
            return Err(CliError::Usage(format!("order {name} already exists")));
        }
        app.store()?.new_order(name)
    } else {
        get_order(name, &app.cache)?
    };

    let edited = apply_edits(&mut order, args)?;
    if args.new || edited {
        save_order(&app.client, &order, out, &mut app.cache)?;
    }
    if args.validate {
        match app.client.validate_order(&order)? {
            Some(warning) => writeln!(out, "{warning}")?,
            None => writeln!(out, "order is ok.")?,
        }
    }
    if args.price {
        let price = app.client.price_order(&order)?;
        writeln!(out, "Price: {price}")?;
    }
    if !(args.new || edited || args.validate || args.price) {
        write_order(out, &order, "")?;
    }
    Ok(())
}

fn apply_edits(order: &mut Order, args: &CartArgs) -> Result<bool> {
    for code in &args.remove {
        if !order.remove_product(code) {
            return Err(not_in_order(code, order));
        }
    }

    let toppings = args
        .topping
        .iter()
        .map(|t| parse_topping(t))
        .collect::<Result<Vec<_>>>()?;
    if !toppings.is_empty() && args.product.is_none() && args.add.is_empty() {
        return Err(CliError::Usage("--topping needs --product or --add".to_string()));
    }

    for code in &args.add {
        let mut product = OrderProduct::new(code.as_str(), 1);
        if args.product.is_none() {
            for (topping, side, amount) in &toppings {
                product.add_topping(topping.as_str(), *side, *amount);
            }
        }
        order.add_product(product);
    }

    if let Some(code) = &args.product {
        let Some(product) = order.product_mut(code) else {
            return Err(not_in_order(code, order));
        };
        for (topping, side, amount) in &toppings {
            product.add_topping(topping.as_str(), *side, *amount);
        }
    }

    Ok(!(args.remove.is_empty() && args.add.is_empty() && toppings.is_empty()))
}

fn not_in_order(code: &str, order: &Order) -> CliError {
    ClientError::NotFound(format!("cannot find {code} in order {}", order.name())).into()
}

/// Parse `CODE[:SIDE[:AMOUNT]]`. Side defaults to the whole pizza and
/// amount to a normal portion.
fn parse_topping(raw: &str) -> Result<(String, Side, Amount)> {
    let mut parts = raw.split(':');
    let code = parts.next().unwrap_or_default().trim();
    if code.is_empty() {
        return Err(CliError::Usage(format!("topping '{raw}' has no code")));
    }
    let side = parts.next().map_or(Ok(Side::Whole), str::parse::<Side>)?;
    let amount = parts.next().map_or(Ok(Amount::Normal), str::parse::<Amount>)?;
    if parts.next().is_some() {
        return Err(CliError::Usage(format!("use CODE:SIDE:AMOUNT for toppings, got '{raw}'")));
    }
    Ok((code.to_owned(), side, amount))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use apizza_core::Address;
    use apizza_integration_tests::fixtures::{
        OK, PRICE_ORDER, PRICED, STORE_LOCATOR, VALIDATE_ORDER, WARNING,
    };
    use apizza_integration_tests::{FakeTransport, Method};

    use super::*;
    use crate::app::tests::{store_transport, temp_app};

    fn transport() -> FakeTransport {
        store_transport()
            .with(Method::Post, VALIDATE_ORDER, OK)
            .with(Method::Post, PRICE_ORDER, PRICED)
    }

    fn cart(name: &str) -> CartArgs {
        CartArgs {
            name: Some(name.to_string()),
            ..CartArgs::default()
        }
    }

    fn run_cart<T: Transport>(app: &mut App<T>, args: &CartArgs) -> Result<String> {
        let mut out = Vec::new();
        run(app, args, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_topping() {
        assert_eq!(parse_topping("P").unwrap(), ("P".to_string(), Side::Whole, Amount::Normal));
        assert_eq!(parse_topping("P:left:1.5").unwrap(), ("P".to_string(), Side::Left, Amount::Extra));
        assert_eq!(parse_topping("X:2/2").unwrap(), ("X".to_string(), Side::Right, Amount::Normal));
        assert!(matches!(parse_topping(":left"), Err(CliError::Usage(_))));
        assert!(matches!(parse_topping("P:middle"), Err(CliError::Topping(_))));
        assert!(matches!(parse_topping("P:left:3"), Err(CliError::Topping(_))));
        assert!(matches!(parse_topping("P:left:1:x"), Err(CliError::Usage(_))));
    }

    #[test]
    fn test_new_order_with_toppings() {
        let transport = transport();
        let (_dir, mut app) = temp_app(&transport);
        let args = CartArgs {
            new: true,
            add: vec!["14SCREEN".to_string()],
            topping: vec!["P:left:1.5".to_string()],
            ..cart("dinner")
        };

        let out = run_cart(&mut app, &args).unwrap();
        assert_eq!(out, "order successfully updated.\n");
        assert_eq!(transport.count(Method::Get, STORE_LOCATOR), 1);

        let order = get_order("dinner", &app.cache).unwrap();
        assert_eq!(order.store_id.as_str(), "4336");
        assert_eq!(order.address.zip(), "20500");
        assert_eq!(order.products[0].options["P"]["1/2"], "1.5");

        let err = run_cart(&mut app, &CartArgs { new: true, ..cart("dinner") }).unwrap_err();
        assert_eq!(err.to_string(), "order dinner already exists");
    }

    #[test]
    fn test_show_edit_and_delete() {
        let transport = transport();
        let (_dir, mut app) = temp_app(&transport);
        run_cart(&mut app, &CartArgs { new: true, add: vec!["14SCREEN".to_string()], ..cart("dinner") }).unwrap();

        let shown = run_cart(&mut app, &cart("dinner")).unwrap();
        assert!(shown.starts_with("  dinner\n    products:\n      14SCREEN x1\n"));
        assert!(shown.contains("    storeID: 4336\n"));

        let args = CartArgs {
            add: vec!["2LCOKE".to_string()],
            product: Some("14SCREEN".to_string()),
            topping: vec!["X".to_string()],
            ..cart("dinner")
        };
        run_cart(&mut app, &args).unwrap();
        let order = get_order("dinner", &app.cache).unwrap();
        assert_eq!(order.products.len(), 2);
        assert_eq!(order.products[0].options["X"]["1/1"], "1");
        assert!(order.products[1].options.is_empty());

        run_cart(&mut app, &CartArgs { remove: vec!["2LCOKE".to_string()], ..cart("dinner") }).unwrap();
        assert_eq!(get_order("dinner", &app.cache).unwrap().products.len(), 1);
        let err = run_cart(&mut app, &CartArgs { remove: vec!["2LCOKE".to_string()], ..cart("dinner") })
            .unwrap_err();
        assert_eq!(err.to_string(), "cannot find 2LCOKE in order dinner");

        assert_eq!(run_cart(&mut app, &CartArgs { delete: true, ..cart("dinner") }).unwrap(), "dinner deleted.\n");
        assert_eq!(run_cart(&mut app, &CartArgs::default()).unwrap(), "No orders saved.\n");
        let err = run_cart(&mut app, &CartArgs { delete: true, ..cart("dinner") }).unwrap_err();
        assert_eq!(err.to_string(), "cannot find order dinner");
    }

    #[test]
    fn test_topping_needs_a_target() {
        let transport = transport();
        let (_dir, mut app) = temp_app(&transport);
        run_cart(&mut app, &CartArgs { new: true, ..cart("dinner") }).unwrap();
        let err = run_cart(&mut app, &CartArgs { topping: vec!["P".to_string()], ..cart("dinner") })
            .unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn test_validate_and_price() {
        let transport = store_transport()
            .with(Method::Post, VALIDATE_ORDER, OK)
            .with(Method::Post, VALIDATE_ORDER, OK)
            .with(Method::Post, VALIDATE_ORDER, WARNING)
            .with(Method::Post, PRICE_ORDER, PRICED);
        let (_dir, mut app) = temp_app(&transport);
        run_cart(&mut app, &CartArgs { new: true, add: vec!["14SCREEN".to_string()], ..cart("dinner") }).unwrap();

        let out = run_cart(&mut app, &CartArgs { validate: true, price: true, ..cart("dinner") }).unwrap();
        assert_eq!(out, "order is ok.\nPrice: $21.22\n");

        let out = run_cart(&mut app, &CartArgs { validate: true, ..cart("dinner") }).unwrap();
        assert!(out.starts_with("Dominos Warning (1)"));
    }

    #[test]
    fn test_list_orders() {
        let transport = transport();
        let (_dir, mut app) = temp_app(&transport);
        run_cart(&mut app, &CartArgs { new: true, ..cart("lunch") }).unwrap();
        run_cart(&mut app, &CartArgs { new: true, ..cart("dinner") }).unwrap();
        assert_eq!(
            run_cart(&mut app, &CartArgs::default()).unwrap(),
            "Your Orders:\n  dinner\n  lunch\n"
        );
    }
}
