//! `apizza menu`: browse the nearest store's menu.

use std::collections::BTreeMap;
use std::io::Write;

use apizza_vendor::menu::{Menu, MenuItem, Product};
use apizza_vendor::{ClientError, Transport};

use crate::app::App;
use crate::error::Result;

/// List the menu, or describe the items named by `codes`.
///
/// With `toppings` set, list the pizza toppings instead.
///
/// # Errors
///
/// Returns an error if the menu cannot be loaded, a code is not on it, or
/// output fails.
pub fn run<T: Transport, W: Write + ?Sized>(
    app: &mut App<T>,
    codes: &[String],
    toppings: bool,
    out: &mut W,
) -> Result<()> {
    let menu = app.menu()?;
    if toppings {
        return write_toppings(&menu, out);
    }
    if codes.is_empty() {
        return write_catalog(&menu, out);
    }
    for code in codes {
        let item = menu
            .find_item(code)
            .ok_or_else(|| ClientError::NotFound(format!("cannot find {code} on the menu")))?;
        write_item(&menu, &item, out)?;
    }
    Ok(())
}

fn write_catalog<W: Write + ?Sized>(menu: &Menu, out: &mut W) -> Result<()> {
    let mut by_type: BTreeMap<&str, Vec<&Product>> = BTreeMap::new();
    for product in menu.products() {
        by_type.entry(product.product_type.as_str()).or_default().push(product);
    }

    for (product_type, products) in by_type {
        let heading = if product_type.is_empty() { "Other" } else { product_type };
        writeln!(out, "{heading}")?;
        for product in products {
            writeln!(out, "  {}", product.name)?;
            for variant in menu.variants_of(product) {
                write!(out, "    {:<12} {}", variant.code, variant.name)?;
                match variant.price {
                    Some(price) => writeln!(out, " ${price}")?,
                    None => writeln!(out)?,
                }
            }
        }
    }
    Ok(())
}

fn write_toppings<W: Write + ?Sized>(menu: &Menu, out: &mut W) -> Result<()> {
    writeln!(out, "Toppings")?;
    for topping in menu.toppings_for("Pizza") {
        writeln!(out, "  {:<4} {}", topping.code, topping.name)?;
    }
    Ok(())
}

fn write_item<W: Write + ?Sized>(menu: &Menu, item: &MenuItem<'_>, out: &mut W) -> Result<()> {
    writeln!(out, "{}", item.name())?;
    match item {
        MenuItem::Product(product) => {
            writeln!(out, "  Code: {}", product.code)?;
            writeln!(out, "  Type: {}", product.product_type)?;
            if !product.description.is_empty() {
                writeln!(out, "  {}", product.description)?;
            }
            let variants: Vec<&str> = menu.variants_of(product).map(|v| v.code.as_str()).collect();
            writeln!(out, "  Variants: {}", variants.join(", "))?;
        }
        MenuItem::Variant(variant) => {
            writeln!(out, "  Code:    {}", variant.code)?;
            writeln!(out, "  Product: {}", variant.product_code)?;
            if let Some(price) = variant.price {
                writeln!(out, "  Price:   ${price}")?;
            }
        }
        MenuItem::Topping(topping) => {
            writeln!(out, "  Code: {}", topping.code)?;
            if !topping.description.is_empty() {
                writeln!(out, "  {}", topping.description)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use apizza_integration_tests::Method;
    use apizza_integration_tests::fixtures::STORE_MENU;

    use super::*;
    use crate::app::tests::{store_transport, temp_app};

    fn menu_output(codes: &[&str], toppings: bool) -> Result<String> {
        let transport = store_transport();
        let (_dir, mut app) = temp_app(&transport);
        let codes: Vec<String> = codes.iter().map(ToString::to_string).collect();
        let mut out = Vec::new();
        run(&mut app, &codes, toppings, &mut out)?;
        assert_eq!(transport.count(Method::Get, STORE_MENU), 1);
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_catalog_grouped_by_type() {
        let out = menu_output(&[], false).unwrap();
        assert_eq!(
            out,
            "Drinks\n  Coke\n    2LCOKE       2-Liter Coke $3.49\n\
             Pizza\n  Pizza\n    14SCREEN     Large (14\") Hand Tossed Pizza $15.99\n"
        );
    }

    #[test]
    fn test_describe_items() {
        let out = menu_output(&["14SCREEN", "P"], false).unwrap();
        assert!(out.starts_with("Large (14\") Hand Tossed Pizza\n  Code:    14SCREEN\n"));
        assert!(out.contains("  Price:   $15.99\n"));
        assert!(out.contains("Pepperoni\n  Code: P\n"));
    }

    #[test]
    fn test_unknown_code() {
        let err = menu_output(&["NOPE"], false).unwrap_err();
        assert_eq!(err.to_string(), "cannot find NOPE on the menu");
    }

    #[test]
    fn test_toppings() {
        let out = menu_output(&[], true).unwrap();
        assert!(out.starts_with("Toppings\n  P    Pepperoni\n"));
        assert!(out.contains("  X    Robust Inspired Tomato Sauce\n"));
    }
}
