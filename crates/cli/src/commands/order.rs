//! `apizza order`: place a saved order.

use std::io::Write;

use apizza_vendor::orders::{get_order, order_key, print_orders};
use apizza_vendor::{ClientError, KeyValueStore, Order, Transport};
use clap::Args;
use tracing::info;

use crate::app::App;
use crate::error::{CliError, Result};
use crate::profile::Profile;

#[derive(Debug, Default, Args)]
pub struct OrderArgs {
    /// Saved order to place; lists saved orders when omitted
    pub name: Option<String>,

    /// Card security code
    #[arg(long)]
    pub cvv: Option<String>,

    /// Card number, overriding the one in the config
    #[arg(long)]
    pub number: Option<String>,

    /// Card expiration, overriding the one in the config
    #[arg(long)]
    pub expiration: Option<String>,
}

/// Place the named order with the vendor and record its order ID.
///
/// The card comes from the config file, with any flag taking precedence.
///
/// # Errors
///
/// Returns an error if the order is not saved, the card is invalid or the
/// vendor refuses the order.
pub fn run<T: Transport, W: Write + ?Sized>(app: &mut App<T>, args: &OrderArgs, out: &mut W) -> Result<()> {
    let Some(name) = args.name.as_deref() else {
        print_orders(&app.cache, out, true, "")?;
        return Ok(());
    };

    let cvv = args.cvv.as_deref().unwrap_or_default();
    if cvv.is_empty() {
        return Err(CliError::Usage("no cvv given; use --cvv".to_string()));
    }
    let mut profile = app.profile.clone();
    if let Some(number) = &args.number {
        profile.card.number.clone_from(number);
    }
    if let Some(expiration) = &args.expiration {
        profile.card.expiration.clone_from(expiration);
    }
    let card = profile.card(cvv);

    let mut order = get_order(name, &app.cache)?;
    apply_contact(&mut order, &profile);
    app.client.place_order(&mut order, &card)?;

    let raw = serde_json::to_vec(&order).map_err(ClientError::from)?;
    app.cache.put(&order_key(name), &raw)?;

    let id = order.order_id.as_ref().map(ToString::to_string).unwrap_or_default();
    info!(order = name, order_id = %id, "order placed");
    writeln!(out, "order {name} placed.")?;
    if !id.is_empty() {
        writeln!(out, "order id: {id}")?;
    }
    Ok(())
}

fn apply_contact(order: &mut Order, profile: &Profile) {
    let (first, last) = profile
        .name
        .split_once(' ')
        .unwrap_or((profile.name.as_str(), ""));
    order.first_name = first.trim().to_owned();
    order.last_name = last.trim().to_owned();
    order.email.clone_from(&profile.email);
    order.phone.clone_from(&profile.phone);
}
