//! apizza - order Domino's pizza from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Where is the nearest store?
//! apizza -L
//!
//! # Browse the menu
//! apizza menu
//! apizza menu 14SCREEN
//!
//! # Build an order, then place it
//! apizza cart dinner --new --add 14SCREEN --topping P:left
//! apizza cart dinner --price
//! apizza order dinner --cvv 123
//!
//! # Edit the config file
//! apizza config set name="Joe Smith" address.zipcode=20500
//! ```
//!
//! # Commands
//!
//! - `menu` - Show the nearest store's menu
//! - `cart` - Create, edit, validate and price saved orders
//! - `order` - Place a saved order
//! - `address` - Manage the address book
//! - `config` - Show or edit `config.json`
//!
//! Settings come from the environment; see [`config`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use apizza_core::ServiceMethod;
use apizza_vendor::HttpTransport;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::app::{App, Selection};
use crate::commands::address::AddressArgs;
use crate::commands::cart::CartArgs;
use crate::commands::config::ConfigArgs;
use crate::commands::order::OrderArgs;
use crate::config::Settings;
use crate::error::{CliError, Result};

mod app;
mod commands;
mod config;
mod error;
mod profile;

#[derive(Parser)]
#[command(name = "apizza")]
#[command(author, version, about = "Order Domino's pizza from the command line")]
struct Cli {
    /// Saved address to use instead of the config's default
    #[arg(short = 'A', long, global = true, value_name = "NAME")]
    address: Option<String>,

    /// Delivery or Carryout
    #[arg(long, global = true)]
    service: Option<ServiceMethod>,

    /// Log to a file; relative paths go in the config's logs directory
    #[arg(long, global = true, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Delete the cached menu first
    #[arg(long)]
    delete_menu: bool,

    /// Print the nearest store's location
    #[arg(short = 'L', long)]
    store_location: bool,

    #[arg(long, hide = true)]
    dump_db: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the nearest store's menu
    Menu {
        /// Product, variant or topping codes to describe
        #[arg(value_name = "CODE")]
        codes: Vec<String>,

        /// List pizza toppings
        #[arg(short, long)]
        toppings: bool,

        /// Delete the cached menu and fetch it again
        #[arg(long)]
        delete_menu: bool,
    },
    /// Create, edit, validate and price saved orders
    Cart(CartArgs),
    /// Place a saved order
    Order(OrderArgs),
    /// Manage saved addresses
    Address(AddressArgs),
    /// Show or edit the config file
    Config(ConfigArgs),
}

impl Cli {
    /// Only the root command and `menu` read the menu, so only they drop it.
    fn deletes_menu(&self) -> bool {
        match &self.command {
            None => self.delete_menu,
            Some(Commands::Menu { delete_menu, .. }) => self.delete_menu || *delete_menu,
            Some(_) => false,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = Settings::from_env()
        .map_err(CliError::from)
        .and_then(|settings| {
            init_tracing(&settings, cli.log.as_deref())?;
            run(cli, settings)
        });

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        report(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[allow(clippy::print_stderr)]
fn report(err: &CliError) {
    eprintln!("Error: {err}");
}

/// Send `tracing` output to stderr, or append it to `log` when given.
fn init_tracing(settings: &Settings, log: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let Some(log) = log else {
        builder.with_writer(io::stderr).init();
        return Ok(());
    };

    let path = if log.is_relative() {
        settings.log_dir().join(log)
    } else {
        log.to_path_buf()
    };
    let open = || -> io::Result<fs::File> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        OpenOptions::new().create(true).append(true).open(&path)
    };
    let file = open().map_err(|source| CliError::LogFile {
        path: path.clone(),
        source,
    })?;
    builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    Ok(())
}

fn run(cli: Cli, settings: Settings) -> Result<()> {
    let transport = HttpTransport::new(&settings.vendor_url, settings.timeout)?;
    let selection = Selection {
        address: cli.address.clone(),
        service: cli.service,
    };
    let mut app = App::open(settings, transport, selection)?;
    let mut out = io::stdout().lock();

    if cli.deletes_menu() {
        if app.delete_menu()? {
            info!("deleted cached menu");
        }
    } else if cli.delete_menu {
        debug!("--delete-menu ignored by this command");
    }

    match cli.command {
        Some(Commands::Menu { codes, toppings, .. }) => commands::menu::run(&mut app, &codes, toppings, &mut out)?,
        Some(Commands::Cart(args)) => commands::cart::run(&mut app, &args, &mut out)?,
        Some(Commands::Order(args)) => commands::order::run(&mut app, &args, &mut out)?,
        Some(Commands::Address(args)) => commands::address::run(&mut app, &args, &mut out)?,
        Some(Commands::Config(args)) => commands::config::run(&mut app, &args, &mut out)?,
        None => {
            if cli.dump_db {
                commands::root::dump_db(&app, &mut out)?;
            }
            if cli.store_location {
                commands::root::store_location(&mut app, &mut out)?;
            }
            if !(cli.dump_db || cli.store_location || cli.delete_menu) {
                Cli::command().write_help(&mut out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
