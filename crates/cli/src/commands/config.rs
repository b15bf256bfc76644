//! `apizza config`: inspect and edit `config.json`.

use std::io::Write;

use clap::{Args, Subcommand};
use tracing::debug;

use crate::app::App;
use crate::config::ConfigError;
use crate::error::Result;

/// A value of `-` clears the field.
const EMPTY_VALUE: &str = "-";

#[derive(Debug, Default, Args)]
pub struct ConfigArgs {
    /// Print the path of the config file
    #[arg(short, long)]
    pub file: bool,

    /// Print the config directory
    #[arg(short, long)]
    pub dir: bool,

    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the values of config fields
    Get {
        #[arg(value_name = "KEY")]
        keys: Vec<String>,
    },
    /// Set config fields with KEY=VALUE; use KEY=- to clear a field
    Set {
        #[arg(value_name = "KEY=VALUE")]
        assignments: Vec<String>,
    },
}

/// Run `apizza config`. With no flags or action, print every field.
///
/// # Errors
///
/// Returns an error for an unknown key, a malformed assignment or when the
/// config file cannot be written.
pub fn run<T, W: Write + ?Sized>(app: &mut App<T>, args: &ConfigArgs, out: &mut W) -> Result<()> {
    if args.file {
        writeln!(out, "{}", app.settings().config_file().display())?;
    }
    if args.dir {
        writeln!(out, "{}", app.settings().config_dir.display())?;
    }

    match &args.action {
        Some(ConfigAction::Get { keys }) => {
            if keys.is_empty() {
                return Err(ConfigError::NoVariable.into());
            }
            for key in keys {
                writeln!(out, "{}", app.profile.get(key)?)?;
            }
        }
        Some(ConfigAction::Set { assignments }) => {
            if assignments.is_empty() {
                return Err(ConfigError::NoVariable.into());
            }
            for assignment in assignments {
                let (key, value) = parse_assignment(assignment)?;
                app.profile.set(key, value)?;
                debug!(key, "config field set");
            }
            app.save_profile()?;
        }
        None if !(args.file || args.dir) => app.profile.write_all(out)?,
        None => {}
    }
    Ok(())
}

fn parse_assignment(raw: &str) -> std::result::Result<(&str, &str), ConfigError> {
    let (key, value) = raw.split_once('=').ok_or(ConfigError::BadAssignment)?;
    if key.is_empty() || value.is_empty() {
        return Err(ConfigError::BadAssignment);
    }
    Ok((key, if value == EMPTY_VALUE { "" } else { value }))
}
