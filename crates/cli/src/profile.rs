//! The user's `config.json`: contact details, default address, card and
//! preferred service.
//!
//! Fields are reachable by dotted, case-insensitive names (`name`,
//! `address.cityName`, `card.number`, ...) through a fixed table of getters
//! and setters, which also drives the `apizza config` listing.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::LazyLock;

use apizza_core::{Address, Card, ServiceMethod};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(alias = "Phone")]
    pub phone: String,
    #[serde(alias = "Address")]
    pub address: ProfileAddress,
    #[serde(rename = "default-address-name", alias = "DefaultAddressName")]
    pub default_address_name: String,
    #[serde(alias = "Card")]
    pub card: ProfileCard,
    #[serde(alias = "Service")]
    pub service: ServiceMethod,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileAddress {
    #[serde(alias = "Street")]
    pub street: String,
    #[serde(rename = "cityName", alias = "CityName")]
    pub city_name: String,
    #[serde(alias = "State")]
    pub state: String,
    #[serde(alias = "Zipcode")]
    pub zipcode: String,
}

impl ProfileAddress {
    /// Whether enough is filled in to locate a store.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !(self.street.is_empty() || self.city_name.is_empty() || self.zipcode.is_empty())
    }
}

impl Address for ProfileAddress {
    fn line_one(&self) -> &str {
        self.street.trim()
    }

    fn city(&self) -> &str {
        &self.city_name
    }

    fn state_code(&self) -> &str {
        &self.state
    }

    fn zip(&self) -> &str {
        &self.zipcode
    }
}

/// Saved card details. The security code is never stored.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileCard {
    #[serde(alias = "Number")]
    pub number: String,
    #[serde(alias = "Expiration")]
    pub expiration: String,
}

impl std::fmt::Debug for ProfileCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileCard")
            .field("number", &"[REDACTED]")
            .field("expiration", &self.expiration)
            .finish()
    }
}

struct Field {
    get: fn(&Profile) -> String,
    set: fn(&mut Profile, &str) -> Result<(), ConfigError>,
}

macro_rules! text_field {
    ($($path:ident).+) => {
        Field {
            get: |p| p.$($path).+.clone(),
            set: |p, v| {
                p.$($path).+ = v.to_owned();
                Ok(())
            },
        }
    };
}

/// Every settable field, in listing order.
static FIELDS: [(&str, Field); 11] = [
    ("name", text_field!(name)),
    ("email", text_field!(email)),
    ("phone", text_field!(phone)),
    ("address.street", text_field!(address.street)),
    ("address.cityname", text_field!(address.city_name)),
    ("address.state", text_field!(address.state)),
    ("address.zipcode", text_field!(address.zipcode)),
    ("default-address-name", text_field!(default_address_name)),
    ("card.number", text_field!(card.number)),
    ("card.expiration", text_field!(card.expiration)),
    (
        "service",
        Field {
            get: |p| p.service.to_string(),
            set: |p, v| {
                p.service = v.parse().map_err(|e: apizza_core::ServiceMethodError| {
                    ConfigError::InvalidValue {
                        key: "service".to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(())
            },
        },
    ),
];

static INDEX: LazyLock<HashMap<&'static str, &'static Field>> =
    LazyLock::new(|| FIELDS.iter().map(|(key, field)| (*key, field)).collect());

impl Profile {
    /// Read the profile at `path`, writing a default one if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, written or parsed.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        match fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let profile = Self::default();
                profile.save(path)?;
                info!(path = %path.display(), "created default config");
                Ok(profile)
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Write the profile as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let json = serde_json::to_vec_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }

    /// Value of a field by case-insensitive name.
    ///
    /// A group name such as `address` yields the group's listing lines.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] for an unknown name.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let lookup = key.to_ascii_lowercase();
        if let Some(field) = INDEX.get(lookup.as_str()) {
            return Ok((field.get)(self));
        }

        let prefix = format!("{lookup}.");
        let group: Vec<String> = FIELDS
            .iter()
            .filter_map(|(k, field)| {
                k.strip_prefix(&prefix)
                    .map(|leaf| format!("{leaf}: {:?}", (field.get)(self)))
            })
            .collect();
        if group.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_owned()));
        }
        Ok(group.join("\n"))
    }

    /// Set a field by case-insensitive name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] for an unknown name or
    /// [`ConfigError::InvalidValue`] if the value does not fit the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let field = INDEX
            .get(key.to_ascii_lowercase().as_str())
            .ok_or_else(|| ConfigError::UnknownKey(key.to_owned()))?;
        (field.set)(self, value)
    }

    /// Print every field as `key: "value"`, nesting grouped fields.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_all<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        let mut group = None;
        for (key, field) in &FIELDS {
            let value = (field.get)(self);
            match key.split_once('.') {
                Some((parent, leaf)) => {
                    if group != Some(parent) {
                        writeln!(w, "{parent}:")?;
                        group = Some(parent);
                    }
                    writeln!(w, "  {leaf}: {value:?}")?;
                }
                None => {
                    group = None;
                    writeln!(w, "{key}: {value:?}")?;
                }
            }
        }
        Ok(())
    }

    /// The saved card with a security code supplied at order time.
    #[must_use]
    pub fn card(&self, cvv: &str) -> Card {
        Card::new(self.card.number.as_str(), self.card.expiration.as_str(), cvv)
    }
}
