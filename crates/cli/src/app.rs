//! State shared by every command: settings, the user's profile, the local
//! cache and a vendor client.

use apizza_core::{ServiceMethod, StreetAddr};
use apizza_vendor::addresses::get_address;
use apizza_vendor::menu::Menu;
use apizza_vendor::{CacheStore, Store, Transport, VendorClient};
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::profile::Profile;

/// Address and service chosen on the command line.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Name of a saved address.
    pub address: Option<String>,
    pub service: Option<ServiceMethod>,
}

pub struct App<T> {
    settings: Settings,
    pub profile: Profile,
    pub cache: CacheStore,
    pub client: VendorClient<T>,
    selection: Selection,
    store: Option<Store>,
}

impl<T> App<T> {
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Write the profile back to `config.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_profile(&self) -> Result<()> {
        Ok(self.profile.save(&self.settings.config_file())?)
    }
}

impl<T: Transport> App<T> {
    /// Load the profile and open the cache under the settings' directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile or the cache cannot be opened.
    pub fn open(settings: Settings, transport: T, selection: Selection) -> Result<Self> {
        let profile = Profile::load_or_create(&settings.config_file())?;
        let cache = CacheStore::open(settings.cache_file())?;
        debug!(dir = %settings.config_dir.display(), "opened apizza state");
        Ok(Self {
            settings,
            profile,
            cache,
            client: VendorClient::new(transport),
            selection,
            store: None,
        })
    }

    /// The `--service` flag, else the profile's preference.
    pub fn service(&self) -> ServiceMethod {
        self.selection.service.unwrap_or(self.profile.service)
    }

    /// Address to order to.
    ///
    /// Tried in order: the `--address` name, the profile's
    /// `default-address-name`, then the profile's own address.
    ///
    /// # Errors
    ///
    /// Returns an error if a named address is not saved, or
    /// [`CliError::NoAddress`] when nothing is configured.
    pub fn address(&self) -> Result<StreetAddr> {
        let named = self.selection.address.clone().or_else(|| {
            Some(self.profile.default_address_name.clone()).filter(|n| !n.is_empty())
        });
        if let Some(name) = named {
            return Ok(get_address(&self.cache, &name)?);
        }
        if self.profile.address.is_complete() {
            return Ok(StreetAddr::from_address(&self.profile.address));
        }
        Err(CliError::NoAddress)
    }

    /// Nearest store for the current address and service, located once.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no address or the vendor has no store
    /// for it.
    pub fn store(&mut self) -> Result<&Store> {
        let store = match self.store.take() {
            Some(store) => store,
            None => {
                let addr = self.address()?;
                let store = self.client.nearest_store(&addr, self.service())?;
                info!(store = %store.id, service = %store.service, "located store");
                store
            }
        };
        let store: &Store = self.store.insert(store);
        Ok(store)
    }

    /// Menu of the nearest store, from the cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be located or the menu fetched.
    pub fn menu(&mut self) -> Result<Menu> {
        let store = self.store()?.clone();
        Ok(self.client.menu_for(&mut self.cache, &store)?)
    }

    /// Drop the nearest store's cached menu. Returns whether one was cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be located or the cache written.
    pub fn delete_menu(&mut self) -> Result<bool> {
        let id = self.store()?.id.clone();
        Ok(self.client.clear_menu(&mut self.cache, &id)?)
    }
}
