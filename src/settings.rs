//! Layered settings: built-in defaults, then an optional TOML file, then
//! `INNKEEPER_*` environment variables.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::persist::{FileNames, PersistenceMode, Persistor};

pub const DEFAULT_SETTINGS_FILE: &str = "innkeeper";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub customers_file: String,
    pub rooms_file: String,
    pub bookings_file: String,
    pub log_filter: String,
}

impl Settings {
    /// Reads `path` if given (it must then exist), otherwise an optional
    /// `innkeeper.toml` in the working directory.
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        let defaults = FileNames::default();
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
        };
        let settings = Config::builder()
            .set_default("data_dir", "data")?
            .set_default("customers_file", defaults.customers)?
            .set_default("rooms_file", defaults.rooms)?
            .set_default("bookings_file", defaults.bookings)?
            .set_default("log_filter", "info")?
            .add_source(file)
            .add_source(Environment::with_prefix("INNKEEPER"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
    pub fn file_names(&self) -> FileNames {
        FileNames {
            customers: self.customers_file.clone(),
            rooms: self.rooms_file.clone(),
            bookings: self.bookings_file.clone(),
        }
    }
    pub fn persistor(&self) -> Persistor {
        Persistor::with_files(
            PersistenceMode::Directory(self.data_dir.clone()),
            self.file_names(),
        )
    }
}
