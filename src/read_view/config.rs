//! Read view configuration file
//!
//! ```json
//! {
//!   "needs_field_names": true,
//!   "needs_space_upgrade": true,
//!   "needs_temporary_spaces": false,
//!   "spaces": ["users", "orders"],
//!   "exclude_spaces": ["orders"]
//! }
//! ```
//!
//! Every key is optional. Unknown keys are rejected.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigResult};
use super::options::{ReadViewFilter, ReadViewOptions};
use crate::observability::{log_event, Event};
use crate::space::Space;

/// Read view options as stored in a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadViewConfig {
    /// Build a named tuple format per space
    pub needs_field_names: bool,
    /// Capture upgrades in flight
    pub needs_space_upgrade: bool,
    /// Include temporary spaces
    pub needs_temporary_spaces: bool,
    /// Names of the spaces to include; all spaces when absent
    pub spaces: Option<Vec<String>>,
    /// Names of the spaces to leave out
    pub exclude_spaces: Vec<String>,
}

impl ReadViewConfig {
    /// Parses and validates a configuration.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: ReadViewConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;

        let path = path.display().to_string();
        log_event(Event::ReadViewConfigLoaded, &[("path", path.as_str())]);
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        let Some(spaces) = self.spaces.as_ref() else {
            return Ok(());
        };
        if let Some(name) = spaces.iter().find(|name| self.exclude_spaces.contains(*name)) {
            return Err(ConfigError::Invalid(format!(
                "space '{}' is both included and excluded",
                name
            )));
        }
        Ok(())
    }

    /// Builds read view options.
    ///
    /// A name filter is installed only when the configuration lists spaces.
    pub fn into_options(self) -> ReadViewOptions {
        let opts = ReadViewOptions::new()
            .with_field_names(self.needs_field_names)
            .with_space_upgrade(self.needs_space_upgrade)
            .with_temporary_spaces(self.needs_temporary_spaces);
        if self.spaces.is_none() && self.exclude_spaces.is_empty() {
            return opts;
        }
        opts.with_filter(SpaceNameFilter {
            include: self.spaces.map(|names| names.into_iter().collect()),
            exclude: self.exclude_spaces.into_iter().collect(),
        })
    }
}

/// Includes spaces by name.
#[derive(Debug, Clone, Default)]
pub struct SpaceNameFilter {
    include: Option<HashSet<String>>,
    exclude: HashSet<String>,
}

impl SpaceNameFilter {
    /// Includes only the named spaces.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: Some(names.into_iter().map(Into::into).collect()),
            exclude: HashSet::new(),
        }
    }

    /// Also leaves out the named spaces.
    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(names.into_iter().map(Into::into));
        self
    }

    fn accepts(&self, name: &str) -> bool {
        if self.exclude.contains(name) {
            return false;
        }
        self.include.as_ref().map_or(true, |include| include.contains(name))
    }
}

impl ReadViewFilter for SpaceNameFilter {
    fn filter_space(&self, space: &Space) -> bool {
        self.accepts(&space.name())
    }
}
