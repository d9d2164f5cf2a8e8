//! Location-based property source.

use indexmap::IndexMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

use apiregions_core::error::{ConfigError, Error, Result};
use apiregions_core::Environment;

use super::{parse_properties, EmbeddedResources, PropertyEntry, PropertySource};
use crate::constants::{
    BASE_FILENAMES, CLASSLOADER_SCHEME, PROPERTIES_FILE_LOCATION, PROPERTIES_RESOURCE_PREFIX,
};

/// A property source that reads each base file from a resolved location.
///
/// A file's location is `apiregions.resource.<file>` if set, otherwise
/// `<apiregions.location>/<file>`. Locations may be plain paths, `file:`
/// URLs or `classloader://<dir>` references into [`EmbeddedResources`].
#[derive(Debug, Clone)]
pub struct LocationPropertySource {
    locations: IndexMap<String, String>,
    embedded: EmbeddedResources,
}

impl LocationPropertySource {
    /// Create a source from explicit per-file locations.
    pub fn new(locations: IndexMap<String, String>, embedded: EmbeddedResources) -> Self {
        Self {
            locations,
            embedded,
        }
    }

    /// Resolve the base file locations from the host environment.
    ///
    /// # Arguments
    ///
    /// * `env` - The host environment.
    /// * `embedded` - Documents addressable through `classloader://`.
    ///
    /// # Returns
    ///
    /// * `Ok(LocationPropertySource)` - If at least one location is configured.
    /// * `Err(ConfigError::NoConfiguration)` - If neither `apiregions.location`
    ///   nor any `apiregions.resource.<file>` key is set.
    pub fn from_environment(env: &dyn Environment, embedded: EmbeddedResources) -> Result<Self> {
        let base = env
            .property(PROPERTIES_FILE_LOCATION)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let mut locations = IndexMap::new();
        for file_name in BASE_FILENAMES {
            let explicit = env
                .property(&format!("{}{}", PROPERTIES_RESOURCE_PREFIX, file_name))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty());

            let location = explicit.or_else(|| base.as_deref().map(|dir| join(dir, file_name)));
            if let Some(location) = location {
                locations.insert(file_name.to_string(), location);
            }
        }

        if locations.is_empty() {
            return Err(ConfigError::NoConfiguration {
                location_key: PROPERTIES_FILE_LOCATION.to_string(),
                resource_prefix: PROPERTIES_RESOURCE_PREFIX.to_string(),
            }
            .into());
        }

        Ok(Self::new(locations, embedded))
    }

    /// All resolved locations, keyed by logical file name.
    pub fn locations(&self) -> &IndexMap<String, String> {
        &self.locations
    }

    fn read_location(&self, location: &str) -> Result<Option<String>> {
        if let Some(path) = location.strip_prefix(CLASSLOADER_SCHEME) {
            return Ok(self.embedded.get(path).map(str::to_string));
        }

        let path = file_path(location)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

impl PropertySource for LocationPropertySource {
    fn read_if_present(&self, file_name: &str) -> Result<Option<Vec<PropertyEntry>>> {
        let Some(location) = self.locations.get(file_name) else {
            return Ok(None);
        };

        match self.read_location(location)? {
            Some(text) => Ok(Some(parse_properties(file_name, &text))),
            None => {
                debug!(file = file_name, location = %location, "Configuration file not found");
                Ok(None)
            }
        }
    }

    fn location(&self, file_name: &str) -> Option<String> {
        self.locations.get(file_name).cloned()
    }
}

/// Resolve a plain path or `file:` URL to a filesystem path.
fn file_path(location: &str) -> Result<PathBuf> {
    match Url::parse(location) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map_err(|()| Error::from(ConfigError::UnsupportedLocation(location.to_string()))),
        // Single-letter schemes are drive prefixes, not URLs
        Ok(url) if url.scheme().len() > 1 => {
            Err(ConfigError::UnsupportedLocation(location.to_string()).into())
        }
        _ => Ok(PathBuf::from(location)),
    }
}

fn join(dir: &str, file_name: &str) -> String {
    if dir.ends_with('/') {
        format!("{}{}", dir, file_name)
    } else {
        format!("{}/{}", dir, file_name)
    }
}
