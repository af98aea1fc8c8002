use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Chainable, ErrorKind, Result};

/// The default settings file name looked up in an input root.
pub const CONFIG_FILE: &str = "leaflet.toml";

/// Build settings, usually read from a `leaflet.toml`.
///
/// ```toml
/// root = "https://example.com/docs"
/// sidebar = "templates/navbar.html"
/// parallel = true
///
/// # Everything else is handed to the sidebar template as `G`.
/// site_name = "Example"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Prefix for links generated in the sidebar.
    #[serde(default = "default_root")]
    pub root: String,
    /// Replaces the built-in sidebar template. Relative paths resolve against
    /// the directory containing the settings file.
    #[serde(default)]
    pub sidebar: Option<PathBuf>,
    /// Render the pages of an article in parallel.
    #[serde(default)]
    pub parallel: bool,
    #[serde(flatten)]
    pub globals: FxHashMap<String, toml::Value>,
}

fn default_root() -> String {
    "/".into()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            root: default_root(),
            sidebar: None,
            parallel: false,
            globals: FxHashMap::default(),
        }
    }
}

impl Settings {
    /// Parses settings from TOML source text.
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str::<Settings>(source)
            .chain(error!("invalid settings"))
            .with_kind(ErrorKind::Config)
    }

    /// Reads settings from the TOML file at `path`.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .chain_with(|| error! {
                "failed to read settings file",
                "path" => path.display(),
            })
            .with_kind(ErrorKind::Config)?;

        let mut settings = Settings::from_toml(&source)
            .chain_with(|| error! {
                "failed to load settings file",
                "path" => path.display(),
            })?;

        if let (Some(sidebar), Some(parent)) = (settings.sidebar.as_mut(), path.parent()) {
            if sidebar.is_relative() {
                *sidebar = parent.join(&*sidebar);
            }
        }

        Ok(settings)
    }

    /// Reads `path` if given, otherwise `dir/leaflet.toml` if it exists,
    /// otherwise returns the defaults.
    pub fn discover<P: AsRef<Path>>(dir: P, path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Settings::read(path);
        }

        let candidate = dir.as_ref().join(CONFIG_FILE);
        if candidate.is_file() {
            Settings::read(candidate)
        } else {
            Ok(Settings::default())
        }
    }
}
