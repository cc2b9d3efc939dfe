use config::{Config, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::client::{ClientError, ManifestClient, TorrentClient};
use crate::error::Result;

static DEFAULT_STORE_PATH: &str = "autotorrent_index.db";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    #[serde(default)]
    pub root_paths: Vec<String>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    #[serde(default)]
    pub clients: BTreeMap<String, ClientConfig>,
}

/// Where a named client's session snapshot lives.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    pub manifest: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            root_paths: Vec::new(),
            ignore_patterns: Vec::new(),
            clients: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Open every configured client, keyed by its name.
    ///
    /// When `only` is non-empty, clients not named in it are left out.
    pub fn open_clients(
        &self,
        only: &[String],
    ) -> std::result::Result<BTreeMap<String, Box<dyn TorrentClient>>, ClientError> {
        let mut clients: BTreeMap<String, Box<dyn TorrentClient>> = BTreeMap::new();
        for (name, client_config) in &self.clients {
            if !only.is_empty() && !only.contains(name) {
                continue;
            }
            let client = ManifestClient::open(&client_config.manifest)?;
            clients.insert(name.clone(), Box::new(client));
        }
        Ok(clients)
    }
}

/// Load `Config.toml` (if present), overridden by `ATI__*` environment variables.
pub fn load_configuration() -> Result<AppConfig> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("ATI")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("root_paths")
                .with_list_parse_key("ignore_patterns")
                .try_parsing(true),
        )
        .build()?;
    Ok(builder.try_deserialize::<AppConfig>()?)
}

/// Remove directories that are subdirectories of other directories in the list.
/// The first spelling of each surviving directory is kept, in input order.
pub fn non_overlapping_directories(dirs: Vec<String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();

    for dir in dirs {
        let dir_path = Path::new(&dir);
        if result.iter().any(|kept| dir_path.starts_with(kept)) {
            continue;
        }
        result.retain(|kept| !Path::new(kept).starts_with(dir_path));
        result.push(dir);
    }

    result
}
