use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::report::ReportMode;

const CONFIG_FILE: &str = ".argus.toml";

/// Argus configuration (loaded from .argus.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArgusConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub loader: LoaderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Root URL of the Argus web app
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. None waits for the server indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Path of the scan listing used to fill the scan selector
    #[serde(default = "default_scans_path")]
    pub scans_path: String,

    /// Prefix of the single-scan status lookup, `<prefix>/<scan_id>`
    #[serde(default = "default_scan_status_path")]
    pub scan_status_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// "redirect" downloads the generated file, "render" shows the JSON report
    #[serde(default)]
    pub mode: ReportMode,

    /// Where downloaded reports are written
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Delay before the loader is hidden on page load
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_scans_path() -> String {
    "/api/scans".to_string()
}

fn default_scan_status_path() -> String {
    "/api/scan".to_string()
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_delay_ms() -> u64 {
    crate::loader::DEFAULT_DELAY.as_millis() as u64
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            base_url: default_base_url(),
            timeout_secs: None,
            scans_path: default_scans_path(),
            scan_status_path: default_scan_status_path(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            mode: ReportMode::default(),
            download_dir: default_download_dir(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            delay_ms: default_delay_ms(),
        }
    }
}

impl ArgusConfig {
    /// Try to load .argus.toml from the given directory or its parents
    pub fn load(start: &Path) -> Option<Self> {
        let config_path = find_config_file(start)?;
        debug!("Found config: {}", config_path.display());

        match std::fs::read_to_string(&config_path) {
            Ok(content) => match Self::parse(&content) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", config_path.display(), e);
                    None
                }
            },
            Err(e) => {
                debug!("Could not read {}: {}", config_path.display(), e);
                None
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Walk up from `start` to find .argus.toml
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let config = current.join(CONFIG_FILE);
        if config.exists() {
            return Some(config);
        }
        if !current.pop() {
            return None;
        }
    }
}

const DEFAULT_CONFIG: &str = r#"# Argus client configuration

[server]
# Root URL of the Argus web app
base_url = "http://127.0.0.1:5000"

# Per-request timeout in seconds. Unset waits indefinitely.
# timeout_secs = 30

# Scan listing used to fill the scan selector
scans_path = "/api/scans"

# Status of one scan is read from <scan_status_path>/<scan_id>
scan_status_path = "/api/scan"

[report]
# "render" shows the JSON report with a download link,
# "redirect" downloads the generated report file
mode = "render"

# Directory downloaded reports are written to
download_dir = "."

[loader]
# Delay in milliseconds before the loader is hidden on page load
delay_ms = 3000
"#;

/// Create a default .argus.toml in the current directory
pub fn init_config() -> Result<()> {
    let config_path = std::env::current_dir()?.join(CONFIG_FILE);

    if config_path.exists() {
        println!("⚠️  {} already exists in this directory", CONFIG_FILE);
        return Ok(());
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    println!("✅ Created {}", CONFIG_FILE);
    println!("   Edit it to point argus at your server.");

    Ok(())
}
