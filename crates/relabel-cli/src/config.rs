// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_MAX_RESULTS: usize = relabel_server::DEFAULT_MAX_RESULTS;
const DEFAULT_LISTEN: &str = "127.0.0.1:8787";
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub search: Search,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub client: Client,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            search: Search::default(),
            server: ServerSection::default(),
            client: Client::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
    pub max_results: Option<i64>,
}

impl Default for Search {
    fn default() -> Self {
        Self {
            max_results: Some(DEFAULT_MAX_RESULTS as i64),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    pub listen: Option<String>,
    pub debug_messages: Option<bool>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: Some(DEFAULT_LISTEN.to_owned()),
            debug_messages: Some(false),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Client {
    pub server_url: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Client {
    fn default() -> Self {
        Self {
            server_url: None,
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub filter: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            filter: Some(DEFAULT_LOG_FILTER.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("RELABEL_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set RELABEL_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(relabel_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` at the top",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            relabel_db::validate_db_path(db_path)?;
        }

        if let Some(max_results) = self.search.max_results
            && max_results <= 0
        {
            bail!(
                "search.max_results in {} must be positive, got {}",
                path.display(),
                max_results
            );
        }

        if let Some(max_results) = self.search.max_results
            && max_results > relabel_db::MAX_QUERY_ROWS as i64
        {
            bail!(
                "search.max_results in {} must be at most {}, got {}",
                path.display(),
                relabel_db::MAX_QUERY_ROWS,
                max_results
            );
        }

        if let Some(listen) = &self.server.listen {
            listen.parse::<SocketAddr>().with_context(|| {
                format!(
                    "server.listen in {} must be HOST:PORT, got {listen:?}",
                    path.display()
                )
            })?;
        }

        if let Some(server_url) = &self.client.server_url {
            let parsed = Url::parse(server_url)
                .with_context(|| format!("client.server_url in {} is not a URL", path.display()))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!(
                    "client.server_url in {} must use http or https, got {}",
                    path.display(),
                    parsed.scheme()
                );
            }
        }

        if let Some(timeout) = &self.client.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "client.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        Ok(())
    }

    /// `[storage].db_path`, then `RELABEL_DB_PATH`, then the data directory.
    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => relabel_db::default_db_path(),
        }
    }

    pub fn max_results(&self) -> usize {
        self.search
            .max_results
            .and_then(|value| usize::try_from(value).ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_MAX_RESULTS)
    }

    pub fn listen(&self) -> &str {
        self.server.listen.as_deref().unwrap_or(DEFAULT_LISTEN)
    }

    pub fn debug_messages(&self) -> bool {
        self.server.debug_messages.unwrap_or(false)
    }

    pub fn server_url(&self) -> Option<&str> {
        self.client
            .server_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn client_timeout(&self) -> Result<Duration> {
        parse_duration(self.client.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn log_filter(&self) -> &str {
        self.log.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# relabel config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/relabel/relabel.db)\n# db_path = \"/absolute/path/to/relabel.db\"\n\n[search]\nmax_results = {}\n\n[server]\nlisten = \"{}\"\ndebug_messages = false\n\n[client]\n# Optional. When set, commands talk to this server instead of the local database.\n# server_url = \"http://{}\"\ntimeout = \"{}\"\n\n[log]\n# RELABEL_LOG overrides this filter.\nfilter = \"{}\"\n",
            path.display(),
            DEFAULT_MAX_RESULTS,
            DEFAULT_LISTEN,
            DEFAULT_LISTEN,
            DEFAULT_TIMEOUT,
            DEFAULT_LOG_FILTER,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}
