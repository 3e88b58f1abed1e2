use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";
pub const DEFAULT_BASE_DIRECTORY: &str = "/";
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub site_url: String,
    // "/" means the whole drive is published; otherwise the published folder.
    pub base_directory: String,
    pub debounce_ms: u64,
    pub theme: String,
    pub http: HttpConfig,
    pub log_level: String,
    pub log_file: PathBuf,
    pub no_tui: bool,
    pub query: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            base_directory: DEFAULT_BASE_DIRECTORY.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            theme: "dark".to_string(),
            http: HttpConfig::default(),
            log_level: "info".to_string(),
            log_file: PathBuf::from("./dsearch.log"),
            no_tui: false,
            query: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            request_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FileConfig {
    pub site_url: Option<String>,
    pub base_directory: Option<String>,
    pub debounce_ms: Option<u64>,
    pub theme: Option<String>,
    pub log_file: Option<PathBuf>,
    pub http: Option<PartialHttpConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PartialHttpConfig {
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

/// Values read from the environment; split out so layering can be tested
/// without touching the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub site_url: Option<String>,
    pub base_directory: Option<String>,
    pub debounce_ms: Option<u64>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            site_url: std::env::var("DSEARCH_SITE_URL").ok(),
            base_directory: std::env::var("DSEARCH_BASE_DIRECTORY").ok(),
            debounce_ms: std::env::var("DSEARCH_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok()),
            log_level: std::env::var("DSEARCH_LOG").ok(),
            log_file: std::env::var("DSEARCH_LOG_FILE").ok().map(PathBuf::from),
        }
    }
}

impl AppConfig {
    pub fn from_cli(cli: crate::Cli) -> Result<Self> {
        let project_root = std::env::current_dir().context("resolve current dir")?;
        // Project config first (highest priority after CLI args and env vars)
        let project_cfg = load_project_config(&project_root).unwrap_or_default();
        let file_cfg = load_file_config().unwrap_or_default();
        Ok(Self::layered(
            cli,
            EnvOverrides::from_env(),
            project_cfg,
            file_cfg,
        ))
    }

    /// Merge CLI > env > project file > global file > defaults.
    pub fn layered(
        cli: crate::Cli,
        env: EnvOverrides,
        project_cfg: FileConfig,
        file_cfg: FileConfig,
    ) -> Self {
        let defaults = AppConfig::default();

        let site_url = cli
            .site_url
            .or(env.site_url)
            .or(project_cfg.site_url)
            .or(file_cfg.site_url)
            .unwrap_or(defaults.site_url);
        let base_directory = cli
            .base_directory
            .or(env.base_directory)
            .or(project_cfg.base_directory)
            .or(file_cfg.base_directory)
            .unwrap_or(defaults.base_directory);
        let debounce_ms = cli
            .debounce_ms
            .or(env.debounce_ms)
            .or(project_cfg.debounce_ms)
            .or(file_cfg.debounce_ms)
            .unwrap_or(defaults.debounce_ms);
        let theme = cli
            .theme
            .or(project_cfg.theme)
            .or(file_cfg.theme)
            .unwrap_or(defaults.theme);
        let log_level = cli
            .log_level
            .or(env.log_level)
            .unwrap_or(defaults.log_level);
        let log_file = cli
            .log_file
            .or(env.log_file)
            .or(project_cfg.log_file)
            .or(file_cfg.log_file)
            .unwrap_or(defaults.log_file);

        let http = {
            let http_defaults = HttpConfig::default();
            let project_http = project_cfg.http.unwrap_or_default();
            let file_http = file_cfg.http.unwrap_or_default();
            HttpConfig {
                connect_timeout_ms: project_http
                    .connect_timeout_ms
                    .or(file_http.connect_timeout_ms)
                    .unwrap_or(http_defaults.connect_timeout_ms),
                request_timeout_ms: project_http
                    .request_timeout_ms
                    .or(file_http.request_timeout_ms)
                    .unwrap_or(http_defaults.request_timeout_ms),
            }
        };

        Self {
            site_url,
            base_directory,
            debounce_ms,
            theme,
            http,
            log_level,
            log_file,
            no_tui: cli.no_tui || cli.query.is_some(),
            query: cli.query,
        }
    }
}

fn parse_config_file(path: &Path) -> Result<Option<FileConfig>> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))?;
    match toml::from_str::<FileConfig>(&s) {
        Ok(cfg) => {
            info!(path=%path.display(), "loaded config file");
            Ok(Some(cfg))
        }
        Err(e) => {
            warn!(path=%path.display(), error=%e.to_string(), "parse config failed");
            Ok(None)
        }
    }
}

pub fn load_file_config() -> Result<FileConfig> {
    fn candidate_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Ok(p) = std::env::var("DSEARCH_CONFIG") {
            v.push(PathBuf::from(p));
        }
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            v.push(Path::new(&xdg_home).join("dsearch/config.toml"));
        } else if let Some(home) = dirs::home_dir() {
            v.push(home.join(".config/dsearch/config.toml"));
        }
        if let Ok(config_dirs) = std::env::var("XDG_CONFIG_DIRS") {
            for d in config_dirs.split(':') {
                if !d.is_empty() {
                    v.push(Path::new(d).join("dsearch/config.toml"));
                }
            }
        }
        v
    }

    for p in candidate_paths() {
        if p.exists() {
            if let Some(cfg) = parse_config_file(&p)? {
                return Ok(cfg);
            }
        }
    }
    Ok(FileConfig::default())
}

/// Load project-specific configuration from .dsearch/config.toml
pub fn load_project_config(project_root: &Path) -> Result<FileConfig> {
    let path = project_root.join(".dsearch").join("config.toml");
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    Ok(parse_config_file(&path)?.unwrap_or_default())
}
