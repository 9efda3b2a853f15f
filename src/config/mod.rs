use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_TOKEN: &str = "RVOLUNTEER_TOKEN";
pub const ENV_API_URL: &str = "RVOLUNTEER_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub student_id: Option<i64>,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_checkin_poll")]
    pub checkin_poll_secs: u64,
    #[serde(default = "default_application_poll")]
    pub application_poll_secs: u64,
    #[serde(default = "default_notification_poll")]
    pub notification_poll_secs: u64,
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_checkin_poll() -> u64 {
    10
}
fn default_application_poll() -> u64 {
    30
}
fn default_notification_poll() -> u64 {
    60
}
fn default_http_timeout() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            token: None,
            role: Role::default(),
            student_id: None,
            database: default_database(),
            checkin_poll_secs: default_checkin_poll(),
            application_poll_secs: default_application_poll(),
            notification_poll_secs: default_notification_poll(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rvolunteer")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".rvolunteer")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rvolunteer.conf")
    }

    /// Return the full path of the operation-log database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rvolunteer.sqlite")
    }

    /// Load configuration from `path` (or the standard file), falling back to
    /// defaults when the file does not exist. Environment overrides apply on top.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_file);

        let mut cfg = Self::load_file(&path)?;
        cfg.apply_env();
        cfg.validate()?;
        Ok(cfg)
    }

    /// The file's own content, without environment overrides.
    pub fn load_file(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(token) = env::var(ENV_TOKEN)
            && !token.trim().is_empty()
        {
            self.token = Some(token);
        }
        if let Ok(url) = env::var(ENV_API_URL)
            && !url.trim().is_empty()
        {
            self.api_base_url = url;
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(AppError::Config("api_base_url must not be empty".to_string()));
        }
        for (name, value) in [
            ("checkin_poll_secs", self.checkin_poll_secs),
            ("application_poll_secs", self.application_poll_secs),
            ("notification_poll_secs", self.notification_poll_secs),
            ("http_timeout_secs", self.http_timeout_secs),
        ] {
            if value == 0 {
                return Err(AppError::Config(format!("{name} must be greater than zero")));
            }
        }
        Ok(())
    }

    /// Write the configuration as YAML to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Create the configuration file (unless `is_test`) and return the
    /// configuration that was written.
    pub fn init_all(
        path: Option<&Path>,
        custom_db: Option<String>,
        is_test: bool,
    ) -> AppResult<Self> {
        let dir = Self::config_dir();

        let mut config = Config::default();
        if let Some(name) = custom_db {
            let p = Path::new(&name);
            config.database = if p.is_absolute() {
                p.to_string_lossy().to_string()
            } else {
                dir.join(p).to_string_lossy().to_string()
            };
        }

        if !is_test {
            let file = path.map(Path::to_path_buf).unwrap_or_else(Self::config_file);
            config.save(&file)?;
            println!("✅ Config file: {}", file.display());
        }

        Ok(config)
    }
}
