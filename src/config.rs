use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::points::{DEFAULT_JITTER_DEGREES, DEFAULT_POINTS_PER_GOVERNORATE};

/// One week.
pub const MAX_SESSION_IDLE_MINUTES: i64 = 7 * 24 * 60;
pub const MAX_POINTS_PER_GOVERNORATE: usize = 1_000;

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_points_per_governorate() -> usize {
    DEFAULT_POINTS_PER_GOVERNORATE
}

fn default_jitter_degrees() -> f64 {
    DEFAULT_JITTER_DEGREES
}

fn default_session_idle_minutes() -> i64 {
    30
}

fn default_max_sessions() -> usize {
    10_000
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Master seed for session point generation; drawn from entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_points_per_governorate")]
    pub points_per_governorate: usize,
    #[serde(default = "default_jitter_degrees")]
    pub jitter_degrees: f64,
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: i64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    /// `tracing_subscriber` filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            seed: None,
            points_per_governorate: default_points_per_governorate(),
            jitter_degrees: default_jitter_degrees(),
            session_idle_minutes: default_session_idle_minutes(),
            max_sessions: default_max_sessions(),
            log_filter: default_log_filter(),
        }
    }
}

impl DashboardConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: DashboardConfig =
            serde_yaml::from_str(text).context("Failed to parse dashboard config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.jitter_degrees.is_finite() || self.jitter_degrees < 0.0 {
            bail!(
                "jitter_degrees must be a non-negative number, got {}",
                self.jitter_degrees
            );
        }
        if !(1..=MAX_SESSION_IDLE_MINUTES).contains(&self.session_idle_minutes) {
            bail!(
                "session_idle_minutes must be between 1 and {MAX_SESSION_IDLE_MINUTES}, got {}",
                self.session_idle_minutes
            );
        }
        if self.points_per_governorate > MAX_POINTS_PER_GOVERNORATE {
            bail!(
                "points_per_governorate must be at most {MAX_POINTS_PER_GOVERNORATE}, got {}",
                self.points_per_governorate
            );
        }
        if self.max_sessions == 0 {
            bail!("max_sessions must be at least 1");
        }
        Ok(())
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<DashboardConfig> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        DashboardConfig::from_yaml_str(&data)
            .with_context(|| format!("Failed to load {}", path.display()))
    }
}
