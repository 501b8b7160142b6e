use providers::flickr::{FlickrConfig, DEFAULT_REST_URL};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub on_membership_error: MembershipErrorPolicy,
}

/// What to do when the pools of a photo cannot be listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipErrorPolicy {
    /// Abort the whole run.
    #[default]
    Abort,
    /// Warn, count the photo as skipped and carry on with the next one.
    SkipPhoto,
}

impl ApiConfig {
    pub fn flickr_config(&self) -> FlickrConfig {
        let mut cfg = FlickrConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..FlickrConfig::default()
        };
        if let Some(agent) = &self.user_agent {
            cfg.user_agent = agent.clone();
        }
        cfg
    }
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder()
        .set_default("api.base_url", DEFAULT_REST_URL)?
        .set_default("api.timeout_secs", 30_i64)?
        .set_default("run.on_membership_error", "abort")?;
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix("FGA")
            .prefix_separator("__")
            .separator("__"),
    );
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
