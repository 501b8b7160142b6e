use crate::config::AppConfig;
use anyhow::Context;
use providers::flickr::{AppCredentials, FlickrClient, UserCredentials};
use std::path::Path;
use tracing::info;

/// Builds an authenticated client from the two credential files.
pub fn connect(
    cfg: &AppConfig,
    app_key_path: &Path,
    user_auth_path: &Path,
) -> anyhow::Result<FlickrClient> {
    let app: AppCredentials = storage::read_json(app_key_path).context("app API key info")?;
    let user: UserCredentials = storage::read_json(user_auth_path).context("user auth info")?;
    info!("Authenticated as {} ({})", user.username, user.user_nsid);
    Ok(FlickrClient::new(cfg.api.flickr_config(), app, user)?)
}
