use crate::selection::GroupCatalog;
use anyhow::{bail, Context};
use providers::PhotoService;
use regex::Regex;
use std::path::{Path, PathBuf};
use storage::models::RequestSetFile;
use tracing::info;

/// The photo id is the only path segment made of 8 or more digits.
pub fn extract_photo_id(url: &str) -> anyhow::Result<String> {
    let re = Regex::new(r"/(\d{8,})/")?;
    let found: Vec<&str> = re
        .captures_iter(url)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    match found.as_slice() {
        [id] => Ok(id.to_string()),
        [] => bail!("could not find a photo id in {url:?}"),
        _ => bail!("found {} candidate photo ids in {url:?}", found.len()),
    }
}

pub async fn fetch_catalog(service: &dyn PhotoService) -> anyhow::Result<GroupCatalog> {
    let groups = service
        .postable_groups()
        .await
        .context("listing groups the user can post to")?;
    info!("User can post to {} groups", groups.len());
    Ok(GroupCatalog::from_groups(groups))
}

/// Checked before the interactive session so a bad path does not cost the
/// user their selections.
pub fn ensure_output_dir(dir: &Path) -> anyhow::Result<()> {
    if !dir.is_dir() {
        bail!("output directory {} does not exist", dir.display());
    }
    Ok(())
}

pub fn save_request_set(dir: &Path, file: &RequestSetFile) -> anyhow::Result<Vec<PathBuf>> {
    ensure_output_dir(dir)?;
    let written = storage::write_request_set(dir, file)?;
    for path in &written {
        info!("Wrote {}", path.display());
    }
    Ok(written)
}
