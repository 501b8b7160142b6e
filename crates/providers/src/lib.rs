//! Photo-service abstraction and its Flickr implementation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod flickr;
pub mod oauth;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service answered with `stat: fail`.
    #[error("Error: {code}: {message}")]
    Api { code: u32, message: String },
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// A group pool the photo currently belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMembership {
    pub id: String,
    pub title: String,
}

/// A group the authenticated user may post to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
}

/// Flickr answers `groups.pools.add` with this code when the photo went to
/// the pool's moderation queue instead of the pool itself.
pub const POOL_PENDING_QUEUE_CODE: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Queued,
    Failed(String),
}

impl AddOutcome {
    /// The only place service error codes are interpreted.
    pub fn from_add_result(result: Result<(), ServiceError>) -> Self {
        match result {
            Ok(()) => AddOutcome::Added,
            Err(ServiceError::Api {
                code: POOL_PENDING_QUEUE_CODE,
                ..
            }) => AddOutcome::Queued,
            Err(err) => AddOutcome::Failed(err.to_string()),
        }
    }
}

#[async_trait::async_trait]
pub trait PhotoService: Send + Sync {
    /// Groups whose pool already contains the photo.
    async fn photo_pools(&self, photo_id: &str) -> Result<Vec<PoolMembership>, ServiceError>;

    async fn postable_groups(&self) -> Result<Vec<Group>, ServiceError>;

    async fn add_to_pool(&self, photo_id: &str, group_id: &str) -> Result<(), ServiceError>;
}
