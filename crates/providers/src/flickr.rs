use crate::oauth::OAuthCredentials;
use crate::{Group, PhotoService, PoolMembership, ServiceError};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_REST_URL: &str = "https://api.flickr.com/services/rest/";

/// Application key pair, as stored in the app credential file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppCredentials {
    pub api_key: String,
    pub api_key_secret: String,
}

/// User access token (write permission) and identity, as stored in the user
/// credential file.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCredentials {
    pub user_oauth_token: String,
    pub user_oauth_token_secret: String,
    pub user_fullname: String,
    pub username: String,
    pub user_nsid: String,
}

#[derive(Debug, Clone)]
pub struct FlickrConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FlickrConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REST_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("fga/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Clone)]
pub struct FlickrClient {
    client: Client,
    cfg: Arc<FlickrConfig>,
    oauth: Arc<OAuthCredentials>,
}

impl FlickrClient {
    pub fn new(
        cfg: FlickrConfig,
        app: AppCredentials,
        user: UserCredentials,
    ) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| ServiceError::RequestFailed(e.to_string()))?;
        let oauth = OAuthCredentials {
            consumer_key: app.api_key,
            consumer_secret: app.api_key_secret,
            token: user.user_oauth_token,
            token_secret: user.user_oauth_token_secret,
        };
        Ok(Self {
            client,
            cfg: Arc::new(cfg),
            oauth: Arc::new(oauth),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        http_method: Method,
        api_method: &str,
        args: &[(&str, &str)],
    ) -> Result<T, ServiceError> {
        let mut params = vec![
            ("method".to_string(), api_method.to_string()),
            ("format".to_string(), "json".to_string()),
            ("nojsoncallback".to_string(), "1".to_string()),
        ];
        params.extend(args.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        let signed = self
            .oauth
            .signed_params(http_method.as_str(), &self.cfg.base_url, params)?;

        debug!("{} {}", http_method, api_method);
        let builder = if http_method == Method::GET {
            self.client.get(&self.cfg.base_url).query(&signed)
        } else {
            self.client.post(&self.cfg.base_url).form(&signed)
        };
        let resp = builder
            .send()
            .await
            .map_err(|e| ServiceError::RequestFailed(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ServiceError::RequestFailed(e.to_string()))?;
        if !status.is_success() {
            return Err(ServiceError::RequestFailed(format!(
                "status {} body {:?}",
                status, body
            )));
        }
        parse_envelope(&body)
    }
}

#[derive(Deserialize)]
#[serde(tag = "stat", rename_all = "lowercase")]
enum Envelope<T> {
    Ok(T),
    Fail { code: u32, message: String },
}

/// Unwraps Flickr's `{"stat": "ok" | "fail", ...}` envelope.
pub(crate) fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ServiceError> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| ServiceError::UnexpectedResponse(format!("{e}: {body}")))?;
    match envelope {
        Envelope::Ok(value) => Ok(value),
        Envelope::Fail { code, message } => Err(ServiceError::Api { code, message }),
    }
}

#[derive(Deserialize)]
struct ContextsResponse {
    #[serde(default)]
    pool: Vec<PoolContext>,
}

#[derive(Deserialize)]
struct PoolContext {
    id: String,
    #[serde(default)]
    title: String,
}

#[derive(Deserialize)]
struct GroupsResponse {
    groups: GroupList,
}

#[derive(Deserialize)]
struct GroupList {
    #[serde(default)]
    group: Vec<GroupEntry>,
}

#[derive(Deserialize)]
struct GroupEntry {
    nsid: String,
    name: String,
}

#[derive(Deserialize)]
struct Empty {}

#[async_trait::async_trait]
impl PhotoService for FlickrClient {
    async fn photo_pools(&self, photo_id: &str) -> Result<Vec<PoolMembership>, ServiceError> {
        let resp: ContextsResponse = self
            .call(
                Method::GET,
                "flickr.photos.getAllContexts",
                &[("photo_id", photo_id)],
            )
            .await?;
        Ok(resp
            .pool
            .into_iter()
            .map(|p| PoolMembership {
                id: p.id,
                title: p.title,
            })
            .collect())
    }

    async fn postable_groups(&self) -> Result<Vec<Group>, ServiceError> {
        let resp: GroupsResponse = self
            .call(Method::GET, "flickr.groups.pools.getGroups", &[])
            .await?;
        Ok(resp
            .groups
            .group
            .into_iter()
            .map(|g| Group {
                id: g.nsid,
                name: g.name,
            })
            .collect())
    }

    async fn add_to_pool(&self, photo_id: &str, group_id: &str) -> Result<(), ServiceError> {
        let _: Empty = self
            .call(
                Method::POST,
                "flickr.groups.pools.add",
                &[("photo_id", photo_id), ("group_id", group_id)],
            )
            .await?;
        Ok(())
    }
}
