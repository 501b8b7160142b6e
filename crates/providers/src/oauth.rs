//! OAuth 1.0a request signing (HMAC-SHA1), as required by the Flickr API.

use crate::ServiceError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};

// RFC 3986 unreserved characters stay literal.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn encode(s: &str) -> String {
    utf8_percent_encode(s, UNRESERVED).to_string()
}

#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

pub fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();
    let joined = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&joined)
    )
}

pub fn sign(
    base_string: &str,
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String, ServiceError> {
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| ServiceError::RequestFailed(format!("signing key rejected: {e}")))?;
    mac.update(base_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

impl OAuthCredentials {
    /// Returns `params` plus the `oauth_*` protocol parameters and signature.
    pub fn signed_params(
        &self,
        method: &str,
        url: &str,
        params: Vec<(String, String)>,
    ) -> Result<Vec<(String, String)>, ServiceError> {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.signed_params_with(method, url, params, &nonce, timestamp)
    }

    pub fn signed_params_with(
        &self,
        method: &str,
        url: &str,
        mut params: Vec<(String, String)>,
        nonce: &str,
        timestamp: u64,
    ) -> Result<Vec<(String, String)>, ServiceError> {
        params.extend([
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), self.token.clone()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ]);
        let base = signature_base_string(method, url, &params);
        let signature = sign(&base, &self.consumer_secret, &self.token_secret)?;
        params.push(("oauth_signature".to_string(), signature));
        Ok(params)
    }
}
