//! Azure AD device code authentication.
//!
//! The user is shown a code and a URL, signs in from any browser, and the
//! token endpoint is polled until the sign-in completes. The returned refresh
//! token keeps the session alive while the run waits at the delete prompt.

use crate::errors::{from_json, Error, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Deserialize;
use std::fmt;
use std::time::{Duration, Instant};

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";
const OFFLINE_ACCESS: &str = "offline_access";
/// Added to the poll interval when AAD answers `slow_down`.
const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);
/// Seconds before expiry at which a token is refreshed before use.
const REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Response of the `devicecode` endpoint.
#[derive(Deserialize, Debug, Clone)]
pub struct DeviceCode {
    pub device_code: String,
    pub user_code: String,
    #[serde(alias = "verification_url")]
    pub verification_uri: String,
    pub expires_in: u64,
    #[serde(default = "default_interval")]
    pub interval: u64,
    pub message: String,
}

fn default_interval() -> u64 {
    5
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
    refresh_token: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// Bearer token for Azure Resource Manager.
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_on: DateTime<Utc>,
    pub refresh_token: Option<String>,
}

impl AccessToken {
    /// True once the token is within the refresh margin of `expires_on`.
    pub fn expires_soon(&self, now: DateTime<Utc>) -> bool {
        self.expires_on - chrono::Duration::seconds(REFRESH_MARGIN_SECS) <= now
    }

    fn from_response(token: TokenResponse) -> AccessToken {
        AccessToken {
            token: token.access_token,
            expires_on: Utc::now() + chrono::Duration::seconds(token.expires_in as i64),
            refresh_token: token.refresh_token,
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_on", &self.expires_on)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Debug, PartialEq)]
enum PollOutcome {
    Pending,
    SlowDown,
    Failed { code: String, description: String },
}

fn classify_token_error(err: TokenErrorResponse) -> PollOutcome {
    match err.error.as_str() {
        "authorization_pending" => PollOutcome::Pending,
        "slow_down" => PollOutcome::SlowDown,
        _ => PollOutcome::Failed {
            description: err.error_description.unwrap_or_default(),
            code: err.error,
        },
    }
}

fn with_offline_access(scope: &str) -> String {
    format!("{scope} {OFFLINE_ACCESS}")
}

pub struct DeviceCodeCredential {
    http: reqwest::Client,
    authority: String,
    tenant_id: String,
    client_id: String,
    slow_down_step: Duration,
}

impl DeviceCodeCredential {
    pub fn new(
        http: reqwest::Client,
        authority: &str,
        tenant_id: &str,
        client_id: &str,
    ) -> DeviceCodeCredential {
        DeviceCodeCredential {
            http,
            authority: authority.trim_end_matches('/').to_string(),
            tenant_id: tenant_id.to_string(),
            client_id: client_id.to_string(),
            slow_down_step: SLOW_DOWN_STEP,
        }
    }

    /// Override how much `slow_down` stretches the poll interval.
    pub fn with_slow_down_step(mut self, step: Duration) -> DeviceCodeCredential {
        self.slow_down_step = step;
        self
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}/oauth2/v2.0/{}", self.authority, self.tenant_id, name)
    }

    /// Run the whole flow: request a code, show the sign-in message, and wait
    /// for the token.
    pub async fn authenticate(&self, scope: &str) -> Result<AccessToken> {
        let device = self.request_device_code(scope).await?;
        println!("{}", device.message.yellow());
        log::info!(
            "Waiting for device login code={} at {}",
            device.user_code,
            device.verification_uri
        );
        self.poll_token(&device).await
    }

    /// Exchange the refresh token of `token` for a new access token.
    pub async fn refresh(&self, token: &AccessToken, scope: &str) -> Result<AccessToken> {
        let refresh_token = token.refresh_token.as_deref().ok_or_else(|| Error::Auth {
            code: "token_expired".to_string(),
            description: format!(
                "access token expires at {} and no refresh token is available, sign in again",
                token.expires_on
            ),
        })?;
        log::info!("Refreshing access token expiring at {}", token.expires_on);
        let scope = with_offline_access(scope);
        let resp = self
            .http
            .post(self.endpoint("token"))
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.client_id.as_str()),
                ("refresh_token", refresh_token),
                ("scope", scope.as_str()),
            ])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let err: TokenErrorResponse = from_json(&body)?;
            return Err(Error::Auth {
                code: err.error,
                description: err.error_description.unwrap_or_default(),
            });
        }
        let mut fresh = AccessToken::from_response(from_json(&body)?);
        // AAD may omit a new refresh token; the old one stays valid then.
        if fresh.refresh_token.is_none() {
            fresh.refresh_token = token.refresh_token.clone();
        }
        Ok(fresh)
    }

    async fn request_device_code(&self, scope: &str) -> Result<DeviceCode> {
        let url = self.endpoint("devicecode");
        log::debug!("request_device_code({url})");
        let scope = with_offline_access(scope);
        let resp = self
            .http
            .post(&url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("scope", scope.as_str()),
            ])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let err: TokenErrorResponse = from_json(&body)?;
            return Err(Error::Auth {
                code: err.error,
                description: err.error_description.unwrap_or_default(),
            });
        }
        from_json(&body)
    }

    async fn poll_token(&self, device: &DeviceCode) -> Result<AccessToken> {
        let url = self.endpoint("token");
        let expires_in = Duration::from_secs(device.expires_in);
        let deadline = Instant::now() + expires_in;
        let mut interval = Duration::from_secs(device.interval);

        loop {
            tokio::time::sleep(interval).await;
            if Instant::now() >= deadline {
                return Err(Error::Timeout(expires_in, "device code sign-in".into()));
            }

            let resp = self
                .http
                .post(&url)
                .form(&[
                    ("grant_type", DEVICE_CODE_GRANT),
                    ("client_id", self.client_id.as_str()),
                    ("device_code", device.device_code.as_str()),
                ])
                .send()
                .await?;
            let status = resp.status();
            let body = resp.text().await?;

            if status.is_success() {
                let token: TokenResponse = from_json(&body)?;
                log::info!("Device login complete, token valid for {}s", token.expires_in);
                return Ok(AccessToken::from_response(token));
            }

            match classify_token_error(from_json(&body)?) {
                PollOutcome::Pending => log::trace!("authorization pending"),
                PollOutcome::SlowDown => {
                    interval += self.slow_down_step;
                    log::debug!("slow_down, poll interval now {interval:?}");
                }
                PollOutcome::Failed { code, description } => {
                    return Err(Error::Auth { code, description })
                }
            }
        }
    }
}
