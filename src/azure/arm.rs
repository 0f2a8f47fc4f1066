//! Azure Resource Manager REST client.
//!
//! Sends bearer-authorized JSON requests and waits on long running
//! operations using the `Azure-AsyncOperation` and `Location` headers.

use super::auth::{AccessToken, DeviceCodeCredential};
use crate::config;
use crate::errors::{from_json, Error, Result};
use chrono::Utc;
use colored::Colorize;
use reqwest::header::{HeaderMap, CONTENT_LENGTH, LOCATION, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const AZURE_ASYNC_OPERATION: &str = "azure-asyncoperation";

#[derive(Deserialize, Debug)]
struct ArmErrorBody {
    error: ArmErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ArmErrorDetail {
    code: String,
    message: String,
}

/// Body returned by an `Azure-AsyncOperation` status URL.
#[derive(Deserialize, Debug)]
struct OperationStatus {
    status: String,
    error: Option<ArmErrorDetail>,
}

#[derive(Debug, PartialEq)]
enum PollTarget {
    AsyncOperation(String),
    Location(String),
}

struct ArmResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

/// Renews the bearer token once it is about to expire.
struct Refresher {
    credential: DeviceCodeCredential,
    scope: String,
}

pub struct ArmClient {
    http: reqwest::Client,
    endpoint: String,
    subscription_id: String,
    token: Mutex<AccessToken>,
    refresher: Option<Refresher>,
    poll_delay: Duration,
    poll_timeout: Duration,
}

impl ArmClient {
    pub fn new(
        http: reqwest::Client,
        endpoint: &str,
        subscription_id: &str,
        token: AccessToken,
    ) -> ArmClient {
        ArmClient {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            subscription_id: subscription_id.to_string(),
            token: Mutex::new(token),
            refresher: None,
            poll_delay: config::POLL_DELAY,
            poll_timeout: config::POLL_TIMEOUT,
        }
    }

    /// Refresh the token through `credential` when it nears expiry. Without
    /// this an expired token fails every request.
    pub fn with_refresh(mut self, credential: DeviceCodeCredential, scope: &str) -> ArmClient {
        self.refresher = Some(Refresher {
            credential,
            scope: scope.to_string(),
        });
        self
    }

    /// Default delay between polls and upper bound for one long running
    /// operation.
    pub fn with_polling(mut self, delay: Duration, timeout: Duration) -> ArmClient {
        self.poll_delay = delay;
        self.poll_timeout = timeout;
        self
    }

    /// Full URL for `path` below the subscription, e.g.
    /// `/resourcegroups/{name}`.
    pub fn resource_url(&self, path: &str, api_version: &str) -> String {
        format!(
            "{}/subscriptions/{}{}?api-version={}",
            self.endpoint, self.subscription_id, path, api_version
        )
    }

    async fn bearer(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if token.expires_soon(Utc::now()) {
            let refresher = self.refresher.as_ref().ok_or_else(|| Error::Auth {
                code: "token_expired".to_string(),
                description: format!(
                    "access token expires at {}, sign in again",
                    token.expires_on
                ),
            })?;
            let fresh = refresher.credential.refresh(&token, &refresher.scope).await?;
            *token = fresh;
        }
        Ok(token.token.clone())
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ArmResponse> {
        let bearer = self.bearer().await?;
        log::debug!("{method} {url}", url = url.on_blue());
        let mut req = self.http.request(method.clone(), url).bearer_auth(bearer);
        req = match body {
            Some(body) => req.json(&body),
            None if method == Method::POST => req.header(CONTENT_LENGTH, "0"),
            None => req,
        };

        let resp = req.send().await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.text().await?;
        log::trace!("status={status} body.len()={}", body.len());

        if !status.is_success() {
            log::warn!(
                "{failed} {method} {url} status={status}",
                failed = "failed".on_red()
            );
            return Err(decode_error(status, &body));
        }
        Ok(ArmResponse {
            status,
            headers,
            body,
        })
    }

    pub async fn post<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.send(Method::POST, url, None).await?;
        from_json(&resp.body)
    }

    /// PUT for resources that are created synchronously.
    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body).map_err(json_error)?;
        let resp = self.send(Method::PUT, url, Some(body)).await?;
        from_json(&resp.body)
    }

    /// PUT and wait until the resource has finished provisioning.
    pub async fn put_and_wait<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body).map_err(json_error)?;
        let resp = self.send(Method::PUT, url, Some(body)).await?;
        let delay = retry_after(&resp.headers, self.poll_delay);

        let body = match poll_target(resp.status, &resp.headers) {
            Some(PollTarget::AsyncOperation(op_url)) => {
                self.wait_async_operation(&op_url, delay).await?;
                self.send(Method::GET, url, None).await?.body
            }
            Some(PollTarget::Location(loc_url)) => {
                let body = self.wait_location(&loc_url, delay).await?;
                if body.trim().is_empty() {
                    self.send(Method::GET, url, None).await?.body
                } else {
                    body
                }
            }
            None => self.wait_provisioning_state(url, resp.body).await?,
        };
        from_json(&body)
    }

    /// DELETE and wait until the resource is gone.
    pub async fn delete_and_wait(&self, url: &str) -> Result<()> {
        let resp = self.send(Method::DELETE, url, None).await?;
        let delay = retry_after(&resp.headers, self.poll_delay);
        match poll_target(resp.status, &resp.headers) {
            Some(PollTarget::AsyncOperation(op_url)) => {
                self.wait_async_operation(&op_url, delay).await
            }
            Some(PollTarget::Location(loc_url)) => {
                self.wait_location(&loc_url, delay).await.map(|_| ())
            }
            None => Ok(()),
        }
    }

    async fn wait_async_operation(&self, op_url: &str, mut delay: Duration) -> Result<()> {
        let deadline = Instant::now() + self.poll_timeout;
        loop {
            self.sleep_until_next_poll(delay, deadline, op_url).await?;
            let resp = self.send(Method::GET, op_url, None).await?;
            let op: OperationStatus = from_json(&resp.body)?;
            log::info!("operation status: {}", op.status);
            if is_terminal(&op.status) {
                if op.status.eq_ignore_ascii_case("Succeeded") {
                    return Ok(());
                }
                let reason = match op.error {
                    Some(e) => format!("{} ({}: {})", op.status, e.code, e.message),
                    None => op.status,
                };
                return Err(Error::OperationFailed(reason));
            }
            delay = retry_after(&resp.headers, self.poll_delay);
        }
    }

    async fn wait_location(&self, loc_url: &str, mut delay: Duration) -> Result<String> {
        let deadline = Instant::now() + self.poll_timeout;
        loop {
            self.sleep_until_next_poll(delay, deadline, loc_url).await?;
            let resp = self.send(Method::GET, loc_url, None).await?;
            if resp.status != StatusCode::ACCEPTED {
                return Ok(resp.body);
            }
            log::info!("operation still in progress");
            delay = retry_after(&resp.headers, self.poll_delay);
        }
    }

    /// Poll the resource itself while its `provisioningState` is not terminal.
    async fn wait_provisioning_state(&self, url: &str, mut body: String) -> Result<String> {
        let deadline = Instant::now() + self.poll_timeout;
        loop {
            match provisioning_state_of(&body) {
                Some(state) if !is_terminal(&state) => {
                    log::info!("provisioningState={state}");
                }
                Some(state) if !state.eq_ignore_ascii_case("Succeeded") => {
                    return Err(Error::OperationFailed(state));
                }
                _ => return Ok(body),
            }
            self.sleep_until_next_poll(self.poll_delay, deadline, url)
                .await?;
            body = self.send(Method::GET, url, None).await?.body;
        }
    }

    async fn sleep_until_next_poll(
        &self,
        delay: Duration,
        deadline: Instant,
        what: &str,
    ) -> Result<()> {
        if Instant::now() + delay > deadline {
            return Err(Error::Timeout(self.poll_timeout, what.to_string()));
        }
        tokio::time::sleep(delay).await;
        Ok(())
    }
}

fn json_error(e: serde_json::Error) -> Error {
    Error::Json {
        path: ".".to_string(),
        message: e.to_string(),
    }
}

fn decode_error(status: StatusCode, body: &str) -> Error {
    match serde_json::from_str::<ArmErrorBody>(body) {
        Ok(err) => Error::Arm {
            status,
            code: err.error.code,
            message: err.error.message,
        },
        Err(_) => Error::Arm {
            status,
            code: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: body.to_string(),
        },
    }
}

fn poll_target(status: StatusCode, headers: &HeaderMap) -> Option<PollTarget> {
    if status != StatusCode::CREATED && status != StatusCode::ACCEPTED {
        return None;
    }
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    if let Some(url) = header(AZURE_ASYNC_OPERATION) {
        return Some(PollTarget::AsyncOperation(url));
    }
    header(LOCATION.as_str()).map(PollTarget::Location)
}

/// `Retry-After` in seconds, or `default` when absent.
fn retry_after(headers: &HeaderMap, default: Duration) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

fn is_terminal(state: &str) -> bool {
    ["Succeeded", "Failed", "Canceled"]
        .iter()
        .any(|s| s.eq_ignore_ascii_case(state))
}

fn provisioning_state_of(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/properties/provisioningState")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
