//! Error type shared by every step of the quickstart.

use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication failed: {code}: {description}")]
    Auth { code: String, description: String },

    #[error("azure returned {status} {code}: {message}")]
    Arm {
        status: StatusCode,
        code: String,
        message: String,
    },

    #[error("long running operation ended with status {0}")]
    OperationFailed(String),

    #[error("timed out after {0:?} waiting for {1}")]
    Timeout(std::time::Duration, String),

    #[error(transparent)]
    Storage(#[from] azure_core::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("error parsing json at path={path}: {message}")]
    Json { path: String, message: String },

    #[error("invalid {kind} name '{name}'")]
    InvalidName { kind: &'static str, name: String },

    #[error("suffix width must be between 2 and 10, got {0}")]
    InvalidSuffixWidth(usize),

    #[error("storage account {0} returned no access keys")]
    NoAccessKeys(String),
}

impl From<serde_path_to_error::Error<serde_json::Error>> for Error {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Self::Json {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }
}

/// Deserialize a JSON body, reporting the failing path on error.
pub fn from_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    let mut de = serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(&mut de).map_err(|e| {
        log::debug!("BODY START:\n\n{}\n\nBODY END\n", body);
        e.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Outer {
        inner: Inner,
    }
    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Inner {
        count: u32,
    }

    #[test]
    fn test_from_json_reports_path() {
        let err = from_json::<Outer>(r#"{"inner":{"count":"many"}}"#).unwrap_err();
        match err {
            Error::Json { path, .. } => assert_eq!(path, "inner.count"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_from_json_ok() {
        let outer: Outer = from_json(r#"{"inner":{"count":3}}"#).unwrap();
        assert_eq!(outer.inner.count, 3);
    }
}
