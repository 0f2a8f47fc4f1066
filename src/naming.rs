//! Generated resource names.
//!
//! Every name in a run shares one random numeric suffix so repeated runs do
//! not collide on globally unique storage account names.

use crate::errors::{Error, Result};
use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

static ACCOUNT_REGEX: OnceLock<Regex> = OnceLock::new();
static CONTAINER_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_account_regex() -> &'static Regex {
    ACCOUNT_REGEX.get_or_init(|| Regex::new(r"^[a-z0-9]{3,24}$").expect("Invalid Regex"))
}

fn get_container_regex() -> &'static Regex {
    CONTAINER_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([a-z0-9-]{1,61})[a-z0-9]$").expect("Invalid Regex")
    })
}

/// Produce a zero padded random decimal string of `size` digits.
///
/// For `size = 6` the result lies between `000000` and `999999`.
///
/// # Errors
/// * `InvalidSuffixWidth` - if `size` is outside `2..=10`
pub fn random_num_string(size: usize) -> Result<String> {
    if !(2..=10).contains(&size) {
        return Err(Error::InvalidSuffixWidth(size));
    }
    let upper = 10u64.pow(size as u32);
    let num = rand::thread_rng().gen_range(0..upper);
    Ok(format!("{num:0size$}"))
}

pub fn account_name(suffix: &str) -> String {
    format!("acct{suffix}")
}

pub fn container_name(suffix: &str) -> String {
    format!("cont{suffix}")
}

pub fn file_name(suffix: &str) -> String {
    format!("file-{suffix}")
}

/// Storage account names: 3 to 24 lowercase letters or digits.
pub fn validate_account_name(name: &str) -> Result<()> {
    if get_account_regex().is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidName {
            kind: "storage account",
            name: name.to_string(),
        })
    }
}

/// Container names: 3 to 63 lowercase letters, digits or single hyphens,
/// starting and ending with a letter or digit.
pub fn validate_container_name(name: &str) -> Result<()> {
    if get_container_regex().is_match(name) && !name.contains("--") {
        Ok(())
    } else {
        Err(Error::InvalidName {
            kind: "container",
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_num_string_width() {
        for size in 2..=10 {
            let s = random_num_string(size).expect("valid width");
            assert_eq!(s.len(), size, "wrong width for {s}");
            assert!(s.chars().all(|c| c.is_ascii_digit()), "not numeric: {s}");
        }
    }

    #[test]
    fn test_random_num_string_rejects_width() {
        assert!(matches!(
            random_num_string(1),
            Err(Error::InvalidSuffixWidth(1))
        ));
        assert!(matches!(
            random_num_string(11),
            Err(Error::InvalidSuffixWidth(11))
        ));
        assert!(random_num_string(0).is_err());
    }

    #[test]
    fn test_names_from_suffix() {
        assert_eq!(account_name("004217"), "acct004217");
        assert_eq!(container_name("004217"), "cont004217");
        assert_eq!(file_name("004217"), "file-004217");
    }

    #[test]
    fn test_generated_names_are_valid() {
        let suffix = random_num_string(crate::config::SUFFIX_WIDTH).unwrap();
        validate_account_name(&account_name(&suffix)).unwrap();
        validate_container_name(&container_name(&suffix)).unwrap();
    }

    #[test]
    fn test_account_name_rules() {
        assert!(validate_account_name("ab").is_err());
        assert!(validate_account_name("Acct123").is_err());
        assert!(validate_account_name("acct-123").is_err());
        assert!(validate_account_name(&"a".repeat(25)).is_err());
        assert!(validate_account_name(&"a".repeat(24)).is_ok());
    }

    #[test]
    fn test_container_name_rules() {
        assert!(validate_container_name("my-container").is_ok());
        assert!(validate_container_name("abc").is_ok());
        assert!(validate_container_name("ab").is_err());
        assert!(validate_container_name("-abc").is_err());
        assert!(validate_container_name("abc-").is_err());
        assert!(validate_container_name("a--b").is_err());
        assert!(validate_container_name("ABC").is_err());
        assert!(validate_container_name(&"a".repeat(64)).is_err());
        assert!(validate_container_name(&"a".repeat(63)).is_ok());
    }
}
