//! Azure AD and Azure REST interaction.
//!
//! This module handles all Azure-related operations:
//! - [`auth`] - Device code sign-in
//! - [`arm`] - Resource Manager client with long running operation polling
//! - [`resources`] - Resource group create/delete
//! - [`storage`] - Storage account, keys and containers
//! - [`blob`] - Local file creation and blob upload

pub mod arm;
pub mod auth;
pub mod blob;
pub mod resources;
pub mod storage;

pub use arm::ArmClient;
pub use auth::{AccessToken, DeviceCodeCredential};
pub use blob::{upload_file, write_local_file, UploadOptions};
pub use resources::{create_group, delete_group};
pub use storage::{create_container, create_storage_account, first_key, list_keys};
