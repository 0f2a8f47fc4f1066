//! Request and response models for the Azure resources the quickstart touches.
//!
//! - [`ResourceGroup`] - resource group returned by ARM
//! - [`StorageAccount`], [`AccessKey`], [`BlobContainer`] - storage resources
//! - [`LocalFile`] - the file written to disk and uploaded

mod local_file;
mod resource_group;
mod storage;

pub use local_file::LocalFile;
pub use resource_group::{ResourceGroup, ResourceGroupCreate};
pub use storage::{
    AccessKey, AccountListKeysResult, BlobContainer, Sku, StorageAccount, StorageAccountCreate,
};

use serde::{Deserialize, Serialize};

/// `properties` block shared by ARM resources that report provisioning.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningProperties {
    pub provisioning_state: Option<String>,
}
