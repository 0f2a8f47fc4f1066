//! Command line flags and fixed settings for the quickstart run.

use clap::Parser;
use std::time::Duration;

pub const RESOURCE_GROUP_NAME: &str = "Quickstart-RG";
pub const LOCATION: &str = "eastus";

/// Width of the random numeric suffix shared by all generated names.
pub const SUFFIX_WIDTH: usize = 6;
pub const CONFIRM_TRIES: usize = 3;

pub const UPLOAD_BLOCK_SIZE: usize = 4 * 1024 * 1024;
pub const UPLOAD_PARALLELISM: usize = 16;

pub const ARM_ENDPOINT: &str = "https://management.azure.com";
pub const ARM_SCOPE: &str = "https://management.azure.com/.default";
pub const AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

pub const RESOURCES_API_VERSION: &str = "2019-05-01";
pub const STORAGE_API_VERSION: &str = "2019-06-01";

/// Delay between long running operation polls when Azure sends no Retry-After.
pub const POLL_DELAY: Duration = Duration::from_secs(5);
/// Upper bound for a single long running operation.
pub const POLL_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Provision a resource group, storage account and blob container, upload a
/// file, then optionally delete everything again.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// Azure SubscriptionId (Required)
    #[arg(long = "subid", env = "AZURE_SUBSCRIPTION_ID")]
    pub subscription_id: String,

    /// App Registration Id (Required)
    #[arg(long = "appid", env = "AZURE_CLIENT_ID")]
    pub app_id: String,

    /// Tenant Id (Required)
    #[arg(long = "tenantid", env = "AZURE_TENANT_ID")]
    pub tenant_id: String,

    /// Resource group to create (and optionally delete)
    #[arg(long = "resource-group", default_value = RESOURCE_GROUP_NAME)]
    pub resource_group: String,

    /// Azure region for all resources
    #[arg(long, default_value = LOCATION)]
    pub location: String,
}
