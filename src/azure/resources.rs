//! Resource group create and delete.

use super::arm::ArmClient;
use crate::config::RESOURCES_API_VERSION;
use crate::errors::Result;
use crate::models::{ResourceGroup, ResourceGroupCreate};

fn group_url(client: &ArmClient, name: &str) -> String {
    client.resource_url(&format!("/resourcegroups/{name}"), RESOURCES_API_VERSION)
}

/// Create (or update) the resource group for the deployment.
pub async fn create_group(client: &ArmClient, name: &str, location: &str) -> Result<ResourceGroup> {
    log::debug!("create_group({name}, {location})");
    client
        .put(&group_url(client, name), &ResourceGroupCreate { location })
        .await
}

/// Delete the resource group and everything in it, waiting for completion.
pub async fn delete_group(client: &ArmClient, name: &str) -> Result<()> {
    log::debug!("delete_group({name})");
    client.delete_and_wait(&group_url(client, name)).await
}
