//! Storage account, access key and blob container management.

use super::arm::ArmClient;
use crate::config::STORAGE_API_VERSION;
use crate::errors::{Error, Result};
use crate::models::{
    AccessKey, AccountListKeysResult, BlobContainer, StorageAccount, StorageAccountCreate,
};
use serde_json::json;

fn account_path(group: &str, account: &str) -> String {
    format!("/resourceGroups/{group}/providers/Microsoft.Storage/storageAccounts/{account}")
}

/// Create the storage account and wait until provisioning has completed.
pub async fn create_storage_account(
    client: &ArmClient,
    group: &str,
    account: &str,
    location: &str,
) -> Result<StorageAccount> {
    let url = client.resource_url(&account_path(group, account), STORAGE_API_VERSION);
    client
        .put_and_wait(&url, &StorageAccountCreate::standard_lrs(location))
        .await
}

/// List the account access keys, including Kerberos keys.
pub async fn list_keys(client: &ArmClient, group: &str, account: &str) -> Result<Vec<AccessKey>> {
    let url = format!(
        "{}&$expand=kerb",
        client.resource_url(
            &format!("{}/listKeys", account_path(group, account)),
            STORAGE_API_VERSION
        )
    );
    let result: AccountListKeysResult = client.post(&url).await?;
    log::debug!("list_keys({account}) got {} keys", result.keys.len());
    Ok(result.keys)
}

/// The first key of the account is the one used for uploads.
pub fn first_key(account: &str, keys: Vec<AccessKey>) -> Result<AccessKey> {
    keys.into_iter()
        .next()
        .ok_or_else(|| Error::NoAccessKeys(account.to_string()))
}

pub async fn create_container(
    client: &ArmClient,
    group: &str,
    account: &str,
    container: &str,
) -> Result<BlobContainer> {
    let url = client.resource_url(
        &format!(
            "{}/blobServices/default/containers/{container}",
            account_path(group, account)
        ),
        STORAGE_API_VERSION,
    );
    client.put(&url, &json!({})).await
}
