//! Azure storage quickstart.
//!
//! Signs in with the device code flow, creates a resource group, a storage
//! account and a blob container, uploads one file, and offers to delete the
//! resource group again.

pub mod azure;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod naming;
pub mod prompt;

use azure::{ArmClient, DeviceCodeCredential, UploadOptions};
use colored::Colorize;
use config::Cli;
use errors::Result;
use std::path::Path;

/// Names shared by one run, all derived from the same random suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct RunNames {
    pub suffix: String,
    pub account: String,
    pub container: String,
}

impl RunNames {
    pub fn generate() -> Result<RunNames> {
        RunNames::from_suffix(&naming::random_num_string(config::SUFFIX_WIDTH)?)
    }

    pub fn from_suffix(suffix: &str) -> Result<RunNames> {
        let names = RunNames {
            suffix: suffix.to_string(),
            account: naming::account_name(suffix),
            container: naming::container_name(suffix),
        };
        naming::validate_account_name(&names.account)?;
        naming::validate_container_name(&names.container)?;
        Ok(names)
    }
}

/// Ask on stdin whether the resource group should be deleted.
pub async fn confirm_delete(group: &str) -> Result<bool> {
    let question = format!("Do you want to delete the Resource Group {group}");
    Ok(prompt::confirm_blocking(
        std::io::BufReader::new(std::io::stdin()),
        std::io::stdout(),
        question,
        config::CONFIRM_TRIES,
    )
    .await?)
}

/// Run the whole quickstart. Any error ends the run; resources created up to
/// that point are left in place.
pub async fn run(cli: &Cli) -> Result<()> {
    let names = RunNames::generate()?;
    let group = cli.resource_group.as_str();
    let http = reqwest::Client::new();

    let credential = DeviceCodeCredential::new(
        http.clone(),
        config::AUTHORITY_HOST,
        &cli.tenant_id,
        &cli.app_id,
    );
    let token = credential.authenticate(config::ARM_SCOPE).await?;
    let arm = ArmClient::new(http, config::ARM_ENDPOINT, &cli.subscription_id, token)
        .with_refresh(credential, config::ARM_SCOPE);

    // Resource group for the storage account
    let created = azure::create_group(&arm, group, &cli.location).await?;
    log::info!("Created group: {}", created.name.green());

    log::info!("Creating storageAcct1: {}", names.account);
    let account =
        azure::create_storage_account(&arm, group, &names.account, &cli.location).await?;
    log::info!(
        "Completed storage creation {}: {}",
        names.account,
        account.provisioning_state()
    );

    log::info!("Getting access key1 for {}", names.account);
    let keys = azure::list_keys(&arm, group, &names.account).await?;
    let key1 = azure::first_key(&names.account, keys)?;

    let container = azure::create_container(&arm, group, &names.account, &names.container).await?;
    log::info!("Completed storage container creation {} ", container.name);

    let file = azure::write_local_file(Path::new("."), &names.suffix).await?;
    println!("Uploading file with blob name: {}\n", file.blob_name());
    azure::upload_file(
        &names.account,
        &key1.value,
        &names.container,
        &file,
        UploadOptions::default(),
    )
    .await?;

    if confirm_delete(group).await? {
        azure::delete_group(&arm, group).await?;
        log::info!("Resource Group deleted");
    } else {
        log::info!("Leaving Resource Group: {}", group);
    }
    log::info!("All Done!  Thanks for playing.");
    Ok(())
}
