//! Local file creation and block blob upload.

use crate::config;
use crate::errors::Result;
use crate::models::LocalFile;
use crate::naming;
use azure_storage::prelude::*;
use azure_storage_blobs::prelude::*;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct UploadOptions {
    pub block_size: usize,
    /// Number of blocks staged at the same time.
    pub parallelism: usize,
}

impl Default for UploadOptions {
    fn default() -> Self {
        UploadOptions {
            block_size: config::UPLOAD_BLOCK_SIZE,
            parallelism: config::UPLOAD_PARALLELISM,
        }
    }
}

pub fn file_contents(suffix: &str) -> String {
    format!("hello from Microsoft. this is a blob {suffix}\n")
}

pub fn blob_url(account: &str, container: &str, blob: &str) -> String {
    format!("https://{account}.blob.core.windows.net/{container}/{blob}")
}

/// Write the demo file `file-<suffix>` into `dir`.
pub async fn write_local_file(dir: &Path, suffix: &str) -> Result<LocalFile> {
    let path = dir.join(naming::file_name(suffix));
    let contents = file_contents(suffix).into_bytes();
    tokio::fs::write(&path, &contents).await?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o700)).await?;
    }
    log::debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(LocalFile { path, contents })
}

/// Cut `data` into blocks with fixed width ids, in upload order.
fn split_blocks(data: &[u8], block_size: usize) -> Vec<(String, Vec<u8>)> {
    data.chunks(block_size.max(1))
        .enumerate()
        .map(|(i, chunk)| (format!("{i:08}"), chunk.to_vec()))
        .collect()
}

/// Upload `file` as a block blob named after the file, authenticating with
/// the storage account access key.
pub async fn upload_file(
    account: &str,
    access_key: &str,
    container: &str,
    file: &LocalFile,
    options: UploadOptions,
) -> Result<()> {
    let blob_name = file.blob_name();
    let credentials = StorageCredentials::access_key(account.to_string(), access_key.to_string());
    let blob_client =
        ClientBuilder::new(account.to_string(), credentials).blob_client(container, &blob_name);

    let data = tokio::fs::read(&file.path).await?;
    log::info!(
        "upload {} bytes to {}",
        data.len(),
        blob_url(account, container, &blob_name)
    );

    if data.is_empty() {
        blob_client.put_block_blob(data).await?;
        return Ok(());
    }

    let blocks = split_blocks(&data, options.block_size);
    let block_ids: Vec<String> = blocks.iter().map(|(id, _)| id.clone()).collect();
    log::debug!(
        "staging {} blocks, parallelism={}",
        blocks.len(),
        options.parallelism
    );

    stream::iter(blocks.into_iter().map(|(id, chunk)| {
        let client = blob_client.clone();
        async move { client.put_block(id, chunk).await.map(|_| ()) }
    }))
    .buffer_unordered(options.parallelism.max(1))
    .try_collect::<Vec<()>>()
    .await?;

    let block_list = BlockList {
        blocks: block_ids
            .into_iter()
            .map(BlobBlockType::new_uncommitted)
            .collect(),
    };
    blob_client.put_block_list(block_list).await?;
    Ok(())
}
