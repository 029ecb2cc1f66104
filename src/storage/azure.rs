use async_trait::async_trait;
use tracing::debug;

use super::error::StorageError;
use super::BlobStore;

/// Azure Blob Storage client over the plain REST surface.
///
/// Auth is a SAS token appended to every request. The container-list call
/// returns XML; blob names are scraped from `<Name>` elements directly since
/// that is the only field consumed.
pub struct AzureBlobStore {
    http: reqwest::Client,
    account: String,
    sas_token: Option<String>,
}

impl AzureBlobStore {
    pub fn new(account: impl Into<String>, sas_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            account: account.into(),
            sas_token,
        }
    }

    /// Builds the store from application [`Config`](crate::config::Config).
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(
            config.storage_account.clone(),
            config.storage_sas_token.clone(),
        )
    }

    fn blob_url(&self, container: &str, name: &str) -> Result<String, StorageError> {
        let sas = self.sas_token.as_deref().ok_or(StorageError::Auth)?;
        Ok(format!(
            "https://{}.blob.core.windows.net/{}/{}?{}",
            self.account, container, name, sas
        ))
    }

    fn list_url(&self, container: &str) -> Result<String, StorageError> {
        let sas = self.sas_token.as_deref().ok_or(StorageError::Auth)?;
        Ok(format!(
            "https://{}.blob.core.windows.net/{}?restype=container&comp=list&{}",
            self.account, container, sas
        ))
    }

    fn scrape_blob_names(listing: &str) -> Vec<String> {
        let mut names = Vec::new();
        let mut rest = listing;
        while let Some(start) = rest.find("<Name>") {
            rest = &rest[start + "<Name>".len()..];
            if let Some(end) = rest.find("</Name>") {
                names.push(rest[..end].to_string());
                rest = &rest[end..];
            } else {
                break;
            }
        }
        names
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn list(&self, container: &str) -> Result<Vec<String>, StorageError> {
        let response = self.http.get(self.list_url(container)?).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Api {
                status: status.as_u16(),
                container: container.to_string(),
                name: String::new(),
            });
        }

        let body = response.text().await?;
        Ok(Self::scrape_blob_names(&body))
    }

    async fn exists(&self, container: &str, name: &str) -> Result<bool, StorageError> {
        let response = self
            .http
            .head(self.blob_url(container, name)?)
            .send()
            .await?;

        match response.status().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(StorageError::Api {
                status,
                container: container.to_string(),
                name: name.to_string(),
            }),
        }
    }

    async fn get(&self, container: &str, name: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .http
            .get(self.blob_url(container, name)?)
            .send()
            .await?;

        match response.status().as_u16() {
            200 => Ok(response.bytes().await?.to_vec()),
            404 => Err(StorageError::NotFound {
                container: container.to_string(),
                name: name.to_string(),
            }),
            status => Err(StorageError::Api {
                status,
                container: container.to_string(),
                name: name.to_string(),
            }),
        }
    }

    async fn put(
        &self,
        container: &str,
        name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        debug!(container, name, bytes = data.len(), "Uploading blob");

        let response = self
            .http
            .put(self.blob_url(container, name)?)
            .header("x-ms-blob-type", "BlockBlob")
            .header("Content-Type", content_type)
            .body(data)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Api {
                status: status.as_u16(),
                container: container.to_string(),
                name: name.to_string(),
            });
        }

        Ok(())
    }
}
