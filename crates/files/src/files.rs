//! File handler: business logic for file metadata CRUD and downloads.

use serde_json::Value;
use tracing::{debug, warn};
use up2share_transport::{Request, Response, Transport};

use crate::error::FilesError;
use crate::types::{FileUpdate, ListQuery, RawDownload};

/// File management calls over a [`Transport`].
pub struct FileHandler<T> {
    transport: T,
}

impl<T: Transport> FileHandler<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Creates a download token for a file (`200`).
    pub async fn create_download_token(&self, file_id: u64) -> Result<Value, FilesError> {
        let resp = self
            .call(Request::get(format!("files/{file_id}/downloadtoken")), &[200])
            .await?;
        Ok(resp.json()?)
    }

    /// Downloads raw file bytes, possibly a partial range (`200` or `206`).
    pub async fn get_raw(&self, file_id: u64, download: &RawDownload) -> Result<Vec<u8>, FilesError> {
        let req = Request::get(format!("files/{file_id}/raw"))
            .with_header("Range", download.range.as_str())
            .with_param("token", download.token.as_str())
            .with_param("dl-token", download.dl_token.as_str())
            .with_param("dl-expiry", download.dl_expiry.as_str());
        let resp = self.call(req, &[200, 206]).await?;
        if resp.status() == 206 {
            debug!(file_id, range = %download.range, "partial content received");
        }
        Ok(resp.into_body())
    }

    /// Lists files matching `query` (`200`). Parameters are validated
    /// before anything is sent.
    pub async fn list(&self, query: &ListQuery) -> Result<Value, FilesError> {
        let mut req = Request::get("files");
        for (name, value) in query.to_params()? {
            req = req.with_param(name, value);
        }
        let resp = self.call(req, &[200]).await?;
        Ok(resp.json()?)
    }

    /// Updates file metadata (`200`) and returns the updated file.
    pub async fn update(&self, file_id: u64, update: &FileUpdate) -> Result<Value, FilesError> {
        let body = serde_json::to_vec(update)?;
        let req = Request::put(format!("files/{file_id}"))
            .with_header("Content-Type", "application/json")
            .with_body(body);
        let resp = self.call(req, &[200]).await?;
        Ok(resp.json()?)
    }

    /// Deletes a file (`204`).
    pub async fn delete(&self, file_id: u64) -> Result<(), FilesError> {
        self.call(Request::delete(format!("files/{file_id}")), &[204])
            .await?;
        debug!(file_id, "file deleted");
        Ok(())
    }

    async fn call(&self, request: Request, expected: &[u16]) -> Result<Response, FilesError> {
        let endpoint = request.endpoint.clone();
        let resp = self
            .transport
            .request(request)
            .await
            .ok_or(FilesError::TransportUnavailable)?;

        if !expected.contains(&resp.status()) {
            let body = resp.text();
            warn!(%endpoint, status = resp.status(), "unexpected API status");
            return Err(FilesError::Api {
                status: resp.status(),
                body,
            });
        }
        Ok(resp)
    }
}
