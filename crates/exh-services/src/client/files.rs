use bytes::Bytes;
use exh_client::{Request, Result, FILES_BASE};
use tracing::instrument;

use crate::common::{segment, AffectedRecords, PagedResult};
use crate::files::FileDetails;

impl super::FilesService {
    /// List files matching an RQL expression.
    #[instrument(skip(self))]
    pub async fn find(&self, rql: &str) -> Result<PagedResult<FileDetails>> {
        let request = Request::get(format!("{FILES_BASE}/")).rql(rql);
        self.client.send(request).await?.json()
    }

    #[instrument(skip(self, file_token))]
    pub async fn details(&self, file_token: &str) -> Result<FileDetails> {
        self.client
            .get_json(format!("{FILES_BASE}/{}/details", segment(file_token)))
            .await
    }

    /// Download the file contents.
    #[instrument(skip(self, file_token))]
    pub async fn retrieve(&self, file_token: &str) -> Result<Bytes> {
        self.client
            .get_bytes(format!("{FILES_BASE}/{}/file", segment(file_token)))
            .await
    }

    #[instrument(skip(self, file_token))]
    pub async fn remove(&self, file_token: &str) -> Result<AffectedRecords> {
        self.client
            .delete_json(format!("{FILES_BASE}/{}", segment(file_token)))
            .await
    }
}
