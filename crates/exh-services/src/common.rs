//! Response shapes shared by every service.

use serde::{Deserialize, Serialize};

/// One page of a list endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PagedResult<T> {
    pub page: Page,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Paging information of a [`PagedResult`].
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Page {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
}

/// Number of records touched by an update or delete.
///
/// The wire's `records_affected` / `recordsAffected` variants arrive here
/// already renamed.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AffectedRecords {
    #[serde(default)]
    pub affected_records: u64,
}

/// Percent-encode a single path segment.
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
