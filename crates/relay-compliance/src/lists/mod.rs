pub mod blacklist;
pub mod ofac;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of one registered list, as reported after each update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMetadata {
    pub name: String,
    pub record_count: usize,
    pub checksum: String,
    pub updated_at: DateTime<Utc>,
}
