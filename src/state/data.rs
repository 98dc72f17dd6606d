/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the pairing store and the UI layer.

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

/// Identity of a scan record, allocated by the pairing store.
///
/// Two scans of the same QR code get different ids, so they stay
/// separately selectable and removable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScanId(pub(crate) u64);

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scan#{}", self.0)
    }
}

/// Represents one captured QR scan
#[derive(Debug, Clone)]
pub struct ScanRecord {
    /// Identity within the store
    pub id: ScanId,
    /// Photo the scan was decoded from (owned by the filesystem, only referenced here)
    pub photo: PathBuf,
    /// Text payload decoded from the QR code
    pub value: String,
    /// When the scan was added
    pub captured_at: DateTime<Utc>,
}

// Equality is identity, never the decoded value
impl PartialEq for ScanRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ScanRecord {}

/// Two scan records joined by the user, in selection order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub first: ScanRecord,
    pub second: ScanRecord,
}

impl Pair {
    /// Ids of both members as (first, second)
    pub fn ids(&self) -> (ScanId, ScanId) {
        (self.first.id, self.second.id)
    }

    /// Decoded values as (first, second)
    pub fn values(&self) -> (&str, &str) {
        (&self.first.value, &self.second.value)
    }
}
