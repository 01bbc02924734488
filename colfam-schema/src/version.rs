//! Snapshot versioning metadata.

use bitcode::{Decode, Encode};

use crate::reserved::INDEX_ENABLED_TIMESTAMP;

/// Version and freshness metadata of a table snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Encode, Decode)]
pub struct VersionInfo {
    /// When this snapshot was created.
    pub timestamp: u64,
    /// Monotonic DDL counter, starting at 0 at table creation and strictly
    /// increasing across snapshots of the same logical table.
    pub sequence_number: u64,
    /// Number of columns inherited from the parent at creation time.
    pub base_column_count: u32,
    /// How long cached copies of this snapshot stay fresh, in milliseconds.
    pub update_cache_frequency_ms: u64,
    /// When the index was disabled; [`INDEX_ENABLED_TIMESTAMP`] while the
    /// index is live.
    pub index_disable_timestamp: u64,
}

impl VersionInfo {
    /// Whether the index this snapshot describes is enabled.
    #[inline]
    pub fn is_index_enabled(&self) -> bool {
        self.index_disable_timestamp == INDEX_ENABLED_TIMESTAMP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_enabled_sentinel() {
        let mut version = VersionInfo {
            timestamp: 10,
            sequence_number: 0,
            base_column_count: 0,
            update_cache_frequency_ms: 0,
            index_disable_timestamp: INDEX_ENABLED_TIMESTAMP,
        };
        assert!(version.is_index_enabled());
        version.index_disable_timestamp = 42;
        assert!(!version.is_index_enabled());
    }
}
