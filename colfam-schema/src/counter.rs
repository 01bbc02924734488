//! Per-family encoded qualifier allocation.

use bitcode::{Decode, Encode};
use colfam_types::QualifierEncoding;
use rustc_hash::FxHashMap;

use crate::reserved::ENCODED_QUALIFIER_INITIAL_VALUE;

/// Tracks the next encoded qualifier number for each column family.
///
/// A counter instance is exclusively owned by the snapshot build that is in
/// progress; published snapshots keep the counter only as carried-forward
/// state. Carrying allocation state into the next generation goes through
/// [`QualifierCounter::copy`], never through aliasing, so readers holding the
/// previous snapshot can never observe in-progress allocation.
///
/// Tables whose encoding scheme assigns no numbers use the explicit
/// [`QualifierCounter::Disabled`] state. It is part of the variant set so
/// callers must handle it, rather than a live map whose methods silently
/// do nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QualifierCounter {
    /// Allocation is active: family name to next-available number.
    Live(FxHashMap<String, u32>),
    /// The table has no numbering encoding scheme; nothing to allocate.
    Disabled,
}

impl QualifierCounter {
    /// Fresh counter with no families allocated yet.
    pub fn new_live() -> Self {
        QualifierCounter::Live(FxHashMap::default())
    }

    /// Counter state appropriate for the given encoding scheme.
    pub fn for_encoding(encoding: QualifierEncoding) -> Self {
        if encoding.is_numbered() {
            Self::new_live()
        } else {
            QualifierCounter::Disabled
        }
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        matches!(self, QualifierCounter::Disabled)
    }

    /// The family's current counter without advancing it.
    ///
    /// Lazily initializes the family to [`ENCODED_QUALIFIER_INITIAL_VALUE`]
    /// on first access; repeated calls without an intervening
    /// [`increment`](Self::increment) return the same value. `None` when the
    /// counter is disabled.
    pub fn peek(&mut self, family: &str) -> Option<u32> {
        match self {
            QualifierCounter::Live(counters) => Some(
                *counters
                    .entry(family.to_string())
                    .or_insert(ENCODED_QUALIFIER_INITIAL_VALUE),
            ),
            QualifierCounter::Disabled => None,
        }
    }

    /// Advance the family's counter by one.
    ///
    /// Returns `false` without mutating anything when the family is absent
    /// (`None` or empty) or the counter is disabled. The new value is
    /// current-or-initial plus one.
    ///
    /// The counter does not know the table's encoding scheme and therefore
    /// performs no max-qualifier bound check; the snapshot builder validates
    /// each allocation against the active scheme before using it.
    pub fn increment(&mut self, family: Option<&str>) -> bool {
        let Some(family) = family else {
            return false;
        };
        if family.is_empty() {
            return false;
        }
        match self {
            QualifierCounter::Live(counters) => {
                let counter = counters
                    .entry(family.to_string())
                    .or_insert(ENCODED_QUALIFIER_INITIAL_VALUE);
                match counter.checked_add(1) {
                    Some(next) => {
                        *counter = next;
                        true
                    }
                    // Qualifier number space exhausted.
                    None => false,
                }
            }
            QualifierCounter::Disabled => false,
        }
    }

    /// Pin a family's counter to an explicit value.
    ///
    /// Used when rehydrating allocation state from the catalog. No-op when
    /// disabled.
    pub fn set(&mut self, family: &str, value: u32) {
        if let QualifierCounter::Live(counters) = self {
            counters.insert(family.to_string(), value);
        }
    }

    /// Deep, independent clone of all family counters.
    ///
    /// The copy and the original share no state: mutating one never affects
    /// the other. This is how a new snapshot build carries forward the prior
    /// generation's allocation state.
    pub fn copy(&self) -> Self {
        match self {
            QualifierCounter::Live(counters) => QualifierCounter::Live(counters.clone()),
            QualifierCounter::Disabled => QualifierCounter::Disabled,
        }
    }

    /// Read-only view of all family counters. Empty when disabled.
    pub fn values(&self) -> impl Iterator<Item = (&str, u32)> {
        let counters = match self {
            QualifierCounter::Live(counters) => Some(counters),
            QualifierCounter::Disabled => None,
        };
        counters
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), *v)))
    }

    /// Export to the serializable form, with entries in a stable order.
    pub fn to_state(&self) -> QualifierCounterState {
        match self {
            QualifierCounter::Live(counters) => {
                let mut entries: Vec<(String, u32)> = counters
                    .iter()
                    .map(|(k, v)| (k.clone(), *v))
                    .collect();
                entries.sort();
                QualifierCounterState {
                    disabled: false,
                    entries,
                }
            }
            QualifierCounter::Disabled => QualifierCounterState {
                disabled: true,
                entries: Vec::new(),
            },
        }
    }

    /// Rebuild from the serializable form.
    pub fn from_state(state: &QualifierCounterState) -> Self {
        if state.disabled {
            return QualifierCounter::Disabled;
        }
        let mut counters = FxHashMap::default();
        for (family, value) in &state.entries {
            counters.insert(family.clone(), *value);
        }
        QualifierCounter::Live(counters)
    }
}

/// Serializable counter state persisted with the rest of the snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct QualifierCounterState {
    pub disabled: bool,
    pub entries: Vec<(String, u32)>,
}
