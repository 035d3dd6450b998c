//! Debounce filter for digital value changes.
//!
//! A digital point may be configured to suppress rapid toggling: a falling
//! edge (true -> false) settles after `off_time_delay_ms`, a rising edge
//! (false -> true) after `on_time_delay_ms`. A zero delay for the relevant
//! edge makes the change immediate. The filter is a pure decision function;
//! scheduling the deferred settlement is the ledger arena's job, which keeps
//! exactly one pending slot per instrument and replaces it on every new
//! transition.

use serde::{Deserialize, Serialize};

/// A scheduled value settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSettle {
    /// Value to store when the deadline passes.
    pub target: bool,
    /// Deadline, epoch milliseconds.
    pub due_at_ms: u64,
}

impl PendingSettle {
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms >= self.due_at_ms
    }
}

/// Outcome of filtering one requested value change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueChange {
    /// Requested value equals the current one; nothing to do.
    Unchanged,
    /// Store this value now.
    Immediate(bool),
    /// Store the target when the deadline passes, unless superseded.
    Deferred(PendingSettle),
}

/// Decide how a requested value change settles.
///
/// `current` is the stored process value, `requested` the raw new value.
/// The `invert` polarity flag is applied to the stored result on both the
/// immediate and the deferred path.
pub fn filter_value_change(
    current: bool,
    requested: bool,
    invert: bool,
    off_time_delay_ms: u64,
    on_time_delay_ms: u64,
    now_ms: u64,
) -> ValueChange {
    if current == requested {
        return ValueChange::Unchanged;
    }

    let stored = if invert { !requested } else { requested };
    // current == true means this is the falling edge.
    let delay_ms = if current {
        off_time_delay_ms
    } else {
        on_time_delay_ms
    };

    if delay_ms == 0 {
        ValueChange::Immediate(stored)
    } else {
        ValueChange::Deferred(PendingSettle {
            target: stored,
            due_at_ms: now_ms.saturating_add(delay_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_request_is_filtered_out() {
        assert_eq!(
            filter_value_change(true, true, false, 5_000, 5_000, 0),
            ValueChange::Unchanged
        );
        assert_eq!(
            filter_value_change(false, false, false, 5_000, 5_000, 0),
            ValueChange::Unchanged
        );
    }

    #[test]
    fn zero_delay_settles_immediately() {
        assert_eq!(
            filter_value_change(true, false, false, 0, 5_000, 1_000),
            ValueChange::Immediate(false)
        );
        assert_eq!(
            filter_value_change(false, true, false, 5_000, 0, 1_000),
            ValueChange::Immediate(true)
        );
    }

    #[test]
    fn falling_edge_uses_off_delay() {
        assert_eq!(
            filter_value_change(true, false, false, 5_000, 7_000, 1_000),
            ValueChange::Deferred(PendingSettle {
                target: false,
                due_at_ms: 6_000
            })
        );
    }

    #[test]
    fn rising_edge_uses_on_delay() {
        assert_eq!(
            filter_value_change(false, true, false, 5_000, 7_000, 1_000),
            ValueChange::Deferred(PendingSettle {
                target: true,
                due_at_ms: 8_000
            })
        );
    }

    #[test]
    fn invert_applies_on_both_paths() {
        assert_eq!(
            filter_value_change(true, false, true, 0, 0, 0),
            ValueChange::Immediate(true)
        );
        assert_eq!(
            filter_value_change(false, true, true, 5_000, 3_000, 1_000),
            ValueChange::Deferred(PendingSettle {
                target: false,
                due_at_ms: 4_000
            })
        );
    }

    #[test]
    fn deadline_comparison_is_inclusive() {
        let pending = PendingSettle {
            target: false,
            due_at_ms: 6_000,
        };
        assert!(!pending.is_due(5_999));
        assert!(pending.is_due(6_000));
        assert!(pending.is_due(6_001));
    }
}
