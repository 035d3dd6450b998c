//! Instrument State Machines with Authenticated Transitions
//!
//! This crate implements the state-transition protocol for ledger-anchored
//! field-instrumentation points. Each point lives in an entry that carries a
//! conserved value and the instrument's current state; every mutation spends
//! the entry and recreates it, and is gated by:
//!
//! 1. a mode guard on the simulation flag,
//! 2. an Ed25519 signature by the identity designated for the operation,
//! 3. a commitment check: the digest of the successor outputs the spender
//!    declared must equal the digest recomputed from the applied state.
//!
//! # State Model
//!
//! ```text
//! AnalogInput = {
//!     device, engineer:  identity   - authorized signers
//!     value:             i64        - process value, engineering units
//!     field_value:       i64        - last value reported by the device
//!     sim_value:         i64        - last value forced by the engineer
//!     bad_signal:        bool       - quality flag (reserved)
//!     is_sim:            bool       - simulation-mode flag
//!     factor, offset:    i64        - scaling constants (reserved)
//! }
//!
//! DigitalInput adds invert and per-edge debounce delays; its process value
//! is boolean and value changes may settle after a configured delay.
//! ```
//!
//! # Transitions
//!
//! | operation           | signer   | mode guard        | effect                 |
//! |---------------------|----------|-------------------|------------------------|
//! | update_field_value  | device   | `is_sim == false` | field_value -> value   |
//! | set_simulation_mode | engineer | none              | sets is_sim            |
//! | simulate_value      | engineer | `is_sim == true`  | sim_value -> value     |
//!
//! All operations are pure: they take `&self` and return the successor state,
//! so a rejected transition leaves the caller's state untouched.

pub mod analog;
pub mod commitment;
pub mod context;
pub mod debounce;
pub mod digital;
pub mod error;
pub mod transition;

pub use analog::AnalogInput;
pub use commitment::{entry_digest, expected_commitment, CanonicalState, RemainderOutput};
pub use context::{OpKind, Operand, TransitionContext};
pub use debounce::{filter_value_change, PendingSettle, ValueChange};
pub use digital::{DigitalInput, DigitalUpdate};
pub use error::TransitionError;
pub use transition::TransitionRequest;
