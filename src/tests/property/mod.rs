//! Property-based tests for the initiative engine
//!
//! These run random command sequences against a [`CombatState`] and check
//! the invariants that must hold after every step, rather than testing
//! specific cases.
//!
//! ## Test Modules
//!
//! - `initiative_props`: roster ordering, turn pointer and wound invariants
//!   - Roster is sorted by initiative, then name, descending
//!   - The turn pointer is `None` or a valid index
//!   - After an advance, the holder can act whenever anybody can
//!   - Wounds never drop below zero
//!   - Critical flag matches a roll of 20
//!
//! By default, proptest runs 256 cases per property. This can be configured
//! via the `PROPTEST_CASES` environment variable:
//!
//! ```sh
//! PROPTEST_CASES=1000 cargo test property --release
//! ```
//!
//! [`CombatState`]: crate::core::session::CombatState

mod initiative_props;
