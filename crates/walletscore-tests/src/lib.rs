//! Integration and adversarial test suite for walletscore.
//!
//! Tests drive the full pipeline from raw JSON exports to written artifacts
//! and check ordering, bounds, determinism, and the all-or-nothing output
//! contract under hostile inputs.

pub mod helpers;
