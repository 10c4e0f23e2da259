//! Crate-level tests that run the whole host.
//!
//! - `determinism.rs`: identical worlds and inputs give identical output
//! - `integration.rs`: end-to-end behavior of the link pose reporter
//! - `helpers.rs`: world builders shared by both

mod helpers;
