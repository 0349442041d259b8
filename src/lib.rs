//! implgen - Generate explicit interface implementations for annotated C# types
//!
//! The pipeline lives in `implgen-core` and the `implgen` binary in
//! `implgen-cli`; this package re-exports the core and hosts the
//! workspace-level integration tests.
pub use implgen_core::*;
