//! Core interfaces between the pipeline and its host
//!
//! The host supplies a [`TypeSystemProvider`] and receives output through a
//! [`SourceSink`]. Concrete implementations live in [`crate::services`].

pub mod source_sink;
pub mod type_system;

pub use source_sink::SourceSink;
pub use type_system::{MemberSymbol, TypeSystemProvider};
