//! CLI command implementations.

pub mod bootstrap;
pub mod check;
pub mod media;
