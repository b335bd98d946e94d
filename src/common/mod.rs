//! Common utilities shared across the conversion passes.

pub mod encoding;
pub mod xml;
