//! XML escaping helpers used by the IR and the serializer.

mod escape;

pub use escape::{escape_attr, escape_text, unescape_text};
