//! Edits a host applies to an already laid-out map.
//!
//! None of these re-run the layout; only the edited node is re-measured.

mod editing;
mod node;

pub use editing::*;
pub use node::*;
