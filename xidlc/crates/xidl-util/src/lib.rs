//! xidl-util - Shared infrastructure for the XIDL compiler.
//!
//! This crate holds the pieces every phase needs: the diagnostic error
//! type and the scoped-name helpers used by the parser and the code
//! generator.

pub mod error;
pub mod name;

pub use error::{Error, Result};
pub use name::{base_part, is_rooted, join_dotted, scope_part, scoped_name, split_scoped};
