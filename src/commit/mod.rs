//! Commit message synthesis and validation.

pub mod lint;
pub mod message;

pub use lint::{check_header, header_too_long};
pub use message::{GroupOverride, ResolvedMessage, format_commit_message, resolve_message};
