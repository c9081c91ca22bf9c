//! # ngshim
//!
//! A dispatch shim for tools that can run either inside a long-lived Nailgun
//! server or as a native executable. The joined command line is matched
//! against a pattern; matching invocations go through the `ng` client, the
//! rest run `<svn_home>/bin/<name>` directly. The child's exit code becomes
//! the shim's exit code.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod logging;
