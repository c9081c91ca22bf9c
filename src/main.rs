//! # ngshim
//!
//! Route a tool invocation to a Nailgun server or to the native executable.
//!
//! ## Usage
//!
//! - As a tool alias: link or copy the binary to `jsvn` and run `jsvn commit -m msg`
//! - Inspect a decision: `ngshim --name svn --dry-run commit -m msg`
//!
//! See README.md for the configuration variables.

/// Entry point for the shim.
fn main() {
    std::process::exit(ngshim::cli::run_cli());
}
