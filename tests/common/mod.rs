//! Common test helpers shared across integration tests

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)] // Not all helpers are used by every test file

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Package version for testing --version flag
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

const CONFIG_VARS: &[&str] = &[
    "NGSHIM_PATTERN",
    "NGSHIM_MAIN_CLASS",
    "NGSHIM_PORT",
    "NGSHIM_NAME",
    "NGSHIM_SVN_HOME",
    "NGSHIM_LAUNCHER",
    "NGSHIM_LOG",
];

/// Helper to get the compiled binary path
pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ngshim"))
}

/// Helper to create a temporary directory for tests
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Write an executable shell script.
pub fn create_script(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Create `<home>/bin/<name>` as a script and return its path.
pub fn create_native_tool(home: &Path, name: &str, body: &str) -> PathBuf {
    let path = home.join("bin").join(name);
    create_script(&path, body);
    path
}

/// Install the shim under `alias` (for example `jsvn`) inside `dir`.
pub fn install_alias(dir: &Path, alias: &str) -> PathBuf {
    let link = dir.join(alias);
    std::os::unix::fs::symlink(get_binary_path(), &link).unwrap();
    link
}

/// Helper to create a Command isolated from any NGSHIM_* variables in the
/// caller's environment
pub fn test_command(binary: &Path) -> Command {
    let mut cmd = Command::new(binary);
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd
}
