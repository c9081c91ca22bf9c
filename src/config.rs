//! Dispatch configuration.
//!
//! Every value is a placeholder that is normally fixed when the shim is built
//! (`NGSHIM_PORT=2069 cargo build`). The same variable set at runtime takes
//! precedence, which lets one installed binary serve several tools.

use crate::error::DispatchError;
use regex::Regex;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub const PATTERN_VAR: &str = "NGSHIM_PATTERN";
pub const MAIN_CLASS_VAR: &str = "NGSHIM_MAIN_CLASS";
pub const PORT_VAR: &str = "NGSHIM_PORT";
pub const NAME_VAR: &str = "NGSHIM_NAME";
pub const SVN_HOME_VAR: &str = "NGSHIM_SVN_HOME";
pub const LAUNCHER_VAR: &str = "NGSHIM_LAUNCHER";

pub const DEFAULT_MAIN_CLASS: &str = "org.tmatesoft.svn.core.test.NailgunProcessor";
pub const DEFAULT_PORT: u16 = 1729;

#[cfg(windows)]
pub const DEFAULT_LAUNCHER: &str = "ng.exe";
#[cfg(not(windows))]
pub const DEFAULT_LAUNCHER: &str = "ng";

/// Value of a placeholder as substituted at build time, if any.
fn build_time(key: &str) -> Option<&'static str> {
    match key {
        PATTERN_VAR => option_env!("NGSHIM_PATTERN"),
        MAIN_CLASS_VAR => option_env!("NGSHIM_MAIN_CLASS"),
        PORT_VAR => option_env!("NGSHIM_PORT"),
        NAME_VAR => option_env!("NGSHIM_NAME"),
        SVN_HOME_VAR => option_env!("NGSHIM_SVN_HOME"),
        LAUNCHER_VAR => option_env!("NGSHIM_LAUNCHER"),
        _ => None,
    }
}

/// Look a placeholder up in the process environment, then in the build-time constants.
pub fn env_lookup(key: &str) -> Option<String> {
    layered(std::env::var(key).ok(), build_time(key))
}

/// Combine a runtime value with its build-time counterpart.
///
/// An empty runtime value falls back to the build-time one. It is only kept
/// when nothing was substituted at build time.
fn layered(runtime: Option<String>, build: Option<&str>) -> Option<String> {
    match runtime {
        Some(value) if !value.is_empty() => Some(value),
        runtime => build.map(str::to_string).or(runtime),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// A compiled dispatch pattern.
///
/// Matching is anchored at the start of the joined command line, so
/// `commit` matches `commit -m msg` but not `log --with-commit`.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source`, anchoring it at the start of the subject.
    ///
    /// The syntax is that of the `regex` crate: no lookaround and no
    /// backreferences. An empty pattern matches every command line.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Config`] when `source` is not a valid regex.
    pub fn new(source: &str) -> Result<Self, DispatchError> {
        let regex = Regex::new(&format!("^(?:{source})")).map_err(|e| {
            DispatchError::Config(format!("{PATTERN_VAR} is not a valid regex: {e}"))
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn is_match(&self, subject: &str) -> bool {
        self.regex.is_match(subject)
    }
}

/// Everything the dispatcher needs to build a command vector.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// `None` means the tool is never sent to the server.
    pub pattern: Option<Pattern>,
    pub main_class: String,
    pub port: u16,
    pub name: String,
    pub svn_home: PathBuf,
    pub launcher: String,
}

impl DispatchConfig {
    /// Resolve the configuration for the program invoked as `program`.
    ///
    /// `lookup` supplies placeholder values; pass [`env_lookup`] outside tests.
    /// When `NGSHIM_NAME` is unset the name is derived from `program`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Config`] for an invalid pattern or port, or
    /// when the command name or install directory cannot be determined.
    pub fn resolve<F>(lookup: F, program: Option<&OsStr>) -> Result<Self, DispatchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // An empty pattern is kept: it matches everything.
        let pattern = lookup(PATTERN_VAR)
            .as_deref()
            .map(Pattern::new)
            .transpose()?;

        let port = match non_empty(lookup(PORT_VAR)) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|p| *p > 0)
                .ok_or_else(|| {
                    DispatchError::Config(format!("{PORT_VAR} is not a port number: {raw}"))
                })?,
            None => DEFAULT_PORT,
        };

        let name = non_empty(lookup(NAME_VAR))
            .or_else(|| program.and_then(name_from_program))
            .ok_or_else(|| DispatchError::Config(format!("no command name; set {NAME_VAR}")))?;

        let svn_home = non_empty(lookup(SVN_HOME_VAR))
            .map(PathBuf::from)
            .ok_or_else(|| DispatchError::Config(format!("{SVN_HOME_VAR} is not set")))?;

        Ok(Self {
            pattern,
            main_class: non_empty(lookup(MAIN_CLASS_VAR))
                .unwrap_or_else(|| DEFAULT_MAIN_CLASS.to_string()),
            port,
            name,
            svn_home,
            launcher: non_empty(lookup(LAUNCHER_VAR))
                .unwrap_or_else(|| DEFAULT_LAUNCHER.to_string()),
        })
    }
}

/// Derive the logical command name from the shim's own file name.
///
/// Shims are installed as `j<tool>` (`jsvn`, `jsvnadmin`), so a leading `j`
/// is dropped. Returns `None` when nothing is left.
#[must_use]
pub fn name_from_program(program: &OsStr) -> Option<String> {
    let stem = Path::new(program).file_stem()?.to_string_lossy();
    let name = stem.strip_prefix('j').unwrap_or(&stem);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
