//! Route an invocation to the Nailgun server or to the native executable.

use crate::config::{DispatchConfig, Pattern};
use serde::Serialize;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Flag the Nailgun client uses to select the server port.
pub const NAILGUN_PORT_FLAG: &str = "--nailgun-port";

/// Where an invocation is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Invocation {
    /// Forward through the Nailgun client to the background server.
    Remote {
        launcher: String,
        main_class: String,
        port: u16,
        name: String,
    },
    /// Run `<svn_home>/bin/<name>` directly.
    Local { executable: PathBuf },
}

impl Invocation {
    /// Pick the target for `args` under `config`.
    #[must_use]
    pub fn select(config: &DispatchConfig, args: &[OsString]) -> Self {
        let joined = join_args(args);
        let remote = config
            .pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(&joined));

        tracing::debug!(
            command_line = %joined,
            pattern = config.pattern.as_ref().map(Pattern::as_str),
            remote,
            "matched invocation"
        );

        if remote {
            Self::Remote {
                launcher: config.launcher.clone(),
                main_class: config.main_class.clone(),
                port: config.port,
                name: config.name.clone(),
            }
        } else {
            Self::Local {
                executable: config.svn_home.join("bin").join(&config.name),
            }
        }
    }

    /// The leading, non-passthrough part of the command vector.
    #[must_use]
    pub fn prefix(&self) -> Vec<OsString> {
        match self {
            Self::Remote {
                launcher,
                main_class,
                port,
                name,
            } => vec![
                launcher.into(),
                main_class.into(),
                NAILGUN_PORT_FLAG.into(),
                port.to_string().into(),
                name.into(),
            ],
            Self::Local { executable } => vec![executable.clone().into_os_string()],
        }
    }

    /// The full command vector: the prefix followed by `args` in order.
    #[must_use]
    pub fn command_vector(&self, args: &[OsString]) -> Vec<OsString> {
        let mut argv = self.prefix();
        argv.extend(args.iter().cloned());
        argv
    }
}

/// Join arguments with single spaces for pattern matching.
///
/// Arguments that are not valid UTF-8 are converted lossily; they are still
/// passed to the child unchanged.
#[must_use]
pub fn join_args(args: &[OsString]) -> String {
    args.iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A dispatch decision together with the command vector it produces.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    #[serde(flatten)]
    invocation: Invocation,
    #[serde(serialize_with = "serialize_lossy")]
    argv: Vec<OsString>,
}

impl Plan {
    #[must_use]
    pub fn new(config: &DispatchConfig, args: &[OsString]) -> Self {
        let invocation = Invocation::select(config, args);
        let argv = invocation.command_vector(args);
        Self { invocation, argv }
    }

    #[must_use]
    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// The complete command vector, `argv[0]` included.
    #[must_use]
    pub fn argv(&self) -> &[OsString] {
        &self.argv
    }

    /// The program to spawn.
    #[must_use]
    pub fn program(&self) -> &OsStr {
        // Never empty: both invocation kinds contribute a prefix.
        &self.argv[0]
    }

    /// Arguments to the program, excluding `argv[0]`.
    #[must_use]
    pub fn program_args(&self) -> &[OsString] {
        &self.argv[1..]
    }

    /// Format as JSON for `--dry-run`.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

fn serialize_lossy<S>(argv: &[OsString], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(argv.iter().map(|arg| arg.to_string_lossy()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn svn_config(pattern: Option<&str>) -> DispatchConfig {
        DispatchConfig {
            pattern: pattern.map(|p| Pattern::new(p).unwrap()),
            main_class: "SvnMain".to_string(),
            port: 2069,
            name: "svn".to_string(),
            svn_home: PathBuf::from("/opt/svn"),
            launcher: "ng.exe".to_string(),
        }
    }

    fn os_args(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_commit_goes_to_server() {
        let config = svn_config(Some("commit"));
        let args = os_args(&["commit", "-m", "msg"]);

        let plan = Plan::new(&config, &args);

        assert_eq!(
            plan.argv,
            os_args(&[
                "ng.exe",
                "SvnMain",
                "--nailgun-port",
                "2069",
                "svn",
                "commit",
                "-m",
                "msg"
            ])
        );
        assert!(matches!(plan.invocation, Invocation::Remote { .. }));
        assert_eq!(plan.program(), OsStr::new("ng.exe"));
    }

    #[test]
    fn test_version_runs_native_binary() {
        let config = svn_config(Some("commit"));
        let args = os_args(&["--version"]);

        let plan = Plan::new(&config, &args);

        assert_eq!(
            plan.argv,
            vec![
                PathBuf::from("/opt/svn/bin/svn").into_os_string(),
                OsString::from("--version")
            ]
        );
        assert_eq!(plan.program_args(), os_args(&["--version"]).as_slice());
    }

    #[test]
    fn test_no_pattern_always_local() {
        let config = svn_config(None);
        for args in [vec![], os_args(&["commit", "-m", "msg"])] {
            let invocation = Invocation::select(&config, &args);
            assert_eq!(
                invocation,
                Invocation::Local {
                    executable: PathBuf::from("/opt/svn/bin/svn")
                }
            );
        }
    }

    #[test]
    fn test_empty_args_match_against_empty_string() {
        let args: Vec<OsString> = Vec::new();

        let remote = Plan::new(&svn_config(Some(".*")), &args);
        assert_eq!(remote.argv.len(), 5);
        assert!(matches!(remote.invocation, Invocation::Remote { .. }));

        let local = Plan::new(&svn_config(Some("commit")), &args);
        assert_eq!(local.argv, vec![PathBuf::from("/opt/svn/bin/svn").into_os_string()]);
    }

    #[test]
    fn test_arguments_are_passed_verbatim() {
        let config = svn_config(Some("co"));
        let args = os_args(&["co", "a b", "", "--", "-x"]);

        let argv = Invocation::select(&config, &args).command_vector(&args);

        assert_eq!(&argv[5..], args.as_slice());
    }

    #[test]
    fn test_join_args() {
        assert_eq!(join_args(&[]), "");
        assert_eq!(join_args(&os_args(&["commit", "-m", "msg"])), "commit -m msg");
        assert_eq!(join_args(&os_args(&["a b", "c"])), "a b c");
    }

    #[test]
    fn test_plan_json() {
        let plan = Plan::new(&svn_config(Some("commit")), &os_args(&["commit"]));
        let value: serde_json::Value = serde_json::from_str(&plan.to_json()).unwrap();

        assert_eq!(value["kind"], "remote");
        assert_eq!(value["port"], 2069);
        assert_eq!(value["argv"][2], "--nailgun-port");
        assert_eq!(value["argv"][5], "commit");
    }
}
