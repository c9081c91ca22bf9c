//! CLI entry point.
//!
//! Installed under a tool name (`jsvn`, `jsvnadmin`, ...) the binary is a pure
//! passthrough: every argument belongs to the tool. Invoked as `ngshim`, it
//! accepts a few flags of its own, mostly for inspecting a configuration.

use crate::config::{self, DispatchConfig};
use crate::dispatch::Plan;
use crate::error::DispatchError;
use crate::{executor, logging};
use clap::Parser as ClapParser;
use std::error::Error;
use std::ffi::{OsStr, OsString};
use std::path::Path;

const PKG_NAME: &str = env!("CARGO_PKG_NAME");
const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI arguments when invoked as `ngshim`.
#[derive(ClapParser)]
#[command(name = PKG_NAME)]
#[command(version = PKG_VERSION)]
#[command(about = "Dispatch a tool invocation to a Nailgun server or to the native binary", long_about = None)]
struct Cli {
    /// Print the dispatch decision as JSON instead of running it
    #[arg(long)]
    dry_run: bool,

    /// Logical command name (overrides NGSHIM_NAME)
    #[arg(long, value_name = "NAME")]
    name: Option<String>,

    /// Arguments passed through to the selected command
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(OsString)
    )]
    args: Vec<OsString>,
}

/// Whether `program` is the shim's own name rather than a tool alias.
#[must_use]
pub fn is_front_end(program: &OsStr) -> bool {
    Path::new(program)
        .file_stem()
        .is_some_and(|stem| stem == PKG_NAME)
}

/// Main CLI logic. Returns the code the process should exit with.
pub fn run_cli() -> i32 {
    logging::init();

    let mut argv = std::env::args_os();
    let program = argv.next().unwrap_or_default();
    let args: Vec<OsString> = argv.collect();

    let result = if is_front_end(&program) {
        let cli = Cli::parse_from(std::iter::once(program).chain(args));
        run_front_end(cli)
    } else {
        dispatch(&program, &args)
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            report(&e);
            e.exit_code()
        }
    }
}

/// Passthrough mode: the tool name comes from `program`.
fn dispatch(program: &OsStr, args: &[OsString]) -> Result<i32, DispatchError> {
    let config = DispatchConfig::resolve(config::env_lookup, Some(program))?;
    executor::run(&Plan::new(&config, args))
}

fn run_front_end(cli: Cli) -> Result<i32, DispatchError> {
    let name = cli.name;
    let lookup = |key: &str| match (&name, key) {
        (Some(name), config::NAME_VAR) => Some(name.clone()),
        _ => config::env_lookup(key),
    };
    let config = DispatchConfig::resolve(lookup, None)?;
    let plan = Plan::new(&config, &cli.args);

    if cli.dry_run {
        println!("{}", plan.to_json());
        return Ok(0);
    }

    executor::run(&plan)
}

/// Print an error and its causes on one line.
fn report(err: &DispatchError) {
    let mut message = format!("{PKG_NAME}: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    eprintln!("{message}");
}
