//! Process creation and exit status propagation.

use crate::dispatch::Plan;
use crate::error::DispatchError;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Resolve the program to an executable path.
///
/// A bare name (`ng`) is looked up on `PATH`; anything containing a path
/// separator is used as given. A bare name `which` rejects is returned
/// unchanged, so process creation reports the real failure: not found (127)
/// or found but not executable (126).
#[must_use]
pub fn resolve_program(program: &OsStr) -> PathBuf {
    let path = Path::new(program);
    if path.components().count() > 1 || path.is_absolute() {
        return path.to_path_buf();
    }
    which::which(program).unwrap_or_else(|e| {
        tracing::debug!(program = %path.display(), error = %e, "not resolved on PATH");
        path.to_path_buf()
    })
}

/// Spawn the planned command, wait for it and return its exit code.
///
/// The child inherits the environment and the standard streams. Nothing is
/// captured and no shell is involved.
///
/// # Errors
///
/// Fails when the program cannot be found, started or waited on. The child's
/// own exit status is never an error.
pub fn run(plan: &Plan) -> Result<i32, DispatchError> {
    let program = resolve_program(plan.program());

    tracing::debug!(
        program = %program.display(),
        argv = ?plan.argv(),
        "spawning"
    );

    let mut child = Command::new(&program)
        .args(plan.program_args())
        .spawn()
        .map_err(|e| DispatchError::from_spawn(program.clone(), e))?;

    let status = child.wait().map_err(|source| DispatchError::Wait {
        program: program.clone(),
        source,
    })?;

    let code = exit_code(status);
    tracing::debug!(program = %program.display(), code, "child exited");
    Ok(code)
}

/// Map a child's status to the code this process exits with.
///
/// On Unix a child terminated by signal `N` maps to `128 + N`, as shells do.
#[must_use]
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
