use crate::command::{ExitCode, Flow};
use crate::env::Environment;
use crate::lexer::Tokens;
use log::debug;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// Status reported when the program could not be found or executed.
pub const NOT_FOUND_STATUS: ExitCode = 127;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Normal exit with the given code.
    Exited(ExitCode),
    /// Killed by a signal, or ended without an exit code.
    Abnormal(ExitCode),
}

impl Termination {
    /// Status as a shell would report it (`128 + signal` for signals).
    pub fn status(self) -> ExitCode {
        match self {
            Termination::Exited(code) | Termination::Abnormal(code) => code,
        }
    }

    /// The shell reads a child's status as a continuation code: anything but
    /// "continue" (1) counts as an abrupt end. Signal deaths never equal it.
    pub fn is_abrupt(self) -> bool {
        self.status() != Flow::Continue.code()
    }
}

impl From<ExitStatus> for Termination {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Termination::Exited(code);
        }
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal: Option<i32> = None;
        Termination::Abnormal(signal.map_or(-1, |signal| 128 + signal))
    }
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Command {name} not found: {source}")]
    NotFound {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to start {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to wait for {name}: {source}")]
    Wait {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    /// Status the dispatcher reports for this failure.
    pub fn status(&self) -> ExitCode {
        match self {
            LaunchError::NotFound { .. } => NOT_FOUND_STATUS,
            LaunchError::Spawn { .. } | LaunchError::Wait { .. } => 1,
        }
    }
}

/// Runs programs from the environment's single search directory.
///
/// The child inherits the shell's standard streams and working directory; the
/// launcher blocks until it ends.
pub struct Launcher<'a> {
    env: &'a Environment,
}

impl<'a> Launcher<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Self { env }
    }

    /// Spawn `tokens[0]` with the remaining tokens as arguments and wait for it.
    pub fn launch(&self, tokens: &Tokens<'_>) -> Result<Termination, LaunchError> {
        let Some(name) = tokens.command() else {
            return Ok(Termination::Exited(0));
        };
        let path = self.env.program_path(name);
        debug!("launching {} as {}", name, path.display());

        let mut command = Command::new(&path);
        // The child sees the name it was invoked by, not the resolved path.
        #[cfg(unix)]
        std::os::unix::process::CommandExt::arg0(&mut command, name);

        let mut child = command
            .args(tokens.args())
            .current_dir(&self.env.current_dir)
            .spawn()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    LaunchError::NotFound {
                        name: name.to_string(),
                        path: path.clone(),
                        source,
                    }
                }
                _ => LaunchError::Spawn {
                    name: name.to_string(),
                    source,
                },
            })?;

        let status = child.wait().map_err(|source| LaunchError::Wait {
            name: name.to_string(),
            source,
        })?;
        debug!("{} finished with {:?}", name, status);
        Ok(status.into())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use std::fs;
    use std::os::unix::fs::symlink;
    use std::path::Path;
    use tempfile::TempDir;

    /// Root with a `bin/` holding links to a few system programs.
    fn sandbox() -> (TempDir, Environment) {
        let root = tempfile::tempdir().expect("temp root");
        let bin = root.path().join("bin");
        fs::create_dir(&bin).expect("create bin");
        for program in ["sh", "true", "false"] {
            let target = ["/bin", "/usr/bin"]
                .iter()
                .map(|dir| Path::new(dir).join(program))
                .find(|p| p.exists())
                .expect("system program");
            symlink(target, bin.join(program)).expect("symlink");
        }
        let mut env = Environment::with_root(root.path());
        env.current_dir = root.path().to_path_buf();
        (root, env)
    }

    /// Shell script read by `sh`, so it never needs to be executable.
    fn write_script(env: &Environment, body: &str) -> String {
        let path = env.root.join("script.sh");
        fs::write(&path, format!("{body}\n")).expect("write script");
        path.display().to_string()
    }

    #[test]
    fn test_zero_exit_is_not_the_continue_code() {
        let (_root, env) = sandbox();
        let res = Launcher::new(&env).launch(&tokenize("true")).unwrap();
        assert_eq!(res, Termination::Exited(0));
        assert!(res.is_abrupt());
    }

    #[test]
    fn test_exit_code_is_propagated() {
        let (_root, env) = sandbox();
        let res = Launcher::new(&env).launch(&tokenize("false")).unwrap();
        assert_eq!(res, Termination::Exited(1));
        assert!(!res.is_abrupt());

        let script = write_script(&env, "exit 42");
        let res = Launcher::new(&env)
            .launch(&tokenize(&format!("sh {script}")))
            .unwrap();
        assert_eq!(res.status(), 42);
        assert!(res.is_abrupt());
    }

    #[test]
    fn test_signal_is_reported_as_abnormal() {
        let (_root, env) = sandbox();
        let script = write_script(&env, "kill -9 $$");
        let res = Launcher::new(&env)
            .launch(&tokenize(&format!("sh {script}")))
            .unwrap();
        assert_eq!(res, Termination::Abnormal(128 + 9));
        assert!(res.is_abrupt());
    }

    #[test]
    fn test_missing_program_is_not_found() {
        let (_root, env) = sandbox();
        let err = Launcher::new(&env)
            .launch(&tokenize("doesnotexist arg"))
            .unwrap_err();
        assert!(matches!(err, LaunchError::NotFound { .. }));
        assert_eq!(err.status(), NOT_FOUND_STATUS);
        assert!(err.to_string().starts_with("Command doesnotexist not found"));
    }

    #[test]
    fn test_programs_outside_search_dir_are_not_found() {
        let (_root, env) = sandbox();
        let err = Launcher::new(&env).launch(&tokenize("ls")).unwrap_err();
        assert!(matches!(err, LaunchError::NotFound { .. }));
    }

    #[test]
    fn test_empty_tokens_do_nothing() {
        let (_root, env) = sandbox();
        let res = Launcher::new(&env).launch(&tokenize("   ")).unwrap();
        assert_eq!(res, Termination::Exited(0));
    }
}
