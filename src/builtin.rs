use crate::command::Outcome;
use crate::env::Environment;
use crate::lexer::Tokens;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use log::debug;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Utilities shipped next to the shell in its search directory.
pub const EXTERNAL_UTILITIES: &str = "listdir, listdirall, summond, checkdaemon, find, and countline";

/// Output streams handed to a builtin.
pub struct Streams<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
}

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "exit".
    const NAME: &'static str;

    /// One-line description printed by `usage <name>`.
    const DESCRIPTION: &'static str;

    /// Turn the arguments following the command name into a command value.
    fn parse(args: &[&str]) -> Result<Self, EarlyExit> {
        Self::from_args(&[Self::NAME], args)
    }

    /// Executes the command using the provided streams and environment.
    fn execute(self, io: &mut Streams<'_>, env: &mut Environment) -> Result<Outcome>;
}

type Handler = fn(&[&str], &mut Streams<'_>, &mut Environment) -> Result<Outcome>;

/// One entry of the builtin table.
pub struct Builtin {
    name: &'static str,
    description: &'static str,
    handler: Handler,
}

impl Builtin {
    const fn of<T: BuiltinCommand>() -> Self {
        Self {
            name: T::NAME,
            description: T::DESCRIPTION,
            handler: run::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Run the builtin with the full token list (command name included).
    ///
    /// Errors never escape: they are written to the error stream and the
    /// session continues with status 1.
    pub fn invoke(
        &self,
        tokens: &Tokens<'_>,
        io: &mut Streams<'_>,
        env: &mut Environment,
    ) -> Outcome {
        debug!("builtin {} with {} argument(s)", self.name, tokens.args().len());
        match (self.handler)(tokens.args(), io, env) {
            Ok(outcome) => outcome,
            Err(e) => {
                if let Err(write_err) = writeln!(io.err, "CSEShell: {e:#}") {
                    debug!("reporting {} failure: {write_err}", self.name);
                }
                Outcome::proceed(1)
            }
        }
    }
}

fn run<T: BuiltinCommand>(
    args: &[&str],
    io: &mut Streams<'_>,
    env: &mut Environment,
) -> Result<Outcome> {
    match T::parse(args) {
        Ok(cmd) => cmd.execute(io, env),
        Err(EarlyExit { output, status }) => {
            if status.is_err() {
                writeln!(io.err, "{}", output.trim_end())?;
                Ok(Outcome::proceed(1))
            } else {
                writeln!(io.out, "{}", output.trim_end())?;
                Ok(Outcome::proceed(0))
            }
        }
    }
}

static BUILTINS: [Builtin; 4] = [
    Builtin::of::<Cd>(),
    Builtin::of::<Help>(),
    Builtin::of::<Exit>(),
    Builtin::of::<Usage>(),
];

/// Builtin names in table order.
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(Builtin::name)
}

/// Number of builtins.
pub fn count() -> usize {
    BUILTINS.len()
}

/// Linear lookup by exact name.
pub fn find(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

#[derive(FromArgs)]
/// Change the current working directory of the shell.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    const NAME: &'static str = "cd";
    const DESCRIPTION: &'static str =
        "Type: cd directory_name to change the current working directory of the shell";

    fn execute(self, io: &mut Streams<'_>, env: &mut Environment) -> Result<Outcome> {
        let Some(target) = self.target else {
            writeln!(io.err, "CSEShell: expected argument to \"cd\"")?;
            return Ok(Outcome::proceed(1));
        };

        let target = PathBuf::from(target);
        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        let canonical = fs::canonicalize(&new_dir)
            .with_context(|| format!("cd: {}", new_dir.display()))?;

        env::set_current_dir(&canonical)
            .with_context(|| format!("cd: {}", canonical.display()))?;
        debug!("working directory is now {}", canonical.display());
        env.current_dir = canonical;
        Ok(Outcome::proceed(0))
    }
}

#[derive(FromArgs)]
/// List the commands implemented within the shell.
pub struct Help {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Help {
    const NAME: &'static str = "help";
    const DESCRIPTION: &'static str = "Type: help for supported commands";

    // Always prints the list, whatever follows.
    fn parse(args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Self {
            _args: args.iter().map(ToString::to_string).collect(),
        })
    }

    fn execute(self, io: &mut Streams<'_>, _env: &mut Environment) -> Result<Outcome> {
        writeln!(io.out, "CSEShell Interface")?;
        writeln!(io.out, "Usage: command arguments")?;
        writeln!(io.out, "The following commands are implemented within the shell:")?;
        for name in names() {
            writeln!(io.out, "  {name}")?;
        }
        writeln!(io.out, "This shell also supports: {EXTERNAL_UTILITIES}.")?;
        Ok(Outcome::proceed(0))
    }
}

#[derive(FromArgs)]
/// Terminate the shell gracefully.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    const NAME: &'static str = "exit";
    const DESCRIPTION: &'static str = "Type: exit to terminate the shell gracefully";

    // Anything after `exit`, flags included, is ignored.
    fn parse(args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Self {
            _args: args.iter().map(ToString::to_string).collect(),
        })
    }

    fn execute(self, _io: &mut Streams<'_>, _env: &mut Environment) -> Result<Outcome> {
        Ok(Outcome::terminate(0))
    }
}

#[derive(FromArgs)]
/// Describe how to use one of the builtin commands.
pub struct Usage {
    #[argh(positional)]
    /// builtin to describe.
    pub command: Option<String>,
}

impl BuiltinCommand for Usage {
    const NAME: &'static str = "usage";
    const DESCRIPTION: &'static str = "Type: usage cd/help/exit";

    // Only the first argument names a command; the rest is ignored.
    fn parse(args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Self {
            command: args.first().map(ToString::to_string),
        })
    }

    fn execute(self, io: &mut Streams<'_>, _env: &mut Environment) -> Result<Outcome> {
        let Some(command) = self.command else {
            writeln!(io.out, "Command not given. Type usage <command>.")?;
            return Ok(Outcome::proceed(1));
        };
        if let Some(builtin) = find(&command) {
            writeln!(io.out, "{}", builtin.description())?;
        }
        Ok(Outcome::proceed(0))
    }
}
