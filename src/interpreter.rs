use crate::builtin::{self, Streams};
use crate::command::{ExitCode, Outcome};
use crate::env::Environment;
use crate::external::{LaunchError, Launcher};
use crate::lexer::{self, Tokens};
use crate::prompt::Prompt;
use crate::reader::{Input, LineSource};
use anyhow::Result;
use log::{debug, info, warn};
use std::io::{self, Write};

/// Interactive command interpreter: builtins run in-process, anything else is
/// launched from the environment's search directory.
///
/// Example
/// ```
/// use cseshell::{Environment, Interpreter, tokenize};
/// let mut sh = Interpreter::new(Environment::with_root("/tmp"));
/// let outcome = sh.dispatch(&tokenize("usage cd"));
/// assert!(outcome.should_continue());
/// ```
pub struct Interpreter {
    env: Environment,
    prompt: Prompt,
    last_status: ExitCode,
}

impl Interpreter {
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            prompt: Prompt::new(true),
            last_status: 0,
        }
    }

    pub fn with_prompt(mut self, prompt: Prompt) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Status of the most recently dispatched command.
    pub fn last_status(&self) -> ExitCode {
        self.last_status
    }

    /// Run one tokenized command against the process's standard streams.
    pub fn dispatch(&mut self, tokens: &Tokens<'_>) -> Outcome {
        self.dispatch_with_output(tokens, &mut io::stdout(), &mut io::stderr())
    }

    /// Run one tokenized command, sending shell output to `out` and diagnostics to `err`.
    ///
    /// External programs still inherit the process's own standard streams.
    pub fn dispatch_with_output(
        &mut self,
        tokens: &Tokens<'_>,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Outcome {
        let Some(name) = tokens.command() else {
            return Outcome::proceed(self.last_status);
        };
        debug!("dispatching {:?}", tokens.as_slice());

        let outcome = match builtin::find(name) {
            Some(builtin) => builtin.invoke(tokens, &mut Streams { out, err }, &mut self.env),
            None => self.launch(name, tokens, out, err),
        };
        self.last_status = outcome.status;
        outcome
    }

    fn launch(
        &self,
        name: &str,
        tokens: &Tokens<'_>,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Outcome {
        // Shell output written so far must land before the child's.
        if let Err(e) = out.flush() {
            debug!("flushing output before {name}: {e}");
        }
        let (outcome, reported) = match Launcher::new(&self.env).launch(tokens) {
            Ok(termination) => {
                let reported = if termination.is_abrupt() {
                    writeln!(out, "Command {name} has terminated abruptly.")
                } else {
                    Ok(())
                };
                (Outcome::proceed(termination.status()), reported)
            }
            Err(e @ LaunchError::NotFound { .. }) => {
                (Outcome::proceed(e.status()), writeln!(err, "{e}"))
            }
            Err(e) => {
                warn!("{e}");
                (Outcome::proceed(e.status()), writeln!(err, "CSEShell: {e}"))
            }
        };
        if let Err(e) = reported {
            debug!("reporting result of {name}: {e}");
        }
        outcome
    }

    /// Read, tokenize and dispatch lines until `exit` or end of input.
    pub fn repl(&mut self, source: &mut dyn LineSource) -> Result<()> {
        self.repl_with_output(source, &mut io::stdout(), &mut io::stderr())
    }

    pub fn repl_with_output(
        &mut self,
        source: &mut dyn LineSource,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<()> {
        info!("session started in {}", self.env.root.display());
        loop {
            writeln!(out, "{}", self.prompt.header())?;
            out.flush()?;

            let line = match source.read_line(self.prompt.marker())? {
                Input::Line(line) => line,
                Input::Blank => continue,
                Input::Invalid => {
                    writeln!(err, "CSEShell: input is not valid UTF-8, line ignored")?;
                    continue;
                }
                Input::Eof => {
                    info!("end of input, leaving session");
                    return Ok(());
                }
            };

            let outcome = {
                let tokens = lexer::tokenize(&line);
                self.dispatch_with_output(&tokens, out, err)
            };

            if !outcome.should_continue() {
                info!("session terminated with status {}", outcome.status);
                return Ok(());
            }
        }
    }
}
