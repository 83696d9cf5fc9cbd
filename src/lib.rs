//! A small interactive shell.
//!
//! Each line read from the user is split on whitespace into a command and its
//! arguments. A handful of builtins (`cd`, `help`, `exit`, `usage`) run inside the
//! shell process; every other command is launched as a child process from a single
//! search directory under the directory the shell was started in, and the shell
//! waits for it before reading the next line.
//!
//! The main entry point is [`Interpreter`]. [`reader`] provides the line sources it
//! reads from and [`builtin`] exposes the builtin table.

pub mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod external;
mod interpreter;
mod lexer;
pub mod prompt;
pub mod reader;

#[cfg(test)]
mod test_support;

pub use command::{ExitCode, Flow, Outcome};
pub use env::Environment;
pub use interpreter::Interpreter;
pub use lexer::{Tokens, tokenize};
