use crate::env::{DEFAULT_SEARCH_DIR, Environment};
use anyhow::Result;
use argh::FromArgs;
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Interactive shell running builtins in-process and programs from a single search directory.
pub struct Config {
    #[argh(option, default = "PathBuf::from(DEFAULT_SEARCH_DIR)")]
    /// directory, relative to the root, that programs are launched from.
    pub bin_dir: PathBuf,

    #[argh(option)]
    /// root of the execution path; defaults to the working directory at startup.
    pub root: Option<PathBuf>,

    #[argh(switch)]
    /// disable colors in the prompt.
    pub no_color: bool,

    #[argh(switch)]
    /// read plain lines from standard input instead of using the line editor.
    pub plain: bool,

    #[argh(switch)]
    /// do not print the startup banner.
    pub no_banner: bool,
}

impl Config {
    /// Environment for the session: explicit root if given, else the captured working directory.
    pub fn environment(&self) -> Result<Environment> {
        let env = match &self.root {
            Some(root) => Environment::with_root(root),
            None => Environment::capture()?,
        };
        Ok(env.search_in(&self.bin_dir))
    }

    /// The line editor only makes sense on a terminal.
    pub fn use_editor(&self) -> bool {
        !self.plain && std::io::stdin().is_terminal()
    }
}
