use anyhow::{Context, Result};
use std::env as stdenv;
use std::path::{Path, PathBuf};

/// Default directory, relative to the root, that external programs are launched from.
pub const DEFAULT_SEARCH_DIR: &str = "bin";

/// Process-wide view of where the shell runs and where it finds programs.
///
/// The environment contains:
/// - `root`: the working directory captured at startup; external command paths start here.
/// - `search_dir`: the single directory (relative to `root`) holding external programs.
/// - `current_dir`: the shell's working directory, moved by `cd`.
#[derive(Debug, Clone)]
pub struct Environment {
    pub root: PathBuf,
    pub search_dir: PathBuf,
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current process working directory as the execution root.
    ///
    /// Failing to read the working directory is the one startup error the
    /// shell cannot recover from.
    pub fn capture() -> Result<Self> {
        let cwd = stdenv::current_dir().context("getcwd() error, exiting now.")?;
        Ok(Self::with_root(cwd))
    }

    /// Build an environment around an explicit root, using the default search directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| root.clone());
        Self {
            root,
            search_dir: PathBuf::from(DEFAULT_SEARCH_DIR),
            current_dir,
        }
    }

    /// Replace the search directory.
    pub fn search_in(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = dir.into();
        self
    }

    /// Build the execution path for `name`: `<root>/<search_dir>/<name>`.
    ///
    /// A fresh value is returned on every call; a leading `/` on `name` is
    /// ignored so the result always stays under the search directory.
    pub fn program_path(&self, name: &str) -> PathBuf {
        let name = Path::new(name.trim_start_matches('/'));
        self.root.join(&self.search_dir).join(name)
    }
}
