use anyhow::Result;
use cseshell::Interpreter;
use cseshell::config::Config;
use cseshell::prompt::Prompt;
use cseshell::reader::{Buffered, Editor, LineSource};
use log::error;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let config: Config = argh::from_env();

    if !config.no_banner {
        println!("CSEShell Run successful. Running now: ");
    }

    let env = match config.environment() {
        Ok(env) => env,
        Err(e) => {
            error!("{e:#}");
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };
    if !config.no_banner {
        println!("Current working dir: {}", env.root.display());
    }

    let mut sh = Interpreter::new(env).with_prompt(Prompt::new(!config.no_color));
    match run(&mut sh, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("session aborted: {e:#}");
            eprintln!("CSEShell: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(sh: &mut Interpreter, config: &Config) -> Result<()> {
    let mut source: Box<dyn LineSource> = if config.use_editor() {
        Box::new(Editor::new()?)
    } else {
        Box::new(Buffered::new(io::stdin().lock(), io::stdout()))
    };
    sh.repl(source.as_mut())
}
