use clap::Parser;

mod app;
mod audio;
mod catalog;
mod cli;
mod config;
mod library;
mod logging;
mod player;
mod prefs;
mod probe;
mod runtime;
mod site;
mod ui;

use cli::{Args, Command};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // The preview owns the terminal, so it logs to a file instead.
    match &args.command {
        Command::Preview { .. } => {
            let path = logging::preview_log_path(config::default_state_dir());
            logging::init_file(args.debug, &path);
        }
        _ => logging::init_stderr(args.debug),
    }

    runtime::run(args)
}
