//! Command dispatch: each subcommand loads settings, applies its flags and
//! reports failures through `anyhow`.

use anyhow::{Context, Result};

use crate::cli::{Args, Command};

mod build;
mod check;
mod event_loop;
mod preview;
mod settings;

pub use settings::load_settings;

pub fn run(args: Args) -> Result<()> {
    let settings = load_settings();

    match args.command {
        Command::Build(build) => build::run(&build, settings),
        Command::Check { site } => check::run(&site, &settings),
        Command::Preview { site, music } => preview::run(&site, music.as_deref(), &settings),
        Command::Config => {
            let text = settings.to_toml().context("cannot render settings as TOML")?;
            print!("{text}");
            Ok(())
        }
    }
}
