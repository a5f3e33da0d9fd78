use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{Settings, SiteVariant};

/// Publish a music directory as a static streaming site.
#[derive(Parser, Debug)]
#[command(name = "sitecast")]
#[command(version)]
#[command(about = "Publish a music directory as a static streaming site")]
pub struct Args {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a music directory and write the site
    Build(BuildArgs),
    /// Load a generated site through the catalog loader and report
    Check {
        /// Directory containing the generated site
        site: PathBuf,
    },
    /// Play a generated site in the terminal
    Preview {
        /// Directory containing the generated site
        site: PathBuf,
        /// Directory holding the audio files (default: the site's relative
        /// audio base URL under the site directory)
        #[arg(long)]
        music: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// Directory to scan for audio files
    pub music: PathBuf,

    /// Output directory for the site
    #[arg(short, long, default_value = "public")]
    pub output: PathBuf,

    #[arg(long, value_enum)]
    pub variant: Option<VariantArg>,

    /// Base URL the page streams audio from
    #[arg(long)]
    pub base_url: Option<String>,

    /// Page title
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Standard,
    Radio,
}

impl From<VariantArg> for SiteVariant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Standard => SiteVariant::Standard,
            VariantArg::Radio => SiteVariant::Radio,
        }
    }
}

impl BuildArgs {
    /// Apply command-line overrides on top of loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(v) = self.variant {
            settings.site.variant = v.into();
        }
        if let Some(url) = &self.base_url {
            settings.site.audio_base_url = url.clone();
        }
        if let Some(title) = &self.title {
            settings.site.title = title.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_flags_override_settings() {
        let args = Args::parse_from([
            "sitecast",
            "build",
            "music",
            "-o",
            "out",
            "--variant",
            "radio",
            "--base-url",
            "https://cdn.example/a",
            "--title",
            "Mix",
        ]);
        let Command::Build(build) = args.command else {
            panic!("expected build");
        };
        assert_eq!(build.output, PathBuf::from("out"));

        let mut settings = Settings::default();
        build.apply(&mut settings);
        assert_eq!(settings.site.variant, SiteVariant::Radio);
        assert_eq!(settings.site.audio_base_url, "https://cdn.example/a");
        assert_eq!(settings.site.title, "Mix");
    }

    #[test]
    fn debug_is_global() {
        let args = Args::parse_from(["sitecast", "check", "public", "--debug"]);
        assert!(args.debug);
        assert!(matches!(args.command, Command::Check { .. }));
    }

    #[test]
    fn build_defaults_leave_settings_alone() {
        let args = Args::parse_from(["sitecast", "build", "music"]);
        let Command::Build(build) = args.command else {
            panic!("expected build");
        };
        assert_eq!(build.output, PathBuf::from("public"));
        let mut settings = Settings::default();
        build.apply(&mut settings);
        assert_eq!(settings.site.variant, SiteVariant::Standard);
        assert_eq!(settings.site.audio_base_url, "songs");
    }
}
