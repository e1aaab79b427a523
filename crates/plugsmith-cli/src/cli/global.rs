//! Flags accepted by every subcommand, in any position.

use std::io;
use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Args, ValueEnum};

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// More log output: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors (and JSON documents)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Never colour output (also set by NO_COLOR)
    #[arg(long, global = true, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Read settings from FILE instead of the user config file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Operate on DIR instead of the current directory
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// How results are rendered
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output_format: OutputFormat,
}

impl GlobalArgs {
    /// `--cwd`, resolved against the process directory when relative and
    /// canonicalized so `..` and `.` never reach plugin names.
    pub fn working_dir(&self) -> io::Result<PathBuf> {
        let here = std::env::current_dir()?;
        match &self.cwd {
            Some(dir) => std::fs::canonicalize(here.join(dir)),
            None => Ok(here),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `human` on a terminal, `plain` otherwise
    #[default]
    Auto,
    /// Symbols and colours
    Human,
    /// No colours, stable for scripts
    Plain,
    /// JSON documents where a command supports them
    Json,
}
