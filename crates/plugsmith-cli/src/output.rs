//! Everything the CLI prints to stdout.
//!
//! Diagnostics and logs go to stderr elsewhere; this module owns the
//! results: status lines, task notices, listings and JSON documents.

use std::io::{self, IsTerminal};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Style};
use serde::Serialize;

use plugsmith_core::application::tasks::{Notice, NoticeLevel};

use crate::cli::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

const SUCCESS: &str = "\u{2713}";
const WARNING: &str = "\u{26a0}";
const INFO: &str = "\u{2139}";

pub struct OutputManager {
    format: OutputFormat,
    quiet: bool,
    color: bool,
    term: Term,
}

impl OutputManager {
    /// `Auto` is resolved here, once: human on a terminal, plain otherwise.
    /// Only human output is coloured.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let format = match args.output_format {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            other => other,
        };
        Self {
            format,
            quiet: args.quiet,
            color: format == OutputFormat::Human && !args.no_color && !config.output.no_color,
            term: Term::stdout(),
        }
    }

    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.line(msg.to_owned())
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        let text = if self.color {
            text.cyan().bold().to_string()
        } else {
            text.to_owned()
        };
        self.line(text)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked(SUCCESS, Style::new().green(), msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.marked(WARNING, Style::new().yellow(), msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked(INFO, Style::new().blue(), msg)
    }

    /// Show what a task reported, in the order it reported it.
    pub fn notices(&self, notices: &[Notice]) -> io::Result<()> {
        notices.iter().try_for_each(|notice| match notice.level {
            NoticeLevel::Info => self.info(&notice.message),
            NoticeLevel::Success => self.success(&notice.message),
            NoticeLevel::Warning => self.warning(&notice.message),
        })
    }

    /// Pretty JSON, printed even with `--quiet`: a consumer piping the
    /// output always gets a document.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let rendered = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&rendered)
    }

    /// Spinner shown while a task waits on npm, git or node. Hidden for
    /// anything but non-quiet human output.
    pub fn spinner(&self, msg: impl Into<String>) -> ProgressBar {
        if self.quiet || self.format != OutputFormat::Human {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(msg.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }

    /// Never `Auto`.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn marked(&self, symbol: &str, style: Style, msg: &str) -> io::Result<()> {
        if self.color {
            let text = msg.style(style.clone()).to_string();
            self.line(format!("{} {text}", symbol.style(style.bold())))
        } else {
            self.line(format!("{symbol} {msg}"))
        }
    }

    fn line(&self, text: String) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(&text)
    }
}
