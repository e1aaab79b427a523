//! Implementation of the `plugsmith list-plugins` command.

use plugsmith_core::{application::WorkspaceScanner, domain::PluginListing};

use crate::{
    cli::{GlobalArgs, ListFormat, ListPluginsArgs, OutputFormat},
    commands::Workbench,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(
    args: ListPluginsArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let bench = Workbench::open(&global, &config)?;
    let listing = WorkspaceScanner::new(bench.fs()).scan(bench.cwd())?;

    let format = if output.format() == OutputFormat::Json {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        // JSON must stay parseable in pipes, so it bypasses quiet mode.
        ListFormat::Json => output.json(&listing)?,
        ListFormat::List => {
            for name in &listing.all {
                output.print(name)?;
            }
        }
        ListFormat::Table => {
            for line in table_lines(&listing) {
                match line {
                    Line::Header(text) => output.header(&text)?,
                    Line::Item(text) => output.print(&text)?,
                }
            }
        }
    }
    Ok(())
}

enum Line {
    Header(String),
    Item(String),
}

fn table_lines(listing: &PluginListing) -> Vec<Line> {
    if listing.is_empty() {
        return vec![Line::Item("No plugins found".into())];
    }
    let mut lines = Vec::new();
    let groups = [
        ("Web plugins:", &listing.web),
        ("Server plugins:", &listing.server),
    ];
    for (title, names) in groups {
        if names.is_empty() {
            continue;
        }
        lines.push(Line::Header(title.into()));
        lines.extend(names.iter().map(|n| Line::Item(format!("  {n}"))));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    use plugsmith_core::domain::PluginClassification;

    fn render(listing: &PluginListing) -> Vec<String> {
        table_lines(listing)
            .into_iter()
            .map(|l| match l {
                Line::Header(t) | Line::Item(t) => t,
            })
            .collect()
    }

    #[test]
    fn table_groups_by_side() {
        let listing = PluginListing::from_classified([
            ("pluginA", PluginClassification { web: true, server: false }),
            ("pluginB", PluginClassification { web: false, server: true }),
            ("pluginC", PluginClassification { web: true, server: true }),
        ]);
        assert_eq!(
            render(&listing),
            [
                "Web plugins:",
                "  pluginA",
                "  pluginC",
                "Server plugins:",
                "  pluginB",
                "  pluginC"
            ]
        );
    }

    #[test]
    fn empty_workspace_says_so() {
        assert_eq!(render(&PluginListing::default()), ["No plugins found"]);
    }
}
