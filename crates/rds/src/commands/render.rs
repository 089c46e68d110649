//! `rds render` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use rds_config::Config;
use rds_directives::{DirectiveTransformer, SugarOptions};
use rds_tree::{html, reader};

use crate::error::CliError;
use crate::output::Output;

/// Output format of the render command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// HTML fragment.
    #[default]
    Html,
    /// Resolved document tree as JSON.
    Json,
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (`-` reads stdin).
    input: PathBuf,

    /// Path to configuration file (default: auto-discover rds.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref())?;
        match &config.config_path {
            Some(path) => tracing::info!(path = %path.display(), "Loaded configuration"),
            None => tracing::info!("No rds.toml found, using defaults"),
        }

        let markdown = read_input(&self.input)?;
        let rendered = render(&markdown, &config, self.format)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, rendered)?;
                if self.verbose {
                    output.info(&format!("Source: {}", self.input.display()));
                }
                output.success(&format!("Rendered to {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(rendered.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

fn read_input(input: &Path) -> Result<String, CliError> {
    if input.as_os_str() == "-" {
        return Ok(std::io::read_to_string(std::io::stdin())?);
    }
    Ok(std::fs::read_to_string(input)?)
}

/// Parse, transform and serialize one markdown document.
pub(crate) fn render(markdown: &str, config: &Config, format: Format) -> Result<String, CliError> {
    let transformer = DirectiveTransformer::new(SugarOptions::from(config))?;
    let mut root = reader::parse(markdown);
    let report = transformer.transform(&mut root)?;
    tracing::info!(
        image = report.image,
        video = report.video,
        link = report.link,
        badge = report.badge,
        fallback = report.fallback,
        "Resolved directives"
    );

    match format {
        Format::Html => Ok(html::to_html(&root)),
        Format::Json => Ok(serde_json::to_string_pretty(&root)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_html() {
        let html = render("::video-vimeo{id=42}\n", &Config::default(), Format::Html).unwrap();
        assert_eq!(
            html,
            "<iframe class=\"rds-video\" data-video=\"vimeo\" src=\"https://player.vimeo.com/video/42\" title=\"Video Player\"></iframe>\n"
        );
    }

    #[test]
    fn test_render_json_contains_render_target() {
        let json = render(":badge[NEW]", &Config::default(), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let directive = &value["children"][0]["node"]["children"][0]["node"];
        assert_eq!(directive["name"], "badge");
        assert_eq!(directive["data"]["h_name"], "span");
    }

    #[test]
    fn test_render_directive_error() {
        let err = render(":::badge\n:::\n", &Config::default(), Format::Html).unwrap_err();
        assert!(matches!(err, CliError::Directive(_)));
        assert!(err.to_string().starts_with("Unexpected container directive."));
    }

    #[test]
    fn test_execute_with_config_and_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("rds.toml");
        std::fs::write(&config, "class_prefix = \"docs\"\n").unwrap();
        let input = dir.path().join("page.md");
        std::fs::write(&input, "Hi :badge[NEW]\n").unwrap();
        let out = dir.path().join("page.html");

        let args = RenderArgs {
            input,
            config: Some(config),
            output: Some(out.clone()),
            format: Format::Html,
            verbose: false,
        };
        args.execute().unwrap();

        let html = std::fs::read_to_string(out).unwrap();
        assert!(html.contains(r#"<span class="docs-badge""#));
    }

    #[test]
    fn test_execute_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let args = RenderArgs {
            input: dir.path().join("page.md"),
            config: Some(dir.path().join("missing.toml")),
            output: None,
            format: Format::Html,
            verbose: false,
        };
        assert!(matches!(args.execute(), Err(CliError::Config(_))));
    }
}
