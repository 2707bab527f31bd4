//! @ai:module:intent CLI entry point for policydoc
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on extractor, linter, output, config

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use policydoc::config::DEFAULT_CONFIG_FILE;
use policydoc::{extractor, linter, output, parser, DocConfig, Matchers, OutputFormat, RenderOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "policydoc")]
#[command(author, version, about = "Generate documentation from Rego policy header annotations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a markdown document for all policies under a directory
    Doc {
        /// Directory containing Rego policies
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Path to configuration file (defaults to policydoc.toml in PATH when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file, `-` for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base URL for source links
        #[arg(long)]
        url: Option<String>,

        /// Leave the Rego source out of the document
        #[arg(long)]
        no_rego: bool,

        /// Abort when any policy fails to parse
        #[arg(long)]
        fail_on_error: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "markdown")]
        format: DocFormat,
    },

    /// Lint policy headers for malformed or incomplete annotations
    Check {
        /// Path to a policy file or directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show the matchers parsed from one policy file
    Matchers {
        /// Path to a Rego policy
        path: PathBuf,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

#[derive(Clone, Copy, ValueEnum)]
enum DocFormat {
    Markdown,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

impl From<DocFormat> for OutputFormat {
    fn from(f: DocFormat) -> Self {
        match f {
            DocFormat::Markdown => OutputFormat::Text,
            DocFormat::Json => OutputFormat::Json,
            DocFormat::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("policydoc=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Doc {
            path,
            config,
            output,
            url,
            no_rego,
            fail_on_error,
            format,
        } => {
            let mut doc_config = load_config(&path, config.as_deref())?;
            if let Some(output) = output {
                doc_config.output = output;
            }
            if url.is_some() {
                doc_config.url = url;
            }
            if no_rego {
                doc_config.include_rego = false;
            }
            if fail_on_error {
                doc_config.fail_on_error = true;
            }

            let documents = extractor::extract_directory(&path, &doc_config)?;
            if documents.is_empty() {
                tracing::warn!("No policies found under {}", path.display());
            }

            let rendered = output::format_documents(
                &documents,
                format.into(),
                RenderOptions {
                    include_rego: doc_config.include_rego,
                },
            );

            if doc_config.writes_to_stdout() {
                print!("{}", rendered);
            } else {
                std::fs::write(&doc_config.output, rendered).with_context(|| {
                    format!("Failed to write {}", doc_config.output.display())
                })?;
                tracing::info!("Documentation written to {}", doc_config.output.display());
            }

            Ok(ExitCode::SUCCESS)
        }

        Commands::Check { path, format } => {
            let result = if path.is_file() {
                linter::lint_file(&path)?
            } else {
                linter::lint_directory(&path)?
            };

            println!("{}", output::format_lint_result(&result, format.into()));

            if result.passed() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(1))
            }
        }

        Commands::Matchers { path, format } => {
            let parsed = parser::parse_file(&path)?;
            let matchers = Matchers::from_comments(&parsed.header_comments)
                .with_context(|| format!("Failed to parse matchers in {}", path.display()))?;

            print!("{}", output::format_matchers(&matchers, format.into()));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// @ai:intent Resolve configuration: explicit file, else policydoc.toml in the policy root, else defaults
/// @ai:effects fs:read
fn load_config(root: &Path, explicit: Option<&Path>) -> Result<DocConfig> {
    if let Some(path) = explicit {
        return DocConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    let candidate = root.join(DEFAULT_CONFIG_FILE);
    if candidate.is_file() {
        tracing::info!("Using configuration from {}", candidate.display());
        return DocConfig::load(&candidate)
            .with_context(|| format!("Failed to load config {}", candidate.display()));
    }

    Ok(DocConfig::default())
}
