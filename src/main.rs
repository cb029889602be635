use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use relay_errors::config::{CatalogError, MessageCatalog};
use relay_errors::error::{
    ClassifiedError, ErrorCategory, ErrorClassifier, Failure, FormatContext,
};
use relay_errors::logging::{init_logging, LoggingConfig};

/// Output format for classified records
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// One `key: value` line per field
    #[default]
    Text,
    /// The serialized record
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "relay-errors")]
#[command(version)]
#[command(about = "Classify relay client failures and render user-facing messages")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a failure and print the resulting record
    Classify {
        /// Failure text, or a JSON value with --json
        failure: String,

        /// Parse FAILURE as a JSON value instead of a plain string
        #[arg(long)]
        json: bool,

        /// Output format
        #[arg(long, default_value = "text", value_enum)]
        format: OutputFormat,

        /// Message catalog TOML file
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Print the user-facing message for a failure
    Format {
        /// Failure text, or a JSON value with --json
        failure: String,

        /// Parse FAILURE as a JSON value instead of a plain string
        #[arg(long)]
        json: bool,

        /// Operation that failed, e.g. "send message"
        #[arg(long, short)]
        operation: Option<String>,

        /// Number of retries already made
        #[arg(long, short, value_name = "N")]
        retry_count: Option<u32>,

        /// Message catalog TOML file
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// List categories in match order
    Categories,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(LoggingConfig::from_verbosity(cli.verbose)).ok();

    match cli.command {
        Commands::Classify {
            failure,
            json,
            format,
            config,
        } => {
            let classifier = match build_classifier(config) {
                Ok(classifier) => classifier,
                Err(e) => return config_failure(e),
            };
            let classified = classifier.classify(parse_failure(&failure, json));
            match format {
                OutputFormat::Text => print_record(&classified),
                OutputFormat::Json => match serde_json::to_string_pretty(&classified) {
                    Ok(rendered) => println!("{}", rendered),
                    Err(e) => {
                        eprintln!("Error: failed to serialize record: {}", e);
                        return ExitCode::FAILURE;
                    }
                },
            }
            ExitCode::SUCCESS
        }
        Commands::Format {
            failure,
            json,
            operation,
            retry_count,
            config,
        } => {
            let classifier = match build_classifier(config) {
                Ok(classifier) => classifier,
                Err(e) => return config_failure(e),
            };
            let context = FormatContext {
                operation,
                retry_count,
            };
            println!(
                "{}",
                classifier.format_message(parse_failure(&failure, json), &context)
            );
            ExitCode::SUCCESS
        }
        Commands::Categories => {
            print_categories(&ErrorClassifier::new());
            ExitCode::SUCCESS
        }
    }
}

fn build_classifier(config: Option<PathBuf>) -> Result<ErrorClassifier, CatalogError> {
    let catalog = match config {
        Some(path) => {
            tracing::debug!("Loading message catalog from {:?}", path);
            MessageCatalog::load(path)?
        }
        None => MessageCatalog::from_env()?,
    };
    Ok(ErrorClassifier::with_catalog(catalog))
}

fn config_failure(error: CatalogError) -> ExitCode {
    tracing::debug!("Message catalog rejected: {:?}", error);
    eprintln!("Error: {}", error);
    ExitCode::FAILURE
}

fn parse_failure(input: &str, json: bool) -> Failure {
    if json {
        Failure::from_json(input)
    } else {
        Failure::from(input)
    }
}

fn print_record(classified: &ClassifiedError) {
    println!("code: {}", classified.code());
    println!("category: {}", classified.category());
    println!("retryable: {}", classified.is_retryable());
    println!("user message: {}", classified.user_message());
    println!("technical message: {}", classified.technical_message());
}

fn print_categories(classifier: &ErrorClassifier) {
    for pattern in classifier.patterns() {
        let category = pattern.category();
        println!(
            "{:<10} {:<16} retryable={:<5} {}",
            category.as_str(),
            category.code(),
            category.is_retryable(),
            pattern.needles().join(", ")
        );
    }
    let unknown = ErrorCategory::Unknown;
    println!(
        "{:<10} {:<16} retryable={:<5} (no match)",
        unknown.as_str(),
        unknown.code(),
        unknown.is_retryable()
    );
}
