use clap::{Parser, Subcommand, ValueEnum};
use second_opinion::config::{self, Config};
use second_opinion::divergence::DivergenceAnalyzer;
use second_opinion::error::{SecondOpinionError, SecondOpinionResult};
use second_opinion::selection::{average_cost, ProviderSelector, SelectionContext};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "second-opinion")]
#[command(about = "Pick an alternate provider and compare two answers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, default_value = "second-opinion.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new config file
    Init {
        /// Output path for config
        #[arg(short, long, default_value = "second-opinion.toml")]
        output: PathBuf,
    },

    /// Choose the provider that should answer second
    Select {
        /// Currently available providers, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        available: Vec<String>,

        /// Provider that produced the first answer
        #[arg(short, long)]
        exclude: Option<String>,

        /// User id for round-robin history
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Compare two answers stored in files
    Compare {
        first: PathBuf,
        second: PathBuf,

        /// Language for the one-line summary
        #[arg(short, long, default_value = "en")]
        lang: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the average per-token cost of each configured provider
    Costs,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> SecondOpinionResult<()> {
    let cli = Cli::parse();

    let (config, source) = config::resolve_config(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(config.general.log_level.as_str())
                }),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(source = %source, "Loaded configuration");

    match cli.command {
        Commands::Init { output } => {
            config::create_default_config(&output)?;
            println!("Created config at {}", output.display());
            Ok(())
        }
        Commands::Select {
            available,
            exclude,
            user,
        } => run_select(&config, &available, exclude.as_deref(), user),
        Commands::Compare {
            first,
            second,
            lang,
            format,
        } => run_compare(&config, &first, &second, &lang, format),
        Commands::Costs => {
            run_costs(&config);
            Ok(())
        }
    }
}

fn run_select(
    config: &Config,
    available: &[String],
    exclude: Option<&str>,
    user: Option<String>,
) -> SecondOpinionResult<()> {
    let selector = ProviderSelector::new(&config.selection)?;
    let context = SelectionContext { user_id: user };

    let provider = selector.select(available, exclude, &context)?;
    println!("{}", provider);
    Ok(())
}

fn run_compare(
    config: &Config,
    first: &Path,
    second: &Path,
    lang: &str,
    format: OutputFormat,
) -> SecondOpinionResult<()> {
    let response_a = read_response(first)?;
    let response_b = read_response(second)?;

    let analyzer = DivergenceAnalyzer::new(config.divergence.clone())?;
    let Some(report) = analyzer.analyze(&response_a, &response_b) else {
        println!("Divergence analysis is disabled in the configuration");
        return Ok(());
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!(
                "Divergence: {} (similarity {}%)",
                report.divergence_level,
                report.similarity_percent()
            );
            println!("{}", analyzer.summary(&report, lang));
            println!(
                "\nWords: {} vs {} (delta {})",
                report.metadata.word_count_1,
                report.metadata.word_count_2,
                report.metadata.word_count_delta
            );

            if !report.differences.is_empty() {
                println!("\nDifferences:");
                for difference in &report.differences {
                    println!("  - {}", difference);
                }
            }

            if !report.suggested_questions.is_empty() {
                println!("\nFollow-up questions:");
                for question in &report.suggested_questions {
                    println!("  ? {}", question);
                }
            }
        }
    }

    Ok(())
}

fn read_response(path: &Path) -> SecondOpinionResult<String> {
    if !path.exists() {
        return Err(SecondOpinionError::FileNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}

fn run_costs(config: &Config) {
    let mut providers: Vec<&String> = config.selection.costs.keys().collect();
    providers.sort();

    println!("Policy: {}", config.selection.policy);
    println!("Average cost per token:");
    for provider in providers {
        println!(
            "  {:<12} {:.8}",
            provider,
            average_cost(&config.selection.costs, provider)
        );
    }
}
