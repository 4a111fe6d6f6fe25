use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use feet_config::Config;
use feet_config::logging::{LogFormat, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub mod commands;
pub mod state;

#[cfg(test)]
mod tests;

use self::commands::{ExtractRequest, TermSource};
use self::state::AppState;

#[derive(Parser)]
#[command(name = "feet")]
#[command(about = "Find entities in free text against term dictionaries", long_about = None)]
struct Cli {
    /// JSON configuration profile, environment variables otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Key prefix of the store
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// Registry the dictionary belongs to
    #[arg(long, global = true)]
    registry: Option<String>,

    /// JSON file keeping dictionaries between runs
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Terms {
    /// Plain text file, one term per line
    #[arg(long)]
    txt: Option<PathBuf>,

    /// CSV file with a header row, terms in the first column
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl From<Terms> for TermSource {
    fn from(terms: Terms) -> Self {
        Self {
            txt: terms.txt,
            csv: terms.csv,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load a list of entities from a file
    Load {
        /// Entity dictionary
        #[arg(short, long)]
        entity: String,

        #[command(flatten)]
        terms: Terms,

        /// Language of the entities
        #[arg(short, long)]
        lang: Option<String>,

        /// Number of terms to list after loading
        #[arg(long, default_value_t = 10)]
        show: usize,
    },
    /// Extract entities from text
    Extract {
        /// Entity dictionary
        #[arg(short, long)]
        entity: String,

        #[command(flatten)]
        terms: Terms,

        /// Plain text
        #[arg(short, long)]
        text: Option<String>,

        /// File to process
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Chunk grammar file
        #[arg(short, long)]
        grammar: Option<PathBuf>,

        /// Language of the text, detected when omitted
        #[arg(short, long)]
        lang: Option<String>,

        /// Print every classified chunk as JSON
        #[arg(long)]
        json: bool,
    },
    /// Drop an entity dictionary
    Drop {
        /// Entity dictionary
        #[arg(short, long)]
        entity: String,
    },
    /// Detect the language of a text
    Detect {
        #[arg(short, long)]
        text: String,
    },
    /// Split a text into sentences of tokens
    Tokenize {
        #[arg(short, long)]
        text: String,

        #[arg(short, long)]
        lang: Option<String>,
    },
}

fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(prefix) = cli.prefix {
        config.store.prefix = prefix;
    }
    if let Some(registry) = cli.registry {
        config.registry = registry;
    }
    if let Some(store) = cli.store {
        config.store.path = Some(store);
    }

    init_tracing(&config.logging);

    let mut state = AppState::new(config)?;

    match cli.command {
        Commands::Load {
            entity,
            terms,
            lang,
            show,
        } => {
            let summary =
                commands::load(&state, &entity, &terms.into(), lang.as_deref(), show).await?;

            println!(
                "{} of {} terms added to {} ({}), {} in total",
                summary.added, summary.seen, summary.entity, summary.lang, summary.cardinality
            );
            for term in &summary.terms {
                println!("  {term}");
            }
        }
        Commands::Extract {
            entity,
            terms,
            text,
            path,
            grammar,
            lang,
            json,
        } => {
            let terms = TermSource::from(terms);
            let request = ExtractRequest {
                entity: &entity,
                terms: &terms,
                text: text.as_deref(),
                path: path.as_deref(),
                grammar: grammar.as_deref(),
                lang: lang.as_deref(),
            };
            let extraction = commands::extract(&mut state, request).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&extraction)?);
            } else {
                let entities = extraction.found_entities();
                if entities.is_empty() {
                    println!("no entities detected");
                } else {
                    println!("{} entities detected", entities.len());
                    println!("{}", entities.join("\n"));
                }
            }
            tracing::info!(
                entity,
                language = %extraction.language,
                elapsed = ?extraction.elapsed,
                "text processed"
            );
        }
        Commands::Drop { entity } => {
            if commands::drop_dict(&state, &entity).await? {
                println!("{entity} dictionary dropped");
            } else {
                println!("{entity} unknown dictionary");
            }
        }
        Commands::Detect { text } => match commands::detect(&state, &text) {
            Some(language) => println!("{language}"),
            None => println!("unknown"),
        },
        Commands::Tokenize { text, lang } => {
            for sentence in commands::tokenize(&state, &text, lang.as_deref())? {
                println!("{}", sentence.join(" | "));
            }
        }
    }

    Ok(())
}
