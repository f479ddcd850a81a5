//! `suggest` command line.
//!
//! ```bash
//! suggest query casa
//! suggest --corpus words.txt serve --listen 127.0.0.1:8080
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use suggest::{Config, Suggester, DEFAULT_CORPUS_PATH, DEFAULT_LISTEN};
use tracing_subscriber::EnvFilter;

/// Prefix suggestions over a word corpus
#[derive(Parser, Debug)]
#[command(name = "suggest", version, about)]
struct Cli {
    /// Text file the dictionary is built from
    #[arg(long, global = true, default_value = DEFAULT_CORPUS_PATH, env = "SUGGEST_CORPUS")]
    corpus: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every word starting with PREFIX
    Query {
        /// Case-sensitive prefix; the corpus is lowercased
        prefix: String,

        /// Print a JSON array instead of one word per line
        #[arg(long)]
        json: bool,
    },

    /// Serve suggestions over HTTP
    Serve {
        /// Listen address
        #[arg(long, default_value_t = DEFAULT_LISTEN, env = "SUGGEST_LISTEN")]
        listen: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `query` output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("suggest=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config {
        corpus_path: cli.corpus,
        ..Config::default()
    };

    match cli.command {
        Command::Query { prefix, json } => {
            let suggester = Suggester::from_corpus(&config.corpus_path)?;
            let words = suggester.suggest(&prefix);
            if json {
                println!("{}", serde_json::to_string(&words)?);
            } else {
                for word in words {
                    println!("{word}");
                }
            }
        }
        Command::Serve { listen } => {
            let config = Config { listen, ..config };
            let suggester = Suggester::from_corpus(&config.corpus_path)?;
            suggest::http::serve(&config, suggester).await?;
        }
    }

    Ok(())
}
