use anyhow::Result;
use clap::{Parser, Subcommand};
use ontopath::cache::EmbeddingCache;
use ontopath::embeddings::OpenAiEmbedder;
use ontopath::sparql::SparqlClient;
use ontopath::{explore, Config, PrefixTable};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ontopath", about = "Semantic path exploration in a SPARQL graph store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find and rank relation paths between two entities
    Explore {
        /// Source entity IRI
        source: String,
        /// Target entity IRI
        target: String,
        /// Free-text relevance query used to rank paths
        query: String,
        /// Maximum number of paths to keep (default from config)
        #[arg(long)]
        top_n: Option<usize>,
        /// Maximum hop count to search (default from config)
        #[arg(long)]
        max_depth: Option<usize>,
    },
}

/// Build a configured embedder with an optional LRU query-embedding cache.
fn build_embedder(config: &Config) -> Result<OpenAiEmbedder> {
    let api_key = std::env::var(&config.embeddings.api_key_env).map_err(|_| {
        anyhow::anyhow!(
            "Environment variable {} not set. Set it in your .env file or as an environment variable.",
            config.embeddings.api_key_env
        )
    })?;

    let cache = if config.embeddings.cache_capacity > 0 {
        Some(Arc::new(EmbeddingCache::new(config.embeddings.cache_capacity)))
    } else {
        None
    };

    Ok(OpenAiEmbedder::new_with_cache(
        api_key,
        config.embeddings.model.clone(),
        config.embeddings.batch_size,
        cache,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Command::Explore {
            source,
            target,
            query,
            top_n,
            max_depth,
        } => {
            let evaluator = SparqlClient::new(
                config.sparql.endpoint.clone(),
                config.sparql.request_timeout_secs,
            );
            let embedder = build_embedder(&config)?;
            let prefixes = PrefixTable::new(&config.prefixes);

            let text = explore(
                &evaluator,
                &embedder,
                &prefixes,
                &source,
                &target,
                &query,
                top_n.unwrap_or(config.explore.default_top_n),
                max_depth.unwrap_or(config.explore.default_max_depth),
            )
            .await;

            println!("{}", text);
        }
    }

    Ok(())
}
