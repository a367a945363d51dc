use anyhow::{anyhow, Context as AnyhowContext, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use toolscope_protocol::{RetrieveOptions, ToolCatalog, ToolDefinition, ToolSpec};
use toolscope_search::{RetrievalError, ToolRetriever, ToolSelection};
use toolscope_vector_store::{
    EmbeddingProvider, HashingEmbedder, JsonToolStore, ToolIndex, ToolStore, ToolStoreMeta,
};

mod config;

use config::Config;

/// Exit status for a strict-mode query naming an unknown tool.
const EXIT_UNRESOLVED: i32 = 10;

#[derive(Parser)]
#[command(name = "toolscope")]
#[command(about = "Pick the tools relevant to a query", long_about = None)]
#[command(version)]
struct Cli {
    /// Query text; `[toolName]` always selects that tool
    query: String,

    /// Tool catalog (JSON or TOML)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Config file (overrides TOOLSCOPE_CONFIG and ./toolscope.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail when an explicit `[name]` reference is unknown
    #[arg(long)]
    strict: bool,

    /// Maximum number of semantic matches
    #[arg(long)]
    match_count: Option<usize>,

    /// Minimum cosine similarity for a semantic match
    #[arg(long, allow_negative_numbers = true)]
    match_threshold: Option<f32>,

    /// Persist tool embeddings in this JSON file
    #[arg(long)]
    index: Option<PathBuf>,

    /// Print the selection as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log errors only
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn retrieve_options(&self, config: &Config) -> Result<RetrieveOptions> {
        let mut options = config.retrieval;
        if self.strict {
            options.strict = true;
        }
        if let Some(count) = self.match_count {
            options.match_count = count;
        }
        if let Some(threshold) = self.match_threshold {
            options.match_threshold = threshold;
        }
        options.validate()?;
        Ok(options)
    }
}

#[derive(Serialize)]
struct SelectionOutput<'a> {
    tools: Vec<SelectedToolOutput<'a>>,
    unresolved: &'a [String],
}

#[derive(Serialize)]
struct SelectedToolOutput<'a> {
    name: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f32>,
    explicit: bool,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(exit_code(&err));
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<RetrievalError>() {
        Some(retrieval) if retrieval.is_unresolved() => EXIT_UNRESOLVED,
        _ => 1,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::discover(cli.config.as_deref())?;
    let options = cli.retrieve_options(&config)?;

    let catalog_path = cli
        .catalog
        .clone()
        .or_else(|| config.catalog.clone())
        .ok_or_else(|| anyhow!("no tool catalog: pass --catalog or set `catalog` in the config"))?;
    let catalog = ToolCatalog::from_file(&catalog_path)
        .with_context(|| format!("failed to load catalog {}", catalog_path.display()))?;
    log::info!("Loaded {} tools from {}", catalog.len(), catalog_path.display());
    let definitions = catalog.into_definitions();

    let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder::new(config.dimensions)?);

    let index_path = cli.index.clone().or_else(|| config.index_path.clone());
    let result = match index_path {
        Some(path) => {
            let store = JsonToolStore::open(&path, ToolStoreMeta::for_provider(provider.as_ref()))
                .await?;
            select(Arc::clone(&provider), store, definitions, &cli, &options).await
        }
        None => {
            select(Arc::clone(&provider), ToolIndex::new(), definitions, &cli, &options).await
        }
    };

    provider.dispose().await?;
    result
}

async fn select<S: ToolStore<ToolSpec>>(
    provider: Arc<dyn EmbeddingProvider>,
    store: S,
    definitions: Vec<ToolDefinition<ToolSpec>>,
    cli: &Cli,
    options: &RetrieveOptions,
) -> Result<()> {
    let retriever = ToolRetriever::new(provider, store, definitions).await?;
    let selection = retriever.retrieve(&cli.query, options).await?;
    if cli.json {
        print_json(&selection)
    } else {
        for tool in &selection {
            println!("{}", tool.name());
        }
        Ok(())
    }
}

fn print_json(selection: &ToolSelection<ToolSpec>) -> Result<()> {
    let output = SelectionOutput {
        tools: selection
            .iter()
            .map(|tool| SelectedToolOutput {
                name: tool.name(),
                description: tool.definition.description(),
                score: tool.score,
                explicit: tool.explicit,
            })
            .collect(),
        unresolved: selection.unresolved(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
