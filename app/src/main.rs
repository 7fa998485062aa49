use std::io;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use thesis_qa_lib::cli::Cli;
use thesis_qa_lib::console::run_console;
use thesis_qa_lib::init_tracing;
use tqa_ai::answer::Assistant;
use tqa_ai::embeddings::gemini_embed::GeminiEmbedder;
use tqa_ai::embeddings::Embedder;
use tqa_ai::gemini::GeminiClient;
use tqa_ai::llm::gemini_llm::GeminiLlm;
use tqa_ai::loader::build_collection;
use tqa_ai::store::MemoryStore;
use tqa_core::config::AppConfig;

fn main() -> anyhow::Result<()> {
    // `.env` must be loaded before clap resolves `env = ...` defaults.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("failed to read .env");
        }
    }

    let cli = Cli::parse();
    init_tracing(cli.log_filter());

    let mut config = AppConfig::from_env().context("configuration error")?;
    cli.apply(&mut config);
    tracing::debug!(?config, "configuration loaded");

    let client = GeminiClient::from_config(&config).context("configuration error")?;
    let embedder: Rc<dyn Embedder> =
        Rc::new(GeminiEmbedder::new(client.clone(), config.embedding_model.clone()));
    let llm = GeminiLlm::new(client);

    let mut store = MemoryStore::new(embedder);
    let (collection, summary) =
        build_collection(&mut store, &config.collection_name, &config.chunks_path)
            .with_context(|| format!("failed to build collection from {}", config.chunks_path.display()))?;
    println!("Loaded {} chunks from the file.", summary.chunks_loaded);
    println!("Database build completed.");

    let assistant = Assistant::new(&llm, &collection, &config);
    let stats = run_console(io::stdin().lock(), io::stdout(), |q| assistant.answer(q))?;
    tracing::info!(
        answered = stats.answered,
        failed = stats.failed,
        rejected = stats.rejected,
        "session ended"
    );
    Ok(())
}
