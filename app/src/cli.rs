use std::path::PathBuf;

use clap::Parser;
use tqa_core::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "thesis-qa")]
#[command(about = "Ask questions about a thesis, with bibliography-aware answers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Newline-delimited chunk file
    #[arg(long, env = "THESIS_QA_CHUNKS")]
    pub chunks: Option<PathBuf>,

    /// JSON object mapping citation keys to formatted references
    #[arg(long, env = "THESIS_QA_BIBLIOGRAPHY")]
    pub bibliography: Option<PathBuf>,

    /// Name of the collection created at startup
    #[arg(long)]
    pub collection: Option<String>,

    /// Model used to write answers
    #[arg(long)]
    pub answer_model: Option<String>,

    /// Output token cap for answers (model default when unset)
    #[arg(long)]
    pub answer_max_tokens: Option<u32>,

    /// Model used for the yes/no citation check
    #[arg(long)]
    pub classifier_model: Option<String>,

    /// Model used to extract citation keys
    #[arg(long)]
    pub extractor_model: Option<String>,

    /// Embedding model for chunks and queries
    #[arg(long)]
    pub embedding_model: Option<String>,

    /// Enable debug logging (includes full prompts)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Log only warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Overlay command-line choices on the environment-derived config.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(p) = &self.chunks {
            config.chunks_path = p.clone();
        }
        if let Some(p) = &self.bibliography {
            config.bibliography_path = p.clone();
        }
        if let Some(name) = &self.collection {
            config.collection_name = name.clone();
        }
        if let Some(m) = &self.answer_model {
            config.answer.model = m.clone();
        }
        if self.answer_max_tokens.is_some() {
            config.answer.max_output_tokens = self.answer_max_tokens;
        }
        if let Some(m) = &self.classifier_model {
            config.classifier.model = m.clone();
        }
        if let Some(m) = &self.extractor_model {
            config.extractor.model = m.clone();
        }
        if let Some(m) = &self.embedding_model {
            config.embedding_model = m.clone();
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}
