use anyhow::Result;
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Import from our modular crates
use tqa_cli::{
    display_banner, handle_input_with_history, print_answer, print_failure, print_help,
    print_prompt,
};
use tqa_core::{EmbeddingProvider, PromptBudget};
use tqa_openai::OpenAiClient;
use tqa_rag::{AnswerSynthesizer, DEFAULT_MAX_TOKENS, EmbeddingStore, SynthesisConfig};

#[derive(Parser)]
#[command(name = "tqa")]
#[command(about = "Answers questions about the QMUL MSc project thesis module", long_about = None)]
struct Cli {
    /// Ask a single question and exit
    #[arg(short, long)]
    query: Option<String>,

    /// Embedding index snapshot (CSV with content and embedding columns)
    #[arg(long, env = "TQA_INDEX", default_value = "msc-embeddings.csv")]
    index: PathBuf,

    /// Chat model used for generation and token counting
    #[arg(long)]
    model: Option<String>,

    /// Token budget for the assembled prompt
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: usize,

    /// Give up on a question after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the prompt sent to the model
    #[arg(long)]
    show_prompt: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Initialize components
    let client = Arc::new(OpenAiClient::from_env()?);
    let store = Arc::new(EmbeddingStore::load_csv(&cli.index)?);

    let config = SynthesisConfig {
        chat_model: cli
            .model
            .clone()
            .unwrap_or_else(|| client.chat_model().to_string()),
        max_tokens: cli.max_tokens,
        timeout: cli.timeout_secs.map(Duration::from_secs),
        ..Default::default()
    };
    let budget: PromptBudget = config.budget();
    let refusal_phrase = config.template.refusal_phrase.clone();

    let embedding_model = client.embedding_model().to_string();

    let synthesizer = AnswerSynthesizer::new(store.clone(), client.clone(), client, config)?;
    info!(
        model = %budget.model_id,
        embedding_model = %embedding_model,
        max_tokens = budget.max_tokens,
        "pipeline ready"
    );

    // Handle one-shot question
    if let Some(query) = cli.query {
        return match synthesizer.answer(&query).await {
            Ok(answer) => {
                if cli.show_prompt {
                    print_prompt(&answer.prompt, &answer.digest);
                }
                print_answer(&answer, &refusal_phrase);
                Ok(())
            }
            Err(e) => {
                print_failure(&e);
                std::process::exit(1);
            }
        };
    }

    // Interactive mode
    display_banner(store.len(), &budget.model_id);

    let mut history = Vec::new();

    loop {
        let input = handle_input_with_history(&mut history)?;

        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "exit" | "quit" => {
                println!("{}", "👋 Goodbye!".green());
                break;
            }
            "help" => {
                print_help();
                continue;
            }
            _ => {}
        }

        println!("{} Searching the thesis guide...", "🔎".blue());

        match synthesizer.answer(&input).await {
            Ok(answer) => {
                if cli.show_prompt {
                    print_prompt(&answer.prompt, &answer.digest);
                }
                print_answer(&answer, &refusal_phrase);
            }
            Err(e) => print_failure(&e),
        }
    }

    Ok(())
}
