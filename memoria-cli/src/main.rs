//! CLI entry point for memoria

use anyhow::Result;
use clap::Parser;
use console::style;
use memoria_agent::{Session, SessionOptions, StdinLines, EXIT_COMMAND};
use memoria_core::config::ConfigLoader;
use memoria_core::conversation::ConversationStore;
use memoria_core::logging::init_logging;
use memoria_core::utils::expand_tilde;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

mod provider;

use provider::build_provider;

#[derive(Parser)]
#[command(name = "memoria")]
#[command(about = "Chat with a language model that remembers every conversation")]
#[command(version)]
struct Cli {
    /// Configuration directory
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Conversation file to read and extend
    #[arg(long)]
    conversation: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config_loader = if let Some(dir) = cli.config_dir {
        ConfigLoader::with_dir(dir)
    } else {
        ConfigLoader::new()
    };

    let mut config = config_loader.load()?;
    if let Some(model) = cli.model {
        config.provider.model = model;
    }

    let _log_guard = init_logging(&config.logging);

    let conversation_path = cli
        .conversation
        .unwrap_or_else(|| expand_tilde(&config.session.conversation_file));
    let store = ConversationStore::new(&conversation_path);
    let provider = Arc::new(build_provider(&config.provider)?);

    info!(
        "Starting session with model {} (conversation: {})",
        config.provider.model,
        conversation_path.display()
    );

    let mut session = Session::new(store, provider, SessionOptions::from(&config));
    let restored = session.bootstrap()?;

    println!(
        "{} {}",
        style("memoria").magenta().bold(),
        style(format!("({})", config.provider.model)).dim()
    );
    if restored > 0 {
        println!(
            "{}",
            style(format!("Remembering {} earlier turns.", restored)).dim()
        );
    }
    println!(
        "{}",
        style(format!("Type '{}' to leave.", EXIT_COMMAND)).dim()
    );

    let mut input = StdinLines::stdin();
    let mut stdout = std::io::stdout();
    session.run(&mut input, &mut stdout).await?;

    Ok(())
}
