pub mod cli;
pub mod client;
pub mod error;
pub mod history;
pub mod llm;
pub mod models;
pub mod server;

use cli::{ ChatArgs, Cli, Command, ServeArgs };
use client::relay::RelayClient;
use client::terminal::{ run_chat, TerminalView };
use history::initialize_history_store;
use llm::chat::new_client;
use llm::LlmConfig;
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error + Send + Sync>> {
    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Chat(args) => chat(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Relay Configuration ---");
    info!("Listen Address: {}:{}", args.host, args.port);
    info!("Gemini Model: {}", args.model);
    info!("Gemini Base URL: {}", args.base_url);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("---------------------------");

    let config = LlmConfig {
        api_key: Some(args.api_key.clone()).filter(|k| !k.trim().is_empty()),
        model: Some(args.model.clone()),
        base_url: Some(args.base_url.clone()),
    };
    let client = new_client(&config)?;

    let server = Server::new(client, args);
    server.run().await
}

async fn chat(args: ChatArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("Relay URL: {}", args.relay_url);
    let store = initialize_history_store(&args)?;
    let relay = RelayClient::new(&args.relay_url)?;
    let mut view = TerminalView::new();

    run_chat(&args, store, relay, &mut view).await
}
