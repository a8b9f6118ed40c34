use clap::Parser;
use dotenv::dotenv;
use gemini_relay::cli::Cli;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    gemini_relay::run(cli).await
}
