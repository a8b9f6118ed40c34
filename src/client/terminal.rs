use async_trait::async_trait;
use log::info;
use std::error::Error;
use std::io::{ self, Write };
use std::sync::Arc;
use tokio::io::{ AsyncBufReadExt, BufReader, Lines, Stdin };

use super::relay::RelayClient;
use super::session::ChatSession;
use super::ChatView;
use crate::cli::ChatArgs;
use crate::history::HistoryStore;
use crate::models::chat::Sender;

const TYPING: &str = "bot> ...";

/// Line-oriented transcript on stdout, input from stdin.
pub struct TerminalView {
    lines: Lines<BufReader<Stdin>>,
    echoed: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            echoed: false,
        }
    }

    pub async fn read_input(&mut self) -> io::Result<Option<String>> {
        print!("you> ");
        io::stdout().flush()?;
        let line = self.lines.next_line().await?;
        self.echoed = line.is_some();
        Ok(line)
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatView for TerminalView {
    fn append_message(&mut self, sender: Sender, text: &str) {
        match sender {
            // The line just typed is already on screen.
            Sender::User if self.echoed => self.echoed = false,
            Sender::User => println!("you> {}", text),
            Sender::Bot => println!("bot> {}\n", text),
        }
    }

    fn show_typing_indicator(&mut self) {
        print!("{}", TYPING);
        let _ = io::stdout().flush();
    }

    fn hide_typing_indicator(&mut self) {
        print!("\r{}\r", " ".repeat(TYPING.len()));
        let _ = io::stdout().flush();
    }

    fn clear_transcript(&mut self) {
        self.echoed = false;
        print!("\x1B[2J\x1B[H");
        let _ = io::stdout().flush();
    }

    async fn confirm(&mut self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        let _ = io::stdout().flush();
        match self.lines.next_line().await {
            Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

pub async fn run_chat(
    args: &ChatArgs,
    store: Arc<dyn HistoryStore>,
    relay: RelayClient,
    view: &mut TerminalView,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut session = ChatSession::open(store, relay, &args.history_key, view).await?;
    println!("Type a message. /clear wipes the history, /quit exits.");

    while let Some(line) = view.read_input().await? {
        match line.trim() {
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear(view).await?;
            }
            text if args.single_turn => {
                session.send_single(text, view).await;
            }
            text => {
                session.submit(text, view).await;
            }
        }
    }

    info!("Chat session closed with {} message(s) in history", session.messages().len());
    Ok(())
}
