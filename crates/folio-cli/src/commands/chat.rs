use std::io::Write;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use folio_chat::{
    ChatConfig, EventTransport, HttpEventTransport, Message, SessionUpdate, StreamingChatSession,
};

use crate::cli::{ChatArgs, OutputFormat};
use crate::output::json::print_json;

const CLEAR_LINE: &str = "\r\x1b[2K";

pub async fn run(args: ChatArgs, config: ChatConfig, format: OutputFormat) -> Result<()> {
    let transport = HttpEventTransport::new(config.backend_url.clone())
        .context("Failed to build HTTP client")?;
    tracing::debug!(backend = ?transport.base_url(), "Chat transport ready");

    let mut chat = StreamingChatSession::new(transport, &config);
    let thread_id = chat.start();
    tracing::info!(thread_id = %thread_id, "Chat session started");

    let result = match args.message {
        Some(message) => one_shot(&mut chat, &message, format).await,
        None => repl(&mut chat, BufReader::new(tokio::io::stdin())).await,
    };
    chat.close();
    result
}

async fn one_shot<T: EventTransport>(
    chat: &mut StreamingChatSession<T>,
    message: &str,
    format: OutputFormat,
) -> Result<()> {
    if !chat.send_message(message) {
        bail!("Message is empty");
    }

    if format.is_json() {
        chat.finish_cycle().await;
        return print_json(&json!({
            "thread_id": chat.thread_id(),
            "transcript": chat.transcript(),
        }));
    }

    let mut view = CycleView::begin(chat)?;
    while let Some(update) = chat.next_update().await {
        view.render(chat, update)?;
    }
    Ok(())
}

/// Interactive loop. Input stays live while a reply streams, so a new line
/// supersedes the reply in flight and `/quit` always leaves.
async fn repl<T, R>(chat: &mut StreamingChatSession<T>, input: R) -> Result<()>
where
    T: EventTransport,
    R: AsyncBufRead + Unpin,
{
    for message in chat.transcript() {
        print_message(message);
    }
    println!("{}", "Type a message, /transcript to review, /quit to leave.".dimmed());

    let mut lines = input.lines();
    let mut input_open = true;
    let mut view = CycleView::default();
    prompt()?;

    loop {
        tokio::select! {
            biased;

            Some(update) = chat.next_update(), if chat.has_active_connection() => {
                let terminal = update.is_terminal();
                view.render(chat, update)?;
                if terminal {
                    if !input_open {
                        break;
                    }
                    prompt()?;
                }
            }
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    // Piped input: let the reply in flight finish.
                    input_open = false;
                    if !chat.has_active_connection() {
                        println!();
                        break;
                    }
                    continue;
                };

                match line.trim() {
                    "/quit" | "/exit" => break,
                    "/transcript" => {
                        for message in chat.transcript() {
                            print_message(message);
                        }
                        if !chat.has_active_connection() {
                            prompt()?;
                        }
                    }
                    _ => {
                        if chat.send_message(&line) {
                            view = CycleView::begin(chat)?;
                        } else if chat.is_composing() {
                            println!("{}", "Still waiting for the assistant...".dimmed());
                        } else if !chat.has_active_connection() {
                            prompt()?;
                        }
                    }
                }
            }
            else => break,
        }
    }

    chat.close();
    Ok(())
}

/// Terminal state of the cycle being rendered.
#[derive(Debug, Default)]
struct CycleView {
    started: bool,
}

impl CycleView {
    fn begin<T: EventTransport>(chat: &StreamingChatSession<T>) -> Result<Self> {
        if chat.is_composing() {
            print!("{}", "assistant is typing...".dimmed());
            std::io::stdout().flush()?;
        }
        Ok(Self::default())
    }

    fn render<T: EventTransport>(
        &mut self,
        chat: &StreamingChatSession<T>,
        update: SessionUpdate,
    ) -> Result<()> {
        match update {
            SessionUpdate::AssistantStarted { fragment, .. } => {
                self.started = true;
                print!("{CLEAR_LINE}{} {}", "assistant:".cyan().bold(), fragment);
            }
            SessionUpdate::AssistantAppended { fragment, .. } => print!("{fragment}"),
            SessionUpdate::Finished if self.started => println!(),
            // Empty reply: only the typing indicator is on screen.
            SessionUpdate::Finished => print!("{CLEAR_LINE}"),
            SessionUpdate::Failed { id, .. } => {
                let apology = chat
                    .transcript()
                    .iter()
                    .find(|m| m.id == id)
                    .map(|m| m.text.clone())
                    .unwrap_or_default();
                println!("{CLEAR_LINE}{} {}", "assistant:".cyan().bold(), apology.red());
            }
            SessionUpdate::Ignored => {}
        }
        std::io::stdout().flush()?;
        Ok(())
    }
}

fn prompt() -> Result<()> {
    print!("{} ", ">".bold());
    std::io::stdout().flush()?;
    Ok(())
}

fn print_message(message: &Message) {
    if message.is_user() {
        println!("{} {}", "you:".green().bold(), message.text);
    } else {
        println!("{} {}", "assistant:".cyan().bold(), message.text);
    }
}
