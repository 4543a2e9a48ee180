use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ai::chat::ChatSession;
use crate::core::{AppConfig, logging};

const HELP: &str = r"Commands:
  /search on|off    toggle web search
  /system <prompt>  set the system prompt (empty to clear)
  /clear            clear the chat history
  /history          show the chat history
  /help             show this message";

fn print_history(session: &ChatSession) {
    for msg in session.transcript().iter() {
        println!("[{:?}] {}\n  {}", msg.role, msg.content, msg.caption());
    }
}

/// Handles a slash command. Returns `false` if `line` is not one.
fn handle_command(session: &mut ChatSession, line: &str) -> bool {
    let Some(command) = line.strip_prefix('/') else {
        return false;
    };
    let (name, arg) = command.split_once(' ').unwrap_or((command, ""));

    match name {
        "search" => match arg.trim() {
            "on" => session.set_search_tool(true),
            "off" => session.set_search_tool(false),
            _ => println!("Usage: /search on|off"),
        },
        "system" => session.set_system_prompt(arg),
        "clear" => session.clear(),
        "history" => print_history(session),
        _ => println!("{}", HELP),
    }
    println!("Model: {}", session.model_label());
    true
}

pub async fn run(search: bool, system: Option<String>) -> Result<()> {
    logging::init(&format!("{}=info", env!("CARGO_CRATE_NAME")));

    let config = AppConfig::from_env()?;
    let mut session = ChatSession::builder(
        &config.gemini_api_hostname,
        &config.gemini_api_key,
        &config.chat_model,
    )
    .search_tool(search)
    .system_prompt(system.as_deref())
    .build();

    let mut rl = DefaultEditor::new()?;
    println!("Chatting with {}. Type /help for commands.", session.model_label());

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                if handle_command(&mut session, line) {
                    continue;
                }
                match session.next_msg(line).await {
                    Ok(msg) => println!("{}\n\n{}", msg.content, msg.caption()),
                    Err(err) => println!("Error: {}", err),
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
