use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ai::chat::{Chat, ChatBuilder};
use crate::core::AppConfig;

/// Commands typed at the prompt instead of a message
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Clear,
    History,
    Personality(&'a str),
    Prompt(&'a str),
    Empty,
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    match line.split_once(' ') {
        Some(("/personality", text)) => Input::Personality(text.trim()),
        _ => match line {
            "/clear" => Input::Clear,
            "/history" => Input::History,
            _ => Input::Prompt(line),
        },
    }
}

fn print_history(chat: &Chat) {
    for (i, turn) in chat.transcript().iter().enumerate() {
        println!("[{}] {:?}: {}", i, turn.role, turn.text);
    }
}

pub async fn run(config: AppConfig, personality: Option<String>) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut chat = ChatBuilder::from_config(&config).build();

    if !chat.is_configured() {
        println!("GEMINI_API_KEY is not set, prompts will fail");
    }

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match parse_input(&line) {
                    Input::Empty => continue,
                    Input::Clear => {
                        chat.clear_history();
                        println!("History cleared");
                    }
                    Input::History => print_history(&chat),
                    Input::Personality(text) => chat.set_personality(text),
                    Input::Prompt(prompt) => {
                        let result = match &personality {
                            Some(p) => chat.send_prompt_with_personality(prompt, p).await,
                            None => chat.send_prompt(prompt).await,
                        };
                        match result {
                            Ok(reply) => println!("{}", reply),
                            // Details are already logged, keep the session going
                            Err(err) => println!("Error: {}", err),
                        }
                    }
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
