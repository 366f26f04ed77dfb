//! UI utilities for the CLI

use colored::*;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, size},
};
use std::io::{self, IsTerminal, Write};
use tqa_core::Result;

const PROMPT: &str = "tqa>";

/// Display startup banner
pub fn display_banner(passages: usize, chat_model: &str) {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(67, terminal_width.saturating_sub(4)).max(40);

    let top_border = format!("┌{}┐", "─".repeat(banner_width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(banner_width - 2));
    let empty_line = format!("│{}│", " ".repeat(banner_width - 2));

    println!();
    println!("{}", top_border.blue());
    println!("{}", empty_line.blue());

    let title = "TQA - MSc Project Thesis Q&A";
    println!(
        "{}{}{}{}",
        "│  ".blue(),
        title.blue().bold(),
        " ".repeat(banner_width - title.chars().count() - 4),
        " │".blue()
    );
    println!("{}", empty_line.blue());

    let feature_lines = [
        format!("Corpus: {passages} passages"),
        format!("Model: {chat_model}"),
        String::new(),
        "Answers cite the most related passages".to_string(),
        "Low-confidence sources are flagged, not hidden".to_string(),
    ];

    for line in &feature_lines {
        if line.is_empty() {
            println!("{}", empty_line.blue());
        } else {
            let padding = banner_width.saturating_sub(line.chars().count() + 4);
            println!("{}", format!("│  {}{}│", line, " ".repeat(padding)).blue());
        }
    }

    println!("{}", empty_line.blue());
    println!("{}", bottom_border.blue());
    println!();
    println!(
        "{}",
        "💡 Tip: Ask a question about the project module, or 'help' for commands".dimmed()
    );
    println!();
}

/// Read one line of input, with ↑/↓ history navigation on a terminal
pub fn handle_input_with_history(history: &mut Vec<String>) -> Result<String> {
    // Piped input: read a plain line
    if !io::stdin().is_terminal() {
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok("exit".to_string());
        }
        let input = input.trim().to_string();
        if !input.is_empty() {
            history.push(input.clone());
        }
        return Ok(input);
    }

    enable_raw_mode()?;
    let result = read_raw_line(history);
    disable_raw_mode()?;
    println!();
    result
}

fn read_raw_line(history: &mut Vec<String>) -> Result<String> {
    let mut input = String::new();
    let mut history_index: Option<usize> = None;

    print!("{} ", PROMPT.green().bold());
    io::stdout().flush()?;

    loop {
        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }
        if is_abort(&key_event) {
            return Ok("exit".to_string());
        }

        match key_event.code {
            KeyCode::Enter => {
                let input = input.trim().to_string();
                if !input.is_empty() {
                    history.push(input.clone());
                }
                return Ok(input);
            }
            KeyCode::Char(c) => {
                input.push(c);
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Up if !history.is_empty() => {
                let new_index = match history_index {
                    None => history.len() - 1,
                    Some(idx) => idx.saturating_sub(1),
                };
                history_index = Some(new_index);
                input = history[new_index].clone();
            }
            KeyCode::Down => {
                if let Some(idx) = history_index {
                    if idx + 1 < history.len() {
                        history_index = Some(idx + 1);
                        input = history[idx + 1].clone();
                    } else {
                        history_index = None;
                        input.clear();
                    }
                }
            }
            KeyCode::Esc => return Ok(String::new()),
            _ => continue,
        }

        redraw(&input)?;
    }
}

/// Ctrl+C or Ctrl+D at the prompt leaves the session
fn is_abort(key_event: &KeyEvent) -> bool {
    key_event.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key_event.code, KeyCode::Char('c' | 'C' | 'd' | 'D'))
}

fn redraw(input: &str) -> Result<()> {
    let (width, _) = size().unwrap_or((80, 24));
    print!(
        "\r{}\r{} {}",
        " ".repeat(width as usize),
        PROMPT.green().bold(),
        input
    );
    io::stdout().flush()?;
    Ok(())
}

/// Display help message
pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  {} - Ask anything about the MSc project thesis module", "question".green());
    println!("  {} - Show this help message", "help".green());
    println!("  {} - Exit the application", "exit/quit".green());
    println!();
    println!("{}", "Examples:".bold());
    println!("  When is the final report due?");
    println!("  How long should the dissertation be?");
    println!("  Who allocates project supervisors?");
}
