use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use zs_core::ConditionDefinition;
use zs_mechanics::{LevelPrompt, PromptReply};
use zs_tracker::{TrackerConfig, TrackerSession};

/// Asks for levels on stdout and reads answers from the session's input.
///
/// End of input or an empty line cancels.
struct TerminalPrompt<'a, R> {
    reader: &'a mut R,
}

impl<R: BufRead> LevelPrompt for TerminalPrompt<'_, R> {
    fn request_level(&mut self, definition: &ConditionDefinition) -> PromptReply {
        print!("  {} level? ", definition.label());
        if io::stdout().flush().is_err() {
            return PromptReply::Cancelled;
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => PromptReply::Cancelled,
            Ok(_) if line.trim().is_empty() => PromptReply::Cancelled,
            Ok(_) => {
                let reply = PromptReply::parse(&line);
                match reply {
                    PromptReply::Level(level) if level < 1 => {
                        println!("  {}", "Level must be at least 1.".yellow());
                    }
                    PromptReply::Invalid => println!("  {}", "Enter a number.".yellow()),
                    _ => {}
                }
                reply
            }
        }
    }
}

pub fn run(
    catalog: Option<&Path>,
    seed: Option<u64>,
    strict_levels: bool,
    max_prompt_attempts: Option<u32>,
) -> Result<(), String> {
    let catalog = super::load_catalog(catalog)?;
    let mut config = TrackerConfig::default();
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if strict_levels {
        config = config.with_strict_levels();
    }
    if let Some(attempts) = max_prompt_attempts {
        config = config.with_max_prompt_attempts(attempts);
    }

    let condition_count = catalog.len();
    let mut session = TrackerSession::new(catalog, config);

    println!("  {} condition tracker", "Starting".bold());
    println!("  {condition_count} conditions loaded");
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim().to_string();
        if input.is_empty() {
            continue;
        }

        let mut prompt = TerminalPrompt {
            reader: &mut reader,
        };
        match session.process(&input, &mut prompt) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}\n");
                }
                if session.is_finished() {
                    break;
                }
            }
            Err(e) => {
                println!("{}\n", e.to_string().yellow());
            }
        }
    }

    Ok(())
}
