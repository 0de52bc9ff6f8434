// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Interactive REPL (Read-Eval-Print Loop) for tinyc.
//!
//! Every entered program is compiled and run in a fresh VM; variables do not
//! carry over between entries.

use owo_colors::OwoColorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Editor, Helper};
use std::borrow::Cow;
use std::path::PathBuf;
use tinyc_engine::{Config, Engine, Error, Report};

/// REPL configuration constants
const HISTORY_FILE: &str = ".tinyc_history";
const MAX_HISTORY_SIZE: usize = 1000;

/// Language keywords, highlighted and offered for completion
const KEYWORDS: &[&str] = &["if", "else", "while", "do"];

/// REPL commands that can be executed with a dot prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Exit,
    Clear,
    Version,
    Load,
    Dis,
}

impl ReplCommand {
    /// Parse a REPL command from input string
    pub fn parse(input: &str) -> Option<(Self, Option<&str>)> {
        let rest = input.trim().strip_prefix('.')?;

        let mut parts = rest.splitn(2, char::is_whitespace);
        let cmd = parts.next()?.to_lowercase();
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

        let command = match cmd.as_str() {
            "help" | "h" | "?" => ReplCommand::Help,
            "exit" | "quit" | "q" => ReplCommand::Exit,
            "clear" | "cls" => ReplCommand::Clear,
            "version" | "v" => ReplCommand::Version,
            "load" | "l" => ReplCommand::Load,
            "dis" | "d" => ReplCommand::Dis,
            _ => return None,
        };
        Some((command, arg))
    }

    /// Get all available commands for help/completion
    pub fn all_commands() -> &'static [(&'static str, &'static str)] {
        &[
            (".help", "Show this help message"),
            (".exit", "Exit the REPL"),
            (".clear", "Clear the screen"),
            (".version", "Show version information"),
            (".load <file>", "Load and run a program file"),
            (".dis <program>", "Show the bytecode listing without running"),
        ]
    }
}

/// Helper struct for rustyline that provides completion, hints, and validation
struct TinycHelper {
    /// Keywords and commands for completion
    words: Vec<&'static str>,
}

impl TinycHelper {
    fn new() -> Self {
        let commands = [".help", ".exit", ".clear", ".version", ".load", ".dis"];
        Self {
            words: KEYWORDS.iter().copied().chain(commands).collect(),
        }
    }

    fn matches<'a>(&'a self, word: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        self.words
            .iter()
            .copied()
            .filter(move |w| w.starts_with(word) && w.len() > word.len())
    }

    /// Untyped rest of the first word that completes the one before `pos`.
    fn completion_suffix(&self, line: &str, pos: usize) -> Option<String> {
        if pos < line.len() {
            return None;
        }

        let word = &line[word_start(line, pos)..];
        if word.len() < 2 {
            return None;
        }

        self.matches(word).next().map(|w| w[word.len()..].to_string())
    }
}

/// Start of the word ending at `pos`.
fn word_start(line: &str, pos: usize) -> usize {
    line[..pos]
        .char_indices()
        .rev()
        .find(|&(_, c)| !c.is_alphanumeric() && c != '.')
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0)
}

impl Completer for TinycHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let word = &line[word_start(line, pos)..pos];
        if word.is_empty() {
            return Ok((pos, vec![]));
        }

        let matches = self
            .matches(word)
            .map(|w| Pair {
                display: w.to_string(),
                replacement: w[word.len()..].to_string(),
            })
            .collect();

        Ok((pos, matches))
    }
}

impl Hinter for TinycHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        self.completion_suffix(line, pos)
            .map(|suffix| suffix.dimmed().to_string())
    }
}

impl Highlighter for TinycHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.trim_start().starts_with('.') {
            return Cow::Owned(line.magenta().to_string());
        }

        let mut result = String::with_capacity(line.len() * 2);
        let mut current_word = String::new();

        for c in line.chars() {
            if c.is_alphanumeric() {
                current_word.push(c);
                continue;
            }
            if !current_word.is_empty() {
                result.push_str(&highlight_word(&current_word));
                current_word.clear();
            }
            let colored = match c {
                '(' | ')' | '{' | '}' => c.yellow().to_string(),
                '+' | '-' | '<' | '=' => c.cyan().to_string(),
                '%' => c.dimmed().to_string(),
                _ => c.to_string(),
            };
            result.push_str(&colored);
        }

        if !current_word.is_empty() {
            result.push_str(&highlight_word(&current_word));
        }

        Cow::Owned(result)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn highlight_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if KEYWORDS.contains(&lower.as_str()) {
        word.magenta().bold().to_string()
    } else if word.chars().all(|c| c.is_ascii_digit()) {
        word.yellow().to_string()
    } else if word.chars().count() == 1 && word.chars().all(|c| c.is_ascii_alphabetic()) {
        word.to_string()
    } else {
        // Multi-letter words that are not keywords never lex
        word.red().underline().to_string()
    }
}

impl Validator for TinycHelper {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        let input = ctx.input();

        if input.trim_start().starts_with('.') {
            return Ok(ValidationResult::Valid(None));
        }

        if !is_balanced(input) {
            return Ok(ValidationResult::Incomplete);
        }

        // A trailing operator always needs another operand
        let trimmed = input.trim_end();
        if trimmed.ends_with(['+', '-', '<', '=']) {
            return Ok(ValidationResult::Incomplete);
        }

        Ok(ValidationResult::Valid(None))
    }
}

/// Check if braces and parentheses are balanced
fn is_balanced(input: &str) -> bool {
    let mut stack = Vec::new();

    for c in input.chars() {
        match c {
            '%' => break,
            '(' => stack.push(')'),
            '{' => stack.push('}'),
            ')' | '}' => {
                if stack.pop() != Some(c) {
                    return true; // Unbalanced but we should let the parser handle the error
                }
            }
            _ => {}
        }
    }

    stack.is_empty()
}

impl Helper for TinycHelper {}

/// The interactive REPL for tinyc
pub struct Repl {
    engine: Engine,
    editor: Editor<TinycHelper, DefaultHistory>,
    history_path: PathBuf,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new(config: Config) -> rustyline::Result<Self> {
        let editor_config = rustyline::Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .max_history_size(MAX_HISTORY_SIZE)?
            .auto_add_history(true)
            .build();

        let mut editor = Editor::with_config(editor_config)?;
        editor.set_helper(Some(TinycHelper::new()));

        // Determine history file path
        let history_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tinyc")
            .join(HISTORY_FILE);

        if let Some(parent) = history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        // Missing history is fine on first start
        let _ = editor.load_history(&history_path);

        Ok(Self {
            engine: Engine::with_config(config),
            editor,
            history_path,
        })
    }

    /// Run the REPL main loop
    pub fn run(&mut self) -> rustyline::Result<()> {
        self.print_banner();

        loop {
            let prompt = format!("{} ", "tinyc>".bright_green().bold());

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();

                    if trimmed.is_empty() {
                        continue;
                    }

                    if let Some((cmd, arg)) = ReplCommand::parse(trimmed) {
                        match self.execute_command(cmd, arg) {
                            CommandResult::Continue => continue,
                            CommandResult::Exit => break,
                        }
                    }

                    if trimmed.starts_with('.') {
                        eprintln!(
                            "{}: unknown command '{}', try {}",
                            "Error".red().bold(),
                            trimmed.cyan(),
                            ".help".cyan()
                        );
                        continue;
                    }

                    self.eval_and_print(trimmed);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C".dimmed());
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "^D".dimmed());
                    break;
                }
                Err(err) => {
                    eprintln!("{}: {:?}", "Error".red().bold(), err);
                    break;
                }
            }
        }

        let _ = self.editor.save_history(&self.history_path);

        println!();
        Ok(())
    }

    fn print_banner(&self) {
        println!();
        println!(
            "  {} {} {}",
            "tinyc".bright_cyan().bold(),
            "v".dimmed(),
            env!("CARGO_PKG_VERSION").bright_yellow()
        );
        println!(
            "  {}",
            "Integers a..z, if/else, while, do-while. End a program with %.".dimmed()
        );
        println!(
            "  {} {} {}",
            "Type".dimmed(),
            ".help".cyan(),
            "for available commands".dimmed()
        );
        println!();
    }

    fn execute_command(&mut self, cmd: ReplCommand, arg: Option<&str>) -> CommandResult {
        match cmd {
            ReplCommand::Help => self.print_help(),
            ReplCommand::Exit => return CommandResult::Exit,
            ReplCommand::Clear => print!("\x1B[2J\x1B[H"),
            ReplCommand::Version => {
                println!(
                    "{} {}",
                    "tinyc".bright_cyan().bold(),
                    env!("CARGO_PKG_VERSION").yellow()
                );
            }
            ReplCommand::Load => match arg {
                Some(path) => self.print_outcome(self.engine.eval_file(path)),
                None => missing_argument(".load", "a file path"),
            },
            ReplCommand::Dis => match arg {
                Some(program) => match self.engine.compile(program) {
                    Ok(bytecode) => print!("{}", bytecode),
                    Err(e) => print_error(&e),
                },
                None => missing_argument(".dis", "a program"),
            },
        }
        CommandResult::Continue
    }

    fn print_help(&self) {
        println!();
        println!("{}", "REPL Commands:".white().bold());
        println!();

        for (cmd, desc) in ReplCommand::all_commands() {
            println!("  {:16} {}", cmd.cyan(), desc.dimmed());
        }

        println!();
        println!("{}", "Keyboard Shortcuts:".white().bold());
        println!();
        println!(
            "  {:16} {}",
            "Ctrl+C".yellow(),
            "Cancel current input".dimmed()
        );
        println!("  {:16} {}", "Ctrl+D".yellow(), "Exit REPL".dimmed());
        println!("  {:16} {}", "Tab".yellow(), "Autocomplete".dimmed());
        println!("  {:16} {}", "↑/↓".yellow(), "Navigate history".dimmed());
        println!();
    }

    fn eval_and_print(&mut self, input: &str) {
        self.print_outcome(self.engine.eval(input));
    }

    fn print_outcome(&self, outcome: Result<Report, Error>) {
        match outcome {
            Ok(report) => print!("{}", format_report(&report)),
            Err(e) => print_error(&e),
        }
    }
}

/// Result of executing a REPL command
enum CommandResult {
    Continue,
    Exit,
}

fn missing_argument(command: &str, what: &str) {
    eprintln!(
        "{}: {} {}",
        "Error".red().bold(),
        command.cyan(),
        format!("requires {}", what).dimmed()
    );
}

/// Format a report with one colored `x = v` line per non-zero variable
fn format_report(report: &Report) -> String {
    if report.is_empty() {
        return format!("{}\n", "(all variables are zero)".dimmed());
    }

    report
        .iter()
        .map(|(var, value)| format!("{} = {}\n", var.cyan(), value.yellow()))
        .collect()
}

/// Print a formatted error message
pub fn print_error(error: &Error) {
    let error_str = error.to_string();

    // Split error type from message
    if let Some(colon_pos) = error_str.find(':') {
        let (error_type, message) = error_str.split_at(colon_pos);
        eprintln!("{}{}", error_type.red().bold(), message);
    } else {
        eprintln!("{}", error_str.red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repl_command_parse() {
        assert!(matches!(
            ReplCommand::parse(".help"),
            Some((ReplCommand::Help, None))
        ));
        assert!(matches!(
            ReplCommand::parse(".exit"),
            Some((ReplCommand::Exit, None))
        ));
        assert!(matches!(
            ReplCommand::parse(".load count.tc"),
            Some((ReplCommand::Load, Some("count.tc")))
        ));
        assert!(matches!(
            ReplCommand::parse(".dis a = 1;"),
            Some((ReplCommand::Dis, Some("a = 1;")))
        ));
        assert!(ReplCommand::parse(".bogus").is_none());
        assert!(ReplCommand::parse("a = 1;").is_none());
    }

    #[test]
    fn test_is_balanced() {
        assert!(is_balanced("(a + 2)"));
        assert!(is_balanced("while (i < 3) { i = i + 1; }"));
        assert!(!is_balanced("(a + 2"));
        assert!(!is_balanced("while (i < 3) {"));
        assert!(is_balanced("a = 1; % { ("));
    }

    #[test]
    fn test_completion_words() {
        let helper = TinycHelper::new();
        assert_eq!(helper.matches("wh").collect::<Vec<_>>(), vec!["while"]);
        assert_eq!(helper.matches(".d").collect::<Vec<_>>(), vec![".dis"]);
        assert!(helper.matches("while").next().is_none());
    }

    #[test]
    fn test_word_start() {
        assert_eq!(word_start("a = wh", 6), 4);
        assert_eq!(word_start(".lo", 3), 0);
    }

    #[test]
    fn test_word_start_after_multibyte_delimiter() {
        for line in ["a=«", "a=«wh", "é", "x → do"] {
            let start = word_start(line, line.len());
            assert!(line.is_char_boundary(start), "{:?}", line);
        }
        assert_eq!(word_start("a=«", "a=«".len()), "a=«".len());
        assert_eq!(word_start("a=«wh", "a=«wh".len()), "a=«".len());
        assert_eq!(word_start("x → do", "x → do".len()), "x → ".len());
    }

    #[test]
    fn test_completion_suffix() {
        let helper = TinycHelper::new();
        assert_eq!(helper.completion_suffix("a = wh", 6).as_deref(), Some("ile"));
        assert_eq!(helper.completion_suffix(".lo", 3).as_deref(), Some("ad"));
        assert_eq!(helper.completion_suffix("a=«wh", "a=«wh".len()).as_deref(), Some("ile"));
        assert_eq!(helper.completion_suffix("a=«", "a=«".len()), None);
        assert_eq!(helper.completion_suffix("w", 1), None);
        assert_eq!(helper.completion_suffix("wh x", 2), None);
    }
}
