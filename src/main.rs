// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! tinyc - a compiler and stack VM for a tiny integer language
//!
//! This is the main entry point for the tinyc CLI/REPL.
//!
//! ## Features
//!
//! - Run a program file, an inline program or standard input
//! - Optional bytecode listing before execution
//! - Interactive REPL with highlighting and history

mod repl;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use tinyc_engine::{AsyncEngine, Bytecode, Config, DEFAULT_MAX_DEPTH, Error, Report, VM};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Printed before the report of every successful run.
const COMPLETION_NOTICE: &str = "Program executed.";

#[derive(Parser)]
#[command(
    name = "tinyc",
    about = "Compile and run tinyc programs on a stack VM",
    version,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// Program file to run ("-" reads standard input)
    file: Option<PathBuf>,

    /// Run the given program text
    #[arg(short = 'e', long = "eval", conflicts_with = "file")]
    eval: Option<String>,

    /// Start interactive REPL
    #[arg(short = 'i', long = "interactive", alias = "repl")]
    interactive: bool,

    /// Print the bytecode listing before running
    #[arg(short = 'd', long = "disassemble")]
    disassemble: bool,

    /// Maximum nesting depth of statements and expressions
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Stop with an error after this many executed instructions
    #[arg(long)]
    max_steps: Option<u64>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Main entry point - uses tokio runtime for async file reads.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = Config {
        max_depth: cli.max_depth,
        max_steps: cli.max_steps,
    };
    let engine = AsyncEngine::with_config(config);

    if let Some(code) = &cli.eval {
        return run_source(&engine, code, cli.disassemble);
    }

    match &cli.file {
        Some(path) if path.as_os_str() != "-" => run_file(&engine, path, cli.disassemble).await,
        Some(_) => run_stdin(&engine, cli.disassemble),
        None if cli.interactive || atty::is(atty::Stream::Stdin) => run_repl(config),
        None => run_stdin(&engine, cli.disassemble),
    }
}

/// `RUST_LOG` wins; otherwise `--verbose` turns on debug output for both
/// crates.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("tinyc=debug,tinyc_engine=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Start the interactive REPL
fn run_repl(config: Config) -> ExitCode {
    match repl::Repl::new(config) {
        Ok(mut repl) => {
            if let Err(e) = repl.run() {
                eprintln!("{}: {:?}", "REPL Error".red().bold(), e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(
                "{}: Failed to initialize REPL: {:?}",
                "Error".red().bold(),
                e
            );
            ExitCode::FAILURE
        }
    }
}

/// Read and run a program file asynchronously.
async fn run_file(engine: &AsyncEngine, path: &Path, disassemble: bool) -> ExitCode {
    match engine.compile_file(path).await {
        Ok(bytecode) => run_bytecode(&bytecode, engine.config().max_steps, disassemble),
        Err(e) => {
            repl::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Run a program piped in on standard input.
fn run_stdin(engine: &AsyncEngine, disassemble: bool) -> ExitCode {
    match read_stdin() {
        Ok(source) => run_source(engine, &source, disassemble),
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut source = String::new();
    std::io::Read::read_to_string(&mut std::io::stdin(), &mut source)
        .context("failed to read program from standard input")?;
    Ok(source)
}

/// Compile, optionally list, then execute a program.
fn run_source(engine: &AsyncEngine, source: &str, disassemble: bool) -> ExitCode {
    match engine.compile(source) {
        Ok(bytecode) => run_bytecode(&bytecode, engine.config().max_steps, disassemble),
        Err(e) => {
            repl::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run_bytecode(bytecode: &Bytecode, max_steps: Option<u64>, disassemble: bool) -> ExitCode {
    if disassemble {
        print!("{}", bytecode);
        println!();
    }

    match execute(bytecode, max_steps) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            repl::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Runs a compiled program and renders everything a successful run prints
/// on stdout.
fn execute(bytecode: &Bytecode, max_steps: Option<u64>) -> Result<String, Error> {
    let mut vm = VM::with_step_limit(max_steps);
    let report = vm.run(bytecode)?;
    debug!(steps = vm.steps(), "program executed");
    Ok(render_report(&report))
}

fn render_report(report: &Report) -> String {
    format!("{}\n{}", COMPLETION_NOTICE, report)
}
