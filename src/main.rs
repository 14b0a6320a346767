//! Mini Compiler
//!
//! Command line driver: parse, lower and analyze a Mini source file, then
//! report diagnostics or print one of the intermediate representations.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use minic::feedback::CheckReport;
use minic::middle::tir_printer::print_functions;
use minic::sema::SemaOptions;
use minic::{compile_source, Compilation};

/// Mini Compiler
#[derive(Parser, Debug)]
#[command(name = "minic")]
#[command(version = "0.1.0")]
#[command(about = "Mini compiler - semantic analysis for the Mini language")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Analyze functions one after another instead of in parallel
    #[arg(long, global = true)]
    sequential: bool,

    /// Print at most N diagnostics (0 = no limit)
    #[arg(long, global = true, value_name = "N", default_value = "0")]
    max_errors: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a source file for errors
    Check {
        /// Input source file
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print an intermediate representation of a source file
    Emit {
        /// Input source file
        input: PathBuf,

        /// Which IR to print
        #[arg(long, value_enum, default_value_t = Stage::Tir)]
        stage: Stage,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Uir,
    Tir,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let options = SemaOptions {
        parallel: !cli.sequential,
    };

    let result = match &cli.command {
        Commands::Check { input, format } => check_file(input, *format, &options, cli.max_errors),
        Commands::Emit { input, stage } => emit_file(input, *stage, &options, cli.max_errors),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            process::exit(1);
        }
    }
}

fn read_source(input: &Path) -> Result<String> {
    fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

/// Check a source file. Returns whether it is free of errors.
fn check_file(input: &Path, format: Format, options: &SemaOptions, max_errors: usize) -> Result<bool> {
    let source = read_source(input)?;
    let file = input.display().to_string();
    log::debug!("checking {}", file);

    let compilation = compile_source(&source, options);

    if format == Format::Json {
        let report = match &compilation {
            Ok(compilation) => CheckReport::from_compilation(&file, compilation, &source),
            Err(err) => CheckReport::from_error(&file, err, &source),
        };
        println!("{}", report.to_json());
        return Ok(report.success);
    }

    let compilation = match compilation {
        Ok(compilation) => compilation,
        Err(err) => {
            eprintln!("{}", err.render(&source));
            return Ok(false);
        }
    };

    if report_diagnostics(&compilation, &source, max_errors) {
        println!("✅ No errors found");
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Print UIR or typed IR. Returns whether the file is free of errors.
fn emit_file(input: &Path, stage: Stage, options: &SemaOptions, max_errors: usize) -> Result<bool> {
    let source = read_source(input)?;

    let compilation = match compile_source(&source, options) {
        Ok(compilation) => compilation,
        Err(err) => {
            eprintln!("{}", err.render(&source));
            return Ok(false);
        }
    };

    match stage {
        Stage::Uir => print!("{}", compilation.program),
        Stage::Tir => print!("{}", print_functions(&compilation.analysis.functions)),
    }

    Ok(report_diagnostics(&compilation, &source, max_errors))
}

/// Print diagnostics to stderr. Returns true if there were none.
fn report_diagnostics(compilation: &Compilation, source: &str, max_errors: usize) -> bool {
    let rendered = compilation.render_diagnostics(source);
    let limit = if max_errors == 0 { rendered.len() } else { max_errors };

    for block in rendered.iter().take(limit) {
        eprintln!("{}", block);
    }
    if rendered.len() > limit {
        eprintln!("... and {} more errors", rendered.len() - limit);
    }
    if !rendered.is_empty() {
        eprintln!("{} error(s) found", rendered.len());
    }

    rendered.is_empty()
}
