//! dupetrie - Duplicate File Finder
//!
//! Entry point for the dupetrie CLI.

use anyhow::{Context, Result};
use clap::Parser;
use dupetrie::{
    cli::{compile_patterns, split_patterns, Cli, OutputFormat},
    engine::{InitParams, SearchEngine},
    error::ExitCode,
    logging,
    output::{text, JsonOutput, Report},
};
use std::io::{self, Write};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(e) => {
            log::error!("{e:#}");
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let patterns = match &cli.patterns {
        Some(list) => compile_patterns(&split_patterns(list)).context("invalid --patterns")?,
        None => Vec::new(),
    };

    let paths_scan = if cli.paths.is_empty() {
        vec![std::env::current_dir().context("cannot determine working directory")?]
    } else {
        cli.paths.clone()
    };

    let params = InitParams {
        algo: cli.hash.into(),
        block_size: cli.block_size,
        file_min_size: cli.min_size,
        paths_scan,
        paths_exclude: cli.exclude_paths.clone(),
        rxpatterns: patterns,
    };

    let mut engine = SearchEngine::new(params)?;
    let summary = engine.run(cli.recursive);
    let report = Report::collect(&engine, summary);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.output {
        OutputFormat::Text => text::write_report(&mut out, &report)?,
        OutputFormat::Json => {
            writeln!(out, "{}", JsonOutput::new(&report).to_json_pretty()?)?;
        }
    }

    Ok(if summary.paths_skipped > 0 {
        ExitCode::PartialSuccess
    } else if report.has_duplicates() {
        ExitCode::Success
    } else {
        ExitCode::NoDuplicates
    })
}
