use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;

use docprose::assembler::RegionOrigin;
use docprose::diagnostics::{Diagnostic, Severity};
use docprose::{BlockOutcome, Config, LineIndex, collect_diagnostics, extract_all};

mod cli;
use cli::{Cli, Commands};

fn read_all(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn start_dir_for(input_path: &Option<PathBuf>) -> io::Result<PathBuf> {
    if let Some(p) = input_path {
        Ok(p.parent().unwrap_or(Path::new(".")).to_path_buf())
    } else {
        std::env::current_dir()
    }
}

fn load_config(explicit: Option<&Path>, file: &Option<PathBuf>) -> io::Result<Config> {
    let start_dir = start_dir_for(file)?;
    let (cfg, cfg_path) = docprose::config::load(explicit, &start_dir)?;

    if let Some(path) = &cfg_path {
        log::debug!("Using config from: {}", path.display());
    } else {
        log::debug!("Using default config");
    }

    Ok(cfg)
}

#[derive(Serialize)]
struct RegionRecord<'a> {
    block: usize,
    ordinal: usize,
    section: String,
    line: usize,
    column: usize,
    start: usize,
    text: &'a str,
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { file, json, check } => {
            let cfg = load_config(cli.config.as_deref(), &file)?;
            let input = read_all(file.as_ref())?;
            let outcomes = extract_all(&input, &cfg);
            let index = LineIndex::new(&input);
            let file_name = file.as_ref().and_then(|p| p.to_str()).unwrap_or("<stdin>");

            let records: Vec<RegionRecord<'_>> = outcomes
                .iter()
                .filter_map(|(_, outcome)| outcome.as_ref().ok())
                .flat_map(|extraction| extraction.regions())
                .map(|region| {
                    let start = region.source_start();
                    let (line, column) = index.line_col(start);
                    RegionRecord {
                        block: region.anchor.block,
                        ordinal: region.anchor.ordinal,
                        section: match &region.origin {
                            RegionOrigin::Description => "description".to_string(),
                            RegionOrigin::Tag { name, .. } => format!("@{}", name),
                        },
                        line,
                        column,
                        start,
                        text: region.text(),
                    }
                })
                .collect();

            if json {
                let out = serde_json::to_string_pretty(&records)
                    .map_err(io::Error::other)?;
                println!("{out}");
            } else {
                for record in &records {
                    println!(
                        "{}:{}:{}: {}",
                        file_name, record.line, record.column, record.text
                    );
                }
            }

            let diagnostics = collect_diagnostics(&input, &outcomes);
            if !diagnostics.is_empty() {
                print_diagnostics(&diagnostics, file.as_ref());
                if check {
                    std::process::exit(1);
                }
            }

            Ok(())
        }
        Commands::Spans { file } => {
            let cfg = load_config(cli.config.as_deref(), &file)?;
            let input = read_all(file.as_ref())?;
            let outcomes = extract_all(&input, &cfg);
            let index = LineIndex::new(&input);

            for (block, outcome) in &outcomes {
                let (line, column) = index.line_col(block.offset);
                println!("Comment at {}:{}", line, column);
                let Ok(extraction) = outcome else {
                    println!("  (malformed)");
                    continue;
                };
                for idx in 0..extraction.lines().len() {
                    let spans: Vec<String> = extraction
                        .spans(idx)
                        .iter()
                        .map(|s| format!("{:?} {:?}", s.kind, s.text(extraction.raw())))
                        .collect();
                    println!("  {:>3}: {}", idx, spans.join(", "));
                }
            }

            report_only(&input, &outcomes, file.as_ref());
            Ok(())
        }
        Commands::Parse { file } => {
            let cfg = load_config(cli.config.as_deref(), &file)?;
            let input = read_all(file.as_ref())?;
            let outcomes = extract_all(&input, &cfg);

            for (_, outcome) in &outcomes {
                if let Ok(extraction) = outcome {
                    println!("{:#?}", extraction.tree());
                }
            }

            report_only(&input, &outcomes, file.as_ref());
            Ok(())
        }
    }
}

fn report_only(input: &str, outcomes: &[BlockOutcome<'_>], file: Option<&PathBuf>) {
    let diagnostics = collect_diagnostics(input, outcomes);
    if !diagnostics.is_empty() {
        print_diagnostics(&diagnostics, file);
    }
}

fn print_diagnostics(diagnostics: &[Diagnostic], file: Option<&PathBuf>) {
    let file_name = file.and_then(|p| p.to_str()).unwrap_or("<stdin>");

    for diag in diagnostics {
        let severity_str = match diag.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",     // red
            Severity::Warning => "\x1b[33mwarning\x1b[0m", // yellow
        };

        eprintln!(
            "{severity_str}[{}]: {} at {}:{}:{}",
            diag.code, diag.message, file_name, diag.location.line, diag.location.column
        );
    }

    eprintln!("\nFound {} issue(s)", diagnostics.len());
}
