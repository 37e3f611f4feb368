//! sheetgraph - apply an assignment script and print the resulting sheet.

use std::env;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use sheetgraph::{apply_script, parse_script};
use sheetgraph_core::{Sheet, print_texts, print_values};

fn print_usage() {
    eprintln!("Usage: sheetgraph [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Assignment script ('REF: input' per line); stdin if omitted");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <LINE>      Apply one assignment after the script (can be repeated)");
    eprintln!("      --values              Print computed values (default)");
    eprintln!("      --texts               Print cell texts as entered");
    eprintln!("  -h, --help                Print help");
}

#[derive(Clone, Copy, PartialEq)]
enum Output {
    Values,
    Texts,
}

struct Options {
    file: Option<PathBuf>,
    commands: Vec<String>,
    output: Output,
}

fn parse_args(args: &[String]) -> anyhow::Result<Option<Options>> {
    let mut options = Options {
        file: None,
        commands: Vec::new(),
        output: Output::Values,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(None),
            "-c" | "--command" => {
                i += 1;
                let Some(command) = args.get(i) else {
                    bail!("--command requires an assignment");
                };
                options.commands.push(command.clone());
            }
            "--values" => options.output = Output::Values,
            "--texts" => options.output = Output::Texts,
            arg if arg.starts_with('-') => bail!("Unknown option: {}", arg),
            arg => {
                if options.file.is_some() {
                    bail!("Unexpected argument: {}", arg);
                }
                options.file = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }
    Ok(Some(options))
}

fn run(options: Options) -> anyhow::Result<()> {
    let mut content = match &options.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        // With only -c assignments there is nothing to wait for on stdin.
        None if !options.commands.is_empty() => String::new(),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    for command in &options.commands {
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(command);
        content.push('\n');
    }

    let assignments = parse_script(&content)?;
    let mut sheet = Sheet::new();
    apply_script(&mut sheet, &assignments)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match options.output {
        Output::Values => print_values(&sheet, &mut out)?,
        Output::Texts => print_texts(&sheet, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
