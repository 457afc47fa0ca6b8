use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use promise_me::diagnostic::render_diagnostics;
use promise_me::ConvertError;

#[derive(Parser)]
#[command(
    name = "promise-me",
    version,
    about = "Rewrite node-style callbacks in JavaScript as promise .then chains"
)]
struct Cli {
    /// JavaScript source file to convert
    file: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let source = match std::fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", cli.file.display(), e);
            process::exit(1);
        }
    };

    match promise_me::convert(&source) {
        Ok(output) => println!("{}", output),
        Err(ConvertError::Parse(diags)) => {
            let filename = cli.file.to_string_lossy();
            render_diagnostics(&diags, &filename, &source);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
