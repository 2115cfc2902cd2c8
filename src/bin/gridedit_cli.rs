//! CLI tool for gridedit - find or replace in a CSV file
//!
//! Usage:
//!   gridedit_cli <input.csv> --find Jon                        # Results as JSON
//!   gridedit_cli <input.csv> --find Jon --fuzzy --threshold 0.7
//!   gridedit_cli <input.csv> --find Jon --replace Jonathan -o out.csv
//!
//! Set `RUST_LOG=debug` for engine logs on stderr.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use futures::executor::block_on;
use tracing_subscriber::EnvFilter;

use gridedit::{GridEdit, SearchOutcome, SearchRequest};

#[derive(Parser, Debug)]
#[command(version, about = "Find and replace in CSV files")]
struct Args {
    /// Input CSV file (first row is the header)
    input: PathBuf,
    /// Text to search for
    #[arg(long)]
    find: String,
    /// Match similar text, not only exact substrings
    #[arg(long)]
    fuzzy: bool,
    /// Minimum similarity for fuzzy matches (defaults to the editor config)
    #[arg(long)]
    threshold: Option<f64>,
    #[arg(long)]
    case_sensitive: bool,
    /// Restrict the search to these column ids
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,
    /// Replace every match with this text and write the result as CSV
    #[arg(long)]
    replace: Option<String>,
    /// Output file for --replace (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn start_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn run(args: Args) -> gridedit::Result<()> {
    let text = fs::read_to_string(&args.input)?;
    let mut grid = GridEdit::new_test();
    grid.load_csv(&text)?;

    let request = SearchRequest {
        case_sensitive: args.case_sensitive,
        fuzzy: args.fuzzy,
        threshold: args.threshold,
        column_scope: args.columns,
    };

    let mut stdout = io::stdout().lock();
    if let Some(replacement) = args.replace {
        let default_threshold = grid.state().borrow().config().default_threshold;
        let options = request.resolve(default_threshold);
        let changed = grid.replace_all(&args.find, &replacement, options)?;
        let csv = grid.export_csv()?;
        match args.output {
            Some(path) => {
                fs::write(&path, csv)?;
                eprintln!("Replaced {changed} cell(s), written: {}", path.display());
            }
            None => {
                stdout.write_all(csv.as_bytes())?;
                eprintln!("Replaced {changed} cell(s)");
            }
        }
        return Ok(());
    }

    let outcome = block_on(grid.search_request(&args.find, request))?;
    let results = match outcome {
        SearchOutcome::Completed(results) => results,
        SearchOutcome::Superseded => Vec::new(),
    };
    let json = serde_json::to_string_pretty(&results)?;
    writeln!(stdout, "{json}")?;
    Ok(())
}

fn main() -> ExitCode {
    start_logging();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
