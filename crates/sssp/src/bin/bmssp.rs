use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use sssp::io::parse_instance;
use sssp::io::write_report;
use sssp::solve_sssp;
use sssp::solve_sssp_traced;
use sssp::trace::TraceSink;

/// Single-source shortest paths over the graph read from stdin.
#[derive(Parser)]
#[command(name = "bmssp", about = "Bounded multi-source shortest-path solver", long_about = None)]
struct Cli {
    /// Write a JSON-lines event trace of the solve to this file
    #[arg(long, value_name = "FILE")]
    trace: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let Some(instance) = parse_instance(&input) else {
        return Ok(());
    };

    let started = Instant::now();
    let dist = match &cli.trace {
        Some(path) => {
            let mut sink = TraceSink::file(path)?;
            solve_sssp_traced(&instance.graph, instance.source, &mut sink)
        }
        None => solve_sssp(&instance.graph, instance.source),
    };
    let elapsed_ms = started.elapsed().as_secs_f64() * 1_000.0;

    let stdout = std::io::stdout();
    write_report(&mut stdout.lock(), "BMSSP", elapsed_ms, &dist)?;
    Ok(())
}
