use std::io::Read;
use std::time::Instant;

use anyhow::Result;

use sssp::dijkstra_binary_heap;
use sssp::io::parse_instance;
use sssp::io::write_report;

fn main() -> Result<()> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let Some(instance) = parse_instance(&input) else {
        return Ok(());
    };

    let started = Instant::now();
    let dist = dijkstra_binary_heap(&instance.graph, instance.source);
    let elapsed_ms = started.elapsed().as_secs_f64() * 1_000.0;

    let stdout = std::io::stdout();
    write_report(&mut stdout.lock(), "Dijkstra", elapsed_ms, &dist)?;
    Ok(())
}
