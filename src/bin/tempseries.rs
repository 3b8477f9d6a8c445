//! Runs the temperature feed simulation until the process is killed.
//!
//! Run with: cargo run --release -- [--json]

use tempseries::{ReportFormat, SimulationConfig, WriterSink};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let format = if std::env::args().skip(1).any(|arg| arg == "--json") {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    };

    let config = SimulationConfig::default();
    let feed = tempseries::start(&config)?;
    let analysis = feed.start_analysis(WriterSink::stdout(format))?;

    log::info!("temperature simulation running; reports every {:?}", config.analysis_interval);

    // Neither worker exits on its own unless it panics.
    let analysis_result = analysis.wait();
    feed.wait()?;
    analysis_result?;
    Ok(())
}
