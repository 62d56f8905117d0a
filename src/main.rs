use anyhow::Context;
use clap::Parser;
use ldr_stats::config::Cli;
use ldr_stats::input::{InputSource, JsonFile};
use ldr_stats::report;
use ldr_stats::stats::Stats;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.init_logging();

    let today = cli.current_date();
    info!(input = %cli.input.display(), %today, "computing relationship statistics");

    let data = JsonFile::new(&cli.input).load()?;
    let stats =
        Stats::compute(&data, today).context("Failed to compute statistics")?;

    let output = report::render(&stats, cli.format)
        .context("Failed to render report")?;
    println!("{output}");

    info!("done");
    Ok(())
}
