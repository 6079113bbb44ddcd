use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use shared_utils::logging::init_tracing;
use vol_compare::{
    acquisition::build_provider,
    analysis::{RunSummary, run},
    config::{AnalysisConfig, ProviderKind, load_config_path},
    output::{OutputFormat, PlotData, render_json, render_table},
};
use volatility_engine::Frequency;

#[derive(Parser)]
#[command(version, about = "Compare assets by return and downside/upside volatility")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Fetch prices and compute return, volatility, downside and upside volatility
    Analyze(AnalyzeArgs),
    /// List the supported frequencies and their scaling constants
    Frequencies,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Path to a TOML run configuration; flags below override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Comma-separated list of symbols (e.g. "AAPL,MSFT")
    #[arg(long)]
    symbols: Option<String>,

    /// Start date, inclusive (e.g. "2015-01-01")
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End date, exclusive (e.g. "2025-01-01")
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Data frequency: daily (1d), weekly (1wk) or monthly (1mo)
    #[arg(short, long)]
    frequency: Option<String>,

    /// Return convention: log or simple
    #[arg(long)]
    convention: Option<String>,

    /// Price source; defaults to the config file's provider, else alpaca
    #[arg(long, value_enum)]
    provider: Option<ProviderKind>,

    /// Read bars from a JSON fixture file instead of the Alpaca API
    #[arg(long, value_name = "FILE")]
    fixture: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl AnalyzeArgs {
    fn into_config(self) -> Result<(AnalysisConfig, OutputFormat)> {
        let mut cfg = match &self.config {
            Some(path) => load_config_path(path)?,
            None => AnalysisConfig::default(),
        };

        if let Some(symbols) = self.symbols {
            cfg.symbols = vec![symbols];
        }
        if self.start.is_some() {
            cfg.start = self.start;
        }
        if self.end.is_some() {
            cfg.end = self.end;
        }
        if self.frequency.is_some() {
            cfg.frequency = self.frequency;
        }
        if self.convention.is_some() {
            cfg.convention = self.convention;
        }
        cfg.override_provider(self.provider, self.fixture)?;
        Ok((cfg, self.format))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("info");
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Frequencies => {
            for f in Frequency::ALL {
                let scale = volatility_engine::ScaleConfig::for_frequency(f);
                println!(
                    "{:<8} return x{:<4} volatility x{:.4}",
                    f,
                    scale.return_scale(),
                    scale.vol_scale()
                );
            }
        }
        Cmd::Analyze(args) => {
            let (cfg, format) = args.into_config()?;
            let settings = cfg.resolve(Utc::now().date_naive())?;
            let provider =
                build_provider(&settings.provider).context("initialize data provider")?;

            let results = run(provider.as_ref(), &settings).await;

            match format {
                OutputFormat::Table => print!("{}", render_table(&results)),
                OutputFormat::Json => {
                    let data =
                        PlotData::from_results(settings.frequency, settings.convention, &results);
                    println!("{}", render_json(&data)?);
                }
            }

            // stderr so it doesn't interfere with machine parsing of stdout
            let summary = RunSummary::from_results(&results);
            eprintln!(
                "SUMMARY: {} complete, {} partial, {} failed",
                summary.complete, summary.partial, summary.failed
            );
        }
    }

    Ok(())
}
