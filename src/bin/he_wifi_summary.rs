//! 汇总 he_wifi_performance 的 CSV
//!
//! 按站点数输出多次运行的平均总吞吐量及 95% 置信区间。

use clap::Parser;
use he_wifi_sim::report::ReportError;
use he_wifi_sim::report::summary;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(
    name = "he-wifi-summary",
    about = "按 nWifi 汇总多次运行的网络总吞吐量（均值与 95% 置信区间）"
)]
struct Args {
    /// he_wifi_performance 生成的 CSV 文件
    #[arg(long, default_value = "he-wifi-performance.csv")]
    csv: PathBuf,

    /// 以 JSON 输出到 stdout
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("cannot write to console: {0}")]
    Console(#[from] io::Error),
}

fn run(args: &Args) -> Result<(), CliError> {
    let rows = summary::read_rows(&args.csv)?;
    let summaries = summary::summarize(&rows);
    tracing::info!(rows = rows.len(), groups = summaries.len(), "汇总完成");

    let mut stdout = io::stdout().lock();
    if args.json {
        let json = serde_json::to_string_pretty(&summaries).map_err(ReportError::from)?;
        writeln!(stdout, "{json}")?;
    } else {
        summary::print_aggregates(&mut stdout, &summaries)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
