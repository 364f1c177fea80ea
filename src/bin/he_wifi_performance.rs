//! 802.11ax WLAN 吞吐量实验
//!
//! 一个 AP、N 个站点，站点向 AP 发送饱和 UDP 流量；输出总吞吐量，
//! 并把逐流吞吐量追加到 CSV。

use clap::Parser;
use he_wifi_sim::report::{self, ReportError};
use he_wifi_sim::scenario::{self, ScenarioConfig, ScenarioError, ScenarioFile};
use he_wifi_sim::sim::SimTime;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(
    name = "he-wifi-performance",
    about = "IEEE 802.11ax WLAN 仿真：N 个站点向 AP 发送饱和 UDP 流量"
)]
struct Args {
    /// 发送站点数（默认 1）
    #[arg(long = "nWifi")]
    n_wifi: Option<u32>,

    /// 随机数运行编号（默认 1）
    #[arg(long = "RngRun")]
    run: Option<u64>,

    /// HE MCS（0..=11，默认 11）
    #[arg(long)]
    mcs: Option<u8>,

    /// 信道宽度（MHz，默认 20）
    #[arg(long = "channelWidth")]
    channel_width: Option<u16>,

    /// 保护间隔（纳秒，默认 800）
    #[arg(long)]
    gi: Option<u16>,

    /// 统计窗口长度（秒，默认 10）
    #[arg(long = "simulationTime")]
    simulation_time: Option<f64>,

    /// 各站点使用由 RngRun 决定的随机起始相位
    #[arg(long = "staggerStarts")]
    stagger_starts: bool,

    /// 逐流结果追加到的 CSV 文件
    #[arg(long, default_value = "he-wifi-performance.csv")]
    csv: PathBuf,

    /// JSON 场景文件；命令行参数优先
    #[arg(long)]
    config: Option<PathBuf>,

    /// 输出完整 JSON 报告；不填则不生成
    #[arg(long)]
    json_report: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("cannot write to console: {0}")]
    Console(#[from] io::Error),
}

impl Args {
    fn scenario_config(&self) -> Result<ScenarioConfig, ScenarioError> {
        let mut cfg = ScenarioConfig::default();
        if let Some(path) = &self.config {
            ScenarioFile::load(path)?.apply(&mut cfg);
        }
        if let Some(n) = self.n_wifi {
            cfg.n_wifi = n;
        }
        if let Some(run) = self.run {
            cfg.run = run;
        }
        if let Some(mcs) = self.mcs {
            cfg.phy.mcs = mcs;
        }
        if let Some(w) = self.channel_width {
            cfg.phy.channel_width_mhz = w;
        }
        if let Some(gi) = self.gi {
            cfg.phy.guard_interval_ns = gi;
        }
        if self.stagger_starts {
            cfg.stagger_starts = true;
        }
        if let Some(s) = self.simulation_time {
            cfg.simulation_time = SimTime::from_secs_f64(s);
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let cfg = args.scenario_config()?;

    let mut stdout = io::stdout().lock();
    report::print_settings(&mut stdout, &cfg)?;
    stdout.flush()?;

    eprint!("\nStarting simulation... ");
    let result = scenario::run(&cfg)?;
    eprintln!("done!");

    let rows = report::append_flow_rows(&args.csv, &report::timestamp_now(), &result)?;
    tracing::debug!(rows, csv = %args.csv.display(), "CSV 已更新");

    if let Some(path) = &args.json_report {
        report::write_json(path, &result)?;
        eprintln!("wrote report to {}", path.display());
    }

    report::print_summary(&mut stdout, &result)?;
    Ok(())
}

fn main() -> ExitCode {
    // 初始化 tracing（写到 stderr，stdout 留给结果）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_file(true)
        .with_line_number(true)
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
