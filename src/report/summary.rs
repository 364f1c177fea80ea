//! 多次运行的 CSV 汇总
//!
//! 读取 `he_wifi_performance` 追加的逐流 CSV：先把同一次运行 `(nWifi, RngRun)`
//! 的逐流吞吐量相加得到总吞吐量，再按 `nWifi` 求均值和 t 分布 95% 置信区间。

use super::ReportError;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::net::Ipv4Addr;
use std::path::Path;
use tracing::debug;

/// 置信水平
pub const CONFIDENCE: f64 = 0.95;

/// CSV 中的一行（一条流）
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlowRow {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "nWifi")]
    pub n_wifi: u32,
    #[serde(rename = "RngRun")]
    pub run: u64,
    #[serde(rename = "FlowSrc")]
    pub flow_src: Ipv4Addr,
    #[serde(rename = "Throughput")]
    pub throughput_mbps: f64,
}

/// 某个站点数下所有运行的总吞吐量统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub n_wifi: u32,
    /// 参与统计的运行数（不同 RngRun）
    pub runs: usize,
    pub mean_mbps: f64,
    /// 置信区间半宽；少于两次运行时没有定义
    pub ci95_mbps: Option<f64>,
}

pub fn read_rows(path: &Path) -> Result<Vec<FlowRow>, ReportError> {
    let read_err = |source| ReportError::ReadCsv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = csv::Reader::from_path(path).map_err(read_err)?;
    let rows = rdr
        .deserialize()
        .collect::<Result<Vec<FlowRow>, _>>()
        .map_err(read_err)?;
    debug!(path = %path.display(), rows = rows.len(), "读取 CSV");
    Ok(rows)
}

/// 每次运行的总吞吐量，键为 `(nWifi, RngRun)`
pub fn aggregate_by_run(rows: &[FlowRow]) -> BTreeMap<(u32, u64), f64> {
    let mut runs = BTreeMap::new();
    for row in rows {
        *runs.entry((row.n_wifi, row.run)).or_insert(0.0) += row.throughput_mbps;
    }
    runs
}

/// 样本均值的 t 分布置信区间半宽：`t(1-α/2, n-1) * s / sqrt(n)`
pub fn ci95_half_width(samples: &[f64]) -> Option<f64> {
    let n = samples.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mean = samples.iter().sum::<f64>() / nf;
    let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (nf - 1.0);
    let t = StudentsT::new(0.0, 1.0, nf - 1.0).ok()?;
    let q = t.inverse_cdf(1.0 - (1.0 - CONFIDENCE) / 2.0);
    Some(q * var.sqrt() / nf.sqrt())
}

/// 按 `nWifi` 升序汇总
pub fn summarize(rows: &[FlowRow]) -> Vec<AggregateSummary> {
    let mut by_n: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for ((n_wifi, _), total) in aggregate_by_run(rows) {
        by_n.entry(n_wifi).or_default().push(total);
    }
    by_n.into_iter()
        .map(|(n_wifi, totals)| AggregateSummary {
            n_wifi,
            runs: totals.len(),
            mean_mbps: totals.iter().sum::<f64>() / totals.len() as f64,
            ci95_mbps: ci95_half_width(&totals),
        })
        .collect()
}

pub fn print_aggregates<W: Write>(out: &mut W, summaries: &[AggregateSummary]) -> io::Result<()> {
    writeln!(out, "nWifi  runs  throughput [Mbit/s]  95% CI [Mbit/s]")?;
    for s in summaries {
        let ci = match s.ci95_mbps {
            Some(hw) => format!("±{hw:.3}"),
            None => "n/a".to_string(),
        };
        writeln!(
            out,
            "{:>5}  {:>4}  {:>19.3}  {:>15}",
            s.n_wifi, s.runs, s.mean_mbps, ci
        )?;
    }
    Ok(())
}
