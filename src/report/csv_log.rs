//! 追加式 CSV 日志
//!
//! 文件不存在时创建并写表头；已存在时只追加数据行，不重复表头。

use super::ReportError;
use crate::scenario::ScenarioReport;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{debug, warn};

pub const CSV_HEADER: [&str; 5] = ["Timestamp", "nWifi", "RngRun", "FlowSrc", "Throughput"];

/// 本地时间，精确到分钟
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}

/// 为每条可计算吞吐量的流追加一行，返回写入的行数。
///
/// 数据不足的流被跳过，不会写出 NaN/inf。
pub fn append_flow_rows(
    path: &Path,
    timestamp: &str,
    report: &ScenarioReport,
) -> Result<usize, ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let exists = path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if !exists {
        debug!(path = %path.display(), "创建 CSV 并写入表头");
        wtr.write_record(CSV_HEADER).map_err(csv_err)?;
    }

    let n_wifi = report.n_wifi.to_string();
    let run = report.run.to_string();
    let mut written = 0;
    for flow in &report.flows {
        let mbps = match flow.throughput_mbps {
            Ok(mbps) if mbps.is_finite() => mbps,
            Ok(mbps) => {
                warn!(flow_id = flow.flow_id.0, mbps, "吞吐量不是有限值，跳过");
                continue;
            }
            Err(reason) => {
                warn!(flow_id = flow.flow_id.0, flow = %flow.tuple, %reason, "跳过无法计算吞吐量的流");
                continue;
            }
        };
        let src = flow.tuple.src_addr.to_string();
        let thr = format!("{mbps:.6}");
        wtr.write_record([timestamp, n_wifi.as_str(), run.as_str(), src.as_str(), thr.as_str()])
            .map_err(csv_err)?;
        written += 1;
    }
    wtr.flush().map_err(io_err)?;
    Ok(written)
}
