//! 结果输出
//!
//! 控制台回显、追加式 CSV 日志、JSON 报告，以及多次运行的 CSV 汇总。

mod console;
mod csv_log;
pub mod summary;

pub use console::{print_settings, print_summary};
pub use csv_log::{CSV_HEADER, append_flow_rows, timestamp_now};

use crate::scenario::ScenarioReport;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write CSV row to {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("cannot read CSV {path}: {source}")]
    ReadCsv { path: PathBuf, source: csv::Error },
    #[error("cannot serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// 把完整报告写成 JSON
pub fn write_json(path: &Path, report: &ScenarioReport) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
