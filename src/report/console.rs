//! 控制台输出

use crate::scenario::{ScenarioConfig, ScenarioReport};
use std::io::{self, Write};

/// 运行前回显生效的配置
pub fn print_settings<W: Write>(out: &mut W, cfg: &ScenarioConfig) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Simulating an IEEE 802.11ax network with the following settings:"
    )?;
    writeln!(out, "- number of transmitting stations: {}", cfg.n_wifi)?;
    writeln!(out, "- frequency band: {}", cfg.phy.band)?;
    writeln!(out, "- modulation and coding scheme (MCS): {}", cfg.phy.mcs)?;
    writeln!(out, "- channel width: {} MHz", cfg.phy.channel_width_mhz)?;
    writeln!(out, "- guard interval: {} ns", cfg.phy.guard_interval_ns)?;
    writeln!(out, "- run number: {}", cfg.run)?;
    Ok(())
}

/// 运行后的吞吐量汇总
pub fn print_summary<W: Write>(out: &mut W, report: &ScenarioReport) -> io::Result<()> {
    writeln!(out, "Results: ")?;
    writeln!(out, "- network throughput: {} Mbit/s", report.aggregate_mbps)?;
    Ok(())
}
