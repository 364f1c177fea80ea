//! 场景配置
//!
//! 802.11ax 单 AP 场景的参数、校验，以及可选的 JSON 配置文件覆盖。

use crate::net::{DataRate, MAX_PREFIX_LEN, MIN_PREFIX_LEN, MediumConfig};
use crate::sim::SimTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::path::Path;
use thiserror::Error;

use super::ScenarioError;

pub const VALID_CHANNEL_WIDTHS_MHZ: [u16; 4] = [20, 40, 80, 160];
pub const VALID_GUARD_INTERVALS_NS: [u16; 3] = [800, 1600, 3200];
pub const MAX_HE_MCS: u8 = 11;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("MCS {0} is out of range (HE supports 0..=11)")]
    InvalidMcs(u8),
    #[error("channel width {width_mhz} MHz is not valid in the {band} band")]
    InvalidChannelWidth { width_mhz: u16, band: Band },
    #[error("guard interval {0} ns is not one of 800, 1600, 3200")]
    InvalidGuardInterval(u16),
    #[error("simulation time must be positive")]
    NonPositiveSimulationTime,
    #[error("packet size must be positive")]
    ZeroPacketSize,
    #[error("offered load {load_bps} bit/s is too small to split across {n_wifi} stations")]
    OfferedLoadTooSmall { load_bps: u64, n_wifi: u32 },
    #[error("prefix length /{0} is outside 1..=30")]
    InvalidPrefix(u8),
    #[error("{n_wifi} stations plus the access point do not fit in {network}/{prefix_len}")]
    TooManyStations {
        n_wifi: u32,
        network: Ipv4Addr,
        prefix_len: u8,
    },
    #[error("sink ports starting at {base_port} overflow for {n_wifi} stations")]
    PortRangeOverflow { base_port: u16, n_wifi: u32 },
}

/// 频段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Band {
    #[serde(rename = "2.4GHz")]
    Ghz2_4,
    #[serde(rename = "5GHz")]
    Ghz5,
    #[serde(rename = "6GHz")]
    Ghz6,
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Band::Ghz2_4 => write!(f, "2.4 GHz"),
            Band::Ghz5 => write!(f, "5 GHz"),
            Band::Ghz6 => write!(f, "6 GHz"),
        }
    }
}

/// HE（802.11ax）物理层参数。这里只做校验与回显，不影响信道模型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HePhyConfig {
    pub band: Band,
    pub mcs: u8,
    pub channel_width_mhz: u16,
    pub guard_interval_ns: u16,
}

impl Default for HePhyConfig {
    fn default() -> Self {
        Self {
            band: Band::Ghz5,
            mcs: MAX_HE_MCS,
            channel_width_mhz: 20,
            guard_interval_ns: 800,
        }
    }
}

impl HePhyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mcs > MAX_HE_MCS {
            return Err(ConfigError::InvalidMcs(self.mcs));
        }
        let width_ok = match self.band {
            Band::Ghz2_4 => matches!(self.channel_width_mhz, 20 | 40),
            Band::Ghz5 | Band::Ghz6 => VALID_CHANNEL_WIDTHS_MHZ.contains(&self.channel_width_mhz),
        };
        if !width_ok {
            return Err(ConfigError::InvalidChannelWidth {
                width_mhz: self.channel_width_mhz,
                band: self.band,
            });
        }
        if !VALID_GUARD_INTERVALS_NS.contains(&self.guard_interval_ns) {
            return Err(ConfigError::InvalidGuardInterval(self.guard_interval_ns));
        }
        Ok(())
    }
}

/// 场景参数
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    /// 发送站点数
    pub n_wifi: u32,
    pub phy: HePhyConfig,
    /// 统计窗口长度（源在 `warmup` 时刻开始发送，到 `warmup + simulation_time` 停止）
    pub simulation_time: SimTime,
    pub warmup: SimTime,
    /// 所有站点合计的发送速率，按站点数均分
    pub offered_load: DataRate,
    /// UDP 载荷大小（字节）
    pub packet_bytes: u32,
    /// 随机数运行编号（RngRun）
    pub run: u64,
    /// 为每个站点加一个由 `run` 决定的随机起始相位；关闭时所有源都在 `warmup` 时刻开始
    pub stagger_starts: bool,
    pub medium: MediumConfig,
    /// 第一个 sink 的端口，之后每个站点加一
    pub base_port: u16,
    pub network: Ipv4Addr,
    pub prefix_len: u8,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            n_wifi: 1,
            phy: HePhyConfig::default(),
            simulation_time: SimTime::from_secs(10),
            warmup: SimTime::from_secs(1),
            offered_load: DataRate::from_mbps(150),
            packet_bytes: 1000,
            run: 1,
            stagger_starts: false,
            medium: MediumConfig::default(),
            base_port: 9,
            network: Ipv4Addr::new(192, 168, 1, 0),
            prefix_len: 24,
        }
    }
}

impl ScenarioConfig {
    /// 仿真停止时间
    pub fn stop_time(&self) -> SimTime {
        self.warmup.saturating_add(self.simulation_time)
    }

    /// 每个站点的发送速率（截断到整 bit/s）
    pub fn per_station_rate(&self) -> DataRate {
        self.offered_load.split(self.n_wifi.max(1))
    }

    /// 在推进任何仿真时间之前检查参数
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.phy.validate()?;
        if self.simulation_time == SimTime::ZERO {
            return Err(ConfigError::NonPositiveSimulationTime);
        }
        if self.packet_bytes == 0 {
            return Err(ConfigError::ZeroPacketSize);
        }
        if self.n_wifi > 0 && self.per_station_rate().bps() == 0 {
            return Err(ConfigError::OfferedLoadTooSmall {
                load_bps: self.offered_load.bps(),
                n_wifi: self.n_wifi,
            });
        }
        if !(MIN_PREFIX_LEN..=MAX_PREFIX_LEN).contains(&self.prefix_len) {
            return Err(ConfigError::InvalidPrefix(self.prefix_len));
        }
        let hosts = (1u64 << (32 - self.prefix_len as u32)) - 2;
        if self.n_wifi as u64 + 1 > hosts {
            return Err(ConfigError::TooManyStations {
                n_wifi: self.n_wifi,
                network: self.network,
                prefix_len: self.prefix_len,
            });
        }
        if self.base_port as u64 + self.n_wifi as u64 > u16::MAX as u64 + 1 {
            return Err(ConfigError::PortRangeOverflow {
                base_port: self.base_port,
                n_wifi: self.n_wifi,
            });
        }
        Ok(())
    }
}

/// JSON 场景文件：所有字段可选，只覆盖出现的字段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    #[serde(default)]
    pub n_wifi: Option<u32>,
    #[serde(default)]
    pub band: Option<Band>,
    #[serde(default)]
    pub mcs: Option<u8>,
    #[serde(default)]
    pub channel_width_mhz: Option<u16>,
    #[serde(default)]
    pub guard_interval_ns: Option<u16>,
    #[serde(default)]
    pub simulation_time_s: Option<f64>,
    #[serde(default)]
    pub offered_load_mbps: Option<u64>,
    #[serde(default)]
    pub packet_bytes: Option<u32>,
    #[serde(default)]
    pub run: Option<u64>,
    #[serde(default)]
    pub stagger_starts: Option<bool>,
    #[serde(default)]
    pub medium_mbps: Option<u64>,
    #[serde(default)]
    pub medium_latency_us: Option<u64>,
    #[serde(default)]
    pub base_port: Option<u16>,
}

impl ScenarioFile {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ScenarioError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// 把文件中出现的字段写入 `cfg`
    pub fn apply(&self, cfg: &mut ScenarioConfig) {
        if let Some(n) = self.n_wifi {
            cfg.n_wifi = n;
        }
        if let Some(band) = self.band {
            cfg.phy.band = band;
        }
        if let Some(mcs) = self.mcs {
            cfg.phy.mcs = mcs;
        }
        if let Some(w) = self.channel_width_mhz {
            cfg.phy.channel_width_mhz = w;
        }
        if let Some(gi) = self.guard_interval_ns {
            cfg.phy.guard_interval_ns = gi;
        }
        if let Some(s) = self.simulation_time_s {
            cfg.simulation_time = SimTime::from_secs_f64(s);
        }
        if let Some(mbps) = self.offered_load_mbps {
            cfg.offered_load = DataRate::from_mbps(mbps);
        }
        if let Some(b) = self.packet_bytes {
            cfg.packet_bytes = b;
        }
        if let Some(run) = self.run {
            cfg.run = run;
        }
        if let Some(stagger) = self.stagger_starts {
            cfg.stagger_starts = stagger;
        }
        if let Some(mbps) = self.medium_mbps {
            cfg.medium.bandwidth = DataRate::from_mbps(mbps);
        }
        if let Some(us) = self.medium_latency_us {
            cfg.medium.latency = SimTime::from_micros(us);
        }
        if let Some(port) = self.base_port {
            cfg.base_port = port;
        }
    }
}
