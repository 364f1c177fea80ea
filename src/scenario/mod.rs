//! 场景编排
//!
//! 搭建一个 AP + N 个站点的 802.11ax WLAN：每个站点向 AP 发送饱和 UDP 流量，
//! AP 上为每个站点开一个 sink。运行内核到停止时间后汇总总吞吐量与逐流吞吐量。

mod config;

pub use config::{
    Band, ConfigError, HePhyConfig, MAX_HE_MCS, ScenarioConfig, ScenarioFile,
    VALID_CHANNEL_WIDTHS_MHZ, VALID_GUARD_INTERVALS_NS,
};

use crate::app::{AppError, AppWindow, Application, GeneratorConfig, PacketSink, TrafficGenerator};
use crate::flow::{DegenerateFlow, FlowId};
use crate::net::{
    AddressError, FiveTuple, Ipv4AddressAllocator, NetStats, NodeId, NodeRole, WlanWorld,
};
use crate::sim::{RunSummary, SimError, SimTime, Simulator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::net::SocketAddrV4;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// 所有节点上的无线接口名
pub const WLAN_IFACE: &str = "wlan0";

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Schedule(#[from] SimError),
    #[error("cannot read scenario file {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid scenario file: {0}")]
    ParseConfig(#[from] serde_json::Error),
}

/// 单条流的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowReport {
    pub flow_id: FlowId,
    pub tuple: FiveTuple,
    pub tx_packets: u64,
    pub rx_packets: u64,
    pub mean_delay: Option<SimTime>,
    pub throughput_mbps: Result<f64, DegenerateFlow>,
}

/// 一次场景运行的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub n_wifi: u32,
    pub run: u64,
    pub simulation_time_s: f64,
    /// 所有 sink 收到的载荷合计吞吐量（Mbit/s）
    pub aggregate_mbps: f64,
    pub flows: Vec<FlowReport>,
    pub net: NetStats,
    pub summary: RunSummary,
}

/// 站点的随机起始相位：`[0, min(interval, window))` 内均匀分布，避免所有站点同步发送
fn start_phase(rng: &mut StdRng, interval: SimTime, window: SimTime) -> SimTime {
    let upper = interval.min(window).0;
    if upper == 0 {
        return SimTime::ZERO;
    }
    SimTime(rng.random_range(0..upper))
}

/// 搭建拓扑与应用
pub(crate) fn build(
    cfg: &ScenarioConfig,
    world: &mut WlanWorld,
    rng: &mut StdRng,
) -> Result<(), ScenarioError> {
    let ap = world.net.add_node("ap", NodeRole::AccessPoint);
    let stations: Vec<NodeId> = (0..cfg.n_wifi)
        .map(|i| world.net.add_node(format!("sta{i}"), NodeRole::Station))
        .collect();

    // 先给站点编址，再给 AP
    let mut alloc = Ipv4AddressAllocator::new(cfg.network, cfg.prefix_len)?;
    for &sta in &stations {
        world.net.assign_address(sta, WLAN_IFACE, &mut alloc)?;
    }
    let ap_addr = world.net.assign_address(ap, WLAN_IFACE, &mut alloc)?;

    let stop = cfg.stop_time();
    let rate = cfg.per_station_rate();
    for (i, &sta) in stations.iter().enumerate() {
        let sink_addr = SocketAddrV4::new(ap_addr, cfg.base_port + i as u16);
        world.apps.install(
            Application::Sink(PacketSink::new(ap, sink_addr)),
            AppWindow {
                start: SimTime::ZERO,
                stop,
            },
        )?;

        let gen_cfg = GeneratorConfig {
            rate,
            packet_bytes: cfg.packet_bytes,
            remote: sink_addr,
        };
        let local = world
            .net
            .bind_ephemeral(sta)
            .expect("station was addressed above");
        let phase = if cfg.stagger_starts {
            start_phase(rng, gen_cfg.interval(), cfg.simulation_time)
        } else {
            SimTime::ZERO
        };
        debug!(station = ?sta, %local, remote = %sink_addr, phase = ?phase, "安装发生器");
        world.apps.install(
            Application::Generator(TrafficGenerator::new(sta, local, gen_cfg)),
            AppWindow {
                start: cfg.warmup.saturating_add(phase),
                stop,
            },
        )?;
    }
    Ok(())
}

/// 运行一次场景。相同的配置（含 `run`）得到完全相同的结果。
#[tracing::instrument(skip(cfg), fields(n_wifi = cfg.n_wifi, run = cfg.run))]
pub fn run(cfg: &ScenarioConfig) -> Result<ScenarioReport, ScenarioError> {
    cfg.validate()?;

    let mut world = WlanWorld::new(cfg.medium);
    let mut sim = Simulator::default();
    let mut rng = StdRng::seed_from_u64(cfg.run);

    build(cfg, &mut world, &mut rng)?;
    world.apps.schedule_lifecycle(&mut sim)?;
    info!(
        apps = world.apps.len(),
        rate_bps = cfg.per_station_rate().bps(),
        stop = ?cfg.stop_time(),
        "场景搭建完成"
    );

    let summary = sim.run_until(cfg.stop_time(), &mut world);

    let window_s = cfg.simulation_time.as_secs_f64();
    let aggregate_mbps: f64 = world
        .apps
        .sinks()
        .map(|sink| sink.total_rx() as f64 * 8.0 / (window_s * 1e6))
        .sum();

    let flows = world
        .flows
        .iter()
        .map(|(flow_id, tuple, st)| FlowReport {
            flow_id,
            tuple,
            tx_packets: st.tx_packets,
            rx_packets: st.rx_packets,
            mean_delay: st.mean_delay(),
            throughput_mbps: st.throughput_mbps(),
        })
        .collect();

    info!(aggregate_mbps, "📊 汇总完成");
    Ok(ScenarioReport {
        n_wifi: cfg.n_wifi,
        run: cfg.run,
        simulation_time_s: window_s,
        aggregate_mbps,
        flows,
        net: world.net.stats.clone(),
        summary,
    })
}
