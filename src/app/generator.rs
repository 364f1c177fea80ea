//! 恒定速率流量发生器
//!
//! 相当于一直处于 on 状态的 on/off 源：从启动时刻起按固定间隔发送固定大小的 UDP 包，
//! 直到停止时刻。第 k 个包（从 0 开始）在 `start + floor(k * bits * 1e9 / rate)` 纳秒发出。

use super::AppWindow;
use crate::flow::FlowMonitor;
use crate::net::{ApplicationId, DataRate, FiveTuple, Network, NodeId, WlanWorld};
use crate::sim::{Event, EventId, SimTime, Simulator, World};
use std::net::SocketAddrV4;
use tracing::{debug, trace};

/// 发生器配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub rate: DataRate,
    /// UDP 载荷大小（字节）
    pub packet_bytes: u32,
    pub remote: SocketAddrV4,
}

impl GeneratorConfig {
    /// 相邻两个包的发送间隔
    pub fn interval(&self) -> SimTime {
        self.rate.time_for_bits(self.packet_bits())
    }

    fn packet_bits(&self) -> u128 {
        self.packet_bytes as u128 * 8
    }
}

#[derive(Debug)]
pub struct TrafficGenerator {
    node: NodeId,
    local: SocketAddrV4,
    cfg: GeneratorConfig,
    window: Option<AppWindow>,
    sent: u64,
    tx_bytes: u64,
    pending: Option<EventId>,
    active: bool,
}

impl TrafficGenerator {
    pub fn new(node: NodeId, local: SocketAddrV4, cfg: GeneratorConfig) -> Self {
        Self {
            node,
            local,
            cfg,
            window: None,
            sent: 0,
            tx_bytes: 0,
            pending: None,
            active: false,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.cfg
    }

    pub fn flow(&self) -> FiveTuple {
        FiveTuple::udp(self.local, self.cfg.remote)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// 已发送的包数
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// 已发送的载荷字节数
    pub fn tx_bytes(&self) -> u64 {
        self.tx_bytes
    }

    /// 下一个包的发送时间；超出活动窗口时为 None。
    pub fn next_send_time(&self) -> Option<SimTime> {
        let window = self.window?;
        let bits = (self.sent as u128).saturating_mul(self.cfg.packet_bits());
        let at = window.start.saturating_add(self.cfg.rate.time_for_bits(bits));
        (at < window.stop).then_some(at)
    }

    pub(crate) fn start(&mut self, id: ApplicationId, window: AppWindow, sim: &mut Simulator) {
        self.active = true;
        self.sent = 0;
        self.window = Some(AppWindow {
            start: sim.now(),
            stop: window.stop,
        });
        debug!(app = ?id, flow = %self.flow(), interval = ?self.cfg.interval(), "发生器启动");
        self.schedule_next(id, sim);
    }

    /// 停止发送并取消已经排队的下一次发送
    pub(crate) fn stop(&mut self, sim: &mut Simulator) {
        self.active = false;
        if let Some(ev) = self.pending.take() {
            sim.cancel(ev);
        }
        debug!(flow = %self.flow(), sent = self.sent, "发生器停止");
    }

    fn schedule_next(&mut self, id: ApplicationId, sim: &mut Simulator) {
        self.pending = match self.next_send_time() {
            Some(at) => sim.schedule(at, SendPacket { app: id }).ok(),
            None => None,
        };
    }

    fn send(
        &mut self,
        id: ApplicationId,
        sim: &mut Simulator,
        net: &mut Network,
        flows: &mut FlowMonitor,
    ) {
        self.pending = None;
        if !self.active {
            return;
        }
        let now = sim.now();
        let pkt = net.make_packet(self.flow(), self.cfg.packet_bytes, now);
        trace!(pkt_id = pkt.id, now = ?now, seq = self.sent, "发送数据包");
        flows.record_tx(&pkt, now);
        net.transmit(self.node, pkt, sim);

        self.sent += 1;
        self.tx_bytes += self.cfg.packet_bytes as u64;
        self.schedule_next(id, sim);
    }
}

/// 事件：发生器发送下一个包
#[derive(Debug)]
pub struct SendPacket {
    pub app: ApplicationId,
}

impl Event for SendPacket {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world
            .as_any_mut()
            .downcast_mut::<WlanWorld>()
            .expect("world must be WlanWorld");
        let WlanWorld { net, apps, flows } = w;
        if let Some(generator) = apps.generator_mut(self.app) {
            generator.send(self.app, sim, net, flows);
        }
    }
}
