//! 数据包接收端
//!
//! 绑定在某个节点端口上的 UDP sink，只统计收到的载荷字节数。

use crate::net::{NodeId, Packet};
use crate::sim::SimTime;
use std::net::SocketAddrV4;
use tracing::trace;

#[derive(Debug)]
pub struct PacketSink {
    node: NodeId,
    local: SocketAddrV4,
    active: bool,
    total_rx: u64,
    rx_packets: u64,
    last_rx: Option<SimTime>,
}

impl PacketSink {
    pub fn new(node: NodeId, local: SocketAddrV4) -> Self {
        Self {
            node,
            local,
            active: false,
            total_rx: 0,
            rx_packets: 0,
            last_rx: None,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn local(&self) -> SocketAddrV4 {
        self.local
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// 收到的载荷总字节数
    pub fn total_rx(&self) -> u64 {
        self.total_rx
    }

    pub fn rx_packets(&self) -> u64 {
        self.rx_packets
    }

    pub fn last_rx(&self) -> Option<SimTime> {
        self.last_rx
    }

    pub(crate) fn start(&mut self) {
        self.active = true;
    }

    pub(crate) fn stop(&mut self) {
        self.active = false;
    }

    /// 处理到达的数据包；sink 未启动或已停止时不接收
    pub(crate) fn on_receive(&mut self, pkt: &Packet, now: SimTime) -> bool {
        if !self.active {
            return false;
        }
        self.total_rx += pkt.payload_bytes as u64;
        self.rx_packets += 1;
        self.last_rx = Some(now);
        trace!(pkt_id = pkt.id, total_rx = self.total_rx, "sink 收到数据包");
        true
    }
}
