//! 网络拓扑管理
//!
//! 持有节点、共享信道、地址解析表，负责数据包发送与统计。

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddrV4};

use super::address::{AddressError, Ipv4AddressAllocator};
use super::deliver_packet::DeliverPacket;
use super::id::NodeId;
use super::medium::{Medium, MediumConfig};
use super::node::{Node, NodeRole};
use super::packet::{FiveTuple, Packet};
use super::stats::NetStats;
use crate::sim::{SimTime, Simulator};
use tracing::{debug, trace};

/// 网络拓扑：一个共享信道上的若干节点
#[derive(Debug, Default)]
pub struct Network {
    nodes: Vec<Node>,
    medium: Medium,
    by_addr: HashMap<Ipv4Addr, NodeId>,
    next_pkt_id: u64,
    pub stats: NetStats,
}

impl Network {
    pub fn new(medium: MediumConfig) -> Self {
        Self {
            medium: Medium::new(medium),
            ..Self::default()
        }
    }

    /// 添加节点
    pub fn add_node(&mut self, name: impl Into<String>, role: NodeRole) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id, name, role));
        id
    }

    /// 给节点挂一个接口，并从分配器取地址
    pub fn assign_address(
        &mut self,
        node: NodeId,
        iface: &str,
        alloc: &mut Ipv4AddressAllocator,
    ) -> Result<Ipv4Addr, AddressError> {
        let addr = alloc.allocate()?;
        self.nodes[node.0].attach_interface(iface, addr);
        self.by_addr.insert(addr, node);
        debug!(node = ?node, iface, %addr, "分配地址");
        Ok(addr)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// 在节点的主地址上绑定一个临时端口，作为发送端 socket 地址
    pub fn bind_ephemeral(&mut self, id: NodeId) -> Option<SocketAddrV4> {
        let node = self.nodes.get_mut(id.0)?;
        let addr = node.primary_address()?;
        Some(SocketAddrV4::new(addr, node.allocate_ephemeral_port()))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn medium(&self) -> &Medium {
        &self.medium
    }

    /// 地址 -> 节点
    pub fn resolve(&self, addr: Ipv4Addr) -> Option<NodeId> {
        self.by_addr.get(&addr).copied()
    }

    /// 创建数据包
    pub fn make_packet(&mut self, flow: FiveTuple, payload_bytes: u32, now: SimTime) -> Packet {
        let id = self.next_pkt_id;
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        Packet {
            id,
            flow,
            payload_bytes,
            tx_time: now,
        }
    }

    /// 经共享信道发送数据包，在到达时间调度 `DeliverPacket`
    #[tracing::instrument(level = "trace", skip(self, pkt, sim), fields(pkt_id = pkt.id))]
    pub fn transmit(&mut self, from: NodeId, pkt: Packet, sim: &mut Simulator) {
        let Some(to) = self.resolve(pkt.flow.dst_addr) else {
            debug!(dst = %pkt.flow.dst_addr, "目的地址无法解析，丢弃");
            self.stats.dropped_pkts += 1;
            return;
        };

        let now = sim.now();
        let arrive = self.medium.reserve(now, pkt.size_bytes());
        trace!(
            now = ?now,
            busy_until = ?self.medium.busy_until,
            arrive = ?arrive,
            to = ?to,
            "调度数据包到达事件"
        );
        // reserve 返回的到达时间不早于 now
        let delay = arrive.checked_sub(now).unwrap_or_default();
        sim.schedule_in(delay, DeliverPacket { to, pkt });
    }

    /// 数据包被目的 socket 接收
    pub(crate) fn on_delivered(&mut self, pkt: &Packet) {
        self.stats.delivered_pkts += 1;
        self.stats.delivered_bytes += pkt.size_bytes() as u64;
    }

    /// 数据包到达但没有 socket 接收
    pub(crate) fn on_dropped(&mut self, pkt: &Packet) {
        trace!(pkt_id = pkt.id, flow = %pkt.flow, "没有绑定的 socket，丢弃");
        self.stats.dropped_pkts += 1;
    }
}
