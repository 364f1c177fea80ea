//! 数据包交付事件
//!
//! 定义数据包经信道到达目的节点的事件。

use super::id::NodeId;
use super::net_world::WlanWorld;
use super::packet::Packet;
use crate::sim::{Event, Simulator, World};
use tracing::trace;

/// 事件：把一个 packet 交给某个节点处理。
#[derive(Debug)]
pub struct DeliverPacket {
    pub to: NodeId,
    pub pkt: Packet,
}

impl Event for DeliverPacket {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let DeliverPacket { to, pkt } = *self;
        trace!(pkt_id = pkt.id, to = ?to, now = ?sim.now(), "📨 数据包到达节点");

        let w = world
            .as_any_mut()
            .downcast_mut::<WlanWorld>()
            .expect("world must be WlanWorld");
        w.deliver(to, pkt, sim);
    }
}
