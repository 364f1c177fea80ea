//! 网络世界实现
//!
//! WLAN 仿真的世界（World）：网络、已安装的应用与流统计。

use super::id::NodeId;
use super::medium::MediumConfig;
use super::network::Network;
use super::packet::Packet;
use crate::app::Applications;
use crate::flow::FlowMonitor;
use crate::sim::{Simulator, World};
use std::any::Any;

#[derive(Debug, Default)]
pub struct WlanWorld {
    pub net: Network,
    pub apps: Applications,
    pub flows: FlowMonitor,
}

impl WlanWorld {
    pub fn new(medium: MediumConfig) -> Self {
        Self {
            net: Network::new(medium),
            ..Self::default()
        }
    }

    /// 数据包到达 `to`：先经过流监视器，再按目的端口交给 sink。
    pub(crate) fn deliver(&mut self, to: NodeId, pkt: Packet, sim: &mut Simulator) {
        let now = sim.now();
        self.flows.record_rx(&pkt, now);

        let accepted = self
            .apps
            .sink_on(to, pkt.flow.dst_port)
            .is_some_and(|sink| sink.on_receive(&pkt, now));
        if accepted {
            self.net.on_delivered(&pkt);
        } else {
            self.net.on_dropped(&pkt);
        }
    }
}

impl World for WlanWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
