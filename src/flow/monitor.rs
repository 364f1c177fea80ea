//! 流监视器
//!
//! 在发送端和接收端观测每个包：首次见到某个五元组时创建流记录（id 从 1 开始递增），
//! 之后逐包更新。字节数按 IP 层大小统计（含 IPv4/UDP 头）。

use crate::net::{FiveTuple, Packet};
use crate::sim::SimTime;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::trace;

/// 流标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FlowId(pub u32);

/// 数据不足以计算吞吐量的流
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum DegenerateFlow {
    #[error("flow received {rx_packets} packet(s), need at least two")]
    TooFewPackets { rx_packets: u64 },
    #[error("flow has no positive time span between first transmission and last reception")]
    EmptySpan,
}

/// 单条流的计数器
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowStats {
    pub tx_packets: u64,
    pub tx_bytes: u64,
    pub rx_packets: u64,
    pub rx_bytes: u64,
    pub time_first_tx: Option<SimTime>,
    pub time_last_tx: Option<SimTime>,
    pub time_first_rx: Option<SimTime>,
    pub time_last_rx: Option<SimTime>,
    /// 所有已接收包的单向时延之和
    pub delay_sum: SimTime,
}

impl FlowStats {
    /// `rx_bytes * 8 / (time_last_rx - time_first_tx)`，单位 bit/s
    pub fn throughput_bps(&self) -> Result<f64, DegenerateFlow> {
        if self.rx_packets < 2 {
            return Err(DegenerateFlow::TooFewPackets {
                rx_packets: self.rx_packets,
            });
        }
        let (Some(first_tx), Some(last_rx)) = (self.time_first_tx, self.time_last_rx) else {
            return Err(DegenerateFlow::EmptySpan);
        };
        match last_rx.checked_sub(first_tx) {
            Some(span) if span > SimTime::ZERO => {
                Ok(self.rx_bytes as f64 * 8.0 / span.as_secs_f64())
            }
            _ => Err(DegenerateFlow::EmptySpan),
        }
    }

    pub fn throughput_mbps(&self) -> Result<f64, DegenerateFlow> {
        self.throughput_bps().map(|bps| bps / 1e6)
    }

    /// 平均单向时延；没有收到包时为 None
    pub fn mean_delay(&self) -> Option<SimTime> {
        (self.rx_packets > 0).then(|| SimTime(self.delay_sum.0 / self.rx_packets))
    }

    /// 已发出但（截至目前）未收到的包
    pub fn in_flight_or_lost(&self) -> u64 {
        self.tx_packets.saturating_sub(self.rx_packets)
    }
}

#[derive(Debug, Default)]
pub struct FlowMonitor {
    classifier: HashMap<FiveTuple, FlowId>,
    tuples: BTreeMap<FlowId, FiveTuple>,
    stats: BTreeMap<FlowId, FlowStats>,
    next_id: u32,
}

impl FlowMonitor {
    fn classify(&mut self, tuple: FiveTuple) -> FlowId {
        if let Some(id) = self.classifier.get(&tuple) {
            return *id;
        }
        self.next_id += 1;
        let id = FlowId(self.next_id);
        trace!(flow_id = id.0, %tuple, "新流");
        self.classifier.insert(tuple, id);
        self.tuples.insert(id, tuple);
        self.stats.insert(id, FlowStats::default());
        id
    }

    /// 发送端观测到一个包
    pub fn record_tx(&mut self, pkt: &Packet, now: SimTime) -> FlowId {
        let id = self.classify(pkt.flow);
        let st = self.stats.entry(id).or_default();
        st.tx_packets += 1;
        st.tx_bytes += pkt.size_bytes() as u64;
        st.time_first_tx.get_or_insert(now);
        st.time_last_tx = Some(now);
        id
    }

    /// 接收端观测到一个包；首次发送时间取包上携带的发送时间戳
    pub fn record_rx(&mut self, pkt: &Packet, now: SimTime) -> FlowId {
        let id = self.classify(pkt.flow);
        let st = self.stats.entry(id).or_default();
        st.rx_packets += 1;
        st.rx_bytes += pkt.size_bytes() as u64;
        st.time_first_tx.get_or_insert(pkt.tx_time);
        st.time_first_rx.get_or_insert(now);
        st.time_last_rx = Some(now);
        st.delay_sum = st
            .delay_sum
            .saturating_add(now.checked_sub(pkt.tx_time).unwrap_or_default());
        id
    }

    pub fn find_flow(&self, id: FlowId) -> Option<FiveTuple> {
        self.tuples.get(&id).copied()
    }

    pub fn flow_id(&self, tuple: &FiveTuple) -> Option<FlowId> {
        self.classifier.get(tuple).copied()
    }

    pub fn stats(&self, id: FlowId) -> Option<&FlowStats> {
        self.stats.get(&id)
    }

    /// 按 FlowId 升序遍历
    pub fn iter(&self) -> impl Iterator<Item = (FlowId, FiveTuple, &FlowStats)> {
        self.stats.iter().filter_map(move |(id, st)| {
            self.tuples.get(id).map(|tuple| (*id, *tuple, st))
        })
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}
