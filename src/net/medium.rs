//! 共享无线信道
//!
//! 站点与接入点之间的共享介质，简化为单个按 FIFO 串行发送的资源：
//! 只有容量与传播时延，不建模传播损耗和 MAC 竞争。

use super::data_rate::DataRate;
use crate::sim::SimTime;

/// 信道参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediumConfig {
    pub bandwidth: DataRate,
    pub latency: SimTime,
}

impl Default for MediumConfig {
    fn default() -> Self {
        Self {
            bandwidth: DataRate::from_mbps(1_000),
            latency: SimTime::from_micros(1),
        }
    }
}

/// 共享信道
#[derive(Debug)]
pub struct Medium {
    pub bandwidth: DataRate,
    pub latency: SimTime,
    pub busy_until: SimTime,
}

impl Medium {
    /// 创建新信道
    pub fn new(cfg: MediumConfig) -> Self {
        Self {
            bandwidth: cfg.bandwidth,
            latency: cfg.latency,
            busy_until: SimTime::ZERO,
        }
    }

    /// 计算传输指定字节数所需的时间
    pub(crate) fn tx_time(&self, bytes: u32) -> SimTime {
        self.bandwidth.tx_time(bytes)
    }

    /// 占用信道发送 `bytes` 字节，返回对端收到的时间。
    pub(crate) fn reserve(&mut self, now: SimTime, bytes: u32) -> SimTime {
        let start = now.max(self.busy_until);
        let depart = start.saturating_add(self.tx_time(bytes));
        self.busy_until = depart;
        depart.saturating_add(self.latency)
    }
}

impl Default for Medium {
    fn default() -> Self {
        Self::new(MediumConfig::default())
    }
}
