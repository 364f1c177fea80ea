//! 数据速率
//!
//! 比特率与传输时间之间的换算。

use crate::sim::SimTime;
use serde::Serialize;

/// 数据速率（bit/s）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DataRate(pub u64);

impl DataRate {
    pub fn from_mbps(mbps: u64) -> DataRate {
        DataRate(mbps.saturating_mul(1_000_000))
    }

    pub fn bps(self) -> u64 {
        self.0
    }

    /// 以该速率发出 `bits` 比特所需的时间，向下取整到纳秒。
    ///
    /// 周期性发送用它计算第 k 个包的绝对偏移，避免逐次累加的舍入漂移。
    pub fn time_for_bits(self, bits: u128) -> SimTime {
        if self.0 == 0 {
            return SimTime::MAX;
        }
        let nanos = bits.saturating_mul(1_000_000_000u128) / self.0 as u128;
        SimTime(nanos.min(u64::MAX as u128) as u64)
    }

    /// 串行化 `bytes` 字节所需的时间，向上取整到纳秒
    pub fn tx_time(self, bytes: u32) -> SimTime {
        if self.0 == 0 {
            return SimTime::MAX;
        }
        let bits = (bytes as u128).saturating_mul(8);
        let nanos = (bits.saturating_mul(1_000_000_000u128) + (self.0 as u128 - 1)) / self.0 as u128;
        SimTime(nanos.min(u64::MAX as u128) as u64)
    }

    /// 按份数均分（截断到整 bit/s）
    pub fn split(self, parts: u32) -> DataRate {
        if parts == 0 {
            return self;
        }
        DataRate(self.0 / parts as u64)
    }
}
