//! 统计信息
//!
//! 定义网络层统计数据结构。

use serde::Serialize;

/// 网络统计信息
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct NetStats {
    pub delivered_pkts: u64,
    pub delivered_bytes: u64,
    /// 无法解析目的地址或目的端口没有绑定 socket 而丢弃的包
    pub dropped_pkts: u64,
}
