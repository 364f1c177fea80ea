//! 数据包类型
//!
//! 定义 UDP/IPv4 数据包与标识流的五元组。

use crate::sim::SimTime;
use serde::Serialize;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};

pub const IPV4_HEADER_BYTES: u32 = 20;
pub const UDP_HEADER_BYTES: u32 = 8;

/// 传输层协议（IANA 协议号）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Protocol {
    Udp,
}

impl Protocol {
    pub fn number(self) -> u8 {
        match self {
            Protocol::Udp => 17,
        }
    }
}

/// 五元组：唯一标识一条单向流
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FiveTuple {
    pub src_addr: Ipv4Addr,
    pub dst_addr: Ipv4Addr,
    pub src_port: u16,
    pub dst_port: u16,
    pub protocol: Protocol,
}

impl FiveTuple {
    pub fn udp(src: SocketAddrV4, dst: SocketAddrV4) -> Self {
        Self {
            src_addr: *src.ip(),
            dst_addr: *dst.ip(),
            src_port: src.port(),
            dst_port: dst.port(),
            protocol: Protocol::Udp,
        }
    }
}

impl fmt::Display for FiveTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} -> {}:{} ({})",
            self.src_addr,
            self.src_port,
            self.dst_addr,
            self.dst_port,
            self.protocol.number()
        )
    }
}

/// 网络数据包
#[derive(Debug, Clone)]
pub struct Packet {
    pub id: u64,
    pub flow: FiveTuple,
    pub payload_bytes: u32,
    /// 发送端打上的发送时间戳
    pub tx_time: SimTime,
}

impl Packet {
    /// IP 层大小：载荷 + UDP 头 + IPv4 头
    pub fn size_bytes(&self) -> u32 {
        self.payload_bytes
            .saturating_add(UDP_HEADER_BYTES + IPV4_HEADER_BYTES)
    }
}
