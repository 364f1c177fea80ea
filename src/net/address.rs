//! IPv4 地址分配
//!
//! 按顺序为接口分配同一网段内的主机地址。

use std::net::Ipv4Addr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("prefix length /{0} is outside 1..=30")]
    InvalidPrefix(u8),
    #[error("network {network}/{prefix_len} has no free host address left")]
    Exhausted { network: Ipv4Addr, prefix_len: u8 },
}

pub const MIN_PREFIX_LEN: u8 = 1;
pub const MAX_PREFIX_LEN: u8 = 30;

/// 顺序地址分配器：从 `.1` 开始分配，跳过网络地址和广播地址。
#[derive(Debug, Clone)]
pub struct Ipv4AddressAllocator {
    network: u32,
    prefix_len: u8,
    next_host: u32,
}

impl Ipv4AddressAllocator {
    /// 前缀长度必须在 `1..=30` 内：/31 和 /32 没有主机地址，/0 不是一个网段。
    pub fn new(network: Ipv4Addr, prefix_len: u8) -> Result<Self, AddressError> {
        if !(MIN_PREFIX_LEN..=MAX_PREFIX_LEN).contains(&prefix_len) {
            return Err(AddressError::InvalidPrefix(prefix_len));
        }
        let mask = u32::MAX << (32 - prefix_len as u32);
        Ok(Self {
            network: u32::from(network) & mask,
            prefix_len,
            next_host: 1,
        })
    }

    /// 网段内可分配的主机地址总数
    pub fn capacity(&self) -> u32 {
        (1u32 << (32 - self.prefix_len as u32)) - 2
    }

    /// 尚未分配的主机地址数
    pub fn remaining(&self) -> u32 {
        self.capacity() + 1 - self.next_host
    }

    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.network)
    }

    pub fn allocate(&mut self) -> Result<Ipv4Addr, AddressError> {
        if self.next_host > self.capacity() {
            return Err(AddressError::Exhausted {
                network: self.network(),
                prefix_len: self.prefix_len,
            });
        }
        let addr = Ipv4Addr::from(self.network | self.next_host);
        self.next_host += 1;
        Ok(addr)
    }
}
