//! 节点类型
//!
//! 定义网络节点（接入点、站点）及其接口地址。

use super::id::NodeId;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

/// UDP 临时端口的起始值
pub const EPHEMERAL_PORT_START: u16 = 49153;

/// 节点角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    AccessPoint,
    Station,
}

/// 网络节点：创建后在整个运行期间一直存在。
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    name: String,
    role: NodeRole,
    /// 接口名 -> 地址
    interfaces: BTreeMap<String, Ipv4Addr>,
    next_ephemeral: u16,
}

impl Node {
    /// 创建新节点
    pub fn new(id: NodeId, name: impl Into<String>, role: NodeRole) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            interfaces: BTreeMap::new(),
            next_ephemeral: EPHEMERAL_PORT_START,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub(crate) fn attach_interface(&mut self, name: impl Into<String>, addr: Ipv4Addr) {
        self.interfaces.insert(name.into(), addr);
    }

    /// 按接口名查地址
    pub fn address(&self, iface: &str) -> Option<Ipv4Addr> {
        self.interfaces.get(iface).copied()
    }

    /// 第一个接口的地址（按接口名排序）
    pub fn primary_address(&self) -> Option<Ipv4Addr> {
        self.interfaces.values().next().copied()
    }

    pub fn interfaces(&self) -> impl Iterator<Item = (&str, Ipv4Addr)> {
        self.interfaces.iter().map(|(name, addr)| (name.as_str(), *addr))
    }

    /// 分配一个 UDP 临时端口
    pub(crate) fn allocate_ephemeral_port(&mut self) -> u16 {
        let port = self.next_ephemeral;
        self.next_ephemeral = match self.next_ephemeral.checked_add(1) {
            Some(p) => p,
            None => EPHEMERAL_PORT_START,
        };
        port
    }
}
