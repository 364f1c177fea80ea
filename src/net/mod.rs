//! 网络模拟模块
//!
//! 此模块包含 WLAN 仿真的网络组件：节点、地址、数据包、共享信道和网络世界。

// 子模块声明
mod address;
mod data_rate;
mod deliver_packet;
mod id;
mod medium;
mod net_world;
mod network;
mod node;
mod packet;
mod stats;

// 重新导出公共接口
pub use address::{AddressError, Ipv4AddressAllocator, MAX_PREFIX_LEN, MIN_PREFIX_LEN};
pub use data_rate::DataRate;
pub use deliver_packet::DeliverPacket;
pub use id::{ApplicationId, NodeId};
pub use medium::{Medium, MediumConfig};
pub use net_world::WlanWorld;
pub use network::Network;
pub use node::{EPHEMERAL_PORT_START, Node, NodeRole};
pub use packet::{FiveTuple, IPV4_HEADER_BYTES, Packet, Protocol, UDP_HEADER_BYTES};
pub use stats::NetStats;
