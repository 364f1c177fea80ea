//! 流统计
//!
//! 按五元组归类的逐流计数器，仿真结束后读取。

mod monitor;

pub use monitor::{DegenerateFlow, FlowId, FlowMonitor, FlowStats};
