//! 仿真核心模块
//!
//! 此模块包含事件驱动仿真的核心组件，如仿真时间、事件、事件队列、世界和仿真器。

// 子模块声明
mod error;
mod event;
mod queue;
mod scheduled_event;
mod simulator;
mod time;
mod world;

// 重新导出公共接口
pub use error::SimError;
pub use event::Event;
pub use queue::EventQueue;
pub use scheduled_event::{EventId, ScheduledEvent};
pub use simulator::{RunSummary, SimState, Simulator};
pub use time::SimTime;
pub use world::World;
