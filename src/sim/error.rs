//! 仿真内核错误

use super::time::SimTime;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// 试图把事件调度到过去
    #[error("cannot schedule event at {at:?}: current time is already {now:?}")]
    InvalidSchedule { at: SimTime, now: SimTime },
    /// 队列里没有可执行的事件（运行自然结束的内部信号）
    #[error("event queue is empty")]
    EmptyQueue,
}
