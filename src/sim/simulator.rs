//! 仿真器
//!
//! 定义事件驱动仿真器，维护当前时间、运行状态与事件队列。

use super::error::SimError;
use super::event::Event;
use super::queue::EventQueue;
use super::scheduled_event::EventId;
use super::time::SimTime;
use super::world::World;
use serde::Serialize;
use tracing::{debug, info, trace, warn};

/// 仿真器运行状态：Idle → Running → Stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimState {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// 一次运行的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunSummary {
    /// 执行的事件数
    pub executed: u64,
    /// 因超过停止时间而被丢弃（未执行）的事件数
    pub discarded: usize,
    pub final_time: SimTime,
}

/// 事件驱动仿真器：维护当前时间与事件队列。
///
/// 每个实例独立持有自己的时钟和队列，多个实例可以在不同线程上并行运行。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    state: SimState,
    q: EventQueue,
}

impl Simulator {
    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    /// 待执行（未取消）的事件数
    pub fn pending(&self) -> usize {
        self.q.len()
    }

    /// 调度事件在指定时间执行；不能早于当前时间。
    #[tracing::instrument(level = "trace", skip(self, ev), fields(event_type = std::any::type_name::<E>(), schedule_at = ?at))]
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) -> Result<EventId, SimError> {
        match self.q.insert(self.now, at, Box::new(ev)) {
            Ok(id) => {
                trace!(now = ?self.now, seq = id.seq, queue_size = self.q.len(), "事件已加入队列");
                Ok(id)
            }
            Err(err) => {
                warn!(%err, "拒绝调度到过去的事件");
                Err(err)
            }
        }
    }

    /// 在当前时间之后 `delay` 处调度事件
    pub fn schedule_in<E: Event>(&mut self, delay: SimTime, ev: E) -> EventId {
        let at = self.now.saturating_add(delay);
        self.q
            .insert(self.now, at, Box::new(ev))
            .expect("now + delay is never in the past")
    }

    /// 取消尚未执行的事件；返回是否真的取消了。
    pub fn cancel(&mut self, id: EventId) -> bool {
        let cancelled = self.q.cancel(id);
        trace!(seq = id.seq, at = ?id.at, cancelled, "取消事件");
        cancelled
    }

    pub fn is_pending(&self, id: EventId) -> bool {
        self.q.is_pending(id)
    }

    /// 运行直到事件队列为空或到达 `until`。
    ///
    /// 时间恰好等于 `until` 的事件会执行；晚于 `until` 的事件全部丢弃。
    #[tracing::instrument(skip(self, world))]
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) -> RunSummary {
        info!("▶️  开始运行仿真");
        self.state = SimState::Running;

        let mut executed = 0u64;
        while let Some(at) = self.q.next_time() {
            if at > until {
                break;
            }
            let Ok(item) = self.q.pop_earliest() else {
                break;
            };
            self.now = item.at;
            executed += 1;
            item.ev.execute(self, world);
        }

        let discarded = self.q.clear();
        self.now = self.now.max(until);
        self.state = SimState::Stopped;

        info!(
            total_events = executed,
            discarded,
            final_time = ?self.now,
            "✅ 仿真完成"
        );
        RunSummary {
            executed,
            discarded,
            final_time: self.now,
        }
    }

    /// 运行所有事件直到队列为空。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut dyn World) -> RunSummary {
        info!("▶️  开始运行仿真");
        debug!(now = ?self.now, queue_size = self.q.len(), "初始状态");
        self.state = SimState::Running;

        let mut executed = 0u64;
        // pop_earliest 只会以 EmptyQueue 失败，即运行自然结束
        while let Ok(item) = self.q.pop_earliest() {
            executed += 1;
            self.now = item.at;
            trace!(
                event_num = executed,
                now = ?self.now,
                seq = item.seq,
                remaining_queue = self.q.len(),
                "执行事件"
            );
            item.ev.execute(self, world);
        }

        self.state = SimState::Stopped;
        info!(total_events = executed, final_time = ?self.now, "✅ 仿真完成");
        RunSummary {
            executed,
            discarded: 0,
            final_time: self.now,
        }
    }
}
