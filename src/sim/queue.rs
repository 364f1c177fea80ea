//! 事件队列
//!
//! 按 (时间, 插入序号) 排序的待执行事件集合，支持取消。
//! 取消采用惰性删除：被取消的条目留在堆里，弹出时跳过。

use super::error::SimError;
use super::event::Event;
use super::scheduled_event::{EventId, ScheduledEvent};
use super::time::SimTime;
use std::collections::{BinaryHeap, HashSet};
use tracing::trace;

#[derive(Default)]
pub struct EventQueue {
    heap: BinaryHeap<ScheduledEvent>,
    /// 仍在等待执行（未取消、未弹出）的事件序号
    live: HashSet<u64>,
    next_seq: u64,
}

impl EventQueue {
    /// 插入事件；`at` 早于 `now` 时拒绝。
    pub fn insert(
        &mut self,
        now: SimTime,
        at: SimTime,
        ev: Box<dyn Event>,
    ) -> Result<EventId, SimError> {
        if at < now {
            return Err(SimError::InvalidSchedule { at, now });
        }
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.live.insert(seq);
        self.heap.push(ScheduledEvent { at, seq, ev });
        Ok(EventId { at, seq })
    }

    /// 弹出 (时间, 序号) 最小的未取消事件。
    pub fn pop_earliest(&mut self) -> Result<ScheduledEvent, SimError> {
        while let Some(item) = self.heap.pop() {
            if self.live.remove(&item.seq) {
                return Ok(item);
            }
            trace!(seq = item.seq, at = ?item.at, "跳过已取消事件");
        }
        Err(SimError::EmptyQueue)
    }

    /// 下一个未取消事件的时间；顺便清理堆顶的已取消条目。
    pub fn next_time(&mut self) -> Option<SimTime> {
        while let Some(top) = self.heap.peek() {
            if self.live.contains(&top.seq) {
                return Some(top.at);
            }
            self.heap.pop();
        }
        None
    }

    /// 取消一个仍在等待的事件。已执行/已取消/已丢弃的事件返回 false，无副作用。
    pub fn cancel(&mut self, id: EventId) -> bool {
        self.live.remove(&id.seq)
    }

    pub fn is_pending(&self, id: EventId) -> bool {
        self.live.contains(&id.seq)
    }

    /// 未取消的待执行事件数
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// 丢弃所有事件，返回其中未取消的数量
    pub fn clear(&mut self) -> usize {
        let n = self.live.len();
        self.heap.clear();
        self.live.clear();
        n
    }
}
