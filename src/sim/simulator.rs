//! 仿真器
//!
//! 维护当前时间与按 (时间, 调度序号) 排序的事件堆。

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use super::event::Event;
use super::time::SimTime;

struct Scheduled<W> {
    at: SimTime,
    seq: u64,
    ev: Box<dyn Event<W>>,
}

// BinaryHeap 是 max-heap；同一时刻按调度顺序执行，因此整体反向比较。
impl<W> Ord for Scheduled<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at
            .cmp(&other.at)
            .then(self.seq.cmp(&other.seq))
            .reverse()
    }
}

impl<W> PartialOrd for Scheduled<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W> PartialEq for Scheduled<W> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl<W> Eq for Scheduled<W> {}

/// 事件驱动仿真器
pub struct Simulator<W> {
    now: SimTime,
    next_seq: u64,
    q: BinaryHeap<Scheduled<W>>,
    executed: u64,
}

impl<W> Default for Simulator<W> {
    fn default() -> Self {
        Self {
            now: SimTime::ZERO,
            next_seq: 0,
            q: BinaryHeap::new(),
            executed: 0,
        }
    }
}

impl<W: 'static> Simulator<W> {
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 已执行的事件数
    pub fn executed(&self) -> u64 {
        self.executed
    }

    pub fn pending(&self) -> usize {
        self.q.len()
    }

    /// 调度事件在指定时间执行；早于当前时间的按当前时间处理
    pub fn schedule<E: Event<W>>(&mut self, at: SimTime, ev: E) {
        let at = at.max(self.now);
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        trace!(now = %self.now, at = %at, seq, "调度事件");
        self.q.push(Scheduled {
            at,
            seq,
            ev: Box::new(ev),
        });
    }

    /// 运行直到事件队列为空或下一个事件晚于 `until`。
    pub fn run_until(&mut self, until: SimTime, world: &mut W) {
        while self.q.peek().is_some_and(|top| top.at <= until) {
            let Some(item) = self.q.pop() else { break };
            self.now = item.at;
            self.executed += 1;
            item.ev.execute(self, world);
        }
        self.now = self.now.max(until);
        debug!(now = %self.now, executed = self.executed, pending = self.q.len(), "仿真暂停");
    }

    /// 运行所有事件直到队列为空。
    pub fn run(&mut self, world: &mut W) {
        while let Some(item) = self.q.pop() {
            self.now = item.at;
            self.executed += 1;
            item.ev.execute(self, world);
        }
        debug!(now = %self.now, executed = self.executed, "✅ 仿真完成");
    }
}
