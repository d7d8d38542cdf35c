//! 队列策略（Queue disciplines）
//!
//! `AqmQueue` 在队列满时按阈值与丢弃概率做准入控制；`DropTailQueue` 作为对照，
//! 满了就直接拒绝新包。

use crate::net::Packet;

mod admission;
mod aqm;
mod config;
mod drop_tail;
mod ring;
mod stats;

pub use admission::{AdmissionControl, AdmissionDecision, FixedSource, RngSource, UniformSource};
pub use aqm::AqmQueue;
pub use config::{
    AqmConfig, DEFAULT_CAPACITY, DEFAULT_DROP_PROBABILITY, DEFAULT_THRESHOLD, EvictPolicy,
};
pub use drop_tail::DropTailQueue;
pub use ring::RingBuffer;
pub use stats::QueueStats;

/// 一次 enqueue 的结果。队列满是正常状态，不是错误。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Accepted,
    /// 丢弃了队头数据包；`rejected` 为 `Some` 表示新包未被放入
    DroppedExisting {
        evicted: Packet,
        rejected: Option<Packet>,
    },
    /// 没有丢弃任何已有数据包，新包被拒绝并交还调用方
    NoDropRejected(Packet),
}

impl EnqueueOutcome {
    /// 新到达的数据包是否进入了队列
    pub fn admitted(&self) -> bool {
        matches!(
            self,
            EnqueueOutcome::Accepted | EnqueueOutcome::DroppedExisting { rejected: None, .. }
        )
    }
}

/// 由占用量与阈值决定的队列状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    BelowThreshold,
    AtOrAboveThreshold,
}

/// Packet 队列抽象
pub trait PacketQueue: std::fmt::Debug {
    /// 入队：满时按队列策略处理，绝不超过容量
    fn enqueue(&mut self, pkt: Packet) -> EnqueueOutcome;
    /// 出队：空队列返回 None，且不改变状态
    fn dequeue(&mut self) -> Option<Packet>;
    /// 从队头到队尾的只读快照
    fn inspect(&self) -> Vec<Packet>;

    fn len(&self) -> usize;
    fn capacity(&self) -> usize;
    fn stats(&self) -> &QueueStats;

    /// 准入控制参数；不做准入控制的队列返回 None
    fn admission(&self) -> Option<&AdmissionControl> {
        None
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }
}
