use serde::{Deserialize, Serialize};

use crate::net::{Packet, SourceAddr};
use crate::queue::{EnqueueOutcome, PacketQueue};
use crate::sim::SimTime;

/// 可视化事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VizEventKind {
    /// 队列参数（建议作为第一条事件）
    Meta {
        capacity: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        threshold: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        drop_probability: Option<f64>,
    },
    /// packet 入队
    Enqueue { q_len: usize, q_cap: usize },
    /// 准入控制丢弃了队头 packet
    Evict { q_len: usize, q_cap: usize },
    /// 新到达的 packet 被拒绝
    Reject { q_len: usize, q_cap: usize },
    /// packet 出队
    Dequeue { q_len: usize, q_cap: usize },
    /// 对空队列出队
    EmptyDequeue,
}

/// 一个可回放的事件（JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizEvent {
    pub seq: u64,
    /// 仿真时间（纳秒）；交互模式下没有时间轴
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_ns: Option<u64>,
    pub pkt_id: Option<String>,
    pub src: Option<SourceAddr>,
    #[serde(flatten)]
    pub kind: VizEventKind,
}

/// 一个简单的事件收集器（存内存，结束时写 JSON 文件）
#[derive(Debug, Default)]
pub struct VizLogger {
    pub events: Vec<VizEvent>,
    now: Option<SimTime>,
}

impl VizLogger {
    /// 设置后续事件的时间戳
    pub fn set_now(&mut self, now: SimTime) {
        self.now = Some(now);
    }

    pub fn push(&mut self, pkt: Option<&Packet>, kind: VizEventKind) {
        let seq = self.events.len() as u64;
        self.events.push(VizEvent {
            seq,
            t_ns: self.now.map(|t| t.0),
            pkt_id: pkt.map(|p| p.id().to_string()),
            src: pkt.map(Packet::src),
            kind,
        });
    }

    /// 记录队列参数
    pub fn record_meta<Q: PacketQueue + ?Sized>(&mut self, queue: &Q) {
        let ac = queue.admission();
        self.push(
            None,
            VizEventKind::Meta {
                capacity: queue.capacity(),
                threshold: ac.map(|a| a.threshold()),
                drop_probability: ac.map(|a| a.drop_probability()),
            },
        );
    }

    /// 把一次 enqueue 的结果展开成事件；`q_len` 为操作完成后的队长
    pub fn record_enqueue(
        &mut self,
        incoming: &Packet,
        outcome: &EnqueueOutcome,
        q_len: usize,
        q_cap: usize,
    ) {
        match outcome {
            EnqueueOutcome::Accepted => {
                self.push(Some(incoming), VizEventKind::Enqueue { q_len, q_cap });
            }
            EnqueueOutcome::DroppedExisting { evicted, rejected } => {
                self.push(Some(evicted), VizEventKind::Evict { q_len, q_cap });
                let kind = if rejected.is_some() {
                    VizEventKind::Reject { q_len, q_cap }
                } else {
                    VizEventKind::Enqueue { q_len, q_cap }
                };
                self.push(Some(incoming), kind);
            }
            EnqueueOutcome::NoDropRejected(_) => {
                self.push(Some(incoming), VizEventKind::Reject { q_len, q_cap });
            }
        }
    }

    pub fn record_dequeue(&mut self, pkt: Option<&Packet>, q_len: usize, q_cap: usize) {
        match pkt {
            Some(p) => self.push(Some(p), VizEventKind::Dequeue { q_len, q_cap }),
            None => self.push(None, VizEventKind::EmptyDequeue),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }
}
