//! DropTail（尾丢弃）队列
//!
//! 当队列已满时，直接拒绝新到达的 packet，不做准入控制。

use crate::error::ConfigError;
use crate::net::Packet;

use super::ring::RingBuffer;
use super::stats::QueueStats;
use super::{EnqueueOutcome, PacketQueue};

#[derive(Debug)]
pub struct DropTailQueue {
    ring: RingBuffer<Packet>,
    stats: QueueStats,
}

impl DropTailQueue {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self {
            ring: RingBuffer::new(capacity),
            stats: QueueStats::default(),
        })
    }
}

impl PacketQueue for DropTailQueue {
    fn enqueue(&mut self, pkt: Packet) -> EnqueueOutcome {
        match self.ring.push_back(pkt) {
            Ok(()) => {
                self.stats.accepted += 1;
                EnqueueOutcome::Accepted
            }
            Err(pkt) => {
                self.stats.rejected += 1;
                EnqueueOutcome::NoDropRejected(pkt)
            }
        }
    }

    fn dequeue(&mut self) -> Option<Packet> {
        let Some(pkt) = self.ring.pop_front() else {
            self.stats.empty_dequeues += 1;
            return None;
        };
        self.stats.dequeued += 1;
        Some(pkt)
    }

    fn inspect(&self) -> Vec<Packet> {
        self.ring.iter().cloned().collect()
    }

    fn len(&self) -> usize {
        self.ring.len()
    }

    fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    fn stats(&self) -> &QueueStats {
        &self.stats
    }
}
