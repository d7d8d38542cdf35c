//! AQM 队列
//!
//! 定长环形缓冲区 + 准入控制。未满时直接入队；满时交给 [`AdmissionControl`]，
//! 判决为丢弃队头时按 [`EvictPolicy`] 处理新包。

use tracing::{debug, info};

use crate::error::ConfigError;
use crate::net::Packet;

use super::admission::{AdmissionControl, AdmissionDecision, RngSource, UniformSource};
use super::config::{AqmConfig, EvictPolicy};
use super::ring::RingBuffer;
use super::stats::QueueStats;
use super::{EnqueueOutcome, PacketQueue, QueueState};

#[derive(Debug)]
pub struct AqmQueue {
    ring: RingBuffer<Packet>,
    admission: AdmissionControl,
    policy: EvictPolicy,
    source: Box<dyn UniformSource>,
    stats: QueueStats,
}

impl AqmQueue {
    pub fn new(cfg: &AqmConfig, source: impl UniformSource + 'static) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            ring: RingBuffer::new(cfg.capacity),
            admission: AdmissionControl::new(cfg.threshold, cfg.drop_probability),
            policy: cfg.policy,
            source: Box::new(source),
            stats: QueueStats::default(),
        })
    }

    /// 使用系统熵初始化随机源
    pub fn from_config(cfg: &AqmConfig) -> Result<Self, ConfigError> {
        Self::new(cfg, RngSource::from_entropy())
    }

    /// 固定种子，便于复现
    pub fn seeded(cfg: &AqmConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(cfg, RngSource::seeded(seed))
    }

    pub fn policy(&self) -> EvictPolicy {
        self.policy
    }

    pub fn threshold(&self) -> usize {
        self.admission.threshold()
    }

    pub fn state(&self) -> QueueState {
        if self.ring.len() < self.admission.threshold() {
            QueueState::BelowThreshold
        } else {
            QueueState::AtOrAboveThreshold
        }
    }

    pub fn front(&self) -> Option<&Packet> {
        self.ring.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Packet> + '_ {
        self.ring.iter()
    }

    fn push(&mut self, pkt: Packet) -> EnqueueOutcome {
        match self.ring.push_back(pkt) {
            Ok(()) => {
                self.stats.accepted += 1;
                EnqueueOutcome::Accepted
            }
            Err(pkt) => self.reject(pkt),
        }
    }

    fn reject(&mut self, pkt: Packet) -> EnqueueOutcome {
        self.stats.rejected += 1;
        debug!(pkt_id = %pkt.id(), src = %pkt.src(), "no packet dropped, rejecting arrival");
        EnqueueOutcome::NoDropRejected(pkt)
    }
}

impl PacketQueue for AqmQueue {
    #[tracing::instrument(skip(self, pkt), fields(pkt_id = %pkt.id(), src = %pkt.src(), len = self.ring.len()))]
    fn enqueue(&mut self, pkt: Packet) -> EnqueueOutcome {
        if !self.ring.is_full() {
            debug!("数据包入队");
            return self.push(pkt);
        }

        self.stats.admission_checks += 1;
        let decision = self.admission.decide(
            self.ring.len(),
            self.ring.capacity(),
            self.source.as_mut(),
        );
        match decision {
            // 队列已满时走不到真正的入队，push 会转为拒绝
            AdmissionDecision::Admit => self.push(pkt),
            AdmissionDecision::Reject => self.reject(pkt),
            AdmissionDecision::DropFront => {
                let Some(evicted) = self.ring.pop_front() else {
                    return self.reject(pkt);
                };
                self.stats.evicted += 1;
                info!(evicted = %evicted.id(), evicted_src = %evicted.src(), "🗑️  丢弃队头数据包以缓解拥塞");
                let rejected = match self.policy {
                    EvictPolicy::InsertAfterEvict => match self.push(pkt) {
                        EnqueueOutcome::Accepted => None,
                        EnqueueOutcome::NoDropRejected(pkt) => Some(pkt),
                        EnqueueOutcome::DroppedExisting { .. } => None,
                    },
                    EvictPolicy::RejectAfterEvict => {
                        self.stats.rejected += 1;
                        Some(pkt)
                    }
                };
                EnqueueOutcome::DroppedExisting { evicted, rejected }
            }
        }
    }

    fn dequeue(&mut self) -> Option<Packet> {
        match self.ring.pop_front() {
            Some(pkt) => {
                self.stats.dequeued += 1;
                debug!(pkt_id = %pkt.id(), len = self.ring.len(), "数据包出队");
                Some(pkt)
            }
            None => {
                self.stats.empty_dequeues += 1;
                None
            }
        }
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

    fn admission(&self) -> Option<&AdmissionControl> {
        Some(&self.admission)
    }
}
