//! 准入控制（AQM 判决）
//!
//! 队列满时对每个新到达的数据包做一次无记忆的伯努利试验：
//! 占用量达到阈值后，以固定概率丢弃队头的旧包，否则拒绝新包。
//! 不做 RED 那样的指数加权平均队长估计。

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// [0, 1) 上的均匀随机源，可注入以便测试给出确定的采样序列。
pub trait UniformSource: fmt::Debug + Send {
    fn sample(&mut self) -> f64;
}

/// 基于 `rand` 的随机源
#[derive(Debug)]
pub struct RngSource<R = StdRng> {
    rng: R,
}

impl RngSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + fmt::Debug + Send> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + fmt::Debug + Send> UniformSource for RngSource<R> {
    fn sample(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// 按给定序列循环输出的随机源（确定性回放）
#[derive(Debug, Clone)]
pub struct FixedSource {
    samples: Vec<f64>,
    next: usize,
}

impl FixedSource {
    /// # Panics
    /// Panics if `samples` is empty.
    pub fn new(samples: impl Into<Vec<f64>>) -> Self {
        let samples = samples.into();
        assert!(!samples.is_empty(), "FixedSource needs at least one sample");
        Self { samples, next: 0 }
    }

    /// 总是返回同一个值
    pub fn constant(v: f64) -> Self {
        Self::new(vec![v])
    }
}

impl UniformSource for FixedSource {
    fn sample(&mut self) -> f64 {
        let v = self.samples[self.next % self.samples.len()];
        self.next = self.next.wrapping_add(1);
        v
    }
}

/// 准入判决结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// 低于阈值且仍有空位：直接接纳
    Admit,
    /// 丢弃队头（最老）的数据包腾出一个空位
    DropFront,
    /// 不丢弃，拒绝新到达的数据包
    Reject,
}

/// 固定阈值 + 固定丢弃概率的准入控制
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdmissionControl {
    threshold: usize,
    drop_probability: f64,
}

impl AdmissionControl {
    /// 参数合法性由 [`crate::queue::AqmConfig::validate`] 负责
    pub fn new(threshold: usize, drop_probability: f64) -> Self {
        Self {
            threshold,
            drop_probability,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn drop_probability(&self) -> f64 {
        self.drop_probability
    }

    /// 对一个新到达的数据包做判决。只有达到阈值时才会消耗一次随机采样。
    #[tracing::instrument(skip(self, source), fields(threshold = self.threshold, p = self.drop_probability))]
    pub fn decide(
        &self,
        occupancy: usize,
        capacity: usize,
        source: &mut dyn UniformSource,
    ) -> AdmissionDecision {
        if occupancy < self.threshold {
            return if occupancy < capacity {
                AdmissionDecision::Admit
            } else {
                AdmissionDecision::Reject
            };
        }
        let r = source.sample();
        trace!(r, "admission sample");
        if r < self.drop_probability {
            AdmissionDecision::DropFront
        } else {
            AdmissionDecision::Reject
        }
    }
}
