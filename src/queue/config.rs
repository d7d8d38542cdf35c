//! AQM 队列配置

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SimError};

pub const DEFAULT_CAPACITY: usize = 10;
pub const DEFAULT_THRESHOLD: usize = 8;
pub const DEFAULT_DROP_PROBABILITY: f64 = 0.2;

/// 丢弃队头之后如何处理新到达的数据包
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EvictPolicy {
    /// 在同一次 enqueue 中把新包放进腾出的空位
    #[default]
    InsertAfterEvict,
    /// 只腾出空位，新包仍被拒绝（由调用方决定是否重试）
    RejectAfterEvict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AqmConfig {
    pub capacity: usize,
    pub threshold: usize,
    pub drop_probability: f64,
    pub policy: EvictPolicy,
}

impl Default for AqmConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            threshold: DEFAULT_THRESHOLD,
            drop_probability: DEFAULT_DROP_PROBABILITY,
            policy: EvictPolicy::default(),
        }
    }
}

impl AqmConfig {
    pub fn new(capacity: usize, threshold: usize, drop_probability: f64) -> Self {
        Self {
            capacity,
            threshold,
            drop_probability,
            policy: EvictPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: EvictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.threshold > self.capacity {
            return Err(ConfigError::ThresholdAboveCapacity {
                threshold: self.threshold,
                capacity: self.capacity,
            });
        }
        // NaN 也落在这里
        if !(0.0..=1.0).contains(&self.drop_probability) {
            return Err(ConfigError::InvalidProbability(self.drop_probability));
        }
        Ok(())
    }

    /// 从 JSON 文件读取；缺省字段取默认值
    pub fn from_json_file(path: &Path) -> Result<Self, SimError> {
        let raw = fs::read_to_string(path)?;
        let cfg: AqmConfig = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
