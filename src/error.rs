//! 错误类型
//!
//! 队列操作本身不会失败（满/空都是正常结果），这里只描述构造与输入阶段的错误。

use thiserror::Error;

/// 队列配置错误：在构造时拒绝，保证运行期不变量成立。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("capacity must be positive")]
    ZeroCapacity,

    #[error("threshold {threshold} exceeds capacity {capacity}")]
    ThresholdAboveCapacity { threshold: usize, capacity: usize },

    #[error("drop probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),
}

/// 数据包构造错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    #[error("packet id must not be empty")]
    EmptyId,

    #[error("invalid IP address format: {0}")]
    InvalidAddress(String),
}

/// 交互命令解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("missing argument <{0}>")]
    MissingArgument(&'static str),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error(transparent)]
    Packet(#[from] PacketError),
}

/// 二进制入口使用的汇总错误
#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
