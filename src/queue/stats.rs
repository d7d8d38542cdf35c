//! 队列统计信息

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// 成功放入队列的数据包（含丢弃队头后补入的）
    pub accepted: u64,
    /// 为缓解拥塞被丢弃的队头数据包
    pub evicted: u64,
    /// 未能入队的新到达数据包
    pub rejected: u64,
    pub dequeued: u64,
    pub empty_dequeues: u64,
    /// 触发准入控制的次数
    pub admission_checks: u64,
}
