//! 可视化事件记录（用于离线回放队列行为）
//!
//! 用结构化 JSON 事件而不是解析文本日志。

mod types;

pub use types::{VizEvent, VizEventKind, VizLogger};
