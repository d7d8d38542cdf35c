//! 事件 trait

use super::simulator::Simulator;

/// 事件：可被调度执行。使用 `self: Box<Self>` 以支持 move/所有权转移。
///
/// `W` 是事件作用的世界状态（例如负载仿真中的队列与统计）。
pub trait Event<W>: 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator<W>, world: &mut W);
}
