//! 仿真核心模块
//!
//! 一个很小的事件驱动仿真器，以及在其上驱动队列的负载仿真。

mod event;
pub mod load;
mod simulator;
mod time;

pub use event::Event;
pub use load::{LoadOpts, LoadReport, LoadWorld, run_load};
pub use simulator::Simulator;
pub use time::SimTime;
