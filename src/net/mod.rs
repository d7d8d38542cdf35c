//! 数据包模块
//!
//! 定义数据包、数据包标识与源地址校验。

mod addr;
mod packet;

pub use addr::{SourceAddr, validate_ipv4};
pub use packet::{Packet, PacketId};
