//! 源地址
//!
//! 点分十进制 IPv4 校验。核心队列只接收已校验过的 [`SourceAddr`]。

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PacketError;

/// 已校验的数据包源地址
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceAddr(pub Ipv4Addr);

impl SourceAddr {
    pub fn parse(s: &str) -> Result<Self, PacketError> {
        parse_octets(s)
            .map(|[a, b, c, d]| SourceAddr(Ipv4Addr::new(a, b, c, d)))
            .ok_or_else(|| PacketError::InvalidAddress(s.to_string()))
    }

    pub fn octets(&self) -> [u8; 4] {
        self.0.octets()
    }
}

impl FromStr for SourceAddr {
    type Err = PacketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceAddr::parse(s)
    }
}

impl From<Ipv4Addr> for SourceAddr {
    fn from(ip: Ipv4Addr) -> Self {
        SourceAddr(ip)
    }
}

impl fmt::Display for SourceAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 地址格式校验：恰好 4 段以 `.` 分隔的十进制数，每段 1~3 位且不超过 255。
///
/// 允许前导零（`010` 视为 10），不允许空段、符号或空白。
pub fn validate_ipv4(s: &str) -> bool {
    parse_octets(s).is_some()
}

fn parse_octets(s: &str) -> Option<[u8; 4]> {
    let mut out = [0u8; 4];
    let mut parts = s.split('.');
    for slot in out.iter_mut() {
        let tok = parts.next()?;
        if tok.is_empty() || tok.len() > 3 || !tok.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // 最多 3 位数字，u16 不会溢出
        let v: u16 = tok.parse().ok()?;
        *slot = u8::try_from(v).ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}
