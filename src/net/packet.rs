//! 数据包类型
//!
//! 一个数据包只有调用方给出的标识和源地址，创建后不可变。

use std::fmt;

use serde::{Deserialize, Serialize};

use super::addr::SourceAddr;
use crate::error::PacketError;

/// 数据包标识（非空，对队列来说是不透明的）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PacketId(String);

impl PacketId {
    pub fn new(id: impl Into<String>) -> Result<Self, PacketError> {
        let id = id.into();
        if id.is_empty() {
            return Err(PacketError::EmptyId);
        }
        Ok(PacketId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PacketId {
    type Error = PacketError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        PacketId::new(id)
    }
}

impl From<PacketId> for String {
    fn from(id: PacketId) -> Self {
        id.0
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 网络数据包
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    id: PacketId,
    src: SourceAddr,
}

impl Packet {
    pub fn new(id: PacketId, src: SourceAddr) -> Self {
        Self { id, src }
    }

    /// 从原始输入构造：校验 id 非空与地址格式
    pub fn parse(id: &str, src: &str) -> Result<Self, PacketError> {
        Ok(Self::new(PacketId::new(id)?, src.parse::<SourceAddr>()?))
    }

    pub fn id(&self) -> &PacketId {
        &self.id
    }

    pub fn src(&self) -> SourceAddr {
        self.src
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Packet {} from IP {}", self.id, self.src)
    }
}
