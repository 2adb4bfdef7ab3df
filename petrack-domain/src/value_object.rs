//! 值对象（Value Object）
//!
//! 目前仅包含聚合版本号，仓储以其实现乐观并发控制。
//!
use serde::{Deserialize, Serialize};
use std::fmt;

/// 聚合版本号
///
/// 新建聚合为 0，每次成功写入仓储后递增。
///
/// ```
/// use petrack_domain::value_object::Version;
///
/// let v = Version::new();
/// assert!(v.is_new());
/// assert_eq!(v.next().value(), 1);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(usize);

impl Version {
    /// 初始版本（尚未持久化）
    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn from_value(value: usize) -> Self {
        Self(value)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    pub const fn value(&self) -> usize {
        self.0
    }

    /// 是否从未写入过仓储
    pub fn is_new(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<usize> for Version {
    fn from(value: usize) -> Self {
        Self::from_value(value)
    }
}

impl From<Version> for usize {
    fn from(version: Version) -> Self {
        version.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_version_is_zero() {
        let v = Version::default();
        assert_eq!(v, Version::new());
        assert!(v.is_new());
        assert_eq!(v.to_string(), "v0");
    }

    #[test]
    fn next_increments_and_orders() {
        let v1 = Version::new().next();
        let v3 = v1.next().next();
        assert_eq!(v3.value(), 3);
        assert!(v3 > v1);
        assert!(!v1.is_new());
    }

    #[test]
    fn serializes_as_plain_number() {
        let v = Version::from_value(7);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "7");
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
        assert_eq!(usize::from(back), 7);
    }
}
