//! 取值归一化
//! 按插入顺序查找包含指纹子串的标签，未命中时原样返回

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 保留标签：命中即视为"无规范值"，输出缺失
pub const UNKNOWN: &str = "?";

/// 标签 -> 指纹子串列表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueMap {
    entries: IndexMap<String, Vec<String>>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加标签，已存在时合并指纹并保持原位置
    pub fn insert<L, I, S>(&mut self, label: L, fingerprints: I)
    where
        L: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry(label.into())
            .or_default()
            .extend(fingerprints.into_iter().map(Into::into));
    }

    /// 链式构建
    pub fn with<I, S>(mut self, label: &str, fingerprints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(label, fingerprints);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 归一化，见 [`normalize`]
    pub fn normalize(&self, token: &str) -> Option<String> {
        normalize(token, self)
    }
}

/// 将原始片段归一化为规范标签
///
/// 逐个标签检查 `token` 是否包含任一指纹（区分大小写的纯子串匹配）：
/// - 命中保留标签 [`UNKNOWN`] 返回 `None`
/// - 命中其他标签返回该标签
/// - 全部未命中返回 `token` 本身
pub fn normalize(token: &str, map: &ValueMap) -> Option<String> {
    for (label, fingerprints) in map.iter() {
        if fingerprints.iter().any(|fp| token.contains(fp.as_str())) {
            if label == UNKNOWN {
                return None;
            }
            return Some(label.to_string());
        }
    }
    Some(token.to_string())
}
