//! 输出记录：字段名 -> 可选取值
//! 每次解析新建一份，所有字段预置为缺失

use std::fmt::{Display, Formatter};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 字段名常量
pub mod field {
    pub const NAME: &str = "name";
    pub const VERSION: &str = "version";
    pub const MAJOR: &str = "major";
    pub const ARCHITECTURE: &str = "architecture";
    pub const VENDOR: &str = "vendor";
    pub const MODEL: &str = "model";
    pub const TYPE: &str = "type";
}

/// 解析维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Browser,
    Engine,
    Os,
    Device,
    Cpu,
}

impl Category {
    /// 所有维度（规则表顺序）
    pub const ALL: [Category; 5] = [
        Category::Browser,
        Category::Engine,
        Category::Os,
        Category::Device,
        Category::Cpu,
    ];

    /// 该维度规则可写入的字段
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Category::Browser => &[field::NAME, field::VERSION],
            Category::Engine => &[field::NAME, field::VERSION],
            Category::Os => &[field::NAME, field::VERSION],
            Category::Device => &[field::VENDOR, field::MODEL, field::TYPE],
            Category::Cpu => &[field::ARCHITECTURE],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Browser => "browser",
            Category::Engine => "engine",
            Category::Os => "os",
            Category::Device => "device",
            Category::Cpu => "cpu",
        }
    }

    /// 新建该维度的空记录
    pub fn empty_record(&self) -> FieldRecord {
        FieldRecord::with_fields(self.fields().iter().copied())
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 字段记录，保持字段插入顺序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRecord {
    fields: IndexMap<String, Option<String>>,
}

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定字段名初始化，所有字段为缺失
    pub fn with_fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: names.into_iter().map(|name| (name.into(), None)).collect(),
        }
    }

    /// 写入字段，不存在时追加
    pub fn set(&mut self, name: &str, value: Option<String>) {
        match self.fields.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_deref())
    }

    /// 取出字段值，保留字段位置
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.fields.get_mut(name).and_then(Option::take)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// 所有字段均缺失
    pub fn is_empty(&self) -> bool {
        self.fields.values().all(Option::is_none)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}
