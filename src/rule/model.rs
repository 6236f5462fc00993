//! 规则源数据模型定义
//! 仅存储规则数据，无任何匹配逻辑，支持序列化/反序列化

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::mapper::{Category, ValueMap};

fn default_compute_fn() -> String {
    crate::compiler::functions::NORMALIZE.to_string()
}

/// 带转换方式的字段定义（按 `kind` 区分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformSource {
    Identity {
        field: String,
    },
    Constant {
        field: String,
        value: String,
    },
    ConstantFn {
        field: String,
        func: String,
    },
    Replace {
        field: String,
        pattern: String,
        replacement: String,
    },
    ReplaceFn {
        field: String,
        pattern: String,
        replacement: String,
        func: String,
    },
    Compute {
        field: String,
        map: String,
        #[serde(default = "default_compute_fn")]
        func: String,
    },
}

impl TransformSource {
    pub fn field(&self) -> &str {
        match self {
            TransformSource::Identity { field }
            | TransformSource::Constant { field, .. }
            | TransformSource::ConstantFn { field, .. }
            | TransformSource::Replace { field, .. }
            | TransformSource::ReplaceFn { field, .. }
            | TransformSource::Compute { field, .. } => field,
        }
    }
}

/// 字段定义：纯字符串为原样输出，对象为带转换的字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSource {
    Name(String),
    Spec(TransformSource),
}

impl FieldSource {
    pub fn field(&self) -> &str {
        match self {
            FieldSource::Name(name) => name,
            FieldSource::Spec(spec) => spec.field(),
        }
    }
}

/// 规则组定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleGroupSource {
    pub patterns: Vec<String>,
    pub fields: Vec<FieldSource>,
}

/// 完整规则库
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleLibrary {
    #[serde(default)]
    pub maps: IndexMap<String, ValueMap>,
    #[serde(default)]
    pub browser: Vec<RuleGroupSource>,
    #[serde(default)]
    pub cpu: Vec<RuleGroupSource>,
    #[serde(default)]
    pub device: Vec<RuleGroupSource>,
    #[serde(default)]
    pub engine: Vec<RuleGroupSource>,
    #[serde(default)]
    pub os: Vec<RuleGroupSource>,
}

impl RuleLibrary {
    /// 获取指定维度的规则组
    pub fn groups(&self, category: Category) -> &[RuleGroupSource] {
        match category {
            Category::Browser => &self.browser,
            Category::Engine => &self.engine,
            Category::Os => &self.os,
            Category::Device => &self.device,
            Category::Cpu => &self.cpu,
        }
    }

    fn groups_mut(&mut self, category: Category) -> &mut Vec<RuleGroupSource> {
        match category {
            Category::Browser => &mut self.browser,
            Category::Engine => &mut self.engine,
            Category::Os => &mut self.os,
            Category::Device => &mut self.device,
            Category::Cpu => &mut self.cpu,
        }
    }

    /// 合并扩展规则
    /// - 各维度扩展规则组前置，优先于现有规则
    /// - 同名映射表由扩展覆盖
    pub fn extend(&mut self, extension: RuleLibrary) {
        let RuleLibrary { maps, browser, cpu, device, engine, os } = extension;
        for (name, map) in maps {
            self.maps.insert(name, map);
        }
        for (category, mut groups) in [
            (Category::Browser, browser),
            (Category::Cpu, cpu),
            (Category::Device, device),
            (Category::Engine, engine),
            (Category::Os, os),
        ] {
            let existing = self.groups_mut(category);
            groups.append(existing);
            *existing = groups;
        }
    }

    /// 规则组总数
    pub fn group_count(&self) -> usize {
        Category::ALL.iter().map(|c| self.groups(*c).len()).sum()
    }
}
