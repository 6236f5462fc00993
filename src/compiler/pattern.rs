//! 编译后规则模型
//! 规则表在构建后只读，可跨线程共享

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use fancy_regex::{Captures, Regex};

use super::functions::{ComputeFn, ValueFn};
use crate::mapper::{Category, ValueMap};

/// 编译后的正则模式
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    source: String,
}

impl CompiledPattern {
    pub(crate) fn new(regex: Regex, source: &str) -> Self {
        Self {
            regex,
            source: source.to_string(),
        }
    }

    /// 规则作者编写的原始模式（不含编译时追加的标志）
    pub fn source(&self) -> &str {
        &self.source
    }

    /// 捕获分组数量（不含整体匹配）
    pub fn capture_count(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }

    /// 匹配输入，返回捕获结果；回溯超限等运行期错误原样返回
    pub fn captures<'t>(&self, input: &'t str) -> Result<Option<Captures<'t>>, fancy_regex::Error> {
        self.regex.captures(input)
    }

    pub fn is_match(&self, input: &str) -> Result<bool, fancy_regex::Error> {
        self.regex.is_match(input)
    }

    /// 全局替换，`replacement` 支持 `$1` 形式的分组引用
    pub fn replace_all<'t>(
        &self,
        input: &'t str,
        replacement: &str,
    ) -> Result<Cow<'t, str>, fancy_regex::Error> {
        self.regex.try_replacen(input, 0, replacement)
    }
}

/// 捕获值转换方式，在规则编写阶段确定
#[derive(Clone)]
pub enum Transform {
    /// 捕获值原样输出
    Identity,
    /// 固定值，捕获槽位仍被消耗
    Constant(String),
    /// 固定函数，无论捕获是否存在都会调用
    ConstantFn(ValueFn),
    /// 正则替换后输出
    Replace {
        pattern: CompiledPattern,
        replacement: String,
    },
    /// 正则替换后再经函数处理
    ReplaceFn {
        pattern: CompiledPattern,
        replacement: String,
        func: ValueFn,
    },
    /// 以附加参数计算（归一化查表）
    ComputeFn {
        func: ComputeFn,
        extra: Arc<ValueMap>,
    },
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Identity => f.write_str("Identity"),
            Transform::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Transform::ConstantFn(_) => f.write_str("ConstantFn(<fn>)"),
            Transform::Replace { pattern, replacement } => f
                .debug_struct("Replace")
                .field("pattern", &pattern.source())
                .field("replacement", replacement)
                .finish(),
            Transform::ReplaceFn { pattern, replacement, .. } => f
                .debug_struct("ReplaceFn")
                .field("pattern", &pattern.source())
                .field("replacement", replacement)
                .finish_non_exhaustive(),
            Transform::ComputeFn { extra, .. } => f
                .debug_struct("ComputeFn")
                .field("extra", extra)
                .finish_non_exhaustive(),
        }
    }
}

/// 字段定义：字段名 + 转换方式，按顺序对应捕获分组
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    transform: Transform,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
        }
    }

    pub fn identity(name: impl Into<String>) -> Self {
        Self::new(name, Transform::Identity)
    }

    pub fn constant(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Transform::Constant(value.into()))
    }

    pub fn constant_fn<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Option<&str>) -> Option<String> + Send + Sync + 'static,
    {
        Self::new(name, Transform::ConstantFn(Arc::new(func)))
    }

    pub fn replace(
        name: impl Into<String>,
        pattern: CompiledPattern,
        replacement: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            Transform::Replace {
                pattern,
                replacement: replacement.into(),
            },
        )
    }

    pub fn compute<F>(name: impl Into<String>, func: F, extra: Arc<ValueMap>) -> Self
    where
        F: Fn(&str, &ValueMap) -> Option<String> + Send + Sync + 'static,
    {
        Self::new(
            name,
            Transform::ComputeFn {
                func: Arc::new(func),
                extra,
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }
}

/// 规则组：同一语义的备选模式 + 字段定义
#[derive(Debug, Clone)]
pub struct RuleGroup {
    patterns: Vec<CompiledPattern>,
    fields: Vec<FieldSpec>,
}

impl RuleGroup {
    pub fn new(patterns: Vec<CompiledPattern>, fields: Vec<FieldSpec>) -> Self {
        Self { patterns, fields }
    }

    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

/// 单个维度的有序规则表
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    groups: Vec<RuleGroup>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, group: RuleGroup) {
        self.groups.push(group);
    }

    /// 将扩展规则组置于现有规则之前
    pub fn prepend(&mut self, extension: RuleTable) {
        let mut groups = extension.groups;
        groups.append(&mut self.groups);
        self.groups = groups;
    }

    /// 只保留前 `len` 个规则组
    pub fn truncate(&mut self, len: usize) {
        self.groups.truncate(len);
    }

    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// 全部模式数量
    pub fn pattern_count(&self) -> usize {
        self.groups.iter().map(|g| g.patterns.len()).sum()
    }
}

impl From<Vec<RuleGroup>> for RuleTable {
    fn from(groups: Vec<RuleGroup>) -> Self {
        Self { groups }
    }
}

impl FromIterator<RuleGroup> for RuleTable {
    fn from_iter<T: IntoIterator<Item = RuleGroup>>(iter: T) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

/// 编译后的规则库（各维度规则表）
#[derive(Debug, Clone, Default)]
pub struct CompiledRuleLibrary {
    tables: HashMap<Category, RuleTable>,
}

impl CompiledRuleLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category, table: RuleTable) {
        self.tables.insert(category, table);
    }

    pub fn table(&self, category: Category) -> Option<&RuleTable> {
        self.tables.get(&category)
    }

    /// 合并扩展规则库：各维度扩展规则组前置，优先于现有规则
    pub fn extend(&mut self, extension: CompiledRuleLibrary) {
        for (category, table) in extension.tables {
            self.tables.entry(category).or_default().prepend(table);
        }
    }

    /// 链式合并
    pub fn extended(mut self, extension: CompiledRuleLibrary) -> Self {
        self.extend(extension);
        self
    }

    pub fn group_count(&self) -> usize {
        self.tables.values().map(RuleTable::len).sum()
    }

    pub fn pattern_count(&self) -> usize {
        self.tables.values().map(RuleTable::pattern_count).sum()
    }
}
