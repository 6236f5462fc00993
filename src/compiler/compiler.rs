//! 规则编译器核心
//! 将规则源编译为可执行规则表，任何规则错误在此阶段直接失败

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use fancy_regex::RegexBuilder;
use tracing::debug;

use super::functions::FnRegistry;
use super::pattern::{CompiledPattern, CompiledRuleLibrary, FieldSpec, RuleGroup, RuleTable, Transform};
use crate::config::ParserConfig;
use crate::error::{UaParserError, UaResult};
use crate::mapper::{Category, ValueMap};
use crate::rule::{FieldSource, RuleGroupSource, RuleLibrary, TransformSource};

/// 规则编译器
#[derive(Debug, Clone)]
pub struct RuleCompiler {
    case_insensitive: bool,
    backtrack_limit: usize,
    registry: FnRegistry,
}

impl Default for RuleCompiler {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

impl RuleCompiler {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            case_insensitive: config.case_insensitive,
            backtrack_limit: config.backtrack_limit,
            registry: FnRegistry::default(),
        }
    }

    /// 使用自定义函数注册表
    pub fn with_registry(mut self, registry: FnRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &FnRegistry {
        &self.registry
    }

    /// 编译规则库
    pub fn compile(&self, rule_lib: &RuleLibrary) -> UaResult<CompiledRuleLibrary> {
        let start = Instant::now();

        // 1. 映射表共享给所有引用它的字段
        let maps: HashMap<&str, Arc<ValueMap>> = rule_lib
            .maps
            .iter()
            .map(|(name, map)| (name.as_str(), Arc::new(map.clone())))
            .collect();

        // 2. 逐维度编译
        let mut compiled = CompiledRuleLibrary::new();
        for category in Category::ALL {
            let table = rule_lib
                .groups(category)
                .iter()
                .enumerate()
                .map(|(index, group)| {
                    self.compile_source_group(category, group, &maps)
                        .map_err(|e| Self::with_location(e, category, index))
                })
                .collect::<UaResult<RuleTable>>()?;

            debug!(
                "📊 {} 规则编译完成：规则组{}个、模式{}条",
                category,
                table.len(),
                table.pattern_count()
            );
            compiled.insert(category, table);
        }

        debug!("✅ 规则编译完成，总耗时{:?}", start.elapsed());
        Ok(compiled)
    }

    /// 编译单个匹配模式（按配置追加忽略大小写标志）
    pub fn compile_pattern(&self, raw_pattern: &str) -> UaResult<CompiledPattern> {
        let pattern = if self.case_insensitive {
            format!("(?i){}", raw_pattern)
        } else {
            raw_pattern.to_string()
        };
        self.build(raw_pattern, &pattern)
    }

    /// 编译替换用模式（始终区分大小写）
    pub fn compile_replace_pattern(&self, raw_pattern: &str) -> UaResult<CompiledPattern> {
        self.build(raw_pattern, raw_pattern)
    }

    /// 以代码方式构建规则组
    pub fn compile_group(&self, patterns: &[&str], fields: Vec<FieldSpec>) -> UaResult<RuleGroup> {
        if patterns.is_empty() {
            return Err(UaParserError::InvalidRule("规则组未包含任何模式".to_string()));
        }
        let patterns = patterns
            .iter()
            .map(|p| self.compile_pattern(p))
            .collect::<UaResult<Vec<_>>>()?;
        Ok(RuleGroup::new(patterns, fields))
    }

    fn build(&self, raw_pattern: &str, pattern: &str) -> UaResult<CompiledPattern> {
        let regex = RegexBuilder::new(pattern)
            .backtrack_limit(self.backtrack_limit)
            .build()
            .map_err(|e| UaParserError::regex(raw_pattern, e))?;
        Ok(CompiledPattern::new(regex, raw_pattern))
    }

    /// 编译规则源中的单个规则组
    fn compile_source_group(
        &self,
        category: Category,
        group: &RuleGroupSource,
        maps: &HashMap<&str, Arc<ValueMap>>,
    ) -> UaResult<RuleGroup> {
        let allowed = category.fields();
        let fields = group
            .fields
            .iter()
            .map(|field| {
                if !allowed.contains(&field.field()) {
                    return Err(UaParserError::InvalidRule(format!(
                        "字段 `{}` 不属于 {} 维度（可用字段：{:?}）",
                        field.field(),
                        category,
                        allowed
                    )));
                }
                self.compile_field(field, maps)
            })
            .collect::<UaResult<Vec<_>>>()?;

        let patterns: Vec<&str> = group.patterns.iter().map(String::as_str).collect();
        self.compile_group(&patterns, fields)
    }

    /// 编译字段定义
    fn compile_field(
        &self,
        field: &FieldSource,
        maps: &HashMap<&str, Arc<ValueMap>>,
    ) -> UaResult<FieldSpec> {
        let spec = match field {
            FieldSource::Name(name) => FieldSpec::identity(name.as_str()),
            FieldSource::Spec(TransformSource::Identity { field }) => FieldSpec::identity(field.as_str()),
            FieldSource::Spec(TransformSource::Constant { field, value }) => {
                FieldSpec::constant(field.as_str(), value.as_str())
            }
            FieldSource::Spec(TransformSource::ConstantFn { field, func }) => {
                FieldSpec::new(field.as_str(), Transform::ConstantFn(self.value_fn(func)?))
            }
            FieldSource::Spec(TransformSource::Replace { field, pattern, replacement }) => {
                FieldSpec::replace(
                    field.as_str(),
                    self.compile_replace_pattern(pattern)?,
                    replacement.as_str(),
                )
            }
            FieldSource::Spec(TransformSource::ReplaceFn { field, pattern, replacement, func }) => {
                FieldSpec::new(
                    field.as_str(),
                    Transform::ReplaceFn {
                        pattern: self.compile_replace_pattern(pattern)?,
                        replacement: replacement.clone(),
                        func: self.value_fn(func)?,
                    },
                )
            }
            FieldSource::Spec(TransformSource::Compute { field, map, func }) => {
                let extra = maps
                    .get(map.as_str())
                    .cloned()
                    .ok_or_else(|| UaParserError::UnknownValueMap(map.clone()))?;
                let func = self
                    .registry
                    .compute_fn(func)
                    .ok_or_else(|| UaParserError::UnknownFunction(func.clone()))?;
                FieldSpec::new(field.as_str(), Transform::ComputeFn { func, extra })
            }
        };
        Ok(spec)
    }

    fn value_fn(&self, name: &str) -> UaResult<super::functions::ValueFn> {
        self.registry
            .value_fn(name)
            .ok_or_else(|| UaParserError::UnknownFunction(name.to_string()))
    }

    /// 为规则错误补充维度与规则组位置
    fn with_location(err: UaParserError, category: Category, index: usize) -> UaParserError {
        match err {
            UaParserError::InvalidRule(msg) => {
                UaParserError::InvalidRule(format!("{}[{}]: {}", category, index, msg))
            }
            other => other,
        }
    }
}
