//! 规则加载器
//! 内置规则通过 include_str! 嵌入，可选从文件加载并合并扩展规则

use std::path::Path;
use std::time::Instant;
use tracing::debug;

use super::model::RuleLibrary;
use crate::config::ParserConfig;
use crate::error::{UaParserError, UaResult};

/// 内置规则数据
const EMBEDDED_RULES: &str = include_str!("../../data/default_rules.json");

/// 规则加载器
pub struct RuleLoader;

impl RuleLoader {
    /// 按配置加载规则库（基础规则 + 扩展规则）
    pub fn load(config: &ParserConfig) -> UaResult<RuleLibrary> {
        let start = Instant::now();

        let mut rule_lib = match &config.rule_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_embedded()?,
        };

        for path in &config.extension_paths {
            let extension = Self::load_from_file(path)?;
            debug!(
                "合并扩展规则：{}，规则组数：{}",
                path.display(),
                extension.group_count()
            );
            rule_lib.extend(extension);
        }

        debug!(
            "规则加载完成，规则组数：{}，映射表数：{}，耗时{:?}",
            rule_lib.group_count(),
            rule_lib.maps.len(),
            start.elapsed()
        );
        Ok(rule_lib)
    }

    /// 加载内置规则
    pub fn load_embedded() -> UaResult<RuleLibrary> {
        Self::load_from_str(EMBEDDED_RULES)
            .map_err(|e| UaParserError::RuleLoadError(format!("内置规则：{}", e)))
    }

    /// 从本地文件加载规则
    pub fn load_from_file(path: &Path) -> UaResult<RuleLibrary> {
        if !path.is_file() {
            return Err(UaParserError::RuleLoadError(format!(
                "规则文件不存在：{}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content)
            .map_err(|e| UaParserError::RuleParseError(format!("{}: {}", path.display(), e)))
    }

    /// 从 JSON 字符串解析规则
    pub fn load_from_str(json: &str) -> UaResult<RuleLibrary> {
        let rule_lib: RuleLibrary = serde_json::from_str(json)?;
        Ok(rule_lib)
    }
}
