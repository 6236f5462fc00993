//! 全局配置管理,存储所有可配置项

use std::path::PathBuf;

/// 默认单次匹配回溯上限
pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;

/// 解析器配置
#[derive(Debug, Clone)]
pub struct ParserConfig {
    // 规则文件路径（None 时使用内置规则）
    pub rule_path: Option<PathBuf>,
    // 扩展规则文件，按顺序合并，后者优先级更高
    pub extension_paths: Vec<PathBuf>,
    // 规则正则是否忽略大小写
    pub case_insensitive: bool,
    // 单次匹配的回溯步数上限
    pub backtrack_limit: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            rule_path: None,
            extension_paths: Vec::new(),
            case_insensitive: true,
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
        }
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> ParserConfig {
        ParserConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: ParserConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    pub fn rule_path(mut self, path: PathBuf) -> Self {
        self.config.rule_path = Some(path);
        self
    }

    pub fn extension_path(mut self, path: PathBuf) -> Self {
        self.config.extension_paths.push(path);
        self
    }

    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.config.case_insensitive = case_insensitive;
        self
    }

    pub fn backtrack_limit(mut self, limit: usize) -> Self {
        self.config.backtrack_limit = limit;
        self
    }

    pub fn build(self) -> ParserConfig {
        self.config
    }
}
