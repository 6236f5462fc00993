//! rsuaparser - 基于有序正则规则表的 User-Agent 解析库

// 导出全局错误类型
pub use self::error::{UaParserError, UaResult};

// 导出配置模块
pub use self::config::{ParserConfig, ConfigManager, CustomConfigBuilder, DEFAULT_BACKTRACK_LIMIT};

// 导出规则模块核心接口
pub use self::rule::{RuleLibrary, RuleGroupSource, FieldSource, TransformSource, RuleLoader};

// 导出编译模块核心接口
pub use self::compiler::{
    CompiledPattern, CompiledRuleLibrary, FieldSpec, FnRegistry, RuleCompiler, RuleGroup,
    RuleTable, Transform, ValueFn, ComputeFn,
};

// 导出匹配模块核心接口
pub use self::mapper::{Category, FieldRecord, RuleEngine, ValueMap, normalize, UNKNOWN};

// 导出工具模块核心接口
pub use self::utils::VersionExtractor;

// 导出解析模块核心接口
pub use self::parser::{
    Browser, Engine, Os, Device, Cpu, ParsedAgent, UaParser, device_type,
    init_default_parser, init_parser_with_config, parse, parse_bytes,
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod compiler;
pub mod mapper;
pub mod utils;
pub mod parser;
