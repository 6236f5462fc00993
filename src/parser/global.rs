//! 全局解析器单例管理
//! 默认规则库在首次使用时编译，之后所有调用共享同一份只读规则
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::debug;

use super::agent::ParsedAgent;
use super::parser::UaParser;
use crate::compiler::CompiledRuleLibrary;
use crate::config::{ConfigManager, ParserConfig};
use crate::error::UaResult;

/// 全局规则库实例
static GLOBAL_LIBRARY: OnceCell<Arc<CompiledRuleLibrary>> = OnceCell::new();

/// 初始化全局解析器（默认配置）
pub fn init_default_parser() -> UaResult<()> {
    init_parser_with_config(ConfigManager::get_default())
}

/// 带自定义配置初始化全局解析器，已初始化时不做任何事
pub fn init_parser_with_config(config: ParserConfig) -> UaResult<()> {
    GLOBAL_LIBRARY.get_or_try_init(|| build(&config))?;
    Ok(())
}

/// 以全局规则库解析 UA，未初始化时按默认配置初始化
pub fn parse(ua: &str) -> UaResult<ParsedAgent> {
    Ok(global_parser()?.with_ua(ua).result())
}

/// 解析原始字节形式的 UA（如 HTTP 头原值），非法 UTF-8 按替换字符处理
pub fn parse_bytes(ua: &[u8]) -> UaResult<ParsedAgent> {
    parse(&String::from_utf8_lossy(ua))
}

/// 获取共享全局规则库的解析器
pub(crate) fn global_parser() -> UaResult<UaParser> {
    let library = GLOBAL_LIBRARY.get_or_try_init(|| build(&ConfigManager::get_default()))?;
    Ok(UaParser::with_library(Arc::clone(library)))
}

fn build(config: &ParserConfig) -> UaResult<Arc<CompiledRuleLibrary>> {
    debug!("初始化全局规则库");
    UaParser::build_library(config).map(Arc::new)
}
