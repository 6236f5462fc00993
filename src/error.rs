//! 全局错误类型定义
//! 所有错误都发生在规则加载/编译阶段，解析阶段不产生错误

use thiserror::Error;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;

#[derive(Error, Debug)]
pub enum UaParserError {
    // 规则相关错误
    #[error("规则加载失败：{0}")]
    RuleLoadError(String),
    #[error("规则解析失败：{0}")]
    RuleParseError(String),
    #[error("无效规则：{0}")]
    InvalidRule(String),

    // 编译相关错误
    #[error("正则编译失败：{pattern}，错误：{source}")]
    RegexCompileError {
        pattern: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },
    #[error("未知转换函数：{0}")]
    UnknownFunction(String),
    #[error("未知映射表：{0}")]
    UnknownValueMap(String),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
}

impl UaParserError {
    /// 正则编译失败时携带原始模式，便于定位规则作者的错误
    pub(crate) fn regex(pattern: &str, source: fancy_regex::Error) -> Self {
        Self::RegexCompileError {
            pattern: pattern.to_string(),
            source: Box::new(source),
        }
    }
}

// 全局Result类型
pub type UaResult<T> = Result<T, UaParserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = UaParserError::RuleLoadError("rules.json".to_string());
        assert_eq!(err.to_string(), "规则加载失败：rules.json");

        let err = UaParserError::UnknownValueMap("os.windows.version".to_string());
        assert_eq!(err.to_string(), "未知映射表：os.windows.version");

        let source = fancy_regex::Regex::new("(chrome").unwrap_err();
        let err = UaParserError::regex("(chrome", source);
        assert!(err.to_string().starts_with("正则编译失败：(chrome，错误："));
        assert!(std::error::Error::source(&err).is_some());
    }
}
