//! 匹配模块：规则表匹配、字段提取与取值归一化
pub mod record;
pub mod normalizer;
pub mod extractor;

// 导出核心接口
pub use self::record::{Category, FieldRecord, field};
pub use self::normalizer::{ValueMap, normalize, UNKNOWN};
pub use self::extractor::RuleEngine;
