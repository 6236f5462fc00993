//! 规则模块：负责规则源的加载、合并、数据模型定义
pub mod model;
pub mod loader;

// 导出核心接口
pub use self::model::{RuleLibrary, RuleGroupSource, FieldSource, TransformSource};
pub use self::loader::RuleLoader;
