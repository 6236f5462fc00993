//! 编译模块：将规则源编译为可执行的规则表
pub mod pattern;
pub mod functions;
pub mod compiler;

pub use self::pattern::{
    CompiledPattern, Transform, FieldSpec, RuleGroup, RuleTable, CompiledRuleLibrary
};
pub use self::functions::{FnRegistry, ValueFn, ComputeFn};
pub use self::compiler::RuleCompiler;
