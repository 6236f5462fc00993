//! 转换函数注册表
//! 规则数据通过名称引用函数，编译时解析为闭包

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::mapper::{ValueMap, normalize};

/// 单值函数：输入捕获值（可能缺失），输出字段值
pub type ValueFn = Arc<dyn Fn(Option<&str>) -> Option<String> + Send + Sync>;

/// 计算函数：输入捕获值与附加映射表
pub type ComputeFn = Arc<dyn Fn(&str, &ValueMap) -> Option<String> + Send + Sync>;

/// 默认计算函数名
pub const NORMALIZE: &str = "normalize";

/// 函数注册表
#[derive(Clone)]
pub struct FnRegistry {
    value_fns: HashMap<String, ValueFn>,
    compute_fns: HashMap<String, ComputeFn>,
}

impl Default for FnRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_value_fn("lowercase", |s| s.map(str::to_lowercase));
        registry.register_value_fn("uppercase", |s| s.map(str::to_uppercase));
        registry.register_value_fn("trim", |s| s.map(|v| v.trim().to_string()));
        registry.register_compute_fn(NORMALIZE, normalize);
        registry
    }
}

impl fmt::Debug for FnRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value_fns: Vec<&str> = self.value_fns.keys().map(String::as_str).collect();
        let mut compute_fns: Vec<&str> = self.compute_fns.keys().map(String::as_str).collect();
        value_fns.sort_unstable();
        compute_fns.sort_unstable();
        f.debug_struct("FnRegistry")
            .field("value_fns", &value_fns)
            .field("compute_fns", &compute_fns)
            .finish()
    }
}

impl FnRegistry {
    /// 不含内置函数的注册表
    pub fn empty() -> Self {
        Self {
            value_fns: HashMap::new(),
            compute_fns: HashMap::new(),
        }
    }

    pub fn register_value_fn<F>(&mut self, name: &str, func: F) -> &mut Self
    where
        F: Fn(Option<&str>) -> Option<String> + Send + Sync + 'static,
    {
        self.value_fns.insert(name.to_string(), Arc::new(func));
        self
    }

    pub fn register_compute_fn<F>(&mut self, name: &str, func: F) -> &mut Self
    where
        F: Fn(&str, &ValueMap) -> Option<String> + Send + Sync + 'static,
    {
        self.compute_fns.insert(name.to_string(), Arc::new(func));
        self
    }

    pub fn value_fn(&self, name: &str) -> Option<ValueFn> {
        self.value_fns.get(name).cloned()
    }

    pub fn compute_fn(&self, name: &str) -> Option<ComputeFn> {
        self.compute_fns.get(name).cloned()
    }
}
