//! 解析模块：UA 解析入口与结构化结果
pub mod agent;
pub mod parser;
pub mod global;

// 导出核心接口
pub use self::agent::{Browser, Engine, Os, Device, Cpu, ParsedAgent, device_type};
pub use self::parser::UaParser;
pub use self::global::{init_default_parser, init_parser_with_config, parse, parse_bytes};
