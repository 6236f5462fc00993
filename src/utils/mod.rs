//! 通用工具模块
pub mod log_format;
pub mod version;

pub use self::version::VersionExtractor;
