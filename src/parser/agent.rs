//! 结构化解析结果
//! 由各维度的 `FieldRecord` 转换而来，缺失字段保持为 `None`

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::mapper::{FieldRecord, field};

/// 设备类型取值
pub mod device_type {
    pub const MOBILE: &str = "mobile";
    pub const TABLET: &str = "tablet";
    pub const SMARTTV: &str = "smarttv";
    pub const CONSOLE: &str = "console";
    pub const WEARABLE: &str = "wearable";
    pub const EMBEDDED: &str = "embedded";
}

/// 浏览器
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Browser {
    pub name: Option<String>,
    pub version: Option<String>,
    /// 主版本号，由 `version` 推导
    pub major: Option<String>,
}

/// 渲染引擎
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// 操作系统
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Os {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// 设备
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub vendor: Option<String>,
    pub model: Option<String>,
    /// 设备类型，取值见 [`device_type`]
    #[serde(rename = "type")]
    pub device_type: Option<String>,
}

/// CPU 架构
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cpu {
    pub architecture: Option<String>,
}

/// 完整解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAgent {
    pub ua: String,
    pub browser: Browser,
    pub engine: Engine,
    pub os: Os,
    pub device: Device,
    pub cpu: Cpu,
}

impl From<FieldRecord> for Browser {
    fn from(mut record: FieldRecord) -> Self {
        Self {
            name: record.take(field::NAME),
            version: record.take(field::VERSION),
            major: record.take(field::MAJOR),
        }
    }
}

impl From<FieldRecord> for Engine {
    fn from(mut record: FieldRecord) -> Self {
        Self {
            name: record.take(field::NAME),
            version: record.take(field::VERSION),
        }
    }
}

impl From<FieldRecord> for Os {
    fn from(mut record: FieldRecord) -> Self {
        Self {
            name: record.take(field::NAME),
            version: record.take(field::VERSION),
        }
    }
}

impl From<FieldRecord> for Device {
    fn from(mut record: FieldRecord) -> Self {
        Self {
            vendor: record.take(field::VENDOR),
            model: record.take(field::MODEL),
            device_type: record.take(field::TYPE),
        }
    }
}

impl From<FieldRecord> for Cpu {
    fn from(mut record: FieldRecord) -> Self {
        Self {
            architecture: record.take(field::ARCHITECTURE),
        }
    }
}

/// 以空格拼接存在的字段，全部缺失时输出 `-`
fn write_parts(f: &mut fmt::Formatter<'_>, parts: &[&Option<String>]) -> fmt::Result {
    let mut present = parts.iter().filter_map(|p| p.as_deref()).peekable();
    if present.peek().is_none() {
        return f.write_str("-");
    }
    for (index, part) in present.enumerate() {
        if index > 0 {
            f.write_str(" ")?;
        }
        f.write_str(part)?;
    }
    Ok(())
}

impl Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_parts(f, &[&self.name, &self.version])
    }
}

impl Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_parts(f, &[&self.name, &self.version])
    }
}

impl Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_parts(f, &[&self.name, &self.version])
    }
}

impl Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_parts(f, &[&self.vendor, &self.model])?;
        if let Some(device_type) = &self.device_type {
            write!(f, " ({device_type})")?;
        }
        Ok(())
    }
}

impl Display for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_parts(f, &[&self.architecture])
    }
}

impl Display for ParsedAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "browser: {} | engine: {} | os: {} | device: {} | cpu: {}",
            self.browser, self.engine, self.os, self.device, self.cpu
        )
    }
}
