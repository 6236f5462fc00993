//! 主版本号提取
use once_cell::sync::Lazy;
use regex::Regex;

/// 跳过前导非数字字符后的首段连续数字
static MAJOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\D*(\d+)").unwrap());

/// 版本号工具类
pub struct VersionExtractor;

impl VersionExtractor {
    /// 由完整版本号推导主版本号
    ///
    /// - `"90.0.4430.212"` → `"90"`
    /// - `"v2.5"` → `"2"`
    /// - 版本缺失或不含数字 → `None`
    pub fn major(version: Option<&str>) -> Option<String> {
        let version = version?;
        MAJOR_RE
            .captures(version)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}
