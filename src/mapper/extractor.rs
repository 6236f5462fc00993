//! 规则引擎：有序规则表匹配 + 捕获分组字段提取
//!
//! 规则组自上而下、组内模式自上而下依次尝试，首个命中的模式终止整张表的遍历。
//! 命中后按字段定义顺序消耗捕获槽位：第 i 个字段读取第 i 个捕获分组，
//! 与该字段是否使用捕获值无关。

use std::borrow::Cow;
use tracing::{trace, warn};

use super::record::FieldRecord;
use crate::compiler::{CompiledPattern, RuleGroup, RuleTable, Transform};
use crate::utils::log_format::preview_compact;

/// 日志中输入预览的最大长度
const INPUT_PREVIEW_LEN: usize = 80;

/// 规则引擎
pub struct RuleEngine;

impl RuleEngine {
    /// 以规则表匹配输入，将命中规则组的字段写入 `record`
    ///
    /// 输入缺失、为空或无任何模式命中时 `record` 保持不变。
    /// 模式运行期失败（如回溯超限）记录告警并视为未命中。
    pub fn extract(record: &mut FieldRecord, input: Option<&str>, table: &RuleTable) {
        let Some(input) = input.filter(|s| !s.is_empty()) else {
            return;
        };

        for (group_index, group) in table.groups().iter().enumerate() {
            for pattern in group.patterns() {
                let captures = match pattern.captures(input) {
                    Ok(Some(captures)) => captures,
                    Ok(None) => continue,
                    Err(e) => {
                        warn!(
                            "模式执行失败，按未命中处理：规则={}，输入={}，错误={}",
                            pattern.source(),
                            preview_compact(input, INPUT_PREVIEW_LEN),
                            e
                        );
                        continue;
                    }
                };

                trace!(
                    "匹配成功：规则组={}，规则={}，输入={}",
                    group_index,
                    pattern.source(),
                    preview_compact(input, INPUT_PREVIEW_LEN)
                );

                let slots: Vec<Option<&str>> = (1..=group.fields().len())
                    .map(|index| captures.get(index).map(|m| m.as_str()))
                    .collect();
                Self::assign(record, group, &slots);
                return;
            }
        }
    }

    /// 按字段顺序写入捕获槽位的转换结果
    fn assign(record: &mut FieldRecord, group: &RuleGroup, slots: &[Option<&str>]) {
        for (spec, captured) in group.fields().iter().zip(slots) {
            record.set(spec.name(), spec.transform().apply(*captured));
        }
    }
}

impl Transform {
    /// 将捕获值（可能缺失）转换为字段值
    pub fn apply(&self, captured: Option<&str>) -> Option<String> {
        let present = captured.filter(|s| !s.is_empty());
        match self {
            Transform::Identity => present.map(str::to_string),
            Transform::Constant(value) => Some(value.clone()),
            Transform::ConstantFn(func) => func(captured),
            Transform::Replace { pattern, replacement } => {
                present.map(|s| Self::replace(pattern, replacement, s).into_owned())
            }
            Transform::ReplaceFn { pattern, replacement, func } => {
                present.and_then(|s| {
                    let replaced = Self::replace(pattern, replacement, s);
                    func(Some(&*replaced))
                })
            }
            Transform::ComputeFn { func, extra } => present.and_then(|s| func(s, &**extra)),
        }
    }

    /// 替换失败时保留原值
    fn replace<'t>(
        pattern: &CompiledPattern,
        replacement: &str,
        input: &'t str,
    ) -> Cow<'t, str> {
        match pattern.replace_all(input, replacement) {
            Ok(replaced) => replaced,
            Err(e) => {
                warn!("替换执行失败，保留原值：规则={}，错误={}", pattern.source(), e);
                Cow::Borrowed(input)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::compiler::{FieldSpec, RuleCompiler};
    use crate::config::ConfigManager;
    use crate::mapper::{Category, ValueMap, field, normalize, UNKNOWN};

    const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/90.0.4430.212 Safari/537.36";

    fn compiler() -> RuleCompiler {
        RuleCompiler::default()
    }

    fn browser_table() -> RuleTable {
        let c = compiler();
        RuleTable::from(vec![
            c.compile_group(
                &[r"(opera\smini)/([\w\.-]+)"],
                vec![FieldSpec::identity(field::NAME), FieldSpec::identity(field::VERSION)],
            )
            .unwrap(),
            c.compile_group(
                &[r"(chrome|omniweb|arora|[tizenoka]{5}\s?browser)/v?([\w\.]+)"],
                vec![FieldSpec::identity(field::NAME), FieldSpec::identity(field::VERSION)],
            )
            .unwrap(),
            c.compile_group(
                &[r"version/([\w\.]+).+?(mobile\s?safari|safari)"],
                vec![FieldSpec::identity(field::VERSION), FieldSpec::identity(field::NAME)],
            )
            .unwrap(),
            c.compile_group(
                &[r"(webkit|khtml)/([\w\.]+)"],
                vec![FieldSpec::identity(field::NAME), FieldSpec::identity(field::VERSION)],
            )
            .unwrap(),
        ])
    }

    fn run(input: Option<&str>, table: &RuleTable) -> FieldRecord {
        let mut record = Category::Browser.empty_record();
        RuleEngine::extract(&mut record, input, table);
        record
    }

    #[test]
    fn test_extract_chrome_name_and_version() {
        let record = run(Some(CHROME_UA), &browser_table());
        assert_eq!(record.get(field::NAME), Some("Chrome"));
        assert_eq!(record.get(field::VERSION), Some("90.0.4430.212"));
    }

    #[test]
    fn test_no_match_leaves_record_absent() {
        let record = run(Some("curl/8.0.1"), &browser_table());
        assert_eq!(record, Category::Browser.empty_record());
    }

    #[test]
    fn test_empty_and_missing_input() {
        let table = browser_table();
        assert!(run(Some(""), &table).is_empty());
        assert!(run(None, &table).is_empty());

        // 能匹配空串的模式也不会被执行
        let c = compiler();
        let greedy = RuleTable::from(vec![
            c.compile_group(&[r"(\w*)"], vec![FieldSpec::constant(field::NAME, "any")]).unwrap(),
        ]);
        assert!(run(Some(""), &greedy).is_empty());
    }

    #[test]
    fn test_extract_is_deterministic() {
        let table = browser_table();
        let first = run(Some(CHROME_UA), &table);
        let second = run(Some(CHROME_UA), &table);
        assert_eq!(first, second);
    }

    #[test]
    fn test_first_matching_group_wins() {
        let table = browser_table();
        // Chrome 与 WebKit 规则组都能命中
        let full = run(Some(CHROME_UA), &table);

        let mut truncated = table.clone();
        truncated.truncate(2);
        assert_eq!(full, run(Some(CHROME_UA), &truncated));
        assert_eq!(full.get(field::NAME), Some("Chrome"));
    }

    #[test]
    fn test_first_matching_pattern_in_group_wins() {
        let c = compiler();
        let table = RuleTable::from(vec![
            c.compile_group(
                &[r"(never-matches)", r"(applewebkit)", r"(chrome)"],
                vec![FieldSpec::identity(field::NAME)],
            )
            .unwrap(),
        ]);
        assert_eq!(run(Some(CHROME_UA), &table).get(field::NAME), Some("AppleWebKit"));
    }

    #[test]
    fn test_constant_consumes_capture_slot() {
        let c = compiler();
        let build = |value: &str| {
            RuleTable::from(vec![
                c.compile_group(
                    &[r"(opera\smini)/([\w\.-]+)"],
                    vec![FieldSpec::constant(field::NAME, value), FieldSpec::identity(field::VERSION)],
                )
                .unwrap(),
            ])
        };

        let record = run(Some("Opera Mini/60.0"), &build("Opera Mini"));
        assert_eq!(record.get(field::NAME), Some("Opera Mini"));
        assert_eq!(record.get(field::VERSION), Some("60.0"));

        // 常量取值变化不影响后续字段读取的槽位
        let record = run(Some("Opera Mini/60.0"), &build("Something Else"));
        assert_eq!(record.get(field::NAME), Some("Something Else"));
        assert_eq!(record.get(field::VERSION), Some("60.0"));
    }

    #[test]
    fn test_fields_beyond_captures_are_absent() {
        let c = compiler();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let table = RuleTable::from(vec![
            c.compile_group(
                &[r"(sailfish)"],
                vec![
                    FieldSpec::identity(field::NAME),
                    FieldSpec::identity(field::VERSION),
                    FieldSpec::constant("vendor", "Jolla"),
                    FieldSpec::constant_fn("model", move |captured| {
                        seen.fetch_add(1, Ordering::SeqCst);
                        Some(captured.unwrap_or("none").to_string())
                    }),
                ],
            )
            .unwrap(),
        ]);

        let record = run(Some("Mozilla/5.0 (Linux; U; Sailfish 3.0)"), &table);
        assert_eq!(record.get(field::NAME), Some("Sailfish"));
        assert_eq!(record.get(field::VERSION), None);
        assert_eq!(record.get("vendor"), Some("Jolla"));
        // 固定函数在捕获缺失时仍被调用
        assert_eq!(record.get("model"), Some("none"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unmatched_optional_group_is_absent() {
        let c = compiler();
        let table = RuleTable::from(vec![
            c.compile_group(
                &[r"(mint)[/\s\(]?(\w+)*"],
                vec![FieldSpec::identity(field::NAME), FieldSpec::identity(field::VERSION)],
            )
            .unwrap(),
        ]);
        let record = run(Some("X11; Mint;"), &table);
        assert_eq!(record.get(field::NAME), Some("Mint"));
        assert_eq!(record.get(field::VERSION), None);
    }

    #[test]
    fn test_compute_normalizes_windows_version() {
        let c = compiler();
        let versions = Arc::new(
            ValueMap::new()
                .with("XP", ["NT 5.1", "NT 5.2"])
                .with("10", ["NT 6.4", "NT 10.0"]),
        );
        let table = RuleTable::from(vec![
            c.compile_group(
                &[r"(windows\smobile|windows)[\s/]?([ntce\d\.\s]+\w)"],
                vec![
                    FieldSpec::identity(field::NAME),
                    FieldSpec::compute(field::VERSION, normalize, versions),
                ],
            )
            .unwrap(),
        ]);

        let mut record = Category::Os.empty_record();
        RuleEngine::extract(&mut record, Some(CHROME_UA), &table);
        assert_eq!(record.get(field::NAME), Some("Windows"));
        assert_eq!(record.get(field::VERSION), Some("10"));
    }

    #[test]
    fn test_compute_sentinel_reports_absent() {
        let c = compiler();
        let versions = Arc::new(
            ValueMap::new()
                .with("1.0", ["/8"])
                .with("2.0", ["/412"])
                .with(UNKNOWN, ["/"]),
        );
        let table = RuleTable::from(vec![
            c.compile_group(
                &[r"webkit.+?(mobile\s?safari|safari)(/[\w\.]+)"],
                vec![
                    FieldSpec::identity(field::NAME),
                    FieldSpec::compute(field::VERSION, normalize, versions),
                ],
            )
            .unwrap(),
        ]);

        let record = run(Some("Mozilla/5.0 (Macintosh) AppleWebKit/999 Safari/999"), &table);
        assert_eq!(record.get(field::NAME), Some("Safari"));
        assert_eq!(record.get(field::VERSION), None);
    }

    #[test]
    fn test_replace_transforms() {
        let c = compiler();
        let table = RuleTable::from(vec![
            c.compile_group(
                &[r"(comodo_dragon)/([\w\.]+)"],
                vec![
                    FieldSpec::replace(field::NAME, c.compile_replace_pattern("_").unwrap(), " "),
                    FieldSpec::identity(field::VERSION),
                ],
            )
            .unwrap(),
            c.compile_group(
                &[r"\swv\).+(chrome)/([\w\.]+)"],
                vec![
                    FieldSpec::replace(field::NAME, c.compile_replace_pattern("(.+)").unwrap(), "$1 WebView"),
                    FieldSpec::identity(field::VERSION),
                ],
            )
            .unwrap(),
        ]);

        let record = run(Some("Mozilla/5.0 Comodo_Dragon/16.1.1.0"), &table);
        assert_eq!(record.get(field::NAME), Some("Comodo Dragon"));
        assert_eq!(record.get(field::VERSION), Some("16.1.1.0"));

        let record = run(
            Some("Mozilla/5.0 (Linux; Android 10; K; wv) AppleWebKit/537.36 Chrome/89.0.4389.105 Mobile"),
            &table,
        );
        assert_eq!(record.get(field::NAME), Some("Chrome WebView"));
    }

    #[test]
    fn test_replace_fn_transform() {
        let c = compiler();
        let lowercase: crate::compiler::ValueFn = Arc::new(|s: Option<&str>| s.map(str::to_lowercase));
        let table = RuleTable::from(vec![
            c.compile_group(
                &[r"((?:ppc|powerpc)(?:64)?)(?: mac|;|\))"],
                vec![FieldSpec::new(
                    field::ARCHITECTURE,
                    Transform::ReplaceFn {
                        pattern: c.compile_replace_pattern("ower").unwrap(),
                        replacement: String::new(),
                        func: lowercase,
                    },
                )],
            )
            .unwrap(),
        ]);

        let mut record = Category::Cpu.empty_record();
        RuleEngine::extract(&mut record, Some("Mozilla/4.0 (compatible; PowerPC Mac)"), &table);
        assert_eq!(record.get(field::ARCHITECTURE), Some("ppc"));
    }

    #[test]
    fn test_transform_apply_on_absent_capture() {
        let c = compiler();
        let pattern = c.compile_replace_pattern("_").unwrap();
        let map = Arc::new(ValueMap::new().with("x", ["y"]));

        assert_eq!(Transform::Identity.apply(None), None);
        assert_eq!(Transform::Identity.apply(Some("")), None);
        assert_eq!(Transform::Constant("c".into()).apply(None), Some("c".to_string()));
        assert_eq!(
            Transform::Replace { pattern: pattern.clone(), replacement: ".".into() }.apply(Some("")),
            None
        );
        assert_eq!(
            Transform::Replace { pattern, replacement: ".".into() }.apply(Some("14_6")),
            Some("14.6".to_string())
        );
        let compute = FieldSpec::compute("v", normalize, map);
        assert_eq!(compute.transform().apply(None), None);
        assert_eq!(compute.transform().apply(Some("y")), Some("x".to_string()));
    }

    #[test]
    fn test_backtrack_limit_treated_as_no_match() {
        let config = ConfigManager::custom().backtrack_limit(10).build();
        let c = RuleCompiler::new(&config);
        let table = RuleTable::from(vec![
            // 反向引用迫使回溯执行
            c.compile_group(&[r"(a+)+\1b"], vec![FieldSpec::identity(field::NAME)]).unwrap(),
            c.compile_group(&[r"(a)"], vec![FieldSpec::constant(field::NAME, "fallback")]).unwrap(),
        ]);

        let record = run(Some("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaac"), &table);
        assert_eq!(record.get(field::NAME), Some("fallback"));
    }

    #[test]
    fn test_record_fields_outside_preset_are_added() {
        let c = compiler();
        let table = RuleTable::from(vec![
            c.compile_group(&[r"(bot)"], vec![FieldSpec::identity("crawler")]).unwrap(),
        ]);
        let record = run(Some("SomeBot"), &table);
        assert_eq!(record.get("crawler"), Some("Bot"));
        assert_eq!(record.get(field::NAME), None);
    }
}
