//! 日志格式化工具
use std::fmt::{self, Write};

/// 空白折叠 + 截断的惰性预览，仅在日志实际输出时格式化
///
/// 连续空白折叠为单个空格，超过 `max_len` 个字符时以 `…` 结尾。
pub fn preview_compact(s: &str, max_len: usize) -> impl fmt::Display + '_ {
    CompactPreview { source: s, max_len }
}

struct CompactPreview<'a> {
    source: &'a str,
    max_len: usize,
}

impl fmt::Display for CompactPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut written = 0;
        let mut in_whitespace = false;

        for ch in self.source.chars() {
            let is_space = ch.is_whitespace();
            if is_space && in_whitespace {
                continue;
            }
            if written == self.max_len {
                return f.write_char('…');
            }
            f.write_char(if is_space { ' ' } else { ch })?;
            in_whitespace = is_space;
            written += 1;
        }
        Ok(())
    }
}
