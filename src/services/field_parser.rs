//! 字段文本解析 - 业务能力层
//!
//! 把门户上格式不统一的文本转换成整数，不涉及任何浏览器交互。
//!
//! 语法：
//! - 数字串：`\d+`
//! - 纯数字文本：去掉首尾空白后全部是数字
//! - 标记前缀：`Total-` / `Total=` 之后的第一个数字串

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Field;

static DIGIT_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("digit run regex is valid"));

/// 复合出勤文本中的合计标记，按优先级排列
const TOTAL_MARKERS: [&str; 2] = ["Total-", "Total="];

/// 按字段选择解析规则
pub fn parse_field(field: Field, text: &str) -> Option<u32> {
    match field {
        Field::Conducted => parse_conducted(text),
        Field::Attended => parse_attended(text),
    }
}

/// 解析"已开课次数"
///
/// 纯数字直接解析，否则取第一个数字串（如 `Conducted: 34 classes` → 34）。
pub fn parse_conducted(text: &str) -> Option<u32> {
    let text = text.trim();
    if is_numeric(text) {
        return text.parse().ok();
    }
    first_digit_run(text)
}

/// 解析"出勤次数"
///
/// 文本通常形如 `P-12/E-1/L-0/MCR-0/R-0/Total-13`。优先级：
/// 1. `Total-` 之后的数字串
/// 2. `Total=` 之后的数字串
/// 3. 纯数字
/// 4. 最后一个数字串（经验规则：合计通常列在最后，格式变化时不保证正确）
///
/// 出现合计标记但标记后没有数字时视为无法解析。
pub fn parse_attended(text: &str) -> Option<u32> {
    let text = text.trim();
    for marker in TOTAL_MARKERS {
        if let Some((_, rest)) = text.split_once(marker) {
            return first_digit_run(rest);
        }
    }
    if is_numeric(text) {
        return text.parse().ok();
    }
    last_digit_run(text)
}

fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

fn first_digit_run(text: &str) -> Option<u32> {
    DIGIT_RUN_RE.find(text)?.as_str().parse().ok()
}

fn last_digit_run(text: &str) -> Option<u32> {
    DIGIT_RUN_RE.find_iter(text).last()?.as_str().parse().ok()
}
