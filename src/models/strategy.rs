//! 字段查找策略
//!
//! 策略是静态配置：按固定优先级依次尝试，第一个能解析出数值的策略胜出，
//! 之后的策略不再查询。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 需要从展开行中读取的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// 已开课次数
    Conducted,
    /// 出勤次数（可能是 `P-12/E-1/.../Total-13` 这样的复合文本）
    Attended,
}

impl Field {
    /// 页面上显示的标签文本
    pub fn label(self) -> &'static str {
        match self {
            Field::Conducted => "Conducted",
            Field::Attended => "Attended",
        }
    }

    /// 字段专属的元素 id 片段
    pub fn id_fragment(self) -> &'static str {
        match self {
            Field::Conducted => "lblClsCondID",
            Field::Attended => "lblClsAttID",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Conducted => f.write_str("conducted"),
            Field::Attended => f.write_str("attended"),
        }
    }
}

/// 一条具名查找规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    pub xpath: String,
}

impl Strategy {
    pub fn new(name: impl Into<String>, xpath: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            xpath: xpath.into(),
        }
    }

    /// 字段的默认策略链：
    /// 1. id 片段结构查找
    /// 2. 标签 → `strong/span` 子结构
    /// 3. 标签之后最近的 span（兼容缺少子结构的标记）
    /// 4. 可配置的兜底查询
    pub fn defaults_for(field: Field) -> Vec<Strategy> {
        let id_query = format!("//span[contains(@id, '{}')]", field.id_fragment());
        vec![
            Strategy::new("id-fragment", id_query.clone()),
            Strategy::new(
                "label-sibling",
                format!("//div[contains(text(), '{}')]/strong/span", field.label()),
            ),
            Strategy::new(
                "label-following",
                format!("//*[contains(text(), '{}')]/following::span[1]", field.label()),
            ),
            Strategy::new(CONFIGURED_STRATEGY, id_query),
        ]
    }
}

/// 可通过环境变量覆盖的兜底策略名
pub const CONFIGURED_STRATEGY: &str = "configured";

/// 两个字段各自的策略链
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyTable {
    pub conducted: Vec<Strategy>,
    pub attended: Vec<Strategy>,
}

impl StrategyTable {
    pub fn for_field(&self, field: Field) -> &[Strategy] {
        match field {
            Field::Conducted => &self.conducted,
            Field::Attended => &self.attended,
        }
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self {
            conducted: Strategy::defaults_for(Field::Conducted),
            attended: Strategy::defaults_for(Field::Attended),
        }
    }
}
