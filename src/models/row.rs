//! 科目行上下文
//!
//! 封装"我正在处理第几个科目、它在页面上是哪个元素"

use std::fmt::Display;

/// 一个已发现的科目行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCtx {
    /// 科目序号（按发现顺序，从1开始）
    pub subject_index: usize,
    /// 发现时固定下来的行元素锚点 XPath
    pub anchor: String,
}

impl RowCtx {
    pub fn new(subject_index: usize, anchor: impl Into<String>) -> Self {
        Self {
            subject_index,
            anchor: anchor.into(),
        }
    }
}

impl Display for RowCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[科目 #{}]", self.subject_index)
    }
}
