//! 测试用的内存页面
//!
//! 以 XPath 字符串为键返回预置元素。`with_rows` 预置一组可展开的科目行：
//! 点击某一行后，该行的明细出现在页面上，位置紧跟在该行之后。
//! 可选地模拟展开图标切换（展开后不再匹配发现查询）以及多行同时保持展开。

use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::session::PageSession;

/// 锚点 XPath 前缀，后接行号
const ANCHOR_PREFIX: &str = "//*[@data-fake-row='";

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub text: String,
    pub attributes: HashMap<String, String>,
}

#[derive(Default)]
pub struct FakePage {
    url: RefCell<String>,
    title: String,
    elements: HashMap<String, Vec<FakeElement>>,
    row_query: Option<String>,
    /// 每一行展开后可见的内容：XPath → 候选文本
    rows: Vec<HashMap<String, Vec<String>>>,
    expanded: RefCell<Vec<bool>>,
    toggling_icons: bool,
    keep_expanded: bool,
    failing: HashSet<String>,
    failing_clicks: HashSet<usize>,
    pub queries: RefCell<Vec<String>>,
    /// 被点击的行号（按点击顺序）
    pub clicks: RefCell<Vec<usize>>,
    pub navigations: RefCell<Vec<String>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 第 `row` 行（从0开始）的锚点
    pub fn anchor(row: usize) -> String {
        format!("{}{}']", ANCHOR_PREFIX, row)
    }

    pub fn with_url(self, url: &str) -> Self {
        self.url.replace(url.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_elements(mut self, xpath: &str, texts: &[&str]) -> Self {
        let elements = texts
            .iter()
            .map(|t| FakeElement {
                text: t.to_string(),
                attributes: HashMap::new(),
            })
            .collect();
        self.elements.insert(xpath.to_string(), elements);
        self
    }

    pub fn with_element_attrs(mut self, xpath: &str, text: &str, attrs: &[(&str, &str)]) -> Self {
        let element = FakeElement {
            text: text.to_string(),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        self.elements
            .entry(xpath.to_string())
            .or_default()
            .push(element);
        self
    }

    /// 预置 `row_xpath` 匹配的每一行展开后可见的字段文本
    ///
    /// 同一行中重复出现的 XPath 表示多个候选元素，按出现顺序排列。
    pub fn with_rows(mut self, row_xpath: &str, rows: &[&[(&str, &str)]]) -> Self {
        self.rows = rows
            .iter()
            .map(|fields| {
                let mut map: HashMap<String, Vec<String>> = HashMap::new();
                for (xpath, text) in fields.iter() {
                    map.entry(xpath.to_string())
                        .or_default()
                        .push(text.to_string());
                }
                map
            })
            .collect();
        self.expanded = RefCell::new(vec![false; self.rows.len()]);
        self.row_query = Some(row_xpath.to_string());
        self
    }

    /// 展开后的行图标变成"收起"，不再匹配发现查询
    pub fn with_toggling_icons(mut self) -> Self {
        self.toggling_icons = true;
        self
    }

    /// 展开一行时不收起其他行
    pub fn with_rows_kept_expanded(mut self) -> Self {
        self.keep_expanded = true;
        self
    }

    /// 查询该 XPath 时返回错误（模拟非法 XPath 或脚本异常）
    pub fn with_failing_query(mut self, xpath: &str) -> Self {
        self.failing.insert(xpath.to_string());
        self
    }

    /// 点击第 `row` 行时抛出脚本错误
    pub fn with_failing_click(mut self, row: usize) -> Self {
        self.failing_clicks.insert(row);
        self
    }

    pub fn set_url(&self, url: &str) {
        self.url.replace(url.to_string());
    }

    pub fn is_expanded(&self, row: usize) -> bool {
        self.expanded.borrow().get(row).copied().unwrap_or(false)
    }

    /// 当前仍匹配发现查询的行号
    fn matching_rows(&self) -> Vec<usize> {
        let expanded = self.expanded.borrow();
        (0..self.rows.len())
            .filter(|&i| !(self.toggling_icons && expanded[i]))
            .collect()
    }

    fn is_row_query(&self, xpath: &str) -> bool {
        self.row_query.as_deref() == Some(xpath)
    }

    fn anchored_row(&self, xpath: &str) -> Option<usize> {
        let row = xpath
            .strip_prefix(ANCHOR_PREFIX)?
            .strip_suffix("']")?
            .parse::<usize>()
            .ok()?;
        (row < self.rows.len()).then_some(row)
    }

    fn resolve_row(&self, xpath: &str, position: usize) -> Option<usize> {
        if let Some(row) = self.anchored_row(xpath) {
            return (position == 0).then_some(row);
        }
        if self.is_row_query(xpath) {
            return self.matching_rows().get(position).copied();
        }
        None
    }

    /// 已展开各行中该 XPath 的候选，按文档顺序并带上所属行号
    fn expanded_texts(&self, xpath: &str) -> Option<Vec<(usize, String)>> {
        let expanded = self.expanded.borrow();
        let texts: Vec<(usize, String)> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, _)| expanded[*i])
            .filter_map(|(i, row)| row.get(xpath).map(|texts| (i, texts)))
            .flat_map(|(i, texts)| texts.iter().map(move |t| (i, t.clone())))
            .collect();
        (!texts.is_empty()).then_some(texts)
    }

    fn element_exists(&self, xpath: &str, position: usize) -> bool {
        self.elements
            .get(xpath)
            .is_some_and(|els| position < els.len())
    }

    fn check(&self, xpath: &str) -> Result<()> {
        self.queries.borrow_mut().push(xpath.to_string());
        if self.failing.contains(xpath) {
            return Err(anyhow!("invalid xpath: {}", xpath));
        }
        Ok(())
    }
}

impl PageSession for FakePage {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.navigations.borrow_mut().push(url.to_string());
        self.url.replace(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.url.borrow().clone())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.title.clone())
    }

    async fn query_texts(&self, xpath: &str) -> Result<Vec<String>> {
        self.check(xpath)?;
        if self.is_row_query(xpath) {
            return Ok(vec![String::new(); self.matching_rows().len()]);
        }
        if let Some(texts) = self.expanded_texts(xpath) {
            return Ok(texts.into_iter().map(|(_, t)| t).collect());
        }
        Ok(self
            .elements
            .get(xpath)
            .map(|els| els.iter().map(|e| e.text.clone()).collect())
            .unwrap_or_default())
    }

    async fn query_texts_from(&self, xpath: &str, anchor: &str) -> Result<Vec<String>> {
        let (Some(row), Some(texts)) = (self.anchored_row(anchor), self.expanded_texts(xpath))
        else {
            return self.query_texts(xpath).await;
        };
        self.check(xpath)?;
        // 每行的明细紧跟在该行之后
        let after: Vec<String> = texts
            .iter()
            .filter(|(i, _)| *i >= row)
            .map(|(_, t)| t.clone())
            .collect();
        if after.is_empty() {
            return Ok(texts.into_iter().map(|(_, t)| t).collect());
        }
        Ok(after)
    }

    async fn pin_matches(&self, xpath: &str) -> Result<Vec<String>> {
        if self.is_row_query(xpath) {
            self.check(xpath)?;
            return Ok(self.matching_rows().into_iter().map(Self::anchor).collect());
        }
        let count = self.query_texts(xpath).await?.len();
        Ok((1..=count).map(|i| format!("({})[{}]", xpath, i)).collect())
    }

    async fn count(&self, xpath: &str) -> Result<usize> {
        Ok(self.query_texts(xpath).await?.len())
    }

    async fn attribute(&self, xpath: &str, position: usize, name: &str) -> Result<Option<String>> {
        self.check(xpath)?;
        Ok(self
            .elements
            .get(xpath)
            .and_then(|els| els.get(position))
            .and_then(|e| e.attributes.get(name).cloned()))
    }

    async fn scroll_into_view(&self, xpath: &str, position: usize) -> Result<bool> {
        self.check(xpath)?;
        Ok(self.resolve_row(xpath, position).is_some() || self.element_exists(xpath, position))
    }

    async fn click(&self, xpath: &str, position: usize) -> Result<bool> {
        self.check(xpath)?;
        let Some(row) = self.resolve_row(xpath, position) else {
            return Ok(self.element_exists(xpath, position));
        };
        self.clicks.borrow_mut().push(row);
        if self.failing_clicks.contains(&row) {
            return Err(anyhow!("element is not attached to the page document"));
        }
        let mut expanded = self.expanded.borrow_mut();
        let was_expanded = expanded[row];
        if !self.keep_expanded {
            expanded.iter_mut().for_each(|e| *e = false);
        }
        expanded[row] = !was_expanded;
        Ok(true)
    }
}
