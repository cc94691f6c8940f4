//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，通过执行 JS 实现 `PageSession` 的全部能力

use anyhow::{Context, Result};
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use super::session::PageSession;

/// 行锚点使用的属性名
const ANCHOR_ATTRIBUTE: &str = "data-attendance-row";

/// 可见文本读取：未渲染的元素读作空字符串
const VISIBLE_TEXT_FN: &str = r#"
                const visibleText = (n) => {
                    if (n.nodeType !== Node.ELEMENT_NODE) {
                        return (n.textContent || '').trim();
                    }
                    return n.getClientRects().length > 0 ? (n.innerText || '').trim() : '';
                };
"#;

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 能力
/// - 不认识科目 / 出勤
/// - 不处理业务流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 在 XPath 快照上执行一段脚本
    ///
    /// 脚本体中可使用 `snap`（ORDERED_NODE_SNAPSHOT）和 `pos`（元素序号）。
    async fn eval_on_snapshot<T: DeserializeOwned>(
        &self,
        xpath: &str,
        position: usize,
        body: &str,
    ) -> Result<T> {
        let js_code = format!(
            r#"
            (() => {{
                const snap = document.evaluate({xpath}, document, null,
                    XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
                const pos = {position};
                {body}
            }})()
            "#,
            xpath = serde_json::to_string(xpath)?,
            position = position,
            body = body,
        );
        self.eval_as(js_code)
            .await
            .with_context(|| format!("XPath 脚本执行失败: {}", xpath))
    }
}

impl PageSession for JsExecutor {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .with_context(|| format!("导航到 {} 失败", url))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.eval_as("window.location.href").await
    }

    async fn title(&self) -> Result<String> {
        self.eval_as("document.title").await
    }

    async fn query_texts(&self, xpath: &str) -> Result<Vec<String>> {
        let body = format!(
            r#"
                {VISIBLE_TEXT_FN}
                const out = [];
                for (let i = 0; i < snap.snapshotLength; i++) {{
                    out.push(visibleText(snap.snapshotItem(i)));
                }}
                return out;
            "#
        );
        self.eval_on_snapshot(xpath, 0, &body).await
    }

    async fn query_texts_from(&self, xpath: &str, anchor: &str) -> Result<Vec<String>> {
        let body = format!(
            r#"
                {VISIBLE_TEXT_FN}
                const a = document.evaluate({anchor}, document, null,
                    XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;
                const all = [];
                const after = [];
                for (let i = 0; i < snap.snapshotLength; i++) {{
                    const n = snap.snapshotItem(i);
                    const text = visibleText(n);
                    all.push(text);
                    if (a !== null
                        && (a.compareDocumentPosition(n) & Node.DOCUMENT_POSITION_FOLLOWING) !== 0) {{
                        after.push(text);
                    }}
                }}
                return after.length > 0 ? after : all;
            "#,
            anchor = serde_json::to_string(anchor)?,
        );
        self.eval_on_snapshot(xpath, 0, &body).await
    }

    async fn pin_matches(&self, xpath: &str) -> Result<Vec<String>> {
        let body = format!(
            r#"
                const attr = {attr};
                window.__attendanceRowSeq = window.__attendanceRowSeq || 0;
                const out = [];
                for (let i = 0; i < snap.snapshotLength; i++) {{
                    const n = snap.snapshotItem(i);
                    if (n.nodeType !== Node.ELEMENT_NODE) continue;
                    let id = n.getAttribute(attr);
                    if (!id) {{
                        id = String(++window.__attendanceRowSeq);
                        n.setAttribute(attr, id);
                    }}
                    out.push(`//*[@${{attr}}='${{id}}']`);
                }}
                return out;
            "#,
            attr = serde_json::to_string(ANCHOR_ATTRIBUTE)?,
        );
        self.eval_on_snapshot(xpath, 0, &body).await
    }

    async fn count(&self, xpath: &str) -> Result<usize> {
        self.eval_on_snapshot(xpath, 0, "return snap.snapshotLength;")
            .await
    }

    async fn attribute(
        &self,
        xpath: &str,
        position: usize,
        name: &str,
    ) -> Result<Option<String>> {
        let body = format!(
            r#"
                const n = snap.snapshotItem(pos);
                if (!n || !n.getAttribute) return null;
                return n.getAttribute({});
            "#,
            serde_json::to_string(name)?
        );
        self.eval_on_snapshot(xpath, position, &body).await
    }

    async fn scroll_into_view(&self, xpath: &str, position: usize) -> Result<bool> {
        self.eval_on_snapshot(
            xpath,
            position,
            r#"
                const n = snap.snapshotItem(pos);
                if (!n || !n.scrollIntoView) return false;
                n.scrollIntoView(true);
                return true;
            "#,
        )
        .await
    }

    async fn click(&self, xpath: &str, position: usize) -> Result<bool> {
        // 图标元素（如 <i>、<svg>）不一定有 click()，退回到派发事件
        self.eval_on_snapshot(
            xpath,
            position,
            r#"
                const n = snap.snapshotItem(pos);
                if (!n) return false;
                if (typeof n.click === 'function') {
                    n.click();
                } else {
                    n.dispatchEvent(new MouseEvent('click', { bubbles: true, cancelable: true }));
                }
                return true;
            "#,
        )
        .await
    }
}
