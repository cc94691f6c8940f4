//! 浏览器会话能力抽象
//!
//! 业务层只依赖这个 trait，不直接接触 chromiumoxide。元素通过
//! `(xpath, position)` 定位：同一查询在文档顺序中的第 `position` 个匹配。
//! 查询结果会随页面变化，需要跨多次操作指向同一元素时先用 `pin_matches`
//! 固定下来，再用返回的锚点 XPath 定位。

use anyhow::Result;

/// 远程浏览器会话
#[allow(async_fn_in_trait)]
pub trait PageSession {
    /// 导航到指定 URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// 当前页面 URL
    async fn current_url(&self) -> Result<String>;

    /// 当前页面标题
    async fn title(&self) -> Result<String>;

    /// 读取所有匹配元素的可见文本（文档顺序，未渲染的元素为空字符串）
    ///
    /// XPath 非法时返回错误。
    async fn query_texts(&self, xpath: &str) -> Result<Vec<String>>;

    /// 读取文档顺序中位于 `anchor` 之后的匹配元素的可见文本
    ///
    /// `anchor` 之后没有任何匹配或 `anchor` 不存在时，等同于 `query_texts`。
    async fn query_texts_from(&self, xpath: &str, anchor: &str) -> Result<Vec<String>>;

    /// 给当前所有匹配元素打上稳定标记，返回逐个指向它们的锚点 XPath
    ///
    /// 锚点不依赖原查询，元素的 class 等属性之后发生变化也仍然有效。
    async fn pin_matches(&self, xpath: &str) -> Result<Vec<String>>;

    /// 匹配元素数量
    async fn count(&self, xpath: &str) -> Result<usize>;

    /// 读取第 `position` 个匹配元素的属性
    async fn attribute(&self, xpath: &str, position: usize, name: &str)
        -> Result<Option<String>>;

    /// 把第 `position` 个匹配元素滚动到可见区域，元素不存在时返回 `false`
    async fn scroll_into_view(&self, xpath: &str, position: usize) -> Result<bool>;

    /// 对第 `position` 个匹配元素执行脚本级点击，元素不存在时返回 `false`
    async fn click(&self, xpath: &str, position: usize) -> Result<bool>;
}
