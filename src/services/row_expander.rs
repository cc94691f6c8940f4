//! 行展开服务 - 业务能力层
//!
//! 负责找到页面上所有可展开的科目行，并逐行触发展开。
//!
//! 展开图标通常会在展开后切换样式（例如 plus 变成 minus），不再匹配发现查询，
//! 所以发现时就给每个匹配元素固定锚点，之后的滚动和点击都只通过锚点定位。

use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::SelectorConfig;
use crate::infrastructure::PageSession;
use crate::models::RowCtx;
use crate::utils::logging::truncate_text;

/// 找不到行时的诊断快照中的一个元素
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSnapshot {
    pub class: String,
    pub text: String,
}

/// 行发现结果
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// 命中的发现查询
    pub query: Option<String>,
    pub rows: Vec<RowCtx>,
    /// 只有在 `rows` 为空时才会采集
    pub diagnostics: Vec<ElementSnapshot>,
}

impl Discovery {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 行展开服务
pub struct RowExpander {
    discovery_queries: Vec<String>,
    diagnostic_probe: String,
    diagnostic_limit: usize,
    settle_delay: Duration,
}

impl RowExpander {
    pub fn new(selectors: &SelectorConfig, settle_delay: Duration) -> Self {
        Self {
            discovery_queries: selectors.row_discovery.clone(),
            diagnostic_probe: selectors.diagnostic_probe.clone(),
            diagnostic_limit: selectors.diagnostic_limit,
            settle_delay,
        }
    }

    /// 发现所有可展开的行
    ///
    /// 依次尝试发现查询，遇到第一个非空结果即停止，并把结果固定为锚点。
    /// 全部为空时返回空结果并附带诊断信息。
    pub async fn discover_rows<S: PageSession>(&self, session: &S) -> Discovery {
        for (i, query) in self.discovery_queries.iter().enumerate() {
            match session.pin_matches(query).await {
                Ok(anchors) if anchors.is_empty() => {
                    debug!("发现策略 {}: 0 个元素 ({})", i + 1, query)
                }
                Ok(anchors) => {
                    info!(
                        "发现策略 {}: 找到 {} 个可展开行 ({})",
                        i + 1,
                        anchors.len(),
                        query
                    );
                    let rows = anchors
                        .into_iter()
                        .enumerate()
                        .map(|(position, anchor)| RowCtx::new(position + 1, anchor))
                        .collect();
                    return Discovery {
                        query: Some(query.clone()),
                        rows,
                        diagnostics: Vec::new(),
                    };
                }
                Err(e) => warn!("发现策略 {} 失败: {}", i + 1, e),
            }
        }

        warn!("⚠️ 未找到可展开的行，正在收集页面结构用于排查...");
        Discovery {
            query: None,
            rows: Vec::new(),
            diagnostics: self.snapshot_interactive(session).await,
        }
    }

    /// 乐观展开：滚动到可见 → 等待 → 点击 → 等待
    ///
    /// 不校验展开是否成功，后续字段读取的结果就是证据。
    /// 浏览器脚本异常作为该行的错误返回，由调用方在行边界处理。
    pub async fn expand<S: PageSession>(&self, session: &S, row: &RowCtx) -> anyhow::Result<()> {
        if !session.scroll_into_view(&row.anchor, 0).await? {
            warn!("{} ⚠️ 行元素已不在页面上", row);
        }
        sleep(self.settle_delay).await;

        if session.click(&row.anchor, 0).await? {
            debug!("{} ✓ 已触发展开", row);
        } else {
            warn!("{} ⚠️ 点击未命中任何元素", row);
        }
        sleep(self.settle_delay).await;
        Ok(())
    }

    /// 采集可交互元素的快照（class + 文本），数量受限
    async fn snapshot_interactive<S: PageSession>(&self, session: &S) -> Vec<ElementSnapshot> {
        let probe = &self.diagnostic_probe;
        let texts = match session.query_texts(probe).await {
            Ok(texts) => texts,
            Err(e) => {
                warn!("诊断查询失败: {}", e);
                return Vec::new();
            }
        };
        info!("页面上共有 {} 个可能可点击的元素", texts.len());

        let mut snapshots = Vec::new();
        for (position, text) in texts.iter().take(self.diagnostic_limit).enumerate() {
            let class = session
                .attribute(probe, position, "class")
                .await
                .ok()
                .flatten()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "no-class".to_string());
            let text = if text.is_empty() {
                "no-text".to_string()
            } else {
                truncate_text(text, 50)
            };
            info!("  元素 {}: class='{}', text='{}'", position + 1, class, text);
            snapshots.push(ElementSnapshot { class, text });
        }
        snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fake_page::FakePage;

    fn selectors() -> SelectorConfig {
        SelectorConfig {
            row_discovery: vec![
                "//i[contains(@class, 'bx-plus-circle')]".to_string(),
                "//i[contains(@class, 'fa-plus')]".to_string(),
                "//*[contains(@class, 'expand')]".to_string(),
            ],
            diagnostic_probe: "//button | //a".to_string(),
            diagnostic_limit: 2,
            ..SelectorConfig::default()
        }
    }

    fn expander() -> RowExpander {
        RowExpander::new(&selectors(), Duration::ZERO)
    }

    #[tokio::test]
    async fn test_primary_query_used_when_non_empty() {
        let page = FakePage::new()
            .with_rows("//i[contains(@class, 'bx-plus-circle')]", &[&[], &[], &[]])
            .with_elements("//i[contains(@class, 'fa-plus')]", &[""]);

        let discovery = expander().discover_rows(&page).await;

        assert_eq!(discovery.rows.len(), 3);
        assert_eq!(discovery.rows[2], RowCtx::new(3, FakePage::anchor(2)));
        assert!(discovery.diagnostics.is_empty());
        // 主查询命中后不再尝试后备查询
        assert_eq!(page.queries.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_falls_back_to_next_non_empty_query() {
        let page = FakePage::new()
            .with_failing_query("//i[contains(@class, 'bx-plus-circle')]")
            .with_rows("//*[contains(@class, 'expand')]", &[&[], &[]]);

        let discovery = expander().discover_rows(&page).await;

        assert_eq!(discovery.rows.len(), 2);
        assert_eq!(
            discovery.query.as_deref(),
            Some("//*[contains(@class, 'expand')]")
        );
    }

    #[tokio::test]
    async fn test_empty_discovery_collects_truncated_diagnostics() {
        let long_text = "x".repeat(80);
        let page = FakePage::new()
            .with_element_attrs("//button | //a", "Logout", &[("class", "btn btn-link")])
            .with_element_attrs("//button | //a", &long_text, &[])
            .with_element_attrs("//button | //a", "Home", &[("class", "nav")]);

        let discovery = expander().discover_rows(&page).await;

        assert!(discovery.is_empty());
        assert_eq!(discovery.query, None);
        assert_eq!(
            discovery.diagnostics,
            vec![
                ElementSnapshot {
                    class: "btn btn-link".to_string(),
                    text: "Logout".to_string(),
                },
                ElementSnapshot {
                    class: "no-class".to_string(),
                    text: format!("{}...", "x".repeat(50)),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_expand_clicks_the_row() {
        let page = FakePage::new().with_rows("//i[contains(@class, 'fa-plus')]", &[&[], &[]]);

        expander()
            .expand(&page, &RowCtx::new(2, FakePage::anchor(1)))
            .await
            .unwrap();

        assert_eq!(*page.clicks.borrow(), vec![1]);
        assert!(page.is_expanded(1));
    }

    #[tokio::test]
    async fn test_anchors_survive_icons_leaving_the_query() {
        let row_query = "//i[contains(@class, 'bx-plus-circle')]";
        let page = FakePage::new()
            .with_rows(row_query, &[&[], &[], &[], &[]])
            .with_toggling_icons()
            .with_rows_kept_expanded();
        let expander = expander();

        let discovery = expander.discover_rows(&page).await;
        for row in &discovery.rows {
            expander.expand(&page, row).await.unwrap();
        }

        // 每一行恰好被点击一次，且全部展开
        assert_eq!(*page.clicks.borrow(), vec![0, 1, 2, 3]);
        assert!((0..4).all(|row| page.is_expanded(row)));
        // 展开后的图标已不再匹配发现查询
        assert_eq!(page.count(row_query).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_expand_missing_row_is_not_an_error() {
        let page = FakePage::new();
        let row = RowCtx::new(6, FakePage::anchor(5));

        assert!(expander().expand(&page, &row).await.is_ok());
        assert!(page.clicks.borrow().is_empty());
    }
}
