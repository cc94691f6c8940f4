use chromiumoxide::Browser;
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use super::BrowserSession;
use crate::error::{AppError, AppResult, BrowserError};

/// 连接到已运行的浏览器（`--remote-debugging-port`）并新开一个标签页
///
/// 这种模式下浏览器不归本程序所有，结束时只关闭自己打开的标签页。
pub async fn connect_to_browser(port: u16) -> AppResult<BrowserSession> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        AppError::browser_connection_failed(port, e)
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    let handle = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建新页面失败: {}", e);
        BrowserError::PageCreationFailed { source: e }
    })?;
    debug!("已创建新标签页");

    Ok(BrowserSession::new(browser, page, handle, false))
}
