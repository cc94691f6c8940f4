//! 浏览器会话的获取与释放
//!
//! 会话在启动时获取一次，运行结束时（正常完成、用户中断或出错）
//! 统一经由 `BrowserSession::release` 释放。

pub mod connection;
pub mod launch;
pub mod provision;

use chromiumoxide::{Browser, Page};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppResult;

pub use connection::connect_to_browser;
pub use launch::{launch_browser, log_remediation};

/// 本次运行独占的浏览器会话
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    /// 浏览器进程是否由本程序启动
    owned: bool,
}

impl BrowserSession {
    pub fn new(browser: Browser, page: Page, handler: JoinHandle<()>, owned: bool) -> Self {
        Self {
            browser,
            page,
            handler,
            owned,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 释放会话：自己启动的浏览器整体关闭，连接的浏览器只关闭标签页
    ///
    /// 释放过程中的错误只记录，不再向上传播。
    pub async fn release(mut self) {
        info!("正在清理浏览器资源...");
        if self.owned {
            if let Err(e) = self.browser.close().await {
                warn!("关闭浏览器失败: {}", e);
            }
            match self.browser.wait().await {
                Ok(status) => debug!("浏览器进程已退出: {:?}", status),
                Err(e) => warn!("等待浏览器退出失败: {}", e),
            }
        } else if let Err(e) = self.page.close().await {
            warn!("关闭标签页失败: {}", e);
        }
        self.handler.abort();
        info!("✓ 浏览器已关闭");
    }
}

/// 按配置获取会话：设置了调试端口则连接，否则自行启动
pub async fn acquire_session(config: &Config) -> AppResult<BrowserSession> {
    match config.browser_debug_port {
        Some(port) => connect_to_browser(port).await,
        None => launch_browser(config).await,
    }
}
