use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::Path;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::provision::resolve_executable;
use super::BrowserSession;
use crate::config::Config;
use crate::error::{AppError, AppResult, BrowserError};

/// 启动参数
const LAUNCH_ARGS: [&str; 4] = [
    "--no-sandbox",                           // 禁用沙盒，防止权限问题导致的崩溃
    "--disable-dev-shm-usage",                // 防止共享内存不足
    "--disable-web-security",                 // 门户页面跨域加载明细
    "--disable-features=VizDisplayCompositor",
];

/// 启动有界面的浏览器（需要人工登录，不能无头）
///
/// 指定的可执行文件启动失败时，退回到 chromiumoxide 自动探测再试一次。
pub async fn launch_browser(config: &Config) -> AppResult<BrowserSession> {
    info!("🚀 正在启动浏览器...");

    let executable = resolve_executable(config.chrome_executable.as_deref())?;

    let (browser, handler) = match launch_with(config, executable.as_deref()).await {
        Ok(launched) => launched,
        Err(e) if executable.is_some() => {
            warn!("使用 {:?} 启动失败: {}，尝试自动探测浏览器...", executable, e);
            launch_with(config, None).await?
        }
        Err(e) => return Err(e),
    };

    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|source| BrowserError::PageCreationFailed { source })?;

    info!("✓ 浏览器启动完成");
    Ok(BrowserSession::new(browser, page, handler, true))
}

async fn launch_with(
    config: &Config,
    executable: Option<&Path>,
) -> AppResult<(Browser, tokio::task::JoinHandle<()>)> {
    debug!(
        "窗口尺寸: {}x{}, 可执行文件: {:?}",
        config.window_width, config.window_height, executable
    );

    let mut builder = BrowserConfig::builder()
        .with_head()
        .window_size(config.window_width, config.window_height)
        .viewport(None)
        .args(LAUNCH_ARGS.to_vec());
    if let Some(path) = executable {
        builder = builder.chrome_executable(path);
    }
    let browser_config = builder.build().map_err(|message| {
        error!("配置浏览器失败: {}", message);
        BrowserError::ConfigurationFailed { message }
    })?;

    let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        AppError::launch_failed(e)
    })?;
    debug!("浏览器进程已启动");

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

    Ok((browser, handle))
}

/// 启动失败时给操作者的排障提示
pub fn log_remediation() {
    error!("排障步骤:");
    error!("  1. 将 Chrome 更新到最新版本");
    error!("  2. 或安装 Chromium（例如 brew install --cask chromium）");
    error!("  3. 通过 CHROME_EXECUTABLE 指定浏览器路径");
    error!("  4. 或用 --remote-debugging-port 手动启动浏览器，并设置 BROWSER_DEBUG_PORT 连接");
}
