//! 有界等待
//!
//! 所有等待都有超时；超时只返回 `false`，由调用方决定记录警告后继续。

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

use super::session::PageSession;

/// 轮询间隔
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 反复检查 `predicate`，直到成立或超时
///
/// 超时前至少检查一次；返回条件是否成立。
pub async fn wait_until<F, Fut>(timeout: Duration, interval: Duration, mut predicate: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if predicate().await {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(interval).await;
    }
}

/// 等待至少一个元素出现
pub async fn wait_for_element<S: PageSession>(session: &S, xpath: &str, timeout: Duration) -> bool {
    wait_until(timeout, POLL_INTERVAL, || async move {
        match session.count(xpath).await {
            Ok(n) => n > 0,
            Err(e) => {
                debug!("检查元素 {} 失败: {}", xpath, e);
                false
            }
        }
    })
    .await
}

/// 等待 URL 不再包含 `marker`（忽略大小写）
pub async fn wait_for_url_without<S: PageSession>(
    session: &S,
    marker: &str,
    timeout: Duration,
) -> bool {
    let marker = marker.to_lowercase();
    let marker = marker.as_str();
    wait_until(timeout, POLL_INTERVAL, || async move {
        match session.current_url().await {
            Ok(url) => !url.to_lowercase().contains(marker),
            Err(e) => {
                debug!("读取当前 URL 失败: {}", e);
                false
            }
        }
    })
    .await
}
