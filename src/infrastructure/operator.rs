//! 操作者交互
//!
//! 人工登录完成后需要操作者按回车确认，这是整个运行中唯一没有超时的等待。

use anyhow::{bail, Result};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

/// 等待操作者确认
#[allow(async_fn_in_trait)]
pub trait OperatorPrompt {
    async fn confirm(&self, message: &str) -> Result<()>;
}

/// 从标准输入读取一行作为确认
pub struct StdinPrompt;

impl OperatorPrompt for StdinPrompt {
    async fn confirm(&self, message: &str) -> Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(format!("\n{} ", message).as_bytes()).await?;
        stdout.flush().await?;

        let mut line = String::new();
        let read = BufReader::new(io::stdin()).read_line(&mut line).await?;
        if read == 0 {
            bail!("标准输入已关闭，无法确认登录");
        }
        Ok(())
    }
}
