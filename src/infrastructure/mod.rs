//! 基础设施层
//!
//! 持有浏览器页面这一稀缺资源，只向上暴露"查询/点击/导航"能力。

pub mod js_executor;
pub mod operator;
pub mod session;
pub mod wait;

#[cfg(test)]
pub mod fake_page;

pub use js_executor::JsExecutor;
pub use operator::{OperatorPrompt, StdinPrompt};
pub use session::PageSession;
