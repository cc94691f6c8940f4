use thiserror::Error;

/// 应用程序错误类型
///
/// 只有"建立会话"阶段的故障和真正意外的故障才会以错误形式向上传播，
/// 其余（超时、找不到行、单行提取失败）都在产生处被消化为日志。
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 找不到可用的 Chrome 可执行文件
    #[error("找不到 Chrome 可执行文件: {path}")]
    ExecutableNotFound { path: String },
    /// 浏览器配置失败
    #[error("浏览器配置失败: {message}")]
    ConfigurationFailed { message: String },
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed {
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed {
        #[source]
        source: chromiumoxide::error::CdpError,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 出勤阈值不合法
    #[error("出勤阈值不合法: warning={warning}, good={good} (要求 0 <= warning < good <= 100)")]
    InvalidThresholds { warning: f64, good: f64 },
    /// 策略列表为空
    #[error("选择器列表不能为空: {list}")]
    EmptySelectors { list: String },
    /// 窗口尺寸不合法
    #[error("窗口尺寸不合法: {value}")]
    InvalidWindowSize { value: String },
}

impl AppError {
    /// 创建浏览器启动错误
    pub fn launch_failed(source: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::LaunchFailed { source })
    }

    /// 创建浏览器连接错误
    pub fn browser_connection_failed(port: u16, source: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed { port, source })
    }

    /// 是否属于建立浏览器会话阶段的故障（需要给出排障提示）
    pub fn is_setup_fault(&self) -> bool {
        matches!(self, AppError::Browser(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
