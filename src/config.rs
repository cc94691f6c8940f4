use crate::error::ConfigError;
use crate::models::strategy::{Strategy, StrategyTable, CONFIGURED_STRATEGY};
use crate::models::Field;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// 默认配置文件名（位于工作目录）
const DEFAULT_CONFIG_FILE: &str = "attendance.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 登录页 URL
    pub login_url: String,
    /// 课程出勤页 URL
    pub attendance_url: String,
    /// URL 中含有该片段时视为仍停留在登录页
    pub login_url_marker: String,
    /// 页面就绪等待超时（秒）
    pub wait_timeout_secs: u64,
    /// 滚动/点击之后的稳定等待（毫秒）
    pub interaction_delay_ms: u64,
    /// 出勤页加载后给动态内容的额外等待（毫秒）
    pub page_settle_delay_ms: u64,
    /// 浏览器窗口尺寸
    pub window_width: u32,
    pub window_height: u32,
    /// 出勤良好阈值（百分比）
    pub good_threshold: f64,
    /// 出勤警告阈值（百分比）
    pub warning_threshold: f64,
    /// 指定 Chrome 可执行文件，不指定时自动查找
    pub chrome_executable: Option<PathBuf>,
    /// 连接已运行浏览器的调试端口，设置后不再自行启动浏览器
    pub browser_debug_port: Option<u16>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 页面选择器
    pub selectors: SelectorConfig,
}

/// 行发现与字段查找所用的 XPath
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// 行发现查询：第一个为主查询，其余按顺序兜底
    pub row_discovery: Vec<String>,
    /// 找不到行时用于诊断的可交互元素查询
    pub diagnostic_probe: String,
    /// 诊断输出的最大元素数
    pub diagnostic_limit: usize,
    pub conducted: Vec<Strategy>,
    pub attended: Vec<Strategy>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        let table = StrategyTable::default();
        Self {
            row_discovery: vec![
                "//i[contains(@class, 'bx-plus-circle')]".to_string(),
                "//i[contains(@class, 'plus')]".to_string(),
                "//i[contains(@class, 'bx-plus')]".to_string(),
                "//i[contains(@class, 'fa-plus')]".to_string(),
                "//button[contains(@class, 'expand')]".to_string(),
                "//*[contains(@class, 'expand')]".to_string(),
                "//a[contains(@href, 'expand') or contains(text(), '+')]".to_string(),
            ],
            diagnostic_probe: "//button | //a | //i | //*[@onclick]".to_string(),
            diagnostic_limit: 10,
            conducted: table.conducted,
            attended: table.attended,
        }
    }
}

impl SelectorConfig {
    pub fn strategy_table(&self) -> StrategyTable {
        StrategyTable {
            conducted: self.conducted.clone(),
            attended: self.attended.clone(),
        }
    }

    /// 覆盖某个字段的兜底策略查询；不存在兜底策略时追加到末尾
    fn override_configured(&mut self, field: Field, xpath: String) {
        let list = match field {
            Field::Conducted => &mut self.conducted,
            Field::Attended => &mut self.attended,
        };
        match list.iter_mut().find(|s| s.name == CONFIGURED_STRATEGY) {
            Some(strategy) => strategy.xpath = xpath,
            None => list.push(Strategy::new(CONFIGURED_STRATEGY, xpath)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            login_url: "https://student.jgianveshana.com".to_string(),
            attendance_url:
                "https://student.jgianveshana.com/ui/Academics/js_Class_Attendance_for_a_Week.aspx"
                    .to_string(),
            login_url_marker: "login".to_string(),
            wait_timeout_secs: 20,
            interaction_delay_ms: 500,
            page_settle_delay_ms: 2000,
            window_width: 1920,
            window_height: 1080,
            good_threshold: 75.0,
            warning_threshold: 65.0,
            chrome_executable: None,
            browser_debug_port: None,
            verbose_logging: false,
            selectors: SelectorConfig::default(),
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件 → 环境变量 → 校验
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("ATTENDANCE_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取，文件中未出现的字段保持默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            }
        })?;
        info!("已加载配置文件: {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖配置
    ///
    /// `lookup` 抽象出环境变量读取，便于测试。
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LOGIN_URL") {
            self.login_url = v;
        }
        if let Some(v) = lookup("ATTENDANCE_URL") {
            self.attendance_url = v;
        }
        if let Some(v) = lookup("LOGIN_URL_MARKER") {
            self.login_url_marker = v;
        }
        if let Some(v) = parse_env(&lookup, "WAIT_TIMEOUT", "u64")? {
            self.wait_timeout_secs = v;
        }
        if let Some(v) = parse_env(&lookup, "INTERACTION_DELAY_MS", "u64")? {
            self.interaction_delay_ms = v;
        }
        if let Some(v) = parse_env(&lookup, "PAGE_SETTLE_DELAY_MS", "u64")? {
            self.page_settle_delay_ms = v;
        }
        if let Some(v) = lookup("WINDOW_SIZE") {
            let (width, height) = parse_window_size(&v)?;
            self.window_width = width;
            self.window_height = height;
        }
        if let Some(v) = parse_env(&lookup, "GOOD_ATTENDANCE_THRESHOLD", "f64")? {
            self.good_threshold = v;
        }
        if let Some(v) = parse_env(&lookup, "WARNING_ATTENDANCE_THRESHOLD", "f64")? {
            self.warning_threshold = v;
        }
        if let Some(v) = lookup("CHROME_EXECUTABLE") {
            self.chrome_executable = Some(PathBuf::from(v));
        }
        if let Some(v) = parse_env(&lookup, "BROWSER_DEBUG_PORT", "u16")? {
            self.browser_debug_port = Some(v);
        }
        if let Some(v) = parse_env(&lookup, "VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        if let Some(v) = lookup("PLUS_ICON_XPATH") {
            match self.selectors.row_discovery.first_mut() {
                Some(primary) => *primary = v,
                None => self.selectors.row_discovery.push(v),
            }
        }
        if let Some(v) = lookup("CONDUCTED_TEXT_XPATH") {
            self.selectors.override_configured(Field::Conducted, v);
        }
        if let Some(v) = lookup("TOTAL_TEXT_XPATH") {
            self.selectors.override_configured(Field::Attended, v);
        }
        debug!("环境变量覆盖完成");
        Ok(())
    }

    /// 校验配置不变量
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (warning, good) = (self.warning_threshold, self.good_threshold);
        if !(0.0..=100.0).contains(&warning) || !(0.0..=100.0).contains(&good) || warning >= good
        {
            return Err(ConfigError::InvalidThresholds { warning, good });
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::InvalidWindowSize {
                value: format!("{},{}", self.window_width, self.window_height),
            });
        }
        let lists = [
            ("row_discovery", self.selectors.row_discovery.is_empty()),
            ("conducted", self.selectors.conducted.is_empty()),
            ("attended", self.selectors.attended.is_empty()),
        ];
        if let Some((list, _)) = lists.iter().find(|(_, empty)| *empty) {
            return Err(ConfigError::EmptySelectors {
                list: list.to_string(),
            });
        }
        Ok(())
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn interaction_delay(&self) -> Duration {
        Duration::from_millis(self.interaction_delay_ms)
    }

    pub fn page_settle_delay(&self) -> Duration {
        Duration::from_millis(self.page_settle_delay_ms)
    }
}

fn parse_env<T, F>(lookup: &F, var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}

/// 解析 `1920,1080` 形式的窗口尺寸
fn parse_window_size(value: &str) -> Result<(u32, u32), ConfigError> {
    let invalid = || ConfigError::InvalidWindowSize {
        value: value.to_string(),
    };
    let (w, h) = value.split_once(',').ok_or_else(invalid)?;
    let width = w.trim().parse().map_err(|_| invalid())?;
    let height = h.trim().parse().map_err(|_| invalid())?;
    Ok((width, height))
}
