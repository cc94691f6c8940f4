//! 浏览器可执行文件定位
//!
//! CDP 直连浏览器，不需要额外的驱动程序；这里只负责找到一个可用的
//! Chrome/Chromium。找不到时交给 chromiumoxide 自行探测。

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::BrowserError;

/// PATH 中查找的可执行文件名
const EXECUTABLE_NAMES: [&str; 6] = [
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
    "chrome.exe",
];

/// 常见安装位置
const WELL_KNOWN_PATHS: [&str; 5] = [
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    "/snap/bin/chromium",
];

/// 确定要启动的浏览器
///
/// - 显式配置的路径必须存在，否则是启动错误
/// - 未配置时依次查找常见安装位置和 PATH
/// - 都找不到时返回 `None`，由 chromiumoxide 自动探测
pub fn resolve_executable(configured: Option<&Path>) -> Result<Option<PathBuf>, BrowserError> {
    if let Some(path) = configured {
        if path.is_file() {
            info!("使用配置的浏览器: {}", path.display());
            return Ok(Some(path.to_path_buf()));
        }
        return Err(BrowserError::ExecutableNotFound {
            path: path.display().to_string(),
        });
    }

    if let Some(path) = WELL_KNOWN_PATHS.iter().map(PathBuf::from).find(|p| p.is_file()) {
        info!("找到浏览器: {}", path.display());
        return Ok(Some(path));
    }

    if let Some(path) = std::env::var_os("PATH").and_then(|p| find_in_path(&p, &EXECUTABLE_NAMES)) {
        info!("在 PATH 中找到浏览器: {}", path.display());
        return Ok(Some(path));
    }

    debug!("未找到浏览器，交给 chromiumoxide 自动探测");
    Ok(None)
}

/// 在 PATH 形式的目录列表中按名称顺序查找第一个存在的文件
pub fn find_in_path(path_var: &OsStr, names: &[&str]) -> Option<PathBuf> {
    let dirs: Vec<PathBuf> = std::env::split_paths(path_var).collect();
    names.iter().find_map(|name| {
        dirs.iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_configured_path_must_exist() {
        let err = resolve_executable(Some(Path::new("/definitely/not/here/chrome"))).unwrap_err();
        assert!(matches!(err, BrowserError::ExecutableNotFound { .. }));
    }

    #[test]
    fn test_configured_path_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("my-chrome");
        fs::write(&exe, b"").unwrap();

        assert_eq!(
            resolve_executable(Some(exe.as_path())).unwrap(),
            Some(exe.clone())
        );
    }

    #[test]
    fn test_find_in_path_prefers_name_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(first.path().join("chromium"), b"").unwrap();
        fs::write(second.path().join("google-chrome"), b"").unwrap();

        let path_var = std::env::join_paths([first.path(), second.path()]).unwrap();
        let found = find_in_path(&path_var, &["google-chrome", "chromium"]).unwrap();

        assert_eq!(found, second.path().join("google-chrome"));
    }

    #[test]
    fn test_find_in_path_none() {
        let empty = tempfile::tempdir().unwrap();
        let path_var = std::env::join_paths([empty.path()]).unwrap();
        assert_eq!(find_in_path(&path_var, &EXECUTABLE_NAMES), None);
    }
}
