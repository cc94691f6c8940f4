use attendance_checker::browser::log_remediation;
use attendance_checker::orchestrator::until_interrupted;
use attendance_checker::utils::logging;
use attendance_checker::{App, AppError, Config, RunOutcome};
use std::process::ExitCode;
use tracing::{error, warn};

fn main() -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("无法创建异步运行时: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(run());

    // 中断时 stdin 读取可能仍阻塞在后台线程，不等待它
    runtime.shutdown_background();
    code
}

async fn run() -> ExitCode {
    // 加载配置（日志级别依赖配置，失败时按默认级别初始化日志再报告）
    let config = Config::load();
    logging::init(config.as_ref().map(|c| c.verbose_logging).unwrap_or(false));
    let config = match config.map_err(AppError::from) {
        Ok(config) => config,
        Err(e) => {
            error!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::log_startup(&config);

    // 启动浏览器期间中断：未完成的初始化被 drop，已启动的浏览器进程随之结束
    let app = match until_interrupted(App::initialize(config), interrupted()).await {
        None => {
            warn!("\n\n操作者中断");
            return RunOutcome::Interrupted.exit_code();
        }
        Some(Ok(app)) => app,
        Some(Err(e)) => {
            error!("❌ 浏览器初始化失败: {}", e);
            if e.is_setup_fault() {
                log_remediation();
            }
            return ExitCode::FAILURE;
        }
    };

    let outcome = until_interrupted(app.run(), interrupted())
        .await
        .unwrap_or_else(|| {
            warn!("\n\n操作者中断");
            Ok(RunOutcome::Interrupted)
        });

    // 无论结果如何都释放浏览器
    app.shutdown().await;

    match outcome {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            error!("❌ 运行出错: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// 等待 Ctrl-C；无法注册信号处理时永不完成
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听 Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
