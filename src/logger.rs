// src/logger.rs

use crate::{cli::LogLevel, constants};
use log::LevelFilter;
use std::{
    env,
    fs::File,
    path::{Path, PathBuf},
};

/// 按 `--log-level` 初始化文件日志。级别为 Off 时什么都不做，日志文件都打不开时只提示不报错。
pub fn setup_logger(level: LogLevel) {
    let Some(filter) = level_filter(level) else {
        return;
    };
    let Some((path, file)) = open_first_writable(&log_file_candidates(dirs::home_dir())) else {
        eprintln!("警告: 无法创建任何日志文件，本次运行不记录日志。");
        return;
    };

    let result = fern::Dispatch::new()
        .level(filter)
        // chromiumoxide 的协议日志量很大，只保留警告以上
        .level_for("chromiumoxide", LevelFilter::Warn)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {}:{} | {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        })
        .chain(file)
        .apply();

    match result {
        Ok(()) => log::info!("日志写入 {:?}，级别 {:?}", path, filter),
        Err(e) => eprintln!("警告: 日志系统初始化失败: {}", e),
    }
}

fn level_filter(level: LogLevel) -> Option<LevelFilter> {
    Some(match level {
        LogLevel::Off => return None,
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    })
}

/// 配置目录下的日志文件在前，临时目录下的备用文件在后
fn log_file_candidates(home: Option<PathBuf>) -> Vec<PathBuf> {
    let fallback = env::temp_dir().join(format!(
        "{}-{}",
        clap::crate_name!(),
        constants::LOG_FALLBACK_FILE_NAME
    ));
    home.map(|h| h.join(constants::CONFIG_DIR_NAME).join(constants::LOG_FILE_NAME))
        .into_iter()
        .chain(std::iter::once(fallback))
        .collect()
}

fn open_first_writable(candidates: &[PathBuf]) -> Option<(PathBuf, File)> {
    candidates.iter().find_map(|path| match open_append(path) {
        Ok(file) => Some((path.clone(), file)),
        Err(e) => {
            eprintln!("警告: 无法打开日志文件 {:?}: {}", path, e);
            None
        }
    })
}

fn open_append(path: &Path) -> std::io::Result<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    fern::log_file(path)
}
