// src/symbols.rs

//! 终端输出使用的状态前缀

use colored::{ColoredString, Colorize};
use std::sync::LazyLock;

pub static OK: LazyLock<ColoredString> = LazyLock::new(|| "[OK]".green());
pub static INFO: LazyLock<ColoredString> = LazyLock::new(|| "[i]".cyan());
pub static WARN: LazyLock<ColoredString> = LazyLock::new(|| "[!]".yellow());
pub static ERROR: LazyLock<ColoredString> = LazyLock::new(|| "[X]".red().bold());
pub static CTRL_C: LazyLock<ColoredString> = LazyLock::new(|| "Ctrl+C".yellow());
