use colored::*;
use std::fs;
use std::path::Path;
use anyhow::{Context, Result};
use crate::config::RESULTS_DIR;

pub fn setup_env() -> Result<()> {
    let path = Path::new(RESULTS_DIR);
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| format!("Failed to create {}", RESULTS_DIR))?;
    }
    Ok(())
}

pub fn log_info(msg: &str) {
    println!("{} {}", "[INFO]".green().bold(), msg);
}

pub fn log_warn(msg: &str) {
    eprintln!("{} {}", "[WARN]".yellow().bold(), msg);
}

pub fn log_error(msg: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), msg);
}

pub fn log_pass(msg: &str) {
    println!("{} {}", "[PASS]".green().bold(), msg);
}

pub fn log_fail(msg: &str) {
    println!("{} {}", "[FAIL]".red().bold(), msg);
}

pub fn save_screenshot(png: &[u8], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, png).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
