mod browser;
mod config;
mod diagnostics;
mod driver;
mod expect;
mod fixtures;
mod poll;
mod runner;
mod selector;
mod suites;
mod utils;

#[cfg(test)]
mod testing;

use std::process::ExitCode;
use std::sync::Arc;
use browser::{launch_browser, ChromeLauncher};
use colored::*;
use config::Config;
use diagnostics::{ConsoleSink, Diagnostics};
use utils::{log_error, log_info, log_warn, setup_env};

fn warn_about_credentials(config: &Config, diag: &dyn Diagnostics) {
    let missing = config.missing_credentials();
    if missing.is_empty() {
        return;
    }
    diagnostics::warn(diag, format!("Missing environment variables: {}", missing.join(", ")));
    diagnostics::warn(diag, "Some tests may fail without proper credentials");
    diagnostics::warn(diag, "Running tests without valid credentials");
}

#[tokio::main]
async fn main() -> ExitCode {
    println!("{}", "======================================".cyan().bold());
    println!("{}", "        PORTAL E2E - LOGIN SUITE      ".cyan().bold());
    println!("{}", "======================================".cyan().bold());

    if let Err(e) = setup_env() {
        log_error(&format!("{:#}", e));
        return ExitCode::FAILURE;
    }

    let config = Arc::new(Config::from_env());
    let diagnostics: Arc<dyn Diagnostics> = Arc::new(ConsoleSink { verbose: config.verbose });

    log_info(&format!("Target: {} ({:?})", config.base_url, config.environment));
    if config.environment.is_production() {
        log_warn("Running against production");
    }
    warn_about_credentials(&config, diagnostics.as_ref());

    let cases = suites::select(&config, diagnostics.as_ref());
    if cases.is_empty() {
        log_error("No test cases selected. Check E2E_SUITES.");
        return ExitCode::FAILURE;
    }
    log_info(&format!("Running {} cases on {} worker(s)", cases.len(), config.workers));

    let browser = match launch_browser(&config.browser) {
        Ok(browser) => browser,
        Err(e) => {
            log_error(&format!("{:#}", e));
            return ExitCode::FAILURE;
        }
    };
    let factory = Arc::new(ChromeLauncher::new(browser, &config.browser, config.timeouts));

    let summary = runner::run(cases, factory, config.clone(), diagnostics).await;

    let failed: Vec<_> = summary.failed().collect();
    println!();
    log_info(&format!("{} passed, {} failed", summary.passed(), failed.len()));
    for result in &failed {
        log_error(&format!("[{}] {}", result.suite, result.name));
    }

    if summary.success() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
