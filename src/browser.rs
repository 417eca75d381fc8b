use headless_chrome::protocol::cdp::Page::{CaptureScreenshotFormatOption, Viewport};
use headless_chrome::protocol::cdp::Runtime::RemoteObjectSubtype;
use headless_chrome::{Browser, LaunchOptions, Tab};
use anyhow::{anyhow, bail, Result};
use serde_json::Value;
use std::ffi::OsStr;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use crate::config::{BrowserSettings, Timeouts, USER_AGENT, WINDOW_SIZE};
use crate::driver::{Driver, DriverFactory, LoadState};
use crate::utils::save_screenshot;

const CANDIDATES: [&str; 3] = ["chromium", "chromium-browser", "google-chrome"];
const SETTLE_STEP: Duration = Duration::from_millis(100);
const QUIET_WINDOW: Duration = Duration::from_millis(500);

const VISIBLE_FN: &str = "el => { const r = el.getBoundingClientRect(); const s = window.getComputedStyle(el); \
    return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none'; }";

fn find_chromium_path(settings: &BrowserSettings) -> Option<PathBuf> {
    if let Some(path) = &settings.chrome_path {
        return Some(PathBuf::from(path));
    }
    for name in CANDIDATES {
        if let Ok(output) = Command::new("which").arg(name).output() {
            if output.status.success() {
                let s = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !s.is_empty() { return Some(PathBuf::from(s)); }
            }
        }
    }
    // Fall through to headless_chrome's own lookup.
    None
}

pub fn launch_browser(settings: &BrowserSettings) -> Result<Browser> {
    let path = find_chromium_path(settings);
    let ua_arg = format!("--user-agent={}", USER_AGENT);

    let random_id: u32 = rand::random();
    let temp_dir = std::env::temp_dir().join(format!("chrome_portal_e2e_{}", random_id));
    let user_data_arg = format!("--user-data-dir={}", temp_dir.to_string_lossy());

    let args_vec = vec![
        "--no-sandbox",
        "--disable-setuid-sandbox",
        "--disable-dev-shm-usage",
        "--disable-gpu",
        "--ignore-certificate-errors",
        "--disable-default-apps",
        "--disable-extensions",
        "--disable-sync",
        "--no-first-run",
        &user_data_arg,
        &ua_arg,
    ];

    let options = LaunchOptions {
        headless: settings.headless,
        sandbox: false,
        path,
        window_size: Some(WINDOW_SIZE),
        enable_gpu: false,
        idle_browser_timeout: Duration::from_secs(300),
        args: args_vec.iter().map(|s| OsStr::new(s)).collect(),
        ..Default::default()
    };

    Browser::new(options).map_err(|e| anyhow!("Browser Launch Failed: {}. \nTip: set CHROME_PATH to a Chromium binary.", e))
}

/// Polls `ready` every `step` until it holds or `timeout` runs out.
/// An error counts as "not yet": evaluations fail while a navigation swaps the document.
fn wait_until<F>(what: impl Display, timeout: Duration, step: Duration, mut ready: F) -> Result<()>
where
    F: FnMut() -> Result<bool>,
{
    let start = Instant::now();
    let mut last_error = None;
    loop {
        match ready() {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => last_error = Some(e),
        }
        if start.elapsed() > timeout {
            let msg = format!("Timed out after {:?} waiting for {}", timeout, what);
            return Err(match last_error {
                Some(e) => e.context(msg),
                None => anyhow!(msg),
            });
        }
        thread::sleep(step);
    }
}

/// Network idle: `readyState` is complete and the resource count has not
/// moved for `quiet`. `sample` yields `(readyState, resource count)`.
fn settled<S>(mut sample: S, quiet: Duration, timeout: Duration, step: Duration) -> Result<()>
where
    S: FnMut() -> Result<(String, u64)>,
{
    let mut last = None;
    let mut quiet_since = Instant::now();
    wait_until(LoadState::NetworkIdle, timeout, step, || {
        let (state, count) = sample().map_err(|e| {
            last = None;
            e
        })?;
        if state != "complete" {
            last = None;
            return Ok(false);
        }
        if last != Some(count) {
            last = Some(count);
            quiet_since = Instant::now();
        }
        Ok(quiet_since.elapsed() >= quiet)
    })
}

/// Unpacks a `JSON.stringify`'d evaluation result. `thrown` is the description
/// of an exception the page raised instead.
fn decode_json(value: Option<Value>, thrown: Option<String>) -> Result<Value> {
    if let Some(description) = thrown {
        bail!("page script failed: {}", description);
    }
    match value {
        Some(Value::String(json)) => Ok(serde_json::from_str(&json)?),
        _ => Ok(Value::Null),
    }
}

/// Opens one tab per test case on a shared browser.
pub struct ChromeLauncher {
    browser: Browser,
    slow_mo: Duration,
    timeouts: Timeouts,
}

impl ChromeLauncher {
    pub fn new(browser: Browser, settings: &BrowserSettings, timeouts: Timeouts) -> Self {
        Self { browser, slow_mo: settings.slow_mo, timeouts }
    }
}

impl DriverFactory for ChromeLauncher {
    fn open(&self) -> Result<Box<dyn Driver>> {
        let tab = self.browser.new_tab()?;
        tab.set_default_timeout(self.timeouts.navigation);
        Ok(Box::new(ChromeDriver { tab, slow_mo: self.slow_mo, timeouts: self.timeouts }))
    }
}

pub struct ChromeDriver {
    tab: Arc<Tab>,
    slow_mo: Duration,
    timeouts: Timeouts,
}

impl ChromeDriver {
    fn pace(&self) {
        if !self.slow_mo.is_zero() {
            thread::sleep(self.slow_mo);
        }
    }

    /// Evaluates `expression` and returns its value as JSON.
    fn eval_json(&self, expression: &str) -> Result<Value> {
        let script = format!("JSON.stringify(({}) ?? null)", expression);
        let result = self.tab.evaluate(&script, false)?;
        let thrown = match result.subtype {
            Some(RemoteObjectSubtype::Error) => Some(result.description.unwrap_or_else(|| "unknown error".to_string())),
            _ => None,
        };
        decode_json(result.value, thrown)
    }

    fn query(&self, selector: &str, function: &str) -> Result<Option<Value>> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); \
             return el ? {{ found: true, value: ({})(el) ?? null }} : {{ found: false }}; }})()",
            Value::from(selector),
            function
        );
        let result = self.eval_json(&script)?;
        if result["found"].as_bool() == Some(true) {
            Ok(Some(result["value"].clone()))
        } else {
            Ok(None)
        }
    }

    fn ready_state(&self) -> Result<String> {
        Ok(self.eval_json("document.readyState")?.as_str().unwrap_or_default().to_string())
    }

    fn resource_count(&self) -> Result<u64> {
        Ok(self.eval_json("performance.getEntriesByType('resource').length")?.as_u64().unwrap_or(0))
    }
}

impl Drop for ChromeDriver {
    fn drop(&mut self) {
        let _ = self.tab.close(false);
    }
}

impl Driver for ChromeDriver {
    fn goto(&self, url: &str) -> Result<()> {
        self.pace();
        self.tab.navigate_to(url)?;
        self.tab.wait_until_navigated()?;
        Ok(())
    }

    fn reload(&self) -> Result<()> {
        self.pace();
        self.tab.reload(false, None)?;
        self.tab.wait_until_navigated()?;
        Ok(())
    }

    fn wait_for_load(&self, state: LoadState) -> Result<()> {
        match state {
            LoadState::Load => wait_until(state, self.timeouts.page_load, SETTLE_STEP, || {
                Ok(self.ready_state()? == "complete")
            }),
            LoadState::NetworkIdle => settled(
                || Ok((self.ready_state()?, self.resource_count()?)),
                QUIET_WINDOW,
                self.timeouts.network_idle,
                SETTLE_STEP,
            ),
        }
    }

    fn fill(&self, selector: &str, value: &str) -> Result<()> {
        self.pace();
        let cleared = self.query(selector, "el => { el.focus(); el.value = ''; el.dispatchEvent(new Event('input', { bubbles: true })); return true; }")?;
        if cleared.is_none() {
            bail!("no element matches '{}'", selector);
        }
        self.tab.find_element(selector)?.type_into(value)?;
        Ok(())
    }

    fn click(&self, selector: &str) -> Result<()> {
        self.pace();
        self.tab.find_element(selector)?.click()?;
        Ok(())
    }

    fn count(&self, selector: &str) -> Result<usize> {
        let script = format!("document.querySelectorAll({}).length", Value::from(selector));
        Ok(self.eval_json(&script)?.as_u64().unwrap_or(0) as usize)
    }

    fn is_visible(&self, selector: &str) -> Result<bool> {
        Ok(self.query(selector, VISIBLE_FN)?.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    fn is_enabled(&self, selector: &str) -> Result<bool> {
        Ok(self.query(selector, "el => !el.disabled")?.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    fn text_content(&self, selector: &str) -> Result<Option<String>> {
        Ok(self
            .query(selector, "el => el.textContent")?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    fn input_value(&self, selector: &str) -> Result<String> {
        match self.query(selector, "el => el.value ?? ''")? {
            Some(v) => Ok(v.as_str().unwrap_or_default().to_string()),
            None => bail!("no element matches '{}'", selector),
        }
    }

    fn evaluate(&self, selector: &str, function: &str) -> Result<Option<Value>> {
        self.query(selector, function)
    }

    fn screenshot(&self, path: &Path, full_page: bool) -> Result<()> {
        let clip = if full_page {
            let size = self.eval_json(
                "({ width: document.documentElement.scrollWidth, height: document.documentElement.scrollHeight })",
            )?;
            Some(Viewport {
                x: 0.0,
                y: 0.0,
                width: size["width"].as_f64().unwrap_or(WINDOW_SIZE.0 as f64),
                height: size["height"].as_f64().unwrap_or(WINDOW_SIZE.1 as f64),
                scale: 1.0,
            })
        } else {
            None
        };
        let png = self.tab.capture_screenshot(CaptureScreenshotFormatOption::Png, None, clip, true)?;
        save_screenshot(&png, path)
    }

    fn url(&self) -> String {
        self.tab.get_url()
    }

    fn title(&self) -> Result<String> {
        self.tab.get_title()
    }

    fn wait(&self, duration: Duration) {
        thread::sleep(duration);
    }
}
