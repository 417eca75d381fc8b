//! In-memory page used by unit tests in place of Chromium.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use anyhow::{bail, Result};
use serde_json::Value;
use crate::driver::{Driver, DriverFactory, LoadState};

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub count: usize,
    pub visible: bool,
    pub enabled: bool,
    pub text: Option<String>,
    pub value: String,
    pub classes: Vec<String>,
    pub attrs: HashMap<String, String>,
    /// Becomes visible after this many waits.
    pub visible_after: Option<usize>,
}

impl FakeElement {
    pub fn visible() -> Self {
        Self { count: 1, visible: true, enabled: true, ..Self::default() }
    }

    pub fn hidden() -> Self {
        Self { count: 1, visible: false, enabled: true, ..Self::default() }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn classes(mut self, classes: &[&str]) -> Self {
        self.classes = classes.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn shows_after(mut self, waits: usize) -> Self {
        self.visible = false;
        self.visible_after = Some(waits);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClickEffect {
    pub url: Option<String>,
    pub timeline: Vec<String>,
    pub elements: Vec<(String, FakeElement)>,
}

#[derive(Debug, Default)]
struct State {
    url: String,
    title: String,
    timeline: VecDeque<String>,
    redirects: HashMap<String, String>,
    clicks: HashMap<String, ClickEffect>,
    elements: HashMap<String, FakeElement>,
    actions: Vec<String>,
    waits: Vec<Duration>,
    screenshots: Vec<(PathBuf, bool)>,
}

#[derive(Debug, Default)]
pub struct ScriptedDriver {
    state: Mutex<State>,
}

impl ScriptedDriver {
    pub fn at(url: &str) -> Self {
        let driver = Self::default();
        driver.lock().url = url.to_string();
        driver
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// URLs handed out one per `wait`; the last one sticks.
    pub fn push_timeline(&self, urls: &[&str]) {
        self.lock().timeline.extend(urls.iter().map(|u| u.to_string()));
    }

    pub fn redirect(&self, from: &str, to: &str) {
        self.lock().redirects.insert(from.to_string(), to.to_string());
    }

    pub fn on_click(&self, selector: &str, effect: ClickEffect) {
        self.lock().clicks.insert(selector.to_string(), effect);
    }

    pub fn set_element(&self, selector: &str, element: FakeElement) {
        self.lock().elements.insert(selector.to_string(), element);
    }

    pub fn set_title(&self, title: &str) {
        self.lock().title = title.to_string();
    }

    pub fn actions(&self) -> Vec<String> {
        self.lock().actions.clone()
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.lock().waits.clone()
    }

    pub fn screenshots(&self) -> Vec<(PathBuf, bool)> {
        self.lock().screenshots.clone()
    }

    fn element(&self, selector: &str) -> Option<FakeElement> {
        self.lock().elements.get(selector).filter(|e| e.count > 0).cloned()
    }
}

impl Driver for ScriptedDriver {
    fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.lock();
        state.actions.push(format!("goto {}", url));
        let landing = state.redirects.get(url).cloned().unwrap_or_else(|| url.to_string());
        state.url = landing;
        Ok(())
    }

    fn reload(&self) -> Result<()> {
        self.lock().actions.push("reload".to_string());
        Ok(())
    }

    fn wait_for_load(&self, state: LoadState) -> Result<()> {
        self.lock().actions.push(format!("wait_for_load {}", state));
        Ok(())
    }

    fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let mut state = self.lock();
        match state.elements.get_mut(selector).filter(|e| e.count > 0) {
            Some(el) => el.value = value.to_string(),
            None => bail!("no element matches '{}'", selector),
        }
        state.actions.push(format!("fill {} {}", selector, value));
        Ok(())
    }

    fn click(&self, selector: &str) -> Result<()> {
        let mut state = self.lock();
        if !state.elements.get(selector).map_or(false, |e| e.count > 0) {
            bail!("no element matches '{}'", selector);
        }
        state.actions.push(format!("click {}", selector));
        if let Some(effect) = state.clicks.get(selector).cloned() {
            if let Some(url) = effect.url {
                state.url = url;
            }
            state.timeline.extend(effect.timeline);
            for (sel, el) in effect.elements {
                state.elements.insert(sel, el);
            }
        }
        Ok(())
    }

    fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.lock().elements.get(selector).map_or(0, |e| e.count))
    }

    fn is_visible(&self, selector: &str) -> Result<bool> {
        Ok(self.element(selector).map_or(false, |e| e.visible))
    }

    fn is_enabled(&self, selector: &str) -> Result<bool> {
        Ok(self.element(selector).map_or(false, |e| e.enabled))
    }

    fn text_content(&self, selector: &str) -> Result<Option<String>> {
        Ok(self.element(selector).and_then(|e| e.text))
    }

    fn input_value(&self, selector: &str) -> Result<String> {
        match self.element(selector) {
            Some(el) => Ok(el.value),
            None => bail!("no element matches '{}'", selector),
        }
    }

    fn evaluate(&self, selector: &str, _function: &str) -> Result<Option<Value>> {
        Ok(self.element(selector).map(|_| Value::Null))
    }

    fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        Ok(self.element(selector).and_then(|e| e.attrs.get(name).cloned()))
    }

    fn class_list(&self, selector: &str) -> Result<Vec<String>> {
        Ok(self.element(selector).map(|e| e.classes).unwrap_or_default())
    }

    fn screenshot(&self, path: &Path, full_page: bool) -> Result<()> {
        self.lock().screenshots.push((path.to_path_buf(), full_page));
        Ok(())
    }

    fn url(&self) -> String {
        self.lock().url.clone()
    }

    fn title(&self) -> Result<String> {
        Ok(self.lock().title.clone())
    }

    fn wait(&self, duration: Duration) {
        let mut state = self.lock();
        state.waits.push(duration);
        if let Some(next) = state.timeline.pop_front() {
            state.url = next;
        }
        let waited = state.waits.len();
        for el in state.elements.values_mut() {
            if el.visible_after.map_or(false, |n| waited >= n) {
                el.visible = true;
            }
        }
    }
}

pub struct ScriptedFactory {
    build: Arc<dyn Fn() -> Result<ScriptedDriver> + Send + Sync>,
}

impl ScriptedFactory {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn() -> Result<ScriptedDriver> + Send + Sync + 'static,
    {
        Self { build: Arc::new(build) }
    }
}

impl DriverFactory for ScriptedFactory {
    fn open(&self) -> Result<Box<dyn Driver>> {
        Ok(Box::new((self.build)()?))
    }
}

pub const BASE: &str = "https://app.test";
pub const LOGIN_URL: &str = "https://app.test/login";
pub const DASHBOARD_URL: &str = "https://app.test/dashboard";

pub const EMAIL_INPUT: &str = "input[type=\"email\"]";
pub const PASSWORD_INPUT: &str = "input[type=\"password\"]";
pub const SUBMIT_BUTTON: &str = "button[type=\"submit\"]";

pub fn test_config() -> crate::config::Config {
    crate::config::Config::from_lookup(|key| {
        let value = match key {
            "BASE_URL" => BASE,
            "TEST_EMAIL" => "qa@example.com",
            "TEST_PASSWORD" => "s3cret",
            _ => return None,
        };
        Some(value.to_string())
    })
}

/// A login form the way the portal renders it.
pub fn login_page() -> ScriptedDriver {
    let driver = ScriptedDriver::at("about:blank");
    driver.set_title("Login | Hydra Translate Client");
    driver.set_element(EMAIL_INPUT, FakeElement::visible().attr("type", "email"));
    driver.set_element(PASSWORD_INPUT, FakeElement::visible().attr("type", "password"));
    driver.set_element(SUBMIT_BUTTON, FakeElement::visible().text("Sign in"));
    driver
}
