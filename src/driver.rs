use std::fmt;
use std::path::Path;
use std::time::Duration;
use anyhow::Result;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Load,
    NetworkIdle,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadState::Load => "load",
            LoadState::NetworkIdle => "networkidle",
        };
        f.write_str(name)
    }
}

/// One browser page. Element queries act on the first match of `selector`.
pub trait Driver {
    fn goto(&self, url: &str) -> Result<()>;
    fn reload(&self) -> Result<()>;
    fn wait_for_load(&self, state: LoadState) -> Result<()>;

    fn fill(&self, selector: &str, value: &str) -> Result<()>;
    fn click(&self, selector: &str) -> Result<()>;

    fn count(&self, selector: &str) -> Result<usize>;
    fn is_visible(&self, selector: &str) -> Result<bool>;
    fn is_enabled(&self, selector: &str) -> Result<bool>;
    fn text_content(&self, selector: &str) -> Result<Option<String>>;
    fn input_value(&self, selector: &str) -> Result<String>;

    /// Calls `function` (JS source taking the element) on the first match.
    /// `None` when nothing matches.
    fn evaluate(&self, selector: &str, function: &str) -> Result<Option<Value>>;

    fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let function = format!("el => el.getAttribute({})", Value::from(name));
        Ok(self
            .evaluate(selector, &function)?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    fn class_list(&self, selector: &str) -> Result<Vec<String>> {
        let value = self.evaluate(selector, "el => Array.from(el.classList)")?;
        Ok(match value {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        })
    }

    fn screenshot(&self, path: &Path, full_page: bool) -> Result<()>;
    fn url(&self) -> String;
    fn title(&self) -> Result<String>;

    /// Plain wait, the poll tick of every loop in this crate.
    fn wait(&self, duration: Duration);
}

/// Hands out a fresh page per test case.
pub trait DriverFactory: Send + Sync {
    fn open(&self) -> Result<Box<dyn Driver>>;
}
