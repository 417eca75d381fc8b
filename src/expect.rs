use std::time::Duration;
use anyhow::{bail, ensure, Result};
use crate::driver::Driver;

const RETRY_STEP: Duration = Duration::from_millis(100);

const ERROR_CLASSES: [&str; 2] = ["ring-red-500", "border-red-500"];

/// Re-checks `probe` every step until it holds or `timeout` has been spent.
fn poll_until<F>(driver: &dyn Driver, timeout: Duration, mut probe: F) -> Result<bool>
where
    F: FnMut() -> Result<bool>,
{
    let mut waited = Duration::ZERO;
    loop {
        if probe()? {
            return Ok(true);
        }
        if waited >= timeout {
            return Ok(false);
        }
        driver.wait(RETRY_STEP);
        waited += RETRY_STEP;
    }
}

pub fn url_contains(driver: &dyn Driver, fragment: &str) -> Result<()> {
    let url = driver.url();
    ensure!(url.contains(fragment), "expected URL to contain {:?}, got {:?}", fragment, url);
    Ok(())
}

/// Case-insensitive: the title must contain one of `alternatives`.
pub fn title_matches_any(driver: &dyn Driver, alternatives: &[&str]) -> Result<()> {
    let title = driver.title()?;
    let lowered = title.to_lowercase();
    ensure!(
        alternatives.iter().any(|alt| lowered.contains(&alt.to_lowercase())),
        "expected title to match one of {:?}, got {:?}",
        alternatives,
        title
    );
    Ok(())
}

pub fn visible(driver: &dyn Driver, selector: &str, timeout: Duration) -> Result<()> {
    if !poll_until(driver, timeout, || driver.is_visible(selector))? {
        bail!("expected '{}' to be visible within {:?}", selector, timeout);
    }
    Ok(())
}

pub fn attribute_equals(driver: &dyn Driver, selector: &str, name: &str, expected: &str) -> Result<()> {
    let actual = driver.attribute(selector, name)?;
    ensure!(
        actual.as_deref() == Some(expected),
        "expected '{}' to have {}={:?}, got {:?}",
        selector,
        name,
        expected,
        actual
    );
    Ok(())
}

/// Error classes on the field or `aria-invalid="true"`.
pub fn has_error_styling(driver: &dyn Driver, selector: &str) -> Result<bool> {
    let classes = driver.class_list(selector)?;
    if classes
        .iter()
        .any(|c| ERROR_CLASSES.contains(&c.as_str()) || c.contains("error"))
    {
        return Ok(true);
    }
    Ok(driver.attribute(selector, "aria-invalid")?.as_deref() == Some("true"))
}

pub fn error_styling(driver: &dyn Driver, selector: &str, timeout: Duration) -> Result<()> {
    if !poll_until(driver, timeout, || has_error_styling(driver, selector))? {
        bail!("expected '{}' to show validation error styling within {:?}", selector, timeout);
    }
    Ok(())
}
