use std::fmt;
use std::time::Duration;
use anyhow::{anyhow, Result};
use crate::diagnostics::{Diagnostics, Event};
use crate::driver::Driver;
use crate::expect;

/// Alternative selectors for one UI region, most preferred first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorGroup {
    pub name: &'static str,
    pub selectors: &'static [&'static str],
}

impl SelectorGroup {
    pub const fn new(name: &'static str, selectors: &'static [&'static str]) -> Self {
        Self { name, selectors }
    }
}

impl fmt::Display for SelectorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.selectors.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub selector: &'static str,
}

/// First selector in `group` that matches at least one element.
pub fn first_present(group: &SelectorGroup, driver: &dyn Driver) -> Result<Option<&'static str>> {
    for selector in group.selectors.iter().copied() {
        if driver.count(selector)? > 0 {
            return Ok(Some(selector));
        }
    }
    Ok(None)
}

/// Resolves `group` to its first matching selector and checks that the first
/// match is visible. A group with no match is `Ok(None)`, not an error.
pub fn resolve(
    group: &SelectorGroup,
    driver: &dyn Driver,
    timeout: Duration,
    diagnostics: &dyn Diagnostics,
) -> Result<Option<Resolved>> {
    let Some(selector) = first_present(group, driver)? else {
        diagnostics.record(Event::SelectorLookup { region: group.name.to_string(), matched: None });
        return Ok(None);
    };
    expect::visible(driver, selector, timeout)?;
    diagnostics.record(Event::SelectorLookup {
        region: group.name.to_string(),
        matched: Some(selector.to_string()),
    });
    Ok(Some(Resolved { selector }))
}

pub fn fill_group(group: &SelectorGroup, driver: &dyn Driver, value: &str) -> Result<()> {
    let selector = first_present(group, driver)?.ok_or_else(|| anyhow!("no element found for {}", group))?;
    driver.fill(selector, value)
}

pub fn click_group(group: &SelectorGroup, driver: &dyn Driver) -> Result<()> {
    let selector = first_present(group, driver)?.ok_or_else(|| anyhow!("no element found for {}", group))?;
    driver.click(selector)
}
