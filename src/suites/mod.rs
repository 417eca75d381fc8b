pub mod dashboard;
pub mod demo;
pub mod login;

use std::fmt;
use std::str::FromStr;
use anyhow::{anyhow, Result};
use crate::config::Config;
use crate::diagnostics::{self, Diagnostics};
use crate::driver::{Driver, LoadState};
use crate::expect;
use crate::fixtures::login::{EMAIL_FIELD, LOGIN_BUTTON, PASSWORD_FIELD};
use crate::fixtures::FAILURE_FRAGMENT;
use crate::runner::TestCase;
use crate::selector::{click_group, fill_group, resolve, Resolved, SelectorGroup};

/// Everything a case gets to work with.
pub struct Context<'a> {
    pub driver: &'a dyn Driver,
    pub config: &'a Config,
    pub diagnostics: &'a dyn Diagnostics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    Login,
    Dashboard,
    Demo,
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Suite::Login => "login",
            Suite::Dashboard => "dashboard",
            Suite::Demo => "demo",
        };
        f.write_str(name)
    }
}

impl FromStr for Suite {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "login" => Ok(Suite::Login),
            "dashboard" => Ok(Suite::Dashboard),
            "demo" => Ok(Suite::Demo),
            other => Err(anyhow!("unknown suite '{}'", other)),
        }
    }
}

impl Suite {
    pub fn cases(&self) -> Vec<TestCase> {
        match self {
            Suite::Login => login::cases(),
            Suite::Dashboard => dashboard::cases(),
            Suite::Demo => demo::cases(),
        }
    }
}

/// Cases for every suite named in the config, each suite once.
pub fn select(config: &Config, diag: &dyn Diagnostics) -> Vec<TestCase> {
    let mut chosen: Vec<Suite> = Vec::new();
    for name in &config.suites {
        match name.parse::<Suite>() {
            Ok(suite) if !chosen.contains(&suite) => chosen.push(suite),
            Ok(_) => {}
            Err(e) => diagnostics::warn(diag, format!("Skipping {}", e)),
        }
    }
    chosen.iter().flat_map(Suite::cases).collect()
}

// --- Shared steps ---

pub fn open_login_page(ctx: &Context<'_>) -> Result<()> {
    ctx.driver.goto(&ctx.config.urls.login)?;
    ctx.driver.wait_for_load(LoadState::NetworkIdle)
}

pub fn fill_login_form(ctx: &Context<'_>, email: &str, password: &str) -> Result<()> {
    fill_group(&EMAIL_FIELD, ctx.driver, email)?;
    fill_group(&PASSWORD_FIELD, ctx.driver, password)
}

pub fn submit_login(ctx: &Context<'_>) -> Result<()> {
    click_group(&LOGIN_BUTTON, ctx.driver)
}

/// Opens the login page, submits `email`/`password` and waits for the
/// network to settle. Where the page ends up is left to the caller.
pub fn login_as(ctx: &Context<'_>, email: &str, password: &str) -> Result<()> {
    open_login_page(ctx)?;
    fill_login_form(ctx, email, password)?;
    submit_login(ctx)?;
    ctx.driver.wait_for_load(LoadState::NetworkIdle)
}

pub fn require(ctx: &Context<'_>, group: &SelectorGroup) -> Result<Resolved> {
    resolve(group, ctx.driver, ctx.config.timeouts.element_visible, ctx.diagnostics)?
        .ok_or_else(|| anyhow!("no element found for {}", group))
}

/// `Some(verdict)` when the page bounced back to login, which ends the case
/// early: without a session there is nothing further to check.
pub fn bounced_to_login(ctx: &Context<'_>, what: &str) -> Option<Result<()>> {
    if !ctx.driver.url().contains(FAILURE_FRAGMENT) {
        return None;
    }
    diagnostics::warn(ctx.diagnostics, format!("Login failed - cannot test {}", what));
    diagnostics::warn(ctx.diagnostics, "Set TEST_EMAIL and TEST_PASSWORD to valid credentials");
    Some(expect::url_contains(ctx.driver, FAILURE_FRAGMENT))
}
