use std::fmt;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use anyhow::Result;
use crate::config::{DEMO_EVIDENCE_PNG, FAIL_EVIDENCE_PNG};
use crate::diagnostics::{self, Event};
use crate::expect;
use crate::fixtures::login::{User, DEMO_USER, EMAIL_FIELD, LOGIN_BUTTON, PASSWORD_FIELD, REPORT_ERRORS, WRONG_USER};
use crate::fixtures::{FAILURE_FRAGMENT, SUCCESS_FRAGMENT};
use crate::runner::TestCase;
use crate::selector::first_present;
use super::{login_as, Context, Suite};

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(Suite::Demo, "demo: login report with demo credentials", reports_demo_login),
        TestCase::new(Suite::Demo, "demo: screenshot evidence for login scenario", captures_demo_evidence),
        TestCase::new(Suite::Demo, "demo: login fails with wrong credentials", fails_with_wrong_credentials),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Landing {
    Login,
    Dashboard,
    Elsewhere(String),
}

impl Landing {
    pub fn of(url: &str) -> Self {
        if url.contains(FAILURE_FRAGMENT) {
            Landing::Login
        } else if url.contains(SUCCESS_FRAGMENT) {
            Landing::Dashboard
        } else {
            Landing::Elsewhere(url.to_string())
        }
    }
}

impl fmt::Display for Landing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Landing::Login => f.write_str("LOGIN FAILED - user remained on login page"),
            Landing::Dashboard => f.write_str("LOGIN SUCCESSFUL - user redirected to dashboard"),
            Landing::Elsewhere(url) => write!(f, "UNEXPECTED REDIRECT - {}", url),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub email_visible: bool,
    pub email_enabled: bool,
    pub email_value: String,
    pub password_visible: bool,
    pub password_enabled: bool,
    pub password_value: String,
    pub button_visible: bool,
    pub button_enabled: bool,
    pub button_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub timestamp: u64,
    pub email: String,
    pub url: String,
    pub title: String,
    pub landing: Landing,
    pub errors: Vec<String>,
    /// `None` once the form is gone.
    pub form: Option<FormState>,
    pub recommendations: Vec<String>,
}

fn read_form(ctx: &Context<'_>) -> Result<Option<FormState>> {
    let d = ctx.driver;
    let email = match first_present(&EMAIL_FIELD, d)? {
        Some(sel) => sel,
        None => return Ok(None),
    };
    let mut form = FormState {
        email_visible: d.is_visible(email)?,
        email_enabled: d.is_enabled(email)?,
        email_value: d.input_value(email)?,
        ..FormState::default()
    };
    if let Some(sel) = first_present(&PASSWORD_FIELD, d)? {
        form.password_visible = d.is_visible(sel)?;
        form.password_enabled = d.is_enabled(sel)?;
        form.password_value = d.input_value(sel)?;
    }
    if let Some(sel) = first_present(&LOGIN_BUTTON, d)? {
        form.button_visible = d.is_visible(sel)?;
        form.button_enabled = d.is_enabled(sel)?;
        form.button_text = d.text_content(sel)?.map(|t| t.trim().to_string());
    }
    Ok(Some(form))
}

pub fn build_report(ctx: &Context<'_>, user: &User) -> Result<ErrorReport> {
    let url = ctx.driver.url();
    let landing = Landing::of(&url);

    let mut errors = vec![match &landing {
        Landing::Login => "Login failed - still on login page".to_string(),
        Landing::Dashboard => "Login appeared successful - redirected to dashboard".to_string(),
        Landing::Elsewhere(url) => format!("Unexpected redirect to: {}", url),
    }];
    for sel in REPORT_ERRORS {
        if ctx.driver.count(sel)? == 0 {
            continue;
        }
        if let Some(text) = ctx.driver.text_content(sel)? {
            let text = text.trim();
            if !text.is_empty() {
                errors.push(format!("Error message: {}", text));
            }
        }
    }

    let form = read_form(ctx)?;

    let mut recommendations = Vec::new();
    if landing == Landing::Login {
        if errors.len() == 1 {
            recommendations.extend(
                [
                    "No error messages displayed - possible server-side issue",
                    "Check backend logs for authentication errors",
                    "Verify database connectivity",
                    "Check if authentication service is running",
                ]
                .map(String::from),
            );
        }
        if let Some(form) = &form {
            if form.email_value == user.email {
                recommendations.push("Form preserved email - indicates client-side processing worked".to_string());
            }
            if !form.button_enabled {
                recommendations
                    .push("Login button disabled - form may be processing or have validation errors".to_string());
            }
        }
    }

    Ok(ErrorReport {
        timestamp: SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs(),
        email: user.email.to_string(),
        url,
        title: ctx.driver.title()?,
        landing,
        errors,
        form,
        recommendations,
    })
}

fn record_report(ctx: &Context<'_>, report: &ErrorReport) {
    let say = |msg: String| diagnostics::info(ctx.diagnostics, msg);
    say(format!("Report @ {} for {}", report.timestamp, report.email));
    say(format!("  URL: {}", report.url));
    say(format!("  Title: {}", report.title));
    match &report.form {
        Some(f) => {
            say(format!(
                "  Email field: {} | {} | {:?}",
                if f.email_visible { "Visible" } else { "Hidden" },
                if f.email_enabled { "Enabled" } else { "Disabled" },
                f.email_value
            ));
            say(format!(
                "  Password field: {} | {} | {} chars",
                if f.password_visible { "Visible" } else { "Hidden" },
                if f.password_enabled { "Enabled" } else { "Disabled" },
                f.password_value.chars().count()
            ));
            say(format!(
                "  Login button: {} | {} | {:?}",
                if f.button_visible { "Visible" } else { "Hidden" },
                if f.button_enabled { "Enabled" } else { "Disabled" },
                f.button_text.as_deref().unwrap_or("")
            ));
        }
        None => say("  Form not available (redirected successfully)".to_string()),
    }
    for error in &report.errors {
        say(format!("  - {}", error));
    }
    for rec in &report.recommendations {
        say(format!("  > {}", rec));
    }
    say(format!("  Result: {}", report.landing));
}

fn expect_where_it_landed(ctx: &Context<'_>) -> Result<()> {
    if ctx.driver.url().contains(FAILURE_FRAGMENT) {
        expect::url_contains(ctx.driver, "/login")
    } else {
        expect::url_contains(ctx.driver, "/dashboard")
    }
}

fn capture(ctx: &Context<'_>, path: &str) -> Result<()> {
    let path = Path::new(path);
    ctx.driver.screenshot(path, true)?;
    ctx.diagnostics.record(Event::ScreenshotSaved(path.to_path_buf()));
    Ok(())
}

fn reports_demo_login(ctx: &Context<'_>) -> Result<()> {
    login_as(ctx, DEMO_USER.email, DEMO_USER.password)?;

    let report = build_report(ctx, &DEMO_USER)?;
    record_report(ctx, &report);

    expect_where_it_landed(ctx)
}

fn captures_demo_evidence(ctx: &Context<'_>) -> Result<()> {
    login_as(ctx, DEMO_USER.email, DEMO_USER.password)?;
    capture(ctx, DEMO_EVIDENCE_PNG)?;
    expect_where_it_landed(ctx)
}

/// Deliberately failing scenario: wrong credentials never reach the dashboard.
fn fails_with_wrong_credentials(ctx: &Context<'_>) -> Result<()> {
    login_as(ctx, WRONG_USER.email, WRONG_USER.password)?;

    let url = ctx.driver.url();
    diagnostics::info(ctx.diagnostics, format!("Current URL: {}", url));
    diagnostics::info(ctx.diagnostics, format!("Page title: {}", ctx.driver.title()?));
    capture(ctx, FAIL_EVIDENCE_PNG)?;
    diagnostics::info(ctx.diagnostics, format!("Result: {}", Landing::of(&url)));

    expect::url_contains(ctx.driver, "/dashboard")
}
