use anyhow::{ensure, Result};
use crate::diagnostics::{self, Event};
use crate::driver::LoadState;
use crate::expect;
use crate::fixtures::login::*;
use crate::fixtures::{FAILURE_FRAGMENT, SUCCESS_FRAGMENT};
use crate::poll::{classify_login, PollBudget};
use crate::runner::TestCase;
use crate::selector::first_present;
use super::{fill_login_form, open_login_page, require, submit_login, Context, Suite};

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(Suite::Login, "should load login page successfully", loads_login_page),
        TestCase::new(Suite::Login, "should show error with invalid credentials", rejects_invalid_credentials),
        TestCase::new(Suite::Login, "should validate empty form submission", validates_empty_form),
        TestCase::new(Suite::Login, "should have forgot password link", has_forgot_password_link),
        TestCase::new(Suite::Login, "should keep special characters in credential fields", keeps_special_characters),
        TestCase::new(Suite::Login, "should login successfully with valid credentials", logs_in_with_valid_credentials),
    ]
}

fn loads_login_page(ctx: &Context<'_>) -> Result<()> {
    open_login_page(ctx)?;

    expect::title_matches_any(ctx.driver, EXPECTED_TITLES)?;
    require(ctx, &EMAIL_FIELD)?;
    require(ctx, &PASSWORD_FIELD)?;
    require(ctx, &LOGIN_BUTTON)?;
    Ok(())
}

fn rejects_invalid_credentials(ctx: &Context<'_>) -> Result<()> {
    open_login_page(ctx)?;
    fill_login_form(ctx, INVALID_USER.email, INVALID_USER.password)?;
    submit_login(ctx)?;
    ctx.driver.wait_for_load(LoadState::NetworkIdle)?;

    expect::url_contains(ctx.driver, FAILURE_FRAGMENT)?;

    // Styling is reported, not required: some builds only re-render the form.
    if let Some(email) = first_present(&EMAIL_FIELD, ctx.driver)? {
        let styled = expect::has_error_styling(ctx.driver, email).unwrap_or(false);
        diagnostics::info(ctx.diagnostics, format!("Email field error styling: {}", styled));
    }
    if let Some(sel) = first_present(&ERROR_MESSAGE, ctx.driver)? {
        if let Ok(Some(text)) = ctx.driver.text_content(sel) {
            diagnostics::info(ctx.diagnostics, format!("Error message: {}", text.trim()));
        }
    }
    Ok(())
}

fn validates_empty_form(ctx: &Context<'_>) -> Result<()> {
    open_login_page(ctx)?;
    submit_login(ctx)?;

    let email = require(ctx, &EMAIL_FIELD)?.selector;
    expect::error_styling(ctx.driver, email, ctx.config.timeouts.element_visible)?;
    expect::attribute_equals(ctx.driver, email, "type", "email")
}

fn has_forgot_password_link(ctx: &Context<'_>) -> Result<()> {
    open_login_page(ctx)?;
    require(ctx, &FORGOT_PASSWORD)?;
    Ok(())
}

fn keeps_special_characters(ctx: &Context<'_>) -> Result<()> {
    open_login_page(ctx)?;
    fill_login_form(ctx, SPECIAL_CHARS_USER.email, SPECIAL_CHARS_USER.password)?;

    let email = require(ctx, &EMAIL_FIELD)?.selector;
    let password = require(ctx, &PASSWORD_FIELD)?.selector;
    let typed_email = ctx.driver.input_value(email)?;
    let typed_password = ctx.driver.input_value(password)?;
    ensure!(
        typed_email == SPECIAL_CHARS_USER.email,
        "email field holds {:?}, expected {:?}",
        typed_email,
        SPECIAL_CHARS_USER.email
    );
    ensure!(typed_password == SPECIAL_CHARS_USER.password, "password field lost characters");
    Ok(())
}

fn logs_in_with_valid_credentials(ctx: &Context<'_>) -> Result<()> {
    let creds = &ctx.config.credentials;
    if !creds.is_valid {
        diagnostics::warn(ctx.diagnostics, "Using built-in credentials; set TEST_EMAIL and TEST_PASSWORD");
    }

    open_login_page(ctx)?;
    fill_login_form(ctx, &creds.email, &creds.password)?;
    submit_login(ctx)?;
    ctx.driver.wait_for_load(LoadState::NetworkIdle)?;

    let outcome = classify_login(ctx.driver, SUCCESS_FRAGMENT, FAILURE_FRAGMENT, PollBudget::default(), ctx.diagnostics);

    if outcome.is_success() {
        if let Some(sel) = first_present(&SUCCESS_INDICATOR, ctx.driver)? {
            ctx.diagnostics.record(Event::SelectorLookup {
                region: SUCCESS_INDICATOR.name.to_string(),
                matched: Some(sel.to_string()),
            });
        }
    } else if ctx.driver.url().contains(FAILURE_FRAGMENT) {
        for sel in POST_SUBMIT_ERRORS {
            if !ctx.driver.is_visible(sel).unwrap_or(false) {
                continue;
            }
            if let Ok(Some(text)) = ctx.driver.text_content(sel) {
                diagnostics::error(ctx.diagnostics, format!("Login error shown ({}): {}", sel, text.trim()));
            }
        }
    }

    expect::url_contains(ctx.driver, "/dashboard")
}
