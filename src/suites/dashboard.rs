use anyhow::Result;
use crate::diagnostics::{self, Event};
use crate::driver::LoadState;
use crate::expect;
use crate::fixtures::dashboard::*;
use crate::fixtures::{FAILURE_FRAGMENT, SUCCESS_FRAGMENT};
use crate::runner::TestCase;
use crate::selector::{first_present, resolve, SelectorGroup};
use super::{bounced_to_login, login_as, Context, Suite};

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(Suite::Dashboard, "should access dashboard after successful login", accesses_dashboard),
        TestCase::new(Suite::Dashboard, "should display dashboard header and navigation", shows_header_and_navigation),
        TestCase::new(Suite::Dashboard, "should display user profile information", shows_user_profile),
        TestCase::new(Suite::Dashboard, "should have logout functionality", has_logout),
        TestCase::new(Suite::Dashboard, "should display main dashboard content", shows_main_content),
        TestCase::new(Suite::Dashboard, "should display dashboard statistics or widgets", shows_widgets_and_statistics),
        TestCase::new(Suite::Dashboard, "should report optional dashboard regions", reports_optional_regions),
        TestCase::new(Suite::Dashboard, "should handle dashboard page refresh", survives_refresh),
        TestCase::new(Suite::Dashboard, "should navigate to dashboard from other pages", navigates_from_other_pages),
        TestCase::new(Suite::Dashboard, "should prevent access to dashboard without login", guards_anonymous_access),
    ]
}

fn open_dashboard(ctx: &Context<'_>) -> Result<()> {
    let creds = &ctx.config.credentials;
    login_as(ctx, &creds.email, &creds.password)?;
    ctx.driver.goto(&ctx.config.urls.dashboard)?;
    ctx.driver.wait_for_load(LoadState::NetworkIdle)
}

fn found(ctx: &Context<'_>, group: &SelectorGroup) -> Result<bool> {
    Ok(resolve(group, ctx.driver, ctx.config.timeouts.element_visible, ctx.diagnostics)?.is_some())
}

fn accesses_dashboard(ctx: &Context<'_>) -> Result<()> {
    open_dashboard(ctx)?;
    diagnostics::info(ctx.diagnostics, format!("Current URL after login attempt: {}", ctx.driver.url()));
    if let Some(verdict) = bounced_to_login(ctx, "dashboard access") {
        return verdict;
    }

    expect::url_contains(ctx.driver, "/dashboard")?;
    expect::title_matches_any(ctx.driver, EXPECTED_TITLES)?;
    expect::visible(ctx.driver, BODY, ctx.config.timeouts.element_visible)
}

fn shows_header_and_navigation(ctx: &Context<'_>) -> Result<()> {
    open_dashboard(ctx)?;
    if let Some(verdict) = bounced_to_login(ctx, "dashboard header/navigation") {
        return verdict;
    }

    let header = found(ctx, &HEADER)?;
    let nav = found(ctx, &NAVIGATION)?;
    diagnostics::info(ctx.diagnostics, format!("Header found: {} Navigation found: {}", header, nav));
    Ok(())
}

fn shows_user_profile(ctx: &Context<'_>) -> Result<()> {
    open_dashboard(ctx)?;
    if let Some(verdict) = bounced_to_login(ctx, "user profile") {
        return verdict;
    }

    let profile = found(ctx, &USER_PROFILE)?;
    diagnostics::info(ctx.diagnostics, format!("User profile information found: {}", profile));
    Ok(())
}

fn has_logout(ctx: &Context<'_>) -> Result<()> {
    open_dashboard(ctx)?;
    if let Some(verdict) = bounced_to_login(ctx, "logout functionality") {
        return verdict;
    }

    let logout = resolve(&LOGOUT_BUTTON, ctx.driver, ctx.config.timeouts.element_visible, ctx.diagnostics)?;
    diagnostics::info(ctx.diagnostics, format!("Logout functionality found: {}", logout.is_some()));
    if let Some(resolved) = logout {
        let label = ctx.driver.text_content(resolved.selector)?.unwrap_or_default().to_lowercase();
        if !LOGOUT_TEXT.iter().any(|t| label.contains(t)) {
            diagnostics::warn(ctx.diagnostics, format!("Logout control has unexpected label {:?}", label.trim()));
        }
    }
    Ok(())
}

fn shows_main_content(ctx: &Context<'_>) -> Result<()> {
    open_dashboard(ctx)?;
    if let Some(verdict) = bounced_to_login(ctx, "main dashboard content") {
        return verdict;
    }

    let content = found(ctx, &MAIN_CONTENT)?;
    diagnostics::info(ctx.diagnostics, format!("Main dashboard content found: {}", content));
    Ok(())
}

fn shows_widgets_and_statistics(ctx: &Context<'_>) -> Result<()> {
    open_dashboard(ctx)?;
    if let Some(verdict) = bounced_to_login(ctx, "dashboard statistics/widgets") {
        return verdict;
    }

    let widgets = found(ctx, &WIDGETS)?;
    let stats = found(ctx, &STATISTICS)?;
    diagnostics::info(ctx.diagnostics, format!("Dashboard widgets found: {} Statistics found: {}", widgets, stats));
    Ok(())
}

/// Looks for every optional region without requiring any of them to be visible.
fn reports_optional_regions(ctx: &Context<'_>) -> Result<()> {
    open_dashboard(ctx)?;
    if let Some(verdict) = bounced_to_login(ctx, "optional dashboard regions") {
        return verdict;
    }

    for group in OPTIONAL_REGIONS {
        let matched = match first_present(group, ctx.driver)? {
            Some(sel) if ctx.driver.is_visible(sel)? => Some(sel.to_string()),
            _ => None,
        };
        ctx.diagnostics.record(Event::SelectorLookup { region: group.name.to_string(), matched });
    }

    if let Some(sel) = first_present(&WELCOME_MESSAGE, ctx.driver)? {
        let text = ctx.driver.text_content(sel)?.unwrap_or_default().to_lowercase();
        let greeted = WELCOME_TEXT.iter().any(|t| text.contains(t));
        diagnostics::info(ctx.diagnostics, format!("Welcome greeting recognised: {}", greeted));
    }
    Ok(())
}

fn survives_refresh(ctx: &Context<'_>) -> Result<()> {
    open_dashboard(ctx)?;
    if let Some(verdict) = bounced_to_login(ctx, "dashboard refresh") {
        return verdict;
    }

    ctx.driver.reload()?;
    ctx.driver.wait_for_load(LoadState::NetworkIdle)?;

    expect::url_contains(ctx.driver, "/dashboard")?;
    expect::visible(ctx.driver, BODY, ctx.config.timeouts.element_visible)
}

fn navigates_from_other_pages(ctx: &Context<'_>) -> Result<()> {
    let creds = &ctx.config.credentials;
    login_as(ctx, &creds.email, &creds.password)?;
    ctx.driver.goto(&ctx.config.urls.home)?;
    ctx.driver.wait_for_load(LoadState::Load)?;
    let origin = ctx.driver.url();

    ctx.driver.goto(&ctx.config.urls.dashboard)?;
    ctx.driver.wait_for_load(LoadState::NetworkIdle)?;
    if let Some(verdict) = bounced_to_login(ctx, "dashboard navigation") {
        return verdict;
    }

    diagnostics::info(ctx.diagnostics, format!("Navigated to dashboard from {}", origin));
    expect::url_contains(ctx.driver, "/dashboard")?;
    expect::visible(ctx.driver, BODY, ctx.config.timeouts.element_visible)
}

fn guards_anonymous_access(ctx: &Context<'_>) -> Result<()> {
    ctx.driver.goto(&ctx.config.urls.dashboard)?;
    ctx.driver.wait_for_load(LoadState::NetworkIdle)?;

    let url = ctx.driver.url();
    if url.contains(FAILURE_FRAGMENT) {
        diagnostics::info(ctx.diagnostics, "Redirected to login page - good security");
    } else if url.contains(SUCCESS_FRAGMENT) {
        // Some deployments authenticate differently; flag it without failing.
        diagnostics::warn(ctx.diagnostics, "Accessed dashboard without login - potential security issue");
    } else {
        diagnostics::info(ctx.diagnostics, format!("Redirected to: {}", url));
    }
    Ok(())
}
