pub mod dashboard;
pub mod login;

/// Marks a URL the login flow should end on.
pub const SUCCESS_FRAGMENT: &str = "dashboard";
/// Marks a URL that still shows the login form.
pub const FAILURE_FRAGMENT: &str = "login";
