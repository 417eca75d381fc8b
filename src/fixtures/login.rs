use crate::selector::SelectorGroup;

pub struct User {
    pub email: &'static str,
    pub password: &'static str,
}

pub const INVALID_USER: User = User { email: "invalid@test.com", password: "wrongpassword" };
pub const SPECIAL_CHARS_USER: User = User { email: "test+special@example.com", password: "P@ssw0rd!123" };

// Demo scenario accounts
pub const DEMO_USER: User = User { email: "gin_vn@haldata.net", password: "Abc@123456" };
pub const WRONG_USER: User = User { email: "wrong_user@example.com", password: "WrongPassword123" };

// --- Selectors ---
pub const EMAIL_FIELD: SelectorGroup =
    SelectorGroup::new("email field", &["input[name=\"login[username]\"]", "input[type=\"email\"]", "#email"]);
pub const PASSWORD_FIELD: SelectorGroup =
    SelectorGroup::new("password field", &["input[name=\"login[password]\"]", "input[type=\"password\"]", "#pass"]);
pub const LOGIN_BUTTON: SelectorGroup =
    SelectorGroup::new("login button", &["button[type=\"submit\"]", ".action.login", "#send2"]);
pub const ERROR_MESSAGE: SelectorGroup = SelectorGroup::new(
    "error message",
    &[".error", ".message-error", ".alert-error", "[data-ui-id=\"message-error\"]", ".mage-error"],
);
pub const SUCCESS_INDICATOR: SelectorGroup = SelectorGroup::new(
    "success indicator",
    &[
        ".header .customer-welcome",
        ".welcome",
        ".logged-in",
        "a[href*=\"logout\"]",
        ".customer-name",
        ".header-links a[href*=\"logout\"]",
    ],
);
pub const FORGOT_PASSWORD: SelectorGroup =
    SelectorGroup::new("forgot password link", &["a[href*=\"forgot\"]", ".forgot-password", ".action.remind"]);

/// Checked after a login that did not reach the dashboard.
pub const POST_SUBMIT_ERRORS: &[&str] = &[
    ".error",
    ".alert-danger",
    ".text-red-500",
    ".text-danger",
    ".invalid-feedback",
    ".error-message",
    "[role=\"alert\"]",
];

/// Scanned when building the demo login report.
pub const REPORT_ERRORS: &[&str] = &[
    ".error-message",
    ".alert-danger",
    ".text-red-500",
    ".login-error",
    "[data-testid=\"error\"]",
    ".notification.error",
    ".message.error",
    ".error",
    ".invalid-feedback",
];

pub const EXPECTED_TITLES: &[&str] = &["login", "đăng nhập", "customer account", "hydra translate client"];
