use crate::selector::SelectorGroup;

// --- Layout ---
pub const HEADER: SelectorGroup = SelectorGroup::new("header", &["header", ".header", ".navbar", ".top-bar"]);
pub const NAVIGATION: SelectorGroup =
    SelectorGroup::new("navigation", &["nav", ".navigation", ".sidebar", ".nav-menu"]);
pub const MAIN_CONTENT: SelectorGroup = SelectorGroup::new(
    "main content",
    &["main", ".main-content", ".dashboard-content", ".content", ".main-panel"],
);
pub const BREADCRUMB: SelectorGroup = SelectorGroup::new("breadcrumb", &[".breadcrumb", ".breadcrumbs", ".page-path"]);
pub const FOOTER: SelectorGroup = SelectorGroup::new("footer", &["footer", ".footer", ".page-footer"]);

// --- User profile ---
pub const USER_PROFILE: SelectorGroup = SelectorGroup::new(
    "user profile",
    &[".user-profile", ".user-info", ".profile-menu", ".user-menu", ".account-info"],
);
pub const USER_NAME: SelectorGroup =
    SelectorGroup::new("user name", &[".user-name", ".username", ".display-name", ".profile-name"]);
pub const USER_EMAIL: SelectorGroup = SelectorGroup::new("user email", &[".user-email", ".email", ".profile-email"]);
pub const USER_AVATAR: SelectorGroup =
    SelectorGroup::new("user avatar", &[".user-avatar", ".avatar", ".profile-image", ".user-image"]);
pub const LOGOUT_BUTTON: SelectorGroup = SelectorGroup::new(
    "logout",
    &["a[href*=\"logout\"]", "button[onclick*=\"logout\"]", ".logout", ".sign-out", ".log-out"],
);

// --- Widgets ---
pub const WIDGETS: SelectorGroup = SelectorGroup::new(
    "widgets",
    &[".widget", ".card", ".dashboard-card", ".stat-card", ".metric", ".dashboard-widget"],
);
pub const STATISTICS: SelectorGroup =
    SelectorGroup::new("statistics", &[".statistics", ".summary", ".stats", ".dashboard-stats"]);
pub const WELCOME_MESSAGE: SelectorGroup =
    SelectorGroup::new("welcome message", &[".welcome", ".greeting", ".dashboard-welcome", ".hello"]);
pub const NOTIFICATION_BELL: SelectorGroup =
    SelectorGroup::new("notification bell", &[".notification-bell", ".notifications", ".alert-bell"]);
pub const NOTIFICATION_PANEL: SelectorGroup = SelectorGroup::new(
    "notification panel",
    &[".notification-panel", ".notifications-panel", ".alert-panel"],
);
pub const SEARCH_BOX: SelectorGroup =
    SelectorGroup::new("search box", &["input[type=\"search\"]", ".search-input", ".search-box"]);
pub const MENU_ITEMS: SelectorGroup = SelectorGroup::new("menu items", &[".menu-item", ".nav-item", ".sidebar-item"]);

pub const BODY: &str = "body";

pub const EXPECTED_TITLES: &[&str] = &["dashboard", "bảng điều khiển", "trang chủ"];

pub const WELCOME_TEXT: &[&str] = &["welcome", "chào mừng", "hello", "xin chào"];
pub const LOGOUT_TEXT: &[&str] = &["logout", "đăng xuất", "sign out", "log out"];

/// Regions that are reported on but never required.
pub const OPTIONAL_REGIONS: &[SelectorGroup] = &[
    USER_NAME,
    USER_EMAIL,
    USER_AVATAR,
    WELCOME_MESSAGE,
    BREADCRUMB,
    NOTIFICATION_BELL,
    NOTIFICATION_PANEL,
    SEARCH_BOX,
    MENU_ITEMS,
    FOOTER,
];
