//! Post-authentication routing rules.
//!
//! Everything here is pure: callers pass the current location
//! (`/path?query`) and get back where to go next.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use url::Url;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const REDIRECT_PARAM: &str = "redirect";

const AUTH_PAGE_MARKERS: [&str; 4] = ["/login", "/signup", "/callback", "/error"];
const LOCATION_BASE: &str = "http://localhost/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Navigate(String),
}

/// Parsed in-app location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: Option<String>,
}

impl Location {
    /// Parses a relative location. Unparseable input is kept verbatim as
    /// the path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match Url::parse(LOCATION_BASE).and_then(|base| base.join(raw)) {
            Ok(url) => Self {
                path: url.path().to_string(),
                query: url.query().map(str::to_string),
            },
            Err(_) => Self {
                path: raw.to_string(),
                query: None,
            },
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path plus query string, as it would appear in the address bar.
    pub fn full(&self) -> String {
        match &self.query {
            Some(query) if !query.is_empty() => format!("{}?{}", self.path, query),
            _ => self.path.clone(),
        }
    }

    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn is_auth_page(&self) -> bool {
        is_auth_page(&self.path)
    }
}

/// Login, signup, callback and error pages.
pub fn is_auth_page(path: &str) -> bool {
    AUTH_PAGE_MARKERS.iter().any(|marker| path.contains(marker))
}

/// `/login?redirect=<current>` with the current location percent-encoded.
pub fn login_redirect(current: &Location) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(REDIRECT_PARAM, &current.full())
        .finish();
    format!("{LOGIN_PATH}?{query}")
}

/// Routing after an auth state check completes.
///
/// With a user: follow `redirect` if present, stay on a normal page, or
/// leave an auth page for the dashboard. Without a user: send normal pages
/// to login (remembering where they were) and leave auth pages alone.
pub fn route_after_auth(current: &str, authenticated: bool) -> Navigation {
    let location = Location::parse(current);

    if authenticated {
        if let Some(target) = location.query_param(REDIRECT_PARAM) {
            return Navigation::Navigate(safe_redirect_target(&target));
        }
        if location.is_auth_page() {
            return Navigation::Navigate(DASHBOARD_PATH.to_string());
        }
        return Navigation::Stay;
    }

    if location.is_auth_page() {
        Navigation::Stay
    } else {
        Navigation::Navigate(login_redirect(&location))
    }
}

/// Routing after the auth provider reports a failure.
pub fn route_after_auth_failure(current: &str) -> Navigation {
    let location = Location::parse(current);
    if location.is_auth_page() {
        Navigation::Stay
    } else {
        Navigation::Navigate(login_redirect(&location))
    }
}

// Only same-origin absolute paths are followed.
fn safe_redirect_target(target: &str) -> String {
    if target.starts_with('/') && !target.starts_with("//") {
        target.to_string()
    } else {
        DASHBOARD_PATH.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{is_auth_page, route_after_auth, route_after_auth_failure, Location, Navigation};

    #[test]
    fn auth_pages_are_detected_by_path_segment() {
        assert!(is_auth_page("/login"));
        assert!(is_auth_page("/auth/callback"));
        assert!(is_auth_page("/signup/step-2"));
        assert!(!is_auth_page("/courses"));
    }

    #[test]
    fn location_keeps_path_and_query() {
        let location = Location::parse("/courses?term=Fall%202023");
        assert_eq!(location.path(), "/courses");
        assert_eq!(location.query_param("term").as_deref(), Some("Fall 2023"));
        assert_eq!(location.full(), "/courses?term=Fall%202023");
    }

    #[test]
    fn signed_in_user_follows_redirect_param() {
        assert_eq!(
            route_after_auth("/login?redirect=%2Fcourses%2F12", true),
            Navigation::Navigate("/courses/12".to_string())
        );
    }

    #[test]
    fn signed_in_user_leaves_auth_pages_for_dashboard() {
        assert_eq!(
            route_after_auth("/login", true),
            Navigation::Navigate("/dashboard".to_string())
        );
        assert_eq!(route_after_auth("/students", true), Navigation::Stay);
    }

    #[test]
    fn external_redirect_targets_are_ignored() {
        assert_eq!(
            route_after_auth("/login?redirect=https://evil.example", true),
            Navigation::Navigate("/dashboard".to_string())
        );
    }

    #[test]
    fn anonymous_user_is_sent_to_login_with_redirect() {
        assert_eq!(
            route_after_auth("/courses", false),
            Navigation::Navigate("/login?redirect=%2Fcourses".to_string())
        );
        assert_eq!(route_after_auth("/signup", false), Navigation::Stay);
    }

    #[test]
    fn failure_off_auth_page_routes_to_login() {
        assert_eq!(
            route_after_auth_failure("/exams"),
            Navigation::Navigate("/login?redirect=%2Fexams".to_string())
        );
        assert_eq!(route_after_auth_failure("/error"), Navigation::Stay);
    }
}
