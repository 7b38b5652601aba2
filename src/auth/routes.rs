use crate::storage::Role;

/// Access requirement for a group of routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Reachable with or without a session
    Public,
    /// Requires any authenticated session
    AnyRole,
    /// Requires a session carrying this specific role
    RoleOnly(Role),
}

/// Static mapping from path prefixes to access requirements.
///
/// Longest-prefix rules win, and anything unmatched is public. The policy
/// is built once at startup and read concurrently by every request.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    rules: Vec<(String, RouteAccess)>,
}

impl RoutePolicy {
    pub fn new(mut rules: Vec<(String, RouteAccess)>) -> Self {
        // Longest prefix first so /dentist/public-style overlaps resolve
        // deterministically.
        rules.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { rules }
    }

    /// Default classification for the clinic portals
    pub fn clinic_default() -> Self {
        Self::new(vec![
            ("/dentist".to_string(), RouteAccess::RoleOnly(Role::Dentist)),
            (
                "/assistant".to_string(),
                RouteAccess::RoleOnly(Role::Assistant),
            ),
            ("/patient".to_string(), RouteAccess::RoleOnly(Role::Patient)),
            ("/messages".to_string(), RouteAccess::AnyRole),
            ("/account".to_string(), RouteAccess::AnyRole),
        ])
    }

    /// Classify a request path
    pub fn classify(&self, path: &str) -> RouteAccess {
        for (prefix, access) in &self.rules {
            if path.starts_with(prefix.as_str()) {
                return *access;
            }
        }
        RouteAccess::Public
    }
}
