//! Declarative path authorization.
//!
//! One centralized rule table instead of role checks scattered across
//! handlers: each rule maps an exact path prefix (on segment boundaries, not
//! substring matching) to the role it requires. Paths matching no rule only
//! require an authenticated identity.

use portico_core::Role;

#[derive(Debug, Clone)]
pub struct AccessRule {
    pub prefix: &'static str,
    pub required_role: Role,
}

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            rules: vec![AccessRule {
                prefix: "/api/v1/admin",
                required_role: Role::Admin,
            }],
        }
    }
}

impl AccessPolicy {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// Role required by `path`, or `None` when any authenticated identity
    /// suffices. First matching rule wins.
    pub fn required_role(&self, path: &str) -> Option<Role> {
        self.rules
            .iter()
            .find(|rule| prefix_matches(path, rule.prefix))
            .map(|rule| rule.required_role)
    }

    pub fn authorize(&self, path: &str, role: Role) -> bool {
        match self.required_role(path) {
            Some(Role::Admin) => role.is_admin(),
            Some(Role::User) | None => true,
        }
    }
}

fn prefix_matches(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_prefix_requires_admin_role() {
        let policy = AccessPolicy::default();
        assert_eq!(
            policy.required_role("/api/v1/admin/users"),
            Some(Role::Admin)
        );
        assert_eq!(policy.required_role("/api/v1/admin"), Some(Role::Admin));
        assert_eq!(
            policy.required_role("/api/v1/admin/users/42"),
            Some(Role::Admin)
        );
    }

    #[test]
    fn matching_is_on_segment_boundaries_not_substrings() {
        let policy = AccessPolicy::default();
        assert_eq!(policy.required_role("/api/v1/administrivia"), None);
        assert_eq!(policy.required_role("/api/v1/users/admin/profile"), None);
    }

    #[test]
    fn self_service_paths_accept_any_role() {
        let policy = AccessPolicy::default();
        assert_eq!(policy.required_role("/api/v1/users/me"), None);
        assert!(policy.authorize("/api/v1/users/me", Role::User));
        assert!(policy.authorize("/api/v1/users/me", Role::Admin));
    }

    #[test]
    fn authorize_enforces_the_admin_rule() {
        let policy = AccessPolicy::default();
        assert!(!policy.authorize("/api/v1/admin/users", Role::User));
        assert!(policy.authorize("/api/v1/admin/users", Role::Admin));
    }
}
