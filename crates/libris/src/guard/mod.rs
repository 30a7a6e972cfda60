//! Role-gated navigation guard.
//!
//! A [`RouteGuard`] holds a table of [`Rule`]s. Every rule whose pattern
//! matches the target path contributes its [`Requirement`]; the decision is
//! the most restrictive outcome across all of them. An unauthenticated
//! visitor is always sent to [`LOGIN_PATH`], which takes precedence over the
//! [`DASHBOARD_PATH`] redirect used for guests-only pages and for
//! authenticated users lacking the admin role.
//!
//! The guard is a convenience for the client; the API enforces
//! authorization on its own.

mod pattern;

use tracing::debug;

pub use pattern::RoutePattern;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// What a route demands of the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// Only visitors without a session (login, register).
    Guest,
    /// Any authenticated user.
    Authenticated,
    /// Authenticated users holding the admin role.
    Admin,
}

/// A pattern paired with its requirement.
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: RoutePattern,
    pub requirement: Requirement,
}

/// What the guard knows about the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No session and no token.
    Anonymous,
    /// A token is present but the user has not been fetched, so the role is
    /// unknown. Admin rules are left to the API in this state.
    Unverified,
    /// Authenticated without the admin role.
    User,
    /// Authenticated admin.
    Admin,
}

impl Access {
    /// Derive access from raw token presence alone.
    pub fn from_token(has_token: bool) -> Self {
        if has_token {
            Access::Unverified
        } else {
            Access::Anonymous
        }
    }

    pub fn is_authenticated(self) -> bool {
        !matches!(self, Access::Anonymous)
    }

    fn satisfies_admin(self) -> bool {
        matches!(self, Access::Admin | Access::Unverified)
    }
}

/// Outcome of evaluating a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// The redirect target, if navigation was denied.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::Redirect(to) => Some(to),
        }
    }
}

/// Static table of route rules.
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    rules: Vec<Rule>,
}

/// Resource sections whose create and edit views are admin-only.
const ADMIN_SECTIONS: [&str; 3] = ["books", "authors", "genres"];

impl RouteGuard {
    /// An empty guard; every path is allowed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The rule table of the library client.
    ///
    /// | Pattern | Requirement |
    /// |---|---|
    /// | `/login`, `/register` | guest |
    /// | `/dashboard/{books,authors,genres}/create` | admin |
    /// | `/dashboard/{books,authors,genres}/[id]/edit` | admin |
    /// | `/dashboard/**` | authenticated |
    pub fn library() -> Self {
        let mut guard = Self::new()
            .rule(LOGIN_PATH, Requirement::Guest)
            .rule(REGISTER_PATH, Requirement::Guest);

        for section in ADMIN_SECTIONS {
            guard = guard
                .rule(&format!("{DASHBOARD_PATH}/{section}/create"), Requirement::Admin)
                .rule(&format!("{DASHBOARD_PATH}/{section}/[id]/edit"), Requirement::Admin);
        }

        guard.rule(&format!("{DASHBOARD_PATH}/**"), Requirement::Authenticated)
    }

    /// Append a rule.
    pub fn rule(mut self, pattern: &str, requirement: Requirement) -> Self {
        self.rules.push(Rule {
            pattern: RoutePattern::parse(pattern),
            requirement,
        });
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Every requirement that applies to `path`, in registration order.
    pub fn requirements(&self, path: &str) -> Vec<Requirement> {
        self.rules
            .iter()
            .filter(|rule| rule.pattern.matches(path))
            .map(|rule| rule.requirement)
            .collect()
    }

    /// Decide whether a visitor with `access` may open `path`.
    pub fn evaluate(&self, path: &str, access: Access) -> Decision {
        let mut needs_login = false;
        let mut needs_dashboard = false;

        for requirement in self.requirements(path) {
            match requirement {
                Requirement::Guest => needs_dashboard |= access.is_authenticated(),
                Requirement::Authenticated => needs_login |= !access.is_authenticated(),
                Requirement::Admin => {
                    if !access.is_authenticated() {
                        needs_login = true;
                    } else if !access.satisfies_admin() {
                        needs_dashboard = true;
                    }
                }
            }
        }

        let decision = if needs_login {
            Decision::Redirect(LOGIN_PATH.to_string())
        } else if needs_dashboard {
            Decision::Redirect(DASHBOARD_PATH.to_string())
        } else {
            Decision::Allow
        };

        debug!(path, ?access, ?decision, "Route evaluated");
        decision
    }
}
