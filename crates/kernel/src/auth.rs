//! Request-scoped identity for authoring operations.

use serde::Serialize;

use crate::models::Role;

/// The authenticated caller of an authoring operation.
///
/// Routes build this from the session and pass it explicitly; services
/// never look at session state themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActingUser {
    pub name: String,
    pub role: Role,
}

impl ActingUser {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether this user may manage a page written by `author`.
    pub fn can_manage(&self, author: &str) -> bool {
        self.is_admin() || self.name == author
    }

    /// Author to record for a page this user creates.
    ///
    /// Admins may author on behalf of anyone; everyone else always authors
    /// as themselves, whatever they asked for.
    pub fn resolve_author(&self, requested: &str) -> String {
        if self.is_admin() || self.name == requested {
            requested.to_string()
        } else {
            self.name.clone()
        }
    }
}
