//! Chain scope - the key that bounds one ordered conversation chain.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ModuleId, SessionId, SubmoduleId, UserId};

/// Identifies the ordered sequence of entries one chain belongs to:
/// either a freeform session or a (module, submodule) pair, always owned
/// by a single user.
///
/// Chain positions are monotonic within one scope and carry no meaning
/// across scopes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainScope {
    /// Freeform journaling session.
    Session { user: UserId, session: SessionId },
    /// Guided module work.
    Submodule {
        user: UserId,
        module: ModuleId,
        submodule: SubmoduleId,
    },
}

impl ChainScope {
    /// Creates a session scope.
    pub fn session(user: UserId, session: SessionId) -> Self {
        Self::Session { user, session }
    }

    /// Creates a submodule scope.
    pub fn submodule(user: UserId, module: ModuleId, submodule: SubmoduleId) -> Self {
        Self::Submodule {
            user,
            module,
            submodule,
        }
    }

    /// The owning user.
    pub fn user(&self) -> &UserId {
        match self {
            Self::Session { user, .. } => user,
            Self::Submodule { user, .. } => user,
        }
    }
}

impl fmt::Display for ChainScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session { user, session } => write!(f, "{}/sessions/{}", user, session),
            Self::Submodule {
                user,
                module,
                submodule,
            } => write!(f, "{}/modules/{}/{}", user, module, submodule),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[test]
    fn session_scopes_with_different_sessions_differ() {
        let a = ChainScope::session(user(), SessionId::new());
        let b = ChainScope::session(user(), SessionId::new());
        assert_ne!(a, b);
    }

    #[test]
    fn submodule_scope_displays_path() {
        let scope = ChainScope::submodule(
            user(),
            ModuleId::new("introduction").unwrap(),
            SubmoduleId::new("welcome").unwrap(),
        );
        assert_eq!(scope.to_string(), "user-1/modules/introduction/welcome");
    }

    #[test]
    fn user_accessor_works_for_both_variants() {
        let session_scope = ChainScope::session(user(), SessionId::new());
        let submodule_scope = ChainScope::submodule(
            user(),
            ModuleId::new("m").unwrap(),
            SubmoduleId::new("s").unwrap(),
        );

        assert_eq!(session_scope.user(), &user());
        assert_eq!(submodule_scope.user(), &user());
    }
}
