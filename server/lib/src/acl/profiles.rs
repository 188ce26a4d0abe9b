use std::fmt;

use crate::prelude::*;

/// Who a grant is made to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grantee {
    /// A single admin account.
    User(Uuid),
    /// Every admin that is a member (directly or nested) of the group.
    Group(Uuid),
    /// Pseudo grantee matching any delegated admin.
    AllAdmins,
}

impl Grantee {
    pub(super) fn is_individual(&self) -> bool {
        matches!(self, Grantee::User(_))
    }
}

impl fmt::Display for Grantee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grantee::User(u) => write!(f, "usr {}", u),
            Grantee::Group(u) => write!(f, "grp {}", u),
            Grantee::AllAdmins => write!(f, "all admins"),
        }
    }
}

/// An access control entry, attached to a target, granting or denying a right
/// to a grantee. Grants on a domain are inherited by everything in the domain,
/// and grants on a group by the members of the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub target: Uuid,
    pub grantee: Grantee,
    pub right: AdminRight,
    pub deny: bool,
}

impl Grant {
    pub fn allow(target: Uuid, grantee: Grantee, right: &AdminRight) -> Self {
        Grant {
            target,
            grantee,
            right: right.clone(),
            deny: false,
        }
    }

    pub fn deny(target: Uuid, grantee: Grantee, right: &AdminRight) -> Self {
        Grant {
            target,
            grantee,
            right: right.clone(),
            deny: true,
        }
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} on {}",
            if self.deny { "deny" } else { "allow" },
            self.right,
            self.grantee,
            self.target
        )
    }
}
