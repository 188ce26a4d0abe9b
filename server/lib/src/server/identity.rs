//! Contains structures related to the Identity of the administrator making a
//! request. The identity is resolved once per request from the credential the
//! transport layer authenticated, and the admin flags it carries are fixed for
//! the life of the request.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// The authenticated credential, as handed over by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub account_uuid: Uuid,
    /// A global (system) admin.
    #[serde(default)]
    pub admin: bool,
    /// A domain admin under the domain based model.
    #[serde(default)]
    pub domain_admin: bool,
    /// A delegated admin under the ACL based model.
    #[serde(default)]
    pub delegated_admin: bool,
}

impl AuthToken {
    pub fn new(account_uuid: Uuid) -> Self {
        AuthToken {
            account_uuid,
            admin: false,
            domain_admin: false,
            delegated_admin: false,
        }
    }

    /// Derive the token flags from the admin flags recorded on the account.
    pub fn from_account(account: &Entry) -> Self {
        let flag = |attr| account.get_ava_single_bool(&attr).unwrap_or(false);
        AuthToken {
            account_uuid: account.get_uuid(),
            admin: flag(Attribute::IsAdminAccount),
            domain_admin: flag(Attribute::IsDomainAdminAccount),
            delegated_admin: flag(Attribute::IsDelegatedAdminAccount),
        }
    }
}

/// The principal of a request.
#[derive(Debug, Clone)]
pub struct Identity {
    entry: Arc<Entry>,
    token: AuthToken,
}

impl Identity {
    /// Resolve the principal from the credential. If the account no longer exists
    /// this is an authentication failure, not an authorisation one.
    pub fn from_token(
        token: &AuthToken,
        prov: &dyn Provisioning,
    ) -> Result<Self, OperationError> {
        let entry = match prov.get_by_uuid(token.account_uuid)? {
            Some(e) if e.get_class() == EntryClass::Account => e,
            Some(e) => {
                security_error!(entry = %e, "credential does not refer to an account");
                return Err(OperationError::NotAuthenticated);
            }
            None => {
                security_error!(uuid = %token.account_uuid, "credential refers to a missing account");
                return Err(OperationError::NotAuthenticated);
            }
        };

        Ok(Identity {
            entry,
            token: token.clone(),
        })
    }

    pub fn get_uuid(&self) -> Uuid {
        self.entry.get_uuid()
    }

    pub fn get_entry(&self) -> &Entry {
        &self.entry
    }

    pub fn get_name(&self) -> &str {
        self.entry.get_name()
    }

    pub fn is_global_admin(&self) -> bool {
        self.token.admin
    }

    pub fn is_domain_admin(&self) -> bool {
        self.token.domain_admin
    }

    pub fn is_delegated_admin(&self) -> bool {
        self.token.delegated_admin
    }

    /// Restricted to their own domain under the domain based model.
    pub fn is_domain_admin_only(&self) -> bool {
        !self.is_global_admin() && self.is_domain_admin()
    }

    /// The domain the principal is assigned to administer.
    pub fn domain_name(&self) -> Option<&str> {
        self.entry.domain_name()
    }

    pub fn can_access_domain_name(&self, domain_name: &str) -> bool {
        self.domain_name()
            .map(|own| own.eq_ignore_ascii_case(domain_name))
            .unwrap_or(false)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.entry.get_name(), self.entry.get_uuid())
    }
}

/// Whether an account carries enough admin flags to authenticate as an admin
/// under the given model.
pub fn is_adequate_admin_account(account: &Entry, model: AccessManagerType) -> bool {
    let flag = |attr| account.get_ava_single_bool(&attr).unwrap_or(false);
    flag(Attribute::IsAdminAccount)
        || match model {
            AccessManagerType::Domain => flag(Attribute::IsDomainAdminAccount),
            AccessManagerType::Acl => flag(Attribute::IsDelegatedAdminAccount),
        }
}
