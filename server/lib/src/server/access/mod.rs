//! Access control for delegated administration.
//!
//! Every admin operation asks an [AdminAccessControl] engine whether the
//! authenticated principal may act on a target before it does anything. There
//! are two models of answering, and which one is in force is a server wide
//! setting:
//!
//! * The domain model: global admins may do anything, domain admins may touch
//!   only entries inside their own domain, and may only modify a whitelisted set
//!   of attributes. No grants are consulted.
//! * The ACL model: every check is a question to the grant evaluator
//!   ([AccessManager]), after verifying the target's domain is not shut down.
//!
//! An engine is built per request by [AccessControls::engine] and is bound to
//! exactly one of the two models for its lifetime. Point checks (`check_*`)
//! return `Err(PermissionDenied)` on denial. Listing checks (`has_rights_to_*`)
//! map a denial to `Ok(false)` so that a bulk listing can skip the entry and
//! carry on, while any other error still propagates.

use std::collections::BTreeMap;
use std::sync::Arc;

use regex::Regex;

use crate::acl::AccessManager;
use crate::prelude::*;

mod acl;
mod domain;
pub mod search;

use self::acl::AclAccessControl;
use self::domain::DomainAccessControl;
pub use self::search::SearchDirectoryRightChecker;

lazy_static! {
    static ref EMAIL_ADDRESS_REGEX: Regex = {
        #[allow(clippy::expect_used)]
        Regex::new(r"^[^@\s]+@([^@\s]+)$").expect("Invalid email address regex found")
    };
}

/// Decides, per attribute, whether a value may be disclosed in a read response.
/// Refused attributes are encoded as a permission denied marker, see
/// [Entry::reduce].
pub trait AttrRightChecker {
    fn allow_attr(&self, attr: &Attribute) -> bool;
}

/// Discloses every attribute.
pub struct AllowAllAttrs;

impl AttrRightChecker for AllowAllAttrs {
    fn allow_attr(&self, _attr: &Attribute) -> bool {
        true
    }
}

/// A caller supplied pre-check for account and calendar resource rights. When
/// it returns `Some`, that decision replaces grant evaluation. `None` defers to
/// the grant evaluator.
pub trait AccountAccessHook {
    fn can_access_account(
        &self,
        ident: &Identity,
        account: &Entry,
    ) -> Result<Option<bool>, OperationError>;
}

mod private {
    pub trait Sealed {}
}

/// The right checking contract every admin operation handler calls. Only the
/// two strategies in this module implement it.
pub trait AdminAccessControl: private::Sealed {
    fn identity(&self) -> &Identity;

    fn access_manager_type(&self) -> AccessManagerType;

    /// Gatekeeping before any handler runs. `domain_auth_sufficient` marks
    /// request kinds that domain admins may issue under the domain model.
    fn is_sufficient_admin(&self, domain_auth_sufficient: bool) -> bool;

    /// Check a right that is not tied to a domained entry. A `None` target is
    /// checked against the global grant.
    fn check_right(&self, target: Option<&Entry>, right: &Right) -> Result<(), OperationError>;

    /// The boolean form of [AdminAccessControl::check_right].
    fn has_right(&self, target: Option<&Entry>, right: &Right) -> Result<bool, OperationError>;

    fn check_cos_right(&self, cos: &Entry, right: &Right) -> Result<(), OperationError>;

    fn check_account_right(&self, account: &Entry, right: &Right) -> Result<(), OperationError> {
        self.check_account_right_with(account, right, None)
    }

    fn check_account_right_with(
        &self,
        account: &Entry,
        right: &Right,
        hook: Option<&dyn AccountAccessHook>,
    ) -> Result<(), OperationError>;

    fn check_calendar_resource_right(
        &self,
        cr: &Entry,
        right: &Right,
    ) -> Result<(), OperationError> {
        self.check_calendar_resource_right_with(cr, right, None)
    }

    fn check_calendar_resource_right_with(
        &self,
        cr: &Entry,
        right: &Right,
        hook: Option<&dyn AccountAccessHook>,
    ) -> Result<(), OperationError>;

    fn check_distribution_list_right(&self, dl: &Entry, right: &Right)
        -> Result<(), OperationError>;

    fn check_dynamic_group_right(&self, group: &Entry, right: &Right)
        -> Result<(), OperationError>;

    /// Check a right on a domain entry. The domain's own status is not checked.
    fn check_domain_right(&self, domain: &Entry, right: &Right) -> Result<(), OperationError>;

    fn check_domain_right_by_name(
        &self,
        domain_name: &str,
        right: &Right,
    ) -> Result<(), OperationError>;

    /// Check a right on the domain part of an email style address.
    fn check_domain_right_by_email(
        &self,
        email: &str,
        right: &AdminRight,
    ) -> Result<(), OperationError>;

    /// Domain model only: verify a domain admin may modify these attributes on
    /// an entry of the given class.
    fn check_modify_attrs(
        &self,
        class: EntryClass,
        attrs: &BTreeMap<Attribute, Vec<String>>,
    ) -> Result<(), OperationError>;

    /// Must only be called after a separate "can create" check has passed.
    fn check_set_attrs_on_create(
        &self,
        target_type: TargetType,
        name: &str,
        attrs: &BTreeMap<Attribute, Vec<String>>,
    ) -> Result<(), OperationError>;

    /// Whether an entry may appear in a listing. `get_attr_right` is either an
    /// attribute admin right, or the specific set of attributes requested.
    fn has_rights_to_list(
        &self,
        target: &Entry,
        list_right: &AdminRight,
        get_attr_right: Option<&Right>,
    ) -> Result<bool, OperationError>;

    fn has_rights_to_list_cos(
        &self,
        cos: &Entry,
        list_right: &AdminRight,
        get_attr_right: Option<&Right>,
    ) -> Result<bool, OperationError>;

    fn attr_right_checker(
        &self,
        target: &Entry,
    ) -> Result<Box<dyn AttrRightChecker>, OperationError>;
}

/// Builds per request engines. Holds the configuration read at startup and the
/// collaborators every engine consults.
pub struct AccessControls {
    config: Configuration,
    prov: Arc<dyn Provisioning>,
    acl: Arc<dyn AccessManager>,
}

impl AccessControls {
    pub fn new(
        config: Configuration,
        prov: Arc<dyn Provisioning>,
        acl: Arc<dyn AccessManager>,
    ) -> Self {
        admin_info!(%config, "access controls configured");
        AccessControls { config, prov, acl }
    }

    pub fn access_manager_type(&self) -> AccessManagerType {
        self.config.access_manager
    }

    /// Build the engine for one request. Fails only if the principal can not
    /// be resolved from the credential.
    #[instrument(level = "debug", skip_all)]
    pub fn engine(
        &self,
        token: &AuthToken,
    ) -> Result<Box<dyn AdminAccessControl + '_>, OperationError> {
        let ident = Identity::from_token(token, self.prov.as_ref())?;
        trace!(%ident, access_manager = %self.config.access_manager, "building access control engine");

        let engine: Box<dyn AdminAccessControl + '_> = match self.config.access_manager {
            AccessManagerType::Domain => {
                Box::new(DomainAccessControl::new(ident, self.prov.as_ref()))
            }
            AccessManagerType::Acl => Box::new(AclAccessControl::new(
                ident,
                self.prov.as_ref(),
                self.acl.as_ref(),
            )),
        };
        Ok(engine)
    }
}

/// The domain part of an email style address.
pub(crate) fn domain_of_email(email: &str) -> Result<&str, OperationError> {
    EMAIL_ADDRESS_REGEX
        .captures(email)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            request_warn!(%email, "not a valid email address");
            OperationError::InvalidRequest(format!("must be valid email address: {}", email))
        })
}
