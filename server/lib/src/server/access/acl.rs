//! The ACL based access model. Every check is handed to the grant evaluator.
//! Domained targets additionally have their domain's status verified first.

use std::collections::BTreeMap;

use super::{domain_of_email, private, AccountAccessHook, AdminAccessControl, AttrRightChecker};
use crate::acl::AccessManager;
use crate::prelude::*;

pub(super) struct AclAccessControl<'a> {
    ident: Identity,
    prov: &'a dyn Provisioning,
    acl: &'a dyn AccessManager,
}

impl<'a> AclAccessControl<'a> {
    pub(super) fn new(
        ident: Identity,
        prov: &'a dyn Provisioning,
        acl: &'a dyn AccessManager,
    ) -> Self {
        AclAccessControl { ident, prov, acl }
    }

    fn deny(&self, reason: String) -> OperationError {
        security_access!(ident = %self.ident, %reason, "denied ❌");
        OperationError::PermissionDenied(reason)
    }

    /// Entries in a shut down domain can not be administered by anyone, and
    /// those in a suspended domain only by global admins.
    fn check_domain_status(&self, target: &Entry) -> Result<(), OperationError> {
        let Some(domain) = self.prov.get_domain_of(target)? else {
            return Ok(());
        };
        self.check_status_of(&domain)
    }

    fn check_status_of(&self, domain: &Entry) -> Result<(), OperationError> {
        match DomainStatus::of(domain)? {
            DomainStatus::Shutdown => {
                Err(self.deny(format!("domain {} is shutdown", domain.get_name())))
            }
            DomainStatus::Suspended if !self.ident.is_global_admin() => {
                Err(self.deny(format!("domain {} is suspended", domain.get_name())))
            }
            _ => Ok(()),
        }
    }

    fn do_check_right(&self, target: &Entry, right: &Right) -> Result<bool, OperationError> {
        match right {
            Right::Admin(r) => match r.right_type() {
                RightType::Preset => self.acl.can_do(&self.ident, target, r),
                RightType::GetAttrs => {
                    self.acl
                        .can_get_attrs(&self.ident, target, r.attrs().as_set())
                }
                // Names only, constraints are not checked.
                RightType::SetAttrs => {
                    self.acl
                        .can_set_attr_names(&self.ident, target, r.attrs().as_set())
                }
                RightType::Combo => {
                    admin_error!(right = %r, "a combo right can not be checked directly");
                    Err(OperationError::AC0001UncheckableRightType)
                }
            },
            Right::GetAttrs(attrs) => self.acl.can_get_attrs(&self.ident, target, Some(attrs)),
            Right::SetAttrs(attrs) => self.acl.can_set_attrs(&self.ident, target, attrs),
        }
    }

    fn denial_reason(&self, target: &Entry, right: &Right) -> String {
        if right.is_system_admin_only() {
            return "only system admins are allowed".to_string();
        }

        let label = match target.get_class() {
            EntryClass::GlobalGrant => None,
            EntryClass::Alias => Some(format!("alias {}", target.get_name())),
            class => Some(match TargetType::try_from(class) {
                Ok(tt) => format!("{} {}", tt, target.get_name()),
                Err(_) => format!("{} {}", class, target.get_name()),
            }),
        };

        match right {
            Right::Admin(r) => match label {
                Some(label) => format!("need right: {} for {}", r.name(), label),
                None => format!("need right: {}", r.name()),
            },
            Right::GetAttrs(_) => format!(
                "cannot get attrs on {}",
                label.as_deref().unwrap_or("global")
            ),
            Right::SetAttrs(_) => format!(
                "cannot set attrs on {}",
                label.as_deref().unwrap_or("global")
            ),
        }
    }

    fn check_right_on(&self, target: &Entry, right: &Right) -> Result<(), OperationError> {
        if self.do_check_right(target, right)? {
            Ok(())
        } else {
            Err(self.deny(self.denial_reason(target, right)))
        }
    }

    fn check_account_like(
        &self,
        account: &Entry,
        right: &Right,
        hook: Option<&dyn AccountAccessHook>,
    ) -> Result<(), OperationError> {
        self.check_domain_status(account)?;

        let decision = match hook {
            Some(hook) => hook.can_access_account(&self.ident, account)?,
            None => None,
        };

        match decision {
            Some(true) => Ok(()),
            Some(false) => Err(self.deny(self.denial_reason(account, right))),
            None => self.check_right_on(account, right),
        }
    }

    /// Map a permission denial to `false`, so listings can skip the entry.
    fn allowed_or_skipped(
        &self,
        target: &Entry,
        res: Result<(), OperationError>,
    ) -> Result<bool, OperationError> {
        match res {
            Ok(()) => Ok(true),
            Err(OperationError::PermissionDenied(reason)) => {
                request_warn!("skipping entry {}: {}", target.get_name(), reason);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

impl private::Sealed for AclAccessControl<'_> {}

impl AdminAccessControl for AclAccessControl<'_> {
    fn identity(&self) -> &Identity {
        &self.ident
    }

    fn access_manager_type(&self) -> AccessManagerType {
        AccessManagerType::Acl
    }

    fn is_sufficient_admin(&self, _domain_auth_sufficient: bool) -> bool {
        self.ident.is_global_admin() || self.ident.is_delegated_admin()
    }

    #[instrument(level = "debug", skip_all)]
    fn check_right(&self, target: Option<&Entry>, right: &Right) -> Result<(), OperationError> {
        match target {
            Some(target) => self.check_right_on(target, right),
            None => self.check_right_on(&*self.prov.get_global_grant()?, right),
        }
    }

    fn has_right(&self, target: Option<&Entry>, right: &Right) -> Result<bool, OperationError> {
        match target {
            Some(target) => self.do_check_right(target, right),
            None => self.do_check_right(&*self.prov.get_global_grant()?, right),
        }
    }

    #[instrument(level = "debug", skip_all)]
    fn check_cos_right(&self, cos: &Entry, right: &Right) -> Result<(), OperationError> {
        self.check_right_on(cos, right)
    }

    #[instrument(level = "debug", skip_all)]
    fn check_account_right_with(
        &self,
        account: &Entry,
        right: &Right,
        hook: Option<&dyn AccountAccessHook>,
    ) -> Result<(), OperationError> {
        self.check_account_like(account, right, hook)
    }

    #[instrument(level = "debug", skip_all)]
    fn check_calendar_resource_right_with(
        &self,
        cr: &Entry,
        right: &Right,
        hook: Option<&dyn AccountAccessHook>,
    ) -> Result<(), OperationError> {
        self.check_account_like(cr, right, hook)
    }

    #[instrument(level = "debug", skip_all)]
    fn check_distribution_list_right(
        &self,
        dl: &Entry,
        right: &Right,
    ) -> Result<(), OperationError> {
        self.check_domain_status(dl)?;
        self.check_right_on(dl, right)
    }

    #[instrument(level = "debug", skip_all)]
    fn check_dynamic_group_right(
        &self,
        group: &Entry,
        right: &Right,
    ) -> Result<(), OperationError> {
        self.check_domain_status(group)?;
        self.check_right_on(group, right)
    }

    #[instrument(level = "debug", skip_all)]
    fn check_domain_right(&self, domain: &Entry, right: &Right) -> Result<(), OperationError> {
        self.check_right_on(domain, right)
    }

    #[instrument(level = "debug", skip_all)]
    fn check_domain_right_by_name(
        &self,
        domain_name: &str,
        right: &Right,
    ) -> Result<(), OperationError> {
        match self.prov.get_domain_by_name(domain_name)? {
            Some(domain) => self.check_right_on(&domain, right),
            None => Err(self.deny(format!("no such domain: {}", domain_name))),
        }
    }

    #[instrument(level = "debug", skip_all)]
    fn check_domain_right_by_email(
        &self,
        email: &str,
        right: &AdminRight,
    ) -> Result<(), OperationError> {
        let domain_name = domain_of_email(email)?;
        let Some(domain) = self.prov.get_domain_by_name(domain_name)? else {
            request_warn!(%email, "no such domain");
            return Err(OperationError::NoSuchDomain(domain_name.to_string()));
        };
        self.check_status_of(&domain)?;
        self.check_right_on(&domain, &Right::from(right))
    }

    fn check_modify_attrs(
        &self,
        class: EntryClass,
        _attrs: &BTreeMap<Attribute, Vec<String>>,
    ) -> Result<(), OperationError> {
        admin_error!(%class, "check_modify_attrs is only supported by the domain access manager");
        Err(OperationError::AC0002DomainOnlyOperation)
    }

    #[instrument(level = "debug", skip_all)]
    fn check_set_attrs_on_create(
        &self,
        target_type: TargetType,
        name: &str,
        attrs: &BTreeMap<Attribute, Vec<String>>,
    ) -> Result<(), OperationError> {
        if self
            .acl
            .can_set_attrs_on_create(&self.ident, target_type, name, attrs)?
        {
            Ok(())
        } else {
            Err(self.deny("cannot set attrs".to_string()))
        }
    }

    #[instrument(level = "debug", skip_all)]
    fn has_rights_to_list(
        &self,
        target: &Entry,
        list_right: &AdminRight,
        get_attr_right: Option<&Right>,
    ) -> Result<bool, OperationError> {
        if !list_right.is_preset() {
            admin_error!(right = %list_right, "a list right must be a preset right");
            return Err(OperationError::AC0003PresetRightRequired);
        }

        let listed = self.check_right_on(target, &Right::from(list_right));
        if !self.allowed_or_skipped(target, listed)? {
            return Ok(false);
        }

        let Some(get_attr_right) = get_attr_right else {
            return Ok(true);
        };

        match get_attr_right {
            Right::SetAttrs(_) => {
                admin_error!(right = %get_attr_right, "a get attrs right is required");
                return Err(OperationError::AC0004AttrRightRequired);
            }
            Right::GetAttrs(attrs) if attrs.is_empty() => {
                request_warn!(
                    "skipping entry {}: none of the requested attrs is valid on the entry",
                    target.get_name()
                );
                return Ok(false);
            }
            _ => {}
        }

        let got = self.check_right_on(target, get_attr_right);
        self.allowed_or_skipped(target, got)
    }

    fn has_rights_to_list_cos(
        &self,
        cos: &Entry,
        list_right: &AdminRight,
        get_attr_right: Option<&Right>,
    ) -> Result<bool, OperationError> {
        self.has_rights_to_list(cos, list_right, get_attr_right)
    }

    fn attr_right_checker(
        &self,
        target: &Entry,
    ) -> Result<Box<dyn AttrRightChecker>, OperationError> {
        let allowed = self.acl.allowed_attrs(&self.ident, target)?;
        Ok(Box::new(allowed))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use super::*;
    use crate::acl::{AllowedAttrs, Grant, Grantee};
    use crate::right::*;
    use crate::server::access::AccessControls;
    use crate::testkit::TestDirectory;

    fn grant_domain_admin_rights(td: &TestDirectory) {
        let mut wr = td.acl.write();
        wr.grant(Grant::allow(
            td.domain_a,
            Grantee::User(td.deleg),
            &RT_DOMAIN_ADMIN_ACCOUNT_RIGHTS,
        ));
        wr.grant(Grant::allow(td.domain_shut, Grantee::User(td.deleg), &RT_DOMAIN_ADMIN_ACCOUNT_RIGHTS));
        wr.grant(Grant::allow(td.domain_susp, Grantee::User(td.deleg), &RT_DOMAIN_ADMIN_ACCOUNT_RIGHTS));
        wr.commit();
    }

    #[test]
    fn test_acl_check_right_messages() {
        sketching::test_init();
        let td = TestDirectory::new();
        let controls = td.controls(AccessManagerType::Acl);
        let deleg = controls.engine(&td.token(td.deleg)).expect("no engine");

        let ok: Result<(), &str> = Ok(());
        grant_domain_admin_rights(&td);

        test_acl_check!(deleg, check_account_right, td.entry(td.user1), Right::from(&*RT_DELETE_ACCOUNT), ok);
        test_acl_check!(
            deleg,
            check_account_right,
            td.entry(td.user_b),
            Right::from(&*RT_DELETE_ACCOUNT),
            Err("need right: deleteAccount for account carol@other.org")
        );
        test_acl_check!(
            deleg,
            check_account_right,
            td.entry(td.user_b),
            get_attrs!("mail"),
            Err("cannot get attrs on account carol@other.org")
        );
        test_acl_check!(
            deleg,
            check_distribution_list_right,
            td.entry(td.staff_dl),
            set_attrs!(("description", "staff")),
            Err("cannot set attrs on dl staff@example.com")
        );
        test_acl_check!(
            deleg,
            check_domain_right,
            td.entry(td.domain_a),
            Right::from(&*RT_CREATE_ACCOUNT),
            Err("need right: createAccount for domain example.com")
        );

        assert_eq!(
            deleg.check_right(None, &Right::from(&*RT_LIST_SERVER)),
            Err(OperationError::PermissionDenied("need right: listServer".into()))
        );
        assert_eq!(
            deleg.check_right(None, &get_attrs!("description")),
            Err(OperationError::PermissionDenied("cannot get attrs on global".into()))
        );
        assert_eq!(
            deleg.check_right(Some(&td.entry(td.user1)), &Right::from(&*PR_SYSTEM_ADMIN_ONLY)),
            Err(OperationError::PermissionDenied("only system admins are allowed".into()))
        );
        assert_eq!(deleg.has_right(Some(&td.entry(td.user1)), &Right::from(&*RT_RENAME_ACCOUNT)), Ok(true));
        assert_eq!(deleg.has_right(None, &Right::from(&*RT_LIST_SERVER)), Ok(false));
    }

    #[test]
    fn test_acl_global_grant_rights() {
        sketching::test_init();
        let td = TestDirectory::new();
        let mut wr = td.acl.write();
        wr.grant(Grant::allow(td.global, Grantee::User(td.deleg), &RT_LIST_SERVER));
        wr.commit();

        let controls = td.controls(AccessManagerType::Acl);
        let deleg = controls.engine(&td.token(td.deleg)).expect("no engine");
        // The global grant is inherited by every target.
        assert_eq!(deleg.check_right(Some(&td.entry(td.server1)), &Right::from(&*RT_LIST_SERVER)), Ok(()));
        assert_eq!(
            deleg.check_right(Some(&td.entry(td.server1)), &Right::from(&*RT_GET_SERVER)),
            Err(OperationError::PermissionDenied("need right: getServer for server mx1.example.com".into()))
        );

        // Unscoped rights are checked against the global grant alone.
        let top = Right::from(&*RT_CREATE_TOP_DOMAIN);
        assert_eq!(
            deleg.check_right(None, &top),
            Err(OperationError::PermissionDenied("need right: createTopDomain".into()))
        );
        let mut wr = td.acl.write();
        wr.grant(Grant::allow(td.global, Grantee::Group(td.admin_group), &RT_CREATE_TOP_DOMAIN));
        wr.commit();
        assert_eq!(deleg.check_right(None, &top), Ok(()));
        assert_eq!(deleg.has_right(None, &Right::from(&*RT_CREATE_COS)), Ok(false));
        // A right scoped to the global grant is not inherited by domains.
        assert_eq!(deleg.has_right(Some(&td.entry(td.domain_a)), &top), Ok(false));

        let mut wr = td.acl.write();
        wr.grant(Grant::deny(td.global, Grantee::User(td.deleg), &RT_CREATE_TOP_DOMAIN));
        wr.commit();
        assert_eq!(
            deleg.check_right(None, &top),
            Err(OperationError::PermissionDenied("need right: createTopDomain".into()))
        );
    }

    #[test]
    fn test_acl_internal_errors_are_not_denials() {
        sketching::test_init();
        let td = TestDirectory::new();
        let controls = td.controls(AccessManagerType::Acl);
        let deleg = controls.engine(&td.token(td.deleg)).expect("no engine");
        let user1 = td.entry(td.user1);

        assert_eq!(
            deleg.check_right(Some(&user1), &Right::from(&*RT_DOMAIN_ADMIN_ACCOUNT_RIGHTS)),
            Err(OperationError::AC0001UncheckableRightType)
        );
        assert_eq!(
            deleg.check_modify_attrs(EntryClass::Account, &btreemap![]),
            Err(OperationError::AC0002DomainOnlyOperation)
        );
        assert_eq!(
            deleg.has_rights_to_list(&user1, &RT_GET_ACCOUNT, None),
            Err(OperationError::AC0003PresetRightRequired)
        );

        let mut wr = td.acl.write();
        wr.grant(Grant::allow(td.user1, Grantee::User(td.deleg), &RT_LIST_ACCOUNT));
        wr.commit();
        assert_eq!(
            deleg.has_rights_to_list(&user1, &RT_LIST_ACCOUNT, Some(&set_attrs!(("mail", "x@example.com")))),
            Err(OperationError::AC0004AttrRightRequired)
        );
    }

    #[test]
    fn test_acl_domain_status_checked_first() {
        sketching::test_init();
        let td = TestDirectory::new();
        grant_domain_admin_rights(&td);

        let controls = td.controls(AccessManagerType::Acl);
        let deleg = controls.engine(&td.token(td.deleg)).expect("no engine");
        let admin = controls.engine(&td.token(td.admin)).expect("no engine");
        let delete = Right::from(&*RT_DELETE_ACCOUNT);

        // The grant allows it, the status does not.
        assert_eq!(
            td.acl.can_do(&td.ident(td.deleg), &td.entry(td.user_shut), &RT_DELETE_ACCOUNT),
            Ok(true)
        );
        test_acl_check!(deleg, check_account_right, td.entry(td.user_shut), delete, Err("domain shut.net is shutdown"));
        test_acl_check!(admin, check_account_right, td.entry(td.user_shut), delete, Err("domain shut.net is shutdown"));
        test_acl_check!(deleg, check_account_right, td.entry(td.user_susp), delete, Err("domain susp.net is suspended"));
        test_acl_check!(admin, check_account_right, td.entry(td.user_susp), delete, Result::<(), &str>::Ok(()));

        // The domain itself is not checked against its own status.
        let mut wr = td.acl.write();
        wr.grant(Grant::allow(td.domain_shut, Grantee::User(td.deleg), &RT_DELETE_DOMAIN));
        wr.commit();
        assert_eq!(deleg.check_domain_right(&td.entry(td.domain_shut), &Right::from(&*RT_DELETE_DOMAIN)), Ok(()));
        assert_eq!(
            deleg.check_domain_right_by_name("shut.net", &Right::from(&*RT_DELETE_DOMAIN)),
            Ok(())
        );
        // But checks through an email address are.
        assert_eq!(
            deleg.check_domain_right_by_email("new@shut.net", &RT_DELETE_DOMAIN),
            Err(OperationError::PermissionDenied("domain shut.net is shutdown".into()))
        );
    }

    #[test]
    fn test_acl_domain_right_lookups() {
        sketching::test_init();
        let td = TestDirectory::new();
        let mut wr = td.acl.write();
        wr.grant(Grant::allow(td.domain_a, Grantee::User(td.deleg), &RT_CREATE_ACCOUNT));
        wr.commit();

        let controls = td.controls(AccessManagerType::Acl);
        let deleg = controls.engine(&td.token(td.deleg)).expect("no engine");

        assert_eq!(deleg.check_domain_right_by_email("new@example.com", &RT_CREATE_ACCOUNT), Ok(()));
        assert_eq!(
            deleg.check_domain_right_by_email("new@other.org", &RT_CREATE_ACCOUNT),
            Err(OperationError::PermissionDenied(
                "need right: createAccount for domain other.org".into()
            ))
        );
        assert_eq!(
            deleg.check_domain_right_by_email("new@nowhere.net", &RT_CREATE_ACCOUNT),
            Err(OperationError::NoSuchDomain("nowhere.net".into()))
        );
        // Single label domains are looked up like any other.
        assert_eq!(
            deleg.check_domain_right_by_email("admin@localhost", &RT_CREATE_ACCOUNT),
            Err(OperationError::NoSuchDomain("localhost".into()))
        );
        assert_eq!(
            deleg.check_domain_right_by_email("not an address", &RT_CREATE_ACCOUNT),
            Err(OperationError::InvalidRequest(String::new()))
        );
        assert_eq!(
            deleg.check_domain_right_by_name("nowhere.net", &Right::from(&*RT_CREATE_ACCOUNT)),
            Err(OperationError::PermissionDenied("no such domain: nowhere.net".into()))
        );
    }

    struct FixedHook(Option<bool>);

    impl AccountAccessHook for FixedHook {
        fn can_access_account(
            &self,
            _ident: &Identity,
            _account: &Entry,
        ) -> Result<Option<bool>, OperationError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_acl_account_access_hook() {
        sketching::test_init();
        let td = TestDirectory::new();
        let controls = td.controls(AccessManagerType::Acl);
        let deleg = controls.engine(&td.token(td.deleg)).expect("no engine");
        let user1 = td.entry(td.user1);
        let rename = Right::from(&*RT_RENAME_ACCOUNT);

        assert_eq!(deleg.check_account_right_with(&user1, &rename, Some(&FixedHook(Some(true)))), Ok(()));
        assert!(deleg
            .check_account_right_with(&user1, &rename, Some(&FixedHook(None)))
            .is_err_and(|e| e.is_permission_denied()));

        let mut wr = td.acl.write();
        wr.grant(Grant::allow(td.user1, Grantee::User(td.deleg), &RT_RENAME_ACCOUNT));
        wr.commit();
        assert_eq!(deleg.check_account_right_with(&user1, &rename, Some(&FixedHook(None))), Ok(()));
        assert_eq!(
            deleg.check_account_right_with(&user1, &rename, Some(&FixedHook(Some(false)))),
            Err(OperationError::PermissionDenied(
                "need right: renameAccount for account alice@example.com".into()
            ))
        );
        // The hook never overrides a shut down domain.
        assert!(deleg
            .check_calendar_resource_right_with(
                &td.entry(td.user_shut),
                &rename,
                Some(&FixedHook(Some(true)))
            )
            .is_err());
    }

    #[test]
    fn test_acl_set_attrs_on_create() {
        sketching::test_init();
        let td = TestDirectory::new();
        let mut wr = td.acl.write();
        // Granted through list membership only, which a new entry can not have.
        wr.grant(Grant::allow(
            td.staff_dl,
            Grantee::User(td.deleg),
            &AdminRight::set_attrs(
                "setAccountDescription",
                TargetType::Account,
                AttrScope::Some(btreeset![Attribute::Description]),
            ),
        ));
        wr.commit();

        let controls = td.controls(AccessManagerType::Acl);
        let deleg = controls.engine(&td.token(td.deleg)).expect("no engine");
        let attrs = btreemap![(Attribute::Description, vec!["new".to_string()])];

        assert_eq!(
            deleg.check_account_right(&td.entry(td.user1), &Right::SetAttrs(attrs.clone())),
            Ok(())
        );
        assert_eq!(
            deleg.check_set_attrs_on_create(TargetType::Account, "new@example.com", &attrs),
            Err(OperationError::PermissionDenied("cannot set attrs".into()))
        );
    }

    #[test]
    fn test_acl_has_rights_to_list() {
        sketching::test_init();
        let td = TestDirectory::new();
        let mut wr = td.acl.write();
        wr.grant(Grant::allow(td.domain_a, Grantee::User(td.deleg), &RT_LIST_ACCOUNT));
        wr.grant(Grant::allow(
            td.user1,
            Grantee::User(td.deleg),
            &AdminRight::get_attrs(
                "getAccountMail",
                TargetType::Account,
                AttrScope::Some(btreeset![Attribute::Mail]),
            ),
        ));
        wr.commit();

        let controls = td.controls(AccessManagerType::Acl);
        let deleg = controls.engine(&td.token(td.deleg)).expect("no engine");
        let user1 = td.entry(td.user1);

        assert_eq!(deleg.has_rights_to_list(&user1, &RT_LIST_ACCOUNT, None), Ok(true));
        // Denials are swallowed.
        assert_eq!(deleg.has_rights_to_list(&td.entry(td.user_b), &RT_LIST_ACCOUNT, None), Ok(false));
        assert_eq!(deleg.has_rights_to_list(&user1, &RT_LIST_ACCOUNT, Some(&get_attrs!("mail"))), Ok(true));
        assert_eq!(
            deleg.has_rights_to_list(&user1, &RT_LIST_ACCOUNT, Some(&Right::from(&*RT_GET_ACCOUNT))),
            Ok(false)
        );
        assert_eq!(
            deleg.has_rights_to_list(&user1, &RT_LIST_ACCOUNT, Some(&Right::GetAttrs(BTreeSet::new()))),
            Ok(false)
        );
        assert_eq!(
            deleg.has_rights_to_list_cos(&td.entry(td.cos_default), &RT_LIST_COS, None),
            Ok(false)
        );
    }

    /// An evaluator that fails every question.
    struct BrokenAccessManager;

    impl AccessManager for BrokenAccessManager {
        fn can_do(&self, _: &Identity, _: &Entry, _: &AdminRight) -> Result<bool, OperationError> {
            Err(OperationError::Backend)
        }

        fn can_get_attrs(
            &self,
            _: &Identity,
            _: &Entry,
            _: Option<&BTreeSet<Attribute>>,
        ) -> Result<bool, OperationError> {
            Err(OperationError::Backend)
        }

        fn can_set_attr_names(
            &self,
            _: &Identity,
            _: &Entry,
            _: Option<&BTreeSet<Attribute>>,
        ) -> Result<bool, OperationError> {
            Err(OperationError::Backend)
        }

        fn can_set_attrs(
            &self,
            _: &Identity,
            _: &Entry,
            _: &BTreeMap<Attribute, Vec<String>>,
        ) -> Result<bool, OperationError> {
            Err(OperationError::Backend)
        }

        fn can_set_attrs_on_create(
            &self,
            _: &Identity,
            _: TargetType,
            _: &str,
            _: &BTreeMap<Attribute, Vec<String>>,
        ) -> Result<bool, OperationError> {
            Err(OperationError::Backend)
        }

        fn allowed_attrs(&self, _: &Identity, _: &Entry) -> Result<AllowedAttrs, OperationError> {
            Err(OperationError::Backend)
        }
    }

    #[test]
    fn test_acl_listing_propagates_other_errors() {
        sketching::test_init();
        let td = TestDirectory::new();
        let controls = AccessControls::new(
            Configuration::new().with_access_manager(AccessManagerType::Acl),
            td.be.clone(),
            Arc::new(BrokenAccessManager),
        );
        let deleg = controls.engine(&td.token(td.deleg)).expect("no engine");
        assert_eq!(
            deleg.has_rights_to_list(&td.entry(td.user1), &RT_LIST_ACCOUNT, None),
            Err(OperationError::Backend)
        );
    }

    #[test]
    fn test_acl_attr_right_checker() {
        sketching::test_init();
        let td = TestDirectory::new();
        let mut wr = td.acl.write();
        wr.grant(Grant::allow(td.domain_a, Grantee::User(td.deleg), &RT_GET_ACCOUNT));
        wr.grant(Grant::deny(
            td.user1,
            Grantee::User(td.deleg),
            &AdminRight::get_attrs(
                "getAccountPassword",
                TargetType::Account,
                AttrScope::Some(btreeset![Attribute::UserPassword]),
            ),
        ));
        wr.commit();

        let controls = td.controls(AccessManagerType::Acl);
        let deleg = controls.engine(&td.token(td.deleg)).expect("no engine");
        let user1 = td.entry(td.user1);

        let checker = deleg.attr_right_checker(&user1).expect("no checker");
        let reduced = user1.reduce(checker.as_ref());
        assert!(reduced.is_denied(&Attribute::UserPassword));
        assert_eq!(
            reduced.get_ava(&Attribute::Mail),
            Some(&ReducedValue::Present(vec!["alice@example.com".to_string()]))
        );

        let checker = deleg.attr_right_checker(&td.entry(td.user_b)).expect("no checker");
        assert!(!checker.allow_attr(&Attribute::Mail));
    }
}
