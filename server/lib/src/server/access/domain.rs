//! The domain based access model. A principal is either unrestricted, or a
//! domain admin confined to the domain their own account lives in. Rights are
//! never evaluated; `check_right` and the listing checks always pass, and the
//! domain membership checks below are the only restriction.

use std::collections::BTreeMap;

use super::{domain_of_email, private, AccountAccessHook, AdminAccessControl, AllowAllAttrs, AttrRightChecker};
use crate::prelude::*;
use crate::right::strip_modifier;

pub(super) struct DomainAccessControl<'a> {
    ident: Identity,
    prov: &'a dyn Provisioning,
}

impl<'a> DomainAccessControl<'a> {
    pub(super) fn new(ident: Identity, prov: &'a dyn Provisioning) -> Self {
        DomainAccessControl { ident, prov }
    }

    fn deny(&self, reason: String) -> OperationError {
        security_access!(ident = %self.ident, %reason, "denied ❌ - outside of administered domain");
        OperationError::PermissionDenied(reason)
    }

    fn can_access_domained(&self, entry: &Entry) -> bool {
        if !self.ident.is_domain_admin_only() {
            return true;
        }
        entry
            .domain_name()
            .map(|d| self.ident.can_access_domain_name(d))
            .unwrap_or(false)
    }

    /// Domain admins may not touch accounts of global admins, even in their
    /// own domain.
    fn can_access_account(&self, account: &Entry) -> bool {
        if !self.ident.is_domain_admin_only() {
            return true;
        }
        if account
            .get_ava_single_bool(&Attribute::IsAdminAccount)
            .unwrap_or(false)
        {
            trace!(account = %account.get_name(), "domain admin can not access a global admin account");
            return false;
        }
        self.can_access_domained(account)
    }

    /// A COS is accessible if the principal's domain lists it as accessible, or
    /// has it as the default.
    fn can_access_cos(&self, cos: &Entry) -> Result<bool, OperationError> {
        if !self.ident.is_domain_admin_only() {
            return Ok(true);
        }
        let Some(domain) = self
            .ident
            .domain_name()
            .map(|d| self.prov.get_domain_by_name(d))
            .transpose()?
            .flatten()
        else {
            return Ok(false);
        };

        let cos_uuid = cos.get_uuid();
        Ok(domain
            .get_ava_as_uuids(&Attribute::DomainAccessibleCos)
            .any(|u| u == cos_uuid)
            || domain.get_ava_single_uuid(&Attribute::DomainDefaultCosId) == Some(cos_uuid))
    }

    fn check_set_attrs_right(&self, class: EntryClass, right: &Right) -> Result<(), OperationError> {
        match right {
            Right::SetAttrs(attrs) if self.ident.is_domain_admin_only() => {
                self.check_modify_attrs(class, attrs)
            }
            _ => Ok(()),
        }
    }
}

impl private::Sealed for DomainAccessControl<'_> {}

impl AdminAccessControl for DomainAccessControl<'_> {
    fn identity(&self) -> &Identity {
        &self.ident
    }

    fn access_manager_type(&self) -> AccessManagerType {
        AccessManagerType::Domain
    }

    fn is_sufficient_admin(&self, domain_auth_sufficient: bool) -> bool {
        self.ident.is_global_admin() || (domain_auth_sufficient && self.ident.is_domain_admin())
    }

    fn check_right(&self, _target: Option<&Entry>, _right: &Right) -> Result<(), OperationError> {
        Ok(())
    }

    fn has_right(&self, _target: Option<&Entry>, _right: &Right) -> Result<bool, OperationError> {
        Ok(true)
    }

    #[instrument(level = "debug", skip_all)]
    fn check_cos_right(&self, cos: &Entry, _right: &Right) -> Result<(), OperationError> {
        if self.can_access_cos(cos)? {
            Ok(())
        } else {
            Err(self.deny("can not access cos".to_string()))
        }
    }

    #[instrument(level = "debug", skip_all)]
    fn check_account_right_with(
        &self,
        account: &Entry,
        right: &Right,
        _hook: Option<&dyn AccountAccessHook>,
    ) -> Result<(), OperationError> {
        if !self.can_access_account(account) {
            return Err(self.deny("can not access account".to_string()));
        }
        self.check_set_attrs_right(EntryClass::Account, right)
    }

    #[instrument(level = "debug", skip_all)]
    fn check_calendar_resource_right_with(
        &self,
        cr: &Entry,
        right: &Right,
        _hook: Option<&dyn AccountAccessHook>,
    ) -> Result<(), OperationError> {
        if !self.can_access_account(cr) {
            return Err(self.deny("can not access calendar resource".to_string()));
        }
        self.check_set_attrs_right(EntryClass::CalResource, right)
    }

    #[instrument(level = "debug", skip_all)]
    fn check_distribution_list_right(
        &self,
        dl: &Entry,
        _right: &Right,
    ) -> Result<(), OperationError> {
        if self.can_access_domained(dl) {
            Ok(())
        } else {
            Err(self.deny("can not access dl".to_string()))
        }
    }

    #[instrument(level = "debug", skip_all)]
    fn check_dynamic_group_right(
        &self,
        group: &Entry,
        _right: &Right,
    ) -> Result<(), OperationError> {
        if self.can_access_domained(group) {
            Ok(())
        } else {
            Err(self.deny("can not access group".to_string()))
        }
    }

    #[instrument(level = "debug", skip_all)]
    fn check_domain_right(&self, domain: &Entry, _right: &Right) -> Result<(), OperationError> {
        if self.can_access_domained(domain) {
            Ok(())
        } else {
            Err(self.deny("can not access domain".to_string()))
        }
    }

    #[instrument(level = "debug", skip_all)]
    fn check_domain_right_by_name(
        &self,
        domain_name: &str,
        _right: &Right,
    ) -> Result<(), OperationError> {
        if !self.ident.is_domain_admin_only() || self.ident.can_access_domain_name(domain_name) {
            Ok(())
        } else {
            Err(self.deny("can not access domain".to_string()))
        }
    }

    #[instrument(level = "debug", skip_all)]
    fn check_domain_right_by_email(
        &self,
        email: &str,
        _right: &AdminRight,
    ) -> Result<(), OperationError> {
        if !self.ident.is_domain_admin_only() {
            return Ok(());
        }
        let domain_name = domain_of_email(email)?;
        if self.ident.can_access_domain_name(domain_name) {
            Ok(())
        } else {
            Err(self.deny(format!("can not access email:{}", email)))
        }
    }

    fn check_modify_attrs(
        &self,
        class: EntryClass,
        attrs: &BTreeMap<Attribute, Vec<String>>,
    ) -> Result<(), OperationError> {
        if !self.ident.is_domain_admin_only() {
            return Ok(());
        }
        let schema = self.prov.schema();
        match attrs
            .keys()
            .map(strip_modifier)
            .find(|attr| !schema.is_domain_admin_modifiable(attr, class))
        {
            Some(attr) => Err(self.deny(format!("can not modify attr: {}", attr))),
            None => Ok(()),
        }
    }

    fn check_set_attrs_on_create(
        &self,
        _target_type: TargetType,
        _name: &str,
        _attrs: &BTreeMap<Attribute, Vec<String>>,
    ) -> Result<(), OperationError> {
        Ok(())
    }

    fn has_rights_to_list(
        &self,
        _target: &Entry,
        _list_right: &AdminRight,
        _get_attr_right: Option<&Right>,
    ) -> Result<bool, OperationError> {
        Ok(true)
    }

    fn has_rights_to_list_cos(
        &self,
        cos: &Entry,
        _list_right: &AdminRight,
        _get_attr_right: Option<&Right>,
    ) -> Result<bool, OperationError> {
        self.can_access_cos(cos)
    }

    fn attr_right_checker(
        &self,
        _target: &Entry,
    ) -> Result<Box<dyn AttrRightChecker>, OperationError> {
        Ok(Box::new(AllowAllAttrs))
    }
}
