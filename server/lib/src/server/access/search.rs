//! Filtering of bulk listings. Every search or get-all style response must pass
//! its candidate entries through a [SearchDirectoryRightChecker] before they
//! are returned, so no entry is disclosed to an admin lacking the list right,
//! and the get attrs right where one applies.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::AdminAccessControl;
use crate::prelude::*;
use crate::right::*;

pub struct SearchDirectoryRightChecker<'a> {
    access: &'a dyn AdminAccessControl,
    prov: &'a dyn Provisioning,
    requested_attrs: Option<BTreeSet<Attribute>>,
    // Global admins see everything, skip the per entry checks.
    allow_all: bool,
}

impl<'a> SearchDirectoryRightChecker<'a> {
    /// `requested_attrs` is the set of attributes the caller asked for, if it
    /// asked for specific ones. Otherwise the "get all attributes" right of
    /// each entry kind is required.
    pub fn new(
        access: &'a dyn AdminAccessControl,
        prov: &'a dyn Provisioning,
        requested_attrs: Option<BTreeSet<Attribute>>,
    ) -> Self {
        let allow_all = access.identity().is_global_admin();
        SearchDirectoryRightChecker {
            access,
            prov,
            requested_attrs,
            allow_all,
        }
    }

    /// The get attrs right needed for an entry: the requested attributes that
    /// are valid on the entry, or the kind's get-all right.
    fn get_attr_right(&self, entry: &Entry, get_all: &AdminRight) -> Right {
        match &self.requested_attrs {
            Some(attrs) => Right::GetAttrs(
                self.prov
                    .schema()
                    .filter_valid(attrs, entry.get_class()),
            ),
            None => Right::from(get_all),
        }
    }

    fn has_rights_to_list(
        &self,
        entry: &Entry,
        list_right: &AdminRight,
        get_all: &AdminRight,
    ) -> Result<bool, OperationError> {
        let get_attr_right = self.get_attr_right(entry, get_all);
        self.access
            .has_rights_to_list(entry, list_right, Some(&get_attr_right))
    }

    /// An alias has no rights of its own. It is visible exactly when the list
    /// right of the entry it points at is granted, no get attrs right is
    /// needed. A dangling alias is visible only to system admins.
    fn has_rights_to_list_alias(&self, alias: &Entry) -> Result<bool, OperationError> {
        let Some(target) = self.prov.get_alias_target(alias)? else {
            filter_info!(alias = %alias.get_name(), "dangling alias");
            return self
                .access
                .has_rights_to_list(alias, &PR_SYSTEM_ADMIN_ONLY, None);
        };
        let list_right: &AdminRight = match target.get_class() {
            EntryClass::Account => &RT_LIST_ACCOUNT,
            EntryClass::CalResource => &RT_LIST_CALENDAR_RESOURCE,
            EntryClass::DistributionList | EntryClass::DynamicGroup => &RT_LIST_DISTRIBUTION_LIST,
            class => {
                filter_warn!(alias = %alias.get_name(), target = %target.get_name(), %class, "alias refers to an entry that can not be aliased");
                return self
                    .access
                    .has_rights_to_list(alias, &PR_SYSTEM_ADMIN_ONLY, None);
            }
        };
        self.access.has_rights_to_list(&target, list_right, None)
    }

    fn allow_target(&self, entry: &Entry) -> Result<bool, OperationError> {
        match entry.get_class() {
            EntryClass::Account => {
                self.has_rights_to_list(entry, &RT_LIST_ACCOUNT, &RT_GET_ACCOUNT)
            }
            EntryClass::CalResource => self.has_rights_to_list(
                entry,
                &RT_LIST_CALENDAR_RESOURCE,
                &RT_GET_CALENDAR_RESOURCE,
            ),
            EntryClass::DistributionList | EntryClass::DynamicGroup => self.has_rights_to_list(
                entry,
                &RT_LIST_DISTRIBUTION_LIST,
                &RT_GET_DISTRIBUTION_LIST,
            ),
            EntryClass::Domain => self.has_rights_to_list(entry, &RT_LIST_DOMAIN, &RT_GET_DOMAIN),
            EntryClass::Cos => {
                let get_attr_right = self.get_attr_right(entry, &RT_GET_COS);
                self.access
                    .has_rights_to_list_cos(entry, &RT_LIST_COS, Some(&get_attr_right))
            }
            EntryClass::Alias => self.has_rights_to_list_alias(entry),
            class => {
                filter_trace!(entry = %entry.get_name(), %class, "entry kind is never listed");
                Ok(false)
            }
        }
    }

    /// Whether the entry may appear in the listing.
    pub fn allow(&self, entry: &Entry) -> Result<bool, OperationError> {
        if self.allow_all {
            return Ok(true);
        }
        self.allow_target(entry)
    }

    /// The allowed subset of `entries`, in their original order.
    #[instrument(level = "debug", skip_all)]
    pub fn get_allowed<I>(&self, entries: I) -> Result<Vec<Arc<Entry>>, OperationError>
    where
        I: IntoIterator<Item = Arc<Entry>>,
    {
        self.get_allowed_limited(entries, usize::MAX)
    }

    /// As [SearchDirectoryRightChecker::get_allowed], stopping once `max`
    /// entries have been allowed.
    pub fn get_allowed_limited<I>(
        &self,
        entries: I,
        max: usize,
    ) -> Result<Vec<Arc<Entry>>, OperationError>
    where
        I: IntoIterator<Item = Arc<Entry>>,
    {
        let mut allowed = Vec::new();
        for entry in entries {
            if allowed.len() >= max {
                break;
            }
            if self.allow(&entry)? {
                allowed.push(entry);
            }
        }
        filter_info!(allowed = allowed.len(), "search result filtered");
        Ok(allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::{Grant, Grantee};
    use crate::testkit::TestDirectory;

    macro_rules! test_list_filter {
        ($td:expr, $manager:expr, $who:expr, $attrs:expr, $entries:expr, $expect:expr) => {{
            let controls = $td.controls($manager);
            let engine = controls.engine(&$td.token($who)).expect("no engine");
            let checker = SearchDirectoryRightChecker::new(engine.as_ref(), $td.be.as_ref(), $attrs);
            let entries: Vec<Arc<Entry>> = $entries.iter().map(|u| $td.entry(*u)).collect();
            let res: Vec<Uuid> = checker
                .get_allowed(entries)
                .expect("filtering failed")
                .iter()
                .map(|e| e.get_uuid())
                .collect();
            let expect: Vec<Uuid> = Vec::from($expect);
            assert_eq!(res, expect);
        }};
    }

    #[test]
    fn test_get_allowed_preserves_order() {
        sketching::test_init();
        let td = TestDirectory::new();
        let mut wr = td.acl.write();
        // Deny the even positions, allow the odd.
        wr.grant(Grant::allow(td.domain_b, Grantee::User(td.deleg), &RT_LIST_ACCOUNT));
        wr.grant(Grant::allow(td.domain_b, Grantee::User(td.deleg), &RT_GET_ACCOUNT));
        wr.grant(Grant::allow(td.domain_a, Grantee::User(td.deleg), &RT_LIST_CALENDAR_RESOURCE));
        wr.grant(Grant::allow(td.domain_a, Grantee::User(td.deleg), &RT_GET_CALENDAR_RESOURCE));
        wr.commit();

        let entries = [td.user1, td.user_b, td.user2, td.cr1, td.cr_b, td.user_b2];
        test_list_filter!(
            td,
            AccessManagerType::Acl,
            td.deleg,
            None,
            entries,
            [td.user_b, td.cr1, td.user_b2]
        );

        // Global admins see everything.
        test_list_filter!(td, AccessManagerType::Acl, td.admin, None, entries, entries);

        // And under the domain model, listing is not filtered.
        test_list_filter!(td, AccessManagerType::Domain, td.domadmin, None, entries, entries);
    }

    #[test]
    fn test_get_allowed_requested_attrs() {
        sketching::test_init();
        let td = TestDirectory::new();
        let mut wr = td.acl.write();
        wr.grant(Grant::allow(td.domain_a, Grantee::User(td.deleg), &RT_LIST_ACCOUNT));
        wr.grant(Grant::allow(td.domain_a, Grantee::User(td.deleg), &RT_LIST_CALENDAR_RESOURCE));
        wr.grant(Grant::allow(
            td.domain_a,
            Grantee::User(td.deleg),
            &AdminRight::get_attrs(
                "getAccountMail",
                TargetType::Account,
                AttrScope::Some(btreeset![Attribute::Mail, Attribute::DisplayName]),
            ),
        ));
        wr.commit();

        let entries = [td.user1, td.user2, td.cr1];
        // Without requested attrs every attribute must be readable.
        test_list_filter!(td, AccessManagerType::Acl, td.deleg, None, entries, []);
        test_list_filter!(
            td,
            AccessManagerType::Acl,
            td.deleg,
            Some(btreeset![Attribute::Mail]),
            entries,
            [td.user1, td.user2]
        );
        // Attributes not valid on an account are ignored, and if none are left
        // the entry is skipped.
        test_list_filter!(
            td,
            AccessManagerType::Acl,
            td.deleg,
            Some(btreeset![Attribute::Mail, Attribute::DomainStatus]),
            entries,
            [td.user1, td.user2]
        );
        test_list_filter!(
            td,
            AccessManagerType::Acl,
            td.deleg,
            Some(btreeset![Attribute::DomainStatus]),
            entries,
            []
        );
    }

    #[test]
    fn test_alias_visibility_follows_target() {
        sketching::test_init();
        let td = TestDirectory::new();

        let entries = [td.alias_dl, td.alias_dangling];
        test_list_filter!(td, AccessManagerType::Acl, td.deleg, None, entries, []);

        // Rights on the alias itself do nothing.
        let mut wr = td.acl.write();
        wr.grant(Grant::allow(td.alias_dl, Grantee::User(td.deleg), &RT_LIST_DISTRIBUTION_LIST));
        wr.grant(Grant::allow(td.alias_dl, Grantee::User(td.deleg), &RT_GET_DISTRIBUTION_LIST));
        wr.commit();
        test_list_filter!(td, AccessManagerType::Acl, td.deleg, None, entries, []);

        // The list right on the list it points to is enough.
        let mut wr = td.acl.write();
        wr.grant(Grant::allow(td.staff_dl, Grantee::User(td.deleg), &RT_LIST_DISTRIBUTION_LIST));
        wr.commit();
        test_list_filter!(td, AccessManagerType::Acl, td.deleg, None, entries, [td.alias_dl]);
        // While the list itself also needs the get right.
        test_list_filter!(td, AccessManagerType::Acl, td.deleg, None, [td.staff_dl], []);

        // A denied list right hides the alias again.
        let mut wr = td.acl.write();
        wr.grant(Grant::deny(td.staff_dl, Grantee::User(td.deleg), &RT_LIST_DISTRIBUTION_LIST));
        wr.commit();
        test_list_filter!(td, AccessManagerType::Acl, td.deleg, None, entries, []);

        // Dangling aliases are for global admins only.
        test_list_filter!(td, AccessManagerType::Acl, td.admin, None, entries, entries);
    }

    #[test]
    fn test_get_allowed_limited_and_unlisted_kinds() {
        sketching::test_init();
        let td = TestDirectory::new();
        let controls = td.controls(AccessManagerType::Acl);

        let admin = controls.engine(&td.token(td.admin)).expect("no engine");
        let checker = SearchDirectoryRightChecker::new(admin.as_ref(), td.be.as_ref(), None);
        let entries: Vec<Arc<Entry>> = [td.user1, td.user2, td.user_b]
            .iter()
            .map(|u| td.entry(*u))
            .collect();
        let allowed = checker
            .get_allowed_limited(entries, 2)
            .expect("filtering failed");
        assert_eq!(allowed.len(), 2);
        assert_eq!(allowed[0].get_uuid(), td.user1);

        let mut wr = td.acl.write();
        wr.grant(Grant::allow(td.global, Grantee::AllAdmins, &RT_LIST_SERVER));
        wr.commit();
        let deleg = controls.engine(&td.token(td.deleg)).expect("no engine");
        let checker = SearchDirectoryRightChecker::new(deleg.as_ref(), td.be.as_ref(), None);
        assert_eq!(checker.allow(&td.entry(td.server1)), Ok(false));
    }
}
