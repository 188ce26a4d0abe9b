//! Attribute schema. The engine consults the schema for two things: which
//! attributes are valid on which entry classes, and which attributes a
//! domain admin is allowed to modify under the domain based model.

use std::collections::{BTreeMap, BTreeSet};

use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaAttribute {
    pub name: Attribute,
    pub classes: BTreeSet<EntryClass>,
    pub domain_admin_modifiable: bool,
}

impl SchemaAttribute {
    pub fn new(name: Attribute, classes: &[EntryClass], domain_admin_modifiable: bool) -> Self {
        SchemaAttribute {
            name,
            classes: classes.iter().copied().collect(),
            domain_admin_modifiable,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    attributes: BTreeMap<Attribute, SchemaAttribute>,
}

impl Schema {
    pub fn new() -> Self {
        use EntryClass::*;

        let mut schema = Schema::default();
        let all = [
            Account,
            CalResource,
            DistributionList,
            DynamicGroup,
            Domain,
            Cos,
            Server,
            Config,
            GlobalGrant,
            UcService,
            XmppComponent,
            Zimlet,
            Alias,
            AlwaysOnCluster,
        ];
        let mailboxes = [Account, CalResource];
        let addressed = [Account, CalResource, DistributionList, DynamicGroup];

        [
            SchemaAttribute::new(Attribute::Uuid, &all, false),
            SchemaAttribute::new(Attribute::Name, &all, false),
            SchemaAttribute::new(
                Attribute::Description,
                &[Account, CalResource, DistributionList, DynamicGroup, Domain, Cos, Server],
                true,
            ),
            SchemaAttribute::new(
                Attribute::DisplayName,
                &[Account, CalResource, DistributionList, DynamicGroup, Domain, Cos],
                true,
            ),
            SchemaAttribute::new(Attribute::GivenName, &mailboxes, true),
            SchemaAttribute::new(Attribute::Surname, &mailboxes, true),
            SchemaAttribute::new(Attribute::Mail, &addressed, true),
            SchemaAttribute::new(Attribute::MailStatus, &addressed, true),
            SchemaAttribute::new(Attribute::UserPassword, &mailboxes, true),
            SchemaAttribute::new(Attribute::AccountStatus, &mailboxes, true),
            SchemaAttribute::new(Attribute::CosId, &mailboxes, true),
            SchemaAttribute::new(Attribute::FeatureCalendarEnabled, &[Account, CalResource, Cos], true),
            SchemaAttribute::new(Attribute::ResourceCapacity, &[CalResource], true),
            SchemaAttribute::new(
                Attribute::AdminNotes,
                &[Account, CalResource, DistributionList, DynamicGroup, Domain, Cos],
                false,
            ),
            SchemaAttribute::new(Attribute::MailHost, &mailboxes, false),
            SchemaAttribute::new(Attribute::MailQuota, &[Account, CalResource, Cos], false),
            SchemaAttribute::new(Attribute::PasswordMinLength, &[Account, Cos, Domain, Config], false),
            SchemaAttribute::new(Attribute::IsAdminAccount, &[Account], false),
            SchemaAttribute::new(Attribute::IsDelegatedAdminAccount, &[Account], false),
            SchemaAttribute::new(Attribute::IsDomainAdminAccount, &[Account], false),
            SchemaAttribute::new(Attribute::MemberOf, &addressed, false),
            SchemaAttribute::new(Attribute::AliasTargetId, &[Alias], false),
            SchemaAttribute::new(Attribute::DomainName, &[Domain], false),
            SchemaAttribute::new(Attribute::DomainStatus, &[Domain], false),
            SchemaAttribute::new(Attribute::DomainAccessibleCos, &[Domain], false),
            SchemaAttribute::new(Attribute::DomainDefaultCosId, &[Domain], false),
            SchemaAttribute::new(
                Attribute::ServiceHostname,
                &[Server, UcService, XmppComponent],
                false,
            ),
        ]
        .into_iter()
        .for_each(|sa| schema.insert(sa));

        schema
    }

    pub fn insert(&mut self, attr: SchemaAttribute) {
        self.attributes.insert(attr.name.clone(), attr);
    }

    pub fn get_attribute(&self, attr: &Attribute) -> Option<&SchemaAttribute> {
        self.attributes.get(attr)
    }

    pub fn is_valid_on(&self, attr: &Attribute, class: EntryClass) -> bool {
        self.attributes
            .get(attr)
            .map(|sa| sa.classes.contains(&class))
            .unwrap_or(false)
    }

    /// Flagged as domain admin modifiable, *and* valid on the class in question.
    pub fn is_domain_admin_modifiable(&self, attr: &Attribute, class: EntryClass) -> bool {
        self.attributes
            .get(attr)
            .map(|sa| sa.domain_admin_modifiable && sa.classes.contains(&class))
            .unwrap_or(false)
    }

    pub fn valid_attrs_for(&self, class: EntryClass) -> BTreeSet<Attribute> {
        self.attributes
            .values()
            .filter(|sa| sa.classes.contains(&class))
            .map(|sa| sa.name.clone())
            .collect()
    }

    /// Narrow a requested attribute set to those that can exist on the class.
    pub fn filter_valid(&self, attrs: &BTreeSet<Attribute>, class: EntryClass) -> BTreeSet<Attribute> {
        attrs
            .iter()
            .filter(|a| self.is_valid_on(a, class))
            .cloned()
            .collect()
    }
}
