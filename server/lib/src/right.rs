//! The right model. An `AdminRight` is something that can be granted: a named
//! preset capability, a get or set attribute right, or a combo that bundles
//! other rights. A `Right` is what an operation *needs* at check time, and is
//! exactly one of a named admin right, a set of attributes to read, or a map of
//! attributes to write.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RightType {
    Preset,
    GetAttrs,
    SetAttrs,
    Combo,
}

/// The attributes an attribute right covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrScope {
    All,
    Some(BTreeSet<Attribute>),
}

impl AttrScope {
    /// `None` means every attribute.
    pub fn as_set(&self) -> Option<&BTreeSet<Attribute>> {
        match self {
            AttrScope::All => None,
            AttrScope::Some(set) => Some(set),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRight {
    name: String,
    right_type: RightType,
    target_types: BTreeSet<TargetType>,
    attrs: AttrScope,
    members: Vec<AdminRight>,
}

impl AdminRight {
    pub fn preset(name: &str, target_types: &[TargetType]) -> Self {
        AdminRight {
            name: name.to_string(),
            right_type: RightType::Preset,
            target_types: target_types.iter().copied().collect(),
            attrs: AttrScope::Some(BTreeSet::new()),
            members: Vec::new(),
        }
    }

    pub fn get_attrs(name: &str, target_type: TargetType, attrs: AttrScope) -> Self {
        AdminRight {
            name: name.to_string(),
            right_type: RightType::GetAttrs,
            target_types: btreeset![target_type],
            attrs,
            members: Vec::new(),
        }
    }

    pub fn set_attrs(name: &str, target_type: TargetType, attrs: AttrScope) -> Self {
        AdminRight {
            name: name.to_string(),
            right_type: RightType::SetAttrs,
            target_types: btreeset![target_type],
            attrs,
            members: Vec::new(),
        }
    }

    /// A right built at request time to read a specific set of attributes.
    pub fn dynamic_get_attrs(target_type: TargetType, attrs: BTreeSet<Attribute>) -> Self {
        Self::get_attrs("getAttrs", target_type, AttrScope::Some(attrs))
    }

    /// A right built at request time to write a specific set of attributes. The
    /// values are not known, so no attribute constraints are checked with it.
    pub fn dynamic_set_attrs(target_type: TargetType, attrs: BTreeSet<Attribute>) -> Self {
        Self::set_attrs("setAttrs", target_type, AttrScope::Some(attrs))
    }

    pub fn combo(name: &str, members: Vec<AdminRight>) -> Self {
        let target_types = members
            .iter()
            .flat_map(|m| m.target_types.iter().copied())
            .collect();
        AdminRight {
            name: name.to_string(),
            right_type: RightType::Combo,
            target_types,
            attrs: AttrScope::Some(BTreeSet::new()),
            members,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn right_type(&self) -> RightType {
        self.right_type
    }

    pub fn is_preset(&self) -> bool {
        self.right_type == RightType::Preset
    }

    pub fn is_attr_right(&self) -> bool {
        matches!(self.right_type, RightType::GetAttrs | RightType::SetAttrs)
    }

    pub fn attrs(&self) -> &AttrScope {
        &self.attrs
    }

    pub fn target_types(&self) -> &BTreeSet<TargetType> {
        &self.target_types
    }

    pub fn applies_to(&self, target_type: TargetType) -> bool {
        self.target_types.contains(&target_type)
    }

    /// True if granting this right grants the preset right `name`.
    pub fn covers(&self, name: &str) -> bool {
        match self.right_type {
            RightType::Combo => self.members.iter().any(|m| m.covers(name)),
            _ => self.name == name,
        }
    }

    /// The non-combo rights this right grants.
    pub fn leaves(&self) -> Vec<&AdminRight> {
        match self.right_type {
            RightType::Combo => self.members.iter().flat_map(|m| m.leaves()).collect(),
            _ => vec![self],
        }
    }

    /// Look up a well known right by name.
    pub fn lookup(name: &str) -> Result<&'static AdminRight, OperationError> {
        RIGHT_CATALOG.get(name).copied().ok_or_else(|| {
            admin_warn!(%name, "unknown right requested");
            OperationError::AC0006UnknownRight
        })
    }
}

impl fmt::Display for AdminRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

lazy_static! {
    pub static ref RT_LIST_ACCOUNT: AdminRight =
        AdminRight::preset(RIGHT_LIST_ACCOUNT, &[TargetType::Account]);
    pub static ref RT_LIST_CALENDAR_RESOURCE: AdminRight =
        AdminRight::preset(RIGHT_LIST_CALENDAR_RESOURCE, &[TargetType::CalResource]);
    pub static ref RT_LIST_DISTRIBUTION_LIST: AdminRight =
        AdminRight::preset(RIGHT_LIST_DISTRIBUTION_LIST, &[TargetType::Dl, TargetType::Group]);
    pub static ref RT_LIST_DOMAIN: AdminRight =
        AdminRight::preset(RIGHT_LIST_DOMAIN, &[TargetType::Domain]);
    pub static ref RT_LIST_COS: AdminRight = AdminRight::preset(RIGHT_LIST_COS, &[TargetType::Cos]);
    pub static ref RT_LIST_SERVER: AdminRight =
        AdminRight::preset(RIGHT_LIST_SERVER, &[TargetType::Server]);
    pub static ref RT_LIST_ALIAS: AdminRight = AdminRight::preset(
        RIGHT_LIST_ALIAS,
        &[TargetType::Account, TargetType::CalResource, TargetType::Dl, TargetType::Group]
    );
    pub static ref RT_GET_ACCOUNT: AdminRight =
        AdminRight::get_attrs(RIGHT_GET_ACCOUNT, TargetType::Account, AttrScope::All);
    pub static ref RT_GET_CALENDAR_RESOURCE: AdminRight = AdminRight::get_attrs(
        RIGHT_GET_CALENDAR_RESOURCE,
        TargetType::CalResource,
        AttrScope::All
    );
    pub static ref RT_GET_DISTRIBUTION_LIST: AdminRight =
        AdminRight::get_attrs(RIGHT_GET_DISTRIBUTION_LIST, TargetType::Dl, AttrScope::All);
    pub static ref RT_GET_DOMAIN: AdminRight =
        AdminRight::get_attrs(RIGHT_GET_DOMAIN, TargetType::Domain, AttrScope::All);
    pub static ref RT_GET_COS: AdminRight =
        AdminRight::get_attrs(RIGHT_GET_COS, TargetType::Cos, AttrScope::All);
    pub static ref RT_GET_SERVER: AdminRight =
        AdminRight::get_attrs(RIGHT_GET_SERVER, TargetType::Server, AttrScope::All);
    pub static ref RT_CREATE_ACCOUNT: AdminRight =
        AdminRight::preset(RIGHT_CREATE_ACCOUNT, &[TargetType::Domain]);
    pub static ref RT_CREATE_CALENDAR_RESOURCE: AdminRight =
        AdminRight::preset(RIGHT_CREATE_CALENDAR_RESOURCE, &[TargetType::Domain]);
    pub static ref RT_CREATE_DISTRIBUTION_LIST: AdminRight =
        AdminRight::preset(RIGHT_CREATE_DISTRIBUTION_LIST, &[TargetType::Domain]);
    pub static ref RT_CREATE_TOP_DOMAIN: AdminRight =
        AdminRight::preset(RIGHT_CREATE_TOP_DOMAIN, &[TargetType::Global]);
    pub static ref RT_CREATE_COS: AdminRight =
        AdminRight::preset(RIGHT_CREATE_COS, &[TargetType::Global]);
    pub static ref RT_DELETE_ACCOUNT: AdminRight =
        AdminRight::preset(RIGHT_DELETE_ACCOUNT, &[TargetType::Account]);
    pub static ref RT_DELETE_DOMAIN: AdminRight =
        AdminRight::preset(RIGHT_DELETE_DOMAIN, &[TargetType::Domain]);
    pub static ref RT_RENAME_ACCOUNT: AdminRight =
        AdminRight::preset(RIGHT_RENAME_ACCOUNT, &[TargetType::Account]);
    pub static ref RT_SET_ACCOUNT_PASSWORD: AdminRight =
        AdminRight::preset(RIGHT_SET_ACCOUNT_PASSWORD, &[TargetType::Account]);
    pub static ref RT_MODIFY_ACCOUNT: AdminRight =
        AdminRight::set_attrs(RIGHT_MODIFY_ACCOUNT, TargetType::Account, AttrScope::All);
    pub static ref RT_DOMAIN_ADMIN_ACCOUNT_RIGHTS: AdminRight = AdminRight::combo(
        RIGHT_DOMAIN_ADMIN_ACCOUNT_RIGHTS,
        vec![
            RT_LIST_ACCOUNT.clone(),
            RT_GET_ACCOUNT.clone(),
            RT_MODIFY_ACCOUNT.clone(),
            RT_DELETE_ACCOUNT.clone(),
            RT_RENAME_ACCOUNT.clone(),
            RT_SET_ACCOUNT_PASSWORD.clone(),
        ]
    );

    /// Always granted, regardless of grants. Never granted explicitly.
    pub static ref PR_ALWAYS_ALLOW: AdminRight = AdminRight::preset(PSEUDO_RIGHT_ALWAYS_ALLOW, &[]);
    /// Only ever held by global admins.
    pub static ref PR_SYSTEM_ADMIN_ONLY: AdminRight =
        AdminRight::preset(PSEUDO_RIGHT_SYSTEM_ADMIN_ONLY, &[]);

    static ref RIGHT_CATALOG: BTreeMap<&'static str, &'static AdminRight> = {
        let rights: [&'static AdminRight; 24] = [
            &RT_LIST_ACCOUNT,
            &RT_LIST_CALENDAR_RESOURCE,
            &RT_LIST_DISTRIBUTION_LIST,
            &RT_LIST_DOMAIN,
            &RT_LIST_COS,
            &RT_LIST_SERVER,
            &RT_LIST_ALIAS,
            &RT_GET_ACCOUNT,
            &RT_GET_CALENDAR_RESOURCE,
            &RT_GET_DISTRIBUTION_LIST,
            &RT_GET_DOMAIN,
            &RT_GET_COS,
            &RT_GET_SERVER,
            &RT_CREATE_ACCOUNT,
            &RT_CREATE_CALENDAR_RESOURCE,
            &RT_CREATE_DISTRIBUTION_LIST,
            &RT_CREATE_TOP_DOMAIN,
            &RT_CREATE_COS,
            &RT_DELETE_ACCOUNT,
            &RT_DELETE_DOMAIN,
            &RT_RENAME_ACCOUNT,
            &RT_SET_ACCOUNT_PASSWORD,
            &RT_MODIFY_ACCOUNT,
            &RT_DOMAIN_ADMIN_ACCOUNT_RIGHTS,
        ];
        rights.into_iter().map(|r| (r.name(), r)).collect()
    };
}

/// Strip the `+` / `-` modify prefix a set-attrs request may carry on a name.
pub fn strip_modifier(attr: &Attribute) -> Attribute {
    let name = attr.as_str();
    match name.strip_prefix('+').or_else(|| name.strip_prefix('-')) {
        Some(bare) => Attribute::from_str(bare),
        None => attr.clone(),
    }
}

/// The set of attribute names a set-attrs request touches, modify prefixes removed.
pub fn set_attr_names(attrs: &BTreeMap<Attribute, Vec<String>>) -> BTreeSet<Attribute> {
    attrs.keys().map(strip_modifier).collect()
}

/// The right a single operation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Right {
    Admin(AdminRight),
    GetAttrs(BTreeSet<Attribute>),
    SetAttrs(BTreeMap<Attribute, Vec<String>>),
}

impl From<&AdminRight> for Right {
    fn from(right: &AdminRight) -> Self {
        Right::Admin(right.clone())
    }
}

impl Right {
    pub fn is_system_admin_only(&self) -> bool {
        matches!(self, Right::Admin(r) if r.name() == PSEUDO_RIGHT_SYSTEM_ADMIN_ONLY)
    }
}

impl fmt::Display for Right {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Right::Admin(r) => write!(f, "{}", r),
            Right::GetAttrs(set) => write!(f, "get attrs [{}]", set.iter().join(", ")),
            Right::SetAttrs(map) => write!(f, "set attrs [{}]", map.keys().join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_covers_members() {
        let combo = &*RT_DOMAIN_ADMIN_ACCOUNT_RIGHTS;
        assert!(combo.covers(RIGHT_LIST_ACCOUNT));
        assert!(combo.covers(RIGHT_DELETE_ACCOUNT));
        assert!(!combo.covers(RIGHT_CREATE_ACCOUNT));
        assert!(combo.applies_to(TargetType::Account));
        assert_eq!(combo.leaves().len(), 6);

        let nested = AdminRight::combo("nested", vec![combo.clone(), RT_LIST_COS.clone()]);
        assert!(nested.covers(RIGHT_SET_ACCOUNT_PASSWORD));
        assert!(nested.covers(RIGHT_LIST_COS));
        assert_eq!(nested.leaves().len(), 7);
    }

    #[test]
    fn test_right_lookup() {
        let r = AdminRight::lookup("listAccount").expect("right missing");
        assert!(r.is_preset());
        assert_eq!(r, &*RT_LIST_ACCOUNT);
        assert_eq!(
            AdminRight::lookup("launchMissiles"),
            Err(OperationError::AC0006UnknownRight)
        );
    }

    #[test]
    fn test_strip_modifier() {
        assert_eq!(strip_modifier(&Attribute::from("+mail")), Attribute::Mail);
        assert_eq!(
            strip_modifier(&Attribute::from("-displayName")),
            Attribute::DisplayName
        );
        assert_eq!(strip_modifier(&Attribute::Mail), Attribute::Mail);

        let names = set_attr_names(&btreemap![
            (Attribute::from("+mail"), vec!["a@example.com".to_string()]),
            (Attribute::Mail, vec!["b@example.com".to_string()])
        ]);
        assert_eq!(names, btreeset![Attribute::Mail]);
    }

    #[test]
    fn test_right_display() {
        assert_eq!(Right::from(&*RT_LIST_ACCOUNT).to_string(), "listAccount");
        assert_eq!(
            get_attrs!("mail", "displayName").to_string(),
            "get attrs [displayname, mail]"
        );
        assert!(Right::from(&*PR_SYSTEM_ADMIN_ONLY).is_system_admin_only());
    }
}
