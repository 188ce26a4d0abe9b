//! Directory entries as the access control engine sees them. An `Entry` is a
//! read-only snapshot fetched from the directory for the duration of a
//! request; the engine never mutates one. `EntryReduced` is the form handed to
//! the response encoder once attribute level redaction has been applied.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// The concrete kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryClass {
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
}

impl EntryClass {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryClass::Account => "account",
            EntryClass::CalResource => "calresource",
            EntryClass::DistributionList => "distributionlist",
            EntryClass::DynamicGroup => "dynamicgroup",
            EntryClass::Domain => "domain",
            EntryClass::Cos => "cos",
            EntryClass::Server => "server",
            EntryClass::Config => "config",
            EntryClass::GlobalGrant => "globalgrant",
            EntryClass::UcService => "ucservice",
            EntryClass::XmppComponent => "xmppcomponent",
            EntryClass::Zimlet => "zimlet",
            EntryClass::Alias => "alias",
            EntryClass::AlwaysOnCluster => "alwaysoncluster",
        }
    }

    /// Entries whose name is an address, and which therefore live inside a domain.
    pub fn is_domained(self) -> bool {
        matches!(
            self,
            EntryClass::Account
                | EntryClass::CalResource
                | EntryClass::DistributionList
                | EntryClass::DynamicGroup
                | EntryClass::Alias
        )
    }

    /// Entries that other entries can be a member of.
    pub fn is_group(self) -> bool {
        matches!(self, EntryClass::DistributionList | EntryClass::DynamicGroup)
    }
}

impl fmt::Display for EntryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split the domain from an address. Returns `None` when there is no domain part.
pub fn domain_of_address(address: &str) -> Option<&str> {
    match address.rsplit_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Some(domain),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    uuid: Uuid,
    class: EntryClass,
    name: String,
    #[serde(default)]
    attrs: BTreeMap<Attribute, Vec<String>>,
}

impl Entry {
    pub fn new(class: EntryClass, name: &str) -> Self {
        Entry {
            uuid: Uuid::new_v4(),
            class,
            name: name.to_lowercase(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn new_with_uuid(class: EntryClass, name: &str, uuid: Uuid) -> Self {
        Entry {
            uuid,
            ..Entry::new(class, name)
        }
    }

    /// Parse an entry from its json form. Mostly used for fixtures.
    pub fn from_json_str(es: &str) -> Result<Self, OperationError> {
        serde_json::from_str::<Entry>(es)
            .map(|mut e| {
                e.name = e.name.to_lowercase();
                e
            })
            .map_err(|e| {
                admin_error!(?e, "failed to parse entry");
                OperationError::InvalidEntryState
            })
    }

    /// Builder style value addition.
    pub fn with_ava(mut self, attr: Attribute, value: &str) -> Self {
        self.add_ava(attr, value);
        self
    }

    pub fn add_ava(&mut self, attr: Attribute, value: &str) {
        self.attrs.entry(attr).or_default().push(value.to_string());
    }

    pub fn set_ava(&mut self, attr: Attribute, values: Vec<String>) {
        self.attrs.insert(attr, values);
    }

    pub fn purge_ava(&mut self, attr: &Attribute) {
        self.attrs.remove(attr);
    }

    pub fn get_uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn get_class(&self) -> EntryClass {
        self.class
    }

    /// The name the entry is addressed by. For accounts, lists and aliases this
    /// is the email style address.
    pub fn get_name(&self) -> &str {
        self.name.as_str()
    }

    pub fn get_ava(&self, attr: &Attribute) -> Option<&[String]> {
        self.attrs.get(attr).map(|v| v.as_slice())
    }

    pub fn get_ava_single(&self, attr: &Attribute) -> Option<&str> {
        match self.attrs.get(attr).map(|v| v.as_slice()) {
            Some([value]) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn get_ava_single_bool(&self, attr: &Attribute) -> Option<bool> {
        self.get_ava_single(attr)
            .and_then(|v| match v.to_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            })
    }

    pub fn get_ava_single_uuid(&self, attr: &Attribute) -> Option<Uuid> {
        self.get_ava_single(attr)
            .and_then(|v| Uuid::parse_str(v).ok())
    }

    /// All uuid values of an attribute. Values that are not uuids are skipped.
    pub fn get_ava_as_uuids(&self, attr: &Attribute) -> impl Iterator<Item = Uuid> + '_ {
        self.attrs
            .get(attr)
            .into_iter()
            .flatten()
            .filter_map(|v| Uuid::parse_str(v).ok())
    }

    pub fn attribute_pres(&self, attr: &Attribute) -> bool {
        self.attrs.contains_key(attr)
    }

    pub fn attribute_equality(&self, attr: &Attribute, value: &str) -> bool {
        self.attrs
            .get(attr)
            .map(|vs| vs.iter().any(|v| v.eq_ignore_ascii_case(value)))
            .unwrap_or(false)
    }

    pub fn get_ava_names(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.keys()
    }

    /// The name of the domain this entry lives in, if it is a domained entry.
    /// A domain is considered to live in itself.
    pub fn domain_name(&self) -> Option<&str> {
        if self.class == EntryClass::Domain {
            Some(self.name.as_str())
        } else if self.class.is_domained() {
            domain_of_address(&self.name)
        } else {
            None
        }
    }

    /// Apply attribute level redaction. Every attribute is kept, but those the
    /// checker refuses are replaced with a permission denied marker.
    pub fn reduce(&self, checker: &dyn AttrRightChecker) -> EntryReduced {
        let attrs = self
            .attrs
            .iter()
            .map(|(attr, values)| {
                let rv = if checker.allow_attr(attr) {
                    ReducedValue::Present(values.clone())
                } else {
                    ReducedValue::PermissionDenied
                };
                (attr.clone(), rv)
            })
            .collect();

        EntryReduced {
            uuid: self.uuid,
            class: self.class,
            name: self.name.clone(),
            attrs,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.class, self.name, self.uuid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReducedValue {
    Present(Vec<String>),
    PermissionDenied,
}

/// An entry after redaction, ready to be encoded in a read response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReduced {
    uuid: Uuid,
    class: EntryClass,
    name: String,
    attrs: BTreeMap<Attribute, ReducedValue>,
}

impl EntryReduced {
    pub fn get_uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn get_name(&self) -> &str {
        self.name.as_str()
    }

    pub fn get_ava(&self, attr: &Attribute) -> Option<&ReducedValue> {
        self.attrs.get(attr)
    }

    pub fn is_denied(&self, attr: &Attribute) -> bool {
        matches!(self.attrs.get(attr), Some(ReducedValue::PermissionDenied))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Attribute, &ReducedValue)> {
        self.attrs.iter()
    }
}
