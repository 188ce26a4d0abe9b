//! Target classification. Every entry an admin operation can act on maps to a
//! `TargetType`, which is what grants and rights are bound to. Aliases are the
//! one kind of entry that is never a target in their own right.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Account,
    CalResource,
    Dl,
    Group,
    Domain,
    Cos,
    Server,
    UcService,
    XmppComponent,
    Zimlet,
    Config,
    Global,
    AlwaysOnCluster,
}

impl TargetType {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetType::Account => "account",
            TargetType::CalResource => "calresource",
            TargetType::Dl => "dl",
            TargetType::Group => "group",
            TargetType::Domain => "domain",
            TargetType::Cos => "cos",
            TargetType::Server => "server",
            TargetType::UcService => "ucservice",
            TargetType::XmppComponent => "xmppcomponent",
            TargetType::Zimlet => "zimlet",
            TargetType::Config => "config",
            TargetType::Global => "global",
            TargetType::AlwaysOnCluster => "alwaysoncluster",
        }
    }

    /// Targets that live inside a domain, and so inherit grants made on it.
    pub fn is_domained(self) -> bool {
        matches!(
            self,
            TargetType::Account | TargetType::CalResource | TargetType::Dl | TargetType::Group
        )
    }

    /// The entry class a new entry of this target type will be created as.
    pub fn entry_class(self) -> EntryClass {
        match self {
            TargetType::Account => EntryClass::Account,
            TargetType::CalResource => EntryClass::CalResource,
            TargetType::Dl => EntryClass::DistributionList,
            TargetType::Group => EntryClass::DynamicGroup,
            TargetType::Domain => EntryClass::Domain,
            TargetType::Cos => EntryClass::Cos,
            TargetType::Server => EntryClass::Server,
            TargetType::UcService => EntryClass::UcService,
            TargetType::XmppComponent => EntryClass::XmppComponent,
            TargetType::Zimlet => EntryClass::Zimlet,
            TargetType::Config => EntryClass::Config,
            TargetType::Global => EntryClass::GlobalGrant,
            TargetType::AlwaysOnCluster => EntryClass::AlwaysOnCluster,
        }
    }
}

impl TryFrom<EntryClass> for TargetType {
    type Error = OperationError;

    fn try_from(class: EntryClass) -> Result<Self, Self::Error> {
        match class {
            EntryClass::Account => Ok(TargetType::Account),
            EntryClass::CalResource => Ok(TargetType::CalResource),
            EntryClass::DistributionList => Ok(TargetType::Dl),
            EntryClass::DynamicGroup => Ok(TargetType::Group),
            EntryClass::Domain => Ok(TargetType::Domain),
            EntryClass::Cos => Ok(TargetType::Cos),
            EntryClass::Server => Ok(TargetType::Server),
            EntryClass::Config => Ok(TargetType::Config),
            EntryClass::GlobalGrant => Ok(TargetType::Global),
            EntryClass::UcService => Ok(TargetType::UcService),
            EntryClass::XmppComponent => Ok(TargetType::XmppComponent),
            EntryClass::Zimlet => Ok(TargetType::Zimlet),
            EntryClass::AlwaysOnCluster => Ok(TargetType::AlwaysOnCluster),
            EntryClass::Alias => Err(OperationError::AC0005AliasNotATarget),
        }
    }
}

impl TryFrom<&Entry> for TargetType {
    type Error = OperationError;

    fn try_from(entry: &Entry) -> Result<Self, Self::Error> {
        TargetType::try_from(entry.get_class())
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "account" => Ok(TargetType::Account),
            "calresource" => Ok(TargetType::CalResource),
            "dl" => Ok(TargetType::Dl),
            "group" => Ok(TargetType::Group),
            "domain" => Ok(TargetType::Domain),
            "cos" => Ok(TargetType::Cos),
            "server" => Ok(TargetType::Server),
            "ucservice" => Ok(TargetType::UcService),
            "xmppcomponent" => Ok(TargetType::XmppComponent),
            "zimlet" => Ok(TargetType::Zimlet),
            "config" => Ok(TargetType::Config),
            "global" => Ok(TargetType::Global),
            "alwaysoncluster" => Ok(TargetType::AlwaysOnCluster),
            other => Err(OperationError::InvalidRequest(format!(
                "invalid target type: {}",
                other
            ))),
        }
    }
}

/// The lifecycle state of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DomainStatus {
    #[default]
    Active,
    Maintenance,
    Locked,
    Closed,
    Suspended,
    Shutdown,
}

impl DomainStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DomainStatus::Active => DOMAIN_STATUS_ACTIVE,
            DomainStatus::Maintenance => DOMAIN_STATUS_MAINTENANCE,
            DomainStatus::Locked => DOMAIN_STATUS_LOCKED,
            DomainStatus::Closed => DOMAIN_STATUS_CLOSED,
            DomainStatus::Suspended => DOMAIN_STATUS_SUSPENDED,
            DomainStatus::Shutdown => DOMAIN_STATUS_SHUTDOWN,
        }
    }

    /// Read the status of a domain entry. A domain with no status is active.
    pub fn of(domain: &Entry) -> Result<Self, OperationError> {
        match domain.get_ava_single(&Attribute::DomainStatus) {
            None => Ok(DomainStatus::Active),
            Some(s) => DomainStatus::from_str(s).map_err(|_| {
                admin_error!(domain = %domain.get_name(), status = %s, "invalid domain status");
                OperationError::InvalidEntryState
            }),
        }
    }
}

impl FromStr for DomainStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            DOMAIN_STATUS_ACTIVE => Ok(DomainStatus::Active),
            DOMAIN_STATUS_MAINTENANCE => Ok(DomainStatus::Maintenance),
            DOMAIN_STATUS_LOCKED => Ok(DomainStatus::Locked),
            DOMAIN_STATUS_CLOSED => Ok(DomainStatus::Closed),
            DOMAIN_STATUS_SUSPENDED => Ok(DomainStatus::Suspended),
            DOMAIN_STATUS_SHUTDOWN => Ok(DomainStatus::Shutdown),
            _ => Err(()),
        }
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
