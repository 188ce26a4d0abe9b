use serde::{Deserialize, Serialize};

use crate::constants::*;
use std::fmt;

pub use smartstring::alias::String as AttrString;

/// The name of an attribute on a directory entry. Names are case insensitive,
/// and are always normalised to lowercase. Names that this crate does not know
/// about are carried as `Custom`.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
#[serde(try_from = "&str", into = "AttrString")]
pub enum Attribute {
    AccountStatus,
    AdminNotes,
    AliasTargetId,
    CosId,
    Description,
    DisplayName,
    DomainAccessibleCos,
    DomainDefaultCosId,
    DomainName,
    DomainStatus,
    FeatureCalendarEnabled,
    GivenName,
    IsAdminAccount,
    IsDelegatedAdminAccount,
    IsDomainAdminAccount,
    Mail,
    MailHost,
    MailQuota,
    MailStatus,
    MemberOf,
    Name,
    PasswordMinLength,
    ResourceCapacity,
    ServiceHostname,
    Surname,
    UserPassword,
    Uuid,

    Custom(AttrString),
}

impl AsRef<str> for Attribute {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Self::from_str(value)
    }
}

impl From<&AttrString> for Attribute {
    fn from(value: &AttrString) -> Self {
        Self::from_str(value.as_str())
    }
}

impl<'a> From<&'a Attribute> for &'a str {
    fn from(val: &'a Attribute) -> Self {
        val.as_str()
    }
}

impl From<Attribute> for AttrString {
    fn from(val: Attribute) -> Self {
        AttrString::from(val.as_str())
    }
}

impl Attribute {
    pub fn as_str(&self) -> &str {
        match self {
            Attribute::AccountStatus => ATTR_ACCOUNT_STATUS,
            Attribute::AdminNotes => ATTR_ADMIN_NOTES,
            Attribute::AliasTargetId => ATTR_ALIAS_TARGET_ID,
            Attribute::CosId => ATTR_COS_ID,
            Attribute::Description => ATTR_DESCRIPTION,
            Attribute::DisplayName => ATTR_DISPLAYNAME,
            Attribute::DomainAccessibleCos => ATTR_DOMAIN_ACCESSIBLE_COS,
            Attribute::DomainDefaultCosId => ATTR_DOMAIN_DEFAULT_COS_ID,
            Attribute::DomainName => ATTR_DOMAIN_NAME,
            Attribute::DomainStatus => ATTR_DOMAIN_STATUS,
            Attribute::FeatureCalendarEnabled => ATTR_FEATURE_CALENDAR_ENABLED,
            Attribute::GivenName => ATTR_GIVEN_NAME,
            Attribute::IsAdminAccount => ATTR_IS_ADMIN_ACCOUNT,
            Attribute::IsDelegatedAdminAccount => ATTR_IS_DELEGATED_ADMIN_ACCOUNT,
            Attribute::IsDomainAdminAccount => ATTR_IS_DOMAIN_ADMIN_ACCOUNT,
            Attribute::Mail => ATTR_MAIL,
            Attribute::MailHost => ATTR_MAIL_HOST,
            Attribute::MailQuota => ATTR_MAIL_QUOTA,
            Attribute::MailStatus => ATTR_MAIL_STATUS,
            Attribute::MemberOf => ATTR_MEMBER_OF,
            Attribute::Name => ATTR_NAME,
            Attribute::PasswordMinLength => ATTR_PASSWORD_MIN_LENGTH,
            Attribute::ResourceCapacity => ATTR_RESOURCE_CAPACITY,
            Attribute::ServiceHostname => ATTR_SERVICE_HOSTNAME,
            Attribute::Surname => ATTR_SURNAME,
            Attribute::UserPassword => ATTR_USER_PASSWORD,
            Attribute::Uuid => ATTR_UUID,

            Attribute::Custom(value) => value.as_str(),
        }
    }

    // We allow this because the standard lib from_str is fallible, and we want an infallible version.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            ATTR_ACCOUNT_STATUS => Attribute::AccountStatus,
            ATTR_ADMIN_NOTES => Attribute::AdminNotes,
            ATTR_ALIAS_TARGET_ID => Attribute::AliasTargetId,
            ATTR_COS_ID => Attribute::CosId,
            ATTR_DESCRIPTION => Attribute::Description,
            ATTR_DISPLAYNAME => Attribute::DisplayName,
            ATTR_DOMAIN_ACCESSIBLE_COS => Attribute::DomainAccessibleCos,
            ATTR_DOMAIN_DEFAULT_COS_ID => Attribute::DomainDefaultCosId,
            ATTR_DOMAIN_NAME => Attribute::DomainName,
            ATTR_DOMAIN_STATUS => Attribute::DomainStatus,
            ATTR_FEATURE_CALENDAR_ENABLED => Attribute::FeatureCalendarEnabled,
            ATTR_GIVEN_NAME => Attribute::GivenName,
            ATTR_IS_ADMIN_ACCOUNT => Attribute::IsAdminAccount,
            ATTR_IS_DELEGATED_ADMIN_ACCOUNT => Attribute::IsDelegatedAdminAccount,
            ATTR_IS_DOMAIN_ADMIN_ACCOUNT => Attribute::IsDomainAdminAccount,
            ATTR_MAIL => Attribute::Mail,
            ATTR_MAIL_HOST => Attribute::MailHost,
            ATTR_MAIL_QUOTA => Attribute::MailQuota,
            ATTR_MAIL_STATUS => Attribute::MailStatus,
            ATTR_MEMBER_OF => Attribute::MemberOf,
            ATTR_NAME => Attribute::Name,
            ATTR_PASSWORD_MIN_LENGTH => Attribute::PasswordMinLength,
            ATTR_RESOURCE_CAPACITY => Attribute::ResourceCapacity,
            ATTR_SERVICE_HOSTNAME => Attribute::ServiceHostname,
            ATTR_SURNAME => Attribute::Surname,
            ATTR_USER_PASSWORD => Attribute::UserPassword,
            ATTR_UUID => Attribute::Uuid,

            other => Attribute::Custom(AttrString::from(other)),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::Attribute;

    #[test]
    fn test_attribute_from_str() {
        assert_eq!(Attribute::CosId, Attribute::from_str("COSID"));
        assert_eq!(Attribute::CosId, Attribute::from_str("cosId"));
        assert_eq!(Attribute::DisplayName, Attribute::from_str("displayName"));
    }

    #[test]
    fn test_attribute_custom_is_lowercased() {
        let attr = Attribute::from_str("FeatureIMEnabled");
        assert_eq!(attr.as_str(), "featureimenabled");
        assert!(matches!(attr, Attribute::Custom(_)));
    }

    #[test]
    fn test_attribute_serde() {
        let attr: Attribute = serde_json::from_str("\"mailQuota\"").expect("failed to parse");
        assert_eq!(attr, Attribute::MailQuota);
        let s = serde_json::to_string(&Attribute::UserPassword).expect("failed to serialise");
        assert_eq!(s, "\"userpassword\"");
    }
}
