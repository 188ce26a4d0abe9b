//! Because consistency is great!
//!

// Attribute names. These are always stored and compared lowercase.
pub const ATTR_ACCOUNT_STATUS: &str = "accountstatus";
pub const ATTR_ADMIN_NOTES: &str = "adminnotes";
pub const ATTR_ALIAS_TARGET_ID: &str = "aliastargetid";
pub const ATTR_COS_ID: &str = "cosid";
pub const ATTR_DESCRIPTION: &str = "description";
pub const ATTR_DISPLAYNAME: &str = "displayname";
pub const ATTR_DOMAIN_ACCESSIBLE_COS: &str = "domainaccessiblecos";
pub const ATTR_DOMAIN_DEFAULT_COS_ID: &str = "domaindefaultcosid";
pub const ATTR_DOMAIN_NAME: &str = "domainname";
pub const ATTR_DOMAIN_STATUS: &str = "domainstatus";
pub const ATTR_FEATURE_CALENDAR_ENABLED: &str = "featurecalendarenabled";
pub const ATTR_GIVEN_NAME: &str = "givenname";
pub const ATTR_IS_ADMIN_ACCOUNT: &str = "isadminaccount";
pub const ATTR_IS_DELEGATED_ADMIN_ACCOUNT: &str = "isdelegatedadminaccount";
pub const ATTR_IS_DOMAIN_ADMIN_ACCOUNT: &str = "isdomainadminaccount";
pub const ATTR_MAIL: &str = "mail";
pub const ATTR_MAIL_HOST: &str = "mailhost";
pub const ATTR_MAIL_QUOTA: &str = "mailquota";
pub const ATTR_MAIL_STATUS: &str = "mailstatus";
pub const ATTR_MEMBER_OF: &str = "memberof";
pub const ATTR_NAME: &str = "name";
pub const ATTR_PASSWORD_MIN_LENGTH: &str = "passwordminlength";
pub const ATTR_RESOURCE_CAPACITY: &str = "resourcecapacity";
pub const ATTR_SERVICE_HOSTNAME: &str = "servicehostname";
pub const ATTR_SURNAME: &str = "sn";
pub const ATTR_USER_PASSWORD: &str = "userpassword";
pub const ATTR_UUID: &str = "uuid";

// Domain lifecycle states.
pub const DOMAIN_STATUS_ACTIVE: &str = "active";
pub const DOMAIN_STATUS_CLOSED: &str = "closed";
pub const DOMAIN_STATUS_LOCKED: &str = "locked";
pub const DOMAIN_STATUS_MAINTENANCE: &str = "maintenance";
pub const DOMAIN_STATUS_SHUTDOWN: &str = "shutdown";
pub const DOMAIN_STATUS_SUSPENDED: &str = "suspended";

// Well known right names.
pub const RIGHT_CREATE_ACCOUNT: &str = "createAccount";
pub const RIGHT_CREATE_CALENDAR_RESOURCE: &str = "createCalendarResource";
pub const RIGHT_CREATE_COS: &str = "createCos";
pub const RIGHT_CREATE_DISTRIBUTION_LIST: &str = "createDistributionList";
pub const RIGHT_CREATE_TOP_DOMAIN: &str = "createTopDomain";
pub const RIGHT_DELETE_ACCOUNT: &str = "deleteAccount";
pub const RIGHT_DELETE_DOMAIN: &str = "deleteDomain";
pub const RIGHT_DOMAIN_ADMIN_ACCOUNT_RIGHTS: &str = "domainAdminAccountRights";
pub const RIGHT_GET_ACCOUNT: &str = "getAccount";
pub const RIGHT_GET_CALENDAR_RESOURCE: &str = "getCalendarResource";
pub const RIGHT_GET_COS: &str = "getCos";
pub const RIGHT_GET_DISTRIBUTION_LIST: &str = "getDistributionList";
pub const RIGHT_GET_DOMAIN: &str = "getDomain";
pub const RIGHT_GET_SERVER: &str = "getServer";
pub const RIGHT_LIST_ACCOUNT: &str = "listAccount";
pub const RIGHT_LIST_ALIAS: &str = "listAlias";
pub const RIGHT_LIST_CALENDAR_RESOURCE: &str = "listCalendarResource";
pub const RIGHT_LIST_COS: &str = "listCos";
pub const RIGHT_LIST_DISTRIBUTION_LIST: &str = "listDistributionList";
pub const RIGHT_LIST_DOMAIN: &str = "listDomain";
pub const RIGHT_LIST_SERVER: &str = "listServer";
pub const RIGHT_MODIFY_ACCOUNT: &str = "modifyAccount";
pub const RIGHT_RENAME_ACCOUNT: &str = "renameAccount";
pub const RIGHT_SET_ACCOUNT_PASSWORD: &str = "setAccountPassword";

// Pseudo rights, never granted, only consulted.
pub const PSEUDO_RIGHT_ALWAYS_ALLOW: &str = "PSEUDO_ALWAYS_ALLOW";
pub const PSEUDO_RIGHT_SYSTEM_ADMIN_ONLY: &str = "PSEUDO_SYSTEM_ADMIN_ONLY";

/// The label given to the pseudo target that unscoped rights are checked against.
pub const DEFAULT_GLOBAL_GRANT_NAME: &str = "globalacltarget";
/// The label of the global configuration entry.
pub const GLOBAL_CONFIG_NAME: &str = "globalconfig";
