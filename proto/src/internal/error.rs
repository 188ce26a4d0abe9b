use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/* ===== errors ===== */
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OperationError {
    // Logic errors, or "soft" errors.
    NotAuthenticated,
    /// The requesting principal lacks the right, with the operator facing reason.
    PermissionDenied(String),
    NoSuchDomain(String),
    NoSuchEntry(String),
    InvalidRequest(String),
    InvalidEntryState,
    InvalidAttributeName(String),
    InvalidConfiguration(String),
    /// The directory collaborator failed to answer.
    Backend,

    // Access Control
    AC0001UncheckableRightType,
    AC0002DomainOnlyOperation,
    AC0003PresetRightRequired,
    AC0004AttrRightRequired,
    AC0005AliasNotATarget,
    AC0006UnknownRight,
}

impl PartialEq for OperationError {
    fn eq(&self, other: &Self) -> bool {
        // Generally we only use the PartialEq for TESTING, where the
        // variant is what matters rather than the message text.
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl Display for OperationError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let debug = format!("{:?}", self);
        let mut output = debug.split('(').next().unwrap_or("").to_string();

        if let Some(msg) = self.message() {
            output += &format!(" - {}", msg);
        };
        f.write_str(&output)
    }
}

impl OperationError {
    /// Return the message associated with the error if there is one.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::NotAuthenticated => None,
            Self::PermissionDenied(reason) => Some(reason.clone()),
            Self::NoSuchDomain(name) => Some(format!("no such domain: {}", name)),
            Self::NoSuchEntry(name) => Some(format!("no such entry: {}", name)),
            Self::InvalidRequest(reason) => Some(reason.clone()),
            Self::InvalidEntryState => None,
            Self::InvalidAttributeName(name) => Some(format!("invalid attribute name: {}", name)),
            Self::InvalidConfiguration(reason) => Some(reason.clone()),
            Self::Backend => None,
            Self::AC0001UncheckableRightType => Some("This kind of right can not be checked directly, check one of the rights it contains instead.".into()),
            Self::AC0002DomainOnlyOperation => Some("This operation is only supported by the domain based access manager.".into()),
            Self::AC0003PresetRightRequired => Some("A preset right is required here.".into()),
            Self::AC0004AttrRightRequired => Some("A get attrs right is required here.".into()),
            Self::AC0005AliasNotATarget => Some("Aliases carry no rights, resolve the alias target first.".into()),
            Self::AC0006UnknownRight => Some("The requested right is not known to the access manager.".into()),
        }
    }

    /// True when this is the recoverable outcome of a failed rights check.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}

#[test]
fn test_operationerror_as_nice_string() {
    assert_eq!(
        OperationError::NotAuthenticated.to_string(),
        "NotAuthenticated".to_string()
    );
    assert_eq!(
        OperationError::PermissionDenied("need right: listAccount for account a@example.com".into())
            .to_string(),
        "PermissionDenied - need right: listAccount for account a@example.com".to_string()
    );
    assert_eq!(
        OperationError::NoSuchDomain("example.com".into()).to_string(),
        "NoSuchDomain - no such domain: example.com".to_string()
    );
    assert_eq!(
        OperationError::AC0002DomainOnlyOperation.to_string(),
        "AC0002DomainOnlyOperation - This operation is only supported by the domain based access manager.".to_string()
    );
}

#[test]
fn test_operationerror_permission_denied() {
    assert!(OperationError::PermissionDenied("nope".into()).is_permission_denied());
    assert!(!OperationError::Backend.is_permission_denied());
    assert!(!OperationError::AC0001UncheckableRightType.is_permission_denied());
    // Equality is by variant only.
    assert_eq!(
        OperationError::PermissionDenied("a".into()),
        OperationError::PermissionDenied("b".into())
    );
}
