use std::collections::BTreeSet;

use crate::prelude::*;

/// A restriction on the values a delegated admin may write to an attribute,
/// registered on a COS, a domain, or the global configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeConstraint {
    pub attr: Attribute,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub values: Option<BTreeSet<String>>,
}

impl AttributeConstraint {
    pub fn new(attr: Attribute) -> Self {
        AttributeConstraint {
            attr,
            min: None,
            max: None,
            values: None,
        }
    }

    pub fn with_min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_values(mut self, values: &[&str]) -> Self {
        self.values = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    /// Whether `value` satisfies the constraint. A bounded attribute with a
    /// value that is not an integer is a violation.
    pub fn allows(&self, value: &str) -> bool {
        if self.min.is_some() || self.max.is_some() {
            let Ok(v) = value.trim().parse::<i64>() else {
                return false;
            };
            if self.min.map(|min| v < min).unwrap_or(false)
                || self.max.map(|max| v > max).unwrap_or(false)
            {
                return false;
            }
        }

        self.values
            .as_ref()
            .map(|allowed| allowed.contains(value))
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_bounds() {
        let c = AttributeConstraint::new(Attribute::MailQuota)
            .with_min(0)
            .with_max(1024);
        assert!(c.allows("0"));
        assert!(c.allows("1024"));
        assert!(!c.allows("1025"));
        assert!(!c.allows("-1"));
        assert!(!c.allows("lots"));
    }

    #[test]
    fn test_constraint_values() {
        let c = AttributeConstraint::new(Attribute::AccountStatus).with_values(&["active", "locked"]);
        assert!(c.allows("locked"));
        assert!(!c.allows("closed"));

        let unconstrained = AttributeConstraint::new(Attribute::Description);
        assert!(unconstrained.allows("anything"));
    }
}
