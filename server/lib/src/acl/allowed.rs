use std::collections::{BTreeMap, BTreeSet};

use crate::prelude::*;

/// The outcome of evaluating attribute rights for one principal and target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedAttrs {
    AllowAll,
    DenyAll,
    AllowSome(BTreeSet<Attribute>),
    AllowAllExcept(BTreeSet<Attribute>),
}

impl AllowedAttrs {
    pub fn allows(&self, attr: &Attribute) -> bool {
        match self {
            AllowedAttrs::AllowAll => true,
            AllowedAttrs::DenyAll => false,
            AllowedAttrs::AllowSome(set) => set.contains(attr),
            AllowedAttrs::AllowAllExcept(set) => !set.contains(attr),
        }
    }

    pub fn allows_all(&self, attrs: &BTreeSet<Attribute>) -> bool {
        attrs.iter().all(|a| self.allows(a))
    }
}

impl AttrRightChecker for AllowedAttrs {
    fn allow_attr(&self, attr: &Attribute) -> bool {
        self.allows(attr)
    }
}

/// Accumulates attribute grants while walking from the most to the least
/// relevant target. Distances grow as the walk moves away from the target; an
/// attribute is denied when a deny was seen at an equal or closer distance
/// than the nearest allow.
#[derive(Debug, Default)]
pub(super) struct AttrCollector {
    allow_some: BTreeMap<Attribute, usize>,
    deny_some: BTreeMap<Attribute, usize>,
    // (deny, distance) of the first all-attributes grant seen.
    all: Option<(bool, usize)>,
}

impl AttrCollector {
    pub(super) fn add(&mut self, deny: bool, distance: usize, scope: &AttrScope) {
        match scope {
            AttrScope::All => {
                if self.all.is_none() {
                    self.all = Some((deny, distance));
                }
            }
            AttrScope::Some(set) => {
                let target = if deny {
                    &mut self.deny_some
                } else {
                    &mut self.allow_some
                };
                for attr in set {
                    target.entry(attr.clone()).or_insert(distance);
                }
            }
        }
    }

    /// An all-attributes grant ends the walk.
    pub(super) fn is_complete(&self) -> bool {
        self.all.is_some()
    }

    pub(super) fn finish(self) -> AllowedAttrs {
        let AttrCollector {
            allow_some,
            deny_some,
            all,
        } = self;

        let denied_at_or_before = |attr: &Attribute, distance: usize| {
            deny_some
                .get(attr)
                .map(|d| *d <= distance)
                .unwrap_or(false)
        };

        match all {
            Some((false, _)) => {
                let excluded: BTreeSet<Attribute> = deny_some
                    .iter()
                    .filter(|(attr, deny_distance)| {
                        allow_some
                            .get(*attr)
                            .map(|allow_distance| allow_distance >= *deny_distance)
                            .unwrap_or(true)
                    })
                    .map(|(attr, _)| attr.clone())
                    .collect();
                if excluded.is_empty() {
                    AllowedAttrs::AllowAll
                } else {
                    AllowedAttrs::AllowAllExcept(excluded)
                }
            }
            Some((true, all_distance)) => {
                let allowed: BTreeSet<Attribute> = allow_some
                    .iter()
                    .filter(|(attr, d)| **d < all_distance && !denied_at_or_before(attr, **d))
                    .map(|(attr, _)| attr.clone())
                    .collect();
                if allowed.is_empty() {
                    AllowedAttrs::DenyAll
                } else {
                    AllowedAttrs::AllowSome(allowed)
                }
            }
            None => {
                let allowed: BTreeSet<Attribute> = allow_some
                    .iter()
                    .filter(|(attr, d)| !denied_at_or_before(attr, **d))
                    .map(|(attr, _)| attr.clone())
                    .collect();
                AllowedAttrs::AllowSome(allowed)
            }
        }
    }
}
