//! The ACL access manager. This is the grant evaluator the ACL based access
//! control strategy consults: given a principal, a target and a right, it walks
//! the grants attached to the target and to everything the target inherits
//! grants from, and decides.
//!
//! The walk order, most relevant first, is:
//!
//! * the target itself
//! * the groups the target is a member of
//! * the domain the target lives in
//! * the global grant
//!
//! Within each step, grants made to the principal individually are considered
//! before grants made to groups the principal is in, and denies before allows.
//! The first matching grant decides a preset right. Attribute rights are
//! collected across the whole walk and resolved by distance, see [AllowedAttrs].
//!
//! Some hard rules apply before any grant is looked at: global admins are
//! always allowed, accounts that are not delegated admins are always denied,
//! and the pseudo rights decide themselves.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use concread::cowcell::{CowCell, CowCellWriteTxn};
use hashbrown::HashMap;

use crate::entry::domain_of_address;
use crate::prelude::*;
use crate::right::{set_attr_names, strip_modifier};

mod allowed;
mod constraint;
mod profiles;

pub use self::allowed::AllowedAttrs;
pub use self::constraint::AttributeConstraint;
pub use self::profiles::{Grant, Grantee};

use self::allowed::AttrCollector;

/// The grant evaluator contract. The ACL strategy asks only these questions.
pub trait AccessManager: Send + Sync {
    /// Can the principal exercise the preset right on the target.
    fn can_do(
        &self,
        ident: &Identity,
        target: &Entry,
        right: &AdminRight,
    ) -> Result<bool, OperationError>;

    /// Can the principal read every attribute in `attrs`. `None` is every
    /// attribute valid on the target.
    fn can_get_attrs(
        &self,
        ident: &Identity,
        target: &Entry,
        attrs: Option<&BTreeSet<Attribute>>,
    ) -> Result<bool, OperationError>;

    /// Can the principal write every attribute in `attrs`, without regard to
    /// the values that would be written.
    fn can_set_attr_names(
        &self,
        ident: &Identity,
        target: &Entry,
        attrs: Option<&BTreeSet<Attribute>>,
    ) -> Result<bool, OperationError>;

    /// Can the principal write these values, including attribute constraints.
    fn can_set_attrs(
        &self,
        ident: &Identity,
        target: &Entry,
        attrs: &BTreeMap<Attribute, Vec<String>>,
    ) -> Result<bool, OperationError>;

    /// Can the principal set these values on a not yet existing entry of the
    /// given type and name. Only grants that can be anchored without the entry
    /// existing are consulted.
    fn can_set_attrs_on_create(
        &self,
        ident: &Identity,
        target_type: TargetType,
        name: &str,
        attrs: &BTreeMap<Attribute, Vec<String>>,
    ) -> Result<bool, OperationError>;

    /// The readable attributes of the target.
    fn allowed_attrs(&self, ident: &Identity, target: &Entry)
        -> Result<AllowedAttrs, OperationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Get,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Individual,
    Group,
}

const PASSES: [Pass; 2] = [Pass::Individual, Pass::Group];

/// What the walk needs to know about the principal.
struct Principal {
    uuid: Uuid,
    groups: BTreeSet<Uuid>,
}

impl Principal {
    fn matches(&self, grantee: &Grantee, pass: Pass) -> bool {
        match pass {
            Pass::Individual => grantee.is_individual() && *grantee == Grantee::User(self.uuid),
            Pass::Group => match grantee {
                Grantee::Group(g) => self.groups.contains(g),
                Grantee::AllAdmins => true,
                Grantee::User(_) => false,
            },
        }
    }
}

#[derive(Clone, Default)]
struct AclAccessManagerInner {
    grants: HashMap<Uuid, Vec<Grant>>,
    constraints: HashMap<Uuid, Vec<AttributeConstraint>>,
}

pub struct AclAccessManager {
    inner: CowCell<AclAccessManagerInner>,
    prov: Arc<dyn Provisioning>,
}

pub struct AclAccessManagerWriteTransaction<'a> {
    inner: CowCellWriteTxn<'a, AclAccessManagerInner>,
}

impl AclAccessManagerWriteTransaction<'_> {
    pub fn grant(&mut self, grant: Grant) {
        admin_info!(%grant, "adding grant");
        self.inner
            .get_mut()
            .grants
            .entry(grant.target)
            .or_default()
            .push(grant);
    }

    /// Remove a grant. Returns false if no such grant existed.
    pub fn revoke(&mut self, grant: &Grant) -> bool {
        let Some(grants) = self.inner.get_mut().grants.get_mut(&grant.target) else {
            return false;
        };
        let before = grants.len();
        grants.retain(|g| g != grant);
        before != grants.len()
    }

    /// Attach a constraint to a COS, domain, or the global configuration entry.
    pub fn add_constraint(&mut self, on: Uuid, constraint: AttributeConstraint) {
        self.inner
            .get_mut()
            .constraints
            .entry(on)
            .or_default()
            .push(constraint);
    }

    pub fn commit(self) {
        self.inner.commit();
    }
}

impl AclAccessManager {
    pub fn new(prov: Arc<dyn Provisioning>) -> Self {
        AclAccessManager {
            inner: CowCell::new(AclAccessManagerInner::default()),
            prov,
        }
    }

    pub fn write(&self) -> AclAccessManagerWriteTransaction<'_> {
        AclAccessManagerWriteTransaction {
            inner: self.inner.write(),
        }
    }

    fn hard_rules(&self, ident: &Identity, right: Option<&AdminRight>) -> Option<bool> {
        if ident.is_global_admin() {
            trace!(%ident, "global admin, bypassing grant evaluation");
            return Some(true);
        }
        match right.map(|r| r.name()) {
            Some(PSEUDO_RIGHT_ALWAYS_ALLOW) => return Some(true),
            Some(PSEUDO_RIGHT_SYSTEM_ADMIN_ONLY) => return Some(false),
            _ => {}
        }
        if !ident.is_delegated_admin() {
            security_access!(%ident, "denied ❌ - not a delegated admin");
            return Some(false);
        }
        None
    }

    fn principal(&self, ident: &Identity) -> Result<Principal, OperationError> {
        let groups = self
            .prov
            .get_groups_of(ident.get_entry())?
            .iter()
            .map(|g| g.get_uuid())
            .collect();
        Ok(Principal {
            uuid: ident.get_uuid(),
            groups,
        })
    }

    /// The targets whose grants apply to `target`, most relevant first.
    fn target_chain(
        &self,
        target: &Entry,
        target_type: TargetType,
    ) -> Result<Vec<Vec<Uuid>>, OperationError> {
        let mut chain = vec![vec![target.get_uuid()]];

        if target_type.is_domained() {
            let groups: Vec<Uuid> = self
                .prov
                .get_groups_of(target)?
                .iter()
                .map(|g| g.get_uuid())
                .collect();
            if !groups.is_empty() {
                chain.push(groups);
            }
            if let Some(domain) = self.prov.get_domain_of(target)? {
                chain.push(vec![domain.get_uuid()]);
            }
        }

        if target_type != TargetType::Global {
            chain.push(vec![self.prov.get_global_grant()?.get_uuid()]);
        }

        Ok(chain)
    }

    /// The targets whose grants apply to an entry that is about to be created.
    fn create_chain(
        &self,
        target_type: TargetType,
        name: &str,
    ) -> Result<Vec<Vec<Uuid>>, OperationError> {
        let mut chain = Vec::with_capacity(2);

        if target_type.is_domained() {
            if let Some(domain) = domain_of_address(name) {
                match self.prov.get_domain_by_name(domain)? {
                    Some(domain) => chain.push(vec![domain.get_uuid()]),
                    None => return Err(OperationError::NoSuchDomain(domain.to_string())),
                }
            }
        }

        chain.push(vec![self.prov.get_global_grant()?.get_uuid()]);
        Ok(chain)
    }

    fn decide_preset(
        &self,
        principal: &Principal,
        chain: &[Vec<Uuid>],
        right: &AdminRight,
    ) -> Option<bool> {
        let inner = self.inner.read();

        for level in chain {
            let grants: Vec<&Grant> = level
                .iter()
                .filter_map(|u| inner.grants.get(u))
                .flatten()
                .collect();

            for pass in PASSES {
                for deny in [true, false] {
                    if let Some(grant) = grants.iter().find(|g| {
                        g.deny == deny
                            && principal.matches(&g.grantee, pass)
                            && g.right.covers(right.name())
                    }) {
                        security_debug!(%grant, "grant decided {}", right);
                        return Some(!deny);
                    }
                }
            }
        }
        None
    }

    fn collect_attrs(
        &self,
        principal: &Principal,
        chain: &[Vec<Uuid>],
        target_type: TargetType,
        access: Access,
    ) -> AllowedAttrs {
        let inner = self.inner.read();
        let mut collector = AttrCollector::default();

        'walk: for (level_idx, level) in chain.iter().enumerate() {
            let grants: Vec<&Grant> = level
                .iter()
                .filter_map(|u| inner.grants.get(u))
                .flatten()
                .collect();

            for (pass_idx, pass) in PASSES.iter().enumerate() {
                let distance = level_idx * PASSES.len() + pass_idx;
                for deny in [true, false] {
                    grants
                        .iter()
                        .filter(|g| g.deny == deny && principal.matches(&g.grantee, *pass))
                        .flat_map(|g| g.right.leaves())
                        .filter(|leaf| leaf.applies_to(target_type))
                        .filter(|leaf| match (access, leaf.right_type()) {
                            // Being able to set an attribute implies being able to read it.
                            (_, RightType::SetAttrs) => true,
                            (Access::Get, RightType::GetAttrs) => true,
                            _ => false,
                        })
                        .for_each(|leaf| collector.add(deny, distance, leaf.attrs()));
                }
                if collector.is_complete() {
                    break 'walk;
                }
            }
        }

        collector.finish()
    }

    fn allowed_for(
        &self,
        ident: &Identity,
        target: &Entry,
        access: Access,
    ) -> Result<AllowedAttrs, OperationError> {
        if let Some(decision) = self.hard_rules(ident, None) {
            return Ok(if decision {
                AllowedAttrs::AllowAll
            } else {
                AllowedAttrs::DenyAll
            });
        }
        if target.get_class() == EntryClass::Alias {
            trace!(target = %target, "aliases carry no grants");
            return Ok(AllowedAttrs::DenyAll);
        }
        let target_type = TargetType::try_from(target)?;
        let principal = self.principal(ident)?;
        let chain = self.target_chain(target, target_type)?;
        Ok(self.collect_attrs(&principal, &chain, target_type, access))
    }

    fn check_attrs(
        &self,
        ident: &Identity,
        target: &Entry,
        attrs: Option<&BTreeSet<Attribute>>,
        access: Access,
    ) -> Result<bool, OperationError> {
        let allowed = self.allowed_for(ident, target, access)?;
        let ok = match attrs {
            Some(attrs) => {
                let attrs: BTreeSet<Attribute> = attrs.iter().map(strip_modifier).collect();
                allowed.allows_all(&attrs)
            }
            None => match allowed {
                AllowedAttrs::AllowAll => true,
                AllowedAttrs::DenyAll => false,
                _ => allowed.allows_all(&self.prov.schema().valid_attrs_for(target.get_class())),
            },
        };
        if !ok {
            security_access!(%ident, target = %target, ?access, "denied ❌ - attribute right not granted");
        }
        Ok(ok)
    }

    /// Find the constraint on `attr` that applies to a target, checking the COS
    /// first, then the domain, then the global configuration.
    fn constraint_for(
        &self,
        cos: Option<Uuid>,
        domain: Option<Uuid>,
        attr: &Attribute,
    ) -> Result<Option<AttributeConstraint>, OperationError> {
        let config = self.prov.get_config()?.get_uuid();
        let inner = self.inner.read();
        Ok([cos, domain, Some(config)]
            .into_iter()
            .flatten()
            .filter_map(|u| inner.constraints.get(&u))
            .flat_map(|cs| cs.iter().find(|c| c.attr == *attr))
            .next()
            .cloned())
    }

    fn check_constraints(
        &self,
        ident: &Identity,
        cos: Option<Uuid>,
        domain: Option<Uuid>,
        attrs: &BTreeMap<Attribute, Vec<String>>,
    ) -> Result<bool, OperationError> {
        for (attr, values) in attrs {
            let attr = strip_modifier(attr);
            let Some(constraint) = self.constraint_for(cos, domain, &attr)? else {
                continue;
            };
            if let Some(bad) = values.iter().find(|v| !constraint.allows(v)) {
                security_access!(%ident, %attr, value = %bad, "denied ❌ - value violates attribute constraint");
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl AccessManager for AclAccessManager {
    #[instrument(level = "trace", skip_all)]
    fn can_do(
        &self,
        ident: &Identity,
        target: &Entry,
        right: &AdminRight,
    ) -> Result<bool, OperationError> {
        if let Some(decision) = self.hard_rules(ident, Some(right)) {
            return Ok(decision);
        }
        if !right.is_preset() {
            admin_error!(%right, "can_do requires a preset right");
            return Err(OperationError::AC0003PresetRightRequired);
        }
        if target.get_class() == EntryClass::Alias {
            trace!(target = %target, "aliases carry no grants");
            return Ok(false);
        }

        let target_type = TargetType::try_from(target)?;
        if !right.applies_to(target_type) {
            security_info!(%right, %target_type, "right is not applicable to the target type");
            return Ok(false);
        }

        let principal = self.principal(ident)?;
        let chain = self.target_chain(target, target_type)?;
        let decision = self.decide_preset(&principal, &chain, right).unwrap_or(false);
        if !decision {
            security_access!(%ident, target = %target, %right, "denied ❌ - no grant allows right");
        }
        Ok(decision)
    }

    fn can_get_attrs(
        &self,
        ident: &Identity,
        target: &Entry,
        attrs: Option<&BTreeSet<Attribute>>,
    ) -> Result<bool, OperationError> {
        self.check_attrs(ident, target, attrs, Access::Get)
    }

    fn can_set_attr_names(
        &self,
        ident: &Identity,
        target: &Entry,
        attrs: Option<&BTreeSet<Attribute>>,
    ) -> Result<bool, OperationError> {
        self.check_attrs(ident, target, attrs, Access::Set)
    }

    fn can_set_attrs(
        &self,
        ident: &Identity,
        target: &Entry,
        attrs: &BTreeMap<Attribute, Vec<String>>,
    ) -> Result<bool, OperationError> {
        let names = set_attr_names(attrs);
        if !self.check_attrs(ident, target, Some(&names), Access::Set)? {
            return Ok(false);
        }
        if ident.is_global_admin() {
            return Ok(true);
        }

        let cos = target.get_ava_single_uuid(&Attribute::CosId);
        let domain = self.prov.get_domain_of(target)?.map(|d| d.get_uuid());
        self.check_constraints(ident, cos, domain, attrs)
    }

    fn can_set_attrs_on_create(
        &self,
        ident: &Identity,
        target_type: TargetType,
        name: &str,
        attrs: &BTreeMap<Attribute, Vec<String>>,
    ) -> Result<bool, OperationError> {
        if let Some(decision) = self.hard_rules(ident, None) {
            return Ok(decision);
        }

        let principal = self.principal(ident)?;
        let chain = self.create_chain(target_type, name)?;
        let allowed = self.collect_attrs(&principal, &chain, target_type, Access::Set);
        if !allowed.allows_all(&set_attr_names(attrs)) {
            security_access!(%ident, %name, %target_type, "denied ❌ - attribute right not granted at creation");
            return Ok(false);
        }

        // The cos the new entry will be given, if the request names one.
        let cos = attrs
            .get(&Attribute::CosId)
            .and_then(|v| v.first())
            .and_then(|v| Uuid::parse_str(v).ok());
        let domain = match domain_of_address(name) {
            Some(d) if target_type.is_domained() => {
                self.prov.get_domain_by_name(d)?.map(|d| d.get_uuid())
            }
            _ => None,
        };
        self.check_constraints(ident, cos, domain, attrs)
    }

    fn allowed_attrs(
        &self,
        ident: &Identity,
        target: &Entry,
    ) -> Result<AllowedAttrs, OperationError> {
        self.allowed_for(ident, target, Access::Get)
    }
}
