//! Test fixtures. `TestDirectory` populates an in-memory directory with a few
//! domains in different states, admins of each kind, and entries of every kind
//! the engine distinguishes.

use std::sync::Arc;

use crate::acl::AclAccessManager;
use crate::be::MemoryBackend;
use crate::prelude::*;
use crate::server::access::AccessControls;

pub struct TestDirectory {
    pub be: Arc<MemoryBackend>,
    pub acl: Arc<AclAccessManager>,

    pub global: Uuid,
    pub config: Uuid,

    /// example.com, default cos is `cos_default`.
    pub domain_a: Uuid,
    /// other.org, `cos_premium` is accessible.
    pub domain_b: Uuid,
    /// shut.net, status shutdown.
    pub domain_shut: Uuid,
    /// susp.net, status suspended.
    pub domain_susp: Uuid,

    pub cos_default: Uuid,
    pub cos_premium: Uuid,
    pub server1: Uuid,

    pub admin: Uuid,
    pub domadmin: Uuid,
    /// Delegated admin, member of `admin_group`.
    pub deleg: Uuid,
    pub admin_group: Uuid,

    /// alice@example.com, member of `staff_dl`, on `cos_default`.
    pub user1: Uuid,
    pub user2: Uuid,
    pub user_b: Uuid,
    pub user_b2: Uuid,
    pub user_shut: Uuid,
    pub user_susp: Uuid,

    pub cr1: Uuid,
    pub cr_b: Uuid,

    pub staff_dl: Uuid,
    pub dl_b: Uuid,
    pub dyngroup: Uuid,

    /// Points at `staff_dl`.
    pub alias_dl: Uuid,
    pub alias_dangling: Uuid,
}

impl TestDirectory {
    pub fn new() -> Self {
        let be = Arc::new(MemoryBackend::default());
        let global = be.get_global_grant().expect("no global grant").get_uuid();
        let config = be.get_config().expect("no config").get_uuid();

        let mut wr = be.write();
        let mut create = |e: Entry| wr.create(e).expect("failed to create entry").get_uuid();

        let cos_default = create(Entry::new(EntryClass::Cos, "default"));
        let cos_premium = create(Entry::new(EntryClass::Cos, "premium"));
        let server1 = create(
            Entry::new(EntryClass::Server, "mx1.example.com")
                .with_ava(Attribute::ServiceHostname, "mx1.example.com"),
        );

        let domain_a = create(
            Entry::new(EntryClass::Domain, "example.com")
                .with_ava(Attribute::DomainStatus, "active")
                .with_ava(Attribute::DomainDefaultCosId, &cos_default.to_string()),
        );
        let domain_b = create(
            Entry::new(EntryClass::Domain, "other.org")
                .with_ava(Attribute::DomainAccessibleCos, &cos_premium.to_string()),
        );
        let domain_shut = create(
            Entry::new(EntryClass::Domain, "shut.net").with_ava(Attribute::DomainStatus, "shutdown"),
        );
        let domain_susp = create(
            Entry::new(EntryClass::Domain, "susp.net")
                .with_ava(Attribute::DomainStatus, "suspended"),
        );

        let admin_group = create(Entry::new(EntryClass::DistributionList, "admins@example.com"));
        let staff_dl = create(
            Entry::new(EntryClass::DistributionList, "staff@example.com")
                .with_ava(Attribute::Mail, "staff@example.com"),
        );
        let dl_b = create(Entry::new(EntryClass::DistributionList, "list@other.org"));
        let dyngroup = create(Entry::new(EntryClass::DynamicGroup, "dyn@example.com"));

        let admin = create(
            Entry::new(EntryClass::Account, "admin@example.com")
                .with_ava(Attribute::IsAdminAccount, "TRUE"),
        );
        let domadmin = create(
            Entry::new(EntryClass::Account, "da@example.com")
                .with_ava(Attribute::IsDomainAdminAccount, "TRUE"),
        );
        let deleg = create(
            Entry::new(EntryClass::Account, "deleg@example.com")
                .with_ava(Attribute::IsDelegatedAdminAccount, "TRUE")
                .with_ava(Attribute::MemberOf, &admin_group.to_string()),
        );

        let user1 = create(
            Entry::new(EntryClass::Account, "alice@example.com")
                .with_ava(Attribute::Mail, "alice@example.com")
                .with_ava(Attribute::DisplayName, "Alice")
                .with_ava(Attribute::UserPassword, "{SSHA}c2VjcmV0")
                .with_ava(Attribute::CosId, &cos_default.to_string())
                .with_ava(Attribute::MemberOf, &staff_dl.to_string()),
        );
        let user2 = create(
            Entry::new(EntryClass::Account, "bob@example.com")
                .with_ava(Attribute::Mail, "bob@example.com"),
        );
        let user_b = create(Entry::new(EntryClass::Account, "carol@other.org"));
        let user_b2 = create(Entry::new(EntryClass::Account, "frank@other.org"));
        let user_shut = create(Entry::new(EntryClass::Account, "dave@shut.net"));
        let user_susp = create(Entry::new(EntryClass::Account, "erin@susp.net"));

        let cr1 = create(
            Entry::new(EntryClass::CalResource, "room1@example.com")
                .with_ava(Attribute::ResourceCapacity, "12"),
        );
        let cr_b = create(Entry::new(EntryClass::CalResource, "room2@other.org"));

        let alias_dl = create(
            Entry::new(EntryClass::Alias, "staffalias@example.com")
                .with_ava(Attribute::AliasTargetId, &staff_dl.to_string()),
        );
        let alias_dangling = create(
            Entry::new(EntryClass::Alias, "gone@example.com")
                .with_ava(Attribute::AliasTargetId, &Uuid::new_v4().to_string()),
        );
        wr.commit();

        let acl = Arc::new(AclAccessManager::new(be.clone()));

        TestDirectory {
            be,
            acl,
            global,
            config,
            domain_a,
            domain_b,
            domain_shut,
            domain_susp,
            cos_default,
            cos_premium,
            server1,
            admin,
            domadmin,
            deleg,
            admin_group,
            user1,
            user2,
            user_b,
            user_b2,
            user_shut,
            user_susp,
            cr1,
            cr_b,
            staff_dl,
            dl_b,
            dyngroup,
            alias_dl,
            alias_dangling,
        }
    }

    pub fn entry(&self, uuid: Uuid) -> Arc<Entry> {
        self.be
            .get_by_uuid(uuid)
            .expect("lookup failed")
            .expect("no such fixture")
    }

    pub fn token(&self, uuid: Uuid) -> AuthToken {
        AuthToken::from_account(&self.entry(uuid))
    }

    pub fn ident(&self, uuid: Uuid) -> Identity {
        Identity::from_token(&self.token(uuid), self.be.as_ref()).expect("failed to resolve")
    }

    pub fn controls(&self, access_manager: AccessManagerType) -> AccessControls {
        AccessControls::new(
            Configuration::new().with_access_manager(access_manager),
            self.be.clone(),
            self.acl.clone(),
        )
    }
}
