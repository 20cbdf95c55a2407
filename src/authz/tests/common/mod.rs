//! Shared test fixtures

use async_trait::async_trait;
use privileges_authz::{InMemoryStorage, PrivilegeEngine};
use privileges_core::error::Result;
use privileges_core::traits::{PrivilegeStore, RoleStore};
use privileges_core::types::{
    AssignmentId, GrantedPrivilege, Privilege, PrivilegeId, RoleAssignment, RoleId, Selector,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory store that counts grant-set reads
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryStorage,
    reads: AtomicUsize,
}

impl CountingStore {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.reads.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl PrivilegeStore for CountingStore {
    async fn register(&self, privilege: Privilege) -> Result<PrivilegeId> {
        self.inner.register(privilege).await
    }

    async fn exists(&self, selector: &Selector) -> Result<bool> {
        self.inner.exists(selector).await
    }

    async fn filter(&self, selector: &Selector) -> Result<Vec<Privilege>> {
        self.inner.filter(selector).await
    }

    async fn get_all_user_privileges(&self, user_id: &str) -> Result<Vec<GrantedPrivilege>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_all_user_privileges(user_id).await
    }

    async fn set_user_privilege(&self, user_id: &str, privilege: Privilege) -> Result<PrivilegeId> {
        self.inner.set_user_privilege(user_id, privilege).await
    }

    async fn remove_user_privilege(&self, user_id: &str, privilege_id: &str) -> Result<()> {
        self.inner.remove_user_privilege(user_id, privilege_id).await
    }
}

#[async_trait]
impl RoleStore for CountingStore {
    async fn register_role(
        &self,
        name: &str,
        group: Option<&str>,
        privilege: Option<Privilege>,
    ) -> Result<RoleId> {
        self.inner.register_role(name, group, privilege).await
    }

    async fn assign_role(&self, user_id: &str, role: &str, group: Option<&str>) -> Result<AssignmentId> {
        self.inner.assign_role(user_id, role, group).await
    }

    async fn get_role(
        &self,
        user_id: &str,
        role: &str,
        group: Option<&str>,
    ) -> Result<Option<RoleAssignment>> {
        self.inner.get_role(user_id, role, group).await
    }
}

/// Engine over a counting store, plus a handle on the store
pub fn counting_engine() -> (PrivilegeEngine, Arc<CountingStore>) {
    let store = Arc::new(CountingStore::default());
    (PrivilegeEngine::new(store.clone()), store)
}
