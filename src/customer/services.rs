use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;

/// Failure talking to a backend consulted by an asynchronous customer check.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("membership directory unavailable: {0}")]
    DirectoryUnavailable(String),
    #[error("two-factor gateway unavailable: {0}")]
    GatewayUnavailable(String),
}

/// Backend answering whether a customer holds an active membership.
#[async_trait]
pub trait MembershipDirectory: Send + Sync + 'static {
    async fn has_active_membership(&self, customer_id: &str) -> Result<bool, ServiceError>;
}

/// Backend answering whether a customer completed two-factor verification.
#[async_trait]
pub trait TwoFactorGateway: Send + Sync + 'static {
    async fn is_verified(&self, customer_id: &str) -> Result<bool, ServiceError>;
}

/// Membership directory kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryMembershipDirectory {
    active: RwLock<HashSet<String>>,
}

impl InMemoryMembershipDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            active: RwLock::new(members.into_iter().map(Into::into).collect()),
        }
    }

    pub fn activate(&self, customer_id: impl Into<String>) {
        self.active.write().insert(customer_id.into());
    }

    pub fn deactivate(&self, customer_id: &str) -> bool {
        self.active.write().remove(customer_id)
    }
}

#[async_trait]
impl MembershipDirectory for InMemoryMembershipDirectory {
    async fn has_active_membership(&self, customer_id: &str) -> Result<bool, ServiceError> {
        Ok(self.active.read().contains(customer_id))
    }
}

/// Two-factor gateway kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryTwoFactorGateway {
    verified: RwLock<HashSet<String>>,
}

impl InMemoryTwoFactorGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verify(&self, customer_id: impl Into<String>) {
        self.verified.write().insert(customer_id.into());
    }
}

#[async_trait]
impl TwoFactorGateway for InMemoryTwoFactorGateway {
    async fn is_verified(&self, customer_id: &str) -> Result<bool, ServiceError> {
        Ok(self.verified.read().contains(customer_id))
    }
}
