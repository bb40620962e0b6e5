//! Membership-based access gate.

use crate::project::{
    domain::{CallerIdentity, ProjectId},
    ports::{AccessGate, AccessGateError, ProjectRepository},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Grants access to administrators and to project members.
#[derive(Clone)]
pub struct MembershipAccessGate<R>
where
    R: ProjectRepository,
{
    repository: Arc<R>,
}

impl<R> MembershipAccessGate<R>
where
    R: ProjectRepository,
{
    /// Creates a gate that consults `repository` for membership.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> AccessGate for MembershipAccessGate<R>
where
    R: ProjectRepository,
{
    async fn has_project_access(
        &self,
        project_id: ProjectId,
        caller: &CallerIdentity,
    ) -> Result<bool, AccessGateError> {
        if caller.is_admin() {
            return Ok(true);
        }
        let allowed = self
            .repository
            .is_member(project_id, caller.user_id())
            .await
            .map_err(AccessGateError::new)?;
        debug!(%project_id, user_id = %caller.user_id(), allowed, "evaluated project access");
        Ok(allowed)
    }
}
