//! Domain model for projects and project membership.
//!
//! Projects carry a globally unique, upper-case key that prefixes every ticket
//! key. Caller identity is modelled explicitly so that services never consult
//! an ambient "current user".

mod caller;
mod error;
mod ids;
mod key;
mod project;

pub use caller::CallerIdentity;
pub use error::ProjectDomainError;
pub use ids::{ProjectId, UserId};
pub use key::ProjectKey;
pub use project::{NewProject, PersistedProjectData, Project, ProjectName};
