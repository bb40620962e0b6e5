//! Application services for the project registry and access gate.

mod access;
mod registry;

pub use access::MembershipAccessGate;
pub use registry::{
    CreateProjectRequest, ProjectService, ProjectServiceError, ProjectServiceResult,
    UpdateProjectRequest,
};
