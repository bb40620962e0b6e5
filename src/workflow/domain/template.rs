//! Workflow seeded into every new project.

use super::{NewProjectStatus, SortOrder, StatusName};
use crate::project::domain::ProjectId;

/// One status in a workflow template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateStatus {
    name: StatusName,
    is_default: bool,
}

impl TemplateStatus {
    /// Returns the status name.
    #[must_use]
    pub const fn name(&self) -> &StatusName {
        &self.name
    }

    /// Returns whether new tickets land in this status.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.is_default
    }
}

/// Ordered list of statuses a project starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowTemplate {
    statuses: Vec<TemplateStatus>,
}

impl WorkflowTemplate {
    /// The four-stage workflow every project is created with.
    #[must_use]
    pub fn standard() -> Self {
        let stage = |name, is_default| TemplateStatus {
            name: StatusName::from_static(name),
            is_default,
        };
        Self {
            statuses: vec![
                stage("To Do", true),
                stage("In Progress", false),
                stage("In Review", false),
                stage("Done", false),
            ],
        }
    }

    /// A template with no statuses.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            statuses: Vec::new(),
        }
    }

    /// Returns the template statuses in workflow order.
    #[must_use]
    pub fn statuses(&self) -> &[TemplateStatus] {
        &self.statuses
    }

    /// Expands the template into insertable statuses numbered from zero.
    #[must_use]
    pub fn to_new_statuses(&self, project_id: ProjectId) -> Vec<NewProjectStatus> {
        (0_u32..)
            .zip(&self.statuses)
            .map(|(order, stage)| {
                NewProjectStatus::new(
                    project_id,
                    stage.name.clone(),
                    SortOrder::new(order),
                    stage.is_default,
                )
            })
            .collect()
    }
}

impl Default for WorkflowTemplate {
    fn default() -> Self {
        Self::standard()
    }
}
