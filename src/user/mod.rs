//! User directory for Taskflow.
//!
//! Users are the people that projects list as members, tickets name as
//! reporter or assignee, and column preferences belong to. The directory
//! stores their profile and administrator flag; authentication happens
//! elsewhere and hands services a resolved
//! [`CallerIdentity`](crate::project::domain::CallerIdentity).

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
