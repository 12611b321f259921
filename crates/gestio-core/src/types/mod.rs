//! Core type definitions used across the Gestio workspace.

pub mod plan_policy;
pub mod response;

pub use plan_policy::PlanPolicy;
pub use response::ServiceResponse;
