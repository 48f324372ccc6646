//! Domain models for colony planning.
//!
//! This module contains the static resource catalog, the project a user
//! plans, the requirements calculator and the planner configuration.

/// Food items, building types and raw resources.
pub mod catalog;
pub use catalog::{BuildingType, Catalog, FoodItem, Resource};

mod config;
pub use config::{Config, ConfigError};

mod project;
pub use project::Project;

/// Food and material totals for a project.
pub mod requirements;
pub use requirements::{compute_requirements, FoodRequirement, InvalidInput, RequirementsResult};
