//! Colony resource planning for Oxygen Not Included.
//!
//! A project describes a colony (duplicants, days, a food choice and the
//! buildings to construct). The catalog turns a project into the food units and
//! building materials it needs.

pub mod domain;
pub use domain::{
    compute_requirements, Catalog, Config, FoodRequirement, InvalidInput, Project,
    RequirementsResult,
};

/// Project files and summary export.
pub mod storage;
pub use storage::{
    export_summary, load, save, Format, LoadError, ParseError, SaveError, ValidationError,
};
