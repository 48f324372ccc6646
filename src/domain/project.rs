use std::{collections::BTreeMap, num::NonZeroU32};

use crate::domain::{catalog::nonzero, Catalog, InvalidInput, RequirementsResult};

const DEMO_DUPLICANTS: NonZeroU32 = nonzero(3);
const DEMO_DAYS: NonZeroU32 = nonzero(7);

/// A planned colony: how many duplicants, for how long, what they eat and
/// what gets built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// The number of duplicants to feed.
    pub duplicants: NonZeroU32,
    /// The number of days to plan for.
    pub days: NonZeroU32,
    /// Catalog key of the food the colony eats.
    pub food_choice: String,
    /// Number of each building type to construct, keyed by catalog key.
    pub buildings: BTreeMap<String, u32>,
}

impl Project {
    /// Creates a project with no buildings.
    #[must_use]
    pub fn new(duplicants: NonZeroU32, days: NonZeroU32, food_choice: impl Into<String>) -> Self {
        Self {
            duplicants,
            days,
            food_choice: food_choice.into(),
            buildings: BTreeMap::new(),
        }
    }

    /// Sets the number of buildings of the given type.
    #[must_use]
    pub fn with_building(mut self, key: impl Into<String>, count: u32) -> Self {
        self.buildings.insert(key.into(), count);
        self
    }

    /// A small sample colony.
    #[must_use]
    pub fn demo() -> Self {
        Self::new(DEMO_DUPLICANTS, DEMO_DAYS, "basic_meal")
            .with_building("simple_bed", 3)
            .with_building("oxygen_generator", 1)
    }

    /// Computes what this project needs.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput`] if the project refers to a food item or
    /// building that is not in `catalog`.
    pub fn requirements(&self, catalog: &Catalog) -> Result<RequirementsResult, InvalidInput> {
        catalog.compute_requirements(self.duplicants, self.days, &self.food_choice, &self.buildings)
    }
}
