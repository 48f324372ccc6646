use std::{collections::BTreeMap, num::NonZeroU32};

use tracing::instrument;

use crate::domain::{BuildingType, Catalog};

/// Food and material totals needed to sustain and build a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementsResult {
    /// The number of duplicants fed.
    pub duplicants: NonZeroU32,
    /// The number of days planned for.
    pub days: NonZeroU32,
    /// The food that must be produced.
    pub food: FoodRequirement,
    /// Total quantity of each material, keyed by resource.
    ///
    /// Only materials used by at least one requested building appear here.
    pub materials: BTreeMap<String, u64>,
}

/// The amount of one food item that must be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodRequirement {
    /// The catalog key of the food item.
    pub key: String,
    /// Whole units required, rounded up.
    pub units: u64,
    /// The unit food is counted in.
    pub unit: String,
}

/// A project refers to something the catalog does not know, or its totals
/// cannot be represented.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidInput {
    /// The chosen food item is not in the catalog.
    #[error("Unknown food: {0}")]
    UnknownFood(String),

    /// A requested building type is not in the catalog.
    #[error("Unknown building: {0}")]
    UnknownBuilding(String),

    /// A total is too large to count.
    #[error("Requirements are too large to calculate")]
    Overflow,
}

impl Catalog {
    /// Computes the food and building materials needed by `duplicants`
    /// duplicants over `days` days.
    ///
    /// Food is rounded up to whole units; partial units cannot be produced.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput`] if `food_choice` or any key in `buildings` is
    /// not in the catalog. Every key is checked before anything is added up.
    #[instrument(level = "debug", skip(self, buildings))]
    pub fn compute_requirements(
        &self,
        duplicants: NonZeroU32,
        days: NonZeroU32,
        food_choice: &str,
        buildings: &BTreeMap<String, u32>,
    ) -> Result<RequirementsResult, InvalidInput> {
        let food = self
            .food(food_choice)
            .ok_or_else(|| InvalidInput::UnknownFood(food_choice.to_string()))?;

        let requested = buildings
            .iter()
            .map(|(key, &count)| {
                self.building(key)
                    .map(|building| (building, count))
                    .ok_or_else(|| InvalidInput::UnknownBuilding(key.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let calories = u64::from(duplicants.get())
            .checked_mul(u64::from(days.get()))
            .and_then(|n| n.checked_mul(u64::from(self.daily_need().get())))
            .ok_or(InvalidInput::Overflow)?;
        let units = calories.div_ceil(u64::from(food.calories().get()));

        let materials = material_totals(&requested)?;

        tracing::debug!(calories, units, materials = materials.len(), "computed requirements");

        Ok(RequirementsResult {
            duplicants,
            days,
            food: FoodRequirement {
                key: food_choice.to_string(),
                units,
                unit: food.unit().to_string(),
            },
            materials,
        })
    }
}

fn material_totals(
    requested: &[(&BuildingType, u32)],
) -> Result<BTreeMap<String, u64>, InvalidInput> {
    let mut totals = BTreeMap::new();

    for &(building, count) in requested {
        if count == 0 {
            continue;
        }
        for (material, &quantity) in building.cost() {
            let total: &mut u64 = totals.entry(material.clone()).or_default();
            *total = total
                .checked_add(u64::from(quantity) * u64::from(count))
                .ok_or(InvalidInput::Overflow)?;
        }
    }

    Ok(totals)
}

/// Computes requirements against the built-in catalog.
///
/// See [`Catalog::compute_requirements`].
///
/// # Errors
///
/// Returns [`InvalidInput`] if a food or building key is unknown.
pub fn compute_requirements(
    duplicants: NonZeroU32,
    days: NonZeroU32,
    food_choice: &str,
    buildings: &BTreeMap<String, u32>,
) -> Result<RequirementsResult, InvalidInput> {
    Catalog::builtin().compute_requirements(duplicants, days, food_choice, buildings)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::FoodItem;

    fn nz(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn bunk_catalog() -> Catalog {
        Catalog::new(nz(1))
            .with_food("ration", FoodItem::new("Ration", nz(2), "bar", ""))
            .with_building("hab_bunk", BuildingType::new("Hab Bunk").with_cost("iron_ore", 5))
            .with_building(
                "generator",
                BuildingType::new("Generator")
                    .with_cost("iron_ore", 7)
                    .with_cost("copper", 3),
            )
    }

    fn counts(entries: &[(&str, u32)]) -> BTreeMap<String, u32> {
        entries
            .iter()
            .map(|&(key, count)| (key.to_string(), count))
            .collect()
    }

    #[test]
    fn food_rounds_up_example() {
        let result = bunk_catalog()
            .compute_requirements(nz(4), nz(3), "ration", &BTreeMap::new())
            .unwrap();

        assert_eq!(result.food.units, 6);
        assert_eq!(result.food.key, "ration");
        assert_eq!(result.food.unit, "bar");
        assert!(result.materials.is_empty());
    }

    #[test_case(1, 1, 120, 10; "mushroom single day")]
    #[test_case(1, 1, 400, 3; "grilled mushroom rounds up")]
    #[test_case(1, 1, 1200, 1; "basic meal exact")]
    #[test_case(3, 7, 1200, 21; "demo colony")]
    #[test_case(5, 3, 400, 45; "grilled mushroom exact")]
    #[test_case(7, 2, 120, 140; "mushroom exact")]
    #[test_case(1, 2, 1300, 2; "large yield rounds up")]
    fn food_is_ceiling_of_calories_over_yield(duplicants: u32, days: u32, yield_: u32, expected: u64) {
        let catalog = Catalog::builtin()
            .clone()
            .with_food("test", FoodItem::new("Test", nz(yield_), "unit", ""));

        let result = catalog
            .compute_requirements(nz(duplicants), nz(days), "test", &BTreeMap::new())
            .unwrap();

        let calories = u64::from(duplicants) * u64::from(days) * 1200;
        assert_eq!(result.food.units, calories.div_ceil(u64::from(yield_)));
        assert_eq!(result.food.units, expected);
    }

    #[test]
    fn material_totals_example() {
        let result = bunk_catalog()
            .compute_requirements(nz(1), nz(1), "ration", &counts(&[("hab_bunk", 2)]))
            .unwrap();

        assert_eq!(result.materials, BTreeMap::from([("iron_ore".to_string(), 10)]));
    }

    #[test]
    fn materials_accumulate_across_buildings() {
        let result = bunk_catalog()
            .compute_requirements(
                nz(1),
                nz(1),
                "ration",
                &counts(&[("hab_bunk", 2), ("generator", 3)]),
            )
            .unwrap();

        assert_eq!(result.materials.get("iron_ore"), Some(&31));
        assert_eq!(result.materials.get("copper"), Some(&9));
    }

    #[test]
    fn doubling_a_count_doubles_its_materials() {
        let catalog = bunk_catalog();
        let single = catalog
            .compute_requirements(nz(2), nz(2), "ration", &counts(&[("generator", 4)]))
            .unwrap();
        let double = catalog
            .compute_requirements(nz(2), nz(2), "ration", &counts(&[("generator", 8)]))
            .unwrap();

        for (material, quantity) in &single.materials {
            assert_eq!(double.materials[material], quantity * 2);
        }
        assert_eq!(single.materials.len(), double.materials.len());
    }

    #[test]
    fn zero_count_adds_no_materials() {
        let result = bunk_catalog()
            .compute_requirements(nz(1), nz(1), "ration", &counts(&[("generator", 0)]))
            .unwrap();

        assert!(result.materials.is_empty());
    }

    #[test]
    fn unknown_food_is_rejected() {
        let error = bunk_catalog()
            .compute_requirements(nz(1), nz(1), "gristle_berry", &counts(&[("hab_bunk", 1)]))
            .unwrap_err();

        assert_eq!(error, InvalidInput::UnknownFood("gristle_berry".to_string()));
        assert_eq!(error.to_string(), "Unknown food: gristle_berry");
    }

    #[test]
    fn unknown_building_is_rejected_before_accumulating() {
        let error = bunk_catalog()
            .compute_requirements(
                nz(1),
                nz(1),
                "ration",
                &counts(&[("hab_bunk", 1), ("rocket", 1)]),
            )
            .unwrap_err();

        assert_eq!(error, InvalidInput::UnknownBuilding("rocket".to_string()));
    }

    #[test]
    fn builtin_demo_colony() {
        let result = compute_requirements(
            nz(3),
            nz(7),
            "basic_meal",
            &counts(&[("simple_bed", 3), ("oxygen_generator", 1)]),
        )
        .unwrap();

        assert_eq!(result.food.units, 21);
        assert_eq!(result.food.unit, "plate");
        assert_eq!(result.materials.get("iron_ore"), Some(&110));
        assert_eq!(result.materials.get("algae"), Some(&10));
        assert_eq!(result.materials.len(), 2);
    }

    #[test]
    fn huge_totals_overflow_instead_of_wrapping() {
        let catalog = Catalog::new(NonZeroU32::MAX)
            .with_food("crumb", FoodItem::new("Crumb", nz(1), "g", ""));

        let error = catalog
            .compute_requirements(NonZeroU32::MAX, NonZeroU32::MAX, "crumb", &BTreeMap::new())
            .unwrap_err();

        assert_eq!(error, InvalidInput::Overflow);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let buildings = counts(&[("water_pump", 2)]);
        let first = compute_requirements(nz(2), nz(10), "mushroom", &buildings).unwrap();
        let second = compute_requirements(nz(2), nz(10), "mushroom", &buildings).unwrap();

        assert_eq!(first, second);
    }
}
