use std::{collections::BTreeMap, num::NonZeroU32, sync::LazyLock};

/// Calories a single duplicant eats per day.
pub const DAILY_CALORIES: NonZeroU32 = nonzero(1200);

// (key, name, calories per unit, unit, description)
const FOODS: &[(&str, &str, NonZeroU32, &str, &str)] = &[
    ("mushroom", "Mushroom", nonzero(120), "kg", "Raw food"),
    (
        "grilled_mushroom",
        "Grilled Mushroom",
        nonzero(400),
        "plate",
        "Cooked meal",
    ),
    ("basic_meal", "Basic Meal", nonzero(1200), "plate", "Full meal"),
];

// (key, name, material cost per building)
const BUILDINGS: &[(&str, &str, &[(&str, u32)])] = &[
    ("simple_bed", "Simple Cot", &[("iron_ore", 20)]),
    (
        "oxygen_generator",
        "O2 Generator",
        &[("iron_ore", 50), ("algae", 10)],
    ),
    ("water_pump", "Water Pump", &[("iron_ore", 40)]),
];

// (key, name, unit, description)
const RESOURCES: &[(&str, &str, &str, &str)] = &[
    ("water", "Water", "kg", "Liquid water"),
    ("oxygen", "Oxygen", "kg", "Breathable O2"),
    ("algae", "Algae", "kg", "Algae for oxygen production"),
    ("coal", "Coal", "kg", "Fuel for generators"),
    ("iron_ore", "Iron Ore", "kg", "Basic building material"),
];

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| {
    let mut catalog = Catalog::new(DAILY_CALORIES);

    for &(key, name, calories, unit, description) in FOODS {
        catalog = catalog.with_food(key, FoodItem::new(name, calories, unit, description));
    }

    for &(key, name, cost) in BUILDINGS {
        let building = cost
            .iter()
            .fold(BuildingType::new(name), |building, &(material, quantity)| {
                building.with_cost(material, quantity)
            });
        catalog = catalog.with_building(key, building);
    }

    for &(key, name, unit, description) in RESOURCES {
        catalog = catalog.with_resource(key, Resource::new(name, unit, description));
    }

    catalog
});

pub(crate) const fn nonzero(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(n) => n,
        None => panic!("catalog values must be non-zero"),
    }
}

/// A food item duplicants can eat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodItem {
    name: String,
    calories: NonZeroU32,
    unit: String,
    description: String,
}

impl FoodItem {
    /// Creates a food item providing `calories` per `unit` produced.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        calories: NonZeroU32,
        unit: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            calories,
            unit: unit.into(),
            description: description.into(),
        }
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calories provided by one unit of this food.
    #[must_use]
    pub const fn calories(&self) -> NonZeroU32 {
        self.calories
    }

    /// The unit food is counted in (e.g. `kg` or `plate`).
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// A short description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A building type and the materials needed to construct one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingType {
    name: String,
    cost: BTreeMap<String, u32>,
}

impl BuildingType {
    /// Creates a building type with no material cost.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cost: BTreeMap::new(),
        }
    }

    /// Adds `quantity` of `material` to the cost of one building.
    #[must_use]
    pub fn with_cost(mut self, material: impl Into<String>, quantity: u32) -> Self {
        *self.cost.entry(material.into()).or_default() += quantity;
        self
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Material cost per building, keyed by resource.
    #[must_use]
    pub const fn cost(&self) -> &BTreeMap<String, u32> {
        &self.cost
    }
}

/// A raw resource that buildings are made from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    name: String,
    unit: String,
    description: String,
}

impl Resource {
    /// Creates a resource measured in `unit`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            description: description.into(),
        }
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unit the resource is measured in.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// A short description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// The set of known food items, building types and resources.
///
/// Everything is keyed by a short identifier such as `basic_meal` or
/// `iron_ore`. Projects refer to food and buildings by these keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    daily_need: NonZeroU32,
    foods: BTreeMap<String, FoodItem>,
    buildings: BTreeMap<String, BuildingType>,
    resources: BTreeMap<String, Resource>,
}

impl Catalog {
    /// Creates an empty catalog where each duplicant needs `daily_need`
    /// calories per day.
    #[must_use]
    pub const fn new(daily_need: NonZeroU32) -> Self {
        Self {
            daily_need,
            foods: BTreeMap::new(),
            buildings: BTreeMap::new(),
            resources: BTreeMap::new(),
        }
    }

    /// The built-in catalog.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Adds (or replaces) a food item.
    #[must_use]
    pub fn with_food(mut self, key: impl Into<String>, food: FoodItem) -> Self {
        self.foods.insert(key.into(), food);
        self
    }

    /// Adds (or replaces) a building type.
    #[must_use]
    pub fn with_building(mut self, key: impl Into<String>, building: BuildingType) -> Self {
        self.buildings.insert(key.into(), building);
        self
    }

    /// Adds (or replaces) a resource.
    #[must_use]
    pub fn with_resource(mut self, key: impl Into<String>, resource: Resource) -> Self {
        self.resources.insert(key.into(), resource);
        self
    }

    /// Replaces the per-duplicant daily calorie need.
    #[must_use]
    pub fn with_daily_need(mut self, daily_need: NonZeroU32) -> Self {
        self.daily_need = daily_need;
        self
    }

    /// Calories a single duplicant eats per day.
    #[must_use]
    pub const fn daily_need(&self) -> NonZeroU32 {
        self.daily_need
    }

    /// Looks up a food item by key.
    #[must_use]
    pub fn food(&self, key: &str) -> Option<&FoodItem> {
        self.foods.get(key)
    }

    /// Looks up a building type by key.
    #[must_use]
    pub fn building(&self, key: &str) -> Option<&BuildingType> {
        self.buildings.get(key)
    }

    /// Looks up a resource by key.
    #[must_use]
    pub fn resource(&self, key: &str) -> Option<&Resource> {
        self.resources.get(key)
    }

    /// All food items, in key order.
    pub fn foods(&self) -> impl Iterator<Item = (&str, &FoodItem)> {
        self.foods.iter().map(|(key, food)| (key.as_str(), food))
    }

    /// All building types, in key order.
    pub fn buildings(&self) -> impl Iterator<Item = (&str, &BuildingType)> {
        self.buildings
            .iter()
            .map(|(key, building)| (key.as_str(), building))
    }

    /// All resources, in key order.
    pub fn resources(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.resources
            .iter()
            .map(|(key, resource)| (key.as_str(), resource))
    }
}
