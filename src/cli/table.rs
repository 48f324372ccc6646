use oni_planner::{domain::FoodItem, Catalog, RequirementsResult};

/// Builds the two-column summary shown after a project is computed.
///
/// Materials are labelled with their catalog name and unit where known, and
/// with their key otherwise.
#[must_use]
pub fn summary_rows(result: &RequirementsResult, catalog: &Catalog) -> Vec<[String; 2]> {
    let food_name = catalog
        .food(&result.food.key)
        .map_or(result.food.key.as_str(), FoodItem::name);

    let mut rows = vec![
        ["Duplicants".to_string(), result.duplicants.to_string()],
        ["Days".to_string(), result.days.to_string()],
        ["Food item".to_string(), food_name.to_string()],
        [
            "Food units needed".to_string(),
            format!("{} {}", result.food.units, result.food.unit),
        ],
    ];

    if !result.materials.is_empty() {
        rows.push([String::new(), String::new()]);
        rows.push(["Material".to_string(), "Total".to_string()]);
        for (material, quantity) in &result.materials {
            let (name, unit) = catalog
                .resource(material)
                .map_or((material.as_str(), "units"), |resource| {
                    (resource.name(), resource.unit())
                });
            rows.push([name.to_string(), format!("{quantity} {unit}")]);
        }
    }

    rows
}

/// Renders rows as left-aligned columns separated by two spaces.
#[must_use]
pub fn render_table(rows: &[[String; 2]]) -> String {
    if rows.is_empty() {
        return "(no rows)\n".to_string();
    }

    let width = rows.iter().map(|[label, _]| label.len()).max().unwrap_or(0);

    let mut out = String::new();
    for [label, value] in rows {
        let line = format!("{label:<width$}  {value}");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
