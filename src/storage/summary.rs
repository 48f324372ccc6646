use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use tracing::instrument;

use crate::RequirementsResult;

/// Writes a CSV summary of `result` to `path`, replacing any existing file.
///
/// See [`write_summary`] for the layout.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
#[instrument(skip(result), fields(path = %path.display()))]
pub fn export_summary(result: &RequirementsResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_summary(result, &mut writer)?;
    writer.flush()?;

    tracing::debug!(rows = result.materials.len() + 1, "exported summary");
    Ok(())
}

/// Writes a CSV summary of `result`.
///
/// The header is `item,quantity`, followed by a `food` row with the total
/// food units and then one row per material in key order.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_summary<W: Write>(result: &RequirementsResult, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "item,quantity")?;
    writeln!(writer, "food,{}", result.food.units)?;
    for (material, quantity) in &result.materials {
        writeln!(writer, "{},{quantity}", csv_escape(material))?;
    }
    Ok(())
}

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}
