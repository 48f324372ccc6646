//! The interactive menu.

use std::{
    collections::BTreeMap,
    io::{self, BufRead, Write},
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use oni_planner::{Catalog, Config, Project, RequirementsResult};
use tracing::instrument;

use crate::cli::{
    table::{render_table, summary_rows},
    terminal::Colorize,
};

/// Whether the menu loop should keep going.
enum Flow<T> {
    Continue(T),
    Exit,
}

/// A menu-driven session reading commands from `input` and writing to
/// `output`.
///
/// Every error from the library is reported and the menu shown again; only
/// an explicit quit or the end of the input ends the session.
pub struct Shell<'a, R, W> {
    input: R,
    output: W,
    catalog: &'a Catalog,
    config: &'a Config,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    #[must_use]
    pub const fn new(input: R, output: W, catalog: &'a Catalog, config: &'a Config) -> Self {
        Self {
            input,
            output,
            catalog,
            config,
        }
    }

    /// Runs the menu until the user quits or the input ends.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading the input or writing the output
    /// fails.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "{}", "ONI Resource Calculator".heading())?;
        writeln!(self.output, "Type the number for the action and press Enter.")?;

        loop {
            writeln!(self.output)?;
            writeln!(self.output, "Menu:")?;
            writeln!(self.output, "1) Create new project")?;
            writeln!(self.output, "2) Load project from file")?;
            writeln!(self.output, "3) Run demo project")?;
            writeln!(self.output, "4) Quit")?;

            let Some(choice) = self.prompt("> ")? else {
                break;
            };

            let project = match choice.as_str() {
                "1" => match self.create_project()? {
                    Flow::Continue(project) => project,
                    Flow::Exit => break,
                },
                "2" => match self.load_project()? {
                    Flow::Continue(Some(project)) => project,
                    Flow::Continue(None) => continue,
                    Flow::Exit => break,
                },
                "3" => {
                    writeln!(self.output, "Using the demo project.")?;
                    Project::demo()
                }
                "4" => {
                    writeln!(self.output, "Goodbye")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.output, "{}", "Unknown option".warning())?;
                    continue;
                }
            };

            if let Flow::Exit = self.report(&project)? {
                break;
            }
        }

        writeln!(self.output)?;
        Ok(())
    }

    fn create_project(&mut self) -> io::Result<Flow<Project>> {
        writeln!(self.output, "Create a small ONI resource project")?;

        let Some(duplicants) = self.prompt_positive("How many duplicants? ")? else {
            return Ok(Flow::Exit);
        };
        let Some(days) = self.prompt_positive("How many days to plan for? ")? else {
            return Ok(Flow::Exit);
        };

        writeln!(self.output, "Available food choices:")?;
        for (key, food) in self.catalog.foods() {
            writeln!(
                self.output,
                " - {key}: {} ({} cal per {})",
                food.name(),
                food.calories(),
                food.unit()
            )?;
        }

        let food_choice = loop {
            let Some(choice) = self.prompt("Choose food key from above (e.g. basic_meal): ")?
            else {
                return Ok(Flow::Exit);
            };
            if self.catalog.food(&choice).is_some() {
                break choice;
            }
            writeln!(
                self.output,
                "{}",
                format!("Unknown food choice '{choice}'. Try again.").warning()
            )?;
        };

        writeln!(self.output)?;
        writeln!(
            self.output,
            "Now enter building counts. Press Enter to keep zero."
        )?;

        let catalog = self.catalog;
        let mut buildings = BTreeMap::new();
        for (key, building) in catalog.buildings() {
            let Some(count) = self.prompt_count(&format!("How many {}? ", building.name()))? else {
                return Ok(Flow::Exit);
            };
            if count > 0 {
                buildings.insert(key.to_string(), count);
            }
        }

        Ok(Flow::Continue(Project {
            duplicants,
            days,
            food_choice,
            buildings,
        }))
    }

    fn load_project(&mut self) -> io::Result<Flow<Option<Project>>> {
        let Some(path) = self.prompt("Enter project filename to load: ")? else {
            return Ok(Flow::Exit);
        };

        match oni_planner::load(Path::new(&path), self.catalog) {
            Ok(project) => {
                writeln!(self.output, "Loaded project from {path}")?;
                Ok(Flow::Continue(Some(project)))
            }
            Err(e) => {
                tracing::debug!(error = ?e, "load failed");
                writeln!(
                    self.output,
                    "{}",
                    format!("Failed to load project: {e}").warning()
                )?;
                Ok(Flow::Continue(None))
            }
        }
    }

    /// Computes and prints the requirements for `project`, then offers to
    /// save it.
    fn report(&mut self, project: &Project) -> io::Result<Flow<()>> {
        let result = match project.requirements(self.catalog) {
            Ok(result) => result,
            Err(e) => {
                writeln!(self.output, "{}", format!("Invalid project: {e}").warning())?;
                return Ok(Flow::Continue(()));
            }
        };

        writeln!(self.output)?;
        writeln!(self.output, "{}", "--- Project Summary ---".heading())?;
        write!(
            self.output,
            "{}",
            render_table(&summary_rows(&result, self.catalog))
        )?;

        let Some(answer) = self.prompt("Save project and summary? (y/N): ")? else {
            return Ok(Flow::Exit);
        };
        if !answer.eq_ignore_ascii_case("y") {
            return Ok(Flow::Continue(()));
        }

        let Some(name) =
            self.prompt("Filename base (without extension), or press Enter for timestamp: ")?
        else {
            return Ok(Flow::Exit);
        };
        let name = if name.is_empty() { time_stamp() } else { name };

        match self.save(project, &result, &name) {
            Ok((project_path, summary_path)) => writeln!(
                self.output,
                "{}",
                format!(
                    "Saved {} and {}",
                    project_path.display(),
                    summary_path.display()
                )
                .success()
            )?,
            Err(e) => writeln!(self.output, "{}", format!("Error saving: {e}").warning())?,
        }

        Ok(Flow::Continue(()))
    }

    #[instrument(skip(self, project, result))]
    fn save(
        &self,
        project: &Project,
        result: &RequirementsResult,
        name: &str,
    ) -> anyhow::Result<(PathBuf, PathBuf)> {
        let dir = &self.config.output_dir;
        std::fs::create_dir_all(dir)?;

        let project_path = dir.join(format!("{name}.{}", self.config.format.extension()));
        let summary_path = dir.join(format!("{name}_summary.csv"));

        oni_planner::save(project, &project_path)?;
        oni_planner::export_summary(result, &summary_path)?;

        tracing::info!(
            project = %project_path.display(),
            summary = %summary_path.display(),
            "saved project and summary"
        );
        Ok((project_path, summary_path))
    }

    /// Prints `message` and reads one trimmed line, or `None` at end of
    /// input.
    ///
    /// Bytes that are not UTF-8 are replaced, not reported as an error.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
    }

    fn prompt_positive(&mut self, message: &str) -> io::Result<Option<NonZeroU32>> {
        loop {
            let Some(text) = self.prompt(message)? else {
                return Ok(None);
            };
            if let Ok(value) = text.parse() {
                return Ok(Some(value));
            }
            writeln!(
                self.output,
                "{}",
                "Please type a whole number greater than zero (e.g. 3). Try again.".dim()
            )?;
        }
    }

    /// Like [`Self::prompt_positive`], but an empty answer means zero.
    fn prompt_count(&mut self, message: &str) -> io::Result<Option<u32>> {
        loop {
            let Some(text) = self.prompt(message)? else {
                return Ok(None);
            };
            if text.is_empty() {
                return Ok(Some(0));
            }
            if let Ok(value) = text.parse() {
                return Ok(Some(value));
            }
            writeln!(
                self.output,
                "{}",
                "Please type a whole number (e.g. 3), or press Enter for zero.".dim()
            )?;
        }
    }
}

fn time_stamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}
