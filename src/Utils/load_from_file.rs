use crate::Thermodynamics::gibbs_error::GibbsError;
use crate::Thermodynamics::melting_task::{MeltingTask, PhaseInput};
use log::{error, info, warn};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// headers that open the task section of a text file
const TASK_HEADERS: [&str; 2] = ["MELTING TASK", "PHASES"];

pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }
    pub fn load_melting_task(&self) -> Result<MeltingTask, GibbsError> {
        load_and_validate_melting_task(&self.file_name)
    }
}

/// Parses a melting task from a file.
/// The file is either plain JSON or a text document with the JSON placed under a
/// "MELTING TASK" or "PHASES" header, ending at the next all-caps header or end of file.
pub fn load_melting_task_from_file(file_name: &str) -> Result<MeltingTask, GibbsError> {
    let path = Path::new(file_name);
    if !path.exists() {
        error!("File '{}' does not exist", file_name);
        return Err(GibbsError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File '{}' does not exist", file_name),
        )));
    }
    let reader = BufReader::new(File::open(path)?);
    let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;

    let start_index = lines
        .iter()
        .position(|line| TASK_HEADERS.contains(&line.trim().to_uppercase().as_str()))
        .map(|i| i + 1)
        .unwrap_or(0);
    // next header or end of file
    let end_index = lines[start_index..]
        .iter()
        .position(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && trimmed.chars().all(|c| c.is_uppercase() || c == '_' || c == ' ')
        })
        .map(|i| i + start_index)
        .unwrap_or(lines.len());

    let task_section = lines[start_index..end_index].join("\n");
    match serde_json::from_str::<MeltingTask>(&task_section) {
        Ok(task) => {
            info!("Successfully parsed melting task from file '{}'", file_name);
            Ok(task)
        }
        Err(e) => {
            let actual_line = start_index + e.line();
            let error_msg = format!(
                "Error parsing melting task at line {}, column {} (line {} in file): {}",
                e.line(),
                e.column(),
                actual_line,
                e
            );
            error!("{}", error_msg);
            if actual_line >= 1 && actual_line <= lines.len() {
                let problem_line = &lines[actual_line - 1];
                error!("Problematic line: {}", problem_line);
                if e.column() >= 1 && e.column() <= problem_line.len() {
                    error!("{}", " ".repeat(e.column() - 1) + "^");
                }
            }
            Err(GibbsError::DeserializationError(error_msg))
        }
    }
}

fn validate_phase(phase: &PhaseInput) {
    if phase.segments.is_empty() {
        warn!("Phase '{}' contains no segments", phase.name);
    }
    for pair in phase.segments.windows(2) {
        if pair[0].T_end != pair[1].T_start {
            warn!(
                "Phase '{}': segment ending at {} K is followed by one starting at {} K",
                phase.name, pair[0].T_end, pair[1].T_start
            );
        }
    }
}

/// Loads a melting task and checks the segment layout of both phases.
/// Gaps or overlaps between segments are reported, not rejected.
pub fn load_and_validate_melting_task(file_name: &str) -> Result<MeltingTask, GibbsError> {
    let task = load_melting_task_from_file(file_name)?;
    validate_phase(&task.solid);
    validate_phase(&task.liquid);
    info!(
        "Loaded and validated melting task of '{}' from file '{}'",
        task.substance, file_name
    );
    Ok(task)
}

/// writes a task as pretty JSON
pub fn save_melting_task(task: &MeltingTask, file_name: &str) -> Result<(), GibbsError> {
    let json = serde_json::to_string_pretty(task)?;
    fs::write(file_name, json)?;
    info!("Melting task of '{}' saved to '{}'", task.substance, file_name);
    Ok(())
}
