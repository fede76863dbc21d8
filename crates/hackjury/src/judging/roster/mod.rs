//! Team roster import from spreadsheet exports saved as CSV.

mod parser;

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::Team;
use parser::{parse_sheet, RosterSheet};

const PREVIEW_ROWS: usize = 10;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(String),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster file: {err}"),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {err}"),
            RosterImportError::MissingColumn(column) => {
                write!(f, "roster has no column named '{column}'")
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::MissingColumn(_) => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// First rows of a sheet, shown to the organizer before mapping columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

/// Which sheet columns feed which team fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ColumnMapping {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            email: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedTeam {
    pub name: String,
    pub description: Option<String>,
    pub email: Option<String>,
}

impl ImportedTeam {
    /// Roster entry with a positional id; pitch slots are assigned later.
    pub fn into_team(self, position: usize) -> Team {
        let mut team = Team::new(format!("team-{}", position + 1), self.name);
        team.description = self.description;
        team.email = self.email;
        team
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn preview_path<P: AsRef<Path>>(path: P) -> Result<RosterPreview, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::preview(file)
    }

    pub fn preview<R: Read>(reader: R) -> Result<RosterPreview, RosterImportError> {
        let sheet = parse_sheet(reader)?;
        let total_rows = sheet.rows.len();
        Ok(RosterPreview {
            rows: sheet.rows.into_iter().take(PREVIEW_ROWS).collect(),
            headers: sheet.headers,
            total_rows,
        })
    }

    pub fn extract_teams_from_path<P: AsRef<Path>>(
        path: P,
        mapping: &ColumnMapping,
    ) -> Result<Vec<ImportedTeam>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::extract_teams(file, mapping)
    }

    /// Rows with a blank name are skipped; blank optional cells become `None`.
    pub fn extract_teams<R: Read>(
        reader: R,
        mapping: &ColumnMapping,
    ) -> Result<Vec<ImportedTeam>, RosterImportError> {
        let sheet = parse_sheet(reader)?;
        let name_column = require_column(&sheet, &mapping.name)?;
        let description_column = optional_column(&sheet, mapping.description.as_deref())?;
        let email_column = optional_column(&sheet, mapping.email.as_deref())?;

        let teams = sheet
            .rows
            .iter()
            .filter_map(|row| {
                let name = cell(row, Some(name_column))?;
                Some(ImportedTeam {
                    name,
                    description: cell(row, description_column),
                    email: cell(row, email_column),
                })
            })
            .collect();

        Ok(teams)
    }
}

fn require_column(sheet: &RosterSheet, header: &str) -> Result<usize, RosterImportError> {
    sheet
        .column(header)
        .ok_or_else(|| RosterImportError::MissingColumn(header.to_string()))
}

fn optional_column(
    sheet: &RosterSheet,
    header: Option<&str>,
) -> Result<Option<usize>, RosterImportError> {
    header.map(|header| require_column(sheet, header)).transpose()
}

fn cell(row: &[String], column: Option<usize>) -> Option<String> {
    row.get(column?)
        .filter(|value| !value.is_empty())
        .cloned()
}
