//! Risk register export.

pub mod router;

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::portfolio::{Project, RiskLevel};

pub use router::report_router;

#[derive(Debug)]
pub enum ReportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Io(err) => write!(f, "failed to write risk register: {}", err),
            ReportError::Csv(err) => write!(f, "failed to encode risk register: {}", err),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io(err) => Some(err),
            ReportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Serialize)]
struct RegisterRow<'a> {
    project_id: &'a str,
    project_name: &'a str,
    risk_id: &'a str,
    risk_name: &'a str,
    level: RiskLevel,
    probability: u8,
    impact: u8,
    category: &'a str,
    status: &'static str,
    date_identified: NaiveDate,
    mitigation: &'a str,
}

/// Write one CSV row per risk, in project then identification order.
///
/// Returns the number of rows written. Projects without risks contribute nothing.
pub fn write_risk_register<W: Write>(projects: &[Project], writer: W) -> Result<usize, ReportError> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
    let mut rows = 0;

    for project in projects {
        for risk in &project.risks {
            csv_writer.serialize(RegisterRow {
                project_id: &project.id.0,
                project_name: &project.name,
                risk_id: &risk.id.0,
                risk_name: &risk.name,
                level: risk.level,
                probability: risk.probability,
                impact: risk.impact,
                category: &risk.category,
                status: risk.status.label(),
                date_identified: risk.date_identified,
                mitigation: &risk.mitigation,
            })?;
            rows += 1;
        }
    }

    if rows == 0 {
        csv_writer.write_record(HEADERS)?;
    }

    csv_writer.flush()?;
    Ok(rows)
}

pub fn write_risk_register_to_path(
    projects: &[Project],
    path: impl AsRef<Path>,
) -> Result<usize, ReportError> {
    let file = File::create(path)?;
    write_risk_register(projects, file)
}

const HEADERS: [&str; 11] = [
    "project_id",
    "project_name",
    "risk_id",
    "risk_name",
    "level",
    "probability",
    "impact",
    "category",
    "status",
    "date_identified",
    "mitigation",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::seed::demo_projects;

    fn render(projects: &[Project]) -> String {
        let mut buffer = Vec::new();
        write_risk_register(projects, &mut buffer).expect("register writes");
        String::from_utf8(buffer).expect("utf8")
    }

    #[test]
    fn register_has_one_row_per_risk() {
        let output = render(&demo_projects());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], HEADERS.join(","));
        assert_eq!(
            lines[1],
            "p1,Cloud Migration,r1,Data Security Breach,High,40,90,Security,Open,2023-07-15,Implement advanced encryption and security protocols"
        );
        assert!(lines[5].starts_with("p3,E-Commerce Platform,r5,Performance Under Load,High"));
    }

    #[test]
    fn empty_portfolio_still_writes_headers() {
        let output = render(&[]);
        assert_eq!(output.trim_end(), HEADERS.join(","));
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let mut projects = demo_projects();
        projects[1].risks[0].mitigation = "Training, coaching".to_string();
        let output = render(&projects[1..2]);
        assert!(output.contains("\"Training, coaching\""));
    }
}
