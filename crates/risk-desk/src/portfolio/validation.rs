use std::fmt;

use serde::Serialize;

use super::domain::{ProjectDraft, ProjectUpdate, RiskDraft};

const MIN_NAME_LEN: usize = 3;
const MIN_DESCRIPTION_LEN: usize = 10;

/// Field-level problem surfaced next to the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every violation found on a submitted form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|error| error.field.as_str())
    }

    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn validate_draft(draft: &ProjectDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if draft.name.trim().chars().count() < MIN_NAME_LEN {
        errors.push("name", "Project name must be at least 3 characters");
    }
    if draft.description.trim().chars().count() < MIN_DESCRIPTION_LEN {
        errors.push("description", "Description must be at least 10 characters");
    }
    check_progress(&mut errors, draft.progress);
    check_budget(&mut errors, draft.budget);
    check_spent(&mut errors, draft.spent);

    for (index, risk) in draft.risks.iter().enumerate() {
        check_risk(&mut errors, &format!("risks[{index}]"), risk);
    }

    errors.into_result()
}

pub fn validate_update(update: &ProjectUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if matches!(&update.name, Some(name) if name.trim().is_empty()) {
        errors.push("name", "Project name is required");
    }
    if matches!(&update.description, Some(description) if description.trim().is_empty()) {
        errors.push("description", "Description is required");
    }
    if let Some(progress) = update.progress {
        check_progress(&mut errors, progress);
    }
    if let Some(budget) = update.budget {
        check_budget(&mut errors, budget);
    }
    if let Some(spent) = update.spent {
        check_spent(&mut errors, spent);
    }

    errors.into_result()
}

pub fn validate_risk(risk: &RiskDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_risk(&mut errors, "risk", risk);
    errors.into_result()
}

fn in_percent_range(value: i64) -> bool {
    (0..=100).contains(&value)
}

fn check_progress(errors: &mut ValidationErrors, progress: i64) {
    if !in_percent_range(progress) {
        errors.push("progress", "Progress must be between 0 and 100");
    }
}

fn check_budget(errors: &mut ValidationErrors, budget: f64) {
    if !budget.is_finite() || budget <= 0.0 {
        errors.push("budget", "Budget must be a positive number");
    }
}

fn check_spent(errors: &mut ValidationErrors, spent: f64) {
    if !spent.is_finite() || spent < 0.0 {
        errors.push("spent", "Spent amount cannot be negative");
    }
}

fn check_risk(errors: &mut ValidationErrors, prefix: &str, risk: &RiskDraft) {
    if risk.name.trim().is_empty() {
        errors.push(format!("{prefix}.name"), "Risk name is required");
    }
    if risk.description.trim().is_empty() {
        errors.push(format!("{prefix}.description"), "Risk description is required");
    }
    if risk.category.trim().is_empty() {
        errors.push(format!("{prefix}.category"), "Risk category is required");
    }
    if !in_percent_range(risk.probability) {
        errors.push(
            format!("{prefix}.probability"),
            "Probability must be between 0 and 100",
        );
    }
    if !in_percent_range(risk.impact) {
        errors.push(format!("{prefix}.impact"), "Impact must be between 0 and 100");
    }
}
