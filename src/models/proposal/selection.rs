// src/models/proposal/selection.rs
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::filter::ProposalFilter;
use crate::errors::{AppError, AppResult};
use crate::models::semester::{
    current_semester, next_semester_of, parse_semester, parse_semester_range,
    DEFAULT_END_SEMESTER, DEFAULT_START_SEMESTER,
};

/// Semester radio buttons of the proposal list. Exactly one is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemesterFilter {
    /// Nothing chosen: show every semester.
    #[default]
    #[serde(rename = "")]
    All,
    CurrentSemester,
    CurrentAndNextSemester,
    SemesterRange,
    SingleSemester,
}

/// Saved state of the proposal list filter form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub selected_semester: String,
    pub start_semester: String,
    pub end_semester: String,
    pub semester_filter: SemesterFilter,
    pub other_filter_by_properties: BTreeMap<String, bool>,
}

impl FilterSelection {
    /// The inclusive `[start, end]` semester range for the selected mode.
    pub fn resolve_semesters(&self, today: NaiveDate) -> AppResult<(String, String)> {
        let current = current_semester(today);
        match self.semester_filter {
            SemesterFilter::All => {
                Ok((DEFAULT_START_SEMESTER.to_string(), DEFAULT_END_SEMESTER.to_string()))
            }
            SemesterFilter::CurrentSemester => Ok((current.clone(), current)),
            SemesterFilter::CurrentAndNextSemester => {
                let next = next_semester_of(&current)?;
                Ok((current, next))
            }
            SemesterFilter::SemesterRange => {
                parse_semester_range(self.start_semester.trim(), self.end_semester.trim())
            }
            SemesterFilter::SingleSemester => {
                let selected = parse_semester(self.selected_semester.trim(), &current)?;
                Ok((selected.clone(), selected))
            }
        }
    }

    /// Enabled checkbox filters. Names that are no longer known are skipped.
    pub fn enabled_filters(&self) -> Vec<ProposalFilter> {
        self.other_filter_by_properties
            .iter()
            .filter(|(_, enabled)| **enabled)
            .filter_map(|(name, _)| match name.parse::<ProposalFilter>() {
                Ok(f) => Some(f),
                Err(_) => {
                    log::warn!("Ignoring unknown saved proposal filter {name}");
                    None
                }
            })
            .collect()
    }

    pub fn is_enabled(&self, filter: ProposalFilter) -> bool {
        self.other_filter_by_properties
            .get(filter.name())
            .copied()
            .unwrap_or(false)
    }

    pub fn set_semester_filter(&mut self, mode: SemesterFilter) {
        self.semester_filter = mode;
    }

    /// Raw range inputs are stored as typed; validation happens on resolve.
    pub fn set_range_inputs(&mut self, start: &str, end: &str) {
        self.start_semester = start.to_string();
        self.end_semester = end.to_string();
    }

    pub fn select_semester(&mut self, semester: &str) {
        self.selected_semester = semester.to_string();
    }

    pub fn set_filter(&mut self, name: &str, enabled: bool) -> AppResult<ProposalFilter> {
        let filter = name.parse::<ProposalFilter>()?;
        self.other_filter_by_properties
            .insert(filter.name().to_string(), enabled);
        Ok(filter)
    }
}

impl TryFrom<&str> for SemesterFilter {
    type Error = AppError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "" => Ok(SemesterFilter::All),
            "current_semester" => Ok(SemesterFilter::CurrentSemester),
            "current_and_next_semester" => Ok(SemesterFilter::CurrentAndNextSemester),
            "semester_range" => Ok(SemesterFilter::SemesterRange),
            "single_semester" => Ok(SemesterFilter::SingleSemester),
            other => Err(AppError::InvalidArgument(format!(
                "unknown semester filter \"{other}\""
            ))),
        }
    }
}
