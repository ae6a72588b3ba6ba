// src/interviews/validators.rs

use super::models::*;
use crate::common::{ValidationResult, Validator};

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 5000;
const MAX_STATUS_LEN: usize = 32;

pub struct InterviewValidator;

impl Validator<CreateInterviewRequest> for InterviewValidator {
    fn validate(&self, data: &CreateInterviewRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.title.trim().is_empty() {
            result.add_error("title", "Title is required");
        } else if data.title.len() > MAX_TITLE_LEN {
            result.add_error("title", "Title must be less than 200 characters");
        }

        if let Some(description) = &data.description {
            if description.len() > MAX_DESCRIPTION_LEN {
                result.add_error(
                    "description",
                    "Description must be less than 5000 characters",
                );
            }
        }

        if data.start_time <= 0 {
            result.add_error("startTime", "Start time must be a positive epoch timestamp");
        }

        validate_status(&data.status, &mut result);

        if data.stream_call_id.trim().is_empty() {
            result.add_error("streamCallId", "Call ID is required");
        }

        if data.candidate_id.trim().is_empty() {
            result.add_error("candidateId", "Candidate ID is required");
        }

        if data.interviewer_ids.iter().any(|id| id.trim().is_empty()) {
            result.add_error("interviewerIds", "Interviewer IDs must not be blank");
        }

        result
    }
}

impl Validator<UpdateInterviewStatusRequest> for InterviewValidator {
    fn validate(&self, data: &UpdateInterviewStatusRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        validate_status(&data.status, &mut result);
        result
    }
}

/// Status is an open vocabulary; only its shape is checked
fn validate_status(status: &str, result: &mut ValidationResult) {
    if status.trim().is_empty() {
        result.add_error("status", "Status is required");
    } else if status.len() > MAX_STATUS_LEN
        || !status
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '_' || c == '-')
    {
        result.add_error("status", "Status must be a short lowercase word");
    }
}
