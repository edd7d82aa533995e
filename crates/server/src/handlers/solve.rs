//! # Form Submission Handler
//!
//! Reads the multipart form, and when both a CSV file and a question are present,
//! runs the load, schema and translation pipeline and renders the result.
//! An incomplete submission renders the form again and does nothing else.

use crate::{errors::AppError, page, state::AppState};
use axum::{extract::State, response::Html};
use axum_extra::extract::Multipart;
use tracing::{info, warn};

/// A file picked in the form's upload control.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// The fields of one form submission.
#[derive(Debug, Default)]
pub struct Submission {
    pub file: Option<UploadedFile>,
    pub question: String,
}

impl Submission {
    /// Collects the `file` and `question` parts of the form.
    ///
    /// A file part with neither a name nor content, which browsers send when no
    /// file was chosen, counts as no file.
    pub async fn from_multipart(multipart: &mut Multipart) -> Result<Self, AppError> {
        let mut submission = Submission::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "file" => {
                    let file_name = field.file_name().unwrap_or("").to_string();
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?
                        .to_vec();
                    if !file_name.is_empty() || !data.is_empty() {
                        submission.file = Some(UploadedFile { file_name, data });
                    }
                }
                "question" => {
                    submission.question = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Failed to read question: {e}")))?;
                }
                _ => warn!("Ignoring unknown multipart field: {}", name),
            }
        }

        Ok(submission)
    }
}

/// The handler for form submissions (`POST /`).
pub async fn solve_handler(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let submission = Submission::from_multipart(&mut multipart).await?;

    let file = match &submission.file {
        Some(file) if !submission.question.is_empty() => file,
        _ => {
            info!("Submission is missing a file or a question; nothing to do.");
            return Ok(Html(page::render_page(&submission.question, None)));
        }
    };

    info!(
        "Received '{}' ({} bytes) with question: {:?}",
        file.file_name,
        file.data.len(),
        submission.question
    );
    let answer = app_state
        .solver
        .solve(&file.data, &submission.question)
        .await?;

    Ok(Html(page::render_page(&submission.question, Some(&answer))))
}
