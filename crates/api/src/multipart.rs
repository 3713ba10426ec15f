//! Buffered multipart form reading.
//!
//! Handlers read the whole form up front so every check can run before any
//! upload starts.

use std::collections::HashMap;

use axum::extract::Multipart;
use serde::de::DeserializeOwned;

use crate::engine::UploadedFile;
use crate::error::{AppError, AppResult};

/// A fully read multipart form.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    /// `(field name, file)` in arrival order.
    files: Vec<(String, UploadedFile)>,
}

impl MultipartForm {
    /// Read every part. A part carrying a filename is treated as a file.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.files.push((
                        name,
                        UploadedFile {
                            filename,
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    ));
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// A text field, with blank values treated as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn require_text(&self, name: &str) -> AppResult<String> {
        self.text(name)
            .ok_or_else(|| AppError::BadRequest(format!("Missing required '{name}' field")))
    }

    /// Parse a required JSON-valued text field.
    pub fn json<T: DeserializeOwned>(&self, name: &str) -> AppResult<T> {
        let raw = self.require_text(name)?;
        serde_json::from_str(&raw)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON in '{name}': {e}")))
    }

    /// Remove and return the first file sent under `name`.
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        let index = self.files.iter().position(|(field, _)| field == name)?;
        Some(self.files.remove(index).1)
    }

    /// Remove and return every file sent under `name`, in arrival order.
    pub fn take_files(&mut self, name: &str) -> Vec<UploadedFile> {
        let (matching, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.files)
                .into_iter()
                .partition(|(field, _)| field == name);
        self.files = rest;
        matching.into_iter().map(|(_, file)| file).collect()
    }
}
