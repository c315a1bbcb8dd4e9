//! Multipart form reading and file storage shared by upload handlers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use axum::body::Bytes;
use axum::extract::Multipart;
use bimfm_core::types::Timestamp;
use bimfm_core::uploads::sanitize_file_name;
use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::error::{AppError, AppResult};

/// A file part of a multipart request.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// A fully buffered multipart form.
///
/// Field names ending in `[]` are stored without the suffix, so `images`
/// and `images[]` are the same field.
#[derive(Debug, Default)]
pub struct FormData {
    text: HashMap<String, String>,
    files: HashMap<String, Vec<UploadedFile>>,
}

impl FormData {
    pub async fn read(multipart: &mut Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field
                .name()
                .unwrap_or_default()
                .trim_end_matches("[]")
                .to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.files.entry(name).or_default().push(UploadedFile {
                        file_name,
                        content_type,
                        data,
                    });
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.text.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    /// Non-blank text value of `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn require(&self, name: &str) -> AppResult<&str> {
        self.text(name)
            .ok_or_else(|| AppError::BadRequest(format!("Missing required field: {name}")))
    }

    /// Parse an optional text value; blank counts as absent.
    pub fn parse<T>(&self, name: &str) -> AppResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.text(name)
            .map(|v| {
                v.parse()
                    .map_err(|e| AppError::BadRequest(format!("Invalid value for {name}: {e}")))
            })
            .transpose()
    }

    pub fn parse_bool(&self, name: &str) -> AppResult<Option<bool>> {
        self.text(name)
            .map(|v| {
                parse_bool(v)
                    .ok_or_else(|| AppError::BadRequest(format!("Invalid value for {name}: {v}")))
            })
            .transpose()
    }

    /// Take all files sent under `name`, in request order.
    pub fn take_files(&mut self, name: &str) -> Vec<UploadedFile> {
        self.files.remove(name).unwrap_or_default()
    }
}

/// Form-style booleans: `true/false`, `1/0`, `yes/no`, `on/off`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse an ISO 8601 date or datetime. Naive values are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let value = value.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Stored name for an upload: a fresh UUID prefix plus the sanitized name.
pub fn unique_file_name(original: &str, fallback: &str) -> String {
    format!(
        "{}_{}",
        uuid::Uuid::new_v4().simple(),
        sanitize_file_name(original, fallback)
    )
}

/// Write `data` to `dir/name`, creating `dir` if needed.
pub async fn store_file(dir: &Path, name: &str, data: &[u8]) -> AppResult<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create {}: {e}", dir.display())))?;
    let path = dir.join(name);
    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to write {}: {e}", path.display())))?;
    Ok(path)
}
