//! Request assembly: path parameters, query string, explicit headers and body.
//!
//! Endpoints describe themselves by binding values into a `RequestParts`;
//! `resolve_url` then turns the operation's path template into an absolute
//! URL under the configured base.

use std::fmt::Display;

use serde::Serialize;
use url::Url;

use crate::error::ApiError;
use crate::operation::Operation;

/// Per-call values collected from an Options struct.
#[derive(Debug, Default)]
pub struct RequestParts {
    pub(crate) path_params: Vec<(&'static str, String)>,
    pub(crate) query: Vec<(&'static str, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<RequestBody>,
}

#[derive(Debug, Clone)]
pub(crate) enum RequestBody {
    Json(Vec<u8>),
    Multipart(MultipartForm),
}

impl RequestParts {
    pub fn path(&mut self, name: &'static str, value: &str) {
        self.path_params.push((name, value.to_string()));
    }

    pub fn query<T: Display>(&mut self, name: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.query.push((name, value.to_string()));
        }
    }

    /// Multi-valued parameters are sent once, joined with commas.
    pub fn query_list(&mut self, name: &'static str, values: &[String]) {
        if !values.is_empty() {
            self.query.push((name, values.join(",")));
        }
    }

    pub fn header(&mut self, name: &str, value: Option<&str>) {
        if let Some(value) = value {
            crate::http::set_header(&mut self.headers, name, value);
        }
    }

    pub fn json<T: Serialize + ?Sized>(&mut self, body: &T) -> Result<(), ApiError> {
        let bytes = serde_json::to_vec(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.body = Some(RequestBody::Json(bytes));
        Ok(())
    }

    pub fn multipart(&mut self, form: MultipartForm) {
        self.body = Some(RequestBody::Multipart(form));
    }
}

/// A file attached to a multipart request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl FilePart {
    pub fn new(file_name: &str, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: None,
            data,
        }
    }
}

#[derive(Debug, Clone)]
enum FormField {
    Text(String),
    File(FilePart),
}

/// `multipart/form-data` body builder.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    fields: Vec<(&'static str, FormField)>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: format!("lakehouse-{}", uuid::Uuid::new_v4().simple()),
            fields: Vec::new(),
        }
    }

    /// Unset optional fields are left out of the form.
    pub fn text<T: Display>(&mut self, name: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.fields.push((name, FormField::Text(value.to_string())));
        }
    }

    pub fn file(&mut self, name: &'static str, file: Option<&FilePart>) {
        if let Some(file) = file {
            self.fields.push((name, FormField::File(file.clone())));
        }
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (name, field) in &self.fields {
            out.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            match field {
                FormField::Text(value) => {
                    out.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                    );
                    out.extend_from_slice(value.as_bytes());
                }
                FormField::File(file) => {
                    let content_type = file
                        .content_type
                        .as_deref()
                        .unwrap_or("application/octet-stream");
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{}\"\r\nContent-Type: {content_type}\r\n\r\n",
                            escape_quotes(&file.file_name)
                        )
                        .as_bytes(),
                    );
                    out.extend_from_slice(&file.data);
                }
            }
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        out
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('"', "%22")
}

/// Resolve `operation.path` under `base`, substituting bound path
/// parameters (each encoded once, as a single segment) and appending the
/// query string. Dot segments are rejected: `%2E` is itself a dot segment
/// to URL parsers, so no encoding keeps them in the path.
pub(crate) fn resolve_url(
    base: &Url,
    operation: &Operation,
    parts: &RequestParts,
) -> Result<Url, ApiError> {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(base.to_string()))?;
        segments.pop_if_empty();
        for segment in operation.path.trim_start_matches('/').split('/') {
            match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => {
                    let value = parts
                        .path_params
                        .iter()
                        .find(|(key, _)| *key == name)
                        .map(|(_, value)| value.as_str())
                        .ok_or_else(|| ApiError::UnboundPathParameter {
                            operation: operation.id,
                            name: name.to_string(),
                        })?;
                    if value == "." || value == ".." {
                        return Err(ApiError::InvalidPathParameter {
                            operation: operation.id,
                            name: name.to_string(),
                            value: value.to_string(),
                        });
                    }
                    segments.push(value);
                }
                None => {
                    segments.push(segment);
                }
            }
        }
    }
    if !parts.query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(parts.query.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url)
}
