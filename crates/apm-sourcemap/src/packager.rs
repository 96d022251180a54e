//! Multipart payload construction
//!
//! An [`UploadForm`] is a plain, replayable description of the multipart
//! body. Transports render it into a fresh `reqwest` form on every attempt,
//! since a rendered form is a single-use stream.

use reqwest::multipart::{Form, Part};

use crate::config::Config;
use crate::error::UploadError;
use crate::host::Compilation;
use crate::pairer::Pair;

/// Multipart field carrying the source map bytes
pub const SOURCEMAP_FIELD: &str = "sourcemap";
pub const SERVICE_VERSION_FIELD: &str = "service_version";
pub const BUNDLE_FILEPATH_FIELD: &str = "bundle_filepath";
pub const SERVICE_NAME_FIELD: &str = "service_name";

/// Content type of the `sourcemap` part
pub const SOURCEMAP_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: String,
        content_type: &'static str,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: &'static str,
    pub value: FormValue,
}

/// Ordered multipart body description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    parts: Vec<FormPart>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name,
            value: FormValue::Text(value.into()),
        });
        self
    }

    pub fn file(
        mut self,
        name: &'static str,
        file_name: impl Into<String>,
        content_type: &'static str,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        self.parts.push(FormPart {
            name,
            value: FormValue::File {
                file_name: file_name.into(),
                content_type,
                bytes: bytes.into(),
            },
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn field(&self, name: &str) -> Option<&FormValue> {
        self.parts
            .iter()
            .find(|part| part.name == name)
            .map(|part| &part.value)
    }

    pub fn text_field(&self, name: &str) -> Option<&str> {
        match self.field(name)? {
            FormValue::Text(value) => Some(value),
            FormValue::File { .. } => None,
        }
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.parts.iter().map(|part| part.name).collect()
    }

    /// Render a new `reqwest` multipart form, preserving part order
    pub fn to_multipart(&self) -> Result<Form, reqwest::Error> {
        let mut form = Form::new();
        for part in &self.parts {
            form = match &part.value {
                FormValue::Text(value) => form.text(part.name, value.clone()),
                FormValue::File {
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let file = Part::bytes(bytes.clone())
                        .file_name(file_name.clone())
                        .mime_str(content_type)?;
                    form.part(part.name, file)
                }
            };
        }
        Ok(form)
    }
}

/// A source map ready to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    pub source_file: String,
    pub source_map: String,
    pub form: UploadForm,
}

/// What the packager decided for one pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packaged {
    /// The chunk produced no uploadable map
    Skip,
    Upload(UploadJob),
}

/// Public path the APM server joins stack frames on
///
/// Literal concatenation; no normalization of slashes.
pub fn bundle_filepath(public_path: &str, source_file: &str) -> String {
    format!("{}/{}", public_path, source_file)
}

/// Build the upload for one pair.
///
/// # Errors
///
/// Returns [`UploadError::MissingAsset`] when the host has no asset under the
/// paired source map name.
pub fn package(
    pair: &Pair,
    compilation: &dyn Compilation,
    config: &Config,
) -> Result<Packaged, UploadError> {
    let Some((source_file, source_map)) = pair.complete() else {
        return Ok(Packaged::Skip);
    };

    let bytes = compilation
        .asset(source_map)
        .ok_or_else(|| UploadError::missing_asset(source_map))?;

    let form = UploadForm::new()
        .file(SOURCEMAP_FIELD, source_map, SOURCEMAP_CONTENT_TYPE, bytes)
        .text(SERVICE_VERSION_FIELD, config.service_version.as_str())
        .text(
            BUNDLE_FILEPATH_FIELD,
            bundle_filepath(&config.public_path, source_file),
        )
        .text(SERVICE_NAME_FIELD, config.service_name.as_str());

    Ok(Packaged::Upload(UploadJob {
        source_file: source_file.to_string(),
        source_map: source_map.to_string(),
        form,
    }))
}
