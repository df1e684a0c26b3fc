use std::path::Path;

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};

pub const KML_MIME: &str = "application/vnd.google-earth.kml+xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub contents: Vec<u8>,
}

/// The search form: ordered text fields plus the uploaded area file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    fields: Vec<(String, String)>,
    file: Option<UploadFile>,
}

impl SearchForm {
    pub fn new() -> SearchForm {
        SearchForm::default()
    }

    pub async fn from_kml_file<P: AsRef<Path>>(field: &str, path: P) -> Result<SearchForm> {
        let path = path.as_ref();
        let contents = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("area.kml"));

        Ok(SearchForm::new().with_file(UploadFile {
            field: field.to_string(),
            file_name,
            mime: KML_MIME.to_string(),
            contents,
        }))
    }

    pub fn with_field(mut self, name: &str, value: &str) -> SearchForm {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_file(mut self, file: UploadFile) -> SearchForm {
        self.file = Some(file);
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    /// The file goes first: the search endpoint reads the area from the
    /// leading part.
    pub fn into_multipart(self) -> Result<Form> {
        let mut form = Form::new();

        if let Some(file) = self.file {
            let part = Part::bytes(file.contents)
                .file_name(file.file_name)
                .mime_str(&file.mime)
                .context("invalid upload mime type")?;
            form = form.part(file.field, part);
        }
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        Ok(form)
    }
}
