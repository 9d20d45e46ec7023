use crate::error::ClientError;
use crate::http_client::HttpClient;
use crate::models::UploadResponse;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::try_join_all;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use std::path::Path;

pub const DEFAULT_MAX_FILES: usize = 5;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Count and size limits checked before anything is uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_files: usize,
    pub max_file_size: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadContext {
    ProfilePicture,
    PostImages,
}

impl UploadContext {
    fn path(&self) -> &'static str {
        match self {
            UploadContext::ProfilePicture => "/upload/profile-picture",
            UploadContext::PostImages => "/upload/post-images",
        }
    }

    fn field(&self) -> &'static str {
        match self {
            UploadContext::ProfilePicture => "image",
            UploadContext::PostImages => "images",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        Self {
            mime_type: guess_mime(&file_name).to_string(),
            file_name,
            bytes,
        }
    }

    pub async fn read(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Local preview shown before submitting, as a `data:` URL.
    pub fn preview(&self) -> ImagePreview {
        ImagePreview {
            file_name: self.file_name.clone(),
            data_url: format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePreview {
    pub file_name: String,
    pub data_url: String,
}

/// Reads all selected files concurrently.
pub async fn read_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<SelectedFile>, ClientError> {
    try_join_all(paths.iter().map(SelectedFile::read)).await
}

fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

impl UploadPolicy {
    pub fn validate(&self, context: UploadContext, files: &[SelectedFile]) -> Result<(), ClientError> {
        let max_files = match context {
            UploadContext::ProfilePicture => 1,
            UploadContext::PostImages => self.max_files,
        };

        if files.is_empty() {
            return Err(ClientError::Validation("No files selected".into()));
        }
        if files.len() > max_files {
            return Err(ClientError::Validation(format!(
                "You can upload at most {} file(s), got {}",
                max_files,
                files.len()
            )));
        }
        if let Some(file) = files.iter().find(|f| f.size() > self.max_file_size) {
            return Err(ClientError::Validation(format!(
                "{} is too large ({} bytes, limit {} bytes)",
                file.file_name,
                file.size(),
                self.max_file_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct UploadClient {
    http: HttpClient,
    policy: UploadPolicy,
}

impl UploadClient {
    pub fn new(http: HttpClient, policy: UploadPolicy) -> Self {
        Self { http, policy }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Validates, then sends every file in one multipart request. The batch
    /// succeeds or fails as a whole.
    pub async fn upload(
        &self,
        context: UploadContext,
        files: Vec<SelectedFile>,
    ) -> Result<UploadResponse, ClientError> {
        self.policy.validate(context, &files)?;

        let count = files.len();
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime_type)?;
            form = form.part(context.field(), part);
        }

        let request = self
            .http
            .request(Method::POST, context.path())
            .await
            .multipart(form);
        let response: UploadResponse = self.http.send(request).await?;
        tracing::info!("Uploaded {} file(s) to {}", count, context.path());
        Ok(response)
    }

    pub async fn upload_profile_picture(&self, file: SelectedFile) -> Result<String, ClientError> {
        let response = self.upload(UploadContext::ProfilePicture, vec![file]).await?;
        response
            .urls
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Validation("Upload returned no URL".into()))
    }

    pub async fn upload_post_images(
        &self,
        files: Vec<SelectedFile>,
    ) -> Result<Vec<String>, ClientError> {
        Ok(self.upload(UploadContext::PostImages, files).await?.urls)
    }
}
