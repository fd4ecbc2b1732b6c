//! paylens-ocr: client for the external image-to-text extraction
//! service.
//!
//! Two-step protocol: upload the screenshot bytes as a media file, then
//! ask a vision model to read the transaction text off it. Transport,
//! auth and quota problems all surface as one error kind at this
//! boundary; the parser never sees them.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Instruction sent alongside the image when none is configured.
pub const DEFAULT_INSTRUCTION: &str = "\
Extract all transaction information from this image, including dates, any emojis, and failed status.
For each transaction line, identify:
1. The person/business name
2. The transaction date (e.g., \"1 April\", \"31 March\")
3. The transaction amount (with ₹ symbol)
4. Whether it's a credit (+) or debit
5. Any status indicators like \"Failed\"

IGNORE any entries that are just year+month headers (like \"2025 April\" or \"2025 March\").";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Extraction service client. Each call is independent; the client
/// holds no session state beyond its configuration.
#[derive(Debug, Clone)]
pub struct OcrClient {
    api_key: String,
    model: String,
    base_url: String,
}

impl OcrClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read the image and return the extracted text. Empty extraction
    /// output is a failure too: the parser is never run on nothing.
    pub async fn extract_text(&self, image: &Path, instruction: &str) -> Result<String> {
        let mime = image_mime(image)?;
        let bytes =
            std::fs::read(image).with_context(|| format!("read {}", image.display()))?;

        let file_uri = self.upload(bytes, mime).await?;
        let text = self.generate(&file_uri, mime, instruction).await?;

        if text.trim().is_empty() {
            bail!("extraction service returned no text for {}", image.display());
        }
        Ok(text.trim().to_string())
    }

    async fn upload(&self, bytes: Vec<u8>, mime: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct Resp {
            file: FileInfo,
        }

        #[derive(Deserialize)]
        struct FileInfo {
            uri: String,
        }

        let client = reqwest::Client::new();
        let resp = client
            .post(format!(
                "{}/upload/v1beta/files?key={}",
                self.base_url, self.api_key
            ))
            .header("X-Goog-Upload-Protocol", "raw")
            .header(reqwest::header::CONTENT_TYPE, mime)
            .body(bytes)
            .send()
            .await
            .context("image upload request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("image upload error: {status} {txt}");
        }

        let out: Resp = resp.json().await.context("parse upload response")?;
        Ok(out.file.uri)
    }

    async fn generate(&self, file_uri: &str, mime: &str, instruction: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Req {
            contents: Vec<Content>,
        }

        #[derive(Serialize)]
        struct Content {
            parts: Vec<Part>,
        }

        #[derive(Serialize)]
        struct Part {
            #[serde(skip_serializing_if = "Option::is_none")]
            text: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            file_data: Option<FileData>,
        }

        #[derive(Serialize)]
        struct FileData {
            mime_type: String,
            file_uri: String,
        }

        #[derive(Deserialize)]
        struct Resp {
            candidates: Vec<Candidate>,
        }

        #[derive(Deserialize)]
        struct Candidate {
            content: RespContent,
        }

        #[derive(Deserialize)]
        struct RespContent {
            parts: Vec<RespPart>,
        }

        #[derive(Deserialize)]
        struct RespPart {
            text: Option<String>,
        }

        let body = Req {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        file_data: Some(FileData {
                            mime_type: mime.to_string(),
                            file_uri: file_uri.to_string(),
                        }),
                    },
                    Part {
                        text: Some(instruction.to_string()),
                        file_data: None,
                    },
                ],
            }],
        };

        let client = reqwest::Client::new();
        let resp = client
            .post(format!(
                "{}/v1beta/models/{}:generateContent?key={}",
                self.base_url, self.model, self.api_key
            ))
            .json(&body)
            .send()
            .await
            .context("text extraction request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("text extraction error: {status} {txt}");
        }

        let out: Resp = resp.json().await.context("parse extraction response")?;
        let mut s = String::new();
        for candidate in out.candidates {
            for part in candidate.content.parts {
                if let Some(t) = part.text {
                    s.push_str(&t);
                }
            }
        }
        Ok(s)
    }
}

/// MIME type by file extension. Only PNG and JPEG screenshots are
/// accepted; anything else is rejected before a network call is made.
pub fn image_mime(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        _ => bail!(
            "unsupported image type: {} (expected .png, .jpg or .jpeg)",
            path.display()
        ),
    }
}
