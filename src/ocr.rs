//! OCR text retrieval via the ocr.space API.
//!
//! Small images go through the URL endpoint directly. Larger ones are
//! downloaded, grayscaled (and halved when very large or JPEG), and
//! re-encoded as PNG before a multipart upload, keeping the payload
//! under the service limit without losing the stat text.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::io::Cursor;
use std::time::Duration;

use crate::locale::LocalePack;

const API_KEY_VAR: &str = "OCR_SPACE_API_KEY";
/// Above this the image is re-encoded before upload.
const LARGE_IMAGE_BYTES: u64 = 5_000_000;
/// Above this (or for JPEG sources) the re-encode also halves the resolution.
const HUGE_IMAGE_BYTES: u64 = 8_000_000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct OcrResponse {
    #[serde(rename = "OCRExitCode", default)]
    exit_code: i64,
    #[serde(rename = "ErrorMessage", default)]
    error_message: ErrorMessage,
    #[serde(rename = "ParsedResults", default)]
    parsed_results: Vec<ParsedResult>,
}

#[derive(Deserialize)]
struct ParsedResult {
    #[serde(rename = "ParsedText", default)]
    parsed_text: String,
}

/// The service reports errors as either a string or a list of strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl Default for ErrorMessage {
    fn default() -> Self {
        ErrorMessage::Many(Vec::new())
    }
}

impl ErrorMessage {
    fn joined(&self) -> String {
        match self {
            ErrorMessage::One(msg) => msg.clone(),
            ErrorMessage::Many(msgs) => msgs.join(". "),
        }
    }
}

/// Fetches the image behind `url` and returns the recognized text.
///
/// `endpoint` selects the numbered pro API host. Fails distinctly when
/// the API key is absent, when the service reports a non-success exit
/// code (localized prefix plus the remote messages), and when the
/// response carries no parsed results (localized message).
pub fn fetch_text(url: &str, endpoint: u32, pack: &LocalePack) -> Result<String> {
    let api_key =
        std::env::var(API_KEY_VAR).map_err(|_| anyhow!("{API_KEY_VAR} is not set"))?;
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("failed to fetch image from {url}"))?;
    let size = response.content_length().unwrap_or(0);
    let api_base = format!("https://apipro{endpoint}.ocr.space/parse");

    let result: OcrResponse = if size > LARGE_IMAGE_BYTES {
        let bytes = response.bytes().context("failed to download image body")?;
        let png = reencode_image(&bytes, size, url)?;

        let part = reqwest::blocking::multipart::Part::bytes(png)
            .file_name("image.png")
            .mime_str("image/png")
            .context("failed to build image part")?;
        let mut form =
            reqwest::blocking::multipart::Form::new().text("apikey", api_key);
        form = if pack.engine2 {
            form.text("OCREngine", "2")
        } else {
            form.text("language", pack.ocr_code.clone())
        };
        let form = form.part("file", part);

        client
            .post(format!("{api_base}/image"))
            .multipart(form)
            .send()
            .context("OCR upload request failed")?
            .json()
            .context("failed to decode OCR response")?
    } else {
        let mut ocr_url = format!("{api_base}/imageurl?apikey={api_key}&url={url}");
        if pack.engine2 {
            ocr_url.push_str("&OCREngine=2");
        } else {
            ocr_url.push_str(&format!("&language={}", pack.ocr_code));
        }
        client
            .get(&ocr_url)
            .send()
            .context("OCR request failed")?
            .json()
            .context("failed to decode OCR response")?
    };

    if result.exit_code != 1 {
        return Err(anyhow!("{}: {}", pack.err_ocr, result.error_message.joined()));
    }
    let first = result
        .parsed_results
        .first()
        .ok_or_else(|| anyhow!("{}", pack.err_unknown_ocr))?;
    Ok(first.parsed_text.clone())
}

/// Grayscale PNG re-encode; halves the resolution for very large or
/// JPEG sources, matching what the service can digest.
fn reencode_image(bytes: &[u8], size: u64, url: &str) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(bytes).context("failed to decode image")?;
    let mut gray = decoded.to_luma8();
    if size > HUGE_IMAGE_BYTES || url.to_ascii_lowercase().ends_with(".jpg") {
        gray = image::imageops::resize(
            &gray,
            (gray.width() / 2).max(1),
            (gray.height() / 2).max(1),
            image::imageops::FilterType::Triangle,
        );
    }
    let mut png = Vec::new();
    image::DynamicImage::ImageLuma8(gray)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("failed to encode PNG")?;
    Ok(png)
}
