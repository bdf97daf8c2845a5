//! Document loading.
//!
//! The loader is picked from the file extension: `.pdf` and `.epub` use their
//! extractors (behind the `pdf` and `epub` features), anything else is read as
//! UTF-8 text. The extracted text is split into paragraphs on blank lines.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AudiobookError;

static LINE_ENDINGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").unwrap());

/// Read a document and split it into non-empty, trimmed paragraphs.
pub fn load_paragraphs(path: &Path) -> Result<Vec<String>, AudiobookError> {
    if !path.is_file() {
        return Err(AudiobookError::InputNotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    log::info!("Loading document {}", path.display());
    let raw = match ext.as_str() {
        "pdf" => read_pdf(path)?,
        "epub" => read_epub(path)?,
        _ => std::fs::read_to_string(path)?,
    };

    let paragraphs = split_paragraphs(&raw);
    log::info!("Extracted {} paragraphs", paragraphs.len());
    Ok(paragraphs)
}

/// Split text on blank lines (`\n\n`), after normalizing line endings.
pub fn split_paragraphs(raw: &str) -> Vec<String> {
    let text = LINE_ENDINGS.replace_all(raw, "\n");
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(feature = "pdf")]
fn read_pdf(path: &Path) -> Result<String, AudiobookError> {
    pdf_extract::extract_text(path).map_err(|e| AudiobookError::Extraction {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(not(feature = "pdf"))]
fn read_pdf(_path: &Path) -> Result<String, AudiobookError> {
    Err(AudiobookError::UnsupportedDocument("pdf".to_string()))
}

/// Chapters in spine order, converted from XHTML to text and joined by blank lines.
#[cfg(feature = "epub")]
fn read_epub(path: &Path) -> Result<String, AudiobookError> {
    use epub::doc::EpubDoc;

    let mut doc = EpubDoc::new(path).map_err(|e| AudiobookError::Extraction {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut parts = Vec::new();
    loop {
        if let Some((html, _mime)) = doc.get_current_str() {
            parts.push(html2text::from_read(html.as_bytes(), 80));
        }
        if !doc.go_next() {
            break;
        }
    }

    log::debug!("Read {} EPUB documents", parts.len());
    Ok(parts.join("\n\n"))
}

#[cfg(not(feature = "epub"))]
fn read_epub(_path: &Path) -> Result<String, AudiobookError> {
    Err(AudiobookError::UnsupportedDocument("epub".to_string()))
}
