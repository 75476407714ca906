//! Corpus builder: a folder of `.docx` testimonies to the JSONL file the
//! search service loads.
//!
//! DESIGN
//! ======
//! A `.docx` is a zip whose `word/document.xml` holds the body. Paragraph
//! text is the concatenation of its `w:t` runs. Paragraph properties can
//! declare `w:tab` stops too, so tabs and breaks count only inside a run.
//! A document that fails to read still gets a record carrying the error.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use tracing::{debug, info, warn};
use wire::Testimony;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";
const LINK_PATTERN: &str = r#"https://[^\s<>"{}|\\^`\[\]]+"#;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("testimonies directory not found: {}", .0.display())]
    MissingDir(PathBuf),
    #[error("i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("not a docx archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid link pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Totals for one ingest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub files: usize,
    pub with_links: usize,
    pub links: usize,
    pub failed: usize,
}

impl IngestSummary {
    fn record(&mut self, testimony: &Testimony) {
        self.files += 1;
        self.links += testimony.all_links.len();
        if !testimony.all_links.is_empty() {
            self.with_links += 1;
        }
        if testimony.error.is_some() {
            self.failed += 1;
        }
    }
}

// =============================================================================
// DOCUMENT TEXT
// =============================================================================

/// Non-empty, trimmed paragraphs of a `.docx` file.
///
/// # Errors
///
/// Returns an error when the file is not a zip, lacks the document part, or
/// its XML is malformed.
pub fn docx_paragraphs(path: &Path) -> Result<Vec<String>, IngestError> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;
    paragraphs(&xml)
}

/// Non-empty, trimmed paragraphs of a WordprocessingML body.
///
/// # Errors
///
/// Returns [`IngestError::Xml`] for malformed XML.
pub fn paragraphs(xml: &str) -> Result<Vec<String>, IngestError> {
    let mut reader = Reader::from_str(xml);
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"r" => in_run = false,
                b"t" => in_text = false,
                b"p" => push_paragraph(&mut out, &mut current),
                _ => {}
            },
            Event::Empty(e) if in_run => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(text) if in_text => current.push_str(&text.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }
    push_paragraph(&mut out, &mut current);
    Ok(out)
}

fn push_paragraph(out: &mut Vec<String>, current: &mut String) {
    let text = current.trim();
    if !text.is_empty() {
        out.push(text.to_owned());
    }
    current.clear();
}

/// Corpus record for a readable document.
#[must_use]
pub fn testimony_from(filename: String, paragraphs: &[String], links: &Regex) -> Testimony {
    let content = paragraphs.join("\n");
    let all_links: Vec<String> = links.find_iter(&content).map(|m| m.as_str().to_owned()).collect();
    Testimony {
        filename,
        link: all_links.first().cloned().unwrap_or_default(),
        content,
        all_links,
        error: None,
    }
}

// =============================================================================
// RUN
// =============================================================================

/// Convert every `.docx` in `dir` into one JSONL line of `output`.
///
/// # Errors
///
/// Fails when `dir` is missing or `output` cannot be written. Unreadable
/// documents do not fail the run.
pub fn ingest_dir(dir: &Path, output: &Path) -> Result<IngestSummary, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::MissingDir(dir.to_path_buf()));
    }
    let links = Regex::new(LINK_PATTERN)?;

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("docx")))
        .collect();
    files.sort();
    info!(dir = %dir.display(), count = files.len(), "ingest: found documents");

    let mut writer = BufWriter::new(File::create(output)?);
    let mut summary = IngestSummary::default();
    for (index, path) in files.iter().enumerate() {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(n = index + 1, total = files.len(), %filename, "ingest: reading");

        let testimony = match docx_paragraphs(path) {
            Ok(paragraphs) => testimony_from(filename, &paragraphs, &links),
            Err(e) => {
                warn!(%filename, error = %e, "ingest: unreadable document");
                Testimony { filename, error: Some(e.to_string()), ..Testimony::default() }
            }
        };
        summary.record(&testimony);
        serde_json::to_writer(&mut writer, &testimony)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    info!(
        output = %output.display(),
        files = summary.files,
        with_links = summary.with_links,
        links = summary.links,
        failed = summary.failed,
        "ingest: corpus written"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod ingest_test;
