use std::io::Write;

use super::*;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn document(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    )
}

fn write_docx(path: &Path, body: &str) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    zip.start_file(DOCUMENT_PART, SimpleFileOptions::default()).unwrap();
    zip.write_all(document(body).as_bytes()).unwrap();
    zip.finish().unwrap();
}

fn read_lines(path: &Path) -> Vec<Testimony> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// =========================================================================
// DOCUMENT TEXT
// =========================================================================

#[test]
fn paragraphs_join_runs_and_skip_blank_paragraphs() {
    let xml = document(
        r#"<w:p><w:r><w:t xml:space="preserve">God is </w:t></w:r><w:r><w:t>faithful</w:t></w:r></w:p>
           <w:p><w:r><w:t>   </w:t></w:r></w:p>
           <w:p/>
           <w:p><w:r><w:t>Healed &amp; restored</w:t></w:r></w:p>"#,
    );
    assert_eq!(paragraphs(&xml).unwrap(), vec!["God is faithful", "Healed & restored"]);
}

#[test]
fn tabs_and_breaks_count_only_inside_runs() {
    let xml = document(
        r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Date:</w:t><w:tab/><w:t>1998</w:t><w:br/><w:t>Manila</w:t></w:r></w:p>"#,
    );
    assert_eq!(paragraphs(&xml).unwrap(), vec!["Date:\t1998\nManila"]);
}

#[test]
fn malformed_xml_is_an_error() {
    let err = paragraphs("<w:p><w:r></w:p>").unwrap_err();
    assert!(matches!(err, IngestError::Xml(_)));
}

#[test]
fn links_are_collected_in_order() {
    let links = Regex::new(LINK_PATTERN).unwrap();
    let lines = vec!["Watch https://youtu.be/abc today".to_string(), "Notes: https://docs.test/x?id=2".to_string()];

    let t = testimony_from("a.docx".into(), &lines, &links);
    assert_eq!(t.content, "Watch https://youtu.be/abc today\nNotes: https://docs.test/x?id=2");
    assert_eq!(t.link, "https://youtu.be/abc");
    assert_eq!(t.all_links, vec!["https://youtu.be/abc", "https://docs.test/x?id=2"]);
    assert_eq!(t.error, None);
}

#[test]
fn link_stops_at_markup_characters() {
    let links = Regex::new(LINK_PATTERN).unwrap();
    let t = testimony_from("a.docx".into(), &["<https://a.test/p>, http://b.test".to_string()], &links);
    assert_eq!(t.all_links, vec!["https://a.test/p"]);
}

// =========================================================================
// RUN
// =========================================================================

#[test]
fn ingest_writes_one_line_per_document_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    write_docx(
        &dir.path().join("b.docx"),
        "<w:p><w:r><w:t>Cancer free https://youtu.be/one and https://youtu.be/two</w:t></w:r></w:p>",
    );
    write_docx(&dir.path().join("a.DOCX"), "<w:p><w:r><w:t>Found work</w:t></w:r></w:p>");
    fs::write(dir.path().join("c.docx"), b"not a zip").unwrap();
    fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();
    let output = dir.path().join("testimonies.jsonl");

    let summary = ingest_dir(dir.path(), &output).unwrap();
    assert_eq!(summary, IngestSummary { files: 3, with_links: 1, links: 2, failed: 1 });

    let records = read_lines(&output);
    let names: Vec<&str> = records.iter().map(|t| t.filename.as_str()).collect();
    assert_eq!(names, vec!["a.DOCX", "b.docx", "c.docx"]);
    assert_eq!(records[0].content, "Found work");
    assert_eq!(records[1].link, "https://youtu.be/one");
    assert!(records[2].content.is_empty());
    assert!(records[2].error.is_some());
}

#[test]
fn readable_records_carry_no_error_key() {
    let dir = tempfile::tempdir().unwrap();
    write_docx(&dir.path().join("a.docx"), "<w:p><w:r><w:t>Señor, gracias</w:t></w:r></w:p>");
    let output = dir.path().join("out.jsonl");

    ingest_dir(dir.path(), &output).unwrap();
    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("Señor, gracias"));
    assert!(!text.contains("\"error\""));
}

#[test]
fn document_without_body_part_is_recorded_as_failed() {
    let dir = tempfile::tempdir().unwrap();
    let mut zip = ZipWriter::new(File::create(dir.path().join("empty.docx")).unwrap());
    zip.start_file("docProps/core.xml", SimpleFileOptions::default()).unwrap();
    zip.write_all(b"<cp:coreProperties/>").unwrap();
    zip.finish().unwrap();
    let output = dir.path().join("out.jsonl");

    let summary = ingest_dir(dir.path(), &output).unwrap();
    assert_eq!(summary.failed, 1);
    assert!(read_lines(&output)[0].error.as_deref().unwrap().starts_with("not a docx archive"));
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ingest_dir(&dir.path().join("nope"), &dir.path().join("out.jsonl")).unwrap_err();
    assert!(matches!(err, IngestError::MissingDir(_)));
}
