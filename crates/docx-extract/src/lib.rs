//! DOCX text extraction.
//!
//! Pulls plain paragraph text out of the OOXML container: the archive is
//! opened with `zip` and `word/document.xml` is streamed with `quick-xml`.
//! Paragraph structure is preserved (blank line between paragraphs) and
//! table rows are flattened to `cell | cell | cell` lines, since
//! specification sections often carry schedules as tables. The source
//! document is never modified.

mod error;

pub use error::ExtractError;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;

/// Container for extracted specification content.
#[derive(Debug, Clone)]
pub struct ExtractedDoc {
    pub file_name: String,
    pub text: String,
    pub word_count: usize,
}

/// Extract text content from a `.docx` file.
pub fn extract_docx(path: &Path) -> Result<ExtractedDoc, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }
    let is_docx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("docx"));
    if !is_docx {
        return Err(ExtractError::NotDocx(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|_| ExtractError::InvalidContainer(path.to_path_buf()))?;
    let mut entry = archive
        .by_name("word/document.xml")
        .map_err(|_| ExtractError::InvalidContainer(path.to_path_buf()))?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;

    let text = parse_document_xml(&xml)?;
    let word_count = text.split_whitespace().count();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(ExtractedDoc {
        file_name,
        text,
        word_count,
    })
}

/// List `.docx` files in a directory, sorted by name. Word lock files
/// (`~$...`) are skipped.
pub fn find_docx_files(dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_docx = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("docx"));
        let is_lock_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("~$"));
        if is_docx && !is_lock_file {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parse WordprocessingML into plain paragraph text.
///
/// `w:p` closes a paragraph, `w:t` delimits text runs, `w:tab` and
/// `w:br`/`w:cr` become a space and a newline. Inside `w:tbl`, paragraph
/// text accumulates per cell and each row is emitted as one
/// `cell | cell` line.
pub fn parse_document_xml(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut buf = Vec::new();

    let mut paragraphs: Vec<String> = Vec::new();
    let mut para = String::new();
    let mut in_text = false;
    let mut table_depth = 0usize;
    let mut row_cells: Vec<String> = Vec::new();
    let mut cell = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Err(e) => return Err(ExtractError::MalformedXml(e.to_string())),
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:tbl" => table_depth += 1,
                b"w:tr" if table_depth > 0 => row_cells.clear(),
                b"w:tc" if table_depth > 0 => cell.clear(),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => para.push(' '),
                b"w:br" | b"w:cr" => para.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractError::MalformedXml(e.to_string()))?;
                para.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    let text = para.trim().to_string();
                    para.clear();
                    if !text.is_empty() {
                        if table_depth > 0 {
                            if !cell.is_empty() {
                                cell.push(' ');
                            }
                            cell.push_str(&text);
                        } else {
                            paragraphs.push(text);
                        }
                    }
                }
                b"w:tc" if table_depth > 0 => {
                    let text = cell.trim().to_string();
                    cell.clear();
                    if !text.is_empty() {
                        row_cells.push(text);
                    }
                }
                b"w:tr" if table_depth > 0 => {
                    if !row_cells.is_empty() {
                        paragraphs.push(row_cells.join(" | "));
                    }
                    row_cells.clear();
                }
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Ok(_) => {}
        }
        buf.clear();
    }

    Ok(paragraphs.join("\n\n"))
}
