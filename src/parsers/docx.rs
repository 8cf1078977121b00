use std::io::{Cursor, Read, Seek};

use roxmltree::Node;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{AtsError, Result};
use crate::parsers::TextExtractor;
use crate::types::FileType;

const DEFAULT_DOCUMENT_PART: &str = "word/document.xml";
const MARKUP_COMPATIBILITY_NS: &str =
    "http://schemas.openxmlformats.org/markup-compatibility/2006";

enum AttributeType {
    OfficeDocument,
}

impl AttributeType {
    /// Suffix shared by the transitional and strict OOXML relationship URIs.
    fn suffix(&self) -> &'static str {
        match self {
            AttributeType::OfficeDocument => "/relationships/officeDocument",
        }
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn format(&self) -> FileType {
        FileType::Docx
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        extract_from_mem(bytes)
    }
}

fn corrupt(reason: impl Into<String>) -> AtsError {
    AtsError::corrupt(FileType::Docx, reason)
}

/// Resolve the main document part through `_rels/.rels`.
fn get_doc_name<R>(archive: &mut ZipArchive<R>) -> Option<String>
where
    R: Seek,
    R: Read,
{
    let rels_buffer = read_part(archive, "_rels/.rels").ok()?;
    let rel_xml = roxmltree::Document::parse(&rels_buffer).ok()?;

    rel_xml
        .descendants()
        .find(|elem| {
            elem.attribute("Type")
                .is_some_and(|kind| kind.ends_with(AttributeType::OfficeDocument.suffix()))
        })
        .and_then(|elem| elem.attribute("Target"))
        .map(|target| target.trim_start_matches('/').to_owned())
}

fn read_part<R>(archive: &mut ZipArchive<R>, name: &str) -> Result<String>
where
    R: Seek,
    R: Read,
{
    let mut part = archive
        .by_name(name)
        .map_err(|_| corrupt(format!("missing part {name}")))?;

    let mut buffer = String::new();
    part.read_to_string(&mut buffer)
        .map_err(|e| corrupt(format!("could not read part {name}: {e}")))?;
    Ok(buffer)
}

/// Extract paragraph and table-cell text in document order, one paragraph
/// per line. Header and footer parts are included when they parse.
pub fn extract_from_mem(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| corrupt(format!("not a zip archive: {e}")))?;

    let doc_name = get_doc_name(&mut archive).unwrap_or_else(|| DEFAULT_DOCUMENT_PART.to_string());
    debug!("Found document part: {}", doc_name);

    let body = read_part(&mut archive, &doc_name)?;
    let mut lines = paragraph_lines(&body)
        .map_err(|e| corrupt(format!("could not parse {doc_name}: {e}")))?;

    let (headers, footers) = header_footer_parts(&archive);
    let mut header_lines = best_effort_lines(&mut archive, &headers);
    let footer_lines = best_effort_lines(&mut archive, &footers);

    header_lines.append(&mut lines);
    header_lines.extend(footer_lines);
    debug!("Extracted {} docx lines", header_lines.len());

    Ok(header_lines.join("\n"))
}

fn header_footer_parts<R>(archive: &ZipArchive<R>) -> (Vec<String>, Vec<String>)
where
    R: Seek,
    R: Read,
{
    let mut headers = Vec::new();
    let mut footers = Vec::new();
    for name in archive.file_names() {
        if !name.ends_with(".xml") {
            continue;
        }
        if name.starts_with("word/header") {
            headers.push(name.to_string());
        } else if name.starts_with("word/footer") {
            footers.push(name.to_string());
        }
    }
    headers.sort();
    footers.sort();
    (headers, footers)
}

fn best_effort_lines<R>(archive: &mut ZipArchive<R>, parts: &[String]) -> Vec<String>
where
    R: Seek,
    R: Read,
{
    let mut lines = Vec::new();
    for part in parts {
        match read_part(archive, part).and_then(|xml| {
            paragraph_lines(&xml).map_err(|e| corrupt(format!("could not parse {part}: {e}")))
        }) {
            Ok(mut part_lines) => lines.append(&mut part_lines),
            Err(e) => warn!("Skipping {}: {}", part, e),
        }
    }
    lines
}

fn paragraph_lines(xml: &str) -> std::result::Result<Vec<String>, roxmltree::Error> {
    let doc = roxmltree::Document::parse(xml)?;

    let lines = doc
        .descendants()
        .filter(|elem| elem.has_tag_name("p") && !in_fallback(elem))
        .map(paragraph_text)
        .filter(|line| !line.trim().is_empty())
        .collect();
    Ok(lines)
}

/// Word writes each text box twice: the drawing in `mc:Choice` and a VML
/// copy in `mc:Fallback`. Only the first one is read.
fn in_fallback(node: &Node) -> bool {
    node.ancestors()
        .any(|a| a.has_tag_name((MARKUP_COMPATIBILITY_NS, "Fallback")))
}

fn paragraph_text(paragraph: Node) -> String {
    let mut text = String::new();

    for node in paragraph.descendants().filter(|n| n.is_element()) {
        let in_run = node.parent().is_some_and(|p| p.has_tag_name("r"));
        // text boxes nest whole paragraphs inside a run; those are visited on their own
        let owner = node.ancestors().skip(1).find(|a| a.has_tag_name("p"));
        if !in_run || owner != Some(paragraph) {
            continue;
        }
        match node.tag_name().name() {
            "t" => text.push_str(node.text().unwrap_or_default()),
            "tab" => text.push('\t'),
            "br" | "cr" => text.push('\n'),
            _ => {}
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    #[test]
    fn test_paragraph_lines_in_document_order() {
        let xml = format!(
            r#"<w:document {W}><w:body>
                <w:p><w:pPr><w:tabs><w:tab w:val="left"/></w:tabs></w:pPr>
                    <w:r><w:t>Jane</w:t></w:r><w:r><w:t xml:space="preserve"> Doe</w:t></w:r></w:p>
                <w:tbl><w:tr>
                    <w:tc><w:p><w:r><w:t>Python</w:t></w:r></w:p></w:tc>
                    <w:tc><w:p><w:r><w:t>5 years</w:t></w:r></w:p></w:tc>
                </w:tr></w:tbl>
                <w:p/>
                <w:p><w:r><w:t>REST</w:t><w:tab/><w:t>APIs</w:t><w:br/><w:t>Rust</w:t></w:r></w:p>
            </w:body></w:document>"#
        );

        assert_eq!(
            paragraph_lines(&xml).unwrap(),
            vec!["Jane Doe", "Python", "5 years", "REST\tAPIs\nRust"]
        );
    }

    #[test]
    fn test_text_box_paragraphs_are_not_duplicated() {
        let xml = format!(
            r#"<w:document {W}><w:body>
                <w:p><w:r><w:t>Outer</w:t></w:r><w:r><w:pict><w:txbxContent>
                    <w:p><w:r><w:t>Inner</w:t></w:r></w:p>
                </w:txbxContent></w:pict></w:r></w:p>
            </w:body></w:document>"#
        );

        assert_eq!(paragraph_lines(&xml).unwrap(), vec!["Outer", "Inner"]);
    }

    #[test]
    fn test_alternate_content_text_box_read_once() {
        let xml = format!(
            r#"<w:document {W} xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"><w:body>
                <w:p><w:r><mc:AlternateContent>
                    <mc:Choice Requires="wps"><w:drawing><w:txbxContent>
                        <w:p><w:r><w:t>Kubernetes expert</w:t></w:r></w:p>
                    </w:txbxContent></w:drawing></mc:Choice>
                    <mc:Fallback><w:pict><w:txbxContent>
                        <w:p><w:r><w:t>Kubernetes expert</w:t></w:r></w:p>
                    </w:txbxContent></w:pict></mc:Fallback>
                </mc:AlternateContent></w:r></w:p>
                <w:p><w:r><w:t>Go developer</w:t></w:r></w:p>
            </w:body></w:document>"#
        );

        assert_eq!(paragraph_lines(&xml).unwrap(), vec!["Kubernetes expert", "Go developer"]);
    }

    #[test]
    fn test_not_a_zip_is_corrupt() {
        assert!(matches!(
            extract_from_mem(b"PK but not really"),
            Err(AtsError::CorruptDocument { format: FileType::Docx, .. })
        ));
    }
}
