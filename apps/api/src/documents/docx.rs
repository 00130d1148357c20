use std::io::{Cursor, Read};

use quick_xml::{events::Event, Reader};
use zip::ZipArchive;

use super::DocumentError;

/// Extracts the body paragraphs of a DOCX document, each terminated by `\n`.
///
/// Only runs (`w:r`) of top-level body paragraphs contribute text: `w:t` is
/// copied verbatim, `w:tab` becomes a tab and `w:br`/`w:cr` a line break.
/// Paragraphs nested in tables or in text boxes (`w:txbxContent`, stored once
/// per `mc:AlternateContent` branch) belong to no body paragraph and are skipped.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut document = archive.by_name("word/document.xml")?;

    let mut xml = String::new();
    document.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut buf = Vec::new();
    let mut output = String::new();

    let mut table_depth = 0usize;
    let mut text_box_depth = 0usize;
    let mut paragraph_depth = 0usize;
    let mut run_depth = 0usize;
    let mut in_text_node = false;

    loop {
        let in_body_run =
            run_depth > 0 && paragraph_depth == 1 && table_depth == 0 && text_box_depth == 0;
        let at_body_level = paragraph_depth == 0 && table_depth == 0 && text_box_depth == 0;

        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:txbxContent" => text_box_depth += 1,
                b"w:p" => paragraph_depth += 1,
                b"w:r" => run_depth += 1,
                b"w:t" => in_text_node = in_body_run,
                b"w:tab" if in_body_run => output.push('\t'),
                b"w:br" | b"w:cr" if in_body_run => output.push('\n'),
                _ => {}
            },
            Event::Empty(ref e) => match e.name().as_ref() {
                b"w:p" if at_body_level => output.push('\n'),
                b"w:tab" if in_body_run => output.push('\t'),
                b"w:br" | b"w:cr" if in_body_run => output.push('\n'),
                _ => {}
            },
            Event::Text(e) => {
                if in_text_node {
                    output.push_str(&e.unescape()?);
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:txbxContent" => text_box_depth = text_box_depth.saturating_sub(1),
                b"w:p" => {
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                    if paragraph_depth == 0 && table_depth == 0 && text_box_depth == 0 {
                        output.push('\n');
                    }
                }
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text_node = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(output)
}

/// Builds a minimal DOCX archive with one body paragraph per entry.
#[cfg(test)]
pub fn fixture(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| {
            let escaped = p
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;");
            format!("<w:p><w:r><w:t xml:space=\"preserve\">{escaped}</w:t></w:r></w:p>")
        })
        .collect();
    fixture_from_body(&body)
}

#[cfg(test)]
pub fn fixture_from_body(body: &str) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\" \
         xmlns:mc=\"http://schemas.openxmlformats.org/markup-compatibility/2006\" \
         xmlns:wps=\"http://schemas.microsoft.com/office/word/2010/wordprocessingShape\" \
         xmlns:v=\"urn:schemas-microsoft-com:vml\">\
         <w:body>{body}<w:sectPr/></w:body></w:document>"
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}
