//! DOCX serialization of the review document.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use clipbook_core::{Alignment, Block, DocumentModel, Run};
use clipbook_ingest::write_atomic;

use crate::error::RenderError;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const HYPERLINK_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
const STYLES_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

const HEADING_STYLE: &str = "Heading2";
const HYPERLINK_STYLE: &str = "Hyperlink";
const FONT: &str = "Arial";
/// Half-points: 10 pt body, 12 pt heading.
const BODY_SIZE: &str = "20";
const HEADING_SIZE: &str = "24";
const LINK_COLOR: &str = "0000FF";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Relationship id of the styles part; hyperlinks start after it.
const STYLES_REL_ID: &str = "rId1";

/// Hyperlink relationships, one per distinct URL in first-use order.
#[derive(Default)]
struct Relationships {
    by_url: BTreeMap<String, String>,
    ordered: Vec<(String, String)>,
}

impl Relationships {
    fn id_for(&mut self, url: &str) -> String {
        if let Some(id) = self.by_url.get(url) {
            return id.clone();
        }
        let id = format!("rId{}", self.ordered.len() + 2);
        self.by_url.insert(url.to_string(), id.clone());
        self.ordered.push((id.clone(), url.to_string()));
        id
    }
}

/// Serialize `document` to `.docx` bytes.
pub fn render_docx(document: &DocumentModel) -> Result<Vec<u8>, RenderError> {
    let mut relationships = Relationships::default();
    let body = document_xml(document, &mut relationships)?;
    let rels = document_rels_xml(&relationships)?;
    let styles = styles_xml()?;

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options =
            || SimpleFileOptions::default().last_modified_time(zip::DateTime::default());
        for (name, bytes) in [
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
            ("_rels/.rels", ROOT_RELS.as_bytes()),
            ("word/document.xml", body.as_slice()),
            ("word/_rels/document.xml.rels", rels.as_slice()),
            ("word/styles.xml", styles.as_slice()),
        ] {
            zip.start_file(name, options())?;
            zip.write_all(bytes)?;
        }
        zip.finish()?;
    }
    Ok(buffer)
}

/// Render and write atomically to `path`.
pub fn write_docx(path: &Path, document: &DocumentModel) -> Result<(), RenderError> {
    let bytes = render_docx(document)?;
    write_atomic(path, &bytes)?;
    tracing::info!(path = %path.display(), blocks = document.blocks().len(), "wrote document");
    Ok(())
}

fn start_xml() -> Result<Writer<Vec<u8>>, RenderError> {
    let mut xml = Writer::new(Vec::new());
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(xml)
}

fn empty(xml: &mut Writer<Vec<u8>>, name: &str, attrs: &[(&str, &str)]) -> Result<(), RenderError> {
    let mut element = BytesStart::new(name);
    for attr in attrs {
        element.push_attribute(*attr);
    }
    xml.write_event(Event::Empty(element))?;
    Ok(())
}

fn start(xml: &mut Writer<Vec<u8>>, name: &str) -> Result<(), RenderError> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end(xml: &mut Writer<Vec<u8>>, name: &str) -> Result<(), RenderError> {
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element(xml: &mut Writer<Vec<u8>>, text: &str) -> Result<(), RenderError> {
    let mut t = BytesStart::new("w:t");
    t.push_attribute(("xml:space", "preserve"));
    xml.write_event(Event::Start(t))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    end(xml, "w:t")
}

fn font_properties(xml: &mut Writer<Vec<u8>>, size: &str) -> Result<(), RenderError> {
    empty(xml, "w:rFonts", &[("w:ascii", FONT), ("w:hAnsi", FONT), ("w:cs", FONT)])?;
    empty(xml, "w:sz", &[("w:val", size)])?;
    empty(xml, "w:szCs", &[("w:val", size)])
}

fn write_run(
    xml: &mut Writer<Vec<u8>>,
    run: &Run,
    relationships: &mut Relationships,
) -> Result<(), RenderError> {
    match run {
        Run::Text { text } => {
            start(xml, "w:r")?;
            start(xml, "w:rPr")?;
            font_properties(xml, BODY_SIZE)?;
            end(xml, "w:rPr")?;
            text_element(xml, text)?;
            end(xml, "w:r")
        }
        Run::Link { text, url } => {
            let id = relationships.id_for(url);
            let mut link = BytesStart::new("w:hyperlink");
            link.push_attribute(("r:id", id.as_str()));
            xml.write_event(Event::Start(link))?;
            start(xml, "w:r")?;
            start(xml, "w:rPr")?;
            empty(xml, "w:rStyle", &[("w:val", HYPERLINK_STYLE)])?;
            font_properties(xml, BODY_SIZE)?;
            empty(xml, "w:color", &[("w:val", LINK_COLOR)])?;
            empty(xml, "w:u", &[("w:val", "single")])?;
            end(xml, "w:rPr")?;
            text_element(xml, text)?;
            end(xml, "w:r")?;
            end(xml, "w:hyperlink")
        }
    }
}

fn document_xml(
    document: &DocumentModel,
    relationships: &mut Relationships,
) -> Result<Vec<u8>, RenderError> {
    let mut xml = start_xml()?;
    let mut root = BytesStart::new("w:document");
    root.push_attribute(("xmlns:w", WORD_NS));
    root.push_attribute(("xmlns:r", REL_NS));
    xml.write_event(Event::Start(root))?;
    start(&mut xml, "w:body")?;

    for block in document.blocks() {
        start(&mut xml, "w:p")?;
        match block {
            Block::Heading { text } => {
                start(&mut xml, "w:pPr")?;
                empty(&mut xml, "w:pStyle", &[("w:val", HEADING_STYLE)])?;
                end(&mut xml, "w:pPr")?;
                start(&mut xml, "w:r")?;
                text_element(&mut xml, text)?;
                end(&mut xml, "w:r")?;
            }
            Block::Paragraph { alignment, runs } => {
                if *alignment == Alignment::Center {
                    start(&mut xml, "w:pPr")?;
                    empty(&mut xml, "w:jc", &[("w:val", "center")])?;
                    end(&mut xml, "w:pPr")?;
                }
                for run in runs {
                    write_run(&mut xml, run, relationships)?;
                }
            }
        }
        end(&mut xml, "w:p")?;
    }

    empty(&mut xml, "w:sectPr", &[])?;
    end(&mut xml, "w:body")?;
    end(&mut xml, "w:document")?;
    Ok(xml.into_inner())
}

fn document_rels_xml(relationships: &Relationships) -> Result<Vec<u8>, RenderError> {
    let mut xml = start_xml()?;
    let mut root = BytesStart::new("Relationships");
    root.push_attribute(("xmlns", PACKAGE_REL_NS));
    xml.write_event(Event::Start(root))?;
    empty(
        &mut xml,
        "Relationship",
        &[("Id", STYLES_REL_ID), ("Type", STYLES_REL), ("Target", "styles.xml")],
    )?;
    for (id, url) in &relationships.ordered {
        empty(
            &mut xml,
            "Relationship",
            &[
                ("Id", id.as_str()),
                ("Type", HYPERLINK_REL),
                ("Target", url.as_str()),
                ("TargetMode", "External"),
            ],
        )?;
    }
    end(&mut xml, "Relationships")?;
    Ok(xml.into_inner())
}

fn styles_xml() -> Result<Vec<u8>, RenderError> {
    let mut xml = start_xml()?;
    let mut root = BytesStart::new("w:styles");
    root.push_attribute(("xmlns:w", WORD_NS));
    xml.write_event(Event::Start(root))?;

    start(&mut xml, "w:docDefaults")?;
    start(&mut xml, "w:rPrDefault")?;
    start(&mut xml, "w:rPr")?;
    font_properties(&mut xml, BODY_SIZE)?;
    end(&mut xml, "w:rPr")?;
    end(&mut xml, "w:rPrDefault")?;
    end(&mut xml, "w:docDefaults")?;

    let mut normal = BytesStart::new("w:style");
    normal.push_attribute(("w:type", "paragraph"));
    normal.push_attribute(("w:default", "1"));
    normal.push_attribute(("w:styleId", "Normal"));
    xml.write_event(Event::Start(normal))?;
    empty(&mut xml, "w:name", &[("w:val", "Normal")])?;
    start(&mut xml, "w:rPr")?;
    font_properties(&mut xml, BODY_SIZE)?;
    end(&mut xml, "w:rPr")?;
    end(&mut xml, "w:style")?;

    let mut heading = BytesStart::new("w:style");
    heading.push_attribute(("w:type", "paragraph"));
    heading.push_attribute(("w:styleId", HEADING_STYLE));
    xml.write_event(Event::Start(heading))?;
    empty(&mut xml, "w:name", &[("w:val", "heading 2")])?;
    empty(&mut xml, "w:basedOn", &[("w:val", "Normal")])?;
    empty(&mut xml, "w:next", &[("w:val", "Normal")])?;
    empty(&mut xml, "w:qFormat", &[])?;
    start(&mut xml, "w:pPr")?;
    empty(&mut xml, "w:keepNext", &[])?;
    empty(&mut xml, "w:spacing", &[("w:before", "240"), ("w:after", "120")])?;
    empty(&mut xml, "w:outlineLvl", &[("w:val", "1")])?;
    end(&mut xml, "w:pPr")?;
    start(&mut xml, "w:rPr")?;
    font_properties(&mut xml, HEADING_SIZE)?;
    empty(&mut xml, "w:b", &[])?;
    end(&mut xml, "w:rPr")?;
    end(&mut xml, "w:style")?;

    let mut link = BytesStart::new("w:style");
    link.push_attribute(("w:type", "character"));
    link.push_attribute(("w:styleId", HYPERLINK_STYLE));
    xml.write_event(Event::Start(link))?;
    empty(&mut xml, "w:name", &[("w:val", "Hyperlink")])?;
    start(&mut xml, "w:rPr")?;
    empty(&mut xml, "w:color", &[("w:val", LINK_COLOR)])?;
    empty(&mut xml, "w:u", &[("w:val", "single")])?;
    end(&mut xml, "w:rPr")?;
    end(&mut xml, "w:style")?;

    end(&mut xml, "w:styles")?;
    Ok(xml.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_ids_are_shared_per_url() {
        let mut rels = Relationships::default();
        assert_eq!(rels.id_for("https://x.com/1"), "rId2");
        assert_eq!(rels.id_for("https://x.com/2"), "rId3");
        assert_eq!(rels.id_for("https://x.com/1"), "rId2");
        assert_eq!(rels.ordered.len(), 2);
    }

    #[test]
    fn empty_document_still_has_a_body() {
        let xml = document_xml(&DocumentModel::default(), &mut Relationships::default()).unwrap();
        let xml = String::from_utf8(xml).unwrap();
        assert!(xml.contains("<w:body><w:sectPr/></w:body>"));
    }
}
