//! Serialises laid-out pages into a PDF byte stream with `lopdf`.
//!
//! Text is set in the standard Type1 fonts with WinAnsiEncoding, content
//! streams are left uncompressed, and no timestamps are written, so the same
//! pages always produce the same bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::render::font_metrics::FontFace;
use crate::render::layout::{Page, PageGeometry, DOCUMENT_TITLE};
use crate::render::RenderError;

const PRODUCER: &str = concat!("SmartCV ", env!("CARGO_PKG_VERSION"));

/// Writes `pages` as a complete PDF document and returns its bytes.
pub fn write_pdf(pages: &[Page], geometry: &PageGeometry) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = add_font(&mut doc, FontFace::Helvetica);
    let bold_id = add_font(&mut doc, FontFace::HelveticaBold);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FontFace::Helvetica.resource_name() => regular_id,
            FontFace::HelveticaBold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = page_content(page);
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Pdf(format!("encoding content stream: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(geometry.width.round() as i64),
                Object::Integer(geometry.height.round() as i64),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(DOCUMENT_TITLE),
        "Producer" => Object::string_literal(PRODUCER),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| RenderError::Pdf(format!("serialising document: {e}")))?;
    Ok(bytes)
}

fn add_font(doc: &mut Document, face: FontFace) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    })
}

/// One `BT … ET` text object per line, positioned absolutely with `Tm`.
fn page_content(page: &Page) -> Content {
    let mut operations = Vec::with_capacity(page.lines.len() * 4);
    for line in &page.lines {
        if line.text.is_empty() {
            continue;
        }
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(line.face.resource_name().as_bytes().to_vec()),
                real(line.size),
            ],
        ));
        operations.push(Operation::new(
            "Tm",
            vec![
                Object::Integer(1),
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(1),
                real(line.x),
                real(line.y),
            ],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(
                encode_win_ansi(&line.text),
                StringFormat::Literal,
            )],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
}

/// Coordinates and sizes are written with two decimals of precision.
fn real(value: f32) -> Object {
    let hundredths = (value * 100.0).round() as i64;
    if hundredths % 100 == 0 {
        Object::Integer(hundredths / 100)
    } else {
        Object::Real((hundredths as f32 / 100.0).into())
    }
}

/// Encodes text for a WinAnsiEncoding font. ASCII and Latin-1 map directly;
/// the typographic punctuation WinAnsi carries in 0x80..=0x9F is mapped to its
/// code; anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .filter(|c| !c.is_control())
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => match c {
                '€' => 0x80,
                '‚' => 0x82,
                '„' => 0x84,
                '…' => 0x85,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '™' => 0x99,
                _ => b'?',
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::PlacedLine;

    fn line(text: &str, y: f32) -> PlacedLine {
        PlacedLine {
            face: FontFace::Helvetica,
            size: 12.0,
            x: 72.0,
            y,
            text: text.to_string(),
        }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_output_is_a_pdf() {
        let pages = vec![Page {
            lines: vec![line("Asha Rao", 700.0)],
        }];
        let bytes = write_pdf(&pages, &PageGeometry::us_letter()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(contains(&bytes, b"%%EOF"));
        assert!(contains(&bytes, b"(Asha Rao) Tj"));
        assert!(contains(&bytes, b"/Helvetica-Bold"));
    }

    #[test]
    fn test_page_count_matches_input() {
        let pages = vec![
            Page {
                lines: vec![line("one", 700.0)],
            },
            Page {
                lines: vec![line("two", 700.0)],
            },
        ];
        let bytes = write_pdf(&pages, &PageGeometry::us_letter()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_output_is_deterministic() {
        let pages = vec![Page {
            lines: vec![line("Engineer", 650.5)],
        }];
        let a = write_pdf(&pages, &PageGeometry::us_letter()).unwrap();
        let b = write_pdf(&pages, &PageGeometry::us_letter()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_special_characters_survive_round_trip() {
        let text = r"Go (1.22) \ C++) Rust";
        let pages = vec![Page {
            lines: vec![line(text, 700.0)],
        }];
        let bytes = write_pdf(&pages, &PageGeometry::us_letter()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        let content = doc.get_and_decode_page_content(page_id).unwrap();
        let shown: Vec<&[u8]> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| op.operands.first().and_then(|o| o.as_str().ok()))
            .collect();
        assert_eq!(shown, vec![text.as_bytes()]);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Café"), vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("a–b"), vec![b'a', 0x96, b'b']);
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
        assert_eq!(encode_win_ansi("a\u{7}b"), b"ab".to_vec());
    }

    #[test]
    fn test_real_trims_whole_numbers() {
        assert!(matches!(real(72.0), Object::Integer(72)));
        assert!(matches!(real(12.004), Object::Integer(12)));
        assert!(matches!(real(650.5), Object::Real(_)));
    }
}
