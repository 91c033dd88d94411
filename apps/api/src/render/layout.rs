//! Page layout: turns a resume into positioned text lines, page by page.
//!
//! The layout is a single top-to-bottom pass. Each block is greedily
//! word-wrapped against the text width using the static metric tables, and a
//! new page starts whenever the next line would cross the bottom margin.
//! Coordinates follow PDF conventions: points, origin at the bottom-left.

use crate::models::resume::ResumeRecord;
use crate::render::font_metrics::FontFace;
use crate::render::template::Typography;

/// Physical page and margins, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// US letter (8.5" × 11") with 1" margins on all sides.
    pub fn us_letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin: 72.0,
        }
    }

    pub fn text_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// A run of text set in a single face and size.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub face: FontFace,
    pub size: f32,
    pub align: Align,
    pub text: String,
    /// Extra vertical space above the block. Dropped at the top of a page.
    pub space_before: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub face: FontFace,
    pub size: f32,
    pub x: f32,
    /// Baseline, measured from the bottom edge.
    pub y: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

pub const DOCUMENT_TITLE: &str = "SmartCV";

// ────────────────────────────────────────────────────────────────────────────
// Content blocks
// ────────────────────────────────────────────────────────────────────────────

/// Builds the document's blocks in their fixed order: title, personal details,
/// education, summary, skills, professional experience. Optional fields are
/// emitted only when they carry text.
pub fn build_blocks(record: &ResumeRecord, typo: &Typography) -> Vec<Block> {
    let mut blocks = vec![Block {
        face: FontFace::HelveticaBold,
        size: typo.title_size,
        align: Align::Center,
        text: DOCUMENT_TITLE.to_string(),
        space_before: 0.0,
    }];

    let p = &record.personal;
    push_section(
        &mut blocks,
        typo,
        "Personal Details",
        &[
            ("Name", Some(p.name.as_str())),
            ("Email", Some(p.email.as_str())),
            ("Phone", Some(p.phone.as_str())),
            ("Address", Some(p.address.as_str())),
            ("LinkedIn", p.linkedin.as_deref()),
            ("Website", p.website.as_deref()),
        ],
    );

    let q = &record.qualification;
    push_section(
        &mut blocks,
        typo,
        "Education",
        &[
            ("Degree", Some(q.degree.as_str())),
            ("University", Some(q.university.as_str())),
            ("Year", Some(q.year.as_str())),
            ("Additional Courses", q.additional_courses.as_deref()),
        ],
    );

    push_section(
        &mut blocks,
        typo,
        "Summary",
        &[("", Some(record.summary.as_str()))],
    );
    push_section(
        &mut blocks,
        typo,
        "Skills",
        &[("", Some(record.skills.as_str()))],
    );

    let w = &record.profession;
    push_section(
        &mut blocks,
        typo,
        "Professional Experience",
        &[
            ("Job Title", Some(w.job_title.as_str())),
            ("Experience", Some(w.experience.as_str())),
            ("Background", Some(w.background.as_str())),
            ("Achievements", w.achievements.as_deref()),
        ],
    );

    blocks
}

/// Appends a bold heading followed by one body block per non-blank field.
/// An empty label writes the value on its own.
fn push_section(
    blocks: &mut Vec<Block>,
    typo: &Typography,
    title: &str,
    fields: &[(&str, Option<&str>)],
) {
    blocks.push(Block {
        face: FontFace::HelveticaBold,
        size: typo.heading_size,
        align: Align::Left,
        text: title.to_string(),
        space_before: typo.section_gap,
    });
    for &(label, value) in fields {
        let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        let text = if label.is_empty() {
            clean_text(value)
        } else {
            format!("{label}: {}", clean_text(value))
        };
        blocks.push(Block {
            face: FontFace::Helvetica,
            size: typo.body_size,
            align: Align::Left,
            text,
            space_before: 0.0,
        });
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Placement and pagination
// ────────────────────────────────────────────────────────────────────────────

/// Positions every block on as many pages as needed. Always returns at least
/// one page.
pub fn layout(blocks: &[Block], geometry: &PageGeometry, leading: f32) -> Vec<Page> {
    let top = geometry.height - geometry.margin;
    let mut pages = vec![Page::default()];
    let mut cursor = top;

    for block in blocks {
        if cursor < top {
            cursor -= block.space_before;
        }
        let advance = block.size * leading;
        let metrics = block.face.metrics();

        for text in wrap_text(&block.text, block.face, block.size, geometry.text_width()) {
            if cursor - advance < geometry.margin {
                pages.push(Page::default());
                cursor = top;
            }
            cursor -= advance;

            let x = match block.align {
                Align::Left => geometry.margin,
                Align::Center => {
                    let w = metrics.measure_pt(&text, block.size);
                    ((geometry.width - w) / 2.0).max(geometry.margin)
                }
            };

            if let Some(page) = pages.last_mut() {
                page.lines.push(PlacedLine {
                    face: block.face,
                    size: block.size,
                    x,
                    y: cursor,
                    text,
                });
            }
        }
    }

    pages
}

// ────────────────────────────────────────────────────────────────────────────
// Line breaking
// ────────────────────────────────────────────────────────────────────────────

/// Greedy word wrap on single-space boundaries, so runs of spaces inside a
/// line are kept as typed; whitespace is only dropped where a line breaks.
/// Embedded newlines start a new line; a word wider than the line is split
/// across lines character by character. Blank paragraphs yield an empty line
/// so the vertical rhythm of the input is kept.
pub fn wrap_text(text: &str, face: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let metrics = face.metrics();
    let space = metrics.space_width * size;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0_f32;
        // `open`: the current line has taken a token, so the next one needs a separator.
        let mut open = false;
        // `broke`: the paragraph already wrapped; spaces at a line start are dropped.
        let mut broke = false;

        for word in paragraph.split(' ') {
            let word_width = metrics.measure_pt(word, size);

            if open {
                if current_width + space + word_width <= max_width {
                    current.push(' ');
                    current.push_str(word);
                    current_width += space + word_width;
                    continue;
                }
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
                open = false;
                broke = true;
            }

            if broke && word.is_empty() {
                continue;
            }

            if word_width > max_width {
                for c in word.chars() {
                    let w = metrics.char_width(c) * size;
                    if !current.is_empty() && current_width + w > max_width {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0.0;
                        broke = true;
                    }
                    current.push(c);
                    current_width += w;
                }
            } else {
                current.push_str(word);
                current_width = word_width;
            }
            open = true;
        }

        lines.push(current);
    }

    lines
}

/// Drops control characters except newlines; tabs become spaces. Spacing is
/// otherwise left exactly as submitted.
fn clean_text(value: &str) -> String {
    value
        .chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            '\n' => Some('\n'),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}
