//! Visual templates. A template only changes typography; section order and
//! content are the same for every template.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Template {
    #[default]
    Classic,
    Compact,
}

/// Font sizes and spacing, all in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Typography {
    pub title_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    /// Baseline-to-baseline distance as a multiple of the font size.
    pub leading: f32,
    /// Vertical gap inserted between sections.
    pub section_gap: f32,
}

impl Template {
    /// Maps the form's template identifier. Unknown or missing identifiers fall
    /// back to [`Template::Classic`].
    pub fn from_identifier(id: Option<&str>) -> Self {
        match id.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("classic") => Template::Classic,
            Some("compact") => Template::Compact,
            Some(other) => {
                debug!("Unknown template '{other}', using classic");
                Template::Classic
            }
        }
    }

    pub fn typography(self) -> Typography {
        match self {
            Template::Classic => Typography {
                title_size: 25.0,
                heading_size: 16.0,
                body_size: 12.0,
                leading: 1.35,
                section_gap: 14.0,
            },
            Template::Compact => Typography {
                title_size: 20.0,
                heading_size: 13.0,
                body_size: 10.0,
                leading: 1.25,
                section_gap: 9.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_mapping() {
        assert_eq!(Template::from_identifier(None), Template::Classic);
        assert_eq!(Template::from_identifier(Some("classic")), Template::Classic);
        assert_eq!(Template::from_identifier(Some(" Compact ")), Template::Compact);
    }

    #[test]
    fn test_unknown_identifier_falls_back() {
        assert_eq!(Template::from_identifier(Some("neon")), Template::Classic);
        assert_eq!(Template::from_identifier(Some("")), Template::Classic);
    }

    #[test]
    fn test_compact_is_smaller() {
        let classic = Template::Classic.typography();
        let compact = Template::Compact.typography();
        assert!(compact.body_size < classic.body_size);
        assert!(compact.section_gap < classic.section_gap);
    }
}
