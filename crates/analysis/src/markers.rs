//! Error-marker vocabulary.
//!
//! The backend sometimes returns its own failure text inside an otherwise
//! well-formed payload. Any line containing one of these markers (plain
//! substring match, case-sensitive) disqualifies the field from caching.

/// Markers used when none are configured.
pub const DEFAULT_ERROR_MARKERS: [&str; 2] = ["오류", "실패"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMarkers {
    markers: Vec<String>,
}

impl ErrorMarkers {
    /// Build from an explicit list. Blank entries are dropped since they would
    /// match every line.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(Into::into)
                .filter(|m: &String| !m.is_empty())
                .collect(),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.markers
    }

    /// True when `text` contains any marker.
    pub fn matches(&self, text: &str) -> bool {
        self.markers.iter().any(|m| text.contains(m.as_str()))
    }

    /// True when any line contains any marker.
    pub fn any_line(&self, lines: &[String]) -> bool {
        lines.iter().any(|l| self.matches(l))
    }
}

impl Default for ErrorMarkers {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_MARKERS)
    }
}
