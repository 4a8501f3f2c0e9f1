use nom_locate::LocatedSpan;
use std::fmt;

/// A 1-indexed source location, attached to AST nodes and errors for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Span { line, column }
    }

    /// Reads off the (line, column) `nom_locate` already tracks for this input
    /// position, as a byproduct of parsing rather than a separate rescan.
    pub fn from_located(located: LocatedSpan<&str>) -> Span {
        Span::new(located.location_line() as usize, located.get_utf8_column())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
