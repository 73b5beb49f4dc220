//! Forward-only line scanning over decoded file text.
//!
//! RAS files are parsed line by line, with payload readers that must stop
//! *at* the next element boundary without consuming it. The scanner is
//! peekable so readers can look at the boundary line and leave it for the
//! dispatch loop, and position-addressable so nested geometry parsers can
//! re-scan a window of an already-decoded file.

/// A peekable cursor over the lines of a file.
#[derive(Debug, Clone)]
pub struct LineScanner<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineScanner<'a> {
    /// Split text into lines. CRLF terminators are tolerated.
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().map(|l| l.trim_end_matches('\r')).collect(),
            pos: 0,
        }
    }

    /// The next unread line, without consuming it.
    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    /// Consume and return the next line.
    pub fn next_line(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    /// Consume the next line, discarding it.
    pub fn advance(&mut self) {
        if self.pos < self.lines.len() {
            self.pos += 1;
        }
    }

    /// Index of the next unread line.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move the cursor to an absolute line index.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.lines.len());
    }

    /// A line by absolute index.
    pub fn line_at(&self, idx: usize) -> Option<&'a str> {
        self.lines.get(idx).copied()
    }

    /// Total number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// An independent cursor over the same lines, positioned at `pos`.
    pub fn scanner_at(&self, pos: usize) -> LineScanner<'a> {
        let mut sc = self.clone();
        sc.seek(pos);
        sc
    }
}

/// Everything after the first '=', trimmed. Empty if there is no '='.
pub fn right_of_equals(line: &str) -> &str {
    match line.split_once('=') {
        Some((_, rest)) => rest.trim(),
        None => "",
    }
}

/// Everything before the first '='; the whole line if there is no '='.
pub fn left_of_equals(line: &str) -> &str {
    match line.split_once('=') {
        Some((key, _)) => key,
        None => line,
    }
}

/// True when the line's key matches one of the element prefixes.
pub fn is_element(line: &str, prefixes: &[&str]) -> bool {
    prefixes.contains(&left_of_equals(line))
}

/// Collect a multi-line description block.
///
/// Consumes lines until one containing `end_marker` (which is consumed).
/// Blank lines are skipped; the rest are joined with '\n'.
pub fn read_description(sc: &mut LineScanner, end_marker: &str) -> String {
    let mut description = String::new();
    while let Some(line) = sc.next_line() {
        if line.contains(end_marker) {
            break;
        }
        if !line.is_empty() {
            if !description.is_empty() {
                description.push('\n');
            }
            description.push_str(line);
        }
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_peek_and_advance() {
        let mut sc = LineScanner::new("a\r\nb\nc");
        assert_eq!(sc.peek(), Some("a"));
        assert_eq!(sc.next_line(), Some("a"));
        assert_eq!(sc.peek(), Some("b"));
        assert_eq!(sc.pos(), 1);
        sc.seek(2);
        assert_eq!(sc.next_line(), Some("c"));
        assert_eq!(sc.next_line(), None);
    }

    #[test]
    fn test_scanner_at() {
        let sc = LineScanner::new("a\nb\nc");
        let mut sub = sc.scanner_at(1);
        assert_eq!(sub.next_line(), Some("b"));
        // the original cursor is untouched
        assert_eq!(sc.pos(), 0);
    }

    #[test]
    fn test_key_value_split() {
        assert_eq!(right_of_equals("Geom Title=Existing Conditions "), "Existing Conditions");
        assert_eq!(left_of_equals("Flow Title=Big Flood"), "Flow Title");
        assert_eq!(left_of_equals("English Units"), "English Units");
        assert_eq!(right_of_equals("no equals here"), "");
    }

    #[test]
    fn test_read_description() {
        let mut sc = LineScanner::new("first\n\nsecond\nEND DESCRIPTION:\nafter");
        let desc = read_description(&mut sc, "END DESCRIPTION");
        assert_eq!(desc, "first\nsecond");
        assert_eq!(sc.peek(), Some("after"));
    }

    #[test]
    fn test_read_description_at_eof() {
        let mut sc = LineScanner::new("only line");
        assert_eq!(read_description(&mut sc, "END"), "only line");
    }
}
