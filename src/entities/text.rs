//! Text entities

use super::EntityCommon;
use crate::types::Vector3;

/// Single-line text (`TEXT`), also used for block attributes (`ATTRIB`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    pub common: EntityCommon,
    /// First alignment point (OCS)
    pub insertion: Vector3,
    /// Second alignment point, used when the text is justified
    pub alignment_point: Option<Vector3>,
    pub value: String,
    pub height: f64,
    /// Degrees
    pub rotation: f64,
    pub horizontal_alignment: i16,
    pub vertical_alignment: i16,
    /// Attribute tag, only set for `ATTRIB`
    pub tag: Option<String>,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the text is anchored to
    pub fn anchor(&self) -> Vector3 {
        let justified = self.horizontal_alignment != 0 || self.vertical_alignment != 0;
        match self.alignment_point {
            Some(point) if justified => point,
            _ => self.insertion,
        }
    }
}

/// Multi-line text (`MTEXT`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MText {
    pub common: EntityCommon,
    /// Insertion point (WCS)
    pub insertion: Vector3,
    /// Raw value including inline formatting codes
    pub value: String,
    pub height: f64,
    pub attachment_point: i16,
}

impl MText {
    pub fn new() -> Self {
        Self::default()
    }

    /// The text with inline formatting codes removed
    pub fn plain_text(&self) -> String {
        strip_mtext_formatting(&self.value)
    }
}

/// Remove MTEXT inline formatting (`\P`, `{\fArial;...}`, stacking, ...)
pub fn strip_mtext_formatting(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' | '}' => {}
            '\\' => match chars.next() {
                Some('P') | Some('X') => out.push('\n'),
                Some('~') => out.push(' '),
                Some(c @ ('\\' | '{' | '}')) => out.push(c),
                // Stacked fraction: \S1^2; or \S1/2;
                Some('S') => {
                    for c in chars.by_ref() {
                        match c {
                            ';' => break,
                            '^' | '#' => out.push('/'),
                            c => out.push(c),
                        }
                    }
                }
                // Codes that take an argument terminated by ';'
                Some('A' | 'C' | 'c' | 'F' | 'f' | 'H' | 'Q' | 'T' | 'W' | 'p') => {
                    for c in chars.by_ref() {
                        if c == ';' {
                            break;
                        }
                    }
                }
                // Toggles: underline, overline, strike-through
                Some('L' | 'l' | 'O' | 'o' | 'K' | 'k') => {}
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '%' if chars.peek() == Some(&'%') => {
                chars.next();
                match chars.next() {
                    Some('d') | Some('D') => out.push('\u{b0}'),
                    Some('p') | Some('P') => out.push('\u{b1}'),
                    Some('c') | Some('C') => out.push('\u{2300}'),
                    Some(other) => {
                        out.push_str("%%");
                        out.push(other);
                    }
                    None => out.push_str("%%"),
                }
            }
            c => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_paragraphs_and_fonts() {
        assert_eq!(
            strip_mtext_formatting(r"{\fArial|b1|i0|c0|p34;Room}\PNumber 12"),
            "Room\nNumber 12"
        );
    }

    #[test]
    fn test_strip_stacking_and_toggles() {
        assert_eq!(strip_mtext_formatting(r"\LPipe\l \S1^2;"), "Pipe 1/2");
        assert_eq!(strip_mtext_formatting(r"\H2.5x;Big"), "Big");
    }

    #[test]
    fn test_special_symbols() {
        assert_eq!(strip_mtext_formatting("45%%d"), "45\u{b0}");
        assert_eq!(strip_mtext_formatting("100%"), "100%");
    }

    #[test]
    fn test_text_anchor() {
        let mut text = Text::new();
        text.insertion = Vector3::new(1.0, 1.0, 0.0);
        text.alignment_point = Some(Vector3::new(5.0, 5.0, 0.0));
        assert_eq!(text.anchor(), Vector3::new(1.0, 1.0, 0.0));
        text.horizontal_alignment = 1;
        assert_eq!(text.anchor(), Vector3::new(5.0, 5.0, 0.0));
    }
}
