//! Minimal iCalendar (RFC 5545) content-line writer.

const MAX_LINE_OCTETS: usize = 75;
const CRLF: &str = "\r\n";

/// Accumulates content lines, folding long ones and terminating each with CRLF.
#[derive(Debug, Default)]
pub struct ContentLines {
    out: String,
}

impl ContentLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `NAME:value` with `value` written verbatim.
    pub fn raw(&mut self, name: &str, value: &str) -> &mut Self {
        self.push_folded(&format!("{name}:{value}"));
        self
    }

    /// Emits `NAME:value` with `value` escaped as TEXT.
    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.raw(name, &escape_text(value))
    }

    pub fn begin(&mut self, component: &str) -> &mut Self {
        self.raw("BEGIN", component)
    }

    pub fn end(&mut self, component: &str) -> &mut Self {
        self.raw("END", component)
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn push_folded(&mut self, line: &str) {
        let mut remaining = line;
        let mut limit = MAX_LINE_OCTETS;
        loop {
            if remaining.len() <= limit {
                self.out.push_str(remaining);
                self.out.push_str(CRLF);
                return;
            }
            let mut cut = limit;
            while !remaining.is_char_boundary(cut) {
                cut -= 1;
            }
            self.out.push_str(&remaining[..cut]);
            self.out.push_str(CRLF);
            self.out.push(' ');
            remaining = &remaining[cut..];
            // Continuation lines spend one octet on the leading space.
            limit = MAX_LINE_OCTETS - 1;
        }
    }
}

/// Escapes a TEXT property value.
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_specials() {
        assert_eq!(escape_text("a;b,c\\d\r\ne"), "a\\;b\\,c\\\\d\\ne");
        assert_eq!(escape_text("Renew Netflix"), "Renew Netflix");
    }

    #[test]
    fn folds_long_lines_on_char_boundaries() {
        let mut lines = ContentLines::new();
        let value = "é".repeat(60);
        lines.raw("SUMMARY", &value);
        let out = lines.finish();

        let physical: Vec<&str> = out.split_terminator("\r\n").collect();
        assert!(physical.len() > 1);
        assert!(physical.iter().all(|line| line.len() <= 75));
        assert!(physical[1..].iter().all(|line| line.starts_with(' ')));

        let unfolded = out.replace("\r\n ", "");
        assert_eq!(unfolded, format!("SUMMARY:{value}\r\n"));
    }

    #[test]
    fn short_lines_are_crlf_terminated() {
        let mut lines = ContentLines::new();
        lines.begin("VCALENDAR").end("VCALENDAR");
        assert_eq!(lines.finish(), "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n");
    }
}
