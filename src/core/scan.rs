//! Purpose: JSON scanner primitives for untrusted, length-delimited byte buffers.
//! Exports: `Cursor`, `find_key`, `find_object_end`.
//! Role: Lowest layer of the response reader; no schema knowledge lives here.
//! Invariants: All access is bounds-checked; truncated input yields `None`, never a panic.
//! Invariants: Scan failures are local; callers treat them as "field absent".
//! Notes: `\uXXXX` escapes decode to a `?` placeholder, a documented simplification.

use bstr::ByteSlice;

/// Position-tracking reader over a byte span.
///
/// Decoding methods skip leading whitespace themselves and return `None` on
/// any mismatch, leaving the caller free to continue with other fields.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Starts scanning at `pos`, clamped to the end of the span.
    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self {
            buf,
            pos: pos.min(buf.len()),
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c == b' ' || c == b'\t' || c == b'\r' || c == b'\n' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Recognizes a literal `true`/`false` token.
    pub fn parse_bool(&mut self) -> Option<bool> {
        self.skip_ws();
        if self.rest().starts_with(b"true") {
            self.pos += 4;
            return Some(true);
        }
        if self.rest().starts_with(b"false") {
            self.pos += 5;
            return Some(false);
        }
        None
    }

    /// Decodes one or more ASCII digits, failing on overflow past `u32::MAX`.
    pub fn parse_u32(&mut self) -> Option<u32> {
        self.skip_ws();
        let mut value: u64 = 0;
        let mut any = false;
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            any = true;
            value = value * 10 + u64::from(c - b'0');
            if value > u64::from(u32::MAX) {
                return None;
            }
            self.pos += 1;
        }
        if !any {
            return None;
        }
        Some(value as u32)
    }

    /// Decodes a quoted string, keeping at most `max_len` bytes of content.
    ///
    /// Excess content is dropped, not an error. Unterminated strings and
    /// unknown escapes fail. Non-UTF-8 content degrades via lossy conversion.
    pub fn parse_string(&mut self, max_len: usize) -> Option<String> {
        self.skip_ws();
        if self.peek() != Some(b'"') {
            return None;
        }
        self.pos += 1;
        let mut out: Vec<u8> = Vec::new();
        loop {
            let c = self.peek()?;
            self.pos += 1;
            match c {
                b'"' => return Some(String::from_utf8_lossy(&out).into_owned()),
                b'\\' => {
                    let esc = self.peek()?;
                    self.pos += 1;
                    let decoded = match esc {
                        b'"' => b'"',
                        b'\\' => b'\\',
                        b'/' => b'/',
                        b'b' => 0x08,
                        b'f' => 0x0c,
                        b'n' => b'\n',
                        b'r' => b'\r',
                        b't' => b'\t',
                        b'u' => {
                            for _ in 0..4 {
                                let hex = self.peek()?;
                                if !hex.is_ascii_hexdigit() {
                                    return None;
                                }
                                self.pos += 1;
                            }
                            b'?'
                        }
                        _ => return None,
                    };
                    if out.len() < max_len {
                        out.push(decoded);
                    }
                }
                other => {
                    if out.len() < max_len {
                        out.push(other);
                    }
                }
            }
        }
    }

    /// Like `parse_string`, but a literal `null` is a successful empty result.
    pub fn parse_optional_string(&mut self, max_len: usize) -> Option<String> {
        self.skip_ws();
        if self.rest().starts_with(b"null") {
            self.pos += 4;
            return Some(String::new());
        }
        self.parse_string(max_len)
    }
}

/// Locates the first textual `"key":` occurrence in `span` and returns the
/// offset just past the colon.
///
/// This is a literal substring search, not a structural one: the same key
/// inside an earlier nested object wins. Acceptable for the narrow response
/// schema this client consumes.
pub fn find_key(span: &[u8], key: &str) -> Option<usize> {
    let mut pattern = Vec::with_capacity(key.len() + 3);
    pattern.push(b'"');
    pattern.extend_from_slice(key.as_bytes());
    pattern.extend_from_slice(b"\":");
    span.find(&pattern).map(|hit| hit + pattern.len())
}

/// Returns the offset of the brace matching the opening brace at `start`.
///
/// The depth counter is suspended inside string literals (escape-aware), so
/// braces embedded in string values never perturb it. `None` when `start`
/// is not an opening brace or the input ends before depth returns to zero.
pub fn find_object_end(span: &[u8], start: usize) -> Option<usize> {
    if span.get(start) != Some(&b'{') {
        return None;
    }
    let mut depth = 0usize;
    let mut in_str = false;
    let mut esc = false;
    for (i, &c) in span.iter().enumerate().skip(start) {
        if in_str {
            if esc {
                esc = false;
            } else if c == b'\\' {
                esc = true;
            } else if c == b'"' {
                in_str = false;
            }
            continue;
        }
        match c {
            b'"' => in_str = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
