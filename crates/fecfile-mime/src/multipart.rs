//! `multipart/related` body parsing.
//!
//! Splits a buffered body into [`MimePart`]s using the boundary declared in
//! the transport content type (RFC 2046 delimiter rules). Parts are never
//! parsed recursively.

use crate::content_type::ContentType;
use crate::error::{Error, Result};
use crate::header::Headers;
use std::fmt;

/// Longest boundary allowed by RFC 2046.
const MAX_BOUNDARY_LEN: usize = 70;

/// Transfer encodings under which a part's bytes are used as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit text.
    EightBit,
    /// Arbitrary octets.
    Binary,
}

impl TransferEncoding {
    /// Parses a `Content-Transfer-Encoding` value, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedTransferEncoding`] for anything other than
    /// `7bit`, `8bit` or `binary`.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7bit" => Ok(Self::SevenBit),
            "8bit" => Ok(Self::EightBit),
            "binary" => Ok(Self::Binary),
            other => Err(Error::UnsupportedTransferEncoding(other.to_string())),
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// Strips whitespace and one pair of surrounding angle brackets.
#[must_use]
pub fn normalize_content_id(id: &str) -> &str {
    let id = id.trim();
    id.strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(id)
}

/// One part of a multipart body.
#[derive(Debug, Clone)]
pub struct MimePart {
    headers: Headers,
    body: Vec<u8>,
}

impl MimePart {
    /// Creates a new part.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self { headers, body }
    }

    /// Part headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Raw `Content-ID` header value, angle brackets included.
    #[must_use]
    pub fn content_id(&self) -> Option<&str> {
        self.headers.get("content-id")
    }

    /// Declared content type, if present and parseable.
    #[must_use]
    pub fn content_type(&self) -> Option<ContentType> {
        self.headers
            .get("content-type")
            .and_then(|v| ContentType::parse(v.trim().trim_end_matches(';')).ok())
    }

    /// Raw `Content-Transfer-Encoding` header value.
    #[must_use]
    pub fn transfer_encoding(&self) -> Option<&str> {
        self.headers.get("content-transfer-encoding")
    }

    /// Body bytes exactly as they appeared between the delimiters.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body bytes, after checking the transfer encoding leaves them untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedTransferEncoding`] when the header is
    /// missing or names an encoding other than 7bit, 8bit or binary.
    pub fn raw_content(&self) -> Result<&[u8]> {
        let encoding = self
            .transfer_encoding()
            .ok_or_else(|| Error::UnsupportedTransferEncoding("(none)".to_string()))?;
        TransferEncoding::parse(encoding)?;
        Ok(&self.body)
    }

    /// Checks whether this part is the target of `cid:<token>`.
    #[must_use]
    pub fn matches_reference(&self, token: &str) -> bool {
        self.content_id()
            .is_some_and(|id| normalize_content_id(id) == token)
    }
}

/// A parsed `multipart/*` body.
#[derive(Debug, Clone)]
pub struct Multipart {
    content_type: ContentType,
    parts: Vec<MimePart>,
}

impl Multipart {
    /// Parses `body` framed as declared by `content_type`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MultipartParse`] if the content type is not multipart,
    /// has no usable boundary, or the delimiters are malformed.
    pub fn parse(body: &[u8], content_type: &str) -> Result<Self> {
        let content_type = ContentType::parse(content_type)
            .map_err(|e| Error::MultipartParse(e.to_string()))?;
        if !content_type.is_multipart() {
            return Err(Error::MultipartParse(format!(
                "{} is not a multipart type",
                content_type.essence()
            )));
        }

        let boundary = content_type
            .boundary()
            .filter(|b| !b.is_empty() && b.len() <= MAX_BOUNDARY_LEN)
            .ok_or_else(|| Error::MultipartParse("Missing or invalid boundary".to_string()))?;

        let parts = split_parts(body, boundary.as_bytes())?;
        Ok(Self {
            content_type,
            parts,
        })
    }

    /// The transport content type the body was parsed with.
    #[must_use]
    pub const fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// Parts in body order.
    #[must_use]
    pub fn parts(&self) -> &[MimePart] {
        &self.parts
    }

    /// Index of the root part.
    ///
    /// The part whose content id equals the `start` parameter, else the first.
    #[must_use]
    pub fn main_part_index(&self) -> usize {
        self.content_type
            .start()
            .map(normalize_content_id)
            .and_then(|start| {
                self.parts.iter().position(|part| {
                    part.content_id()
                        .is_some_and(|id| normalize_content_id(id) == start)
                })
            })
            .unwrap_or(0)
    }

    /// The root part holding the primary document.
    #[must_use]
    pub fn main_part(&self) -> &MimePart {
        &self.parts[self.main_part_index()]
    }
}

/// Position of the next delimiter line and whether it closes the body.
struct Delimiter {
    /// Offset of the leading `--`.
    start: usize,
    /// Offset just past the delimiter line.
    end: usize,
    closing: bool,
}

fn split_parts(body: &[u8], boundary: &[u8]) -> Result<Vec<MimePart>> {
    let mut dash_boundary = Vec::with_capacity(boundary.len() + 2);
    dash_boundary.extend_from_slice(b"--");
    dash_boundary.extend_from_slice(boundary);

    let mut delimiter = find_delimiter(body, &dash_boundary, 0)
        .ok_or_else(|| Error::MultipartParse("Opening boundary not found".to_string()))?;

    let mut parts = Vec::new();
    while !delimiter.closing {
        let content_start = delimiter.end;
        let next = find_delimiter(body, &dash_boundary, content_start)
            .ok_or_else(|| Error::MultipartParse("Closing boundary not found".to_string()))?;

        // The line break before a delimiter belongs to the delimiter.
        let content = strip_trailing_newline(&body[content_start..next.start]);
        parts.push(parse_part(content, parts.len())?);
        delimiter = next;
    }

    if parts.is_empty() {
        return Err(Error::MultipartParse("Body contains no parts".to_string()));
    }

    Ok(parts)
}

fn find_delimiter(body: &[u8], dash_boundary: &[u8], from: usize) -> Option<Delimiter> {
    let mut search = from;
    while let Some(offset) = find(&body[search..], dash_boundary) {
        let start = search + offset;
        let at_line_start = start == 0 || body[start - 1] == b'\n';
        let after = start + dash_boundary.len();

        if at_line_start {
            let rest = &body[after..];
            if rest.starts_with(b"--") {
                let end = line_end(body, after + 2).unwrap_or(body.len());
                return Some(Delimiter {
                    start,
                    end,
                    closing: true,
                });
            }
            // Only transport padding may follow the boundary on its line.
            if let Some(end) = line_end(body, after)
                && body[after..end]
                    .iter()
                    .all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
            {
                return Some(Delimiter {
                    start,
                    end,
                    closing: false,
                });
            }
        }
        search = start + 1;
    }
    None
}

/// Offset just past the next `\n` at or after `from`.
fn line_end(body: &[u8], from: usize) -> Option<usize> {
    body.get(from..)?
        .iter()
        .position(|&b| b == b'\n')
        .map(|pos| from + pos + 1)
}

fn strip_trailing_newline(content: &[u8]) -> &[u8] {
    content
        .strip_suffix(b"\r\n")
        .or_else(|| content.strip_suffix(b"\n"))
        .unwrap_or(content)
}

fn parse_part(content: &[u8], index: usize) -> Result<MimePart> {
    // A part may begin directly with the blank line when it has no headers.
    if let Some(body) = content
        .strip_prefix(b"\r\n")
        .or_else(|| content.strip_prefix(b"\n"))
    {
        return Ok(MimePart::new(Headers::new(), body.to_vec()));
    }

    let (header_end, body_start) = [
        find(content, b"\r\n\r\n").map(|p| (p, p + 4)),
        find(content, b"\n\n").map(|p| (p, p + 2)),
    ]
    .into_iter()
    .flatten()
    .min_by_key(|(p, _)| *p)
    .ok_or_else(|| Error::MultipartParse(format!("Part {index} has no header terminator")))?;

    let header_text = String::from_utf8_lossy(&content[..header_end]);
    let headers = Headers::parse(&header_text);
    Ok(MimePart::new(headers, content[body_start..].to_vec()))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::format_collect)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const XOP_TYPE: &str = "multipart/related; type=\"application/xop+xml\"; boundary=\"uuid:b1\"";

    fn body(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut out = String::from("preamble\r\n");
        for (id, content) in parts {
            out.push_str("--uuid:b1\r\n");
            out.push_str("Content-Type: application/octet-stream\r\n");
            out.push_str("Content-Transfer-Encoding: binary\r\n");
            out.push_str(&format!("Content-ID: <{id}>\r\n\r\n"));
            out.push_str(content);
            out.push_str("\r\n");
        }
        out.push_str("--uuid:b1--\r\nepilogue");
        out.into_bytes()
    }

    #[test]
    fn test_parse_two_parts() {
        let msg = Multipart::parse(&body(&[("a", "first"), ("b", "second\r\nline")]), XOP_TYPE)
            .unwrap();
        assert_eq!(msg.parts().len(), 2);
        assert_eq!(msg.parts()[0].body(), b"first");
        assert_eq!(msg.parts()[1].body(), b"second\r\nline");
        assert_eq!(msg.parts()[1].content_id(), Some("<b>"));
        assert_eq!(msg.parts()[1].transfer_encoding(), Some("binary"));
    }

    #[test]
    fn test_binary_body_with_boundary_lookalike() {
        let mut raw = b"--uuid:b1\r\nContent-ID: <x>\r\n\r\n".to_vec();
        raw.extend_from_slice(&[0, 159, 146, 150]);
        raw.extend_from_slice(b"--uuid:b1 is not at line start\r\n--uuid:b1x\r\n");
        raw.extend_from_slice(b"\r\n--uuid:b1--");
        let msg = Multipart::parse(&raw, XOP_TYPE).unwrap();
        assert_eq!(msg.parts().len(), 1);
        assert!(msg.parts()[0].body().starts_with(&[0, 159, 146, 150]));
        assert!(msg.parts()[0].body().ends_with(b"--uuid:b1x\r\n"));
    }

    #[test]
    fn test_lf_only_framing() {
        let raw = b"--uuid:b1\nContent-ID: <a>\n\nhello\n--uuid:b1--\n";
        let msg = Multipart::parse(raw, XOP_TYPE).unwrap();
        assert_eq!(msg.parts()[0].body(), b"hello");
    }

    #[test]
    fn test_part_without_headers() {
        let raw = b"--uuid:b1\r\n\r\nbare\r\n--uuid:b1--";
        let msg = Multipart::parse(raw, XOP_TYPE).unwrap();
        assert!(msg.parts()[0].headers().is_empty());
        assert_eq!(msg.parts()[0].body(), b"bare");
    }

    #[test]
    fn test_rejects_non_multipart() {
        let err = Multipart::parse(b"<a/>", "text/xml").unwrap_err();
        assert!(matches!(err, Error::MultipartParse(_)));
    }

    #[test]
    fn test_rejects_missing_boundary() {
        let err = Multipart::parse(b"--x\r\n\r\n--x--", "multipart/related").unwrap_err();
        assert!(matches!(err, Error::MultipartParse(_)));
    }

    #[test]
    fn test_rejects_unterminated_body() {
        let raw = b"--uuid:b1\r\nContent-ID: <a>\r\n\r\nnever closed";
        assert!(matches!(
            Multipart::parse(raw, XOP_TYPE),
            Err(Error::MultipartParse(_))
        ));
    }

    #[test]
    fn test_rejects_missing_header_terminator() {
        let raw = b"--uuid:b1\r\nContent-ID: <a>\r\n--uuid:b1--";
        assert!(matches!(
            Multipart::parse(raw, XOP_TYPE),
            Err(Error::MultipartParse(_))
        ));
    }

    #[test]
    fn test_rejects_empty_body() {
        assert!(matches!(
            Multipart::parse(b"--uuid:b1--\r\n", XOP_TYPE),
            Err(Error::MultipartParse(_))
        ));
    }

    #[test]
    fn test_transfer_encoding_gate() {
        for ok in ["7bit", "8BIT", "Binary", " binary "] {
            assert!(TransferEncoding::parse(ok).is_ok(), "{ok}");
        }
        for bad in ["base64", "quoted-printable", "x-8bit", ""] {
            assert!(matches!(
                TransferEncoding::parse(bad),
                Err(Error::UnsupportedTransferEncoding(_))
            ));
        }
    }

    #[test]
    fn test_raw_content_requires_encoding_header() {
        let part = MimePart::new(Headers::new(), b"x".to_vec());
        assert!(matches!(
            part.raw_content(),
            Err(Error::UnsupportedTransferEncoding(_))
        ));
    }

    #[test]
    fn test_normalize_content_id() {
        assert_eq!(normalize_content_id("<a@b>"), "a@b");
        assert_eq!(normalize_content_id(" a@b "), "a@b");
        assert_eq!(normalize_content_id("<a@b"), "<a@b");
    }

    proptest! {
        #[test]
        fn prop_main_part_follows_start(count in 1usize..6, start in proptest::option::of(0usize..8)) {
            let ids: Vec<String> = (0..count).map(|i| format!("part{i}@example")).collect();
            let contents: Vec<(&str, &str)> = ids.iter().map(|id| (id.as_str(), "data")).collect();
            let content_type = match start {
                Some(s) => format!("{XOP_TYPE}; start=\"<part{s}@example>\""),
                None => XOP_TYPE.to_string(),
            };

            let msg = Multipart::parse(&body(&contents), &content_type).unwrap();
            let expected = start.filter(|s| *s < count).unwrap_or(0);
            prop_assert_eq!(msg.main_part_index(), expected);
            let want = format!("<{}>", ids[expected]);
            prop_assert_eq!(msg.main_part().content_id(), Some(want.as_str()));
        }

        #[test]
        fn prop_transfer_encoding_gate(value in "[a-zA-Z0-9-]{0,12}") {
            let accepted = ["7bit", "8bit", "binary"].contains(&value.to_ascii_lowercase().as_str());
            prop_assert_eq!(TransferEncoding::parse(&value).is_ok(), accepted);
        }
    }
}
