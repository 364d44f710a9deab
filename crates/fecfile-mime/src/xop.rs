//! XOP include resolution.
//!
//! Replaces every `xop:Include` element of the root document with the
//! base64 text of the part it references. The document is rewritten event by
//! event so everything outside the include elements is written back byte for
//! byte.

use crate::encoding::encode_base64;
use crate::error::{Error, Result};
use crate::multipart::MimePart;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::{NsReader, Writer};

/// Namespace of the XOP `Include` element.
pub const XOP_NAMESPACE: &str = "http://www.w3.org/2004/08/xop/include";

/// Scheme prefix of an include reference.
const CID_SCHEME: &str = "cid:";

/// Inlines every XOP reference in `document`.
///
/// # Errors
///
/// Returns [`Error::UnresolvedReference`] when a reference matches zero or
/// several parts, [`Error::UnsupportedTransferEncoding`] when the referenced
/// part is not raw, and [`Error::Xml`] for malformed documents.
pub fn resolve_references(document: &str, parts: &[MimePart]) -> Result<String> {
    let mut reader = NsReader::from_str(document);
    let mut writer = Writer::new(Vec::with_capacity(document.len()));
    // Depth inside a non-empty include element whose content is dropped.
    let mut skip_depth = 0usize;

    loop {
        let (namespace, event) = reader.read_resolved_event()?;
        let in_xop = matches!(namespace, ResolveResult::Bound(Namespace(ns)) if ns == XOP_NAMESPACE.as_bytes());

        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        let reference = match &event {
            Event::Empty(e) | Event::Start(e) if in_xop && is_include(e) => href(e)?,
            _ => None,
        };

        if let Some(reference) = reference {
            write_inline(&mut writer, &reference, parts)?;
            if matches!(event, Event::Start(_)) {
                skip_depth = 1;
            }
            continue;
        }

        match event {
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| Error::InvalidEncoding(format!("Rewritten document is not UTF-8: {e}")))
}

fn is_include(element: &BytesStart<'_>) -> bool {
    element.local_name().as_ref() == b"Include"
}

fn href(element: &BytesStart<'_>) -> Result<Option<String>> {
    element
        .try_get_attribute("href")?
        .map(|attr| attr.unescape_value().map(|v| v.into_owned()))
        .transpose()
        .map_err(Into::into)
}

fn write_inline(writer: &mut Writer<Vec<u8>>, reference: &str, parts: &[MimePart]) -> Result<()> {
    let part = find_referenced_part(reference, parts)?;
    let encoded = encode_base64(part.raw_content()?);
    writer.write_event(Event::Text(BytesText::from_escaped(encoded)))?;
    Ok(())
}

/// Finds the single part a `cid:` reference points to.
///
/// # Errors
///
/// Returns [`Error::UnresolvedReference`] unless exactly one part matches.
pub fn find_referenced_part<'a>(reference: &str, parts: &'a [MimePart]) -> Result<&'a MimePart> {
    let token = reference
        .trim()
        .get(..CID_SCHEME.len())
        .filter(|scheme| scheme.eq_ignore_ascii_case(CID_SCHEME))
        .map(|_| &reference.trim()[CID_SCHEME.len()..]);

    let matching: Vec<&MimePart> = token
        .map(|token| parts.iter().filter(|p| p.matches_reference(token)).collect())
        .unwrap_or_default();

    match matching.as_slice() {
        [part] => Ok(part),
        _ => Err(Error::UnresolvedReference {
            reference: reference.to_string(),
            matches: matching.len(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::header::Headers;

    fn part(id: &str, encoding: &str, body: &[u8]) -> MimePart {
        let mut headers = Headers::new();
        headers.add("Content-ID", id);
        headers.add("Content-Transfer-Encoding", encoding);
        MimePart::new(headers, body.to_vec())
    }

    #[test]
    fn test_inline_empty_include() {
        let doc = r#"<?xml version="1.0"?><r xmlns:xop="http://www.w3.org/2004/08/xop/include"><data><xop:Include href="cid:a@b"/></data></r>"#;
        let parts = [part("<a@b>", "binary", b"Hello, World!")];
        let out = resolve_references(doc, &parts).unwrap();
        assert_eq!(
            out,
            r#"<?xml version="1.0"?><r xmlns:xop="http://www.w3.org/2004/08/xop/include"><data>SGVsbG8sIFdvcmxkIQ==</data></r>"#
        );
    }

    #[test]
    fn test_inline_include_with_content_and_default_namespace() {
        let doc = r#"<r><d><Include xmlns="http://www.w3.org/2004/08/xop/include" href="cid:x"><junk/></Include></d></r>"#;
        let parts = [part("<x>", "8bit", b"\x00\x01")];
        let out = resolve_references(doc, &parts).unwrap();
        assert_eq!(out, "<r><d>AAE=</d></r>");
    }

    #[test]
    fn test_other_namespaces_untouched() {
        let doc = "<r xmlns:o=\"urn:other\">\n  <o:Include href=\"cid:a\"/> &amp; <!-- c --></r>";
        let out = resolve_references(doc, &[]).unwrap();
        assert_eq!(out, doc);
    }

    #[test]
    fn test_unresolved_reference() {
        let doc = r#"<r xmlns:xop="http://www.w3.org/2004/08/xop/include"><xop:Include href="cid:missing"/></r>"#;
        let err = resolve_references(doc, &[part("<a>", "binary", b"x")]).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { matches: 0, .. }));
    }

    #[test]
    fn test_ambiguous_reference() {
        let doc = r#"<r xmlns:xop="http://www.w3.org/2004/08/xop/include"><xop:Include href="cid:a"/></r>"#;
        let parts = [part("<a>", "binary", b"1"), part("a", "binary", b"2")];
        let err = resolve_references(doc, &parts).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { matches: 2, .. }));
    }

    #[test]
    fn test_unsupported_transfer_encoding() {
        let doc = r#"<r xmlns:xop="http://www.w3.org/2004/08/xop/include"><xop:Include href="cid:a"/></r>"#;
        let err = resolve_references(doc, &[part("<a>", "base64", b"eA==")]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedTransferEncoding(ref e) if e == "base64"));
    }

    #[test]
    fn test_reference_without_cid_scheme() {
        let err = find_referenced_part("http://a", &[part("<http://a>", "binary", b"")]).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { matches: 0, .. }));
        assert!(find_referenced_part("CID:a", &[part("<a>", "binary", b"")]).is_ok());
    }
}
