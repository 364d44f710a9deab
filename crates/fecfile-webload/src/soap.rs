//! SOAP 1.1 envelope codec.
//!
//! Handles document/literal wrapped calls: the body holds one operation
//! element whose unqualified children are the call's parts.

use crate::error::{Error, Result};
use fecfile_mime::encoding::decode_text;
use fecfile_mime::{Codec, ContentType};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::{NsReader, Writer};

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// One named child of an operation element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapPart {
    /// Local name of the element.
    pub name: String,
    /// Text content.
    pub value: String,
}

/// An operation call or reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapCall {
    /// Namespace of the operation element.
    pub namespace: String,
    /// Local name of the operation element (e.g. `upload`, `statusResponse`).
    pub operation: String,
    /// Parts in document order.
    pub parts: Vec<SoapPart>,
}

impl SoapCall {
    /// Creates a call without parts.
    #[must_use]
    pub fn new(namespace: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            operation: operation.into(),
            parts: Vec::new(),
        }
    }

    /// Appends a part.
    #[must_use]
    pub fn with_part(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(SoapPart {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Returns the text of the first part named `name`.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&str> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// A SOAP 1.1 fault.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SoapFault {
    /// `faultcode`, e.g. `soap:Server`.
    pub code: String,
    /// `faultstring`.
    pub message: String,
    /// Text content of `detail`, if any.
    pub detail: Option<String>,
}

/// A decoded envelope body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoapMessage {
    /// Operation request or response.
    Call(SoapCall),
    /// Fault reply.
    Fault(SoapFault),
}

/// Codec for `text/xml` SOAP 1.1 envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoapCodec;

impl SoapCodec {
    /// Creates the codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Whether `content_type` is an XOP root part wrapping a SOAP envelope.
    fn is_xop_root(&self, content_type: &ContentType) -> bool {
        content_type.is("application", "xop+xml")
            && content_type
                .type_parameter()
                .is_some_and(|t| self.supports(t))
    }
}

impl Codec for SoapCodec {
    type Message = SoapMessage;
    type Error = Error;

    fn content_type(&self) -> String {
        ContentType::text_xml().to_string()
    }

    fn supports(&self, content_type: &str) -> bool {
        ContentType::parse(content_type).is_ok_and(|ct| {
            ct.is("text", "xml")
                && ct
                    .charset()
                    .is_none_or(|c| c.eq_ignore_ascii_case("utf-8") || c.eq_ignore_ascii_case("utf8"))
        })
    }

    fn decode(&self, body: &[u8], max_header_bytes: usize, content_type: &str) -> Result<SoapMessage> {
        let ct = ContentType::parse(content_type)?;
        if !self.supports(content_type) && !self.is_xop_root(&ct) {
            return Err(fecfile_mime::Error::UnsupportedContentType(content_type.to_string()).into());
        }

        let text = decode_text(body, ct.charset())?;
        decode_envelope(&text, max_header_bytes)
    }

    fn encode(&self, message: &SoapMessage) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        writer.write_event(Event::Start(
            BytesStart::new("soap:Envelope").with_attributes([("xmlns:soap", SOAP_ENVELOPE_NS)]),
        ))?;
        writer.write_event(Event::Start(BytesStart::new("soap:Body")))?;

        match message {
            SoapMessage::Call(call) => {
                let (start, end) = if call.namespace.is_empty() {
                    (BytesStart::new(call.operation.as_str()), call.operation.clone())
                } else {
                    let qualified = format!("ns:{}", call.operation);
                    (
                        BytesStart::new(qualified.clone())
                            .with_attributes([("xmlns:ns", call.namespace.as_str())]),
                        qualified,
                    )
                };
                writer.write_event(Event::Start(start))?;
                for part in &call.parts {
                    write_text_element(&mut writer, &part.name, &part.value)?;
                }
                writer.write_event(Event::End(BytesEnd::new(end)))?;
            }
            SoapMessage::Fault(fault) => {
                writer.write_event(Event::Start(BytesStart::new("soap:Fault")))?;
                write_text_element(&mut writer, "faultcode", &fault.code)?;
                write_text_element(&mut writer, "faultstring", &fault.message)?;
                if let Some(detail) = &fault.detail {
                    write_text_element(&mut writer, "detail", detail)?;
                }
                writer.write_event(Event::End(BytesEnd::new("soap:Fault")))?;
            }
        }

        writer.write_event(Event::End(BytesEnd::new("soap:Body")))?;
        writer.write_event(Event::End(BytesEnd::new("soap:Envelope")))?;
        Ok(writer.into_inner())
    }
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn is_soap(namespace: &ResolveResult<'_>) -> bool {
    matches!(namespace, ResolveResult::Bound(Namespace(ns)) if *ns == SOAP_ENVELOPE_NS.as_bytes())
}

fn namespace_of(namespace: &ResolveResult<'_>) -> String {
    match namespace {
        ResolveResult::Bound(Namespace(ns)) => String::from_utf8_lossy(ns).into_owned(),
        _ => String::new(),
    }
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

fn position(reader: &NsReader<&[u8]>) -> u64 {
    u64::try_from(reader.buffer_position()).unwrap_or(u64::MAX)
}

fn byte_span(start: u64, end: u64) -> usize {
    usize::try_from(end.saturating_sub(start)).unwrap_or(usize::MAX)
}

fn decode_envelope(text: &str, max_header_bytes: usize) -> Result<SoapMessage> {
    let mut reader = NsReader::from_str(text);

    loop {
        let (namespace, event) = reader.read_resolved_event()?;
        let soap = is_soap(&namespace);
        match event {
            Event::Start(ref e) if soap && e.local_name().as_ref() == b"Envelope" => break,
            Event::Start(_) | Event::Empty(_) => {
                return Err(Error::UnexpectedResponse(
                    "Root element is not a SOAP envelope".to_string(),
                ));
            }
            Event::Eof => return Err(Error::UnexpectedResponse("Empty document".to_string())),
            _ => {}
        }
    }

    loop {
        let start = position(&reader);
        let (namespace, event) = reader.read_resolved_event()?;
        let soap = is_soap(&namespace);
        match event {
            Event::Start(e) if soap && e.local_name().as_ref() == b"Header" => {
                reader.read_to_end(e.name())?;
                check_header_size(byte_span(start, position(&reader)), max_header_bytes)?;
            }
            Event::Empty(e) if soap && e.local_name().as_ref() == b"Header" => {
                check_header_size(byte_span(start, position(&reader)), max_header_bytes)?;
            }
            Event::Start(e) if soap && e.local_name().as_ref() == b"Body" => {
                return read_body(&mut reader);
            }
            Event::Start(e) => {
                reader.read_to_end(e.name())?;
            }
            Event::Empty(e) if soap && e.local_name().as_ref() == b"Body" => {
                return Err(Error::UnexpectedResponse("Empty SOAP body".to_string()));
            }
            Event::End(_) | Event::Eof => {
                return Err(Error::UnexpectedResponse(
                    "SOAP envelope has no body".to_string(),
                ));
            }
            _ => {}
        }
    }
}

fn check_header_size(size: usize, limit: usize) -> Result<()> {
    if size > limit {
        return Err(Error::HeaderTooLarge { size, limit });
    }
    Ok(())
}

fn read_body(reader: &mut NsReader<&[u8]>) -> Result<SoapMessage> {
    loop {
        let (namespace, event) = reader.read_resolved_event()?;
        let soap = is_soap(&namespace);
        let namespace = namespace_of(&namespace);
        match event {
            Event::Start(e) => {
                let operation = local_name(&e);
                let parts = read_parts(reader)?;
                return Ok(if soap && operation == "Fault" {
                    SoapMessage::Fault(fault_from_parts(parts))
                } else {
                    SoapMessage::Call(SoapCall {
                        namespace,
                        operation,
                        parts,
                    })
                });
            }
            Event::Empty(e) => {
                let operation = local_name(&e);
                return Ok(if soap && operation == "Fault" {
                    SoapMessage::Fault(SoapFault::default())
                } else {
                    SoapMessage::Call(SoapCall::new(namespace, operation))
                });
            }
            Event::End(_) | Event::Eof => {
                return Err(Error::UnexpectedResponse("Empty SOAP body".to_string()));
            }
            _ => {}
        }
    }
}

/// Reads the children of the current element up to its end tag.
fn read_parts(reader: &mut NsReader<&[u8]>) -> Result<Vec<SoapPart>> {
    let mut parts = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(&e);
                let value = read_text(reader)?;
                parts.push(SoapPart { name, value });
            }
            Event::Empty(e) => parts.push(SoapPart {
                name: local_name(&e),
                value: String::new(),
            }),
            Event::End(_) => return Ok(parts),
            Event::Eof => {
                return Err(Error::UnexpectedResponse(
                    "Truncated operation element".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// Concatenates all text below the current element up to its end tag.
fn read_text(reader: &mut NsReader<&[u8]>) -> Result<String> {
    let mut text = String::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => return Ok(text),
            Event::End(_) => depth -= 1,
            Event::Eof => {
                return Err(Error::UnexpectedResponse("Truncated element".to_string()));
            }
            _ => {}
        }
    }
}

fn fault_from_parts(parts: Vec<SoapPart>) -> SoapFault {
    let mut fault = SoapFault::default();
    for part in parts {
        match part.name.as_str() {
            "faultcode" => fault.code = part.value,
            "faultstring" => fault.message = part.value,
            "detail" if !part.value.trim().is_empty() => fault.detail = Some(part.value),
            _ => {}
        }
    }
    fault
}
