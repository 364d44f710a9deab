//! Layered message codecs.
//!
//! A [`Codec`] turns transport bytes into a logical message and back.
//! [`XopCodec`] wraps a format-aware codec and unwraps XOP packages
//! (`multipart/related; type="application/xop+xml"`) before handing the
//! resolved root document to it. Outbound messages are never packaged.

use crate::content_type::ContentType;
use crate::encoding::{decode_text, encode_text};
use crate::error::Error;
use crate::multipart::Multipart;
use crate::xop::resolve_references;

/// A wire codec for one logical message type.
pub trait Codec {
    /// Logical message produced by decoding.
    type Message;

    /// Error type; must absorb MIME decoding failures.
    type Error: From<Error>;

    /// Content type of encoded messages.
    fn content_type(&self) -> String;

    /// Returns true if bodies of `content_type` can be decoded.
    fn supports(&self, content_type: &str) -> bool;

    /// Decodes a fully buffered body.
    ///
    /// `max_header_bytes` bounds the size of the message headers the
    /// structural codec will accept.
    ///
    /// # Errors
    ///
    /// Returns an error if the content type is unsupported or the body is malformed.
    fn decode(
        &self,
        body: &[u8],
        max_header_bytes: usize,
        content_type: &str,
    ) -> Result<Self::Message, Self::Error>;

    /// Encodes a message for sending.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be serialized.
    fn encode(&self, message: &Self::Message) -> Result<Vec<u8>, Self::Error>;
}

/// Decodes XOP packages around an inner codec.
#[derive(Debug, Clone, Default)]
pub struct XopCodec<C> {
    inner: C,
}

impl<C: Codec> XopCodec<C> {
    /// Wraps `inner`.
    #[must_use]
    pub const fn new(inner: C) -> Self {
        Self { inner }
    }

    /// The wrapped codec.
    #[must_use]
    pub const fn inner(&self) -> &C {
        &self.inner
    }

    fn decode_package(
        &self,
        body: &[u8],
        max_header_bytes: usize,
        content_type: &str,
    ) -> Result<C::Message, C::Error> {
        let package = Multipart::parse(body, content_type)?;
        let main = package.main_part();
        let main_type = main.content_type().ok_or(Error::MissingContentType)?;

        // The root part wraps a document the inner codec must understand.
        if !main_type
            .type_parameter()
            .is_some_and(|t| self.inner.supports(t))
        {
            return Err(Error::UnsupportedContentType(main_type.to_string()).into());
        }

        let charset = main_type.charset();
        let document = decode_text(main.raw_content()?, charset)?;
        let resolved = resolve_references(&document, package.parts())?;
        let bytes = encode_text(&resolved, charset)?;

        self.inner
            .decode(&bytes, max_header_bytes, &main_type.to_string())
    }
}

impl<C: Codec> Codec for XopCodec<C> {
    type Message = C::Message;
    type Error = C::Error;

    fn content_type(&self) -> String {
        self.inner.content_type()
    }

    fn supports(&self, content_type: &str) -> bool {
        self.inner.supports(content_type)
            || ContentType::parse(content_type).is_ok_and(|ct| ct.is_xop_package())
    }

    fn decode(
        &self,
        body: &[u8],
        max_header_bytes: usize,
        content_type: &str,
    ) -> Result<Self::Message, Self::Error> {
        if self.inner.supports(content_type) {
            return self.inner.decode(body, max_header_bytes, content_type);
        }

        if !self.supports(content_type) {
            return Err(Error::UnsupportedContentType(content_type.to_string()).into());
        }

        self.decode_package(body, max_header_bytes, content_type)
    }

    fn encode(&self, message: &Self::Message) -> Result<Vec<u8>, Self::Error> {
        self.inner.encode(message)
    }
}
