//! Error types for MIME and XOP decoding.

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid content type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// The body could not be split into parts.
    #[error("Invalid multipart structure: {0}")]
    MultipartParse(String),

    /// The main part does not declare a usable content type.
    #[error("Main part has no content type")]
    MissingContentType,

    /// Content type not handled by this codec chain.
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// An `xop:Include` reference did not resolve to exactly one part.
    #[error("Reference {reference} matched {matches} parts, expected exactly one")]
    UnresolvedReference {
        /// The `href` value of the include element.
        reference: String,
        /// Number of parts carrying a matching content id.
        matches: usize,
    },

    /// Content-Transfer-Encoding other than 7bit, 8bit or binary.
    #[error("Unsupported transfer encoding: {0}")]
    UnsupportedTransferEncoding(String),

    /// Unknown or undecodable character set.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// XML error while rewriting the main document.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Failure writing the rewritten document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed XML attribute.
    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),
}
