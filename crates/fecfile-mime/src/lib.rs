//! # fecfile-mime
//!
//! Decoding of XOP/MTOM packaged SOAP responses.
//!
//! ## Features
//!
//! - **Multipart parsing**: split `multipart/related` bodies into parts
//! - **XOP resolution**: inline `xop:Include` references as base64 text
//! - **Codec layering**: [`XopCodec`] unwraps packages around any inner [`Codec`]
//! - **Content types**: parameter-aware content type parsing
//!
//! ## Quick Start
//!
//! ```ignore
//! use fecfile_mime::{Codec, XopCodec};
//!
//! let codec = XopCodec::new(SoapCodec::default());
//! if codec.supports(content_type) {
//!     let message = codec.decode(&body, 1024, content_type)?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod codec;
mod content_type;
mod error;
mod header;
mod multipart;

pub mod encoding;
pub mod xop;

pub use codec::{Codec, XopCodec};
pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use multipart::{MimePart, Multipart, TransferEncoding, normalize_content_id};
