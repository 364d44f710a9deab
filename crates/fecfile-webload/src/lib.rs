//! # fecfile-webload
//!
//! Client for the FEC webload SOAP service.
//!
//! ## Features
//!
//! - **Operations**: `upload` a report and query its `status`
//! - **MTOM responses**: XOP packaged replies are unwrapped transparently
//! - **Faults**: SOAP faults surface as [`Error::Fault`]
//! - **Testable seam**: [`WebloadService`] can be mocked by callers
//!
//! ## Quick Start
//!
//! ```ignore
//! use fecfile_webload::{ClientConfig, WebloadClient, WebloadService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WebloadClient::new(ClientConfig::fec()?)?;
//!     let json = client.status("FEC-1234567").await?;
//!     println!("{json}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod error;
pub mod soap;

pub use client::{WebloadClient, WebloadService};
pub use config::{
    ClientConfig, DEFAULT_ENDPOINT, DEFAULT_MAX_HEADER_BYTES, DEFAULT_REQUEST_TIMEOUT,
    SERVICE_NAMESPACE,
};
pub use error::{Error, Result};
pub use soap::{SoapCall, SoapCodec, SoapFault, SoapMessage};
