//! # fiscal-protocol
//!
//! TFHKA fiscal printer protocol library - wire formats only, no I/O.
//!
//! ## Scope
//!
//! This crate handles WHAT goes over the wire to the fiscal unit:
//! - Positional command encoding (invoice -> fixed-width command lines)
//! - Latin-1 text encoding for the command file and executable output
//! - Lenient parsing of the vendor executable's response formats
//! - Status/error code tables from the TFHKA manual
//!
//! Process invocation, retries and file handling (HOW the commands
//! reach the fiscal unit) stay in application code (`fiscal-server`).
//!
//! ## Example
//!
//! ```ignore
//! use fiscal_protocol::{Invoice, encode_invoice, EncoderConfig};
//!
//! let commands = encode_invoice(&invoice, &EncoderConfig::default())?;
//! // commands[0] == "iS*Consumidor Final"
//! // one fixed-width line per item, then "3", then payment lines
//! ```

mod encoder;
mod encoding;
mod error;
mod invoice;
mod response;
mod status;

// Re-exports
pub use encoder::{EncoderConfig, IGTF_SLOTS, encode_invoice, tax_code};
pub use encoding::{decode_latin1, encode_latin1};
pub use error::{ProtocolError, ProtocolResult};
pub use invoice::{Client, Invoice, Item, Payment};
pub use response::{SendFileOutcome, contains_success_marker, parse_send_file_output};
pub use status::{PrinterStatus, describe_error_code, describe_status_code, parse_status_line};
