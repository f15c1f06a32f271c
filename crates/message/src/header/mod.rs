//! Header storage and typed header access.
//!
//! - [`HeaderTable`]: raw, case-insensitive, multi-valued storage that preserves insertion order
//! - [`HeaderDescriptor`]: binds a header name to a value type and a multiplicity policy
//! - [`standard`]: the descriptors for the headers this crate understands
//! - [`Host`]: the validated `Host` header value
//!
//! # Example
//!
//! ```
//! use micro_message::header::{standard, HeaderTable};
//!
//! let mut headers = HeaderTable::new();
//! headers.put("content-length", "42");
//! headers.put("Content-Length", "oops");
//!
//! // both values are kept, but the combined text no longer parses as a number
//! assert!(headers.contains("CONTENT-LENGTH"));
//! assert_eq!(headers.typed(&standard::CONTENT_LENGTH), None);
//! ```

mod descriptor;
mod host;
pub mod standard;
mod table;

pub use descriptor::Applicability;
pub use descriptor::HeaderDescriptor;
pub use descriptor::HeaderField;
pub use descriptor::Multiplicity;
pub use descriptor::Scope;
pub use host::Host;
pub use table::HeaderTable;
