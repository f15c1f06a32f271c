//! Quality value driven negotiation.
//!
//! - [`AcceptList`]: media ranges of the `Accept` header and the server side selection
//! - [`QualityList`]: weighted tokens of `Accept-Encoding`, `Accept-Language`, `Accept-Charset`
//!   and `TE`

mod accept;
mod quality;

pub use accept::AcceptList;
pub use accept::AcceptType;
pub use quality::QualityItem;
pub use quality::QualityList;
