//! Domain entities - the core business objects.

mod key;
mod page;
mod submission;

pub use key::{KeyDecodeError, KeyPart, StoreKey};
pub use page::{PageProperties, PropertyValue};
pub use submission::{NOT_AVAILABLE, SubmissionForm, SubmissionRecord, UNKNOWN_CLIENT};
