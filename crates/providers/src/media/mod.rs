pub mod reference;
pub mod result_record;

pub use reference::{MediaReference, unique_references};
pub use result_record::{MediaEntry, MediaKind, ResultRecord, missing_fields};
