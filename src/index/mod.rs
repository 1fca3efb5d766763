mod field_index;
mod field_set;
mod primary_index;

pub use field_index::FieldIndex;
pub use field_set::{CompositeKey, FieldSet};
pub use primary_index::PrimaryIndex;
