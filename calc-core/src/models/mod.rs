mod field_spec;
mod result_record;
mod tax_slab;

pub use field_spec::{FieldRule, FieldSpec};
pub use result_record::{ResultEntry, ResultRecord};
pub use tax_slab::{SlabTable, SlabTableError, TaxSlab};
