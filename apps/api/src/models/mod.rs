pub mod contact;
pub mod structured;

pub use contact::ContactRecord;
pub use structured::StructuredValue;
