pub mod email;
pub mod label;

pub use email::{DatasetRow, EmailRecord};
pub use label::Label;
