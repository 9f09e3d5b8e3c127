pub mod recipients;
pub mod records;

pub use recipients::{RecipientKind, Recipients};
pub use records::{Contact, NewContact, NewTemplate, RecordId, Resource, Template};
