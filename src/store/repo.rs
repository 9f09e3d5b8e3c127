use crate::domain::{Contact, NewContact, NewTemplate, RecordId, Resource, Template};
use crate::store::StoreResult;

/// CRUD over the two backend collections. Every list call returns the whole
/// collection.
pub trait RemoteStore {
    fn list_contacts(&self) -> StoreResult<Vec<Contact>>;
    fn list_templates(&self) -> StoreResult<Vec<Template>>;

    fn create_contact(&self, contact: &NewContact) -> StoreResult<()>;
    fn create_template(&self, template: &NewTemplate) -> StoreResult<()>;

    fn delete(&self, resource: Resource, id: &RecordId) -> StoreResult<()>;
}
