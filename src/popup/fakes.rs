//! In-memory store and tab host for popup tests.

use std::cell::{Cell, RefCell};

use crate::domain::{Contact, NewContact, NewTemplate, RecordId, Resource, Template};
use crate::inject::InjectionRequest;
use crate::store::{RemoteStore, StoreError, StoreResult};
use crate::tab::{TabHost, TabInfo, TabResult};

#[derive(Default)]
pub struct FakeStore {
    pub contacts: RefCell<Vec<Contact>>,
    pub templates: RefCell<Vec<Template>>,
    next_id: Cell<u32>,
    pub offline: Cell<bool>,
    pub writes: Cell<u32>,
}

impl FakeStore {
    fn id(&self) -> RecordId {
        self.next_id.set(self.next_id.get() + 1);
        RecordId::new(self.next_id.get().to_string())
    }

    fn offline_err(resource: &'static str) -> StoreError {
        StoreError::Connectivity {
            resource,
            url: "http://127.0.0.1:5000/api".into(),
            reason: "connection refused".into(),
        }
    }
}

impl RemoteStore for FakeStore {
    fn list_contacts(&self) -> StoreResult<Vec<Contact>> {
        if self.offline.get() {
            return Err(Self::offline_err("contact"));
        }
        Ok(self.contacts.borrow().clone())
    }

    fn list_templates(&self) -> StoreResult<Vec<Template>> {
        if self.offline.get() {
            return Err(Self::offline_err("template"));
        }
        Ok(self.templates.borrow().clone())
    }

    fn create_contact(&self, c: &NewContact) -> StoreResult<()> {
        self.writes.set(self.writes.get() + 1);
        let id = self.id();
        self.contacts.borrow_mut().push(Contact {
            id,
            name: c.name.clone(),
            email: c.email.clone(),
        });
        Ok(())
    }

    fn create_template(&self, t: &NewTemplate) -> StoreResult<()> {
        self.writes.set(self.writes.get() + 1);
        let id = self.id();
        self.templates.borrow_mut().push(Template {
            id,
            title: t.title.clone(),
            subject: t.subject.clone(),
            body: t.body.clone(),
        });
        Ok(())
    }

    fn delete(&self, resource: Resource, id: &RecordId) -> StoreResult<()> {
        self.writes.set(self.writes.get() + 1);
        match resource {
            Resource::Contact => self.contacts.borrow_mut().retain(|c| &c.id != id),
            Resource::Template => self.templates.borrow_mut().retain(|t| &t.id != id),
        }
        Ok(())
    }
}

pub struct FakeHost {
    pub url: String,
    pub sent: RefCell<Vec<InjectionRequest>>,
}

impl FakeHost {
    pub fn at(url: &str) -> Self {
        Self {
            url: url.into(),
            sent: RefCell::new(vec![]),
        }
    }
}

impl TabHost for FakeHost {
    fn active_tab(&self) -> TabResult<TabInfo> {
        Ok(TabInfo {
            id: 3,
            url: self.url.clone(),
        })
    }

    fn dispatch(&self, _tab: &TabInfo, request: &InjectionRequest) -> TabResult<()> {
        self.sent.borrow_mut().push(request.clone());
        Ok(())
    }
}

pub const GMAIL: &str = "https://mail.google.com/";

pub fn seeded() -> FakeStore {
    let store = FakeStore::default();
    store
        .create_contact(&NewContact {
            name: "Ann".into(),
            email: "ann@x.com".into(),
        })
        .expect("seed");
    store
        .create_contact(&NewContact {
            name: "Bob".into(),
            email: "bob@x.com".into(),
        })
        .expect("seed");
    store
        .create_template(&NewTemplate {
            title: "Hello".into(),
            subject: "Hi there".into(),
            body: "Long time no see".into(),
        })
        .expect("seed");
    store.writes.set(0);
    store
}
