use reqwest::blocking::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::domain::{Contact, NewContact, NewTemplate, RecordId, Resource, Template};
use crate::store::repo::RemoteStore;
use crate::store::{StoreError, StoreResult};

/// Talks to the local backend's `/api/{contacts|templates}` routes.
pub struct HttpStore {
    base: String,
    client: Client,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout: Duration) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Transport {
                url: base_url.to_string(),
                source: e,
            })?;
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    #[cfg(test)]
    fn base_url(&self) -> &str {
        &self.base
    }

    fn collection_url(&self, resource: Resource) -> String {
        format!("{}/{}", self.base, resource.path())
    }

    fn item_url(&self, resource: Resource, id: &RecordId) -> String {
        format!("{}/{}/{}", self.base, resource.path(), id)
    }

    fn list<T: DeserializeOwned>(&self, resource: Resource) -> StoreResult<Vec<T>> {
        let url = self.collection_url(resource);
        log::debug!("GET {url}");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| StoreError::connectivity(resource, &url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::connectivity(
                resource,
                &url,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let items: Vec<T> = resp
            .json()
            .map_err(|e| StoreError::connectivity(resource, &url, e))?;
        log::debug!("loaded {} {}s", items.len(), resource.singular());
        Ok(items)
    }

    fn create<B: Serialize>(&self, resource: Resource, body: &B) -> StoreResult<()> {
        let url = self.collection_url(resource);
        log::debug!("POST {url}");

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| StoreError::Transport {
                url: url.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(StoreError::Rejected {
                action: "create",
                resource: resource.singular(),
                status: resp.status().as_u16(),
            });
        }
        Ok(())
    }
}

impl RemoteStore for HttpStore {
    fn list_contacts(&self) -> StoreResult<Vec<Contact>> {
        self.list(Resource::Contact)
    }

    fn list_templates(&self) -> StoreResult<Vec<Template>> {
        self.list(Resource::Template)
    }

    fn create_contact(&self, contact: &NewContact) -> StoreResult<()> {
        self.create(Resource::Contact, contact)
    }

    fn create_template(&self, template: &NewTemplate) -> StoreResult<()> {
        self.create(Resource::Template, template)
    }

    fn delete(&self, resource: Resource, id: &RecordId) -> StoreResult<()> {
        let url = self.item_url(resource, id);
        log::debug!("DELETE {url}");

        let resp = self
            .client
            .delete(&url)
            .send()
            .map_err(|e| StoreError::Transport {
                url: url.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(StoreError::Rejected {
                action: "delete",
                resource: resource.singular(),
                status: resp.status().as_u16(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let store = HttpStore::new("http://127.0.0.1:5000/api/", Duration::from_secs(1))
            .expect("client should build");
        assert_eq!(store.base_url(), "http://127.0.0.1:5000/api");
        assert_eq!(
            store.collection_url(Resource::Template),
            "http://127.0.0.1:5000/api/templates"
        );
        assert_eq!(
            store.item_url(Resource::Contact, &RecordId::new("12")),
            "http://127.0.0.1:5000/api/contacts/12"
        );
    }

    #[test]
    fn unreachable_backend_is_a_connectivity_error() {
        // Port 9 (discard) is never served on loopback in test environments.
        let store = HttpStore::new("http://127.0.0.1:9/api", Duration::from_millis(500))
            .expect("client should build");
        let err = store
            .list_contacts()
            .expect_err("nothing listens on the discard port");
        assert!(matches!(err, StoreError::Connectivity { resource: "contact", .. }));
    }
}
