//! CRUD façade over the contacts table.

use chrono::Utc;
use db::models::contact::{Contact, ContactDbError, CreateContact, Pagination};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ContactStoreError {
    #[error("invalid contact id: {0:?}")]
    InvalidId(String),
    #[error("contact {0} not found")]
    NotFound(i64),
    #[error("persistence error: {0}")]
    Persistence(#[from] ContactDbError),
}

/// Parse a contact id taken from a URL path segment.
///
/// Only plain decimal digits naming a positive `i64` are accepted.
pub fn parse_contact_id(raw: &str) -> Result<i64, ContactStoreError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ContactStoreError::InvalidId(raw.to_string()));
    }
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ContactStoreError::InvalidId(raw.to_string())),
    }
}

fn ensure_positive(id: i64) -> Result<i64, ContactStoreError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(ContactStoreError::InvalidId(id.to_string()))
    }
}

/// Store for contact submissions. The pool is injected so callers decide
/// which database (file-backed or in-memory) sits underneath.
#[derive(Clone)]
pub struct ContactStore {
    pool: SqlitePool,
}

impl ContactStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a validated submission; id and both timestamps are assigned here.
    pub async fn create(&self, input: &CreateContact) -> Result<Contact, ContactStoreError> {
        let contact = Contact::create(&self.pool, input, Utc::now()).await?;
        info!(contact_id = contact.id, "Contact created");
        Ok(contact)
    }

    /// One page of contacts (newest first) plus the size of the whole table,
    /// both read in the same transaction.
    pub async fn list(
        &self,
        pagination: Pagination,
    ) -> Result<(Vec<Contact>, i64), ContactStoreError> {
        let mut tx = self.pool.begin().await.map_err(ContactDbError::from)?;
        let contacts = Contact::find_page(&mut *tx, pagination).await?;
        let total = Contact::count(&mut *tx).await?;
        tx.commit().await.map_err(ContactDbError::from)?;
        debug!(
            limit = pagination.limit(),
            offset = pagination.offset(),
            returned = contacts.len(),
            total,
            "Listed contacts"
        );
        Ok((contacts, total))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Contact, ContactStoreError> {
        let id = ensure_positive(id)?;
        Contact::find_by_id(&self.pool, id)
            .await?
            .ok_or(ContactStoreError::NotFound(id))
    }

    /// Deleting an id that does not exist is `NotFound`, not a silent success.
    pub async fn delete_by_id(&self, id: i64) -> Result<(), ContactStoreError> {
        let id = ensure_positive(id)?;
        let rows_affected = Contact::delete(&self.pool, id).await?;
        if rows_affected == 0 {
            return Err(ContactStoreError::NotFound(id));
        }
        info!(contact_id = id, "Contact deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use db::DBService;

    use super::*;

    async fn store() -> ContactStore {
        let db = DBService::new_in_memory().await.unwrap();
        ContactStore::new(db.pool)
    }

    fn submission(name: &str) -> CreateContact {
        CreateContact {
            name: name.to_string(),
            email: "someone@example.com".to_string(),
            message: format!("Message from {name}"),
        }
    }

    #[test]
    fn test_parse_contact_id() {
        assert_eq!(parse_contact_id("1").unwrap(), 1);
        assert_eq!(parse_contact_id("999").unwrap(), 999);
        for raw in ["", "0", "-1", "+1", "1.5", "abc", " 1", "99999999999999999999"] {
            assert!(
                matches!(parse_contact_id(raw), Err(ContactStoreError::InvalidId(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_create_returns_full_record() {
        let store = store().await;
        let contact = store.create(&submission("Jane")).await.unwrap();
        assert_eq!(contact.id, 1);
        assert_eq!(contact.name, "Jane");
        assert_eq!(contact.message, "Message from Jane");
        assert!(contact.created_at <= contact.updated_at);
    }

    #[tokio::test]
    async fn test_list_paginates_with_total_count() {
        let store = store().await;
        for name in ["Ann", "Bob", "Cyd"] {
            store.create(&submission(name)).await.unwrap();
        }

        let (first, total) = store.list(Pagination::new(Some(2), Some(0))).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(total, 3);

        let (second, total) = store.list(Pagination::new(Some(2), Some(2))).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(total, 3);

        let mut seen: Vec<i64> = first.iter().chain(second.iter()).map(|c| c.id).collect();
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(first[0].name, "Cyd");
    }

    #[tokio::test]
    async fn test_list_past_end_is_empty() {
        let store = store().await;
        store.create(&submission("Ann")).await.unwrap();

        let (page, total) = store.list(Pagination::new(Some(10), Some(50))).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let store = store().await;
        let created = store.create(&submission("Ann")).await.unwrap();

        assert_eq!(store.get_by_id(created.id).await.unwrap(), created);
        assert!(matches!(
            store.get_by_id(999).await,
            Err(ContactStoreError::NotFound(999))
        ));
        assert!(matches!(
            store.get_by_id(0).await,
            Err(ContactStoreError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found() {
        let store = store().await;
        let created = store.create(&submission("Ann")).await.unwrap();

        store.delete_by_id(created.id).await.unwrap();
        assert!(matches!(
            store.delete_by_id(created.id).await,
            Err(ContactStoreError::NotFound(id)) if id == created.id
        ));
        assert!(matches!(
            store.delete_by_id(-3).await,
            Err(ContactStoreError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn test_closed_pool_is_persistence_error() {
        let store = store().await;
        store.pool().close().await;

        let err = store.create(&submission("Ann")).await.unwrap_err();
        assert!(matches!(err, ContactStoreError::Persistence(_)));

        let err = store.list(Pagination::default()).await.unwrap_err();
        assert!(matches!(err, ContactStoreError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_list_releases_its_transaction() {
        let store = store().await;
        store.create(&submission("Ann")).await.unwrap();

        // The in-memory pool has one connection, so a leaked transaction
        // would make the following calls hang or fail.
        let (page, total) = store.list(Pagination::default()).await.unwrap();
        assert_eq!((page.len(), total), (1, 1));

        store.create(&submission("Bob")).await.unwrap();
        let (page, total) = store.list(Pagination::default()).await.unwrap();
        assert_eq!(page.len() as i64, total);
        assert_eq!(total, 2);
    }
}
