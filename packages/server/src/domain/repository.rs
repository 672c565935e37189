//! Repository traits.
//!
//! The domain defines what it needs from storage; `infrastructure` provides the
//! implementations (dependency inversion).

use async_trait::async_trait;

use super::{
    entity::{ContactBook, ContactRemoval, ContactRequest},
    error::{ContactError, StoreError},
    value_object::{Alias, RequestId, Timestamp},
};

/// Durable storage of the contact book.
///
/// `load` never fails: a missing or unreadable document yields an empty book.
/// `save` replaces the whole document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Load the last saved contact book
    async fn load(&self) -> ContactBook;

    /// Persist the full contact book
    async fn save(&self, book: &ContactBook) -> Result<(), StoreError>;
}

/// Access to the contact book for the use cases.
///
/// Every mutating method is persisted before it returns, so callers may notify
/// clients as soon as they get a result back.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Contacts of `alias` in insertion order
    async fn contacts_of(&self, alias: &Alias) -> Vec<Alias>;

    /// Pending requests addressed to `alias`
    async fn pending_for(&self, alias: &Alias) -> Vec<ContactRequest>;

    /// Create a pending request
    async fn send_request(
        &self,
        from: Alias,
        to: Alias,
        id: RequestId,
        created_at: Timestamp,
    ) -> Result<ContactRequest, ContactError>;

    /// Accept a pending request addressed to `acceptor`
    async fn accept_request(
        &self,
        acceptor: &Alias,
        id: &RequestId,
        at: Timestamp,
    ) -> Result<ContactRequest, ContactError>;

    /// Reject a pending request addressed to `rejector`
    async fn reject_request(
        &self,
        rejector: &Alias,
        id: &RequestId,
        at: Timestamp,
    ) -> Result<ContactRequest, ContactError>;

    /// Remove the contact edge and any pending request between the pair
    async fn delete_contact(
        &self,
        me: &Alias,
        other: &Alias,
    ) -> Result<ContactRemoval, ContactError>;

    /// Copy of the current contact book
    async fn snapshot(&self) -> ContactBook;
}
