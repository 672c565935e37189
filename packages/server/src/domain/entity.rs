//! Core domain models: contact requests and the contact book.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    error::ContactError,
    value_object::{Alias, RequestId, Timestamp},
};

/// Lifecycle state of a contact request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

/// A directed proposal from one alias to another to become contacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRequest {
    /// Request identifier, unique among pending requests to the same recipient
    pub id: RequestId,
    /// Requesting alias
    pub from: Alias,
    /// Recipient alias
    pub to: Alias,
    /// Current status; terminal statuses only exist on records already removed from the book
    pub status: RequestStatus,
    /// Timestamp when the request was created
    pub created_at: Timestamp,
    /// Timestamp of the terminal transition
    pub updated_at: Option<Timestamp>,
}

impl ContactRequest {
    /// Create a new pending request
    pub fn new(id: RequestId, from: Alias, to: Alias, created_at: Timestamp) -> Self {
        Self {
            id,
            from,
            to,
            status: RequestStatus::Pending,
            created_at,
            updated_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Whether this request links `a` and `b`, in either direction
    pub fn is_between(&self, a: &Alias, b: &Alias) -> bool {
        (&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
    }

    fn resolve(&mut self, status: RequestStatus, at: Timestamp) {
        self.status = status;
        self.updated_at = Some(at);
    }
}

/// Result of deleting a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactRemoval {
    /// Whether the two aliases were contacts before the deletion
    pub was_contact: bool,
    /// Number of pending requests between the pair that were purged
    pub purged_requests: usize,
}

/// Pending contact requests and the contact graph.
///
/// This is the state that must survive restarts. Invariants held by every
/// public operation:
///
/// - the contact graph is symmetric and has no self edges;
/// - only pending requests are stored, each under its recipient;
/// - at most one pending request exists per unordered pair of aliases;
/// - no pending request exists between two aliases that are already contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactBook {
    requests_by_to: HashMap<Alias, Vec<ContactRequest>>,
    contacts_by_alias: HashMap<Alias, Vec<Alias>>,
}

impl ContactBook {
    /// Create an empty contact book
    pub fn new() -> Self {
        Self::default()
    }

    /// Contacts of `alias`, in the order they were added
    pub fn contacts_of(&self, alias: &Alias) -> Vec<Alias> {
        self.contacts_by_alias
            .get(alias)
            .cloned()
            .unwrap_or_default()
    }

    /// Pending requests addressed to `alias`, oldest first
    pub fn pending_for(&self, alias: &Alias) -> Vec<ContactRequest> {
        self.requests_by_to.get(alias).cloned().unwrap_or_default()
    }

    pub fn are_contacts(&self, a: &Alias, b: &Alias) -> bool {
        self.contacts_by_alias
            .get(a)
            .is_some_and(|contacts| contacts.contains(b))
    }

    /// Whether a pending request exists between `a` and `b` in either direction
    pub fn has_pending_between(&self, a: &Alias, b: &Alias) -> bool {
        self.pending_between(a, b).next().is_some()
    }

    /// Pending requests between `a` and `b` in either direction
    pub fn pending_between<'a>(
        &'a self,
        a: &'a Alias,
        b: &'a Alias,
    ) -> impl Iterator<Item = &'a ContactRequest> + 'a {
        [(a, b), (b, a)].into_iter().flat_map(move |(from, to)| {
            self.requests_by_to
                .get(to)
                .into_iter()
                .flatten()
                .filter(move |r| &r.from == from && r.is_pending())
        })
    }

    /// Total number of pending requests
    pub fn pending_count(&self) -> usize {
        self.requests_by_to.values().map(Vec::len).sum()
    }

    /// Number of aliases that have at least one contact
    pub fn contact_alias_count(&self) -> usize {
        self.contacts_by_alias.len()
    }

    /// Read-only view of the pending requests, keyed by recipient
    pub fn requests_by_to(&self) -> &HashMap<Alias, Vec<ContactRequest>> {
        &self.requests_by_to
    }

    /// Read-only view of the contact graph
    pub fn contacts_by_alias(&self) -> &HashMap<Alias, Vec<Alias>> {
        &self.contacts_by_alias
    }

    /// Create a pending request from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - `SameAlias` if `from == to`
    /// - `AlreadyContacts` if the aliases are already contacts
    /// - `AlreadyPending` if any pending request exists between them
    /// - `RequestIdInUse` if `to` already has a pending request with this id
    pub fn send_request(
        &mut self,
        from: Alias,
        to: Alias,
        id: RequestId,
        created_at: Timestamp,
    ) -> Result<ContactRequest, ContactError> {
        self.check_new_request(&from, &to, &id)?;

        let request = ContactRequest::new(id, from, to.clone(), created_at);
        self.requests_by_to
            .entry(to)
            .or_default()
            .push(request.clone());
        Ok(request)
    }

    /// Accept the pending request `id` addressed to `acceptor`.
    ///
    /// Adds the symmetric contact edge, removes the request, and purges any
    /// other pending request between the pair. Returns the resolved request.
    pub fn accept_request(
        &mut self,
        acceptor: &Alias,
        id: &RequestId,
        at: Timestamp,
    ) -> Result<ContactRequest, ContactError> {
        let mut request = self.take_pending(acceptor, id)?;
        request.resolve(RequestStatus::Accepted, at);

        self.link(&request.from, &request.to);
        self.purge_pending_between(&request.from, &request.to);

        Ok(request)
    }

    /// Reject the pending request `id` addressed to `rejector`.
    ///
    /// Same cleanup as [`accept_request`](Self::accept_request) without touching
    /// the contact graph.
    pub fn reject_request(
        &mut self,
        rejector: &Alias,
        id: &RequestId,
        at: Timestamp,
    ) -> Result<ContactRequest, ContactError> {
        let mut request = self.take_pending(rejector, id)?;
        request.resolve(RequestStatus::Rejected, at);

        self.purge_pending_between(&request.from, &request.to);

        Ok(request)
    }

    /// Remove the contact edge between `me` and `other` and every pending
    /// request between them. Deleting a non-existent contact is not an error.
    pub fn delete_contact(
        &mut self,
        me: &Alias,
        other: &Alias,
    ) -> Result<ContactRemoval, ContactError> {
        if me == other {
            return Err(ContactError::SameAlias);
        }

        let was_contact = self.unlink(me, other);
        let purged_requests = self.purge_pending_between(me, other);

        Ok(ContactRemoval {
            was_contact,
            purged_requests,
        })
    }

    /// Append `contact` to the end of `owner`'s list, as read back from storage.
    ///
    /// Only this side of the edge is written, so stored order is kept; the
    /// caller completes one-sided edges. Returns `true` if the entry was added.
    pub fn restore_contact(&mut self, owner: &Alias, contact: &Alias) -> bool {
        if owner == contact {
            return false;
        }
        let contacts = self.contacts_by_alias.entry(owner.clone()).or_default();
        if contacts.contains(contact) {
            return false;
        }
        contacts.push(contact.clone());
        true
    }

    /// Insert a pending request read back from storage.
    ///
    /// The request is kept only if it could have been created by
    /// [`send_request`](Self::send_request) against the current state.
    pub fn restore_pending(&mut self, request: ContactRequest) -> bool {
        if !request.is_pending() {
            return false;
        }
        if self
            .check_new_request(&request.from, &request.to, &request.id)
            .is_err()
        {
            return false;
        }
        self.requests_by_to
            .entry(request.to.clone())
            .or_default()
            .push(request);
        true
    }

    fn check_new_request(
        &self,
        from: &Alias,
        to: &Alias,
        id: &RequestId,
    ) -> Result<(), ContactError> {
        if from == to {
            return Err(ContactError::SameAlias);
        }
        if self.are_contacts(from, to) {
            return Err(ContactError::AlreadyContacts {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        if self.has_pending_between(from, to) {
            return Err(ContactError::AlreadyPending {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        if self
            .requests_by_to
            .get(to)
            .is_some_and(|requests| requests.iter().any(|r| &r.id == id))
        {
            return Err(ContactError::RequestIdInUse(id.to_string()));
        }
        Ok(())
    }

    fn take_pending(&mut self, to: &Alias, id: &RequestId) -> Result<ContactRequest, ContactError> {
        let not_found = || ContactError::RequestNotFound {
            id: id.to_string(),
            to: to.to_string(),
        };

        let requests = self.requests_by_to.get_mut(to).ok_or_else(not_found)?;
        let index = requests
            .iter()
            .position(|r| &r.id == id && r.is_pending())
            .ok_or_else(not_found)?;
        let request = requests.remove(index);
        if requests.is_empty() {
            self.requests_by_to.remove(to);
        }
        Ok(request)
    }

    /// Remove every pending request between `a` and `b`, both directions
    fn purge_pending_between(&mut self, a: &Alias, b: &Alias) -> usize {
        let mut purged = 0;
        for (from, to) in [(a, b), (b, a)] {
            if let Some(requests) = self.requests_by_to.get_mut(to) {
                let before = requests.len();
                requests.retain(|r| &r.from != from);
                purged += before - requests.len();
                if requests.is_empty() {
                    self.requests_by_to.remove(to);
                }
            }
        }
        purged
    }

    fn link(&mut self, a: &Alias, b: &Alias) -> bool {
        let mut added = false;
        for (owner, contact) in [(a, b), (b, a)] {
            let contacts = self.contacts_by_alias.entry(owner.clone()).or_default();
            if !contacts.contains(contact) {
                contacts.push(contact.clone());
                added = true;
            }
        }
        added
    }

    fn unlink(&mut self, a: &Alias, b: &Alias) -> bool {
        let mut removed = false;
        for (owner, contact) in [(a, b), (b, a)] {
            if let Some(contacts) = self.contacts_by_alias.get_mut(owner) {
                let before = contacts.len();
                contacts.retain(|c| c != contact);
                removed |= contacts.len() != before;
                if contacts.is_empty() {
                    self.contacts_by_alias.remove(owner);
                }
            }
        }
        removed
    }
}
