//! Relationship consistency engine
//!
//! Adds and removes child references on a parent entity under a global
//! exclusivity invariant: a child is referenced by at most one parent in
//! its scope at any time. Every batch is validated in full before anything
//! is written, so a rejected request mutates nothing and emits nothing.
//!
//! There is deliberately no transaction spanning the read-validate-write
//! sequence. Two concurrent adds of the same child under different parents
//! can both pass the scan and both commit; the invariant is best-effort
//! under concurrency and exact under sequential use.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::domain::credentials::Credentials;
use crate::domain::event::{EventEmitter, EventName};
use crate::domain::id::RecordId;
use crate::domain::DomainError;

/// A child reference projected with its business key and display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRecord {
    pub id: RecordId,
    pub slug: String,
    pub name: String,
}

/// A parent loaded with its current child list and the evaluated
/// authorization predicate
#[derive(Debug, Clone)]
pub struct ParentRecord {
    pub id: RecordId,
    pub slug: String,
    pub name: String,
    /// Current children in stored order
    pub children: Vec<ChildRecord>,
    /// Whether the acting user passes the relationship's authorization
    /// predicate for this parent
    pub actor_is_member: bool,
}

/// Error texts for one relationship instantiation
#[derive(Debug)]
pub struct RelationshipMessages {
    pub parent_not_found: &'static str,
    pub forbidden_add: &'static str,
    pub forbidden_remove: &'static str,
    /// A requested child is already in this parent's list
    pub already_attached: &'static str,
    /// A requested child slug did not resolve
    pub unresolved: &'static str,
    /// A requested child is referenced by some parent in the scope
    pub already_linked: &'static str,
    /// A requested child is not currently in this parent's list
    pub not_attached: &'static str,
}

/// Adapter binding the engine to a concrete parent/child pair
#[async_trait]
pub trait RelationshipSource: Send + Sync + std::fmt::Debug {
    fn messages(&self) -> &'static RelationshipMessages;

    fn added_event(&self) -> EventName;

    fn removed_event(&self) -> EventName;

    /// Event payload for one mutated child
    fn event_payload(&self, parent: &ParentRecord, child: &ChildRecord) -> Value;

    /// Load the parent by slug together with its projected child list and
    /// the authorization predicate evaluated for the actor. A slug that
    /// does not parse or does not resolve is `None`.
    async fn load_parent(
        &self,
        slug: &str,
        actor: &Credentials,
    ) -> Result<Option<ParentRecord>, DomainError>;

    /// Resolve requested child slugs to records. Slugs that do not parse or
    /// do not resolve are absent from the result.
    async fn resolve_children(&self, slugs: &[String]) -> Result<Vec<ChildRecord>, DomainError>;

    /// Whether any parent in the exclusivity scope already references one
    /// of the children
    async fn any_child_linked(&self, children: &[ChildRecord]) -> Result<bool, DomainError>;

    /// Persist the parent's child list in a single-document update
    async fn store_child_links(
        &self,
        parent: &ParentRecord,
        children: &[ChildRecord],
    ) -> Result<(), DomainError>;
}

/// Add/remove protocol over a [`RelationshipSource`]
#[derive(Debug)]
pub struct RelationshipEngine<S> {
    source: S,
    events: Arc<dyn EventEmitter>,
}

impl<S: RelationshipSource> RelationshipEngine<S> {
    pub fn new(source: S, events: Arc<dyn EventEmitter>) -> Self {
        Self { source, events }
    }

    /// Link a batch of children to a parent.
    ///
    /// Validation order is fixed: unknown parent, failed authorization,
    /// overlap with the current list, unresolved children, exclusivity.
    /// The whole batch passes or nothing is written.
    pub async fn add(
        &self,
        parent_slug: &str,
        child_slugs: &[String],
        actor: &Credentials,
    ) -> Result<(), DomainError> {
        let messages = self.source.messages();

        let parent = self
            .source
            .load_parent(parent_slug, actor)
            .await?
            .ok_or_else(|| DomainError::not_found(messages.parent_not_found))?;

        if !parent.actor_is_member {
            return Err(DomainError::forbidden(messages.forbidden_add));
        }

        let overlaps = child_slugs
            .iter()
            .any(|slug| parent.children.iter().any(|child| &child.slug == slug));
        if overlaps {
            return Err(DomainError::validation(messages.already_attached));
        }

        let resolved = self.source.resolve_children(child_slugs).await?;
        if resolved.len() != child_slugs.len() {
            return Err(DomainError::validation(messages.unresolved));
        }

        if self.source.any_child_linked(&resolved).await? {
            return Err(DomainError::validation(messages.already_linked));
        }

        // append in the order the request supplied
        let appended: Vec<ChildRecord> = child_slugs
            .iter()
            .filter_map(|slug| resolved.iter().find(|child| &child.slug == slug))
            .cloned()
            .collect();

        let mut children = parent.children.clone();
        children.extend(appended.iter().cloned());

        self.source.store_child_links(&parent, &children).await?;

        info!(
            parent = %parent.slug,
            added = appended.len(),
            "Linked children to parent"
        );

        for child in &appended {
            self.events.trigger(
                self.source.added_event(),
                self.source.event_payload(&parent, child),
            );
        }

        Ok(())
    }

    /// Unlink a batch of children from a parent.
    ///
    /// Not idempotent: every requested child must currently be linked or
    /// the whole request is rejected. Removal events follow the parent's
    /// stored order, not the request's.
    pub async fn remove(
        &self,
        parent_slug: &str,
        child_slugs: &[String],
        actor: &Credentials,
    ) -> Result<(), DomainError> {
        let messages = self.source.messages();

        let parent = self
            .source
            .load_parent(parent_slug, actor)
            .await?
            .ok_or_else(|| DomainError::not_found(messages.parent_not_found))?;

        if !parent.actor_is_member {
            return Err(DomainError::forbidden(messages.forbidden_remove));
        }

        let removed: Vec<ChildRecord> = parent
            .children
            .iter()
            .filter(|child| child_slugs.contains(&child.slug))
            .cloned()
            .collect();

        if removed.len() < child_slugs.len() {
            return Err(DomainError::validation(messages.not_attached));
        }

        let remaining: Vec<ChildRecord> = parent
            .children
            .iter()
            .filter(|child| !child_slugs.contains(&child.slug))
            .cloned()
            .collect();

        self.source.store_child_links(&parent, &remaining).await?;

        info!(
            parent = %parent.slug,
            removed = removed.len(),
            "Unlinked children from parent"
        );

        for child in &removed {
            self.events.trigger(
                self.source.removed_event(),
                self.source.event_payload(&parent, child),
            );
        }

        Ok(())
    }
}
