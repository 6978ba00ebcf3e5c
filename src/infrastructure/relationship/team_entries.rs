//! Team-entries relationship source
//!
//! Parent = team, children = the team's entry list of hacks. A hack may be
//! entered by at most one team, and only members of the team may change the
//! list. The stored `entries` array is the canonical representation of this
//! relationship; the hack's own `team` pointer is not touched here.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::engine::{ChildRecord, ParentRecord, RelationshipMessages, RelationshipSource};
use crate::domain::credentials::Credentials;
use crate::domain::event::EventName;
use crate::domain::hack::{HackRepository, HackSlug};
use crate::domain::team::{TeamRepository, TeamSlug};
use crate::domain::DomainError;

static MESSAGES: RelationshipMessages = RelationshipMessages {
    parent_not_found: "Team not found",
    forbidden_add: "Only team members can add an entry to a team",
    forbidden_remove: "Only team members can remove an entry from a team",
    already_attached: "One or more hacks are already entries of this team",
    unresolved: "One or more of the specified hacks could not be found",
    already_linked: "One or more of the specified hacks are already in a team",
    not_attached: "One or more of the specified hacks are not entries of this team",
};

/// Source for the team-entries relationship
#[derive(Debug)]
pub struct TeamEntriesSource {
    teams: Arc<dyn TeamRepository>,
    hacks: Arc<dyn HackRepository>,
}

impl TeamEntriesSource {
    pub fn new(teams: Arc<dyn TeamRepository>, hacks: Arc<dyn HackRepository>) -> Self {
        Self { teams, hacks }
    }
}

#[async_trait]
impl RelationshipSource for TeamEntriesSource {
    fn messages(&self) -> &'static RelationshipMessages {
        &MESSAGES
    }

    fn added_event(&self) -> EventName {
        EventName::TeamsUpdateEntriesAdd
    }

    fn removed_event(&self) -> EventName {
        EventName::TeamsUpdateEntriesDelete
    }

    fn event_payload(&self, parent: &ParentRecord, child: &ChildRecord) -> Value {
        json!({
            "teamid": parent.slug,
            "name": parent.name,
            "entry": {
                "hackid": child.slug,
                "name": child.name,
            },
        })
    }

    async fn load_parent(
        &self,
        slug: &str,
        actor: &Credentials,
    ) -> Result<Option<ParentRecord>, DomainError> {
        let Ok(slug) = TeamSlug::new(slug) else {
            return Ok(None);
        };

        let Some(team) = self.teams.find_by_slug(&slug).await? else {
            return Ok(None);
        };

        let actor_is_member = team.has_member(actor.user_id());

        let records = self.hacks.find_by_ids(team.entries()).await?;
        let children = team
            .entries()
            .iter()
            .filter_map(|id| records.iter().find(|h| h.id() == id))
            .map(|h| ChildRecord {
                id: *h.id(),
                slug: h.slug().to_string(),
                name: h.name().to_string(),
            })
            .collect();

        Ok(Some(ParentRecord {
            id: *team.id(),
            slug: team.slug().to_string(),
            name: team.name().to_string(),
            children,
            actor_is_member,
        }))
    }

    async fn resolve_children(&self, slugs: &[String]) -> Result<Vec<ChildRecord>, DomainError> {
        let parsed: Vec<HackSlug> = slugs
            .iter()
            .filter_map(|s| HackSlug::new(s).ok())
            .collect();

        let records = self.hacks.find_by_slugs(&parsed).await?;

        Ok(records
            .into_iter()
            .map(|h| ChildRecord {
                id: *h.id(),
                slug: h.slug().to_string(),
                name: h.name().to_string(),
            })
            .collect())
    }

    async fn any_child_linked(&self, children: &[ChildRecord]) -> Result<bool, DomainError> {
        let ids: Vec<_> = children.iter().map(|c| c.id).collect();
        let holders = self.teams.find_containing_entries(&ids).await?;
        Ok(!holders.is_empty())
    }

    async fn store_child_links(
        &self,
        parent: &ParentRecord,
        children: &[ChildRecord],
    ) -> Result<(), DomainError> {
        let ids = children.iter().map(|c| c.id).collect();
        self.teams.update_entries(&parent.id, ids).await
    }
}
