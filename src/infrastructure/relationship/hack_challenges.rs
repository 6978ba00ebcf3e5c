//! Hack-challenges relationship source
//!
//! Parent = hack, children = the hack's challenge list. A challenge may be
//! in at most one hack across the whole event, and only members of the
//! hack's owning team may change the list.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::engine::{ChildRecord, ParentRecord, RelationshipMessages, RelationshipSource};
use crate::domain::challenge::{ChallengeRepository, ChallengeSlug};
use crate::domain::credentials::Credentials;
use crate::domain::event::EventName;
use crate::domain::hack::{HackRepository, HackSlug};
use crate::domain::team::TeamRepository;
use crate::domain::DomainError;

static MESSAGES: RelationshipMessages = RelationshipMessages {
    parent_not_found: "Hack not found",
    forbidden_add: "Only team members can add a challenge to a hack",
    forbidden_remove: "Only team members can remove a challenge from a hack",
    already_attached: "One or more challenges are already challenges of this hack",
    unresolved: "One or more of the specified challenges could not be found",
    already_linked: "One or more of the specified challenges are already in a hack",
    not_attached: "One or more of the specified challenges are not challenges of this hack",
};

/// Source for the hack-challenges relationship
#[derive(Debug)]
pub struct HackChallengesSource {
    hacks: Arc<dyn HackRepository>,
    challenges: Arc<dyn ChallengeRepository>,
    teams: Arc<dyn TeamRepository>,
}

impl HackChallengesSource {
    pub fn new(
        hacks: Arc<dyn HackRepository>,
        challenges: Arc<dyn ChallengeRepository>,
        teams: Arc<dyn TeamRepository>,
    ) -> Self {
        Self {
            hacks,
            challenges,
            teams,
        }
    }
}

#[async_trait]
impl RelationshipSource for HackChallengesSource {
    fn messages(&self) -> &'static RelationshipMessages {
        &MESSAGES
    }

    fn added_event(&self) -> EventName {
        EventName::HacksUpdateChallengesAdd
    }

    fn removed_event(&self) -> EventName {
        EventName::HacksUpdateChallengesDelete
    }

    fn event_payload(&self, parent: &ParentRecord, child: &ChildRecord) -> Value {
        json!({
            "hackid": parent.slug,
            "name": parent.name,
            "entry": {
                "challengeid": child.slug,
                "name": child.name,
            },
        })
    }

    async fn load_parent(
        &self,
        slug: &str,
        actor: &Credentials,
    ) -> Result<Option<ParentRecord>, DomainError> {
        let Ok(slug) = HackSlug::new(slug) else {
            return Ok(None);
        };

        let Some(hack) = self.hacks.find_by_slug(&slug).await? else {
            return Ok(None);
        };

        // membership check is a separate scoped query against the owning
        // team; a dangling team reference fails the predicate
        let actor_is_member = match self.teams.get(hack.team()).await? {
            Some(team) => team.has_member(actor.user_id()),
            None => false,
        };

        let records = self.challenges.find_by_ids(hack.challenges()).await?;
        let children = hack
            .challenges()
            .iter()
            .filter_map(|id| records.iter().find(|c| &c.id == id))
            .map(|c| ChildRecord {
                id: c.id,
                slug: c.slug.to_string(),
                name: c.name.clone(),
            })
            .collect();

        Ok(Some(ParentRecord {
            id: *hack.id(),
            slug: hack.slug().to_string(),
            name: hack.name().to_string(),
            children,
            actor_is_member,
        }))
    }

    async fn resolve_children(&self, slugs: &[String]) -> Result<Vec<ChildRecord>, DomainError> {
        let parsed: Vec<ChallengeSlug> = slugs
            .iter()
            .filter_map(|s| ChallengeSlug::new(s).ok())
            .collect();

        let records = self.challenges.find_by_slugs(&parsed).await?;

        Ok(records
            .into_iter()
            .map(|c| ChildRecord {
                id: c.id,
                slug: c.slug.to_string(),
                name: c.name,
            })
            .collect())
    }

    async fn any_child_linked(&self, children: &[ChildRecord]) -> Result<bool, DomainError> {
        let ids: Vec<_> = children.iter().map(|c| c.id).collect();
        let holders = self.hacks.find_containing_challenges(&ids).await?;
        Ok(!holders.is_empty())
    }

    async fn store_child_links(
        &self,
        parent: &ParentRecord,
        children: &[ChildRecord],
    ) -> Result<(), DomainError> {
        let ids = children.iter().map(|c| c.id).collect();
        self.hacks.update_challenges(&parent.id, ids).await
    }
}
