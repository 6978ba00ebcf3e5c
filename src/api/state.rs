//! Application state shared by all handlers

use std::sync::Arc;

use crate::infrastructure::{
    ChallengeService, HackChallengesSource, HackService, IdentityService, RelationshipEngine,
    TeamEntriesSource, TeamService, UserService,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub identity_service: Arc<IdentityService>,
    pub team_service: Arc<TeamService>,
    pub hack_service: Arc<HackService>,
    pub challenge_service: Arc<ChallengeService>,
    pub user_service: Arc<UserService>,
    pub hack_challenges: Arc<RelationshipEngine<HackChallengesSource>>,
    pub team_entries: Arc<RelationshipEngine<TeamEntriesSource>>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identity_service: Arc<IdentityService>,
        team_service: Arc<TeamService>,
        hack_service: Arc<HackService>,
        challenge_service: Arc<ChallengeService>,
        user_service: Arc<UserService>,
        hack_challenges: Arc<RelationshipEngine<HackChallengesSource>>,
        team_entries: Arc<RelationshipEngine<TeamEntriesSource>>,
    ) -> Self {
        Self {
            identity_service,
            team_service,
            hack_service,
            challenge_service,
            user_service,
            hack_challenges,
            team_entries,
        }
    }
}
