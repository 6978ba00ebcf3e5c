//! Hackathon platform API
//!
//! Backend for managing hackathon teams, hacks and challenges:
//! - attendee authentication against an external user directory
//! - team, hack and challenge resources with unique slugs
//! - guarded hack-challenge and team-entry relationships
//! - best-effort event broadcasting for every committed mutation

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::{info, warn};

use api::state::AppState;
use domain::attendee::AttendeeRepository;
use domain::challenge::ChallengeRepository;
use domain::directory::DirectoryClient;
use domain::event::{EventEmitter, NullEventEmitter};
use domain::hack::HackRepository;
use domain::team::TeamRepository;
use domain::user::UserRepository;
use infrastructure::storage::{self, StorageBackend};
use infrastructure::{
    ChallengeService, DirectoryConfig, EventsConfig, HackChallengesSource, HackService,
    HttpDirectoryClient, HttpEventEmitter, IdentityService, RelationshipEngine,
    TeamEntriesSource, TeamService, UserService,
};

struct Repositories {
    attendees: Arc<dyn AttendeeRepository>,
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
    hacks: Arc<dyn HackRepository>,
    challenges: Arc<dyn ChallengeRepository>,
}

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let backend = StorageBackend::from_str(&config.storage.backend)
        .unwrap_or(StorageBackend::InMemory);

    info!("Storage backend: {:?}", backend);

    let repositories = match backend {
        StorageBackend::Postgres => {
            let database_url = config
                .storage
                .database_url
                .clone()
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "postgres storage requires storage.database_url or DATABASE_URL"
                    )
                })?;

            info!("Connecting to PostgreSQL...");
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;
            storage::postgres::ensure_schema(&pool).await?;
            info!("PostgreSQL connection established");

            Repositories {
                attendees: Arc::new(storage::PostgresAttendeeRepository::new(pool.clone())),
                users: Arc::new(storage::PostgresUserRepository::new(pool.clone())),
                teams: Arc::new(storage::PostgresTeamRepository::new(pool.clone())),
                hacks: Arc::new(storage::PostgresHackRepository::new(pool.clone())),
                challenges: Arc::new(storage::PostgresChallengeRepository::new(pool)),
            }
        }
        StorageBackend::InMemory => Repositories {
            attendees: Arc::new(storage::InMemoryAttendeeRepository::new()),
            users: Arc::new(storage::InMemoryUserRepository::new()),
            teams: Arc::new(storage::InMemoryTeamRepository::new()),
            hacks: Arc::new(storage::InMemoryHackRepository::new()),
            challenges: Arc::new(storage::InMemoryChallengeRepository::new()),
        },
    };

    let directory: Arc<dyn DirectoryClient> = Arc::new(HttpDirectoryClient::new(
        DirectoryConfig::new(&config.directory.base_url, &config.directory.token),
    ));

    let events: Arc<dyn EventEmitter> = if config.events.base_url.is_empty() {
        info!("No push service configured, event broadcasting disabled");
        Arc::new(NullEventEmitter)
    } else {
        Arc::new(HttpEventEmitter::new(EventsConfig::new(
            &config.events.base_url,
            &config.events.app_id,
            &config.events.secret,
        )))
    };

    if config.auth.attendee_password.is_empty() {
        warn!(
            "auth.attendee_password is not set. \
             All authenticated endpoints will reject every request."
        );
    }

    let identity_service = Arc::new(IdentityService::new(
        repositories.attendees.clone(),
        repositories.users.clone(),
        directory,
        &config.auth.attendee_password,
    ));

    let team_service = Arc::new(TeamService::new(
        repositories.teams.clone(),
        repositories.users.clone(),
        repositories.hacks.clone(),
        events.clone(),
    ));

    let hack_service = Arc::new(HackService::new(
        repositories.hacks.clone(),
        repositories.teams.clone(),
        repositories.challenges.clone(),
        events.clone(),
    ));

    let challenge_service = Arc::new(ChallengeService::new(repositories.challenges.clone()));

    let user_service = Arc::new(UserService::new(
        repositories.users.clone(),
        repositories.teams.clone(),
    ));

    let hack_challenges = Arc::new(RelationshipEngine::new(
        HackChallengesSource::new(
            repositories.hacks.clone(),
            repositories.challenges.clone(),
            repositories.teams.clone(),
        ),
        events.clone(),
    ));

    let team_entries = Arc::new(RelationshipEngine::new(
        TeamEntriesSource::new(repositories.teams.clone(), repositories.hacks.clone()),
        events,
    ));

    Ok(AppState::new(
        identity_service,
        team_service,
        hack_service,
        challenge_service,
        user_service,
        hack_challenges,
        team_entries,
    ))
}
