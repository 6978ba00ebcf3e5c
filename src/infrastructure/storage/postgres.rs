//! PostgreSQL repository implementations
//!
//! Each entity type lives in its own document table: a UUID key column plus
//! a JSONB `data` column, with unique expression indexes on the business
//! keys. Unique-constraint violations surface as [`DomainError::Conflict`]
//! so callers see the same semantics as the in-memory backend.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPool;
use sqlx::Row;

use crate::domain::attendee::{Attendee, AttendeeRepository};
use crate::domain::challenge::{Challenge, ChallengeRepository, ChallengeSlug};
use crate::domain::directory::DirectoryHandle;
use crate::domain::hack::{Hack, HackRepository, HackSlug};
use crate::domain::id::RecordId;
use crate::domain::team::{Team, TeamRepository, TeamSlug};
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

const UNIQUE_VIOLATION: &str = "23505";

/// Ensure the document tables and their unique indexes exist
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DomainError> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS attendees (key UUID PRIMARY KEY, data JSONB NOT NULL)",
        "CREATE UNIQUE INDEX IF NOT EXISTS attendees_email_idx \
         ON attendees ((data->>'registration_email'))",
        "CREATE UNIQUE INDEX IF NOT EXISTS attendees_handle_idx \
         ON attendees ((data->>'directory_handle')) WHERE data->>'directory_handle' IS NOT NULL",
        "CREATE TABLE IF NOT EXISTS users (key UUID PRIMARY KEY, data JSONB NOT NULL)",
        "CREATE UNIQUE INDEX IF NOT EXISTS users_handle_idx ON users ((data->>'handle'))",
        "CREATE TABLE IF NOT EXISTS teams (key UUID PRIMARY KEY, data JSONB NOT NULL)",
        "CREATE UNIQUE INDEX IF NOT EXISTS teams_slug_idx ON teams ((data->>'slug'))",
        "CREATE UNIQUE INDEX IF NOT EXISTS teams_name_idx ON teams ((data->>'name'))",
        "CREATE TABLE IF NOT EXISTS hacks (key UUID PRIMARY KEY, data JSONB NOT NULL)",
        "CREATE UNIQUE INDEX IF NOT EXISTS hacks_slug_idx ON hacks ((data->>'slug'))",
        "CREATE UNIQUE INDEX IF NOT EXISTS hacks_name_idx ON hacks ((data->>'name'))",
        "CREATE TABLE IF NOT EXISTS challenges (key UUID PRIMARY KEY, data JSONB NOT NULL)",
        "CREATE UNIQUE INDEX IF NOT EXISTS challenges_slug_idx ON challenges ((data->>'slug'))",
        "CREATE UNIQUE INDEX IF NOT EXISTS challenges_name_idx ON challenges ((data->>'name'))",
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to ensure schema: {}", e)))?;
    }

    Ok(())
}

fn map_insert_error(err: sqlx::Error, what: &str) -> DomainError {
    if let sqlx::Error::Database(ref db) = err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return DomainError::conflict(format!("{} already exists", what));
        }
    }
    DomainError::storage(format!("Failed to insert {}: {}", what, err))
}

fn decode_row<E: serde::de::DeserializeOwned>(row: &sqlx::postgres::PgRow) -> Result<E, DomainError> {
    let data: serde_json::Value = row.get("data");
    serde_json::from_value(data)
        .map_err(|e| DomainError::storage(format!("Failed to deserialize entity: {}", e)))
}

fn encode<E: serde::Serialize>(entity: &E) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(entity)
        .map_err(|e| DomainError::storage(format!("Failed to serialize entity: {}", e)))
}

async fn fetch_one_by_text_field<E: serde::de::DeserializeOwned>(
    pool: &PgPool,
    table: &str,
    field: &str,
    value: &str,
) -> Result<Option<E>, DomainError> {
    let query = format!("SELECT data FROM {} WHERE data->>'{}' = $1", table, field);

    let row = sqlx::query(&query)
        .bind(value)
        .fetch_optional(pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to query {}: {}", table, e)))?;

    row.map(|r| decode_row(&r)).transpose()
}

async fn fetch_all_by_text_field<E: serde::de::DeserializeOwned>(
    pool: &PgPool,
    table: &str,
    field: &str,
    values: Vec<String>,
) -> Result<Vec<E>, DomainError> {
    let query = format!(
        "SELECT data FROM {} WHERE data->>'{}' = ANY($1)",
        table, field
    );

    let rows = sqlx::query(&query)
        .bind(values)
        .fetch_all(pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to query {}: {}", table, e)))?;

    rows.iter().map(decode_row).collect()
}

/// Scan for documents whose `array_field` (a JSONB array of ids) intersects
/// the given id set
async fn fetch_all_containing<E: serde::de::DeserializeOwned>(
    pool: &PgPool,
    table: &str,
    array_field: &str,
    ids: &[RecordId],
) -> Result<Vec<E>, DomainError> {
    let query = format!(
        "SELECT data FROM {table} WHERE EXISTS (\
         SELECT 1 FROM jsonb_array_elements_text(data->'{array_field}') elem \
         WHERE elem = ANY($1))"
    );

    let id_strings: Vec<String> = ids.iter().map(|id| id.to_string()).collect();

    let rows = sqlx::query(&query)
        .bind(id_strings)
        .fetch_all(pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to query {}: {}", table, e)))?;

    rows.iter().map(decode_row).collect()
}

async fn replace_array_field(
    pool: &PgPool,
    table: &str,
    array_field: &str,
    id: &RecordId,
    ids: &[RecordId],
) -> Result<(), DomainError> {
    let query = format!(
        "UPDATE {table} SET data = jsonb_set(jsonb_set(data, '{{{array_field}}}', $2), \
         '{{modified}}', $3) WHERE key = $1"
    );

    let values = encode(&ids)?;
    let modified = encode(&Utc::now())?;

    let result = sqlx::query(&query)
        .bind(id.as_uuid())
        .bind(values)
        .bind(modified)
        .execute(pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update {}: {}", table, e)))?;

    if result.rows_affected() == 0 {
        return Err(DomainError::not_found(format!(
            "Record '{}' not found in {}",
            id, table
        )));
    }

    Ok(())
}

async fn fetch_by_key<E: serde::de::DeserializeOwned>(
    pool: &PgPool,
    table: &str,
    id: &RecordId,
) -> Result<Option<E>, DomainError> {
    let query = format!("SELECT data FROM {} WHERE key = $1", table);

    let row = sqlx::query(&query)
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to query {}: {}", table, e)))?;

    row.map(|r| decode_row(&r)).transpose()
}

async fn insert<E: serde::Serialize>(
    pool: &PgPool,
    table: &str,
    id: &RecordId,
    entity: &E,
    what: &str,
) -> Result<(), DomainError> {
    let query = format!("INSERT INTO {} (key, data) VALUES ($1, $2)", table);

    sqlx::query(&query)
        .bind(id.as_uuid())
        .bind(encode(entity)?)
        .execute(pool)
        .await
        .map_err(|e| map_insert_error(e, what))?;

    Ok(())
}

async fn delete_by_key(pool: &PgPool, table: &str, id: &RecordId) -> Result<bool, DomainError> {
    let query = format!("DELETE FROM {} WHERE key = $1", table);

    let result = sqlx::query(&query)
        .bind(id.as_uuid())
        .execute(pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to delete from {}: {}", table, e)))?;

    Ok(result.rows_affected() > 0)
}

/// PostgreSQL attendee repository
#[derive(Debug, Clone)]
pub struct PostgresAttendeeRepository {
    pool: PgPool,
}

impl PostgresAttendeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendeeRepository for PostgresAttendeeRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Attendee>, DomainError> {
        fetch_one_by_text_field(&self.pool, "attendees", "registration_email", email).await
    }

    async fn find_by_handle(
        &self,
        handle: &DirectoryHandle,
    ) -> Result<Option<Attendee>, DomainError> {
        fetch_one_by_text_field(&self.pool, "attendees", "directory_handle", handle.as_str())
            .await
    }

    async fn create(&self, attendee: Attendee) -> Result<Attendee, DomainError> {
        insert(&self.pool, "attendees", &attendee.id, &attendee, "Attendee").await?;
        Ok(attendee)
    }
}

/// PostgreSQL user repository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &RecordId) -> Result<Option<User>, DomainError> {
        fetch_by_key(&self.pool, "users", id).await
    }

    async fn find_by_handle(
        &self,
        handle: &DirectoryHandle,
    ) -> Result<Option<User>, DomainError> {
        fetch_one_by_text_field(&self.pool, "users", "handle", handle.as_str()).await
    }

    async fn find_by_handles(
        &self,
        handles: &[DirectoryHandle],
    ) -> Result<Vec<User>, DomainError> {
        let values = handles.iter().map(|h| h.as_str().to_string()).collect();
        fetch_all_by_text_field(&self.pool, "users", "handle", values).await
    }

    async fn find_by_ids(&self, ids: &[RecordId]) -> Result<Vec<User>, DomainError> {
        let query = "SELECT data FROM users WHERE key = ANY($1)";
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query(query)
            .bind(uuids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to query users: {}", e)))?;

        rows.iter().map(decode_row).collect()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        insert(&self.pool, "users", user.id(), &user, "User").await?;
        Ok(user)
    }
}

/// PostgreSQL team repository
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn get(&self, id: &RecordId) -> Result<Option<Team>, DomainError> {
        fetch_by_key(&self.pool, "teams", id).await
    }

    async fn find_by_slug(&self, slug: &TeamSlug) -> Result<Option<Team>, DomainError> {
        fetch_one_by_text_field(&self.pool, "teams", "slug", slug.as_str()).await
    }

    async fn find_by_member(&self, user_id: &RecordId) -> Result<Option<Team>, DomainError> {
        let teams: Vec<Team> =
            fetch_all_containing(&self.pool, "teams", "members", &[*user_id]).await?;
        Ok(teams.into_iter().next())
    }

    async fn find_containing_entries(
        &self,
        hack_ids: &[RecordId],
    ) -> Result<Vec<Team>, DomainError> {
        fetch_all_containing(&self.pool, "teams", "entries", hack_ids).await
    }

    async fn list(&self, name: Option<&str>) -> Result<Vec<Team>, DomainError> {
        match name {
            Some(name) => {
                fetch_all_by_text_field(&self.pool, "teams", "name", vec![name.to_string()])
                    .await
            }
            None => {
                let rows = sqlx::query("SELECT data FROM teams ORDER BY data->>'name'")
                    .fetch_all(&self.pool)
                    .await
                    .map_err(|e| {
                        DomainError::storage(format!("Failed to query teams: {}", e))
                    })?;

                rows.iter().map(decode_row).collect()
            }
        }
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        insert(&self.pool, "teams", team.id(), &team, "Team").await?;
        Ok(team)
    }

    async fn update_entries(
        &self,
        id: &RecordId,
        entries: Vec<RecordId>,
    ) -> Result<(), DomainError> {
        replace_array_field(&self.pool, "teams", "entries", id, &entries).await
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, DomainError> {
        delete_by_key(&self.pool, "teams", id).await
    }
}

/// PostgreSQL hack repository
#[derive(Debug, Clone)]
pub struct PostgresHackRepository {
    pool: PgPool,
}

impl PostgresHackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HackRepository for PostgresHackRepository {
    async fn get(&self, id: &RecordId) -> Result<Option<Hack>, DomainError> {
        fetch_by_key(&self.pool, "hacks", id).await
    }

    async fn find_by_slug(&self, slug: &HackSlug) -> Result<Option<Hack>, DomainError> {
        fetch_one_by_text_field(&self.pool, "hacks", "slug", slug.as_str()).await
    }

    async fn find_by_slugs(&self, slugs: &[HackSlug]) -> Result<Vec<Hack>, DomainError> {
        let values = slugs.iter().map(|s| s.as_str().to_string()).collect();
        fetch_all_by_text_field(&self.pool, "hacks", "slug", values).await
    }

    async fn find_by_ids(&self, ids: &[RecordId]) -> Result<Vec<Hack>, DomainError> {
        let query = "SELECT data FROM hacks WHERE key = ANY($1)";
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query(query)
            .bind(uuids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to query hacks: {}", e)))?;

        rows.iter().map(decode_row).collect()
    }

    async fn find_containing_challenges(
        &self,
        challenge_ids: &[RecordId],
    ) -> Result<Vec<Hack>, DomainError> {
        fetch_all_containing(&self.pool, "hacks", "challenges", challenge_ids).await
    }

    async fn list(&self) -> Result<Vec<Hack>, DomainError> {
        let rows = sqlx::query("SELECT data FROM hacks ORDER BY data->>'name'")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to query hacks: {}", e)))?;

        rows.iter().map(decode_row).collect()
    }

    async fn create(&self, hack: Hack) -> Result<Hack, DomainError> {
        insert(&self.pool, "hacks", hack.id(), &hack, "Hack").await?;
        Ok(hack)
    }

    async fn update_challenges(
        &self,
        id: &RecordId,
        challenges: Vec<RecordId>,
    ) -> Result<(), DomainError> {
        replace_array_field(&self.pool, "hacks", "challenges", id, &challenges).await
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, DomainError> {
        delete_by_key(&self.pool, "hacks", id).await
    }
}

/// PostgreSQL challenge repository
#[derive(Debug, Clone)]
pub struct PostgresChallengeRepository {
    pool: PgPool,
}

impl PostgresChallengeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChallengeRepository for PostgresChallengeRepository {
    async fn find_by_slug(
        &self,
        slug: &ChallengeSlug,
    ) -> Result<Option<Challenge>, DomainError> {
        fetch_one_by_text_field(&self.pool, "challenges", "slug", slug.as_str()).await
    }

    async fn find_by_slugs(
        &self,
        slugs: &[ChallengeSlug],
    ) -> Result<Vec<Challenge>, DomainError> {
        let values = slugs.iter().map(|s| s.as_str().to_string()).collect();
        fetch_all_by_text_field(&self.pool, "challenges", "slug", values).await
    }

    async fn find_by_ids(&self, ids: &[RecordId]) -> Result<Vec<Challenge>, DomainError> {
        let query = "SELECT data FROM challenges WHERE key = ANY($1)";
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query(query)
            .bind(uuids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to query challenges: {}", e)))?;

        rows.iter().map(decode_row).collect()
    }

    async fn list(&self) -> Result<Vec<Challenge>, DomainError> {
        let rows = sqlx::query("SELECT data FROM challenges ORDER BY data->>'name'")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to query challenges: {}", e)))?;

        rows.iter().map(decode_row).collect()
    }

    async fn create(&self, challenge: Challenge) -> Result<Challenge, DomainError> {
        insert(&self.pool, "challenges", &challenge.id, &challenge, "Challenge").await?;
        Ok(challenge)
    }
}
