use async_trait::async_trait;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use uuid::Uuid;

use crate::domain::entities::Session;
use crate::domain::repositories::SessionRepository;
use crate::domain::repositories::session_repository::{
    ChatTurn, RecordedTurn, SessionRepositoryError,
};
use crate::infrastructure::database::models::{NewMessageModel, NewSessionModel, SessionModel};
use crate::infrastructure::database::schema::{messages, sessions};
use crate::infrastructure::database::{DatabaseError, DbPool, run_blocking};

pub struct PostgresSessionRepository {
    pool: DbPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(session_id: Uuid, error: DatabaseError) -> SessionRepositoryError {
    match error {
        DatabaseError::QueryError(DieselError::NotFound) => {
            SessionRepositoryError::NotFound(session_id)
        }
        other => SessionRepositoryError::DatabaseError(other.to_string()),
    }
}

/// Appends both messages after the current last position and renames or
/// touches the session. Runs inside the caller's transaction with the session
/// row locked, so concurrent turns on one session serialize here.
fn append_turn(
    conn: &mut PgConnection,
    session_id: Uuid,
    turn: ChatTurn,
) -> Result<RecordedTurn, DieselError> {
    let locked: SessionModel = sessions::table
        .find(session_id)
        .select(SessionModel::as_select())
        .for_update()
        .first(conn)?;

    let last_position: Option<i32> = messages::table
        .filter(messages::session_id.eq(session_id))
        .select(max(messages::position))
        .first(conn)?;
    let base = last_position.unwrap_or(0);

    let user_message = turn.user_message.with_position(base + 1);
    let assistant_message = turn.assistant_message.with_position(base + 2);

    diesel::insert_into(messages::table)
        .values(&vec![
            NewMessageModel::from(&user_message),
            NewMessageModel::from(&assistant_message),
        ])
        .execute(conn)?;

    let mut session = Session::from(locked);
    match turn.rename_to {
        Some(new_name) if session.has_default_name() => session.rename(&new_name),
        _ => session.touch(),
    }

    let updated: SessionModel = diesel::update(sessions::table.find(session_id))
        .set((
            sessions::name.eq(session.name()),
            sessions::updated_at.eq(session.updated_at()),
        ))
        .returning(SessionModel::as_returning())
        .get_result(conn)?;

    Ok(RecordedTurn {
        user_message,
        assistant_message,
        session: Session::from(updated),
    })
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn save(&self, session: &Session) -> Result<(), SessionRepositoryError> {
        let new_session = NewSessionModel::from(session);
        let target = session.id();

        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(sessions::table)
                .values(&new_session)
                .execute(conn)
        })
        .await
        .map_err(|e| map_error(target, e))?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> Result<Option<Session>, SessionRepositoryError> {
        let result = run_blocking(&self.pool, move |conn| {
            sessions::table
                .find(session_id)
                .select(SessionModel::as_select())
                .first(conn)
                .optional()
        })
        .await
        .map_err(|e| map_error(session_id, e))?;

        Ok(result.map(Session::from))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Session>, SessionRepositoryError> {
        let models = run_blocking(&self.pool, move |conn| {
            sessions::table
                .filter(sessions::user_id.eq(user_id))
                .order(sessions::updated_at.desc())
                .select(SessionModel::as_select())
                .load(conn)
        })
        .await
        .map_err(|e| SessionRepositoryError::DatabaseError(e.to_string()))?;

        Ok(models.into_iter().map(Session::from).collect())
    }

    async fn delete(&self, session_id: Uuid) -> Result<bool, SessionRepositoryError> {
        // messages are removed by ON DELETE CASCADE
        let deleted_count = run_blocking(&self.pool, move |conn| {
            diesel::delete(sessions::table.find(session_id)).execute(conn)
        })
        .await
        .map_err(|e| map_error(session_id, e))?;

        Ok(deleted_count > 0)
    }

    async fn record_turn(
        &self,
        session_id: Uuid,
        turn: ChatTurn,
    ) -> Result<RecordedTurn, SessionRepositoryError> {
        run_blocking(&self.pool, move |conn| {
            conn.transaction::<_, DieselError, _>(|conn| append_turn(conn, session_id, turn))
        })
        .await
        .map_err(|e| map_error(session_id, e))
    }
}
