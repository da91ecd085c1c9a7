use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::domain::entities::User;
use crate::domain::repositories::{UserRepository, user_repository::UserRepositoryError};
use crate::infrastructure::database::models::{NewUserModel, UserModel};
use crate::infrastructure::database::schema::users::dsl::*;
use crate::infrastructure::database::{DatabaseError, DbPool, run_blocking};

pub struct PostgresUserRepository {
    pool: DbPool,
}

impl PostgresUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: DatabaseError) -> UserRepositoryError {
    match error {
        DatabaseError::QueryError(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            info,
        )) => UserRepositoryError::DuplicateError(info.message().to_string()),
        other => UserRepositoryError::DatabaseError(other.to_string()),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn save(&self, user: &User) -> Result<(), UserRepositoryError> {
        let new_user = NewUserModel::from(user);

        // A concurrent insert of the same id wins; email/username clashes still fail.
        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(users)
                .values(&new_user)
                .on_conflict(id)
                .do_nothing()
                .execute(conn)
        })
        .await
        .map_err(map_error)?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        let result = run_blocking(&self.pool, move |conn| {
            users
                .find(user_id)
                .select(UserModel::as_select())
                .first(conn)
                .optional()
        })
        .await
        .map_err(map_error)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email_and_username(
        &self,
        user_email: &str,
        user_name: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let user_email = user_email.to_string();
        let user_name = user_name.to_string();

        let result = run_blocking(&self.pool, move |conn| {
            users
                .filter(email.eq(user_email))
                .filter(username.eq(user_name))
                .select(UserModel::as_select())
                .first(conn)
                .optional()
        })
        .await
        .map_err(map_error)?;

        Ok(result.map(User::from))
    }
}
