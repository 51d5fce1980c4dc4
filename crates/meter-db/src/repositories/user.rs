//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use meter_core::entities::{Customer, NewUser, User};
use meter_core::error::DomainError;
use meter_core::traits::{RepoResult, UserFilter, UserRepository};
use meter_core::value_objects::UserId;

use crate::models::{CustomerModel, UserModel};

use super::error::{map_db_error, map_write_error, user_not_found};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_user(
        tx: &mut Transaction<'_, Postgres>,
        user: &NewUser,
        password_hash: &str,
    ) -> RepoResult<UserModel> {
        sqlx::query_as::<_, UserModel>(
            r"
            INSERT INTO users (name, email, password_hash, is_admin)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, is_admin, created_at, updated_at
            ",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(password_hash)
        .bind(user.role.is_admin())
        .fetch_one(&mut **tx)
        .await
        .map_err(map_write_error)
    }

    async fn update_user(
        tx: &mut Transaction<'_, Postgres>,
        id: UserId,
        name: &str,
        email: &str,
    ) -> RepoResult<UserModel> {
        sqlx::query_as::<_, UserModel>(
            r"
            UPDATE users
            SET name = $2, email = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, is_admin, created_at, updated_at
            ",
        )
        .bind(id.into_inner())
        .bind(name)
        .bind(email)
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| user_not_found(id))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, name, email, password_hash, is_admin, created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, name, email, password_hash, is_admin, created_at, updated_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: UserFilter) -> RepoResult<Vec<User>> {
        let is_admin = match filter {
            UserFilter::All => None,
            UserFilter::Admins => Some(true),
            UserFilter::Customers => Some(false),
        };

        let rows = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, name, email, password_hash, is_admin, created_at, updated_at
            FROM users
            WHERE $1::BOOLEAN IS NULL OR is_admin = $1
            ORDER BY id
            ",
        )
        .bind(is_admin)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self, password_hash))]
    async fn create_admin(&self, user: &NewUser, password_hash: &str) -> RepoResult<User> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let model = Self::insert_user(&mut tx, user, password_hash).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(User::from(model))
    }

    #[instrument(skip(self, password_hash))]
    async fn create_customer(
        &self,
        user: &NewUser,
        password_hash: &str,
        nic_number: &str,
    ) -> RepoResult<(User, Customer)> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let user_model = Self::insert_user(&mut tx, user, password_hash).await?;

        let customer_model = sqlx::query_as::<_, CustomerModel>(
            r"
            INSERT INTO customers (user_id, nic_number)
            VALUES ($1, $2)
            RETURNING id, user_id, nic_number, watts_consumed, account_balance, should_get_service,
                      previous_voltage_reading, previous_current_reading, created_at, updated_at
            ",
        )
        .bind(user_model.id)
        .bind(nic_number)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok((User::from(user_model), Customer::from(customer_model)))
    }

    #[instrument(skip(self))]
    async fn update_profile(&self, id: UserId, name: &str, email: &str) -> RepoResult<User> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let model = Self::update_user(&mut tx, id, name, email).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(User::from(model))
    }

    #[instrument(skip(self))]
    async fn update_customer_profile(
        &self,
        id: UserId,
        name: &str,
        email: &str,
        nic_number: &str,
    ) -> RepoResult<(User, Customer)> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let user_model = Self::update_user(&mut tx, id, name, email).await?;

        let customer_model = sqlx::query_as::<_, CustomerModel>(
            r"
            UPDATE customers
            SET nic_number = $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING id, user_id, nic_number, watts_consumed, account_balance, should_get_service,
                      previous_voltage_reading, previous_current_reading, created_at, updated_at
            ",
        )
        .bind(id.into_inner())
        .bind(nic_number)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_write_error)?
        .ok_or(DomainError::CustomerNotFoundForUser(id))?;

        tx.commit().await.map_err(map_db_error)?;

        Ok((User::from(user_model), Customer::from(customer_model)))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: UserId) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("DELETE FROM customers WHERE user_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the customer delete.
            return Err(user_not_found(id));
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>> {
        let result = sqlx::query_scalar::<_, String>(
            r"
            SELECT password_hash FROM users WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }
}
