//! PostgreSQL implementation of CustomerRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use meter_core::entities::Customer;
use meter_core::traits::{CustomerMutation, CustomerRepository, RepoResult};
use meter_core::value_objects::{CustomerId, UserId};

use crate::mappers::CustomerUpdate;
use crate::models::CustomerModel;

use super::error::{customer_not_found, map_db_error};

/// PostgreSQL implementation of CustomerRepository
#[derive(Clone)]
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    /// Create a new PgCustomerRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        let result = sqlx::query_as::<_, CustomerModel>(
            r"
            SELECT id, user_id, nic_number, watts_consumed, account_balance, should_get_service,
                   previous_voltage_reading, previous_current_reading, created_at, updated_at
            FROM customers
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Customer::from))
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Option<Customer>> {
        let result = sqlx::query_as::<_, CustomerModel>(
            r"
            SELECT id, user_id, nic_number, watts_consumed, account_balance, should_get_service,
                   previous_voltage_reading, previous_current_reading, created_at, updated_at
            FROM customers
            WHERE user_id = $1
            ",
        )
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Customer::from))
    }

    #[instrument(skip(self))]
    async fn find_by_nic(&self, nic_number: &str) -> RepoResult<Option<Customer>> {
        let result = sqlx::query_as::<_, CustomerModel>(
            r"
            SELECT id, user_id, nic_number, watts_consumed, account_balance, should_get_service,
                   previous_voltage_reading, previous_current_reading, created_at, updated_at
            FROM customers
            WHERE nic_number = $1
            ",
        )
        .bind(nic_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Customer::from))
    }

    #[instrument(skip(self, mutation))]
    async fn update_with(
        &self,
        id: CustomerId,
        mutation: &mut CustomerMutation<'_>,
    ) -> RepoResult<Customer> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row lock: concurrent writers queue here and read our committed state.
        let mut customer = sqlx::query_as::<_, CustomerModel>(
            r"
            SELECT id, user_id, nic_number, watts_consumed, account_balance, should_get_service,
                   previous_voltage_reading, previous_current_reading, created_at, updated_at
            FROM customers
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .map(Customer::from)
        .ok_or_else(|| customer_not_found(id))?;

        mutation(&mut customer)?;

        let update = CustomerUpdate::new(&customer);
        let model = sqlx::query_as::<_, CustomerModel>(
            r"
            UPDATE customers
            SET watts_consumed = $2,
                account_balance = $3,
                should_get_service = $4,
                previous_voltage_reading = $5,
                previous_current_reading = $6,
                updated_at = $7
            WHERE id = $1
            RETURNING id, user_id, nic_number, watts_consumed, account_balance, should_get_service,
                      previous_voltage_reading, previous_current_reading, created_at, updated_at
            ",
        )
        .bind(update.id)
        .bind(update.watts_consumed)
        .bind(update.account_balance)
        .bind(update.should_get_service)
        .bind(update.previous_voltage_reading)
        .bind(update.previous_current_reading)
        .bind(update.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(Customer::from(model))
    }
}
