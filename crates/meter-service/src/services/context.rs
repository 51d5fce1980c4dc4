//! Service context - dependency container for services
//!
//! Holds the repositories, the token service, the tariff and the clock
//! needed by services.

use std::sync::Arc;

use meter_common::auth::JwtService;
use meter_core::traits::{CustomerRepository, UserRepository};
use meter_core::{Clock, SystemClock, TariffSchedule};
use meter_db::PgPool;

use super::error::{ServiceError, ServiceResult};
use super::retry::RetryPolicy;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - User and customer repositories
/// - JWT service for authentication
/// - The tariff schedule and the clock it is sampled against
/// - The retry policy for conflicting customer updates
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool, absent on the in-memory backend
    pool: Option<PgPool>,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    customer_repo: Arc<dyn CustomerRepository>,

    // Services
    jwt_service: Arc<JwtService>,

    // Metering
    tariff: TariffSchedule,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        pool: Option<PgPool>,
        user_repo: Arc<dyn UserRepository>,
        customer_repo: Arc<dyn CustomerRepository>,
        jwt_service: Arc<JwtService>,
        tariff: TariffSchedule,
        clock: Arc<dyn Clock>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            pool,
            user_repo,
            customer_repo,
            jwt_service,
            tariff,
            clock,
            retry,
        }
    }

    // === Database Pool ===

    /// Get the PostgreSQL connection pool, if the context runs on one
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the customer repository
    pub fn customer_repo(&self) -> &dyn CustomerRepository {
        self.customer_repo.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    // === Metering ===

    pub fn tariff(&self) -> &TariffSchedule {
        &self.tariff
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }

    /// Unit price in effect right now
    pub fn current_price(&self) -> f64 {
        self.tariff.current_price(self.clock())
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("tariff", &self.tariff)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    customer_repo: Option<Arc<dyn CustomerRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    tariff: Option<TariffSchedule>,
    clock: Option<Arc<dyn Clock>>,
    retry: Option<RetryPolicy>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            user_repo: None,
            customer_repo: None,
            jwt_service: None,
            tariff: None,
            clock: None,
            retry: None,
        }
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn customer_repo(mut self, repo: Arc<dyn CustomerRepository>) -> Self {
        self.customer_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn tariff(mut self, tariff: TariffSchedule) -> Self {
        self.tariff = Some(tariff);
        self
    }

    /// Defaults to the local system clock
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Defaults to [`RetryPolicy::default`]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.pool,
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.customer_repo
                .ok_or_else(|| ServiceError::validation("customer_repo is required"))?,
            self.jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            self.tariff
                .ok_or_else(|| ServiceError::validation("tariff is required"))?,
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            self.retry.unwrap_or_default(),
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
