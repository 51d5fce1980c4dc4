//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{Customer, NewUser, User};
use crate::error::DomainError;
use crate::value_objects::{CustomerId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// A change applied to the latest committed state of a customer
///
/// Returning an error aborts the transaction and leaves the record untouched.
/// Implementations may invoke the mutation more than once if they retry.
pub type CustomerMutation<'a> = dyn FnMut(&mut Customer) -> RepoResult<()> + Send + 'a;

/// Which users a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserFilter {
    #[default]
    All,
    Admins,
    Customers,
}

impl UserFilter {
    pub fn matches(self, user: &User) -> bool {
        match self {
            Self::All => true,
            Self::Admins => user.is_admin(),
            Self::Customers => !user.is_admin(),
        }
    }
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// List users ordered by id
    async fn list(&self, filter: UserFilter) -> RepoResult<Vec<User>>;

    /// Create an administrator
    async fn create_admin(&self, user: &NewUser, password_hash: &str) -> RepoResult<User>;

    /// Create a customer user and its metering record in one transaction
    async fn create_customer(
        &self,
        user: &NewUser,
        password_hash: &str,
        nic_number: &str,
    ) -> RepoResult<(User, Customer)>;

    /// Update name and email
    async fn update_profile(&self, id: UserId, name: &str, email: &str) -> RepoResult<User>;

    /// Update a customer user's name, email and NIC number in one transaction
    async fn update_customer_profile(
        &self,
        id: UserId,
        name: &str,
        email: &str,
        nic_number: &str,
    ) -> RepoResult<(User, Customer)>;

    /// Delete a user together with the customer it owns
    async fn delete(&self, id: UserId) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>>;
}

// ============================================================================
// Customer Repository
// ============================================================================

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Find customer by ID
    async fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>>;

    /// Find the customer owned by a user
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Option<Customer>>;

    /// Find customer by NIC number
    async fn find_by_nic(&self, nic_number: &str) -> RepoResult<Option<Customer>>;

    /// Lock the customer, apply `mutation` to it, and commit the result
    ///
    /// Concurrent calls for the same customer are serialized, so every
    /// mutation sees the state committed by the previous one.
    async fn update_with(
        &self,
        id: CustomerId,
        mutation: &mut CustomerMutation<'_>,
    ) -> RepoResult<Customer>;
}
