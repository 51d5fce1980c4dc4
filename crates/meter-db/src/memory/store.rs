use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::instrument;

use meter_core::entities::{Customer, NewUser, User};
use meter_core::error::DomainError;
use meter_core::traits::{
    CustomerMutation, CustomerRepository, RepoResult, UserFilter, UserRepository,
};
use meter_core::value_objects::{CustomerId, UserId};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, StoredUser>,
    customers: BTreeMap<CustomerId, Customer>,
    last_user_id: i64,
    last_customer_id: i64,
}

impl State {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|stored| stored.user.email == email && Some(stored.user.id) != except)
    }

    fn nic_taken(&self, nic_number: &str, except: Option<CustomerId>) -> bool {
        self.customers
            .values()
            .any(|customer| customer.nic_number == nic_number && Some(customer.id) != except)
    }

    fn customer_of(&self, user_id: UserId) -> Option<&Customer> {
        self.customers
            .values()
            .find(|customer| customer.user_id == Some(user_id))
    }

    fn insert_user(&mut self, new_user: &NewUser, password_hash: &str) -> RepoResult<User> {
        if self.email_taken(&new_user.email, None) {
            return Err(DomainError::EmailAlreadyExists);
        }

        self.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: UserId::new(self.last_user_id),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            role: new_user.role,
            created_at: now,
            updated_at: now,
        };

        self.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );

        Ok(user)
    }
}

/// Shared state behind the in-memory repositories
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repository(&self) -> MemoryUserRepository {
        MemoryUserRepository {
            store: self.clone(),
        }
    }

    pub fn customer_repository(&self) -> MemoryCustomerRepository {
        MemoryCustomerRepository {
            store: self.clone(),
        }
    }
}

/// In-memory implementation of UserRepository
#[derive(Debug, Clone)]
pub struct MemoryUserRepository {
    store: MemoryStore,
}

/// In-memory implementation of CustomerRepository
#[derive(Debug, Clone)]
pub struct MemoryCustomerRepository {
    store: MemoryStore,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let state = self.store.state.lock();
        Ok(state.users.get(&id).map(|stored| stored.user.clone()))
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let state = self.store.state.lock();
        Ok(state
            .users
            .values()
            .find(|stored| stored.user.email == email)
            .map(|stored| stored.user.clone()))
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: UserFilter) -> RepoResult<Vec<User>> {
        let state = self.store.state.lock();
        Ok(state
            .users
            .values()
            .filter(|stored| filter.matches(&stored.user))
            .map(|stored| stored.user.clone())
            .collect())
    }

    #[instrument(skip(self, password_hash))]
    async fn create_admin(&self, user: &NewUser, password_hash: &str) -> RepoResult<User> {
        self.store.state.lock().insert_user(user, password_hash)
    }

    #[instrument(skip(self, password_hash))]
    async fn create_customer(
        &self,
        user: &NewUser,
        password_hash: &str,
        nic_number: &str,
    ) -> RepoResult<(User, Customer)> {
        let mut state = self.store.state.lock();

        // Check both constraints before writing anything.
        if state.email_taken(&user.email, None) {
            return Err(DomainError::EmailAlreadyExists);
        }
        if state.nic_taken(nic_number, None) {
            return Err(DomainError::NicNumberAlreadyExists);
        }

        let user = state.insert_user(user, password_hash)?;

        state.last_customer_id += 1;
        let customer = Customer::new(
            CustomerId::new(state.last_customer_id),
            user.id,
            nic_number.to_string(),
        );
        state.customers.insert(customer.id, customer.clone());

        Ok((user, customer))
    }

    #[instrument(skip(self))]
    async fn update_profile(&self, id: UserId, name: &str, email: &str) -> RepoResult<User> {
        let mut state = self.store.state.lock();

        if !state.users.contains_key(&id) {
            return Err(DomainError::UserNotFound(id));
        }
        if state.email_taken(email, Some(id)) {
            return Err(DomainError::EmailAlreadyExists);
        }

        let stored = state
            .users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        stored.user.set_profile(name.to_string(), email.to_string());

        Ok(stored.user.clone())
    }

    #[instrument(skip(self))]
    async fn update_customer_profile(
        &self,
        id: UserId,
        name: &str,
        email: &str,
        nic_number: &str,
    ) -> RepoResult<(User, Customer)> {
        let mut state = self.store.state.lock();

        if !state.users.contains_key(&id) {
            return Err(DomainError::UserNotFound(id));
        }
        let customer_id = state
            .customer_of(id)
            .map(|customer| customer.id)
            .ok_or(DomainError::CustomerNotFoundForUser(id))?;
        if state.email_taken(email, Some(id)) {
            return Err(DomainError::EmailAlreadyExists);
        }
        if state.nic_taken(nic_number, Some(customer_id)) {
            return Err(DomainError::NicNumberAlreadyExists);
        }

        let user = {
            let stored = state
                .users
                .get_mut(&id)
                .ok_or(DomainError::UserNotFound(id))?;
            stored.user.set_profile(name.to_string(), email.to_string());
            stored.user.clone()
        };

        let customer = state
            .customers
            .get_mut(&customer_id)
            .ok_or(DomainError::CustomerNotFound(customer_id))?;
        customer.nic_number = nic_number.to_string();
        customer.touch();

        Ok((user, customer.clone()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: UserId) -> RepoResult<()> {
        let mut state = self.store.state.lock();

        if state.users.remove(&id).is_none() {
            return Err(DomainError::UserNotFound(id));
        }
        state
            .customers
            .retain(|_, customer| customer.user_id != Some(id));

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>> {
        let state = self.store.state.lock();
        Ok(state.users.get(&id).map(|stored| stored.password_hash.clone()))
    }
}

#[async_trait]
impl CustomerRepository for MemoryCustomerRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        let state = self.store.state.lock();
        Ok(state.customers.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Option<Customer>> {
        let state = self.store.state.lock();
        Ok(state.customer_of(user_id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_nic(&self, nic_number: &str) -> RepoResult<Option<Customer>> {
        let state = self.store.state.lock();
        Ok(state
            .customers
            .values()
            .find(|customer| customer.nic_number == nic_number)
            .cloned())
    }

    #[instrument(skip(self, mutation))]
    async fn update_with(
        &self,
        id: CustomerId,
        mutation: &mut CustomerMutation<'_>,
    ) -> RepoResult<Customer> {
        let mut state = self.store.state.lock();

        let current = state
            .customers
            .get(&id)
            .ok_or(DomainError::CustomerNotFound(id))?;

        // Mutate a copy so a failed mutation leaves the record untouched.
        let mut customer = current.clone();
        mutation(&mut customer)?;
        state.customers.insert(id, customer.clone());

        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repos() -> (MemoryUserRepository, MemoryCustomerRepository) {
        let store = MemoryStore::new();
        (store.user_repository(), store.customer_repository())
    }

    #[tokio::test]
    async fn test_create_customer_sets_initial_state() {
        let (users, customers) = repos();

        let (user, customer) = users
            .create_customer(&NewUser::customer("Nimal", "nimal@example.com"), "hash", "1234567890123")
            .await
            .unwrap();

        assert!(!user.is_admin());
        assert_eq!(customer.user_id, Some(user.id));
        assert_eq!(customer.account_balance, 0.0);
        assert!(!customer.should_get_service);

        let found = customers.find_by_user(user.id).await.unwrap().unwrap();
        assert_eq!(found.id, customer.id);
        assert_eq!(
            users.get_password_hash(user.id).await.unwrap().as_deref(),
            Some("hash")
        );
    }

    #[tokio::test]
    async fn test_unique_email_and_nic() {
        let (users, _) = repos();
        users
            .create_customer(&NewUser::customer("A", "a@example.com"), "h", "1111111111111")
            .await
            .unwrap();

        let err = users
            .create_admin(&NewUser::admin("B", "a@example.com"), "h")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EmailAlreadyExists));

        let err = users
            .create_customer(&NewUser::customer("C", "c@example.com"), "h", "1111111111111")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NicNumberAlreadyExists));

        // The failed customer creation left no user behind.
        assert!(users.find_by_email("c@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_profile_allows_own_email() {
        let (users, _) = repos();
        let (user, _) = users
            .create_customer(&NewUser::customer("A", "a@example.com"), "h", "1111111111111")
            .await
            .unwrap();
        users
            .create_admin(&NewUser::admin("B", "b@example.com"), "h")
            .await
            .unwrap();

        let (updated, customer) = users
            .update_customer_profile(user.id, "A2", "a@example.com", "1111111111111")
            .await
            .unwrap();
        assert_eq!(updated.name, "A2");
        assert_eq!(customer.nic_number, "1111111111111");

        let err = users
            .update_profile(user.id, "A3", "b@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EmailAlreadyExists));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_customer() {
        let (users, customers) = repos();
        let (user, customer) = users
            .create_customer(&NewUser::customer("A", "a@example.com"), "h", "1111111111111")
            .await
            .unwrap();

        users.delete(user.id).await.unwrap();

        assert!(users.find_by_id(user.id).await.unwrap().is_none());
        assert!(customers.find_by_id(customer.id).await.unwrap().is_none());
        assert!(matches!(
            users.delete(user.id).await,
            Err(DomainError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_with_failed_mutation_leaves_record() {
        let (users, customers) = repos();
        let (_, customer) = users
            .create_customer(&NewUser::customer("A", "a@example.com"), "h", "1111111111111")
            .await
            .unwrap();

        let err = customers
            .update_with(customer.id, &mut |c: &mut Customer| -> RepoResult<()> {
                c.account_balance = 99.0;
                Err(DomainError::invalid_field("amount", "rejected"))
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let stored = customers.find_by_id(customer.id).await.unwrap().unwrap();
        assert_eq!(stored.account_balance, 0.0);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let (users, _) = repos();
        users
            .create_admin(&NewUser::admin("Admin", "admin@example.com"), "h")
            .await
            .unwrap();
        users
            .create_customer(&NewUser::customer("A", "a@example.com"), "h", "1111111111111")
            .await
            .unwrap();

        assert_eq!(users.list(UserFilter::All).await.unwrap().len(), 2);
        assert_eq!(users.list(UserFilter::Admins).await.unwrap().len(), 1);
        let customers = users.list(UserFilter::Customers).await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].email, "a@example.com");
    }
}
