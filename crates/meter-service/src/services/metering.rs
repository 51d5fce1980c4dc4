//! Metering service
//!
//! Applies readings and top-ups to customers and renders bills. Every balance
//! movement runs as one locked read-modify-write against the latest committed
//! customer, retried when the store reports a conflict.

use meter_core::{
    apply_reading, apply_top_up, render_bill, Customer, CustomerId, EligibilityChange,
    MeterReading, RepoResult, UserId,
};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Metering service
pub struct MeteringService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MeteringService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record a reading and debit its cost at the current tariff
    #[instrument(skip(self))]
    pub async fn apply_reading(
        &self,
        customer_id: CustomerId,
        reading: MeterReading,
    ) -> ServiceResult<Customer> {
        // Sampled once, so a retry never bills at a different price
        let price = self.ctx.current_price();
        let repo = self.ctx.customer_repo();

        let (customer, outcome) = self
            .ctx
            .retry()
            .run("apply_reading", || async move {
                let mut outcome = None;
                let customer = repo
                    .update_with(customer_id, &mut |customer: &mut Customer| -> RepoResult<()> {
                        outcome = Some(apply_reading(customer, &reading, price));
                        Ok(())
                    })
                    .await?;
                Ok((customer, outcome))
            })
            .await?;

        if let Some(outcome) = outcome {
            info!(
                customer_id = %customer_id,
                units = outcome.units,
                cost = outcome.cost,
                price,
                balance = customer.account_balance,
                "Reading applied"
            );
            log_eligibility(customer_id, outcome.eligibility);
        }

        Ok(customer)
    }

    /// Credit a customer's balance
    #[instrument(skip(self))]
    pub async fn apply_top_up(&self, customer_id: CustomerId, amount: f64) -> ServiceResult<Customer> {
        let repo = self.ctx.customer_repo();

        let (customer, change) = self
            .ctx
            .retry()
            .run("apply_top_up", || async move {
                let mut change = None;
                let customer = repo
                    .update_with(customer_id, &mut |customer: &mut Customer| -> RepoResult<()> {
                        change = Some(apply_top_up(customer, amount)?);
                        Ok(())
                    })
                    .await?;
                Ok((customer, change))
            })
            .await?;

        info!(
            customer_id = %customer_id,
            amount,
            balance = customer.account_balance,
            "Top-up applied"
        );
        if let Some(change) = change {
            log_eligibility(customer_id, change);
        }

        Ok(customer)
    }

    /// Credit the balance of the customer owned by `user_id`
    #[instrument(skip(self))]
    pub async fn apply_top_up_for_user(&self, user_id: UserId, amount: f64) -> ServiceResult<Customer> {
        let customer = self
            .ctx
            .customer_repo()
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer for user", user_id))?;

        self.apply_top_up(customer.id, amount).await
    }

    /// Render the bill for cumulative consumption at the current tariff
    #[instrument(skip(self))]
    pub async fn generate_bill(&self, customer_id: CustomerId) -> ServiceResult<String> {
        let customer = self.find_customer(customer_id).await?;
        Ok(render_bill(&customer, self.ctx.current_price()))
    }

    /// Whether the customer is currently allowed service
    #[instrument(skip(self))]
    pub async fn should_get_service(&self, customer_id: CustomerId) -> ServiceResult<bool> {
        Ok(self.find_customer(customer_id).await?.should_get_service)
    }

    async fn find_customer(&self, customer_id: CustomerId) -> ServiceResult<Customer> {
        self.ctx
            .customer_repo()
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer", customer_id))
    }
}

fn log_eligibility(customer_id: CustomerId, change: EligibilityChange) {
    match change {
        EligibilityChange::Enabled => info!(customer_id = %customer_id, "Service enabled"),
        EligibilityChange::Disabled => info!(customer_id = %customer_id, "Service disabled"),
        EligibilityChange::Unchanged => {}
    }
}
