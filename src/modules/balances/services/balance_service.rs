use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::core::{AppError, Result};
use crate::modules::balances::repositories::BalanceRepository;
use crate::modules::moviments::Moviment;

/// Applies a posting to its account's running balance
#[async_trait]
pub trait BalanceUpdater: Send + Sync {
    /// Must be safe to call more than once with the same posting
    async fn create_or_update_balance(&self, moviment: &Moviment) -> Result<()>;
}

pub struct BalanceService {
    repository: BalanceRepository,
}

impl BalanceService {
    pub fn new(repository: BalanceRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl BalanceUpdater for BalanceService {
    async fn create_or_update_balance(&self, moviment: &Moviment) -> Result<()> {
        if moviment.value <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Moviment {} has non-positive value {}",
                moviment.id, moviment.value
            )));
        }

        if self.repository.apply_moviment(moviment).await? {
            info!(
                moviment_id = %moviment.id,
                account_id = %moviment.account_id,
                amount = %moviment.signed_value(),
                "Balance updated"
            );
        } else {
            debug!(
                moviment_id = %moviment.id,
                "Moviment already applied, balance unchanged"
            );
        }

        Ok(())
    }
}
