//! Application wiring shared by the binary and the HTTP tests

use std::sync::Arc;

use actix_web::web;
use sqlx::MySqlPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{AppConfig, SchedulerConfig};
use crate::modules::{
    accounts::{self, AccountRepository, MySqlAccountRepository},
    balances::{BalanceRepository, BalanceService, BalanceUpdater},
    installments::{self, InstallmentRepository, InstallmentService, MySqlInstallmentRepository},
    scheduling::{JobQueue, JobRunner, MySqlJobQueue, PostingScheduler},
    users::{MySqlUserRepository, UserRepository},
};

/// Services handed to the HTTP layer and the job runner
pub struct AppServices {
    pub installments: web::Data<InstallmentService>,
    pub accounts: web::Data<dyn AccountRepository>,
    pub job_runner: Arc<JobRunner>,
}

impl AppServices {
    /// Build every service on top of MySQL
    pub fn from_pool(pool: MySqlPool, scheduler: SchedulerConfig) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(MySqlUserRepository::new(pool.clone()));
        let accounts: Arc<dyn AccountRepository> =
            Arc::new(MySqlAccountRepository::new(pool.clone()));
        let commitments: Arc<dyn InstallmentRepository> =
            Arc::new(MySqlInstallmentRepository::new(pool.clone()));
        let queue: Arc<dyn JobQueue> = Arc::new(MySqlJobQueue::new(pool.clone()));
        let balances: Arc<dyn BalanceUpdater> =
            Arc::new(BalanceService::new(BalanceRepository::new(pool)));

        Self::assemble(users, accounts, commitments, queue, balances, scheduler)
    }

    /// Build the services from arbitrary repository implementations
    pub fn assemble(
        users: Arc<dyn UserRepository>,
        accounts: Arc<dyn AccountRepository>,
        commitments: Arc<dyn InstallmentRepository>,
        queue: Arc<dyn JobQueue>,
        balances: Arc<dyn BalanceUpdater>,
        scheduler: SchedulerConfig,
    ) -> Self {
        let installment_service = InstallmentService::new(
            users,
            accounts.clone(),
            commitments,
            PostingScheduler::new(queue.clone()),
        );

        Self {
            installments: web::Data::new(installment_service),
            accounts: web::Data::from(accounts),
            job_runner: Arc::new(JobRunner::new(queue, balances, scheduler)),
        }
    }
}

/// Register the API routes (health routes are registered separately)
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(installments::configure)
        .configure(accounts::controllers::configure);
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_tracing(app: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("finsys={},actix_web=info", app.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);

    if app.log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
