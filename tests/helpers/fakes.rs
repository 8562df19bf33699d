// In-memory implementations of the repository and queue traits
//
// Every fake records its calls in a shared `CallLog` so tests can assert
// which collaborators were reached, and in which order.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use finsys::accounts::{Account, AccountRepository};
use finsys::app::AppServices;
use finsys::config::SchedulerConfig;
use finsys::core::{AppError, Currency, Result};
use finsys::installments::{InstallmentMoviment, InstallmentRepository, InstallmentService};
use finsys::modules::balances::BalanceUpdater;
use finsys::modules::moviments::Moviment;
use finsys::modules::users::{User, UserRepository};
use finsys::modules::scheduling::repositories::RUNNING_LEASE_MINUTES;
use finsys::scheduling::{EnqueueOutcome, JobQueue, JobStatus, PostingScheduler, ScheduledJob};

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<&'static str>>>);

impl CallLog {
    pub fn record(&self, call: &'static str) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|c| **c == call).count()
    }
}

pub struct InMemoryUsers {
    log: CallLog,
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.log.record("users.find_by_id");
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }
}

pub struct InMemoryAccounts {
    log: CallLog,
    accounts: Mutex<HashMap<Uuid, Account>>,
}

#[async_trait]
impl AccountRepository for InMemoryAccounts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        self.log.record("accounts.find_by_id");
        Ok(self.accounts.lock().unwrap().get(&id).map(|a| Account {
            moviments: Vec::new(),
            ..a.clone()
        }))
    }

    async fn find_with_moviments(&self, id: Uuid) -> Result<Option<Account>> {
        self.log.record("accounts.find_with_moviments");
        Ok(self.accounts.lock().unwrap().get(&id).cloned())
    }
}

pub struct InMemoryInstallments {
    log: CallLog,
    rows: Mutex<HashMap<Uuid, InstallmentMoviment>>,
}

impl InMemoryInstallments {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl InstallmentRepository for InMemoryInstallments {
    async fn insert(&self, commitment: &InstallmentMoviment) -> Result<()> {
        self.log.record("installments.insert");
        self.rows
            .lock()
            .unwrap()
            .insert(commitment.id, commitment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InstallmentMoviment>> {
        self.log.record("installments.find_by_id");
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }
}

/// Job queue keyed on idempotency key, with optional forced failures.
///
/// Claiming follows the MySQL queue: due pending/failed jobs plus running
/// jobs whose lease has expired.
pub struct InMemoryJobQueue {
    log: CallLog,
    jobs: Mutex<Vec<ScheduledJob>>,
    /// Enqueues that succeed before every further enqueue fails
    fail_after: Mutex<Option<usize>>,
    failing_completions: Mutex<u32>,
}

impl InMemoryJobQueue {
    pub fn jobs(&self) -> Vec<ScheduledJob> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn job(&self, idempotency_key: &str) -> Option<ScheduledJob> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| j.idempotency_key == idempotency_key)
            .cloned()
    }

    pub fn fail_enqueues_after(&self, successes: usize) {
        *self.fail_after.lock().unwrap() = Some(successes);
    }

    pub fn stop_failing(&self) {
        *self.fail_after.lock().unwrap() = None;
    }

    pub fn fail_next_completions(&self, times: u32) {
        *self.failing_completions.lock().unwrap() = times;
    }

    pub fn count_with_status(&self, status: JobStatus) -> usize {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.status == status)
            .count()
    }

    fn update(&self, id: Uuid, f: impl FnOnce(&mut ScheduledJob)) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| AppError::not_found("Scheduled job not found"))?;
        f(job);
        Ok(())
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job: ScheduledJob) -> Result<EnqueueOutcome> {
        self.log.record("queue.enqueue");

        {
            let mut fail_after = self.fail_after.lock().unwrap();
            if let Some(remaining) = fail_after.as_mut() {
                if *remaining == 0 {
                    return Err(AppError::scheduling("queue unavailable"));
                }
                *remaining -= 1;
            }
        }

        let mut jobs = self.jobs.lock().unwrap();
        if jobs.iter().any(|j| j.idempotency_key == job.idempotency_key) {
            return Ok(EnqueueOutcome::Duplicate);
        }
        jobs.push(job);
        Ok(EnqueueOutcome::Enqueued)
    }

    async fn claim_due(&self, now: DateTime<Utc>, limit: u32) -> Result<Vec<ScheduledJob>> {
        let lease_expired = now - Duration::minutes(RUNNING_LEASE_MINUTES);
        let mut jobs = self.jobs.lock().unwrap();
        let mut due: Vec<&mut ScheduledJob> = jobs
            .iter_mut()
            .filter(|j| {
                j.is_due(now) || (j.status == JobStatus::Running && j.updated_at <= lease_expired)
            })
            .collect();
        due.sort_by_key(|j| j.run_at);

        Ok(due
            .into_iter()
            .take(limit as usize)
            .map(|job| {
                job.status = JobStatus::Running;
                job.updated_at = now;
                job.clone()
            })
            .collect())
    }

    async fn mark_completed(&self, id: Uuid, now: DateTime<Utc>) -> Result<()> {
        {
            let mut failing = self.failing_completions.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(AppError::internal("queue connection lost"));
            }
        }

        self.update(id, |job| {
            job.status = JobStatus::Completed;
            job.last_error = None;
            job.updated_at = now;
        })
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        attempts: i32,
        error: &str,
        retry_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.update(id, |job| {
            job.attempts = attempts;
            job.last_error = Some(error.to_string());
            job.updated_at = now;
            match retry_at {
                Some(at) => {
                    job.status = JobStatus::Failed;
                    job.run_at = at;
                }
                None => job.status = JobStatus::Dead,
            }
        })
    }

    async fn list_by_commitment(&self, commitment_id: Uuid) -> Result<Vec<ScheduledJob>> {
        let mut jobs: Vec<_> = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.commitment_id == commitment_id)
            .cloned()
            .collect();
        jobs.sort_by_key(|j| j.sequence);
        Ok(jobs)
    }
}

/// Balance updater that keeps balances in memory and can be told to fail
#[derive(Default)]
pub struct RecordingBalanceUpdater {
    applied: Mutex<HashSet<Uuid>>,
    balances: Mutex<HashMap<Uuid, Decimal>>,
    failures_left: Mutex<u32>,
}

impl RecordingBalanceUpdater {
    pub fn fail_next(&self, times: u32) {
        *self.failures_left.lock().unwrap() = times;
    }

    pub fn balance(&self, account_id: Uuid) -> Decimal {
        self.balances
            .lock()
            .unwrap()
            .get(&account_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn applied_count(&self) -> usize {
        self.applied.lock().unwrap().len()
    }
}

#[async_trait]
impl BalanceUpdater for RecordingBalanceUpdater {
    async fn create_or_update_balance(&self, moviment: &Moviment) -> Result<()> {
        {
            let mut failures = self.failures_left.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(AppError::internal("balance store unavailable"));
            }
        }

        if self.applied.lock().unwrap().insert(moviment.id) {
            *self
                .balances
                .lock()
                .unwrap()
                .entry(moviment.account_id)
                .or_insert(Decimal::ZERO) += moviment.signed_value();
        }
        Ok(())
    }
}

/// All fakes wired together, sharing one call log
pub struct TestContext {
    pub log: CallLog,
    pub users: Arc<InMemoryUsers>,
    pub accounts: Arc<InMemoryAccounts>,
    pub commitments: Arc<InMemoryInstallments>,
    pub queue: Arc<InMemoryJobQueue>,
    pub balances: Arc<RecordingBalanceUpdater>,
}

impl TestContext {
    pub fn new() -> Self {
        let log = CallLog::default();
        Self {
            users: Arc::new(InMemoryUsers {
                log: log.clone(),
                users: Mutex::new(HashMap::new()),
            }),
            accounts: Arc::new(InMemoryAccounts {
                log: log.clone(),
                accounts: Mutex::new(HashMap::new()),
            }),
            commitments: Arc::new(InMemoryInstallments {
                log: log.clone(),
                rows: Mutex::new(HashMap::new()),
            }),
            queue: Arc::new(InMemoryJobQueue {
                log: log.clone(),
                jobs: Mutex::new(Vec::new()),
                fail_after: Mutex::new(None),
                failing_completions: Mutex::new(0),
            }),
            balances: Arc::new(RecordingBalanceUpdater::default()),
            log,
        }
    }

    pub fn seed_user(&self, name: &str) -> User {
        let user = User::new(name.to_string(), format!("{}@example.com", name.to_lowercase()));
        self.users.users.lock().unwrap().insert(user.id, user.clone());
        user
    }

    pub fn seed_account(&self, user: &User, currency: Currency) -> Account {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            user_id: user.id,
            user: Some(user.clone()),
            moviments: Vec::new(),
            currency,
            balance: Decimal::ZERO,
            created_on: now,
            updated_on: now,
        };
        self.accounts
            .accounts
            .lock()
            .unwrap()
            .insert(account.id, account.clone());
        account
    }

    pub fn installment_service(&self) -> InstallmentService {
        InstallmentService::new(
            self.users.clone(),
            self.accounts.clone(),
            self.commitments.clone(),
            PostingScheduler::new(self.queue.clone()),
        )
    }

    pub fn app_services(&self, scheduler: SchedulerConfig) -> AppServices {
        AppServices::assemble(
            self.users.clone(),
            self.accounts.clone(),
            self.commitments.clone(),
            self.queue.clone(),
            self.balances.clone(),
            scheduler,
        )
    }
}
