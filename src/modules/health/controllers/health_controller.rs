use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::config::SchedulerConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: bool,
    /// Whether this instance applies scheduled balance updates
    pub job_runner: bool,
    /// Balance updates that exhausted their attempts; absent when the
    /// database is unreachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_jobs: Option<i64>,
}

/// GET /health - Liveness check, no dependency lookups
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /ready - 503 while the database is unreachable
pub async fn readiness_check(
    pool: web::Data<MySqlPool>,
    scheduler: web::Data<SchedulerConfig>,
) -> impl Responder {
    let dead_jobs = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM scheduled_jobs WHERE status = 'dead'",
    )
    .fetch_one(pool.get_ref())
    .await;

    let response = match dead_jobs {
        Ok(count) => {
            if count > 0 {
                tracing::warn!(dead_jobs = count, "Dead balance update jobs present");
            }
            ReadinessResponse {
                ready: true,
                database: true,
                job_runner: scheduler.enabled,
                dead_jobs: Some(count),
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Database readiness check failed");
            ReadinessResponse {
                ready: false,
                database: false,
                job_runner: scheduler.enabled,
                dead_jobs: None,
            }
        }
    };

    if response.ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}
