// HTTP handlers for installment endpoints
//
// Endpoints:
// - POST /installments - Create a commitment and schedule its postings
// - POST /installments/preview - Expand a commitment without storing it
// - GET /installments/{id} - Get a commitment
// - GET /installments/{id}/schedule - Scheduled balance updates of a commitment
// - POST /installments/{id}/reschedule - Enqueue missing postings again

use actix_web::{web, HttpResponse};
use serde::Serialize;
use uuid::Uuid;

use crate::core::Result;
use crate::modules::installments::{
    models::{CreateInstallmentMovimentCommand, InstallmentMoviment},
    services::{InstallmentService, ScheduledPosting},
};
use crate::modules::scheduling::ScheduledJob;

#[derive(Debug, Serialize)]
pub struct InstallmentResponse {
    pub id: Uuid,
    pub value: String,
    pub installments_value: String,
    pub months: i32,
    pub start_month: i32,
    pub end_month: i32,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub moviment_type: String,
    pub currency: String,
    pub account_id: Uuid,
    pub user_id: Uuid,
    pub created_on: String,
}

impl From<InstallmentMoviment> for InstallmentResponse {
    fn from(commitment: InstallmentMoviment) -> Self {
        Self {
            id: commitment.id,
            value: commitment.value.to_string(),
            installments_value: commitment.installments_value.to_string(),
            months: commitment.months,
            start_month: commitment.start_month,
            end_month: commitment.end_month,
            description: commitment.description,
            category: commitment.category.to_string(),
            moviment_type: commitment.moviment_type.to_string(),
            currency: commitment.currency.to_string(),
            account_id: commitment.account_id,
            user_id: commitment.user_id,
            created_on: commitment.created_on.to_rfc3339(),
        }
    }
}

/// One posting, either previewed or scheduled
#[derive(Debug, Serialize)]
pub struct PostingResponse {
    pub sequence: i32,
    pub moviment_id: Uuid,
    pub value: String,
    pub description: String,
    pub effective_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl From<ScheduledPosting> for PostingResponse {
    fn from(posting: ScheduledPosting) -> Self {
        Self {
            sequence: posting.sequence,
            moviment_id: posting.moviment.id,
            value: posting.moviment.value.to_string(),
            description: posting.moviment.description,
            effective_date: posting.moviment.created_on.to_rfc3339(),
            status: None,
            attempts: None,
            last_error: None,
        }
    }
}

impl From<ScheduledJob> for PostingResponse {
    fn from(job: ScheduledJob) -> Self {
        Self {
            sequence: job.sequence,
            moviment_id: job.posting.id,
            value: job.posting.value.to_string(),
            description: job.posting.description,
            effective_date: job.run_at.to_rfc3339(),
            status: Some(job.status.to_string()),
            attempts: Some(job.attempts),
            last_error: job.last_error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostingsResponse {
    pub installment_id: Option<Uuid>,
    pub postings: Vec<PostingResponse>,
}

/// POST /installments
///
/// # Request Body
/// ```json
/// {
///   "value": "1200",
///   "months": 12,
///   "start_month": 0,
///   "description": "TV",
///   "category": "shopping",
///   "type": "debit",
///   "account_id": "…",
///   "user_id": "…"
/// }
/// ```
///
/// # Returns
/// - 201: Commitment created, postings scheduled
/// - 400: One or more business rules violated (all listed in `details`)
/// - 404: User or account not found
pub async fn create_installment(
    request: web::Json<CreateInstallmentMovimentCommand>,
    service: web::Data<InstallmentService>,
) -> Result<HttpResponse> {
    let created = service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// POST /installments/preview
pub async fn preview_installment(
    request: web::Json<CreateInstallmentMovimentCommand>,
    service: web::Data<InstallmentService>,
) -> Result<HttpResponse> {
    let postings = service.preview(request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PostingsResponse {
        installment_id: None,
        postings: postings.into_iter().map(PostingResponse::from).collect(),
    }))
}

/// GET /installments/{installment_id}
pub async fn get_installment(
    installment_id: web::Path<Uuid>,
    service: web::Data<InstallmentService>,
) -> Result<HttpResponse> {
    let commitment = service.get(installment_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(InstallmentResponse::from(commitment)))
}

/// GET /installments/{installment_id}/schedule
pub async fn get_schedule(
    installment_id: web::Path<Uuid>,
    service: web::Data<InstallmentService>,
) -> Result<HttpResponse> {
    let id = installment_id.into_inner();
    let jobs = service.schedule_for(id).await?;

    Ok(HttpResponse::Ok().json(PostingsResponse {
        installment_id: Some(id),
        postings: jobs.into_iter().map(PostingResponse::from).collect(),
    }))
}

/// POST /installments/{installment_id}/reschedule
pub async fn reschedule_installment(
    installment_id: web::Path<Uuid>,
    service: web::Data<InstallmentService>,
) -> Result<HttpResponse> {
    let report = service.reschedule(installment_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Configure installment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/installments")
            .route("", web::post().to(create_installment))
            .route("/preview", web::post().to(preview_installment))
            .route("/{installment_id}", web::get().to(get_installment))
            .route("/{installment_id}/schedule", web::get().to(get_schedule))
            .route(
                "/{installment_id}/reschedule",
                web::post().to(reschedule_installment),
            ),
    );
}
