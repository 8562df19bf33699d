// HTTP handlers for account endpoints
//
// Endpoints:
// - GET /accounts/{id} - Account aggregate with its ledger entries

use actix_web::{web, HttpResponse};
use serde::Serialize;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::accounts::{models::Account, repositories::AccountRepository};
use crate::modules::moviments::Moviment;

#[derive(Debug, Serialize)]
pub struct MovimentResponse {
    pub id: Uuid,
    pub value: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub moviment_type: String,
    pub created_on: String,
}

impl From<Moviment> for MovimentResponse {
    fn from(moviment: Moviment) -> Self {
        Self {
            id: moviment.id,
            value: moviment.value.to_string(),
            description: moviment.description,
            category: moviment.category.to_string(),
            moviment_type: moviment.moviment_type.to_string(),
            created_on: moviment.created_on.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub currency: String,
    pub balance: String,
    pub created_on: String,
    pub updated_on: String,
    pub moviments: Vec<MovimentResponse>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            user_id: account.user_id,
            user_name: account.user.map(|u| u.name),
            currency: account.currency.to_string(),
            balance: account.balance.to_string(),
            created_on: account.created_on.to_rfc3339(),
            updated_on: account.updated_on.to_rfc3339(),
            moviments: account
                .moviments
                .into_iter()
                .map(MovimentResponse::from)
                .collect(),
        }
    }
}

/// GET /accounts/{account_id}
///
/// # Returns
/// - 200: Account with moviments
/// - 404: Account not found
pub async fn get_account(
    account_id: web::Path<Uuid>,
    accounts: web::Data<dyn AccountRepository>,
) -> Result<HttpResponse> {
    let account = accounts
        .find_with_moviments(account_id.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;

    Ok(HttpResponse::Ok().json(AccountResponse::from(account)))
}

/// Configure account routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/accounts/{account_id}", web::get().to(get_account));
}
