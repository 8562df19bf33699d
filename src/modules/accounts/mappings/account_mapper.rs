use crate::core::{parse_id, AppError, Currency, Result};
use crate::modules::accounts::entities::{AccountEntity, MovimentEntity};
use crate::modules::accounts::models::Account;
use crate::modules::moviments::{Category, Moviment, MovimentType};
use crate::modules::users::User;

/// Map a loaded account entity into the domain aggregate.
///
/// An absent entity maps to an absent account. The user relation is mapped
/// when loaded, every moviment is mapped, and a missing `updated_on` falls
/// back to `created_on`.
pub fn map_account(entity: Option<AccountEntity>) -> Result<Option<Account>> {
    let Some(entity) = entity else {
        return Ok(None);
    };

    let user = entity.user.map(User::try_from).transpose()?;

    Ok(Some(Account {
        id: parse_id(&entity.id, "accounts.id")?,
        user_id: parse_id(&entity.user_id, "accounts.user_id")?,
        user,
        moviments: map_moviments(entity.moviments)?,
        currency: Currency::try_from(entity.currency).map_err(AppError::Internal)?,
        balance: entity.balance,
        created_on: entity.created_on,
        updated_on: entity.updated_on.unwrap_or(entity.created_on),
    }))
}

pub fn map_moviments(entities: Vec<MovimentEntity>) -> Result<Vec<Moviment>> {
    entities.into_iter().map(Moviment::try_from).collect()
}

impl TryFrom<MovimentEntity> for Moviment {
    type Error = AppError;

    fn try_from(entity: MovimentEntity) -> Result<Self> {
        Ok(Moviment {
            id: parse_id(&entity.id, "moviments.id")?,
            value: entity.value,
            description: entity.description,
            category: Category::try_from(entity.category).map_err(AppError::Internal)?,
            moviment_type: MovimentType::try_from(entity.moviment_type)
                .map_err(AppError::Internal)?,
            account_id: parse_id(&entity.account_id, "moviments.account_id")?,
            user_id: parse_id(&entity.user_id, "moviments.user_id")?,
            created_on: entity.created_on,
        })
    }
}
