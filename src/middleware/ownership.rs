// src/middleware/ownership.rs

use axum::{
    extract::{FromRef, FromRequestParts, Path},
    http::request::Parts,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::store::Store,
};

pub const STORE_PATH_PARAM: &str = "storeId";

/// Id malformado ou ausente é tratado como loja inexistente.
pub fn store_id_from_params(params: &HashMap<String, String>) -> Result<Uuid, AppError> {
    params
        .get(STORE_PATH_PARAM)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or(AppError::StoreNotFound)
}

/// Loja do path (`{storeId}`) já conferida contra o usuário autenticado.
/// Loja inexistente ou de outro dono: 404.
pub struct OwnedStore(pub Store);

impl<S> FromRequestParts<S> for OwnedStore
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::StoreNotFound)?;
        let store_id = store_id_from_params(&params)?;

        let store = app_state.store_service.get_owned(store_id, user.id).await?;
        Ok(OwnedStore(store))
    }
}
