use std::{future::Future, pin::Pin};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};

use crate::{
    database::{self, assert},
    error::ServiceError,
    models::users::UserData,
    state::AppState,
};

/// The caller behind the bearer token. List it before any body extractor so
/// unauthenticated requests are rejected before their payload is read.
pub struct AuthUser(pub UserData);

impl FromRequest for AuthUser {
    type Error = ServiceError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    type Config = ();

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { current_user(&req).await.map(AuthUser) })
    }
}

/// Resolves the bearer token on `req` to the user it was issued for.
/// Token checks finish before the first await.
async fn current_user(req: &HttpRequest) -> Result<UserData, ServiceError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| anyhow::anyhow!("application state is not configured"))?;
    let token = crate::utils::bearer_token(req)?;
    let claims = state.tokens.verify(token)?;

    database::run(state, move |conn| {
        assert::find_user(conn, &claims.user_id)?.ok_or(ServiceError::TokenInvalid)
    })
    .await
}

pub fn require_professor(user: &UserData) -> Result<(), ServiceError> {
    if !user.is_professor() {
        return Err(ServiceError::Forbidden("only professors may do this"));
    }
    Ok(())
}

pub fn require_student(user: &UserData) -> Result<(), ServiceError> {
    if !user.is_student() {
        return Err(ServiceError::Forbidden("only students may do this"));
    }
    Ok(())
}
