mod password;
mod requests;
pub mod token;
mod utils;

use crate::{
    database::{self, assert},
    error::ServiceError,
    models::users::UserData,
    protocol::TokenResponse,
    state::AppState,
};
use actix_web::{post, web, HttpResponse};
use anyhow::Context;
use chrono::Utc;
use diesel::{
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};

pub use self::{
    requests::NewUser,
    utils::{require_professor, require_student, AuthUser},
};
use self::{
    password::{hash_password, verify_password},
    requests::{LoginRequest, RegisterRequest},
};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login);
}

crate::route_funcs! {
    (register, post, "/register", Created, info: web::Json<RegisterRequest>),
    (login, post, "/login", Ok, info: web::Json<LoginRequest>),
}

async fn register_impl(
    state: web::Data<AppState>,
    info: web::Json<RegisterRequest>,
) -> Result<TokenResponse, ServiceError> {
    let new_user = info.into_inner().validate()?;
    let user = database::run(&state, move |conn| register_user(conn, new_user)).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "registered user");

    let token = state.tokens.issue(&user.id)?;
    Ok(TokenResponse { token })
}

async fn login_impl(
    state: web::Data<AppState>,
    info: web::Json<LoginRequest>,
) -> Result<TokenResponse, ServiceError> {
    let info = info.into_inner();
    let user = database::run(&state, move |conn| {
        authenticate(conn, &info.email, &info.password)
    })
    .await?;

    let token = state.tokens.issue(&user.id)?;
    Ok(TokenResponse { token })
}

pub fn register_user(conn: &SqliteConnection, new_user: NewUser) -> Result<UserData, ServiceError> {
    use crate::schema::users;

    conn.immediate_transaction(|| {
        assert::assert_email_free(conn, &new_user.email)?;

        let data = UserData {
            id: crate::utils::new_id(),
            email: new_user.email,
            password: hash_password(&new_user.password),
            name: new_user.name,
            role: new_user.role.to_string(),
            created_at: Utc::now().naive_utc(),
        };
        diesel::insert_into(users::table)
            .values(&data)
            .execute(conn)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    ServiceError::DuplicateEmail
                }
                err => err.into(),
            })?;

        Ok(data)
    })
}

pub fn authenticate(
    conn: &SqliteConnection,
    email: &str,
    password: &str,
) -> Result<UserData, ServiceError> {
    use crate::schema::users;

    let email = email.trim().to_lowercase();
    let user = users::table
        .filter(users::email.eq(&email))
        .first::<UserData>(conn)
        .optional()
        .context("DB error")?;

    match user {
        Some(user) if verify_password(password, &user.password) => Ok(user),
        _ => {
            tracing::debug!(email = %email, "rejected login");
            Err(ServiceError::InvalidCredentials)
        }
    }
}
