use actix_web::{
    error::{JsonPayloadError, QueryPayloadError},
    web, HttpRequest,
};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::{
    error::ServiceError,
    models::users::{ROLE_PROFESSOR, ROLE_STUDENT},
};

/// Declares actix handlers that forward their extractors to `<name>_impl` and
/// serialize the result with the given success status.
#[macro_export]
macro_rules! route_funcs {
    ( $( ( $func_name:ident, $method:ident, $url:literal, $status:ident $(, $arg:ident : $arg_ty:ty )* ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[$method($url)]
                async fn $func_name(
                    state: web::Data<AppState>,
                    $( $arg: $arg_ty, )*
                ) -> Result<HttpResponse, ServiceError> {
                    let response = [<$func_name _impl>](state, $( $arg ),*).await?;
                    Ok(HttpResponse::$status().json(response))
                }
            }
        )+
    };
}

/// Body errors answer with the same shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        ServiceError::validation(err).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        ServiceError::validation(err).into()
    })
}

pub fn bearer_token(req: &HttpRequest) -> Result<&str, ServiceError> {
    req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ServiceError::TokenMissing)
}

pub fn assert_role_str(role: &str) -> Result<&'static str, ServiceError> {
    match role {
        ROLE_PROFESSOR => Ok(ROLE_PROFESSOR),
        ROLE_STUDENT => Ok(ROLE_STUDENT),
        _ => Err(ServiceError::validation(
            "role must be 'professor' or 'student'",
        )),
    }
}

pub fn normalize_email(email: &str) -> Result<String, ServiceError> {
    let email = email.trim().to_lowercase();
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !well_formed {
        return Err(ServiceError::validation("malformed email"));
    }
    Ok(email)
}

pub fn parse_time_str<S: AsRef<str>>(s: S) -> anyhow::Result<NaiveDateTime> {
    Ok(DateTime::parse_from_rfc3339(s.as_ref().trim())?.naive_utc())
}

pub fn parse_time_pair_str<S1: AsRef<str>, S2: AsRef<str>>(
    start_time: S1,
    end_time: S2,
) -> Result<(NaiveDateTime, NaiveDateTime), ServiceError> {
    let start_time = parse_time_str(start_time)
        .map_err(|_| ServiceError::validation("wrong format on 'startTime'"))?;
    let end_time = parse_time_str(end_time)
        .map_err(|_| ServiceError::validation("wrong format on 'endTime'"))?;
    Ok((start_time, end_time))
}

pub fn format_time_str(time: &NaiveDateTime) -> String {
    Utc.from_utc_datetime(time).to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
