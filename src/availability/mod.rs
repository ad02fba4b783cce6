mod requests;
mod responses;

use crate::{
    auth::{require_professor, AuthUser},
    database::{self, assert},
    error::ServiceError,
    models::availabilities::SlotData,
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse};
use anyhow::Context;
use chrono::Utc;
use diesel::prelude::*;

pub use self::requests::SlotWindow;
use self::{
    requests::{CreateSlotRequest, ListSlotsQuery},
    responses::SlotItem,
};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(create).service(list);
}

crate::route_funcs! {
    (create, post, "", Created, user: AuthUser, info: web::Json<CreateSlotRequest>),
    (list, get, "/{professor_id}", Ok, _user: AuthUser, path: web::Path<String>, query: web::Query<ListSlotsQuery>),
}

async fn create_impl(
    state: web::Data<AppState>,
    AuthUser(user): AuthUser,
    info: web::Json<CreateSlotRequest>,
) -> Result<SlotItem, ServiceError> {
    require_professor(&user)?;
    let window = info.into_inner().validate()?;

    let slot = database::run(&state, move |conn| create_slot(conn, &user.id, window)).await?;
    tracing::info!(slot_id = %slot.id, professor_id = %slot.professor_id, "created slot");

    Ok(slot.into())
}

async fn list_impl(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<String>,
    query: web::Query<ListSlotsQuery>,
) -> Result<Vec<SlotItem>, ServiceError> {
    let professor_id = path.into_inner();
    let only_available = query.into_inner().available;
    let slots = database::run(&state, move |conn| {
        list_slots(conn, &professor_id, only_available)
    })
    .await?;

    Ok(slots.into_iter().map(SlotItem::from).collect())
}

pub fn create_slot(
    conn: &SqliteConnection,
    professor_id: &str,
    window: SlotWindow,
) -> Result<SlotData, ServiceError> {
    use crate::schema::availabilities;

    conn.immediate_transaction(|| {
        let res = availabilities::table
            .filter(availabilities::professor_id.eq(professor_id))
            .filter(availabilities::start_time.lt(window.end_time))
            .filter(availabilities::end_time.gt(window.start_time))
            .count()
            .get_result::<i64>(conn)
            .context("DB error")?;
        if res > 0 {
            return Err(ServiceError::SlotOverlap);
        }

        let data = SlotData {
            id: crate::utils::new_id(),
            professor_id: professor_id.to_string(),
            start_time: window.start_time,
            end_time: window.end_time,
            is_booked: false,
            created_at: Utc::now().naive_utc(),
        };
        diesel::insert_into(availabilities::table)
            .values(&data)
            .execute(conn)
            .context("DB error")?;

        Ok(data)
    })
}

/// Slots of one professor by start time; `only_available` drops booked ones.
pub fn list_slots(
    conn: &SqliteConnection,
    professor_id: &str,
    only_available: bool,
) -> Result<Vec<SlotData>, ServiceError> {
    use crate::schema::availabilities;

    assert::assert_professor(conn, professor_id)?;

    let slots = availabilities::table
        .filter(availabilities::professor_id.eq(professor_id))
        .filter(availabilities::is_booked.eq(false).or(!only_available))
        .order(availabilities::start_time.asc())
        .get_results::<SlotData>(conn)
        .context("DB error")?;

    Ok(slots)
}
