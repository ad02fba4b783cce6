mod requests;
mod responses;

use crate::{
    auth::{require_student, AuthUser},
    database,
    error::ServiceError,
    models::{
        appointments::{Appointment, APPOINT_STATUS_BOOKED, APPOINT_STATUS_CANCELLED},
        availabilities::SlotData,
    },
    protocol::SimpleResponse,
    state::AppState,
};
use actix_web::{delete, get, post, web, HttpResponse};
use anyhow::Context;
use chrono::Utc;
use diesel::{
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};

use self::{
    requests::{BookRequest, Booking},
    responses::AppointmentItem,
};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(book).service(cancel).service(list);
}

crate::route_funcs! {
    (book, post, "", Created, user: AuthUser, info: web::Json<BookRequest>),
    (cancel, delete, "/{id}", Ok, user: AuthUser, path: web::Path<String>),
    (list, get, "", Ok, user: AuthUser),
}

async fn book_impl(
    state: web::Data<AppState>,
    AuthUser(user): AuthUser,
    info: web::Json<BookRequest>,
) -> Result<AppointmentItem, ServiceError> {
    require_student(&user)?;
    let booking = info.into_inner().validate()?;

    let booked = database::run(&state, move |conn| book_slot(conn, &user.id, &booking)).await?;
    tracing::info!(
        appointment_id = %booked.0.id,
        slot_id = %booked.0.slot_id,
        student_id = %booked.0.student_id,
        "booked appointment"
    );

    Ok(booked.into())
}

async fn cancel_impl(
    state: web::Data<AppState>,
    AuthUser(user): AuthUser,
    path: web::Path<String>,
) -> Result<SimpleResponse, ServiceError> {
    let appointment_id = path.into_inner();

    let cancelled = database::run(&state, move |conn| {
        cancel_appointment(conn, &user.id, &appointment_id)
    })
    .await?;
    tracing::info!(
        appointment_id = %cancelled.id,
        slot_id = %cancelled.slot_id,
        "cancelled appointment"
    );

    Ok(SimpleResponse::ok())
}

async fn list_impl(
    state: web::Data<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Vec<AppointmentItem>, ServiceError> {
    let appos = database::run(&state, move |conn| list_appointments(conn, &user.id)).await?;

    Ok(appos.into_iter().map(AppointmentItem::from).collect())
}

/// Claims the slot and records the appointment in one immediate transaction.
/// The claim is a conditional update on `is_booked = false`, so of any number
/// of concurrent bookings for a slot exactly one succeeds.
pub fn book_slot(
    conn: &SqliteConnection,
    student_id: &str,
    booking: &Booking,
) -> Result<(Appointment, SlotData), ServiceError> {
    use crate::schema::{appointments, availabilities};

    conn.immediate_transaction(|| {
        let slot = availabilities::table
            .filter(availabilities::id.eq(&booking.slot_id))
            .first::<SlotData>(conn)
            .optional()
            .context("DB error")?
            .ok_or(ServiceError::SlotNotFound)?;
        if slot.professor_id != booking.professor_id {
            return Err(ServiceError::validation(
                "slot does not belong to this professor",
            ));
        }
        if slot.is_booked {
            return Err(ServiceError::SlotAlreadyBooked);
        }

        let claimed = diesel::update(
            availabilities::table
                .filter(availabilities::id.eq(&slot.id))
                .filter(availabilities::is_booked.eq(false)),
        )
        .set(availabilities::is_booked.eq(true))
        .execute(conn)
        .context("DB error")?;
        if claimed != 1 {
            return Err(ServiceError::SlotAlreadyBooked);
        }

        let appointment = Appointment {
            id: crate::utils::new_id(),
            slot_id: slot.id.clone(),
            student_id: student_id.to_string(),
            professor_id: slot.professor_id.clone(),
            status: APPOINT_STATUS_BOOKED.to_string(),
            created_at: Utc::now().naive_utc(),
        };
        diesel::insert_into(appointments::table)
            .values(&appointment)
            .execute(conn)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    ServiceError::SlotAlreadyBooked
                }
                err => err.into(),
            })?;

        Ok((
            appointment,
            SlotData {
                is_booked: true,
                ..slot
            },
        ))
    })
}

/// Moves a booked appointment to cancelled and frees its slot.
pub fn cancel_appointment(
    conn: &SqliteConnection,
    caller_id: &str,
    appointment_id: &str,
) -> Result<Appointment, ServiceError> {
    use crate::schema::{appointments, availabilities};

    conn.immediate_transaction(|| {
        let appo = appointments::table
            .filter(appointments::id.eq(appointment_id))
            .first::<Appointment>(conn)
            .optional()
            .context("DB error")?
            .ok_or(ServiceError::AppointmentNotFound)?;
        if !appo.involves(caller_id) {
            return Err(ServiceError::Forbidden(
                "only the student or professor of an appointment may cancel it",
            ));
        }
        if appo.status == APPOINT_STATUS_CANCELLED {
            return Err(ServiceError::AlreadyCancelled);
        }

        let updated = diesel::update(
            appointments::table
                .filter(appointments::id.eq(&appo.id))
                .filter(appointments::status.eq(APPOINT_STATUS_BOOKED)),
        )
        .set(appointments::status.eq(APPOINT_STATUS_CANCELLED))
        .execute(conn)
        .context("DB error")?;
        if updated != 1 {
            return Err(ServiceError::AlreadyCancelled);
        }

        diesel::update(availabilities::table.filter(availabilities::id.eq(&appo.slot_id)))
            .set(availabilities::is_booked.eq(false))
            .execute(conn)
            .context("DB error")?;

        Ok(Appointment {
            status: APPOINT_STATUS_CANCELLED.to_string(),
            ..appo
        })
    })
}

pub fn list_appointments(
    conn: &SqliteConnection,
    caller_id: &str,
) -> Result<Vec<(Appointment, SlotData)>, ServiceError> {
    use crate::schema::{appointments, availabilities};

    let appos = appointments::table
        .inner_join(availabilities::table.on(appointments::slot_id.eq(availabilities::id)))
        .filter(
            appointments::student_id
                .eq(caller_id)
                .or(appointments::professor_id.eq(caller_id)),
        )
        .order((
            availabilities::start_time.asc(),
            appointments::created_at.asc(),
        ))
        .get_results::<(Appointment, SlotData)>(conn)
        .context("DB error")?;

    Ok(appos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        availability::{create_slot, SlotWindow},
        models::users::UserData,
        testing::TestContext,
    };
    use chrono::{Duration, NaiveDateTime};
    use std::sync::{Arc, Barrier};

    struct Fixture {
        ctx: TestContext,
        professor: UserData,
        student: UserData,
        slot: SlotData,
    }

    fn fixture() -> Fixture {
        let ctx = TestContext::new();
        let professor = ctx.professor("prof@test.com");
        let student = ctx.student("student@test.com");
        let start_time = NaiveDateTime::from_timestamp(1_714_557_600, 0);
        let window = SlotWindow {
            start_time,
            end_time: start_time + Duration::hours(1),
        };
        let slot = create_slot(&ctx.conn(), &professor.id, window).unwrap();
        Fixture {
            ctx,
            professor,
            student,
            slot,
        }
    }

    fn booking(fx: &Fixture) -> Booking {
        Booking {
            slot_id: fx.slot.id.clone(),
            professor_id: fx.professor.id.clone(),
        }
    }

    #[test]
    fn booking_marks_slot_and_records_appointment() {
        let fx = fixture();
        let conn = fx.ctx.conn();

        let (appo, slot) = book_slot(&conn, &fx.student.id, &booking(&fx)).unwrap();
        assert_eq!(appo.status, APPOINT_STATUS_BOOKED);
        assert_eq!(appo.professor_id, fx.professor.id);
        assert!(slot.is_booked);

        assert!(matches!(
            book_slot(&conn, &fx.student.id, &booking(&fx)),
            Err(ServiceError::SlotAlreadyBooked)
        ));
    }

    #[test]
    fn booking_checks_slot_and_professor() {
        let fx = fixture();
        let conn = fx.ctx.conn();

        let missing = Booking {
            slot_id: "missing".to_string(),
            professor_id: fx.professor.id.clone(),
        };
        assert!(matches!(
            book_slot(&conn, &fx.student.id, &missing),
            Err(ServiceError::SlotNotFound)
        ));

        let wrong_professor = Booking {
            slot_id: fx.slot.id.clone(),
            professor_id: fx.student.id.clone(),
        };
        assert!(matches!(
            book_slot(&conn, &fx.student.id, &wrong_professor),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn concurrent_bookings_have_one_winner() {
        let fx = fixture();
        let other = fx.ctx.student("other@test.com");
        let students = vec![fx.student.id.clone(), other.id];
        let barrier = Arc::new(Barrier::new(students.len()));

        let handles: Vec<_> = students
            .into_iter()
            .map(|student_id| {
                let pool = fx.ctx.state.pool.clone();
                let barrier = barrier.clone();
                let booking = booking(&fx);
                std::thread::spawn(move || {
                    let conn = pool.get().unwrap();
                    barrier.wait();
                    book_slot(&conn, &student_id, &booking)
                })
            })
            .collect();
        let results: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();

        assert_eq!(results.iter().filter(|res| res.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|res| matches!(res, Err(ServiceError::SlotAlreadyBooked))));
        assert_eq!(
            list_appointments(&fx.ctx.conn(), &fx.professor.id)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn cancel_frees_slot_and_is_not_repeatable() {
        let fx = fixture();
        let conn = fx.ctx.conn();
        let (appo, _) = book_slot(&conn, &fx.student.id, &booking(&fx)).unwrap();

        let cancelled = cancel_appointment(&conn, &fx.professor.id, &appo.id).unwrap();
        assert_eq!(cancelled.status, APPOINT_STATUS_CANCELLED);
        assert!(matches!(
            cancel_appointment(&conn, &fx.professor.id, &appo.id),
            Err(ServiceError::AlreadyCancelled)
        ));

        let (rebooked, slot) = book_slot(&conn, &fx.student.id, &booking(&fx)).unwrap();
        assert_ne!(rebooked.id, appo.id);
        assert!(slot.is_booked);
    }

    #[test]
    fn only_participants_may_cancel() {
        let fx = fixture();
        let conn = fx.ctx.conn();
        let stranger = fx.ctx.student("stranger@test.com");
        let (appo, _) = book_slot(&conn, &fx.student.id, &booking(&fx)).unwrap();

        assert!(matches!(
            cancel_appointment(&conn, &stranger.id, &appo.id),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            cancel_appointment(&conn, &fx.student.id, "missing"),
            Err(ServiceError::AppointmentNotFound)
        ));
        cancel_appointment(&conn, &fx.student.id, &appo.id).unwrap();
    }

    #[test]
    fn listing_covers_both_parties_with_status() {
        let fx = fixture();
        let conn = fx.ctx.conn();
        let stranger = fx.ctx.student("stranger@test.com");
        let (appo, _) = book_slot(&conn, &fx.student.id, &booking(&fx)).unwrap();
        cancel_appointment(&conn, &fx.student.id, &appo.id).unwrap();

        for user_id in &[&fx.student.id, &fx.professor.id] {
            let appos = list_appointments(&conn, user_id).unwrap();
            assert_eq!(appos.len(), 1);
            assert_eq!(appos[0].0.id, appo.id);
            assert_eq!(appos[0].0.status, APPOINT_STATUS_CANCELLED);
            assert_eq!(appos[0].1.id, fx.slot.id);
        }
        assert!(list_appointments(&conn, &stranger.id).unwrap().is_empty());
    }
}
