use anyhow::Context;
use diesel::prelude::*;

use crate::{
    error::ServiceError,
    models::users::{UserData, ROLE_PROFESSOR},
};

pub fn find_user(conn: &SqliteConnection, id: &str) -> Result<Option<UserData>, ServiceError> {
    use crate::schema::users;

    let user = users::table
        .filter(users::id.eq(id))
        .first::<UserData>(conn)
        .optional()
        .context("DB error")?;

    Ok(user)
}

pub fn assert_professor(conn: &SqliteConnection, id: &str) -> Result<(), ServiceError> {
    use crate::schema::users;

    let res = users::table
        .filter(users::id.eq(id))
        .filter(users::role.eq(ROLE_PROFESSOR))
        .count()
        .get_result::<i64>(conn)
        .context("DB error")?;

    if res == 0 {
        return Err(ServiceError::UserNotFound);
    }

    Ok(())
}

pub fn assert_email_free(conn: &SqliteConnection, email: &str) -> Result<(), ServiceError> {
    use crate::schema::users;

    let res = users::table
        .filter(users::email.eq(email))
        .count()
        .get_result::<i64>(conn)
        .context("DB error")?;

    if res > 0 {
        return Err(ServiceError::DuplicateEmail);
    }

    Ok(())
}
