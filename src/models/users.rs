use crate::schema::users;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Queryable, Insertable, Identifiable)]
#[table_name = "users"]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: String,
    pub created_at: NaiveDateTime,
}

impl UserData {
    pub fn is_professor(&self) -> bool {
        self.role == ROLE_PROFESSOR
    }

    pub fn is_student(&self) -> bool {
        self.role == ROLE_STUDENT
    }
}

pub const ROLE_PROFESSOR: &str = "professor";
pub const ROLE_STUDENT: &str = "student";
