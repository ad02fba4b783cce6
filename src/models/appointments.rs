use crate::schema::appointments;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Queryable, Insertable, Identifiable)]
#[table_name = "appointments"]
pub struct Appointment {
    pub id: String,
    pub slot_id: String,
    pub student_id: String,
    pub professor_id: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl Appointment {
    /// Either party of the appointment may act on it.
    pub fn involves(&self, user_id: &str) -> bool {
        self.student_id == user_id || self.professor_id == user_id
    }
}

pub const APPOINT_STATUS_BOOKED: &str = "booked";
pub const APPOINT_STATUS_CANCELLED: &str = "cancelled";
