use crate::schema::availabilities;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Queryable, Insertable, Identifiable)]
#[table_name = "availabilities"]
pub struct SlotData {
    pub id: String,
    pub professor_id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub is_booked: bool,
    pub created_at: NaiveDateTime,
}
