use serde::Serialize;

use crate::{
    models::{appointments::Appointment, availabilities::SlotData},
    utils::format_time_str,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub slot_id: String,
    pub student_id: String,
    pub professor_id: String,
    pub status: String,
    pub start_time: String,
    pub end_time: String,
}

impl From<(Appointment, SlotData)> for AppointmentItem {
    fn from((appo_data, slot_data): (Appointment, SlotData)) -> Self {
        Self {
            id: appo_data.id,
            slot_id: appo_data.slot_id,
            student_id: appo_data.student_id,
            professor_id: appo_data.professor_id,
            status: appo_data.status,
            start_time: format_time_str(&slot_data.start_time),
            end_time: format_time_str(&slot_data.end_time),
        }
    }
}
