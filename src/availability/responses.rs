use serde::Serialize;

use crate::{models::availabilities::SlotData, utils::format_time_str};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub professor_id: String,
    pub start_time: String,
    pub end_time: String,
    pub is_booked: bool,
}

impl From<SlotData> for SlotItem {
    fn from(data: SlotData) -> Self {
        Self {
            start_time: format_time_str(&data.start_time),
            end_time: format_time_str(&data.end_time),
            id: data.id,
            professor_id: data.professor_id,
            is_booked: data.is_booked,
        }
    }
}
