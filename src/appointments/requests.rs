use serde::Deserialize;

use crate::error::ServiceError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub slot_id: String,
    pub professor_id: String,
}

pub struct Booking {
    pub slot_id: String,
    pub professor_id: String,
}

impl BookRequest {
    pub fn validate(self) -> Result<Booking, ServiceError> {
        let slot_id = self.slot_id.trim();
        if slot_id.is_empty() {
            return Err(ServiceError::validation("'slotId' must not be empty"));
        }
        let professor_id = self.professor_id.trim();
        if professor_id.is_empty() {
            return Err(ServiceError::validation("'professorId' must not be empty"));
        }
        Ok(Booking {
            slot_id: slot_id.to_string(),
            professor_id: professor_id.to_string(),
        })
    }
}
