use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::error::ServiceError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotRequest {
    pub start_time: String,
    pub end_time: String,
}

pub struct SlotWindow {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl CreateSlotRequest {
    pub fn validate(self) -> Result<SlotWindow, ServiceError> {
        let (start_time, end_time) =
            crate::utils::parse_time_pair_str(&self.start_time, &self.end_time)?;
        if start_time >= end_time {
            return Err(ServiceError::InvalidRange);
        }
        Ok(SlotWindow {
            start_time,
            end_time,
        })
    }
}

#[derive(Deserialize)]
pub struct ListSlotsQuery {
    #[serde(default)]
    pub available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start_time: &str, end_time: &str) -> CreateSlotRequest {
        CreateSlotRequest {
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        }
    }

    #[test]
    fn empty_or_reversed_range_is_rejected() {
        assert!(matches!(
            request("2024-05-01T10:00:00Z", "2024-05-01T10:00:00Z").validate(),
            Err(ServiceError::InvalidRange)
        ));
        assert!(matches!(
            request("2024-05-01T11:00:00Z", "2024-05-01T10:00:00Z").validate(),
            Err(ServiceError::InvalidRange)
        ));
    }

    #[test]
    fn unparsable_time_is_a_validation_error() {
        assert!(matches!(
            request("tomorrow", "2024-05-01T10:00:00Z").validate(),
            Err(ServiceError::Validation(_))
        ));
    }
}
