pub mod appointments;
pub mod availabilities;
pub mod users;
