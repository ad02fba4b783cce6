use serde::Serialize;

#[derive(Default, Serialize)]
pub struct SimpleResponse {
    pub success: bool,
    pub err: String,
}

impl SimpleResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            err: "".to_string(),
        }
    }

    pub fn err<S: ToString>(err: S) -> Self {
        Self {
            success: false,
            err: err.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}
