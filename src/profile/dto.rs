use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub name: String,
    pub surname: String,
    pub age: i32,
    pub height_cm: f64,
    pub weight_kg: f64,
}

/// Partial-field merge: absent fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}
