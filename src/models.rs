use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// Normalized email of the subject.
    pub sub: String,
    pub role: u8, // role id
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginReqDto {
    #[schema(example = "john@company.com", format = "email", value_type = String)]
    pub email: String,
    pub password: String,
    /// Refuse to issue a token unless the account is an admin.
    #[serde(default)]
    pub admin_only: bool,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupReqDto {
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john@company.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "2023-01-01", format = "date", value_type = String)]
    pub joining_date: chrono::NaiveDate,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}
