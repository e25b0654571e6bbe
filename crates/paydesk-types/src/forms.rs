//! Browser form payloads. Field names match the HTML form inputs, which use
//! camelCase where they are more than one word.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    pub sender_number: String,
    pub amount: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchUserForm {
    pub search_user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageForm {
    pub receiver_id: i64,
    pub message_text: String,
}
