//! Contact-form messages.

use axum::Json;
use axum::extract::State;
use carebook_api::{ApiError, ApiResult, MessageBody};
use carebook_auth::AdminAuth;
use carebook_storage::{Message, NewMessage};
use serde::{Deserialize, Serialize};

use super::{JsonBody, all_present, take};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub success: bool,
    pub messages: Vec<Message>,
}

/// `POST /message/send`
pub async fn send_message(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SendMessageRequest>,
) -> ApiResult<Json<MessageBody>> {
    if !all_present(&[&req.first_name, &req.last_name, &req.email, &req.phone, &req.message]) {
        return Err(ApiError::validation("Please Fill Full Form!"));
    }

    let message = state
        .messages
        .create(NewMessage {
            first_name: take(req.first_name),
            last_name: take(req.last_name),
            email: take(req.email),
            phone: take(req.phone),
            message: take(req.message),
        })
        .await?;
    tracing::debug!(message_id = %message.id, "Message stored");

    Ok(Json(MessageBody::ok("Message Sent!")))
}

/// `GET /message/getall`
pub async fn get_all_messages(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
) -> ApiResult<Json<MessagesResponse>> {
    let messages = state.messages.list().await?;
    Ok(Json(MessagesResponse {
        success: true,
        messages,
    }))
}
