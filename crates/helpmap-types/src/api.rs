use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{ForumTopic, HelpRequest, Message, Review, User};

// -- JWT Claims --

/// Session token claims, issued at registration/login and checked by the
/// bearer-auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: u64,
    pub username: String,
    pub role: String,
    pub exp: usize,
}

// -- Auth --

// Credential fields are optional so that a missing field is reported as a
// 400 with the usual error body instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Body of both the register and login responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: User,
}

// -- Help requests --

#[derive(Debug, Default, Deserialize)]
pub struct CreateHelpRequest {
    pub creator_id: Option<Value>,
    pub creator: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HelpRequestCreated {
    pub success: bool,
    pub request: HelpRequest,
}

// -- Messages --

#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    pub sender_id: Option<Value>,
    pub sender: Option<String>,
    pub receiver_id: Option<Value>,
    pub receiver: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageSent {
    pub success: bool,
    pub message: Message,
}

// -- Forum --

#[derive(Debug, Default, Deserialize)]
pub struct CreateTopicRequest {
    pub creator_id: Option<Value>,
    pub creator: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopicCreated {
    pub success: bool,
    pub topic: ForumTopic,
}

// -- Reviews --

#[derive(Debug, Default, Deserialize)]
pub struct CreateReviewRequest {
    pub reviewer_id: Option<Value>,
    pub reviewer: Option<String>,
    pub volunteer_id: Option<Value>,
    pub volunteer: Option<String>,
    pub rating: Option<Value>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewCreated {
    pub success: bool,
    pub review: Review,
}

// -- Status --

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
    pub service: String,
    pub features: Vec<String>,
}

/// Body returned for every handled failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
