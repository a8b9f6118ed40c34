use serde::{ Deserialize, Deserializer, Serialize };
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Model,
}

/// Only `"model"` is the model; any other role, or none, reads back as `user`.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let role = Option::<String>::deserialize(deserializer)?;
        Ok(match role.as_deref() {
            Some("model") => Role::Model,
            _ => Role::User,
        })
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who a transcript bubble is attributed to. Replies from the model show up as `bot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl From<Role> for Sender {
    fn from(role: Role) -> Self {
        match role {
            Role::Model => Sender::Bot,
            Role::User => Sender::User,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self { role: Role::Model, content: content.into() }
    }
}

/// Body of `POST /chat`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SingleTurnRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body the client sends to `POST /api/chat`.
#[derive(Clone, Debug, Serialize)]
pub struct MultiTurnRequest<'a> {
    pub messages: &'a [ChatMessage],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyResponse {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_role_renders_as_bot() {
        assert_eq!(Sender::from(Role::Model), Sender::Bot);
        assert_eq!(Sender::from(Role::User), Sender::User);
    }

    #[test]
    fn unknown_or_missing_role_reads_as_user() {
        let raw = r#"[
            {"role":"model","content":"a"},
            {"role":"assistant","content":"b"},
            {"content":"c"},
            {"role":null,"content":"d"}
        ]"#;
        let messages: Vec<ChatMessage> = serde_json::from_str(raw).unwrap();
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Model, Role::User, Role::User, Role::User]);
        assert_eq!(messages[2].content, "c");
    }

    #[test]
    fn message_wire_shape() {
        let json = serde_json::to_value(ChatMessage::model("hi")).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "model", "content": "hi" }));
    }
}
