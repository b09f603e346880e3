//! 値オブジェクト
//!
//! 外部から受け取った文字列をドメインで扱う前に検証し、型として区別します。
//! いずれも不変で、生成時に検証を通過したものだけが存在します。

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Upper bound for any externally supplied identifier (room names, display names).
pub const MAX_NAME_LENGTH: usize = 256;

/// Upper bound for a single chat message body.
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Placeholder recorded in the call ledger when a participant never bound a display name.
pub const UNKNOWN_DISPLAY_NAME: &str = "Unknown";

fn validate_name(field: &'static str, value: &str) -> Result<(), ValueObjectError> {
    if value.trim().is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValueObjectError::TooLong {
            field,
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(())
}

/// Opaque identity of one live WebSocket connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// 新しい ConnectionId を検証付きで作成
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_name("connection id", &value)?;
        Ok(Self(value))
    }

    /// 接続ごとに一意な ID を払い出す
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Externally supplied room key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_name("room name", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Name a participant chose for themselves; purely informational.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_name("display name", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Body of a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty("message"));
        }
        if value.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(ValueObjectError::TooLong {
                field: "message",
                max: MAX_MESSAGE_LENGTH,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Length of a completed call in whole seconds, as reported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct CallDuration(u64);

impl CallDuration {
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Whole seconds from a client-measured value: floored, negatives and NaN become zero.
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_nan() || secs <= 0.0 {
            return Self(0);
        }
        // `as` saturates at u64::MAX for huge values
        Self(secs.floor() as u64)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }
}

/// Opaque negotiation payload (SDP offer/answer, ICE candidate).
///
/// The coordinator never inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalPayload(serde_json::Value);

impl SignalPayload {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
