//! Payload 构建模块 - 把推送消息的元数据规范化为 JSON 字符串
//!
//! Two sources produce payloads:
//! - the extras bag attached to a tapped push notification (`encode`), e.g.
//!   ```json
//!   {
//!     "google.sent_time": 1501533936476,
//!     "from": "353277717468",
//!     "google.message_id": "0:1501533936482206%8fe8bb7f8fe8bb7f",
//!     "collapse_key": "org.example.app"
//!   }
//!   ```
//!   which becomes `{"sent_time":1501533936476,"from":"353277717468","message_id":"0:...","collapse_key":"org.example.app"}`
//! - a push message received while the app is in the foreground
//!   (`encode_remote_message`).
//!
//! Local deliveries never come through here; their payload string is produced
//! by the application's own scheduling call and passed through untouched.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};
use tracing::warn;

use super::extras::{RawExtras, RawValue};
use crate::config::{BridgeConfig, KeyRename};

/// Payload 编码器
#[derive(Debug, Clone)]
pub struct PayloadEncoder {
    renames: Vec<KeyRename>,
}

impl PayloadEncoder {
    /// 使用默认重命名表
    pub fn new() -> Self {
        Self::from_config(&BridgeConfig::default())
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self { renames: config.renames.clone() }
    }

    /// Encode extras as a JSON object string, preserving insertion order.
    ///
    /// Strings are quoted and escaped, numbers and booleans are written as
    /// literals. Values JSON cannot represent (NaN, infinities, `Other`) fall
    /// back to their quoted text form instead of failing the payload.
    pub fn encode(&self, extras: &RawExtras) -> String {
        let mut out = String::from("{");
        let mut first = true;

        for (key, value) in extras.iter() {
            let name = self.canonical_key(key);
            // A verbatim key that collides with a renamed provider key present
            // in the same bag is dropped; the provider value wins.
            if name == key && self.shadowed_by_rename(key, extras) {
                warn!(key = %key, "Dropping extras key shadowed by canonical rename");
                continue;
            }

            if !first {
                out.push(',');
            }
            first = false;

            out.push_str(&Value::from(name).to_string());
            out.push(':');
            out.push_str(&encode_value(key, value));
        }

        out.push('}');
        out
    }

    fn canonical_key<'a>(&'a self, key: &'a str) -> &'a str {
        self.renames
            .iter()
            .find(|r| r.from == key)
            .map(|r| r.to.as_str())
            .unwrap_or(key)
    }

    fn shadowed_by_rename(&self, key: &str, extras: &RawExtras) -> bool {
        self.renames
            .iter()
            .any(|r| r.to == key && r.from != key && extras.contains_key(&r.from))
    }
}

impl Default for PayloadEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// 使用默认重命名表编码 extras
pub fn encode_extras(extras: &RawExtras) -> String {
    PayloadEncoder::new().encode(extras)
}

fn encode_value(key: &str, value: &RawValue) -> String {
    match value {
        RawValue::String(s) => Value::from(s.as_str()).to_string(),
        RawValue::Int(n) => n.to_string(),
        RawValue::Bool(b) => b.to_string(),
        RawValue::Float(f) => match Number::from_f64(*f) {
            Some(n) => n.to_string(),
            None => {
                warn!(key = %key, value = %f, "Non-finite number in extras, encoding as string");
                Value::from(f.to_string()).to_string()
            }
        },
        RawValue::Other(text) => {
            warn!(key = %key, "Unsupported extras value type, encoding as string");
            Value::from(text.as_str()).to_string()
        }
    }
}

/// Notification block of a push message
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RemoteNotification {
    pub body: Option<String>,
    pub click_action: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub sound: Option<String>,
    pub link: Option<String>,
    pub tag: Option<String>,
    pub title: Option<String>,
}

/// Push message as handed over by the messaging collaborator while the app
/// is in the foreground
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RemoteMessage {
    pub collapse_key: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub message_id: Option<String>,
    pub message_type: Option<String>,
    pub sent_time: i64,
    pub ttl: i32,
    /// 自定义数据，保持插入顺序
    #[serde(deserialize_with = "data_from_object")]
    pub data: Vec<(String, String)>,
    pub notification: Option<RemoteNotification>,
}

/// Encode a foreground push message.
///
/// Missing string fields are `null`; `data` appears only when non-empty and
/// `notification` only when the message carries one.
pub fn encode_remote_message(message: &RemoteMessage) -> String {
    let mut object = Map::new();
    object.insert("collapse_key".into(), opt_string(&message.collapse_key));
    object.insert("from".into(), opt_string(&message.from));
    object.insert("to".into(), opt_string(&message.to));
    object.insert("message_id".into(), opt_string(&message.message_id));
    object.insert("message_type".into(), opt_string(&message.message_type));
    object.insert("sent_time".into(), Value::from(message.sent_time));
    object.insert("ttl".into(), Value::from(message.ttl));

    if !message.data.is_empty() {
        let data: Map<String, Value> = message
            .data
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
            .collect();
        object.insert("data".into(), Value::Object(data));
    }

    if let Some(n) = &message.notification {
        let mut notification = Map::new();
        notification.insert("body".into(), opt_string(&n.body));
        notification.insert("click_action".into(), opt_string(&n.click_action));
        notification.insert("color".into(), opt_string(&n.color));
        notification.insert("icon".into(), opt_string(&n.icon));
        notification.insert("sound".into(), opt_string(&n.sound));
        notification.insert("link".into(), opt_string(&n.link));
        notification.insert("tag".into(), opt_string(&n.tag));
        notification.insert("title".into(), opt_string(&n.title));
        object.insert("notification".into(), Value::Object(notification));
    }

    Value::Object(object).to_string()
}

fn opt_string(value: &Option<String>) -> Value {
    value.as_deref().map(Value::from).unwrap_or(Value::Null)
}

// 推送 data 只有字符串值；非字符串值按 JSON 文本保存
fn data_from_object<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    let object = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(object
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, text)
        })
        .collect())
}
