//! Delivery classification
//!
//! Decides whether an incoming platform delivery is a notification at all,
//! and if so whether it was scheduled locally or pushed remotely. A non-empty
//! remote message id always wins over a numeric id when both are present.

use serde::Deserialize;

use super::event::Identity;
use super::extras::RawExtras;
use crate::config::ExtrasKeys;

/// Broadcast from the alarm/scheduling collaborator
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BroadcastDelivery {
    pub id: Option<i32>,
    pub tag: Option<String>,
    pub manager_name: Option<String>,
    pub raw_notification_extras: Option<RawExtras>,
}

/// Intent handed over on activity resume or new-intent
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IntentDelivery {
    pub extras: Option<RawExtras>,
    pub action: Option<String>,
    pub data_uri: Option<String>,
}

/// Entry-point independent view of a delivery
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delivery {
    pub id: Option<i32>,
    pub remote_message_id: Option<String>,
    pub tag: Option<String>,
    pub manager_name: Option<String>,
    /// Application-supplied payload of a local notification
    pub local_payload: Option<String>,
    pub extras: RawExtras,
}

/// Result of classifying a notification delivery
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub identity: Identity,
    pub tag: String,
    /// Numeric id as delivered, -1 when the delivery carried none
    pub display_id: i32,
    pub manager_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryClassifier {
    keys: ExtrasKeys,
}

impl DeliveryClassifier {
    pub fn new(keys: ExtrasKeys) -> Self {
        Self { keys }
    }

    /// Normalize a broadcast. Explicit fields take precedence over the same
    /// values found in the attached extras.
    pub fn from_broadcast(&self, broadcast: BroadcastDelivery) -> Delivery {
        let extras = broadcast.raw_notification_extras.unwrap_or_default();
        Delivery {
            id: broadcast.id.or_else(|| extras.get_i32(&self.keys.notification_id)),
            remote_message_id: self.string_field(&extras, &self.keys.remote_message_id),
            tag: broadcast.tag.or_else(|| self.string_field(&extras, &self.keys.tag)),
            manager_name: broadcast
                .manager_name
                .or_else(|| self.string_field(&extras, &self.keys.manager_name)),
            local_payload: self.string_field(&extras, &self.keys.payload),
            extras,
        }
    }

    /// Normalize a resume/new-intent delivery. `None` when the intent carries
    /// no extras at all.
    pub fn from_intent(&self, intent: &IntentDelivery) -> Option<Delivery> {
        let extras = intent.extras.clone()?;
        Some(Delivery {
            id: extras.get_i32(&self.keys.notification_id),
            remote_message_id: self.string_field(&extras, &self.keys.remote_message_id),
            tag: self.string_field(&extras, &self.keys.tag),
            manager_name: self.string_field(&extras, &self.keys.manager_name),
            local_payload: self.string_field(&extras, &self.keys.payload),
            extras,
        })
    }

    /// Classify a delivery; `None` means it is not a notification
    pub fn classify(&self, delivery: &Delivery) -> Option<Classified> {
        let identity = match (&delivery.remote_message_id, delivery.id) {
            (Some(message_id), _) if !message_id.is_empty() => Identity::Remote {
                message_id: message_id.clone(),
            },
            (_, Some(id)) if id >= 0 => Identity::Local { id },
            _ => return None,
        };

        Some(Classified {
            identity,
            tag: delivery.tag.clone().unwrap_or_default(),
            display_id: delivery.id.unwrap_or(-1),
            manager_name: delivery.manager_name.clone().unwrap_or_default(),
        })
    }

    fn string_field(&self, extras: &RawExtras, key: &str) -> Option<String> {
        extras.get_str(key).map(str::to_string)
    }
}
