//! JSON-lines output for sink calls

use crate::notification::{EventSink, Identity, NotificationEvent, ReportKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;
use tracing::warn;

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum SinkRecord<'a> {
    NotificationReported {
        identity: &'a Identity,
        kind: ReportKind,
        tag: &'a str,
        display_id: i32,
        manager_name: &'a str,
        payload: &'a str,
        received_at: DateTime<Utc>,
    },
    LinkOpened {
        uri: &'a str,
    },
    KeyboardHeightChanged {
        height_px: i32,
    },
}

/// Sink printing one JSON object per call
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer) }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_record(&self, record: &SinkRecord<'_>) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to serialize sink record");
                return;
            }
        };
        let mut writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!(error = %e, "Failed to write sink record");
        }
    }
}

impl<W: Write + Send> EventSink for JsonLinesSink<W> {
    fn name(&self) -> &str {
        "json-lines"
    }

    fn on_notification_reported(&self, event: &NotificationEvent) {
        self.write_record(&SinkRecord::NotificationReported {
            identity: event.identity(),
            kind: event.kind(),
            tag: event.tag(),
            display_id: event.display_id(),
            manager_name: event.manager_name(),
            payload: event.payload(),
            received_at: event.received_at(),
        });
    }

    fn on_link_opened(&self, uri: &str) {
        self.write_record(&SinkRecord::LinkOpened { uri });
    }

    fn on_keyboard_height_changed(&self, height_px: i32) {
        self.write_record(&SinkRecord::KeyboardHeightChanged { height_px });
    }
}
