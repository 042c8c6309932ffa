//! Append-only JSONL transcript.
//!
//! Every line carries the run id, a per-run sequence number, the event type
//! and a millisecond UTC timestamp. Object payloads are flattened into the
//! line; anything else lands under `data`. Several runs can share one file
//! and still be told apart by `run`.

use consilium_application::{ConversationEvent, ConversationLogger};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Serialize)]
struct TranscriptLine<'a> {
    run: &'a str,
    seq: u64,
    #[serde(rename = "type")]
    kind: &'a str,
    timestamp: String,
    #[serde(flatten)]
    body: Map<String, Value>,
}

struct Sink {
    writer: BufWriter<File>,
    next_seq: u64,
}

pub struct JsonlConversationLogger {
    sink: Mutex<Sink>,
    run_id: String,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open `path` for appending, creating parent directories as needed.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            sink: Mutex::new(Sink {
                writer: BufWriter::new(file),
                next_seq: 0,
            }),
            run_id: format!("run_{}", chrono::Utc::now().timestamp_millis()),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

fn into_body(payload: Value) -> Map<String, Value> {
    match payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        let line = TranscriptLine {
            run: &self.run_id,
            seq: sink.next_seq,
            kind: event.event_type,
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            body: into_body(event.payload),
        };
        let Ok(encoded) = serde_json::to_string(&line) else {
            return;
        };
        sink.next_seq += 1;
        // One flush per line so an interrupted run leaves a readable file.
        let _ = writeln!(sink.writer, "{encoded}").and_then(|_| sink.writer.flush());
    }
}
