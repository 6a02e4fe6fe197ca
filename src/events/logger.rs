//! Event Logger - persists mission events to a JSONL file
//!
//! The EventLogger subscribes to the EventBus and appends every event as one
//! JSON line, giving a replayable history of the mission.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, error, warn};

use super::bus::EventBus;
use super::types::{EventLogEntry, MissionEvent};

/// Event logger that appends events to a JSONL file
pub struct EventLogger {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl EventLogger {
    /// Create a new event logger; the file is opened on first write
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        debug!(?path, "EventLogger::new: creating logger");
        Self { path, writer: None }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an event to the log file
    pub fn write_event(&mut self, event: &MissionEvent) -> eyre::Result<()> {
        debug!(event_type = event.event_type(), "EventLogger::write_event");

        if self.writer.is_none() {
            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
            self.writer = Some(BufWriter::new(file));
        }

        let entry = EventLogEntry::new(event.clone());
        let json = serde_json::to_string(&entry)?;
        if let Some(writer) = self.writer.as_mut() {
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }

        Ok(())
    }

    /// Run the logger, consuming events from the bus until every sender is gone
    ///
    /// This is meant to be spawned as a background task.
    pub async fn run(mut self, mut rx: broadcast::Receiver<MissionEvent>) {
        debug!(path = ?self.path, "EventLogger::run: starting event logger");

        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Err(e) = self.write_event(&event) {
                        error!(event_type = event.event_type(), error = %e, "EventLogger: failed to write event");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(missed = n, "EventLogger: lagged behind, missed events");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("EventLogger: channel closed, shutting down");
                    break;
                }
            }
        }

        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

/// Read all entries back from a JSONL event log
///
/// Lines that fail to parse are skipped with a warning.
pub fn read_event_log(path: impl AsRef<Path>) -> eyre::Result<Vec<EventLogEntry>> {
    let path = path.as_ref();
    debug!(?path, "read_event_log: reading log file");

    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)?;
    let mut entries = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<EventLogEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                warn!(line, error = %e, "read_event_log: failed to parse line");
            }
        }
    }

    debug!(count = entries.len(), "read_event_log: loaded entries");
    Ok(entries)
}

/// Spawn an event logger for the bus as a background task
///
/// The subscription is taken before returning, so no event emitted after
/// this call is missed.
pub fn spawn_event_logger(event_bus: &Arc<EventBus>, path: impl AsRef<Path>) -> tokio::task::JoinHandle<()> {
    let logger = EventLogger::new(path);
    let rx = event_bus.subscribe();
    tokio::spawn(logger.run(rx))
}
