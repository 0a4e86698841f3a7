//! CLI command implementations.

pub mod demo;
pub mod sync_bill;

use objsync_engine::{RunStats, SyncResult, SyncRun};
use serde::Serialize;
use std::str::FromStr;

/// How progress events are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// One `[Status] message` line per event.
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for Output {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Output::Text),
            "json" => Ok(Output::Json),
            other => Err(format!("unknown output format '{other}' (expected text or json)")),
        }
    }
}

/// A progress event as printed in JSON mode.
#[derive(Debug, Serialize)]
pub struct EventRecord {
    /// Entity type.
    pub entity_type: String,
    /// Local id.
    pub local_id: String,
    /// Status label.
    pub status: String,
    /// Message.
    pub message: String,
    /// Remote id, once completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
}

impl From<&SyncResult> for EventRecord {
    fn from(result: &SyncResult) -> Self {
        Self {
            entity_type: result.entity.entity_type.to_string(),
            local_id: result.entity.local_id.to_string(),
            status: result.status.to_string(),
            message: result.message.clone(),
            remote_id: result.remote_id.clone(),
        }
    }
}

/// Drains `run`, printing every event, and returns its counters.
pub fn print_run(run: &mut SyncRun, output: Output) -> Result<RunStats, serde_json::Error> {
    for result in run.by_ref() {
        match output {
            Output::Text => println!("{result}"),
            Output::Json => println!("{}", serde_json::to_string(&EventRecord::from(&result))?),
        }
    }
    let stats = run.stats();
    if output == Output::Text {
        println!(
            "{} entities, {} completed, {} failed{}",
            stats.entities,
            stats.completed,
            stats.failed,
            if run.is_halted() { " (halted)" } else { "" }
        );
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use objsync_core::EntityKey;
    use objsync_engine::SyncStatus;

    #[test]
    fn output_formats_parse() {
        assert_eq!("text".parse::<Output>(), Ok(Output::Text));
        assert_eq!("json".parse::<Output>(), Ok(Output::Json));
        assert!("yaml".parse::<Output>().is_err());
    }

    #[test]
    fn event_record_keeps_remote_id() {
        let key = EntityKey::new("Currency", 1u64);
        let result = SyncResult::completed(key, "abc", "done");
        let record = EventRecord::from(&result);
        assert_eq!(record.entity_type, "Currency");
        assert_eq!(record.local_id, "1");
        assert_eq!(record.status, SyncStatus::Completed.to_string());
        assert_eq!(record.remote_id.as_deref(), Some("abc"));
    }
}
