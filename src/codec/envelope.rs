//! Versioned JSON envelope around saved models and histories.

use std::sync::Arc;
use std::time::SystemTime;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::history::{Entry, History};
use crate::store::ActionRecord;

/// Format tag written into every envelope.
pub const FORMAT: &str = "bulin";

/// Version this build writes.
pub const VERSION: u32 = 2;

/// Oldest reader able to read what this build writes. Readers ignore
/// fields they do not know, so additive changes keep this unchanged.
pub const MIN_READER_VERSION: u32 = 1;

const KIND_MODEL: &str = "model";
const KIND_HISTORY: &str = "history";

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    format: &'static str,
    version: u32,
    min_reader_version: u32,
    kind: &'static str,
    body: &'a T,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    format: String,
    version: u32,
    #[serde(default)]
    min_reader_version: Option<u32>,
    kind: String,
    body: serde_json::Value,
}

fn seal<T: Serialize>(kind: &'static str, body: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(&EnvelopeOut {
        format: FORMAT,
        version: VERSION,
        min_reader_version: MIN_READER_VERSION,
        kind,
        body,
    })
}

fn open(kind: &'static str, bytes: &[u8]) -> Result<serde_json::Value, DecodeError> {
    let envelope: EnvelopeIn = serde_json::from_slice(bytes)?;
    if envelope.format != FORMAT || envelope.kind != kind {
        return Err(DecodeError::WrongFormat {
            expected: kind,
            found: format!("{} {}", envelope.format, envelope.kind),
        });
    }
    // Envelopes without a reader floor predate it and need the version itself.
    let required = envelope.min_reader_version.unwrap_or(envelope.version);
    if required > VERSION {
        return Err(DecodeError::IncompatibleVersion {
            found: envelope.version,
            required,
            supported: VERSION,
        });
    }
    Ok(envelope.body)
}

/// Encodes a model into a durable byte representation.
pub fn encode<M: Serialize>(model: &M) -> Result<Vec<u8>, serde_json::Error> {
    seal(KIND_MODEL, model)
}

/// Decodes a model written by [`encode`], by this or another version.
pub fn decode<M: DeserializeOwned>(bytes: &[u8]) -> Result<M, DecodeError> {
    let body = open(KIND_MODEL, bytes)?;
    Ok(serde_json::from_value(body)?)
}

#[derive(Serialize)]
struct HistoryOut<'a, M> {
    position: u64,
    max_entries: usize,
    entries: Vec<EntryOut<'a, M>>,
}

#[derive(Serialize)]
struct EntryOut<'a, M> {
    sequence: u64,
    recorded_at: SystemTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<ActionRecord>,
    model: &'a M,
}

#[derive(Deserialize)]
struct HistoryIn<M> {
    position: u64,
    max_entries: usize,
    entries: Vec<EntryIn<M>>,
}

#[derive(Deserialize)]
struct EntryIn<M> {
    sequence: u64,
    recorded_at: SystemTime,
    #[serde(default)]
    action: Option<ActionRecord>,
    model: M,
}

/// Encodes every live history entry and the current position.
pub fn encode_history<M, A>(history: &History<M, A>) -> Result<Vec<u8>, serde_json::Error>
where
    M: Serialize,
    A: Serialize + Clone,
{
    let entries = history
        .entries()
        .map(|entry| {
            let action = match &entry.action {
                Some(action) => Some(ActionRecord::from_action(action)?),
                None => entry.unknown_action.clone(),
            };
            Ok(EntryOut {
                sequence: entry.sequence,
                recorded_at: entry.recorded_at,
                action,
                model: &*entry.model,
            })
        })
        .collect::<Result<Vec<_>, serde_json::Error>>()?;
    seal(
        KIND_HISTORY,
        &HistoryOut {
            position: history.position(),
            max_entries: history.max_entries(),
            entries,
        },
    )
}

/// Decodes a history written by [`encode_history`].
///
/// Entry actions with unrecognized tags decode as `None` and are kept in
/// [`Entry::unknown_action`], so encoding the history again writes them back.
pub fn decode_history<M, A>(bytes: &[u8]) -> Result<History<M, A>, DecodeError>
where
    M: DeserializeOwned,
    A: DeserializeOwned + Clone,
{
    let body = open(KIND_HISTORY, bytes)?;
    let decoded: HistoryIn<M> = serde_json::from_value(body)?;
    let entries = decoded
        .entries
        .into_iter()
        .map(|entry| {
            let action = entry.action.as_ref().and_then(ActionRecord::decode);
            let unknown_action = match action {
                Some(_) => None,
                None => entry.action,
            };
            Entry {
                sequence: entry.sequence,
                model: Arc::new(entry.model),
                action,
                unknown_action,
                recorded_at: entry.recorded_at,
            }
        })
        .collect();
    History::from_entries(entries, decoded.position, decoded.max_entries).ok_or_else(|| {
        DecodeError::Malformed(<serde_json::Error as serde::de::Error>::custom(
            "history entries are out of order or position is missing",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "type", content = "data")]
    enum NoteAction {
        Write(String),
    }

    fn note(text: &str) -> Note {
        Note { text: text.into() }
    }

    #[test]
    fn model_round_trips() {
        let bytes = encode(&note("hello")).unwrap();
        assert_eq!(decode::<Note>(&bytes).unwrap(), note("hello"));
    }

    #[test]
    fn newer_reader_floor_is_incompatible() {
        let bytes = br#"{"format":"bulin","version":9,"min_reader_version":7,"kind":"model","body":{"text":"x"}}"#;
        match decode::<Note>(bytes) {
            Err(DecodeError::IncompatibleVersion {
                found,
                required,
                supported,
            }) => {
                assert_eq!((found, required, supported), (9, 7, VERSION));
            }
            other => panic!("expected IncompatibleVersion, got {other:?}"),
        }
    }

    #[test]
    fn newer_version_with_old_floor_still_reads() {
        let bytes = br#"{"format":"bulin","version":5,"min_reader_version":1,"kind":"model","body":{"text":"x"}}"#;
        assert_eq!(decode::<Note>(bytes).unwrap(), note("x"));
    }

    #[test]
    fn foreign_format_is_rejected() {
        let bytes = br#"{"format":"other","version":1,"kind":"model","body":{}}"#;
        assert!(matches!(decode::<Note>(bytes), Err(DecodeError::WrongFormat { .. })));
        assert!(matches!(decode::<Note>(b"not json"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn history_round_trips_position_and_actions() {
        let mut history: History<Note, NoteAction> = History::new(Arc::new(note("")), 8);
        history.record(Arc::new(note("a")), Some(NoteAction::Write("a".into())));
        history.record(Arc::new(note("ab")), Some(NoteAction::Write("ab".into())));
        history.undo();

        let bytes = encode_history(&history).unwrap();
        let decoded: History<Note, NoteAction> = decode_history(&bytes).unwrap();

        assert_eq!(decoded.position(), history.position());
        assert_eq!(decoded.len(), 3);
        assert_eq!(*decoded.current().model, note("a"));
        let actions: Vec<_> = decoded.entries().map(|entry| entry.action.clone()).collect();
        assert_eq!(
            actions,
            vec![None, Some(NoteAction::Write("a".into())), Some(NoteAction::Write("ab".into()))]
        );
    }

    #[test]
    fn unknown_entry_actions_survive_a_round_trip() {
        let mut history: History<Note, NoteAction> = History::new(Arc::new(note("")), 8);
        history.record(Arc::new(note("a")), Some(NoteAction::Write("a".into())));
        let mut value: serde_json::Value = serde_json::from_slice(&encode_history(&history).unwrap()).unwrap();
        value["body"]["entries"][1]["action"] = serde_json::json!({"type": "Archive", "data": {"shelf": 4}});
        let bytes = serde_json::to_vec(&value).unwrap();

        let decoded: History<Note, NoteAction> = decode_history(&bytes).unwrap();
        let entry = decoded.entries().nth(1).unwrap();
        assert_eq!(entry.action, None);
        assert_eq!(entry.unknown_action.as_ref().map(|record| record.tag.as_str()), Some("Archive"));

        let again: serde_json::Value = serde_json::from_slice(&encode_history(&decoded).unwrap()).unwrap();
        assert_eq!(
            again["body"]["entries"][1]["action"],
            serde_json::json!({"type": "Archive", "data": {"shelf": 4}})
        );
        assert!(again["body"]["entries"][0].get("action").is_none());
    }

    #[test]
    fn model_file_is_not_a_history() {
        let bytes = encode(&note("x")).unwrap();
        let result = decode_history::<Note, NoteAction>(&bytes);
        assert!(matches!(result, Err(DecodeError::WrongFormat { .. })));
    }
}
