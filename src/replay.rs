//! Recording action logs and replaying them through a reducer.
//!
//! A log is JSON lines, one [`LogEntry`] per line: the state the session
//! started from, then every committed action and history move in order.
//! Replay runs the reducer and the history only; effects are described but
//! not executed, since every action they dispatched was recorded as well.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::{panic_message, DecodeError, ReplayError};
use crate::history::{History, Seek};
use crate::store::{
    try_reduce, ActionRecord, ChangeCause, Reducer, Store, Subscription, DEFAULT_HISTORY_ENTRIES,
};

/// One line of an action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogEntry {
    /// State to start from: a [`codec`] history envelope, or a model
    /// envelope for stores without history.
    Start(serde_json::Value),
    Action(ActionRecord),
    Undo,
    Redo,
    Goto(u64),
}

/// An ordered list of log entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionLog {
    entries: Vec<LogEntry>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Appends `action` as a tagged record.
    pub fn record<A: Serialize>(&mut self, action: &A) -> Result<(), serde_json::Error> {
        self.entries.push(LogEntry::Action(ActionRecord::from_action(action)?));
        Ok(())
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses JSON lines. Blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self, ReplayError> {
        let mut log = Self::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(line).map_err(|source| ReplayError::Malformed {
                line: index + 1,
                source,
            })?;
            log.push(entry);
        }
        Ok(log)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    pub fn to_json_lines(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&serde_json::to_string(entry)?);
            out.push('\n');
        }
        Ok(out)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json_lines()?)?;
        Ok(())
    }
}

/// Records a store's session so [`replay`] can rebuild it.
///
/// The log opens with the store's history (or model) at attach time, then
/// follows every commit that changed the model and every history move.
/// Commits that left the model untouched are not logged: replay never runs
/// effects, so they cannot affect the result. Transient commits that do
/// change the model, such as the animated `time` uniform, are logged, so a
/// long animated session grows the log by one line per frame.
///
/// Attach before dispatching to the store; anything committed in between
/// is in neither the start state nor the log.
pub struct Recorder {
    log: Arc<Mutex<ActionLog>>,
    _subscription: Subscription,
}

impl Recorder {
    pub fn attach<R: Reducer>(store: &Store<R>) -> Result<Self, serde_json::Error>
    where
        R::Model: Serialize,
        R::Action: Serialize,
    {
        let start = match store.history() {
            Some(history) => codec::encode_history(&history)?,
            None => codec::encode(&*store.current())?,
        };
        let mut log = ActionLog::new();
        log.push(LogEntry::Start(serde_json::from_slice(&start)?));

        let log = Arc::new(Mutex::new(log));
        let sink = Arc::clone(&log);
        let last = Mutex::new(store.current());
        let subscription = store.subscribe(move |change| {
            let unchanged = {
                let mut last = last.lock();
                let unchanged = Arc::ptr_eq(&last, &change.model);
                *last = Arc::clone(&change.model);
                unchanged
            };
            let entry = match &change.cause {
                ChangeCause::Action(_) if unchanged => return,
                ChangeCause::Action(action) => match ActionRecord::from_action(action) {
                    Ok(record) => LogEntry::Action(record),
                    Err(e) => {
                        tracing::warn!(error = %e, ?action, "failed to record action");
                        return;
                    }
                },
                ChangeCause::Undo => LogEntry::Undo,
                ChangeCause::Redo => LogEntry::Redo,
                ChangeCause::Jump(sequence) => LogEntry::Goto(*sequence),
            };
            sink.lock().push(entry);
        });
        Ok(Self {
            log,
            _subscription: subscription,
        })
    }

    /// A copy of everything recorded so far.
    pub fn snapshot(&self) -> ActionLog {
        self.log.lock().clone()
    }
}

/// Result of a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct Replayed<M> {
    pub model: M,
    pub applied: usize,
    /// Records whose tag this build does not recognize.
    pub skipped: usize,
    /// Undo, redo and jump entries that moved the history.
    pub moves: usize,
    /// Descriptions of the effects the reducer asked for, in order.
    pub effects: Vec<String>,
}

/// Folds `entries` over `initial` with `R`, moving through history the way
/// the recorded store did.
///
/// A [`LogEntry::Start`] replaces `initial` and the history so far. A
/// reducer panic stops the replay with
/// [`ReplayError::ReducerContractViolation`] naming the offending entry.
pub fn replay<R>(initial: R::Model, entries: &[LogEntry]) -> Result<Replayed<R::Model>, ReplayError>
where
    R: Reducer,
    R::Model: DeserializeOwned,
    R::Action: DeserializeOwned,
{
    let mut history: History<R::Model, R::Action> =
        History::new(Arc::new(initial), DEFAULT_HISTORY_ENTRIES);
    let mut current = Arc::clone(&history.current().model);
    let (mut applied, mut skipped, mut moves) = (0, 0, 0);
    let mut effects = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let seek = match entry {
            LogEntry::Start(state) => {
                history = start_history::<R>(state)?;
                current = Arc::clone(&history.current().model);
                continue;
            }
            LogEntry::Action(record) => {
                let Some(action) = record.decode::<R::Action>() else {
                    skipped += 1;
                    continue;
                };
                let transition = try_reduce::<R>((*current).clone(), action.clone()).map_err(|payload| {
                    ReplayError::ReducerContractViolation {
                        index,
                        message: panic_message(payload.as_ref()),
                    }
                })?;
                effects.extend(transition.effects.iter().map(|effect| effect.describe()));
                // Same rule as the live store: only changes are undo steps.
                if transition.model != *current {
                    let model = Arc::new(transition.model);
                    if R::records(&action) {
                        history.record(Arc::clone(&model), Some(action));
                    }
                    current = model;
                }
                applied += 1;
                continue;
            }
            LogEntry::Undo => history.undo(),
            LogEntry::Redo => history.redo(),
            LogEntry::Goto(sequence) => history.goto(*sequence),
        };
        if let Seek::Moved { model, .. } = seek {
            effects.extend(R::on_travel(&model).iter().map(|effect| effect.describe()));
            current = model;
            moves += 1;
        }
    }

    tracing::debug!(applied, skipped, moves, "replay finished");
    Ok(Replayed {
        model: Arc::unwrap_or_clone(current),
        applied,
        skipped,
        moves,
        effects,
    })
}

fn start_history<R>(state: &serde_json::Value) -> Result<History<R::Model, R::Action>, ReplayError>
where
    R: Reducer,
    R::Model: DeserializeOwned,
    R::Action: DeserializeOwned,
{
    let bytes = serde_json::to_vec(state).map_err(|e| ReplayError::Start(DecodeError::Malformed(e)))?;
    match codec::decode_history(&bytes) {
        Ok(history) => Ok(history),
        Err(DecodeError::WrongFormat { .. }) => {
            let model = codec::decode(&bytes).map_err(ReplayError::Start)?;
            Ok(History::new(Arc::new(model), DEFAULT_HISTORY_ENTRIES))
        }
        Err(e) => Err(ReplayError::Start(e)),
    }
}
