//! Shared test models, stores and helpers.

#![allow(dead_code, unused_imports)]

use bulin::doc::{self, Project, ProjectReducer};
use bulin::effect::Effect;
use bulin::persist::{Boxed, Map, Vector};
use bulin::store::{Action, DispatchMode, Model, Reducer, Store, Transition};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A small board: a title, an ordered list of cards and tag counts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Board {
    pub title: Boxed<String>,
    pub cards: Vector<String>,
    pub tags: Map<String, u32>,
}

impl Model for Board {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BoardAction {
    Rename(String),
    AddCard(String),
    Tag { name: String, count: u32 },
    /// Adds `card` after `after_ms` through a delay effect.
    AddLater { card: String, after_ms: u64 },
}

impl Action for BoardAction {}

pub struct BoardReducer;

impl Reducer for BoardReducer {
    type Model = Board;
    type Action = BoardAction;

    fn reduce(mut board: Board, action: BoardAction) -> Transition<Board, BoardAction> {
        match action {
            BoardAction::Rename(title) => {
                board.title = Boxed::new(title);
                Transition::new(board)
            }
            BoardAction::AddCard(card) => {
                board.cards.push_back(card);
                Transition::new(board)
            }
            BoardAction::Tag { name, count } => {
                board.tags.insert(name, count);
                Transition::new(board)
            }
            BoardAction::AddLater { card, after_ms } => Transition::new(board).with(Effect::delay(
                "add-later",
                Duration::from_millis(after_ms),
                BoardAction::AddCard(card),
            )),
        }
    }
}

/// A board with a few cards so vectors have shared structure worth checking.
pub fn sample_board() -> Board {
    let mut board = Board {
        title: Boxed::new("sprint".to_string()),
        ..Board::default()
    };
    for n in 0..40 {
        board.cards.push_back(format!("card-{n}"));
    }
    board.tags.insert("bug".to_string(), 3);
    board
}

pub fn board_store() -> Store<BoardReducer> {
    Store::builder()
        .mode(DispatchMode::Immediate)
        .history(Some(64))
        .build(sample_board())
}

/// Project store in immediate mode with the document services installed.
///
/// Inside a tokio test the store picks up the test's runtime for task
/// effects.
pub fn project_store() -> Store<ProjectReducer> {
    Store::builder()
        .mode(DispatchMode::Immediate)
        .history(Some(128))
        .deps(doc::services())
        .build(Project::default())
}

/// Polls `check` until it holds or `timeout` passes.
pub async fn wait_until(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}
