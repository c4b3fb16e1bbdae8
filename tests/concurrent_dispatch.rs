//! Dispatching into one store from many threads at once.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use bulin::store::{ChangeCause, DispatchMode, Store};
use common::*;
use parking_lot::Mutex;

const THREADS: usize = 8;
const PER_THREAD: usize = 250;

fn unbounded_store(mode: DispatchMode) -> Store<BoardReducer> {
    Store::builder().mode(mode).history(None).build(Board::default())
}

/// Each thread `t` adds cards "t:0", "t:1", ... in order.
fn spawn_writers(store: &Store<BoardReducer>) -> Vec<thread::JoinHandle<()>> {
    (0..THREADS)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    store.dispatch(BoardAction::AddCard(format!("{t}:{i}")));
                }
            })
        })
        .collect()
}

/// Every thread's cards are all present, once each, in dispatch order.
fn assert_per_thread_order(cards: &[String]) {
    assert_eq!(cards.len(), THREADS * PER_THREAD);
    let mut next = [0usize; THREADS];
    for card in cards {
        let (t, i) = card.split_once(':').unwrap();
        let t: usize = t.parse().unwrap();
        let i: usize = i.parse().unwrap();
        assert_eq!(i, next[t], "thread {t} committed out of order at {card}");
        next[t] += 1;
    }
    assert!(next.iter().all(|&n| n == PER_THREAD));
}

#[test]
fn immediate_dispatch_from_many_threads_keeps_each_threads_order() {
    let store = unbounded_store(DispatchMode::Immediate);
    let notified = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&notified);
    let _subscription = store.subscribe(move |change| {
        if let ChangeCause::Action(BoardAction::AddCard(card)) = &change.cause {
            sink.lock().push(card.clone());
        }
    });

    for writer in spawn_writers(&store) {
        writer.join().unwrap();
    }

    assert_eq!(store.pending(), 0);
    let cards: Vec<String> = store.current().cards.iter().cloned().collect();
    assert_per_thread_order(&cards);
    // Subscribers saw commits in exactly the order they were applied.
    assert_eq!(*notified.lock(), cards);
    assert_eq!(store.revision(), (THREADS * PER_THREAD) as u64);
}

#[test]
fn deferred_queue_drained_from_another_thread_loses_nothing() {
    let store = unbounded_store(DispatchMode::Deferred);
    let writers_done = Arc::new(AtomicBool::new(false));

    let drainer = {
        let store = store.clone();
        let writers_done = Arc::clone(&writers_done);
        thread::spawn(move || loop {
            store.drain();
            if writers_done.load(Ordering::SeqCst) && store.pending() == 0 {
                break;
            }
            thread::yield_now();
        })
    };

    for writer in spawn_writers(&store) {
        writer.join().unwrap();
    }
    writers_done.store(true, Ordering::SeqCst);
    drainer.join().unwrap();

    let cards: Vec<String> = store.current().cards.iter().cloned().collect();
    assert_per_thread_order(&cards);
}

#[test]
fn derived_dispatches_under_contention_see_every_earlier_commit() {
    let store = unbounded_store(DispatchMode::Immediate);
    let writers: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    store.dispatch_with(move |board: &Board| {
                        BoardAction::AddCard(format!("{t}@{}", board.cards.len()))
                    });
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let board = store.current();
    assert_eq!(board.cards.len(), THREADS * PER_THREAD);
    // Each card names the length it was derived from, which is its own index.
    for (index, card) in board.cards.iter().enumerate() {
        let (_, seen) = card.split_once('@').unwrap();
        assert_eq!(seen.parse::<usize>().unwrap(), index);
    }
}
