//! Task Queue Tests
//!
//! Tests for:
//! - FIFO execution against the owned state
//! - Tasks queued while draining
//! - Cross-thread senders

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use phoenix::tasks::{TaskQueue, TaskSender};

#[test]
fn tasks_run_in_fifo_order() {
    let queue: TaskQueue<Vec<u32>> = TaskQueue::new();
    let sender = queue.sender();
    for i in 0..5 {
        assert!(sender.send(move |log| log.push(i)));
    }
    assert_eq!(queue.pending(), 5);

    let mut log = Vec::new();
    assert_eq!(queue.run_pending(&mut log), 5);
    assert_eq!(log, vec![0, 1, 2, 3, 4]);
    assert_eq!(queue.pending(), 0);
}

#[test]
fn tasks_queued_during_a_drain_wait_for_the_next_one() {
    struct State {
        sender: TaskSender<State>,
        log: Vec<&'static str>,
    }

    let queue = TaskQueue::new();
    let mut state = State {
        sender: queue.sender(),
        log: Vec::new(),
    };

    state.sender.send(|s: &mut State| {
        s.log.push("first");
        s.sender.send(|s: &mut State| s.log.push("follow-up"));
    });

    assert_eq!(queue.run_pending(&mut state), 1);
    assert_eq!(state.log, vec!["first"]);

    assert_eq!(queue.run_pending(&mut state), 1);
    assert_eq!(state.log, vec!["first", "follow-up"]);
}

#[test]
fn empty_queue_runs_nothing() {
    let queue: TaskQueue<u32> = TaskQueue::new();
    let mut state = 7;
    assert_eq!(queue.run_pending(&mut state), 0);
    assert_eq!(state, 7);
}

#[test]
fn tasks_can_be_sent_from_worker_threads() {
    let queue: TaskQueue<u32> = TaskQueue::new();
    let handles: Vec<_> = (1..=4)
        .map(|n| {
            let sender = queue.sender();
            std::thread::spawn(move || sender.send(move |sum| *sum += n))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }

    let mut sum = 0;
    queue.run_pending(&mut sum);
    assert_eq!(sum, 10);
}

#[test]
fn send_after_queue_drop_is_discarded() {
    let queue: TaskQueue<()> = TaskQueue::new();
    let sender = queue.sender();
    drop(queue);

    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    assert!(!sender.send(move |_: &mut ()| flag.store(true, Ordering::SeqCst)));
    assert!(!ran.load(Ordering::SeqCst));
}
