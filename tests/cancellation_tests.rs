use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use layerscope::api::{FilesystemDto, ImageBackend};
use layerscope::app::App;
use layerscope::config::Config;
use layerscope::error::Result;
use layerscope::fetch::{run_worker, Task, TaskResult};
use layerscope::tree::DirNode;

/// Backend whose directory fetches never finish on their own; only
/// cancellation can end them.
struct StalledBackend;

#[async_trait]
impl ImageBackend for StalledBackend {
    async fn fetch_name(&self) -> Result<String> {
        Ok("stalled:latest".to_string())
    }

    async fn fetch_filesystems(&self) -> Result<Vec<FilesystemDto>> {
        Ok(Vec::new())
    }

    async fn fetch_dir(&self, id: i64) -> Result<DirNode> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(DirNode::new_dir(id, "late".to_string(), 1))
    }
}

#[tokio::test]
async fn test_worker_reports_cancellation_for_pre_cancelled_token() {
    let (task_sender, task_receiver) = mpsc::channel(32);
    let (result_sender, mut result_receiver) = mpsc::channel(32);
    let worker_handle = tokio::spawn(run_worker(StalledBackend, task_receiver, result_sender));

    // Cancel before the worker ever sees the task
    let token = CancellationToken::new();
    token.cancel();
    task_sender
        .send(Task::LoadDir {
            seq: 1,
            id: 7,
            token,
        })
        .await
        .unwrap();

    let result = timeout(Duration::from_secs(1), result_receiver.recv())
        .await
        .expect("worker did not answer in time")
        .expect("worker dropped the result channel");
    match result {
        TaskResult::DirCancelled { seq } => assert_eq!(seq, 1),
        other => panic!("expected DirCancelled, got {:?}", other),
    }

    drop(task_sender);
    let _ = timeout(Duration::from_secs(1), worker_handle).await;
}

#[tokio::test]
async fn test_worker_cancellation_interrupts_slow_fetch() {
    let (task_sender, task_receiver) = mpsc::channel(32);
    let (result_sender, mut result_receiver) = mpsc::channel(32);
    let worker_handle = tokio::spawn(run_worker(StalledBackend, task_receiver, result_sender));

    let token = CancellationToken::new();
    task_sender
        .send(Task::LoadDir {
            seq: 3,
            id: 9,
            token: token.clone(),
        })
        .await
        .unwrap();

    // Cancel while the fetch is underway
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let start_time = Instant::now();
    let result = timeout(Duration::from_secs(5), result_receiver.recv())
        .await
        .expect("worker did not answer in time")
        .expect("worker dropped the result channel");
    let elapsed = start_time.elapsed();

    match result {
        TaskResult::DirCancelled { seq } => assert_eq!(seq, 3),
        other => panic!("expected DirCancelled, got {:?}", other),
    }
    // Nowhere near the backend's 60 second stall
    assert!(elapsed < Duration::from_secs(2), "should cancel promptly");

    drop(task_sender);
    let _ = timeout(Duration::from_secs(1), worker_handle).await;
}

#[tokio::test]
async fn test_navigation_supersedes_previous_fetch() {
    let (task_sender, mut task_receiver) = mpsc::channel(32);
    let mut app = App::new(Config::default());

    app.navigate_to(1, &task_sender);
    let first_token = match task_receiver.recv().await {
        Some(Task::LoadDir { token, .. }) => token,
        other => panic!("expected LoadDir, got {:?}", other),
    };
    assert!(!first_token.is_cancelled());

    // A second navigation before the first result lands
    app.navigate_to(2, &task_sender);
    assert!(first_token.is_cancelled());
    let second_token = match task_receiver.recv().await {
        Some(Task::LoadDir { token, .. }) => token,
        other => panic!("expected LoadDir, got {:?}", other),
    };
    assert!(!second_token.is_cancelled());
}

#[tokio::test]
async fn test_stale_result_leaves_stack_unchanged() {
    let (task_sender, mut task_receiver) = mpsc::channel(32);
    let mut app = App::new(Config::default());

    app.navigate_to(1, &task_sender);
    let first_seq = match task_receiver.recv().await {
        Some(Task::LoadDir { seq, .. }) => seq,
        other => panic!("expected LoadDir, got {:?}", other),
    };
    app.navigate_to(2, &task_sender);
    let second_seq = match task_receiver.recv().await {
        Some(Task::LoadDir { seq, .. }) => seq,
        other => panic!("expected LoadDir, got {:?}", other),
    };

    // The superseded result arrives late and must be discarded
    app.apply_task_result(
        TaskResult::DirLoaded {
            seq: first_seq,
            node: DirNode::new_dir(1, "stale".to_string(), 10),
        },
        &task_sender,
    );
    assert!(app.stack.is_empty());
    assert!(app.is_loading);

    // The current result still applies normally
    app.apply_task_result(
        TaskResult::DirLoaded {
            seq: second_seq,
            node: DirNode::new_dir(2, "fresh".to_string(), 10),
        },
        &task_sender,
    );
    assert_eq!(app.stack.depth(), 1);
    assert_eq!(app.stack.current().map(|node| node.id), Some(2));
    assert!(!app.is_loading);
}

#[tokio::test]
async fn test_stale_failure_is_discarded() {
    let (task_sender, mut task_receiver) = mpsc::channel(32);
    let mut app = App::new(Config::default());

    app.navigate_to(1, &task_sender);
    let first_seq = match task_receiver.recv().await {
        Some(Task::LoadDir { seq, .. }) => seq,
        other => panic!("expected LoadDir, got {:?}", other),
    };
    app.navigate_to(2, &task_sender);
    let _ = task_receiver.recv().await;

    app.apply_task_result(
        TaskResult::DirFailed {
            seq: first_seq,
            message: "HTTP error: timeout".to_string(),
        },
        &task_sender,
    );

    // The newer fetch is still pending; the old failure changed nothing
    assert!(app.is_loading);
    assert!(app.has_pending_fetch());
}

#[tokio::test]
async fn test_current_failure_clears_loading_state() {
    let (task_sender, mut task_receiver) = mpsc::channel(32);
    let mut app = App::new(Config::default());

    app.navigate_to(1, &task_sender);
    let seq = match task_receiver.recv().await {
        Some(Task::LoadDir { seq, .. }) => seq,
        other => panic!("expected LoadDir, got {:?}", other),
    };

    app.apply_task_result(
        TaskResult::DirFailed {
            seq,
            message: "HTTP error: timeout".to_string(),
        },
        &task_sender,
    );

    assert!(!app.is_loading);
    assert!(!app.has_pending_fetch());
    assert!(app.stack.is_empty());
    assert!(app.status_message.contains("timeout"));
}

#[tokio::test]
async fn test_navigate_up_cancels_inflight_child_fetch() {
    let (task_sender, mut task_receiver) = mpsc::channel(32);
    let mut app = App::new(Config::default());

    // Land on the root, then one level down
    app.navigate_to(1, &task_sender);
    let seq = match task_receiver.recv().await {
        Some(Task::LoadDir { seq, .. }) => seq,
        other => panic!("expected LoadDir, got {:?}", other),
    };
    let root = DirNode::new_dir(1, "rootfs".to_string(), 300)
        .with_children(vec![DirNode::new_dir(10, "var".to_string(), 300)]);
    app.apply_task_result(TaskResult::DirLoaded { seq, node: root }, &task_sender);

    app.navigate_to(10, &task_sender);
    let seq = match task_receiver.recv().await {
        Some(Task::LoadDir { seq, .. }) => seq,
        other => panic!("expected LoadDir, got {:?}", other),
    };
    let var = DirNode::new_dir(10, "var".to_string(), 300)
        .with_children(vec![DirNode::new_dir(20, "cache".to_string(), 300)]);
    app.apply_task_result(TaskResult::DirLoaded { seq, node: var }, &task_sender);
    assert_eq!(app.stack.depth(), 2);

    // Descend again, then immediately go up before the fetch lands
    app.navigate_to(20, &task_sender);
    let (seq, token) = match task_receiver.recv().await {
        Some(Task::LoadDir { seq, token, .. }) => (seq, token),
        other => panic!("expected LoadDir, got {:?}", other),
    };
    assert!(app.navigate_up());
    assert!(token.is_cancelled());
    assert_eq!(app.stack.depth(), 1);

    // The abandoned fetch result must not push under the wrong parent
    app.apply_task_result(
        TaskResult::DirLoaded {
            seq,
            node: DirNode::new_dir(20, "cache".to_string(), 300),
        },
        &task_sender,
    );
    assert_eq!(app.stack.depth(), 1);
    assert_eq!(app.stack.current().map(|node| node.id), Some(1));
}

#[tokio::test]
async fn test_multiple_rapid_navigations() {
    let (task_sender, mut task_receiver) = mpsc::channel(32);
    let mut app = App::new(Config::default());

    let mut tokens = Vec::new();
    for id in 1..=10 {
        app.navigate_to(id, &task_sender);
        let token = match task_receiver.recv().await {
            Some(Task::LoadDir { token, .. }) => token,
            other => panic!("expected LoadDir, got {:?}", other),
        };
        tokens.push(token);
    }

    // Every fetch but the last was superseded
    for (i, token) in tokens.iter().enumerate().take(9) {
        assert!(token.is_cancelled(), "token {} should be cancelled", i);
    }
    assert!(!tokens[9].is_cancelled());
    assert!(app.has_pending_fetch());
}
