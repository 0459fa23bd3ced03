use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::{FilesystemDto, ImageBackend};
use crate::tree::DirNode;

/// Work handed to the background worker.
///
/// Directory loads carry the sequence number the controller issued them
/// under and a token that is cancelled when a later navigation supersedes
/// them.
#[derive(Debug, Clone)]
pub enum Task {
    LoadImageName,
    LoadFilesystems,
    LoadDir {
        seq: u64,
        id: i64,
        token: CancellationToken,
    },
}

#[derive(Debug, Clone)]
pub enum TaskResult {
    ImageNameLoaded { name: String },
    FilesystemsLoaded { filesystems: Vec<FilesystemDto> },
    DirLoaded { seq: u64, node: DirNode },
    DirCancelled { seq: u64 },
    DirFailed { seq: u64, message: String },
    Error { message: String },
}

/// Background fetch loop. Owns the backend; processes tasks in arrival order
/// and exits once the task channel closes or the main loop drops the result
/// receiver.
pub async fn run_worker<B: ImageBackend + 'static>(
    backend: B,
    mut task_receiver: mpsc::Receiver<Task>,
    result_sender: mpsc::Sender<TaskResult>,
) {
    while let Some(task) = task_receiver.recv().await {
        let result = match task {
            Task::LoadImageName => match backend.fetch_name().await {
                Ok(name) => TaskResult::ImageNameLoaded { name },
                Err(e) => TaskResult::Error {
                    message: e.to_string(),
                },
            },
            Task::LoadFilesystems => match backend.fetch_filesystems().await {
                Ok(filesystems) => TaskResult::FilesystemsLoaded { filesystems },
                Err(e) => TaskResult::Error {
                    message: e.to_string(),
                },
            },
            Task::LoadDir { seq, id, token } => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        log::debug!("LoadDir seq {} cancelled before completion", seq);
                        TaskResult::DirCancelled { seq }
                    }
                    fetched = backend.fetch_dir(id) => match fetched {
                        Ok(node) => TaskResult::DirLoaded { seq, node },
                        Err(e) => TaskResult::DirFailed {
                            seq,
                            message: e.to_string(),
                        },
                    },
                }
            }
        };

        if let Err(_) = result_sender.send(result).await {
            // Main thread has dropped the receiver, exit worker
            break;
        }
    }
}
