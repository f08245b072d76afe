use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::AbortHandle;

/// Lines kept by a progress log; older lines fall off the front
pub const PROGRESS_LOG_CAPACITY: usize = 5;

#[derive(Debug, Default)]
struct LogState {
    lines: VecDeque<String>,
    finished: bool,
}

impl LogState {
    fn append(&mut self, message: &str) {
        let line = format!("[{}] {}", Utc::now().format("%H:%M:%S"), message);
        if self.lines.len() == PROGRESS_LOG_CAPACITY {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }
}

/// Bounded, timestamped log of a long-running request
#[derive(Debug, Clone, Default)]
pub struct ProgressLog {
    state: Arc<Mutex<LogState>>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, message: &str) {
        self.lock().append(message);
    }

    /// Append the closing line. Scheduled lines that fire afterwards are dropped.
    pub fn finish(&self, message: &str) {
        let mut state = self.lock();
        state.append(message);
        state.finished = true;
    }

    fn push_scheduled(&self, message: &str) {
        let mut state = self.lock();
        if !state.finished {
            state.append(message);
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lock().lines.iter().cloned().collect()
    }
}

/// Lines emitted into a [`ProgressLog`] after fixed delays.
///
/// Clones share the same timers. Dropping any clone (or calling
/// [`ScheduledLines::cancel`]) aborts every line that has not fired yet.
#[derive(Clone)]
pub struct ScheduledLines {
    handles: Arc<Vec<AbortHandle>>,
}

impl ScheduledLines {
    pub fn schedule(log: &ProgressLog, lines: &[(Duration, &'static str)]) -> Self {
        let handles = lines
            .iter()
            .map(|&(delay, message)| {
                let log = log.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    log.push_scheduled(message);
                })
                .abort_handle()
            })
            .collect();

        Self {
            handles: Arc::new(handles),
        }
    }

    pub fn cancel(&self) {
        for handle in self.handles.iter() {
            handle.abort();
        }
    }
}

impl Drop for ScheduledLines {
    fn drop(&mut self) {
        self.cancel();
    }
}
