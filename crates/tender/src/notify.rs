//! Progress notifications for the caller's UI

use log::{error, info};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    InProgress { project_id: String },
    Success { project_id: String, file_name: String },
    Error { project_id: String, message: String },
}

/// Receives generation progress; purely observational
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Forwards notifications to the log
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        match notification {
            Notification::InProgress { project_id } => {
                info!("Generating tender submission for project {project_id}")
            }
            Notification::Success {
                project_id,
                file_name,
            } => info!("Tender submission for project {project_id} ready: {file_name}"),
            Notification::Error {
                project_id,
                message,
            } => error!("Tender submission for project {project_id} failed: {message}"),
        }
    }
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<Notification> {
        match self.received.lock() {
            Ok(received) => received.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        let mut received = match self.received.lock() {
            Ok(received) => received,
            Err(poisoned) => poisoned.into_inner(),
        };
        received.push(notification.clone());
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, notification: &Notification) {
        (**self).notify(notification)
    }
}
