use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};

use crate::lifecycle::{EventSink, TransitionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayrollGrant {
    Created,
    Modified,
}

/// Raised when a user ends up in a role that can see payroll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollAlert {
    pub username: String,
    pub actor: String,
    pub grant: PayrollGrant,
}

impl PayrollAlert {
    pub fn text(&self) -> String {
        match self.grant {
            PayrollGrant::Created => format!(
                "<!channel> User {} has been created by {} with Payroll Access",
                self.username, self.actor
            ),
            PayrollGrant::Modified => format!(
                "<!channel> User {} has been modified by {} to have Payroll Access",
                self.username, self.actor
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Notification {
    Transition(TransitionEvent),
    PayrollAlert(PayrollAlert),
}

/// Producer half of the bounded notification queue. Never blocks; when the
/// worker falls behind, new notifications are dropped with a warning.
#[derive(Clone)]
pub struct NotificationQueue {
    tx: Sender<Notification>,
}

impl NotificationQueue {
    pub fn new(capacity: usize) -> (Self, Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    pub fn push(&self, notification: Notification) {
        match self.tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                tracing::warn!(
                    notification = kind_of(&dropped),
                    "notification queue full; dropping"
                );
            }
            Err(TrySendError::Closed(dropped)) => {
                tracing::warn!(
                    notification = kind_of(&dropped),
                    "notification worker stopped; dropping"
                );
            }
        }
    }

    pub fn alert(&self, alert: PayrollAlert) {
        self.push(Notification::PayrollAlert(alert));
    }
}

impl EventSink for NotificationQueue {
    fn publish(&self, event: TransitionEvent) {
        self.push(Notification::Transition(event));
    }
}

fn kind_of(notification: &Notification) -> &'static str {
    match notification {
        Notification::Transition(event) => event.kind.as_str(),
        Notification::PayrollAlert(_) => "payroll_alert",
    }
}
