//! Session-end notifications and in-app toasts.
//!
//! OS-level delivery goes through a [`NotificationSender`]. Every failure on
//! that path (unsupported host, denied permission, delivery error) degrades to
//! the in-app toast, which is always shown.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::NotifyError;
use crate::timer::SessionType;

pub const DEFAULT_TOAST_DURATION_MS: u64 = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    /// Not asked yet.
    Default,
    Unsupported,
}

/// OS notification backend.
#[allow(async_fn_in_trait)]
pub trait NotificationSender {
    fn permission(&self) -> Permission;
    async fn request_permission(&self) -> Result<Permission, NotifyError>;
    fn send(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Desktop notifications through the platform notification daemon.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl NotificationSender for DesktopNotifier {
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    async fn request_permission(&self) -> Result<Permission, NotifyError> {
        Ok(Permission::Granted)
    }

    fn send(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        notify_rust::Notification::new()
            .appname("Pomodori")
            .summary(title)
            .body(body)
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::Delivery(e.to_string()))
    }
}

/// Backend for hosts without notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl NotificationSender for NoopNotifier {
    fn permission(&self) -> Permission {
        Permission::Unsupported
    }

    async fn request_permission(&self) -> Result<Permission, NotifyError> {
        Err(NotifyError::Unsupported)
    }

    fn send(&self, _title: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Unsupported)
    }
}

/// Fixed title and body shown when a session ends.
pub fn session_message(session: SessionType) -> (&'static str, &'static str) {
    match session {
        SessionType::Focus => ("Focus session finished", "Time for a break!"),
        SessionType::Short => ("Short break finished", "Back to focus 💪"),
        SessionType::Long => ("Long break finished", "Cycle complete! 🎉"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    pub expires_at_ms: u64,
}

pub struct NotificationDispatcher<N> {
    sender: N,
    os_enabled: bool,
    toast_duration_ms: u64,
    toast: Option<Toast>,
}

impl<N: NotificationSender> NotificationDispatcher<N> {
    pub fn new(sender: N) -> Self {
        Self {
            sender,
            os_enabled: true,
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            toast: None,
        }
    }

    pub fn with_toast_duration(mut self, ms: u64) -> Self {
        self.toast_duration_ms = ms;
        self
    }

    /// Turn OS notifications off entirely; toasts still show.
    pub fn with_os_notifications(mut self, enabled: bool) -> Self {
        self.os_enabled = enabled;
        self
    }

    pub fn sender(&self) -> &N {
        &self.sender
    }

    /// Whether OS notifications may be shown, asking the user if they have
    /// not decided yet. Never fails.
    pub async fn ensure_permission(&self) -> bool {
        match self.sender.permission() {
            Permission::Granted => true,
            Permission::Denied | Permission::Unsupported => false,
            Permission::Default => match self.sender.request_permission().await {
                Ok(permission) => permission == Permission::Granted,
                Err(err) => {
                    warn!(error = %err, "notification permission request failed");
                    false
                }
            },
        }
    }

    /// Announce the end of `session`: OS notification when permitted, toast always.
    pub fn notify_session_end(&mut self, session: SessionType, now_ms: u64) {
        let (title, body) = session_message(session);

        if self.os_enabled && self.sender.permission() == Permission::Granted {
            if let Err(err) = self.sender.send(title, body) {
                warn!(error = %err, "session notification not delivered");
            }
        } else {
            debug!(?session, "OS notification skipped");
        }

        self.show_toast(format!("{title} — {body}"), now_ms);
    }

    /// Show `message`, replacing any visible toast and restarting the expiry.
    pub fn show_toast(&mut self, message: impl Into<String>, now_ms: u64) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at_ms: now_ms.saturating_add(self.toast_duration_ms),
        });
    }

    /// The toast visible at `now_ms`, if any.
    pub fn toast(&self, now_ms: u64) -> Option<&str> {
        self.toast
            .as_ref()
            .filter(|t| now_ms < t.expires_at_ms)
            .map(|t| t.message.as_str())
    }

    /// Drop an expired toast. Returns true if one was cleared.
    pub fn expire(&mut self, now_ms: u64) -> bool {
        match &self.toast {
            Some(t) if now_ms >= t.expires_at_ms => {
                self.toast = None;
                true
            }
            _ => false,
        }
    }
}
