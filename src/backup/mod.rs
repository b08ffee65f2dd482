//! Best-effort mirror of the collection into a user-chosen backup target.
//!
//! The mirror is an explicit state machine over a [`BackupHandle`]. Its failures are
//! recorded and reported, never propagated: the primary store stays the source of truth.

pub mod file;

use std::{io, mem};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::storage::export_json;
use crate::subscription::Subscription;

pub use file::FileBackupHandle;

pub const SUGGESTED_FILE_NAME: &str = "sub-tracker-backup.json";
pub const AUTOSAVE_ERROR: &str = "Failed to auto-save. Please reconnect backup file.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    /// Undecided; a request may still be granted.
    Prompt,
}

pub trait BackupHandle {
    fn query_permission(&self) -> PermissionState;
    fn request_permission(&mut self) -> PermissionState;
    fn write(&mut self, contents: &str) -> io::Result<()>;
    fn describe(&self) -> String;
}

impl<H: BackupHandle + ?Sized> BackupHandle for Box<H> {
    fn query_permission(&self) -> PermissionState {
        (**self).query_permission()
    }

    fn request_permission(&mut self) -> PermissionState {
        (**self).request_permission()
    }

    fn write(&mut self, contents: &str) -> io::Result<()> {
        (**self).write(contents)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[derive(Debug)]
pub enum BackupState<H> {
    Disconnected,
    ConnectedUnauthorized(H),
    ConnectedAuthorized(H),
}

impl<H> Default for BackupState<H> {
    fn default() -> Self {
        BackupState::Disconnected
    }
}

impl<H> BackupState<H> {
    pub fn label(&self) -> &'static str {
        match self {
            BackupState::Disconnected => "disconnected",
            BackupState::ConnectedUnauthorized(_) => "connected (permission needed)",
            BackupState::ConnectedAuthorized(_) => "connected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Skipped,
    Written,
    Failed(String),
}

#[derive(Debug)]
pub struct BackupMirror<H> {
    state: BackupState<H>,
    last_saved: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl<H> Default for BackupMirror<H> {
    fn default() -> Self {
        Self {
            state: BackupState::Disconnected,
            last_saved: None,
            last_error: None,
        }
    }
}

impl<H: BackupHandle> BackupMirror<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &BackupState<H> {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        !matches!(self.state, BackupState::Disconnected)
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn target(&self) -> Option<String> {
        match &self.state {
            BackupState::Disconnected => None,
            BackupState::ConnectedUnauthorized(handle)
            | BackupState::ConnectedAuthorized(handle) => Some(handle.describe()),
        }
    }

    /// Replaces any current target. Authorized only if permission is already granted.
    pub fn connect(&mut self, handle: H) -> &BackupState<H> {
        self.last_error = None;
        self.state = match handle.query_permission() {
            PermissionState::Granted => BackupState::ConnectedAuthorized(handle),
            _ => BackupState::ConnectedUnauthorized(handle),
        };
        info!(backup = ?self.target(), state = self.state.label(), "backup target connected");
        &self.state
    }

    /// Asks an unauthorized target for access. Returns whether the mirror is now authorized.
    pub fn request_access(&mut self) -> bool {
        self.state = match mem::take(&mut self.state) {
            BackupState::ConnectedUnauthorized(mut handle) => match handle.request_permission() {
                PermissionState::Granted => BackupState::ConnectedAuthorized(handle),
                _ => BackupState::ConnectedUnauthorized(handle),
            },
            other => other,
        };
        matches!(self.state, BackupState::ConnectedAuthorized(_))
    }

    /// Drops authorization after the target refused a write.
    pub fn revoke_detected(&mut self) {
        self.state = match mem::take(&mut self.state) {
            BackupState::ConnectedAuthorized(handle) => BackupState::ConnectedUnauthorized(handle),
            other => other,
        };
    }

    pub fn disconnect(&mut self) -> Option<H> {
        self.last_error = None;
        match mem::take(&mut self.state) {
            BackupState::Disconnected => None,
            BackupState::ConnectedUnauthorized(handle)
            | BackupState::ConnectedAuthorized(handle) => Some(handle),
        }
    }

    /// Writes the collection as pretty JSON to the target, if one is connected.
    pub fn mirror(&mut self, subscriptions: &[Subscription], now: DateTime<Utc>) -> BackupOutcome {
        if matches!(self.state, BackupState::Disconnected) {
            return BackupOutcome::Skipped;
        }
        if matches!(self.state, BackupState::ConnectedUnauthorized(_)) && !self.request_access() {
            return self.fail("permission denied");
        }

        let contents = match export_json(subscriptions) {
            Ok(contents) => contents,
            Err(err) => return self.fail(&err.to_string()),
        };

        let written = match &mut self.state {
            BackupState::ConnectedAuthorized(handle) => Some(handle.write(&contents)),
            _ => None,
        };
        let Some(result) = written else {
            return self.fail("permission denied");
        };

        match result {
            Ok(()) => {
                self.last_saved = Some(now);
                self.last_error = None;
                debug!(count = subscriptions.len(), "backup written");
                BackupOutcome::Written
            }
            Err(err) => {
                if err.kind() == io::ErrorKind::PermissionDenied {
                    self.revoke_detected();
                }
                self.fail(&err.to_string())
            }
        }
    }

    fn fail(&mut self, cause: &str) -> BackupOutcome {
        warn!(cause, "backup auto-save failed");
        self.last_error = Some(AUTOSAVE_ERROR.to_string());
        BackupOutcome::Failed(cause.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::{BillingFrequency, SubscriptionDraft};

    struct StubHandle {
        permission: PermissionState,
        grant_on_request: bool,
        fail_with: Option<io::ErrorKind>,
        written: Vec<String>,
    }

    impl StubHandle {
        fn granted() -> Self {
            Self {
                permission: PermissionState::Granted,
                grant_on_request: true,
                fail_with: None,
                written: Vec::new(),
            }
        }
    }

    impl BackupHandle for StubHandle {
        fn query_permission(&self) -> PermissionState {
            self.permission
        }

        fn request_permission(&mut self) -> PermissionState {
            if self.grant_on_request {
                self.permission = PermissionState::Granted;
            } else {
                self.permission = PermissionState::Denied;
            }
            self.permission
        }

        fn write(&mut self, contents: &str) -> io::Result<()> {
            match self.fail_with {
                Some(kind) => Err(io::Error::new(kind, "stub refused")),
                None => {
                    self.written.push(contents.to_string());
                    Ok(())
                }
            }
        }

        fn describe(&self) -> String {
            "stub".into()
        }
    }

    fn sample() -> Vec<Subscription> {
        vec![Subscription::with_id(
            "1",
            SubscriptionDraft::new("Netflix", 10.0, BillingFrequency::Monthly, "Streaming"),
        )]
    }

    #[test]
    fn disconnected_mirror_skips() {
        let mut mirror: BackupMirror<StubHandle> = BackupMirror::new();
        assert_eq!(mirror.mirror(&sample(), Utc::now()), BackupOutcome::Skipped);
        assert!(mirror.last_saved().is_none());
    }

    #[test]
    fn authorized_write_records_timestamp() {
        let mut mirror = BackupMirror::new();
        mirror.connect(StubHandle::granted());
        let now = Utc::now();

        assert_eq!(mirror.mirror(&sample(), now), BackupOutcome::Written);
        assert_eq!(mirror.last_saved(), Some(now));
        let BackupState::ConnectedAuthorized(handle) = mirror.state() else {
            panic!("expected authorized state");
        };
        assert!(handle.written[0].contains("\"Netflix\""));
        assert!(handle.written[0].contains('\n'));
    }

    #[test]
    fn prompt_is_requested_before_writing() {
        let mut mirror = BackupMirror::new();
        mirror.connect(StubHandle {
            permission: PermissionState::Prompt,
            ..StubHandle::granted()
        });
        assert!(matches!(mirror.state(), BackupState::ConnectedUnauthorized(_)));
        assert_eq!(mirror.mirror(&sample(), Utc::now()), BackupOutcome::Written);
        assert!(matches!(mirror.state(), BackupState::ConnectedAuthorized(_)));
    }

    #[test]
    fn denied_request_records_error() {
        let mut mirror = BackupMirror::new();
        mirror.connect(StubHandle {
            permission: PermissionState::Prompt,
            grant_on_request: false,
            ..StubHandle::granted()
        });
        assert!(matches!(
            mirror.mirror(&sample(), Utc::now()),
            BackupOutcome::Failed(_)
        ));
        assert_eq!(mirror.last_error(), Some(AUTOSAVE_ERROR));
    }

    #[test]
    fn permission_error_on_write_revokes_authorization() {
        let mut mirror = BackupMirror::new();
        mirror.connect(StubHandle {
            fail_with: Some(io::ErrorKind::PermissionDenied),
            grant_on_request: false,
            ..StubHandle::granted()
        });
        assert!(matches!(
            mirror.mirror(&sample(), Utc::now()),
            BackupOutcome::Failed(_)
        ));
        assert!(matches!(mirror.state(), BackupState::ConnectedUnauthorized(_)));
        assert_eq!(mirror.last_error(), Some(AUTOSAVE_ERROR));
    }

    #[test]
    fn other_write_errors_keep_authorization() {
        let mut mirror = BackupMirror::new();
        mirror.connect(StubHandle {
            fail_with: Some(io::ErrorKind::Other),
            ..StubHandle::granted()
        });
        mirror.mirror(&sample(), Utc::now());
        assert!(matches!(mirror.state(), BackupState::ConnectedAuthorized(_)));
        assert!(mirror.last_error().is_some());
    }

    #[test]
    fn disconnect_returns_handle_and_clears_error() {
        let mut mirror = BackupMirror::new();
        mirror.connect(StubHandle {
            fail_with: Some(io::ErrorKind::Other),
            ..StubHandle::granted()
        });
        mirror.mirror(&sample(), Utc::now());
        assert!(mirror.disconnect().is_some());
        assert!(!mirror.is_connected());
        assert!(mirror.last_error().is_none());
        assert!(mirror.disconnect().is_none());
    }
}
