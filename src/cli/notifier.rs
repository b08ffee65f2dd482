use crate::notify::{NotificationPermission, Notifier, NotifyError, RenewalNotification};

use super::output;

/// Prints renewal notifications to the terminal.
///
/// The terminal needs no system permission, so a request is granted immediately;
/// the permission state still gates delivery the same way a desktop notifier would.
#[derive(Debug)]
pub struct ConsoleNotifier {
    permission: NotificationPermission,
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self {
            permission: NotificationPermission::Default,
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn request_permission(&mut self) -> NotificationPermission {
        if self.permission == NotificationPermission::Default {
            self.permission = NotificationPermission::Granted;
        }
        self.permission
    }

    fn show(&mut self, notification: &RenewalNotification) -> Result<(), NotifyError> {
        output::alert(&notification.title);
        output::info(format!("    {}", notification.body));
        Ok(())
    }
}
