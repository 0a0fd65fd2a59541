pub mod console;
pub mod dialogs;
pub mod dispatch;
pub mod notifications;
pub mod settings_form;

pub use console::{ConsoleInput, PendingLine, RunningCommand};
pub use dialogs::{NativeDialog, TerminalPrompt};
pub use dispatch::{dispatch_notification, Acknowledgement, Notifier};
pub use settings_form::{FormError, FormField, SettingsForm};
