//! Blocking message boxes. They hold the UI thread until dismissed.

use rfd::{MessageButtons, MessageDialog, MessageLevel};

fn show(level: MessageLevel, title: &str, text: &str) {
    let _ = MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(text)
        .set_buttons(MessageButtons::Ok)
        .show();
}

pub fn error(title: &str, text: &str) {
    log::error!("{}: {}", title, text);
    show(MessageLevel::Error, title, text);
}

pub fn warning(title: &str, text: &str) {
    log::warn!("{}: {}", title, text);
    show(MessageLevel::Warning, title, text);
}

pub fn info(title: &str, text: &str) {
    log::info!("{}: {}", title, text);
    show(MessageLevel::Info, title, text);
}
