//! About dialog

use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

fn about_text() -> String {
    format!(
        "Google Chat Desktop {}\n\
         An unofficial desktop client for Google Chat.\n\
         Authors: {}\n\n\
         Open the project page on GitHub?",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS").replace(':', ", "),
    )
}

/// Show the About box. Returns `true` if the user asked for the project page.
pub fn show() -> bool {
    let answer = MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title("About Google Chat Desktop")
        .set_description(about_text())
        .set_buttons(MessageButtons::YesNo)
        .show();
    matches!(answer, MessageDialogResult::Yes)
}
