//! Desktop toast notifications

use voice_relay_core::PresenterError;

use crate::platform::{applescript_quote, ps_single_quote, OsCommand, Platform};

/// Application id shown on Windows toasts
pub const WINDOWS_APP_ID: &str = "PAI Voice Server";

/// Result of a detached toast task, drained into the log
#[derive(Debug)]
pub struct ToastReport {
    pub title: String,
    pub result: Result<(), PresenterError>,
}

/// Candidate toast commands, in preference order
pub fn toast_commands(platform: Platform, title: &str, message: &str) -> Vec<OsCommand> {
    match platform {
        Platform::MacOs => vec![OsCommand::new(
            "osascript",
            [
                "-e".to_string(),
                format!(
                    "display notification {} with title {} sound name \"Glass\"",
                    applescript_quote(message),
                    applescript_quote(title)
                ),
            ],
        )],
        Platform::Windows => vec![OsCommand::powershell(windows_toast_script(title, message))],
        Platform::Linux => vec![OsCommand::new("notify-send", ["--", title, message])],
        Platform::Other => Vec::new(),
    }
}

fn windows_toast_script(title: &str, message: &str) -> String {
    format!(
        "[Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] | Out-Null; \
         [Windows.Data.Xml.Dom.XmlDocument, Windows.Data.Xml.Dom.XmlDocument, ContentType = WindowsRuntime] | Out-Null; \
         $template = [Windows.UI.Notifications.ToastNotificationManager]::GetTemplateContent([Windows.UI.Notifications.ToastTemplateType]::ToastText02); \
         $text = $template.GetElementsByTagName('text'); \
         $text.Item(0).AppendChild($template.CreateTextNode({})) | Out-Null; \
         $text.Item(1).AppendChild($template.CreateTextNode({})) | Out-Null; \
         $toast = New-Object Windows.UI.Notifications.ToastNotification $template; \
         [Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier({}).Show($toast)",
        ps_single_quote(title),
        ps_single_quote(message),
        ps_single_quote(WINDOWS_APP_ID)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macos_toast_script() {
        let commands = toast_commands(Platform::MacOs, "Build", "Done");
        assert_eq!(commands[0].program, "osascript");
        assert_eq!(
            commands[0].args[1],
            "display notification \"Done\" with title \"Build\" sound name \"Glass\""
        );
    }

    #[test]
    fn test_linux_toast_passes_arguments_verbatim() {
        let commands = toast_commands(Platform::Linux, "Build", "It's done");
        assert_eq!(commands, vec![OsCommand::new("notify-send", ["--", "Build", "It's done"])]);
    }

    #[test]
    fn test_linux_toast_ends_option_parsing() {
        let commands = toast_commands(Platform::Linux, "-u", "-a.env");
        assert_eq!(commands[0].args, vec!["--", "-u", "-a.env"]);
    }

    #[test]
    fn test_windows_toast_uses_app_id() {
        let commands = toast_commands(Platform::Windows, "Build", "It's done");
        let script = commands[0].args.last().unwrap();
        assert!(script.contains("CreateToastNotifier('PAI Voice Server')"));
        assert!(script.contains("CreateTextNode('It''s done')"));
    }

    #[test]
    fn test_unknown_platform_has_no_toast() {
        assert!(toast_commands(Platform::Other, "a", "b").is_empty());
    }
}
