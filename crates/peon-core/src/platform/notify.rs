use super::{capture, quoted, spawn_detached, Platform};
use crate::classifier::NotifyColor;
use crate::effects::{FocusProbe, Notifier};
use crate::error::EffectError;

/// Frontmost-app names that count as "the terminal" on macOS.
pub const TERMINAL_APPS: [&str; 7] = [
    "Terminal",
    "iTerm2",
    "Warp",
    "Alacritty",
    "kitty",
    "WezTerm",
    "Ghostty",
];

/// Desktop notifications through the platform's native tooling.
#[derive(Debug, Clone, Copy)]
pub struct SystemNotifier {
    platform: Platform,
}

impl SystemNotifier {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Notifier for SystemNotifier {
    fn send(&self, message: &str, title: &str, color: NotifyColor) -> Result<(), EffectError> {
        tracing::debug!(message, title, color = color.as_str(), "sending notification");
        match self.platform {
            Platform::Mac => spawn_detached(
                "osascript",
                &[
                    "-e".into(),
                    format!(
                        "display notification {} with title {}",
                        quoted(message),
                        quoted(title)
                    ),
                ],
            ),
            Platform::Wsl => spawn_detached("powershell.exe", &powershell_banner(message, color)),
            Platform::Linux => {
                spawn_detached("notify-send", &[title.to_string(), message.to_string()])
            }
            Platform::Unknown => Ok(()),
        }
    }
}

/// PowerShell arguments that flash a coloured banner at the top of every screen.
fn powershell_banner(message: &str, color: NotifyColor) -> Vec<String> {
    let (r, g, b) = color.rgb();
    let script = [
        "Add-Type -AssemblyName System.Windows.Forms;".to_string(),
        "Add-Type -AssemblyName System.Drawing;".to_string(),
        "foreach ($screen in [System.Windows.Forms.Screen]::AllScreens) {".to_string(),
        "$form = New-Object System.Windows.Forms.Form;".to_string(),
        "$form.FormBorderStyle = 'None';".to_string(),
        format!("$form.BackColor = [System.Drawing.Color]::FromArgb({r}, {g}, {b});"),
        "$form.Size = New-Object System.Drawing.Size(500, 80);".to_string(),
        "$form.TopMost = $true;".to_string(),
        "$form.ShowInTaskbar = $false;".to_string(),
        "$form.StartPosition = 'Manual';".to_string(),
        "$form.Location = New-Object System.Drawing.Point(".to_string(),
        "($screen.WorkingArea.X + ($screen.WorkingArea.Width - 500) / 2),".to_string(),
        "($screen.WorkingArea.Y + 40)".to_string(),
        ");".to_string(),
        "$label = New-Object System.Windows.Forms.Label;".to_string(),
        format!("$label.Text = {};", quoted(message)),
        "$label.ForeColor = [System.Drawing.Color]::White;".to_string(),
        "$label.Font = New-Object System.Drawing.Font('Segoe UI', 16, [System.Drawing.FontStyle]::Bold);"
            .to_string(),
        "$label.TextAlign = 'MiddleCenter';".to_string(),
        "$label.Dock = 'Fill';".to_string(),
        "$form.Controls.Add($label);".to_string(),
        "$form.Show();".to_string(),
        "}".to_string(),
        "Start-Sleep -Seconds 4;".to_string(),
        "[System.Windows.Forms.Application]::Exit();".to_string(),
    ]
    .concat();
    vec![
        "-NoProfile".into(),
        "-NonInteractive".into(),
        "-Command".into(),
        script,
    ]
}

/// Terminal focus detection. Only macOS can answer; elsewhere the terminal is
/// assumed to be in the background so notifications always show.
#[derive(Debug, Clone, Copy)]
pub struct SystemFocus {
    platform: Platform,
}

impl SystemFocus {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl FocusProbe for SystemFocus {
    fn is_terminal_focused(&self) -> bool {
        if self.platform != Platform::Mac {
            return false;
        }
        match capture(
            "osascript",
            &[
                "-e",
                "tell application \"System Events\" to get name of first process whose frontmost is true",
            ],
        ) {
            Ok(frontmost) => TERMINAL_APPS.contains(&frontmost.as_str()),
            Err(err) => {
                tracing::debug!(error = %err, "focus probe failed, assuming unfocused");
                false
            }
        }
    }
}
