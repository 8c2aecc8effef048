use std::path::Path;

use super::{capture, spawn_detached, Platform};
use crate::category::Category;
use crate::effects::Playback;
use crate::error::EffectError;

/// Plays sounds with whatever player the platform ships.
#[derive(Debug, Clone, Copy)]
pub struct SystemPlayback {
    platform: Platform,
}

impl SystemPlayback {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Playback for SystemPlayback {
    fn play(&self, file: &Path, volume: f64, category: Category) -> Result<(), EffectError> {
        let file_arg = file.to_string_lossy().into_owned();
        tracing::debug!(%category, file = %file_arg, volume, "playing sound");
        match self.platform {
            Platform::Mac => spawn_detached("afplay", &["-v".into(), volume.to_string(), file_arg]),
            Platform::Wsl => {
                let windows_path = capture("wslpath", &["-w", &file_arg])?.replace('\\', "/");
                spawn_detached("powershell.exe", &powershell_media_player(&windows_path, volume))
            }
            Platform::Linux => {
                // paplay volume is linear in 0..=65536.
                let pa_volume = (volume * 65536.0).round() as u32;
                spawn_detached("paplay", &[format!("--volume={pa_volume}"), file_arg])
            }
            Platform::Unknown => Ok(()),
        }
    }
}

/// PowerShell arguments that play `windows_path` through MediaPlayer.
fn powershell_media_player(windows_path: &str, volume: f64) -> Vec<String> {
    let script = [
        "Add-Type -AssemblyName PresentationCore;".to_string(),
        "$p = New-Object System.Windows.Media.MediaPlayer;".to_string(),
        format!("$p.Open([Uri]::new('file:///{windows_path}'));"),
        format!("$p.Volume = {volume};"),
        "Start-Sleep -Milliseconds 200;".to_string(),
        "$p.Play();".to_string(),
        "Start-Sleep -Seconds 3;".to_string(),
        "$p.Close();".to_string(),
    ]
    .concat();
    vec![
        "-NoProfile".into(),
        "-NonInteractive".into(),
        "-Command".into(),
        script,
    ]
}
