use log::info;
use std::path::Path;
use std::process::Command;

use crate::error::{LabelError, Result};

/// `xclip -selection clipboard -t image/png -i <path>`
pub fn default_clipboard_command() -> Vec<String> {
    ["xclip", "-selection", "clipboard", "-t", "image/png", "-i"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Runs the clipboard utility with the image path appended and waits for it.
pub fn copy_image_to_clipboard(command: &[String], image_path: &Path) -> Result<()> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| LabelError::Clipboard("No clipboard command configured.".to_string()))?;

    let status = Command::new(program)
        .args(args)
        .arg(image_path)
        .status()
        .map_err(|e| LabelError::Clipboard(format!("Could not run '{}': {}", program, e)))?;

    if !status.success() {
        return Err(LabelError::Clipboard(format!("'{}' exited with {}", program, status)));
    }
    info!("Copied {:?} to clipboard.", image_path);
    Ok(())
}
