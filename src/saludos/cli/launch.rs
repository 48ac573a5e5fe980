use std::io;
use std::path::Path;
use std::process::Command;

/// Opens `target` with the platform's default viewer. With `locate`, opens
/// the folder containing it instead.
pub fn launch(target: &str, locate: bool) -> io::Result<()> {
    let path = Path::new(target);
    let target = if locate {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    } else {
        path
    };

    let status = opener(target).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!(
            "viewer exited with {} for {}",
            status,
            target.display()
        )))
    }
}

#[cfg(target_os = "macos")]
fn opener(target: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(target);
    cmd
}

#[cfg(target_os = "windows")]
fn opener(target: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(target);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener(target: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(target);
    cmd
}
