//! External image viewer
//!
//! The configured `viewer` command is started with the path of the image
//! under review appended as its last argument. The previous viewer process
//! is closed whenever another image is shown.

use crate::error::Result;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct Viewer {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl Viewer {
    /// Parse a command line such as `feh --scale-down`.
    ///
    /// Returns `None` for an empty command.
    pub fn new(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            child: None,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Close the current viewer and open `path`
    pub fn show(&mut self, path: &Path) -> Result<()> {
        self.close();

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        debug!(program = %self.program, path = %path.display(), pid = child.id(), "Viewer started");
        self.child = Some(child);
        Ok(())
    }

    /// Stop the viewer process, if one is running
    pub fn close(&mut self) {
        if let Some(mut child) = self.child.take() {
            // Already exited is fine
            if let Err(e) = child.kill()
                && e.kind() != std::io::ErrorKind::InvalidInput
            {
                warn!(error = %e, "Failed to stop viewer");
            }
            let _ = child.wait();
        }
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        let viewer = Viewer::new("feh --scale-down -g 800x600").unwrap();
        assert_eq!(viewer.program(), "feh");
        assert_eq!(viewer.args, ["--scale-down", "-g", "800x600"]);
        assert!(Viewer::new("   ").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_show_and_close() {
        let mut viewer = Viewer::new("sleep").unwrap();
        // `sleep 5` stands in for a long-running viewer
        viewer.show(Path::new("5")).unwrap();
        assert!(viewer.child.is_some());
        viewer.close();
        assert!(viewer.child.is_none());
    }

    #[test]
    fn test_missing_program_is_error() {
        let mut viewer = Viewer::new("definitely-not-a-viewer-binary").unwrap();
        assert!(viewer.show(Path::new("a.jpg")).is_err());
    }
}
