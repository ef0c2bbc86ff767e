//! Non-blocking process launching
//!
//! Installers are started detached from the GUI: `launch` returns as soon as
//! the OS has created the child, and a watcher thread reports the exit back
//! through the event sink. Exit codes are informational only.

use crate::events::{EventSink, LauncherEvent};
use crate::utils::error::{LauncherError, Result};
use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::{debug, info, warn};

/// pkexec: the authentication dialog was dismissed
const PKEXEC_DISMISSED: i32 = 126;
/// pkexec: not authorized, or the target could not be run
const PKEXEC_NOT_AUTHORIZED: i32 = 127;

/// A program and its arguments, as requested by a button press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub command: String,
    pub args: Vec<String>,
}

impl LaunchRequest {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Run `program` through a privilege-escalation helper such as pkexec.
    pub fn elevated(helper: &str, program: &str) -> Self {
        Self::new(helper, vec![program.to_string()])
    }

    /// Run `program` directly with no arguments.
    pub fn direct(program: &str) -> Self {
        Self::new(program, Vec::new())
    }
}

impl fmt::Display for LaunchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Last known state of a launched program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStatus {
    Running,
    Exited(Option<i32>),
}

/// Owned handle to a started program. Dropping it does not affect the child.
#[derive(Debug, Clone)]
pub struct LaunchHandle {
    request: LaunchRequest,
    pid: u32,
    status: Arc<Mutex<LaunchStatus>>,
}

impl LaunchHandle {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn request(&self) -> &LaunchRequest {
        &self.request
    }

    pub fn status(&self) -> LaunchStatus {
        self.status
            .lock()
            .map(|s| *s)
            .unwrap_or(LaunchStatus::Exited(None))
    }

    pub fn is_running(&self) -> bool {
        self.status() == LaunchStatus::Running
    }
}

/// Starts external programs and watches them from a background thread
#[derive(Clone)]
pub struct ProcessLauncher {
    events: EventSink,
}

impl ProcessLauncher {
    pub fn new(events: EventSink) -> Self {
        Self { events }
    }

    /// Spawn `request` without waiting for it.
    ///
    /// Fails only when the OS refuses to create the process (missing binary,
    /// permission denied). Everything after that arrives as
    /// [`LauncherEvent::Exited`].
    pub fn launch(&self, request: &LaunchRequest) -> Result<LaunchHandle> {
        info!("Launching: {}", request);

        let mut child = Command::new(&request.command)
            .args(&request.args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| {
                warn!("Could not start {}: {}", request, source);
                LauncherError::ProcessStart {
                    command: request.to_string(),
                    source,
                }
            })?;

        let pid = child.id();
        debug!("Started {} as pid {}", request, pid);

        let status = Arc::new(Mutex::new(LaunchStatus::Running));
        let handle = LaunchHandle {
            request: request.clone(),
            pid,
            status: Arc::clone(&status),
        };

        let events = self.events.clone();
        let request = request.clone();
        thread::spawn(move || {
            let code = match child.wait() {
                Ok(exit) => exit.code(),
                Err(e) => {
                    warn!("Lost track of {} (pid {}): {}", request, pid, e);
                    None
                }
            };
            if let Ok(mut s) = status.lock() {
                *s = LaunchStatus::Exited(code);
            }
            events.post(LauncherEvent::Exited { request, code });
        });

        Ok(handle)
    }
}

/// Log the exit of a launched program. Nothing is shown to the user.
pub fn log_exit(request: &LaunchRequest, code: Option<i32>) {
    match code {
        Some(0) => info!("{} exited normally", request),
        Some(c @ (PKEXEC_DISMISSED | PKEXEC_NOT_AUTHORIZED)) if request.command == "pkexec" => {
            warn!("{} exited with {} (authorization dismissed or refused)", request, c)
        }
        Some(c) => warn!("{} exited with status {}", request, c),
        None => warn!("{} terminated without an exit status", request),
    }
}

/// Check if a command exists in PATH
pub fn command_exists(program: &str) -> bool {
    use std::os::unix::fs::PermissionsExt;

    let is_executable = |path: &Path| {
        path.metadata()
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    };

    if program.contains('/') {
        return is_executable(Path::new(program));
    }

    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| is_executable(&dir.join(program))))
        .unwrap_or(false)
}
