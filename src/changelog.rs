//! Changelog download and staging
//!
//! The GET runs on its own thread; the body comes back to the event loop as
//! [`LauncherEvent::Downloaded`] and is staged through a temporary file
//! before being handed to a viewer window.

use crate::events::{EventSink, LauncherEvent};
use crate::utils::error::{LauncherError, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::Builder;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Issues changelog requests over one shared HTTP agent
pub struct ChangelogFetcher {
    agent: ureq::Agent,
    url: String,
    events: EventSink,
    in_flight: Arc<AtomicUsize>,
}

impl ChangelogFetcher {
    pub fn new(url: impl Into<String>, events: EventSink) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("apex-launcher/", env!("CARGO_PKG_VERSION")))
            .build();

        Self {
            agent,
            url: url.into(),
            events,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of requests started but not yet reported back
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Start one download. Every call is an independent request; there is no
    /// de-duplication and no cancellation.
    pub fn fetch(&self) {
        info!("Downloading changelog from {}", self.url);

        let agent = self.agent.clone();
        let url = self.url.clone();
        let events = self.events.clone();
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);

        thread::spawn(move || {
            let event = match download(&agent, &url) {
                Ok(body) => {
                    debug!("Changelog download finished: {} bytes", body.len());
                    LauncherEvent::Downloaded(body)
                }
                Err(e) => {
                    warn!("Changelog download failed: {}", e);
                    LauncherEvent::DownloadFailed(e)
                }
            };
            in_flight.fetch_sub(1, Ordering::SeqCst);
            events.post(event);
        });
    }
}

/// Blocking GET of `url`, buffering the whole body.
///
/// Any non-2xx status is reported the same way as a transport failure.
pub fn download(agent: &ureq::Agent, url: &str) -> Result<Vec<u8>> {
    let response = agent.get(url).call()?;

    if !(200..300).contains(&response.status()) {
        return Err(LauncherError::Network(format!(
            "{} {}",
            response.status(),
            response.status_text()
        )));
    }

    let mut body = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut body)
        .map_err(|e| LauncherError::Network(e.to_string()))?;
    Ok(body)
}

/// Write `body` to a scoped temporary file in the system temp directory and
/// read it back as text.
pub fn stage_changelog(body: &[u8]) -> Result<String> {
    stage_changelog_in(&std::env::temp_dir(), body)
}

/// Same as [`stage_changelog`], staging inside `dir`.
///
/// The temporary file is removed when this function returns, on every path.
pub fn stage_changelog_in(dir: &Path, body: &[u8]) -> Result<String> {
    let mut staged = Builder::new()
        .prefix("apex-changelog")
        .tempfile_in(dir)
        .map_err(LauncherError::TemporaryStorage)?;
    debug!("Staging changelog in {}", staged.path().display());

    staged
        .write_all(body)
        .and_then(|_| staged.flush())
        .map_err(LauncherError::TemporaryStorage)?;

    read_changelog(staged.path())
}

/// Read a changelog file as text, normalising CRLF line endings.
pub fn read_changelog(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(LauncherError::LocalReopen)?;
    let mut raw = Vec::new();
    file.read_to_end(&mut raw)
        .map_err(LauncherError::LocalReopen)?;

    Ok(String::from_utf8_lossy(&raw).replace("\r\n", "\n"))
}

#[cfg(test)]
pub(crate) mod test_server {
    //! Minimal loopback HTTP server for exercising the fetcher

    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve `status`/`body` to every request; returns the base URL.
    pub fn serve(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut line = String::new();
                while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                    if line == "\r\n" {
                        break;
                    }
                    line.clear();
                }
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        format!("http://{}/Minimal-ChangeLog", addr)
    }

    /// A loopback URL nothing is listening on
    pub fn unreachable() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/Minimal-ChangeLog", addr)
    }
}
