//! Main window controller
//!
//! Everything the main window does, minus drawing: the button table, the
//! event queue drained each frame, pending warning dialogs and the set of
//! open changelog windows.

use crate::changelog::{stage_changelog_in, ChangelogFetcher};
use crate::config::{InstallerKind, LauncherConfig};
use crate::events::{event_channel, LauncherEvent};
use crate::utils::command::{log_exit, LaunchHandle, LaunchRequest, ProcessLauncher};
use crate::utils::error::LauncherError;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use tracing::{info, warn};

use super::viewer::ChangelogWindow;

/// Identity of a main window button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    ElevatedInstaller,
    DirectInstaller,
    Changelog,
}

/// What a button does when pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Launch(LaunchRequest),
    FetchChangelog,
}

/// A button registered at construction
#[derive(Debug, Clone)]
pub struct Binding {
    pub id: ActionId,
    pub label: String,
    pub action: Action,
}

/// A warning waiting for acknowledgement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl From<&LauncherError> for Notice {
    fn from(err: &LauncherError) -> Self {
        Self {
            title: err.dialog_title().to_string(),
            message: err.to_string(),
        }
    }
}

pub struct LauncherState {
    config: LauncherConfig,
    bindings: Vec<Binding>,
    launcher: ProcessLauncher,
    fetcher: ChangelogFetcher,
    events: Receiver<LauncherEvent>,
    notices: VecDeque<Notice>,
    changelogs: Vec<ChangelogWindow>,
    next_changelog_id: u64,
    launched: Vec<LaunchHandle>,
    staging_dir: PathBuf,
}

impl LauncherState {
    /// Build the controller. `repaint` is the window's context, woken
    /// whenever a background task finishes.
    pub fn new(config: LauncherConfig, repaint: Option<egui::Context>) -> Self {
        let (sink, events) = event_channel(repaint);

        let bindings = vec![
            Binding {
                id: ActionId::ElevatedInstaller,
                label: config.installer_label(InstallerKind::Elevated).to_string(),
                action: Action::Launch(config.installer_request(InstallerKind::Elevated)),
            },
            Binding {
                id: ActionId::DirectInstaller,
                label: config.installer_label(InstallerKind::Direct).to_string(),
                action: Action::Launch(config.installer_request(InstallerKind::Direct)),
            },
            Binding {
                id: ActionId::Changelog,
                label: config.changelog.label.clone(),
                action: Action::FetchChangelog,
            },
        ];

        Self {
            launcher: ProcessLauncher::new(sink.clone()),
            fetcher: ChangelogFetcher::new(config.changelog.url.clone(), sink),
            config,
            bindings,
            events,
            notices: VecDeque::new(),
            changelogs: Vec::new(),
            next_changelog_id: 0,
            launched: Vec::new(),
            staging_dir: std::env::temp_dir(),
        }
    }

    /// Stage downloaded changelogs in `dir` instead of the system temp
    /// directory
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Buttons in display order
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Run the action bound to `id`. Exactly one process spawn or one
    /// request per call.
    pub fn trigger(&mut self, id: ActionId) {
        let Some(binding) = self.bindings.iter().find(|b| b.id == id) else {
            warn!("No action bound to {:?}", id);
            return;
        };

        match binding.action.clone() {
            Action::Launch(request) => match self.launcher.launch(&request) {
                Ok(handle) => self.launched.push(handle),
                Err(e) => self.report(e),
            },
            Action::FetchChangelog => self.fetcher.fetch(),
        }
    }

    /// Drain every completion posted since the last frame.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                LauncherEvent::Exited { request, code } => {
                    log_exit(&request, code);
                    self.launched.retain(|h| h.is_running());
                }
                LauncherEvent::Downloaded(body) => {
                    match stage_changelog_in(&self.staging_dir, &body) {
                        Ok(text) => self.open_changelog(text),
                        Err(e) => self.report(e),
                    }
                }
                LauncherEvent::DownloadFailed(e) => self.report(e),
            }
        }
    }

    fn open_changelog(&mut self, text: String) {
        let id = self.next_changelog_id;
        self.next_changelog_id += 1;
        info!("Opening changelog window #{}", id);

        let changelog = &self.config.changelog;
        self.changelogs.push(ChangelogWindow::new(
            id,
            changelog.window_title.clone(),
            text,
            [changelog.width, changelog.height],
        ));
    }

    fn report(&mut self, err: LauncherError) {
        warn!("{}", err);
        self.notices.push_back(Notice::from(&err));
    }

    /// The warning currently on screen, if any
    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn pending_notices(&self) -> usize {
        self.notices.len()
    }

    /// Acknowledge the warning on screen
    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    pub fn changelog_windows(&self) -> &[ChangelogWindow] {
        &self.changelogs
    }

    /// Forget a changelog window the user closed
    pub fn close_changelog(&mut self, id: u64) {
        self.changelogs.retain(|w| w.id() != id);
    }

    pub fn fetches_in_flight(&self) -> usize {
        self.fetcher.in_flight()
    }

    /// Handles of launched programs that have not exited yet
    pub fn running_launches(&self) -> &[LaunchHandle] {
        &self.launched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::test_server;
    use std::thread;
    use std::time::{Duration, Instant};

    fn config_with(url: &str, helper: &str, direct: &str) -> LauncherConfig {
        let mut config = LauncherConfig::embedded().unwrap();
        config.changelog.url = url.to_string();
        config.installers.privilege_helper = helper.to_string();
        config.installers.direct_program = direct.to_string();
        config
    }

    fn pump_until(state: &mut LauncherState, done: impl Fn(&LauncherState) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            state.process_events();
            if done(state) {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("timed out waiting for background work");
    }

    #[test]
    fn buttons_are_bound_in_order() {
        let state = LauncherState::new(LauncherConfig::embedded().unwrap(), None);
        let ids: Vec<ActionId> = state.bindings().iter().map(|b| b.id).collect();
        assert_eq!(
            ids,
            vec![
                ActionId::ElevatedInstaller,
                ActionId::DirectInstaller,
                ActionId::Changelog
            ]
        );
        assert_eq!(state.bindings()[2].label, "ChangeLog");
        assert_eq!(state.bindings()[2].action, Action::FetchChangelog);
    }

    #[test]
    fn missing_helper_yields_one_warning() {
        let url = test_server::unreachable();
        let mut state = LauncherState::new(
            config_with(&url, "apex-launcher-test-no-helper", "true"),
            None,
        );

        state.trigger(ActionId::ElevatedInstaller);
        state.process_events();

        assert_eq!(state.pending_notices(), 1);
        let notice = state.current_notice().unwrap();
        assert_eq!(notice.title, "Error");
        assert!(notice
            .message
            .starts_with("Failed to start apex-launcher-test-no-helper calamares: "));

        state.dismiss_notice();
        assert!(state.current_notice().is_none());

        // Still usable afterwards
        state.trigger(ActionId::DirectInstaller);
        assert_eq!(state.running_launches().len(), 1);
        assert_eq!(state.pending_notices(), 0);
    }

    #[test]
    fn direct_installer_spawns_once_and_exit_is_silent() {
        let url = test_server::unreachable();
        let mut state = LauncherState::new(config_with(&url, "pkexec", "true"), None);

        state.trigger(ActionId::DirectInstaller);
        assert_eq!(state.running_launches().len(), 1);
        assert_eq!(state.running_launches()[0].request().command, "true");

        pump_until(&mut state, |s| s.running_launches().is_empty());
        assert_eq!(state.pending_notices(), 0);
        assert!(state.changelog_windows().is_empty());
    }

    #[test]
    fn unreachable_changelog_yields_one_warning_and_no_window() {
        let url = test_server::unreachable();
        let mut state = LauncherState::new(config_with(&url, "pkexec", "true"), None);

        state.trigger(ActionId::Changelog);
        assert_eq!(state.fetches_in_flight(), 1);
        pump_until(&mut state, |s| s.pending_notices() > 0);

        assert_eq!(state.fetches_in_flight(), 0);
        assert_eq!(state.pending_notices(), 1);
        assert!(state
            .current_notice()
            .unwrap()
            .message
            .starts_with("Failed to download ChangeLog: "));
        assert!(state.changelog_windows().is_empty());
    }

    #[test]
    fn successful_fetch_opens_window_with_body() {
        let url = test_server::serve("200 OK", "v1.0 - initial release");
        let mut state = LauncherState::new(config_with(&url, "pkexec", "true"), None);

        state.trigger(ActionId::Changelog);
        pump_until(&mut state, |s| !s.changelog_windows().is_empty());

        let window = &state.changelog_windows()[0];
        assert_eq!(window.text(), "v1.0 - initial release");
        assert_eq!(window.title(), "ChangeLog");
        assert_eq!(state.pending_notices(), 0);
    }

    #[test]
    fn two_presses_give_two_independent_windows() {
        let url = test_server::serve("200 OK", "v1.0 - initial release");
        let mut state = LauncherState::new(config_with(&url, "pkexec", "true"), None);

        state.trigger(ActionId::Changelog);
        state.trigger(ActionId::Changelog);
        pump_until(&mut state, |s| {
            s.fetches_in_flight() == 0 && s.changelog_windows().len() == 2
        });

        let windows = state.changelog_windows();
        assert_ne!(windows[0].id(), windows[1].id());
        assert!(windows.iter().all(|w| w.text() == "v1.0 - initial release"));
        assert_eq!(state.pending_notices(), 0);
    }

    #[test]
    fn closing_a_window_leaves_fetching_intact() {
        let url = test_server::serve("200 OK", "v1.0 - initial release");
        let mut state = LauncherState::new(config_with(&url, "pkexec", "true"), None);

        state.trigger(ActionId::Changelog);
        pump_until(&mut state, |s| s.changelog_windows().len() == 1);
        let first = state.changelog_windows()[0].id();

        state.close_changelog(first);
        assert!(state.changelog_windows().is_empty());

        state.trigger(ActionId::Changelog);
        pump_until(&mut state, |s| s.changelog_windows().len() == 1);
        assert_ne!(state.changelog_windows()[0].id(), first);
    }

    #[test]
    fn server_error_is_reported_once() {
        let url = test_server::serve("500 Internal Server Error", "boom");
        let mut state = LauncherState::new(config_with(&url, "pkexec", "true"), None);

        state.trigger(ActionId::Changelog);
        pump_until(&mut state, |s| s.pending_notices() > 0);
        thread::sleep(Duration::from_millis(100));
        state.process_events();

        assert_eq!(state.pending_notices(), 1);
        assert!(state.changelog_windows().is_empty());
    }

    #[test]
    fn temp_file_failure_yields_one_warning_and_no_window() {
        let url = test_server::serve("200 OK", "v1.0 - initial release");
        let staging = tempfile::tempdir().unwrap();
        let mut state = LauncherState::new(config_with(&url, "pkexec", "true"), None)
            .with_staging_dir(staging.path().join("missing"));

        state.trigger(ActionId::Changelog);
        pump_until(&mut state, |s| s.pending_notices() > 0);
        thread::sleep(Duration::from_millis(100));
        state.process_events();

        assert_eq!(state.pending_notices(), 1);
        assert_eq!(
            state.current_notice(),
            Some(&Notice {
                title: "Error".to_string(),
                message: "Could not create temporary file.".to_string(),
            })
        );
        assert!(state.changelog_windows().is_empty());
    }
}
