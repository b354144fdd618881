//! End-to-end orchestration: verify context, invoke extraction, transmit.
//!
//! The controller owns the single user-facing status value and publishes it
//! over a watch channel for the control surface to render. One controller,
//! one in-flight run: `run` takes `&mut self`, so a second trigger cannot
//! start until the current run reaches Success or Error.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};
use url::Url;

use crate::error::RunError;
use crate::fetch::PageFetcher;
use crate::invoker::{is_job_posting_url, ExtractionInvoker};
use crate::transport::{Confirmation, RecordTransport};

/// How long Success stays on screen before reverting to Idle.
pub const DEFAULT_SUCCESS_DISPLAY: Duration = Duration::from_secs(5);

/// User-facing pipeline status. Not persisted across sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Extracting,
    Sending,
    Success,
    Error(String),
}

impl RunStatus {
    /// Whether the run control should accept a new trigger in this state.
    /// Disabled throughout Extracting/Sending; Error re-enables immediately,
    /// Success re-enables on the display timeout (or right away, since a new
    /// run simply replaces it).
    pub fn run_enabled(&self) -> bool {
        !matches!(self, RunStatus::Extracting | RunStatus::Sending)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Idle => write!(f, "Ready to capture a job posting"),
            RunStatus::Extracting => write!(f, "Extracting job posting..."),
            RunStatus::Sending => write!(f, "Job extracted, sending..."),
            RunStatus::Success => write!(f, "Success! Job posting delivered."),
            RunStatus::Error(message) => write!(f, "Error: {message}"),
        }
    }
}

/// Drives the acquire → extract → transmit sequence.
pub struct Controller<F, T> {
    invoker: ExtractionInvoker<F>,
    transport: T,
    status: watch::Sender<RunStatus>,
    success_display: Duration,
}

impl<F: PageFetcher, T: RecordTransport> Controller<F, T> {
    pub fn new(invoker: ExtractionInvoker<F>, transport: T) -> Self {
        let (status, _) = watch::channel(RunStatus::Idle);
        Self {
            invoker,
            transport,
            status,
            success_display: DEFAULT_SUCCESS_DISPLAY,
        }
    }

    pub fn with_success_display(mut self, interval: Duration) -> Self {
        self.success_display = interval;
        self
    }

    /// Subscribe to status transitions.
    pub fn status(&self) -> watch::Receiver<RunStatus> {
        self.status.subscribe()
    }

    pub fn current_status(&self) -> RunStatus {
        self.status.borrow().clone()
    }

    /// Run the pipeline once for `url`.
    ///
    /// The eligibility guard fires before anything else: on a non-matching
    /// address the controller goes straight to Error without touching the
    /// invoker or the transport. Every fault is terminal for this run and
    /// leaves the controller ready for the next trigger.
    pub async fn run(&mut self, url: &Url) -> Result<Confirmation, RunError> {
        if !is_job_posting_url(url) {
            let err = RunError::from(crate::error::ExtractError::NotEligible {
                url: url.to_string(),
            });
            warn!(url = %url, "run rejected: not a job posting page");
            self.status.send_replace(RunStatus::Error(err.user_message()));
            return Err(err);
        }

        self.status.send_replace(RunStatus::Extracting);

        let record = match self.invoker.invoke(url).await {
            Ok(record) => record,
            Err(e) => {
                let err = RunError::from(e);
                self.status.send_replace(RunStatus::Error(err.user_message()));
                return Err(err);
            }
        };

        self.status.send_replace(RunStatus::Sending);

        match self.transport.send(&record).await {
            Ok(confirmation) => {
                info!(url = %url, "run completed");
                self.status.send_replace(RunStatus::Success);
                self.schedule_success_revert();
                Ok(confirmation)
            }
            Err(e) => {
                let err = RunError::from(e);
                self.status.send_replace(RunStatus::Error(err.user_message()));
                Err(err)
            }
        }
    }

    /// Revert Success to Idle after the display interval, unless a newer run
    /// has already moved the status on.
    fn schedule_success_revert(&self) {
        let status = self.status.clone();
        let interval = self.success_display;
        tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            status.send_if_modified(|s| {
                if *s == RunStatus::Success {
                    *s = RunStatus::Idle;
                    true
                } else {
                    false
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockPageFetcher;
    use crate::transport::MockTransport;

    const JOB_URL: &str = "https://www.linkedin.com/jobs/view/123";
    const JOB_HTML: &str = r#"<html><body>
        <h1 class="top-card-layout__title">Backend Engineer</h1>
        <a class="topcard__org-name-link">Acme</a>
    </body></html>"#;

    fn controller(
        fetcher: MockPageFetcher,
        transport: MockTransport,
    ) -> Controller<MockPageFetcher, MockTransport> {
        Controller::new(ExtractionInvoker::new(fetcher), transport)
    }

    #[tokio::test]
    async fn test_guard_rejects_without_invoking_stages() {
        let fetcher = MockPageFetcher::new();
        let transport = MockTransport::succeeding();
        let mut ctl = controller(fetcher.clone(), transport);

        let url = Url::parse("https://example.com/jobs/view/1").unwrap();
        let err = ctl.run(&url).await.unwrap_err();

        assert!(err.user_message().contains("job posting"));
        assert!(fetcher.calls().is_empty(), "invoker must not run");
        assert!(matches!(ctl.current_status(), RunStatus::Error(_)));
        assert!(ctl.current_status().run_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_run_reaches_success_then_reverts_to_idle() {
        let fetcher = MockPageFetcher::new().with_page(JOB_URL, JOB_HTML);
        let transport = MockTransport::succeeding();
        let mut ctl = controller(fetcher, transport);

        let confirmation = ctl.run(&Url::parse(JOB_URL).unwrap()).await.unwrap();
        assert_eq!(confirmation.as_json()["status"], "ok");
        assert_eq!(ctl.current_status(), RunStatus::Success);

        // Display interval elapses, status auto-reverts.
        tokio::time::sleep(DEFAULT_SUCCESS_DISPLAY + Duration::from_millis(10)).await;
        assert_eq!(ctl.current_status(), RunStatus::Idle);
    }

    #[tokio::test]
    async fn test_server_error_transitions_sending_to_error() {
        let fetcher = MockPageFetcher::new().with_page(JOB_URL, JOB_HTML);
        let transport = MockTransport::server_error(500);
        let mut ctl = controller(fetcher, transport);

        let err = ctl.run(&Url::parse(JOB_URL).unwrap()).await.unwrap_err();
        assert!(err.user_message().contains("500"));

        // Run control is re-enabled immediately on Error.
        let status = ctl.current_status();
        assert_eq!(status, RunStatus::Error("Server error: 500".to_string()));
        assert!(status.run_enabled());
    }

    #[tokio::test]
    async fn test_extraction_failure_skips_transport() {
        let fetcher = MockPageFetcher::new(); // no canned page: context unavailable
        let transport = MockTransport::succeeding();
        let probe = transport.clone();
        let mut ctl = controller(fetcher, transport);

        let err = ctl.run(&Url::parse(JOB_URL).unwrap()).await.unwrap_err();
        assert!(matches!(err, RunError::Extract(_)));
        assert!(probe.sent().is_empty(), "transport must not run");
        assert!(matches!(ctl.current_status(), RunStatus::Error(_)));
    }

    #[tokio::test]
    async fn test_error_state_is_reentrant() {
        let fetcher = MockPageFetcher::new().with_page(JOB_URL, JOB_HTML);
        let transport = MockTransport::succeeding();
        let mut ctl = controller(fetcher, transport);

        // First trigger fails the guard.
        let bad = Url::parse("https://example.com/").unwrap();
        assert!(ctl.run(&bad).await.is_err());
        assert!(matches!(ctl.current_status(), RunStatus::Error(_)));

        // No cooldown: the next trigger runs and succeeds.
        ctl.run(&Url::parse(JOB_URL).unwrap()).await.unwrap();
        assert_eq!(ctl.current_status(), RunStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_revert_does_not_clobber_newer_state() {
        let fetcher = MockPageFetcher::new().with_page(JOB_URL, JOB_HTML);
        let mut ctl = controller(fetcher, MockTransport::succeeding())
            .with_success_display(Duration::from_secs(5));

        ctl.run(&Url::parse(JOB_URL).unwrap()).await.unwrap();
        assert_eq!(ctl.current_status(), RunStatus::Success);

        // A second run fails the guard before the revert timer fires.
        let bad = Url::parse("https://example.com/").unwrap();
        let _ = ctl.run(&bad).await.unwrap_err();
        assert!(matches!(ctl.current_status(), RunStatus::Error(_)));

        // The stale Success revert must not overwrite the Error.
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(matches!(ctl.current_status(), RunStatus::Error(_)));
    }

    #[tokio::test]
    async fn test_status_updates_visible_to_subscribers() {
        let fetcher = MockPageFetcher::new().with_page(JOB_URL, JOB_HTML);
        let mut ctl = controller(fetcher, MockTransport::succeeding());
        let rx = ctl.status();

        assert_eq!(*rx.borrow(), RunStatus::Idle);
        ctl.run(&Url::parse(JOB_URL).unwrap()).await.unwrap();
        assert_eq!(*rx.borrow(), RunStatus::Success);
    }
}
