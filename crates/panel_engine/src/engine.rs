use std::sync::Arc;

use panel_core::{SessionId, TaskId};
use panel_logging::{panel_debug, panel_info};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::poll::spawn_poller;
use crate::{
    ApiError, EngineEvent, EngineSettings, PollHandle, ReportDownloader, ReqwestScrapeClient,
    ScrapeApi,
};

/// Executes IO on behalf of the dashboard and reports back through events.
///
/// Must be used from within a tokio runtime. At most one poller runs at a
/// time; starting a new one stops the previous one first.
pub struct EngineHandle {
    api: Arc<dyn ScrapeApi>,
    settings: EngineSettings,
    downloader: ReportDownloader,
    poller: Option<PollHandle>,
    shutdown: CancellationToken,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    event_rx: mpsc::UnboundedReceiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Result<Self, ApiError> {
        let api = Arc::new(ReqwestScrapeClient::new(&settings)?);
        Ok(Self::with_api(api, settings))
    }

    pub fn with_api(api: Arc<dyn ScrapeApi>, settings: EngineSettings) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let downloader = ReportDownloader::new(api.clone(), settings.download_dir.clone());
        Self {
            api,
            settings,
            downloader,
            poller: None,
            shutdown: CancellationToken::new(),
            event_tx,
            event_rx,
        }
    }

    pub fn api(&self) -> &Arc<dyn ScrapeApi> {
        &self.api
    }

    pub async fn submit(&self, url: &str) -> Result<TaskId, ApiError> {
        let task_id = self.api.submit(url).await?;
        panel_info!("Submitted {} as task {}", url, task_id);
        Ok(task_id)
    }

    pub fn start_polling(&mut self, session: SessionId, task_id: TaskId) {
        if self.shutdown.is_cancelled() {
            return;
        }
        // Release the previous poller before the new one exists.
        if let Some(previous) = self.poller.take() {
            previous.stop();
        }
        panel_debug!(
            "Polling task {} every {:?} (session {})",
            task_id,
            self.settings.poll_interval,
            session
        );
        self.poller = Some(spawn_poller(
            self.api.clone(),
            session,
            task_id,
            self.settings.poll_interval,
            self.shutdown.child_token(),
            self.event_tx.clone(),
        ));
    }

    /// Stops the poller if it belongs to `session`.
    pub fn stop_polling(&mut self, session: SessionId) {
        if self
            .poller
            .as_ref()
            .is_some_and(|poller| poller.session() == session)
        {
            if let Some(poller) = self.poller.take() {
                poller.stop();
            }
        }
    }

    pub fn polling_session(&self) -> Option<SessionId> {
        self.poller.as_ref().map(PollHandle::session)
    }

    pub fn fetch_result(&self, session: SessionId, task_id: TaskId) {
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = shutdown.cancelled() => return,
                result = api.fetch_result(&task_id) => result,
            };
            let _ = tx.send(EngineEvent::ResultFetched {
                session,
                task_id,
                result,
            });
        });
    }

    pub fn download_report(&self, task_id: TaskId) {
        let downloader = self.downloader.clone();
        let tx = self.event_tx.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = shutdown.cancelled() => return,
                result = downloader.download(&task_id) => result,
            };
            let _ = tx.send(EngineEvent::ReportDownloaded { task_id, result });
        });
    }

    /// Waits for the next event. Returns `None` only after shutdown.
    pub async fn next_event(&mut self) -> Option<EngineEvent> {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => None,
            event = self.event_rx.recv() => event,
        }
    }

    pub fn try_recv(&mut self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Cancels the poller and every outstanding fetch or download.
    pub fn shutdown(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
        self.shutdown.cancel();
        while self.event_rx.try_recv().is_ok() {}
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
