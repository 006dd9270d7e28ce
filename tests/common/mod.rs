// Shared fixtures for the integration tests
#![allow(dead_code)]

use axum::Router;
use socket_finder_lib::{
    BackendError, FormInput, Presenter, ResultsView, SearchBackend, SearchRequest, SearchStatus,
    Website,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::Instant;

/// One presenter call, in the order it was made
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterEvent {
    Trigger { enabled: bool, label: String },
    Progress { percent: f64, message: String },
    ProgressVisible(bool),
    Results(ResultsView),
}

/// Presenter that records every call
pub struct RecordingPresenter {
    form: Mutex<FormInput>,
    events: Mutex<Vec<PresenterEvent>>,
}

impl RecordingPresenter {
    pub fn new(form: FormInput) -> Self {
        Self {
            form: Mutex::new(form),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Presenter whose form holds `part_number` with every website selected
    pub fn with_part(part_number: &str) -> Self {
        Self::new(FormInput::new(part_number, Website::all().iter().copied()))
    }

    pub fn set_form(&self, form: FormInput) {
        *self.form.lock().unwrap() = form;
    }

    pub fn events(&self) -> Vec<PresenterEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn views(&self) -> Vec<ResultsView> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PresenterEvent::Results(view) => Some(view),
                _ => None,
            })
            .collect()
    }

    pub fn last_view(&self) -> Option<ResultsView> {
        self.views().pop()
    }

    /// Progress updates as (percent, message)
    pub fn progress(&self) -> Vec<(f64, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PresenterEvent::Progress { percent, message } => Some((percent, message)),
                _ => None,
            })
            .collect()
    }

    /// Number of times the trigger was re-enabled
    pub fn trigger_enables(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, PresenterEvent::Trigger { enabled: true, .. }))
            .count()
    }

    fn record(&self, event: PresenterEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Presenter for RecordingPresenter {
    fn read_form(&self) -> FormInput {
        self.form.lock().unwrap().clone()
    }

    fn set_trigger(&self, enabled: bool, label: &str) {
        self.record(PresenterEvent::Trigger {
            enabled,
            label: label.to_string(),
        });
    }

    fn set_progress(&self, percent: f64, message: &str) {
        self.record(PresenterEvent::Progress {
            percent,
            message: message.to_string(),
        });
    }

    fn set_progress_visible(&self, visible: bool) {
        self.record(PresenterEvent::ProgressVisible(visible));
    }

    fn show_results(&self, view: &ResultsView) {
        self.record(PresenterEvent::Results(view.clone()));
    }
}

/// Scripted answer to a create-search call
#[derive(Debug, Clone)]
pub struct CreateReply {
    pub result: Result<String, String>,
    pub delay: Duration,
}

impl CreateReply {
    pub fn id(search_id: &str) -> Self {
        Self {
            result: Ok(search_id.to_string()),
            delay: Duration::ZERO,
        }
    }

    pub fn refused(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Scripted answer to a status call
#[derive(Debug, Clone)]
pub enum StatusReply {
    Status(SearchStatus),
    /// Backend answered with an `{error}` body
    Remote(String),
    /// The request never produced a usable response
    Transport,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Create(SearchRequest),
    Status(String),
}

/// In-memory backend driven by scripts.
///
/// Create replies are consumed in order. Each search id has its own status
/// script; its last reply repeats once the rest is used up.
pub struct FakeBackend {
    creates: Mutex<VecDeque<CreateReply>>,
    statuses: Mutex<HashMap<String, VecDeque<StatusReply>>>,
    status_delay: Duration,
    calls: Mutex<Vec<(Instant, BackendCall)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            creates: Mutex::new(VecDeque::new()),
            statuses: Mutex::new(HashMap::new()),
            status_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn create(self, reply: CreateReply) -> Self {
        self.creates.lock().unwrap().push_back(reply);
        self
    }

    pub fn statuses(self, search_id: &str, replies: Vec<StatusReply>) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .insert(search_id.to_string(), replies.into());
        self
    }

    /// Delay every status response by `delay`
    pub fn status_delay(mut self, delay: Duration) -> Self {
        self.status_delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, call)| call.clone())
            .collect()
    }

    pub fn create_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, BackendCall::Create(_)))
            .count()
    }

    /// Times at which status calls for `search_id` were made
    pub fn status_times(&self, search_id: &str) -> Vec<Instant> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(at, call)| match call {
                BackendCall::Status(id) if id == search_id => Some(*at),
                _ => None,
            })
            .collect()
    }

    pub fn status_count(&self, search_id: &str) -> usize {
        self.status_times(search_id).len()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push((Instant::now(), call));
    }

    fn next_status(&self, search_id: &str) -> StatusReply {
        let mut statuses = self.statuses.lock().unwrap();
        match statuses.get_mut(search_id) {
            Some(script) if script.len() > 1 => script.pop_front().unwrap(),
            Some(script) if !script.is_empty() => script[0].clone(),
            _ => StatusReply::Remote("Search not found".to_string()),
        }
    }
}

impl SearchBackend for FakeBackend {
    async fn create_search(&self, request: &SearchRequest) -> Result<String, BackendError> {
        self.record(BackendCall::Create(request.clone()));
        let reply = self
            .creates
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| CreateReply::refused("no scripted reply"));

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result.map_err(BackendError::Remote)
    }

    async fn fetch_status(&self, search_id: &str) -> Result<SearchStatus, BackendError> {
        self.record(BackendCall::Status(search_id.to_string()));
        let reply = self.next_status(search_id);

        if !self.status_delay.is_zero() {
            tokio::time::sleep(self.status_delay).await;
        }
        match reply {
            StatusReply::Status(status) => Ok(status),
            StatusReply::Remote(message) => Err(BackendError::Remote(message)),
            StatusReply::Transport => Err(BackendError::InvalidResponse(
                "connection reset".to_string(),
            )),
        }
    }
}

/// Build a status payload from backend-shaped JSON
pub fn status(value: serde_json::Value) -> SearchStatus {
    serde_json::from_value(value).expect("valid status payload")
}

pub fn running(progress: f64, message: &str) -> StatusReply {
    StatusReply::Status(status(serde_json::json!({
        "status": "running",
        "progress": progress,
        "current_search": message,
        "results": []
    })))
}

/// Completed payload with one result found on DataIO
pub fn completed_found() -> StatusReply {
    StatusReply::Status(status(serde_json::json!({
        "status": "completed",
        "progress": 100,
        "current_search": "Search completed!",
        "results": [{
            "website": "DataIO",
            "status": "found",
            "part_used": "AT28C256",
            "socket_info": "PA28-DIP-600",
            "modified": false,
            "chars_removed": 0
        }],
        "summary": {"total_searched": 1, "found_count": 1, "has_results": true}
    })))
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_mock_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("mock server address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock server");
    });
    format!("http://{}", addr)
}
