use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Once};

use follower_core::{
    CollectorSettings, Credential, FollowerRecord, PageOutcome, PageRequest, ProfileId, Termination,
    Token, AUTH_EXHAUSTED_REASON,
};
use follower_engine::{
    AuthSession, CredentialProvider, EngineEvent, OrchestratorError, Orchestrator, Pacing,
    PageSource, ProgressSink, ProviderError, ScrapeProgress, ScrapeResponse,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scrape_logging::initialize_for_tests);
}

/// Replays a fixed script of outcomes; once exhausted, repeats `fallback`.
struct ScriptedSource {
    script: Mutex<VecDeque<PageOutcome>>,
    fallback: PageOutcome,
    calls: Mutex<Vec<(u32, String)>>,
}

impl ScriptedSource {
    fn new(script: Vec<PageOutcome>, fallback: PageOutcome) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn pages(&self) -> Vec<u32> {
        self.calls.lock().unwrap().iter().map(|(page, _)| *page).collect()
    }

    fn tokens(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }
}

#[async_trait::async_trait]
impl PageSource for ScriptedSource {
    async fn fetch_page(&self, token: &Token, request: &PageRequest) -> PageOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((request.page, token.as_str().to_string()));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Always returns one new follower per page.
#[derive(Default)]
struct EndlessSource {
    calls: AtomicU32,
}

#[async_trait::async_trait]
impl PageSource for EndlessSource {
    async fn fetch_page(&self, _token: &Token, request: &PageRequest) -> PageOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        PageOutcome::Items(vec![FollowerRecord::named(format!("user{}", request.page))])
    }
}

/// Hands out `token-1`, `token-2`, ... or fails with a fixed error.
struct CountingProvider {
    calls: AtomicU32,
    failure: Option<ProviderError>,
}

impl CountingProvider {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            failure: None,
        })
    }

    fn failing(err: ProviderError) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            failure: Some(err),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CredentialProvider for CountingProvider {
    async fn acquire_token(&self, credential: &Credential) -> Result<Token, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if !credential.can_login() {
            return Err(ProviderError::MissingCredentials);
        }
        Ok(Token::new(format!("token-{n}")))
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn names(list: &[&str]) -> PageOutcome {
    PageOutcome::Items(list.iter().map(|name| FollowerRecord::named(*name)).collect())
}

fn empty() -> PageOutcome {
    PageOutcome::Items(Vec::new())
}

fn orchestrator(
    provider: Arc<dyn CredentialProvider>,
    source: Arc<dyn PageSource>,
    settings: CollectorSettings,
) -> Orchestrator {
    Orchestrator::new(provider, source, settings, Pacing::none())
}

fn profile() -> ProfileId {
    ProfileId::parse("https://www.example.com/profile/31337").unwrap()
}

fn login() -> Credential {
    Credential::new("me@example.com", "secret")
}

#[tokio::test]
async fn collects_unique_names_until_two_empty_pages() {
    init_logging();
    let source = ScriptedSource::new(
        vec![names(&["A", "B"]), names(&["B", "C"]), empty(), empty()],
        names(&["never"]),
    );
    let provider = CountingProvider::ok();
    let orchestrator = orchestrator(
        provider.clone(),
        source.clone(),
        CollectorSettings::default(),
    );

    let report = orchestrator.run(&profile(), &login()).await.unwrap();

    assert_eq!(report.termination, Termination::EndOfList);
    assert_eq!(report.names, vec!["A", "B", "C"]);
    assert_eq!(source.pages(), vec![1, 2, 3, 4]);
    assert_eq!(provider.calls(), 1);

    let body = serde_json::to_value(ScrapeResponse::from_report(report)).unwrap();
    assert_eq!(
        body,
        json!({
            "success": true,
            "profileId": "31337",
            "count": 3,
            "followers": ["A", "B", "C"]
        })
    );
}

#[tokio::test]
async fn expired_token_is_refreshed_and_same_page_retried() {
    init_logging();
    let source = ScriptedSource::new(
        vec![PageOutcome::AuthExpired, names(&["A"]), empty()],
        names(&["never"]),
    );
    let provider = CountingProvider::ok();
    let settings = CollectorSettings {
        empty_page_threshold: 1,
        ..CollectorSettings::default()
    };
    let orchestrator = orchestrator(provider.clone(), source.clone(), settings);
    let credential = login().with_manual_token("manual");

    let report = orchestrator.run(&profile(), &credential).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.count(), 1);
    assert_eq!(report.refreshes, 1);
    assert_eq!(provider.calls(), 1);
    assert_eq!(source.pages(), vec![1, 1, 2]);
    assert_eq!(source.tokens(), vec!["manual", "token-1", "token-1"]);
}

#[tokio::test]
async fn stops_at_page_ceiling_for_endless_source() {
    let source = Arc::new(EndlessSource::default());
    let settings = CollectorSettings {
        page_ceiling: 40,
        ..CollectorSettings::default()
    };
    let orchestrator = orchestrator(CountingProvider::ok(), source.clone(), settings);

    let report = orchestrator.run(&profile(), &login()).await.unwrap();

    assert_eq!(report.termination, Termination::CeilingReached);
    assert_eq!(source.calls.load(Ordering::SeqCst), 40);
    assert_eq!(report.count(), 40);
    assert!(ScrapeResponse::from_report(report).success);
}

#[tokio::test]
async fn persistent_expiry_exhausts_the_retry_budget() {
    let source = ScriptedSource::new(vec![names(&["A"])], PageOutcome::AuthExpired);
    let provider = CountingProvider::ok();
    let orchestrator = orchestrator(
        provider.clone(),
        source.clone(),
        CollectorSettings::default(),
    );

    let report = orchestrator.run(&profile(), &login()).await.unwrap();

    assert_eq!(
        report.termination,
        Termination::Failed(AUTH_EXHAUSTED_REASON.to_string())
    );
    // One call for page 1, then budget + 1 calls for page 2.
    assert_eq!(source.pages(), vec![1, 2, 2, 2]);
    assert_eq!(provider.calls(), 3);

    let response = ScrapeResponse::from_report(report);
    assert!(!response.success);
    assert!(response.error.as_deref().unwrap().contains("token expired"));
    assert!(response.has_partial_data());
    assert_eq!(response.followers, Some(vec!["A".to_string()]));
}

#[tokio::test]
async fn manual_token_without_login_cannot_refresh() {
    let source = ScriptedSource::new(vec![names(&["A"]), PageOutcome::AuthExpired], empty());
    let provider = CountingProvider::ok();
    let orchestrator = orchestrator(
        provider.clone(),
        source.clone(),
        CollectorSettings::default(),
    );
    let credential = Credential::default().with_manual_token("manual");

    let report = orchestrator.run(&profile(), &credential).await.unwrap();

    match &report.termination {
        Termination::Failed(reason) => assert!(reason.contains("token expired"), "{reason}"),
        other => panic!("unexpected termination {other:?}"),
    }
    assert_eq!(report.names, vec!["A"]);
    assert_eq!(source.pages(), vec![1, 2]);
}

#[tokio::test]
async fn transient_failure_returns_partial_data() {
    let source = ScriptedSource::new(
        vec![
            names(&["A", "B"]),
            PageOutcome::TransientFailure("http status 503".into()),
        ],
        names(&["never"]),
    );
    let orchestrator = orchestrator(
        CountingProvider::ok(),
        source.clone(),
        CollectorSettings::default(),
    );

    let response: ScrapeResponse = orchestrator.run(&profile(), &login()).await.into();

    assert!(!response.success);
    assert_eq!(response.http_status(), 502);
    assert_eq!(response.count, Some(2));
    assert_eq!(response.error.as_deref(), Some("page 2: http status 503"));
    assert_eq!(source.pages(), vec![1, 2]);
}

#[tokio::test]
async fn transient_failure_is_retried_when_configured() {
    let source = ScriptedSource::new(
        vec![
            PageOutcome::TransientFailure("timeout".into()),
            names(&["A"]),
        ],
        empty(),
    );
    let settings = CollectorSettings {
        transient_retry_budget: 1,
        ..CollectorSettings::default()
    };
    let orchestrator = orchestrator(CountingProvider::ok(), source.clone(), settings);

    let report = orchestrator.run(&profile(), &login()).await.unwrap();

    assert!(report.is_success());
    assert_eq!(source.pages(), vec![1, 1, 2, 3]);
}

#[tokio::test]
async fn missing_login_and_token_means_no_credential_path() {
    let source = ScriptedSource::new(Vec::new(), empty());
    let orchestrator = orchestrator(
        CountingProvider::ok(),
        source.clone(),
        CollectorSettings::default(),
    );

    let err = orchestrator
        .run(&profile(), &Credential::default())
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::NoCredentialPath));
    assert_eq!(err.http_status(), 500);
    assert!(source.pages().is_empty());

    let body = serde_json::to_value(ScrapeResponse::from_error(&err)).unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("no credential path available"));
    assert!(body.get("followers").is_none());
}

#[tokio::test]
async fn rejected_login_fails_before_any_page() {
    let source = ScriptedSource::new(Vec::new(), empty());
    let provider = CountingProvider::failing(ProviderError::Login("http status 401".into()));
    let orchestrator = orchestrator(provider, source.clone(), CollectorSettings::default());

    let err = orchestrator.run(&profile(), &login()).await.unwrap_err();

    assert!(matches!(err, OrchestratorError::CredentialsRejected(_)));
    assert!(err.to_string().contains("provider rejected credentials"));
    assert!(source.pages().is_empty());
}

#[tokio::test]
async fn progress_reports_each_handled_page() {
    let source = ScriptedSource::new(
        vec![
            names(&["A", "B"]),
            PageOutcome::AuthExpired,
            names(&["B"]),
            empty(),
            empty(),
        ],
        empty(),
    );
    let orchestrator = orchestrator(
        CountingProvider::ok(),
        source,
        CollectorSettings::default(),
    );
    let sink = RecordingSink::default();

    orchestrator
        .run_with_progress(9, &profile(), &login(), &sink)
        .await
        .unwrap();

    let events = sink.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            EngineEvent::Progress(ScrapeProgress {
                job_id: 9,
                page: 1,
                received: 2,
                added: 2,
                total: 2,
            }),
            EngineEvent::TokenRefreshed { job_id: 9, page: 2 },
            EngineEvent::Progress(ScrapeProgress {
                job_id: 9,
                page: 2,
                received: 1,
                added: 0,
                total: 2,
            }),
            EngineEvent::Progress(ScrapeProgress {
                job_id: 9,
                page: 3,
                received: 0,
                added: 0,
                total: 2,
            }),
            EngineEvent::Progress(ScrapeProgress {
                job_id: 9,
                page: 4,
                received: 0,
                added: 0,
                total: 2,
            }),
        ]
    );
}

#[tokio::test]
async fn refresh_replaces_token_and_keeps_it_on_failure() {
    let provider = CountingProvider::ok();
    let mut session = AuthSession::initialize(login(), provider.clone())
        .await
        .unwrap();
    assert_eq!(session.token(), &Token::new("token-1"));
    assert!(!session.is_manual());

    let first = session.refresh().await.unwrap();
    let second = session.refresh().await.unwrap();
    assert_ne!(first, second);
    assert_eq!(session.token(), &second);
    assert_eq!(provider.calls(), 3);

    let failing = CountingProvider::failing(ProviderError::Handshake("blocked".into()));
    let mut session = AuthSession::initialize(Credential::default().with_manual_token("m"), failing)
        .await
        .unwrap();
    assert!(session.is_manual());
    assert!(session.refresh().await.is_err());
    assert_eq!(session.token(), &Token::new("m"));
}
