//! The qualifier flow: register, select, store, submit.
//!
//! `QualifierFlow` is generic over the remote service and filesystem ports, so
//! the whole control flow runs against test doubles in this crate and against
//! the HTTP/local-disk adapters in the binary.
//!
//! Registration, selection, artifact load and store failures abort the run.
//! Submission failures are logged and recorded in the report; the run still
//! completes.

pub mod target;

use chrono::Utc;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

use qualifier_types::artifact::Artifact;
use qualifier_types::config::QualifierConfig;
use qualifier_types::error::{ArtifactError, FlowError, StoreError};
use qualifier_types::flow::{FlowReport, FlowStage, SubmissionOutcome};
use qualifier_types::submission::SubmissionPayload;

use crate::selector::select_artifact;
use crate::service::fs::FileSystem;
use crate::service::remote::RemoteService;

use self::target::resolve_target;

/// One-shot orchestrator for a qualifier run.
pub struct QualifierFlow<R, F>
where
    R: RemoteService,
    F: FileSystem,
{
    remote: R,
    fs: F,
    config: QualifierConfig,
}

impl<R, F> QualifierFlow<R, F>
where
    R: RemoteService,
    F: FileSystem,
{
    pub fn new(remote: R, fs: F, config: QualifierConfig) -> Self {
        Self { remote, fs, config }
    }

    pub fn config(&self) -> &QualifierConfig {
        &self.config
    }

    /// Execute the flow once.
    pub async fn run(&self) -> Result<FlowReport, FlowError> {
        let run_id = Uuid::now_v7();
        let span = info_span!("qualifier_run", %run_id);
        self.run_inner(run_id).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid) -> Result<FlowReport, FlowError> {
        let started_at = Utc::now();
        info!("Starting qualifier flow...");
        let stage = FlowStage::Start;

        let payload = self.config.identity_payload();
        let registration = match self.remote.register(&payload).await {
            Ok(registration) => registration,
            Err(e) => return Err(fail(stage, e.into())),
        };
        info!(
            webhook = registration.webhook().unwrap_or("<none>"),
            token_present = registration.access_token().is_some(),
            "Received webhook"
        );
        let stage = advance(stage, FlowStage::Registered);

        let choice = match select_artifact(&payload.reg_no) {
            Ok(choice) => choice,
            Err(e) => return Err(fail(stage, e.into())),
        };
        let source = self.config.artifact_path(choice).clone();
        info!(%choice, source = %source.display(), "Selected artifact");
        let stage = advance(stage, FlowStage::Selected);

        let raw = match self.fs.read_file(&source).await {
            Ok(raw) => raw,
            Err(e) => {
                let err = ArtifactError::Read {
                    path: source,
                    message: e.to_string(),
                };
                return Err(fail(stage, err.into()));
            }
        };
        let artifact = Artifact::from_raw(choice, source, &raw);

        let output_path = self.config.output.store_file.clone();
        if let Err(e) = self.fs.write_file(&output_path, &artifact.content).await {
            let err = StoreError::Write {
                path: output_path,
                message: e.to_string(),
            };
            return Err(fail(stage, err.into()));
        }
        info!(
            path = %output_path.display(),
            bytes = artifact.content.len(),
            "Stored final query"
        );
        let stage = advance(stage, FlowStage::Stored);

        let target = resolve_target(&registration, &self.config.endpoints);
        let token = registration.access_token();
        let body = SubmissionPayload::new(
            self.config.submission.query_field.as_str(),
            artifact.content.as_str(),
        );

        info!(url = %target, authorized = token.is_some(), "Submitting final query");
        let submission = match self.remote.submit(&target, &body, token).await {
            Ok(response) => {
                info!(%response, "Submission response");
                SubmissionOutcome::Accepted { response }
            }
            Err(warning) => {
                error!(url = %target, error = %warning, "Submission failed");
                SubmissionOutcome::Failed {
                    warning: warning.to_string(),
                }
            }
        };
        let stage = advance(stage, FlowStage::Submitted);

        advance(stage, FlowStage::Done);
        info!("Flow complete.");

        Ok(FlowReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            choice: artifact.choice,
            artifact_source: artifact.source,
            output_path,
            target,
            authorized: token.is_some(),
            submission,
        })
    }
}

fn advance(from: FlowStage, to: FlowStage) -> FlowStage {
    debug!(%from, %to, "Stage transition");
    to
}

fn fail(stage: FlowStage, err: FlowError) -> FlowError {
    error!(%stage, error = %err, "Flow failed");
    advance(stage, FlowStage::Failed);
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use secrecy::{ExposeSecret, SecretString};
    use tracing::instrument::WithSubscriber;

    use qualifier_types::artifact::ArtifactChoice;
    use qualifier_types::config::{
        CandidateConfig, EndpointsConfig, HttpConfig, OutputConfig, SqlConfig, SubmissionConfig,
    };
    use qualifier_types::error::{RegistrationError, SubmissionWarning};
    use qualifier_types::registration::{IdentityPayload, RegistrationResponse};

    // --- Test doubles ---

    #[derive(Clone)]
    enum RegisterBehavior {
        Respond {
            webhook: Option<String>,
            token: Option<String>,
        },
        Status(u16),
        EmptyBody,
    }

    #[derive(Clone)]
    enum SubmitBehavior {
        Respond(String),
        ConnectionRefused,
    }

    #[derive(Debug, Clone)]
    struct SubmitCall {
        url: String,
        body: serde_json::Value,
        token: Option<String>,
    }

    struct MockRemote {
        register: RegisterBehavior,
        submit: SubmitBehavior,
        registered: Mutex<Vec<IdentityPayload>>,
        submitted: Mutex<Vec<SubmitCall>>,
    }

    impl MockRemote {
        fn new(register: RegisterBehavior, submit: SubmitBehavior) -> Self {
            Self {
                register,
                submit,
                registered: Mutex::new(Vec::new()),
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn granting(webhook: Option<&str>, token: Option<&str>) -> Self {
            Self::new(
                RegisterBehavior::Respond {
                    webhook: webhook.map(str::to_string),
                    token: token.map(str::to_string),
                },
                SubmitBehavior::Respond("{\"success\":true}".to_string()),
            )
        }

        fn submitted(&self) -> Vec<SubmitCall> {
            self.submitted.lock().unwrap().clone()
        }
    }

    impl RemoteService for MockRemote {
        async fn register(
            &self,
            payload: &IdentityPayload,
        ) -> Result<RegistrationResponse, RegistrationError> {
            self.registered.lock().unwrap().push(payload.clone());
            match &self.register {
                RegisterBehavior::Respond { webhook, token } => Ok(RegistrationResponse::new(
                    webhook.as_deref(),
                    token.as_deref(),
                )),
                RegisterBehavior::Status(status) => Err(RegistrationError::Status {
                    status: *status,
                    body: "Internal Server Error".to_string(),
                }),
                RegisterBehavior::EmptyBody => Err(RegistrationError::EmptyBody),
            }
        }

        async fn submit(
            &self,
            url: &str,
            payload: &SubmissionPayload,
            token: Option<&SecretString>,
        ) -> Result<String, SubmissionWarning> {
            self.submitted.lock().unwrap().push(SubmitCall {
                url: url.to_string(),
                body: serde_json::to_value(payload).unwrap(),
                token: token.map(|t| t.expose_secret().to_string()),
            });
            match &self.submit {
                SubmitBehavior::Respond(body) => Ok(body.clone()),
                SubmitBehavior::ConnectionRefused => Err(SubmissionWarning::Transport(
                    "connection refused".to_string(),
                )),
            }
        }
    }

    #[derive(Default)]
    struct MemoryFs {
        files: Mutex<HashMap<PathBuf, String>>,
        read_only: bool,
    }

    impl MemoryFs {
        fn with_artifacts() -> Self {
            let fs = Self::default();
            fs.seed("q1.sql", "\n  SELECT 'odd' AS parity;\n");
            fs.seed("q2.sql", "SELECT 'even' AS parity;\n\n");
            fs
        }

        fn seed(&self, path: &str, content: &str) {
            self.files
                .lock()
                .unwrap()
                .insert(PathBuf::from(path), content.to_string());
        }

        fn get(&self, path: &str) -> Option<String> {
            self.files.lock().unwrap().get(Path::new(path)).cloned()
        }
    }

    impl FileSystem for MemoryFs {
        async fn write_file(&self, path: &Path, content: &str) -> Result<(), io::Error> {
            if self.read_only {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "read-only filesystem",
                ));
            }
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }

        async fn read_file(&self, path: &Path) -> Result<String, io::Error> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }
    }

    fn config(reg_no: &str) -> QualifierConfig {
        QualifierConfig {
            endpoints: EndpointsConfig {
                base_url: Some("https://svc.test/api".to_string()),
                generate: "/generateWebhook".to_string(),
                submit_fallback: "/testWebhook".to_string(),
            },
            candidate: CandidateConfig {
                name: "Jane Doe".to_string(),
                reg_no: reg_no.to_string(),
                email: "jane@example.com".to_string(),
            },
            sql: SqlConfig {
                q1: PathBuf::from("q1.sql"),
                q2: PathBuf::from("q2.sql"),
            },
            output: OutputConfig {
                store_file: PathBuf::from("final_query.sql"),
            },
            submission: SubmissionConfig::default(),
            http: HttpConfig::default(),
        }
    }

    // --- Happy paths ---

    #[tokio::test]
    async fn test_odd_identifier_stores_and_submits_artifact_a() {
        let remote = MockRemote::granting(Some("https://hook.test/abc"), Some("tok-123"));
        let flow = QualifierFlow::new(remote, MemoryFs::with_artifacts(), config("AB1234CD45"));

        let report = flow.run().await.unwrap();
        assert_eq!(report.choice, ArtifactChoice::A);
        assert_eq!(report.artifact_source, PathBuf::from("q1.sql"));
        assert_eq!(report.target, "https://hook.test/abc");
        assert!(report.authorized);
        assert!(report.submission.is_accepted());

        assert_eq!(
            flow.fs.get("final_query.sql").as_deref(),
            Some("SELECT 'odd' AS parity;")
        );

        let calls = flow.remote.submitted();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "https://hook.test/abc");
        assert_eq!(
            calls[0].body,
            serde_json::json!({"finalQuery": "SELECT 'odd' AS parity;"})
        );
        assert_eq!(calls[0].token.as_deref(), Some("tok-123"));
    }

    #[tokio::test]
    async fn test_even_identifier_selects_artifact_b() {
        let remote = MockRemote::granting(Some("https://hook.test/abc"), Some("tok"));
        let flow = QualifierFlow::new(remote, MemoryFs::with_artifacts(), config("XY0099EF22"));

        let report = flow.run().await.unwrap();
        assert_eq!(report.choice, ArtifactChoice::B);
        assert_eq!(
            flow.fs.get("final_query.sql").as_deref(),
            Some("SELECT 'even' AS parity;")
        );
    }

    #[tokio::test]
    async fn test_registers_configured_identity() {
        let remote = MockRemote::granting(None, None);
        let flow = QualifierFlow::new(remote, MemoryFs::with_artifacts(), config("REG12347"));
        flow.run().await.unwrap();

        let registered = flow.remote.registered.lock().unwrap().clone();
        assert_eq!(
            registered,
            vec![IdentityPayload {
                name: "Jane Doe".to_string(),
                reg_no: "REG12347".to_string(),
                email: "jane@example.com".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_existing_output_is_overwritten() {
        let fs = MemoryFs::with_artifacts();
        fs.seed("final_query.sql", "stale content from a previous run");
        let remote = MockRemote::granting(Some("https://hook.test"), None);
        let flow = QualifierFlow::new(remote, fs, config("REG22"));

        flow.run().await.unwrap();
        assert_eq!(
            flow.fs.get("final_query.sql").as_deref(),
            Some("SELECT 'even' AS parity;")
        );
    }

    #[tokio::test]
    async fn test_custom_query_field_is_used() {
        let mut cfg = config("REG1");
        cfg.submission.query_field = "query".to_string();
        let remote = MockRemote::granting(Some("https://hook.test"), None);
        let flow = QualifierFlow::new(remote, MemoryFs::with_artifacts(), cfg);

        flow.run().await.unwrap();
        let calls = flow.remote.submitted();
        assert_eq!(
            calls[0].body,
            serde_json::json!({"query": "SELECT 'odd' AS parity;"})
        );
    }

    // --- Fallback and authorization ---

    #[tokio::test]
    async fn test_blank_webhook_submits_to_fallback() {
        for webhook in [None, Some(""), Some("  ")] {
            let remote = MockRemote::granting(webhook, Some("tok"));
            let flow = QualifierFlow::new(remote, MemoryFs::with_artifacts(), config("REG1"));

            let report = flow.run().await.unwrap();
            assert_eq!(report.target, "https://svc.test/api/testWebhook");
            assert_eq!(
                flow.remote.submitted()[0].url,
                "https://svc.test/api/testWebhook"
            );
        }
    }

    #[tokio::test]
    async fn test_relative_webhook_resolved_against_base_url() {
        let remote = MockRemote::granting(Some("/hooks/abc"), Some("tok"));
        let flow = QualifierFlow::new(remote, MemoryFs::with_artifacts(), config("REG1"));

        let report = flow.run().await.unwrap();
        assert_eq!(report.target, "https://svc.test/api/hooks/abc");
        assert_eq!(
            flow.remote.submitted()[0].url,
            "https://svc.test/api/hooks/abc"
        );
    }

    #[tokio::test]
    async fn test_blank_token_sends_no_authorization() {
        for token in [None, Some(""), Some("   ")] {
            let remote = MockRemote::granting(Some("https://hook.test"), token);
            let flow = QualifierFlow::new(remote, MemoryFs::with_artifacts(), config("REG1"));

            let report = flow.run().await.unwrap();
            assert!(!report.authorized);
            assert!(flow.remote.submitted()[0].token.is_none());
        }
    }

    #[tokio::test]
    async fn test_token_passed_verbatim() {
        let remote = MockRemote::granting(Some("https://hook.test"), Some("Bearer abc.def"));
        let flow = QualifierFlow::new(remote, MemoryFs::with_artifacts(), config("REG1"));

        flow.run().await.unwrap();
        assert_eq!(
            flow.remote.submitted()[0].token.as_deref(),
            Some("Bearer abc.def")
        );
    }

    // --- Failure edges ---

    #[tokio::test]
    async fn test_registration_failure_aborts_before_write() {
        let remote = MockRemote::new(
            RegisterBehavior::Status(500),
            SubmitBehavior::Respond("unused".to_string()),
        );
        let flow = QualifierFlow::new(remote, MemoryFs::with_artifacts(), config("REG1"));

        let err = flow.run().await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::Registration(RegistrationError::Status { status: 500, .. })
        ));
        assert!(flow.fs.get("final_query.sql").is_none());
        assert!(flow.remote.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_registration_failure_leaves_existing_output_untouched() {
        let fs = MemoryFs::with_artifacts();
        fs.seed("final_query.sql", "previous");
        let remote = MockRemote::new(
            RegisterBehavior::EmptyBody,
            SubmitBehavior::Respond("unused".to_string()),
        );
        let flow = QualifierFlow::new(remote, fs, config("REG1"));

        let err = flow.run().await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::Registration(RegistrationError::EmptyBody)
        ));
        assert_eq!(flow.fs.get("final_query.sql").as_deref(), Some("previous"));
    }

    #[tokio::test]
    async fn test_identifier_without_digits_aborts_without_write() {
        let remote = MockRemote::granting(Some("https://hook.test"), Some("tok"));
        let flow = QualifierFlow::new(remote, MemoryFs::with_artifacts(), config("NODIGITS"));

        let err = flow.run().await.unwrap_err();
        assert!(matches!(err, FlowError::Selection(_)));
        assert!(flow.fs.get("final_query.sql").is_none());
        assert!(flow.remote.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_missing_artifact_aborts() {
        let fs = MemoryFs::default();
        fs.seed("q2.sql", "SELECT 2;");
        let remote = MockRemote::granting(Some("https://hook.test"), None);
        let flow = QualifierFlow::new(remote, fs, config("REG1"));

        let err = flow.run().await.unwrap_err();
        match err {
            FlowError::ArtifactLoad(ArtifactError::Read { path, .. }) => {
                assert_eq!(path, PathBuf::from("q1.sql"));
            }
            other => panic!("expected ArtifactLoad, got {other:?}"),
        }
        assert!(flow.remote.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_aborts_before_submit() {
        let fs = MemoryFs {
            read_only: true,
            ..MemoryFs::with_artifacts()
        };
        let remote = MockRemote::granting(Some("https://hook.test"), None);
        let flow = QualifierFlow::new(remote, fs, config("REG1"));

        let err = flow.run().await.unwrap_err();
        match err {
            FlowError::Store(StoreError::Write { path, message }) => {
                assert_eq!(path, PathBuf::from("final_query.sql"));
                assert!(message.contains("read-only"));
            }
            other => panic!("expected Store error, got {other:?}"),
        }
        assert!(flow.remote.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_submission_failure_still_completes() {
        let remote = MockRemote::new(
            RegisterBehavior::Respond {
                webhook: Some("http://127.0.0.1:9/refused".to_string()),
                token: Some("tok".to_string()),
            },
            SubmitBehavior::ConnectionRefused,
        );
        let flow = QualifierFlow::new(remote, MemoryFs::with_artifacts(), config("REG1"));

        let report = flow.run().await.unwrap();
        assert_eq!(
            report.submission,
            SubmissionOutcome::Failed {
                warning: "submission request failed: connection refused".to_string()
            }
        );
        assert_eq!(
            flow.fs.get("final_query.sql").as_deref(),
            Some("SELECT 'odd' AS parity;")
        );
    }

    /// Shared buffer the test subscriber writes formatted events into.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_submission_failure_logs_error_then_completion() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        let remote = MockRemote::new(
            RegisterBehavior::Respond {
                webhook: Some("http://127.0.0.1:9/refused".to_string()),
                token: Some("tok".to_string()),
            },
            SubmitBehavior::ConnectionRefused,
        );
        let flow = QualifierFlow::new(remote, MemoryFs::with_artifacts(), config("REG1"));

        let report = flow.run().with_subscriber(subscriber).await.unwrap();
        assert!(!report.submission.is_accepted());

        let output = logs.contents();
        let failed = output.find("Submission failed").expect("submission error logged");
        let complete = output.find("Flow complete.").expect("completion logged");
        assert!(failed < complete);
        assert!(output.contains("ERROR"));
    }
}
