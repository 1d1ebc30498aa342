use crate::api::ApiError;
use crate::api::dto::{AddWordRequest, QuizDto, UserProfile, WordListDto};
use crate::auth::AuthSession;
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Identifies one submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub enum ApiRequest {
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        name: String,
    },
    RefreshProfile,
    FetchWordLists,
    CreateWordList {
        name: String,
    },
    DeleteWordList {
        list_id: i64,
    },
    RemoveWord {
        list_id: i64,
        word_id: i64,
    },
    AddWord {
        list_id: i64,
        request: AddWordRequest,
    },
    GenerateQuiz {
        list_id: i64,
    },
    ExtractPdf {
        path: PathBuf,
    },
    ReadTextFile {
        path: PathBuf,
    },
}

impl ApiRequest {
    fn name(&self) -> &'static str {
        match self {
            ApiRequest::Login { .. } => "login",
            ApiRequest::Register { .. } => "register",
            ApiRequest::RefreshProfile => "refresh_profile",
            ApiRequest::FetchWordLists => "fetch_word_lists",
            ApiRequest::CreateWordList { .. } => "create_word_list",
            ApiRequest::DeleteWordList { .. } => "delete_word_list",
            ApiRequest::RemoveWord { .. } => "remove_word",
            ApiRequest::AddWord { .. } => "add_word",
            ApiRequest::GenerateQuiz { .. } => "generate_quiz",
            ApiRequest::ExtractPdf { .. } => "extract_pdf",
            ApiRequest::ReadTextFile { .. } => "read_text_file",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    SignedIn(UserProfile),
    Profile(Option<UserProfile>),
    WordLists(Vec<WordListDto>),
    Quiz(QuizDto),
    Document { text: String, page_count: usize },
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub ticket: Ticket,
    pub result: Result<ApiOutcome, ApiError>,
}

/// Runs backend calls on the tokio runtime and hands results back to the UI
/// thread over a channel.
pub struct ApiWorker {
    runtime: Handle,
    auth: Arc<AuthSession>,
    tx: Sender<ApiResponse>,
    rx: Receiver<ApiResponse>,
    next_ticket: u64,
    in_flight: HashMap<Ticket, AbortHandle>,
}

impl ApiWorker {
    pub fn new(runtime: Handle, auth: Arc<AuthSession>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            runtime,
            auth,
            tx,
            rx,
            next_ticket: 0,
            in_flight: HashMap::new(),
        }
    }

    pub fn auth(&self) -> &Arc<AuthSession> {
        &self.auth
    }

    pub fn submit(&mut self, request: ApiRequest) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        tracing::debug!("Submitting {} as {:?}", request.name(), ticket);

        let auth = Arc::clone(&self.auth);
        let tx = self.tx.clone();
        let handle = self.runtime.spawn(async move {
            let name = request.name();
            let result = perform(&auth, request).await;
            if let Err(err) = &result {
                tracing::warn!("{} failed: {}", name, err);
                if err.is_auth_failure() {
                    auth.invalidate();
                }
            }
            if tx.send(ApiResponse { ticket, result }).is_err() {
                tracing::debug!("Response for {:?} dropped, receiver gone", ticket);
            }
        });
        self.in_flight.insert(ticket, handle.abort_handle());
        ticket
    }

    /// Aborts the request; a response already queued for it is discarded.
    pub fn cancel(&mut self, ticket: Ticket) -> bool {
        match self.in_flight.remove(&ticket) {
            Some(handle) => {
                tracing::info!("Cancelling {:?}", ticket);
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, ticket: Ticket) -> bool {
        self.in_flight.contains_key(&ticket)
    }

    /// Next finished response, skipping cancelled ones.
    pub fn try_recv(&mut self) -> Option<ApiResponse> {
        while let Ok(response) = self.rx.try_recv() {
            if self.in_flight.remove(&response.ticket).is_some() {
                return Some(response);
            }
            tracing::debug!("Discarding response for cancelled {:?}", response.ticket);
        }
        None
    }

    #[cfg(test)]
    fn recv_timeout(&mut self, timeout: std::time::Duration) -> Option<ApiResponse> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            if let Some(response) = self.try_recv() {
                return Some(response);
            }
            if std::time::Instant::now() >= deadline {
                return None;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }
}

async fn perform(auth: &AuthSession, request: ApiRequest) -> Result<ApiOutcome, ApiError> {
    let backend = auth.backend();
    match request {
        ApiRequest::Login { email, password } => {
            auth.login(&email, &password).await.map(ApiOutcome::SignedIn)
        }
        ApiRequest::Register {
            email,
            password,
            name,
        } => auth
            .register(&email, &password, &name)
            .await
            .map(ApiOutcome::SignedIn),
        ApiRequest::RefreshProfile => auth.refresh().await.map(ApiOutcome::Profile),
        ApiRequest::FetchWordLists => backend.my_word_lists().await.map(ApiOutcome::WordLists),
        ApiRequest::CreateWordList { name } => {
            backend.create_word_list(&name).await?;
            Ok(ApiOutcome::Done)
        }
        ApiRequest::DeleteWordList { list_id } => {
            backend.delete_word_list(list_id).await?;
            Ok(ApiOutcome::Done)
        }
        ApiRequest::RemoveWord { list_id, word_id } => {
            backend.remove_word(list_id, word_id).await?;
            Ok(ApiOutcome::Done)
        }
        ApiRequest::AddWord { list_id, request } => {
            backend.add_word(list_id, &request).await?;
            Ok(ApiOutcome::Done)
        }
        ApiRequest::GenerateQuiz { list_id } => {
            backend.generate_quiz(list_id).await.map(ApiOutcome::Quiz)
        }
        ApiRequest::ExtractPdf { path } => {
            let bytes = tokio::fs::read(&path).await.map_err(|e| {
                ApiError::Pdf(format!("Could not read {}: {}", path.display(), e))
            })?;
            let extraction = backend.extract_pdf(bytes).await?;
            Ok(ApiOutcome::Document {
                text: extraction.text,
                page_count: extraction.page_count,
            })
        }
        ApiRequest::ReadTextFile { path } => {
            let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
                ApiError::Decode(format!("Could not read {}: {}", path.display(), e))
            })?;
            Ok(ApiOutcome::Document {
                text,
                page_count: 1,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeBackend;
    use crate::api::dto::PdfExtraction;
    use std::io::Write;
    use std::time::Duration;
    use tokio::runtime::Runtime;

    const WAIT: Duration = Duration::from_secs(2);

    fn setup(fake: FakeBackend) -> (Runtime, Arc<FakeBackend>, ApiWorker) {
        let runtime = Runtime::new().unwrap();
        let fake = Arc::new(fake);
        let auth = Arc::new(AuthSession::new(fake.clone()));
        let worker = ApiWorker::new(runtime.handle().clone(), auth);
        (runtime, fake, worker)
    }

    #[test]
    fn test_login_response_carries_ticket() {
        let (_rt, _fake, mut worker) = setup(FakeBackend::with_profile("a@b.c", "Ada"));
        let ticket = worker.submit(ApiRequest::Login {
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
        });
        assert!(worker.is_pending(ticket));

        let response = worker.recv_timeout(WAIT).unwrap();
        assert_eq!(response.ticket, ticket);
        assert!(matches!(response.result, Ok(ApiOutcome::SignedIn(ref p)) if p.name == "Ada"));
        assert!(!worker.is_pending(ticket));
        assert!(worker.auth().is_authenticated());
    }

    #[test]
    fn test_cancelled_request_never_delivers() {
        let fake = FakeBackend::new();
        fake.state().delay = Some(Duration::from_millis(200));
        let (_rt, _fake, mut worker) = setup(fake);

        let ticket = worker.submit(ApiRequest::GenerateQuiz { list_id: 1 });
        assert!(worker.cancel(ticket));
        assert!(!worker.cancel(ticket));
        assert!(!worker.is_pending(ticket));
        assert!(worker.recv_timeout(Duration::from_millis(400)).is_none());
    }

    #[test]
    fn test_auth_failure_invalidates_session() {
        let (_rt, fake, mut worker) = setup(FakeBackend::with_profile("a@b.c", "Ada"));
        worker.submit(ApiRequest::Login {
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
        });
        worker.recv_timeout(WAIT).unwrap();

        fake.fail_next(ApiError::Unauthorized { status: 401 });
        worker.submit(ApiRequest::FetchWordLists);
        let response = worker.recv_timeout(WAIT).unwrap();
        assert!(response.result.unwrap_err().is_auth_failure());
        assert!(!worker.auth().is_authenticated());
        assert!(worker.auth().current_user().is_none());
    }

    #[test]
    fn test_extract_pdf_reads_file() {
        let fake = FakeBackend::new();
        fake.state().pdf = PdfExtraction {
            success: true,
            text: "Hello there.".to_string(),
            page_count: 1,
            ..Default::default()
        };
        let (_rt, _fake, mut worker) = setup(fake);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4").unwrap();
        worker.submit(ApiRequest::ExtractPdf {
            path: file.path().to_path_buf(),
        });
        let response = worker.recv_timeout(WAIT).unwrap();
        assert_eq!(
            response.result,
            Ok(ApiOutcome::Document {
                text: "Hello there.".to_string(),
                page_count: 1
            })
        );
    }

    #[test]
    fn test_missing_pdf_file_is_pdf_error() {
        let (_rt, fake, mut worker) = setup(FakeBackend::new());
        worker.submit(ApiRequest::ExtractPdf {
            path: PathBuf::from("/definitely/not/here.pdf"),
        });
        let response = worker.recv_timeout(WAIT).unwrap();
        assert!(matches!(response.result, Err(ApiError::Pdf(_))));
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn test_read_text_file() {
        let (_rt, _fake, mut worker) = setup(FakeBackend::new());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "I am happy. You are sad.").unwrap();
        worker.submit(ApiRequest::ReadTextFile {
            path: file.path().to_path_buf(),
        });
        let response = worker.recv_timeout(WAIT).unwrap();
        assert!(matches!(
            response.result,
            Ok(ApiOutcome::Document { ref text, .. }) if text == "I am happy. You are sad."
        ));
    }
}
