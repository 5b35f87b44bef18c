//! Search → results → add-missing workflow.

use super::debounce::DebounceTimer;
use crate::ident::CanonicalIdentifier;
use crate::model::category::Category;
use crate::parse::split_tokens;
use crate::reconcile::Reconciliation;
use crate::repo::record_repo::RecordRepository;
use crate::service::record_service::{RecordService, ServiceError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Workflow state of one operator session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Searching {
        category: Category,
        tokens: Vec<String>,
    },
    Results {
        category: Category,
        tokens: Vec<String>,
        reconciliation: Reconciliation,
    },
    AddingMissing {
        category: Category,
        tokens: Vec<String>,
        reconciliation: Reconciliation,
        selected: CanonicalIdentifier,
    },
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Searching { .. } => "searching",
            Self::Results { .. } => "results",
            Self::AddingMissing { .. } => "adding_missing",
        }
    }

    /// Current reconciliation, when results are on screen.
    pub fn reconciliation(&self) -> Option<&Reconciliation> {
        match self {
            Self::Results { reconciliation, .. } | Self::AddingMissing { reconciliation, .. } => {
                Some(reconciliation)
            }
            _ => None,
        }
    }
}

/// Workflow precondition failures.
#[derive(Debug)]
pub enum SessionError {
    /// Search input holds no non-empty token.
    NoTokens,
    /// Operation is not allowed in the current state.
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
    /// Selected identifier is not in the current missing list.
    NotMissing(String),
    /// Content for a missing record is blank.
    EmptyContent,
    Service(ServiceError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTokens => write!(f, "Please enter valid numbers"),
            Self::InvalidState { operation, state } => {
                write!(f, "cannot {operation} while {state}")
            }
            Self::NotMissing(identifier) => {
                write!(f, "{identifier} is not in the missing list")
            }
            Self::EmptyContent => write!(f, "content must not be empty"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ServiceError> for SessionError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

/// One operator's search/add workflow over a record service.
pub struct OperatorSession<R: RecordRepository> {
    service: RecordService<R>,
    state: SessionState,
    input: String,
    committed_input: String,
    debounce: DebounceTimer<String>,
    message: Option<String>,
}

impl<R: RecordRepository> OperatorSession<R> {
    pub fn new(service: RecordService<R>) -> Self {
        Self::with_debounce(service, DebounceTimer::default())
    }

    pub fn with_debounce(service: RecordService<R>, debounce: DebounceTimer<String>) -> Self {
        Self {
            service,
            state: SessionState::Idle,
            input: String::new(),
            committed_input: String::new(),
            debounce,
            message: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn service(&self) -> &RecordService<R> {
        &self.service
    }

    /// Last inline message for the operator (errors and confirmations).
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Input value after debouncing settled.
    pub fn committed_input(&self) -> &str {
        &self.committed_input
    }

    /// Records a keystroke-level input change and restarts the debounce.
    pub fn set_input(&mut self, now: Instant, text: impl Into<String>) {
        let text = text.into();
        self.input = text.clone();
        self.debounce.schedule(now, text);
    }

    /// Commits debounced input that is due. Returns whether it changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.debounce.poll(now) {
            Some(value) if value != self.committed_input => {
                self.committed_input = value;
                true
            }
            _ => false,
        }
    }

    /// Whether the settled input has something to search for.
    pub fn search_ready(&self) -> bool {
        !split_tokens(&self.committed_input).is_empty()
    }

    /// Reconciles the current input against the store for `category`.
    ///
    /// # Errors
    /// - `NoTokens` when the input is blank; the state is unchanged.
    /// - `Service` when the store fails; the previous state is restored.
    pub fn search(&mut self, category: Category) -> Result<&Reconciliation, SessionError> {
        let tokens = split_tokens(&self.input);
        if tokens.is_empty() {
            return Err(self.fail(SessionError::NoTokens));
        }

        self.debounce.cancel();
        self.committed_input = self.input.clone();

        let previous = std::mem::replace(
            &mut self.state,
            SessionState::Searching {
                category,
                tokens: tokens.clone(),
            },
        );
        match self.service.reconcile_tokens(&tokens, category) {
            Ok(reconciliation) => {
                self.message = None;
                self.state = SessionState::Results {
                    category,
                    tokens,
                    reconciliation,
                };
                self.current_reconciliation()
            }
            Err(err) => {
                self.state = previous;
                Err(self.fail(err.into()))
            }
        }
    }

    /// Picks a missing identifier to fill in.
    pub fn select_missing(&mut self, identifier: &str) -> Result<(), SessionError> {
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        let (category, tokens, reconciliation) = match state {
            SessionState::Results {
                category,
                tokens,
                reconciliation,
            }
            | SessionState::AddingMissing {
                category,
                tokens,
                reconciliation,
                ..
            } => (category, tokens, reconciliation),
            other => {
                let err = SessionError::InvalidState {
                    operation: "select a missing number",
                    state: other.name(),
                };
                self.state = other;
                return Err(self.fail(err));
            }
        };

        let selected = reconciliation
            .missing
            .iter()
            .find(|item| item.value == identifier.trim())
            .cloned();
        match selected {
            Some(selected) => {
                self.state = SessionState::AddingMissing {
                    category,
                    tokens,
                    reconciliation,
                    selected,
                };
                self.message = None;
                Ok(())
            }
            None => {
                self.state = SessionState::Results {
                    category,
                    tokens,
                    reconciliation,
                };
                Err(self.fail(SessionError::NotMissing(identifier.trim().to_string())))
            }
        }
    }

    /// Leaves the add form without writing.
    pub fn cancel_adding(&mut self) {
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        self.state = match state {
            SessionState::AddingMissing {
                category,
                tokens,
                reconciliation,
                ..
            } => SessionState::Results {
                category,
                tokens,
                reconciliation,
            },
            other => other,
        };
    }

    /// Stores content for the selected missing identifier, then re-runs the
    /// search against the store.
    ///
    /// # Errors
    /// - `InvalidState` unless a missing identifier is selected.
    /// - `EmptyContent` for blank content.
    /// - `Service` when the write or the refresh fails; the session stays in
    ///   `AddingMissing`.
    pub fn add_missing(&mut self, content: &str) -> Result<&Reconciliation, SessionError> {
        let (category, tokens, selected) = match &self.state {
            SessionState::AddingMissing {
                category,
                tokens,
                selected,
                ..
            } => (*category, tokens.clone(), selected.clone()),
            other => {
                let err = SessionError::InvalidState {
                    operation: "add a missing question",
                    state: other.name(),
                };
                return Err(self.fail(err));
            }
        };
        if content.trim().is_empty() {
            return Err(self.fail(SessionError::EmptyContent));
        }

        if let Err(err) = self
            .service
            .add_record(&selected.value, Some(selected.category), content)
        {
            return Err(self.fail(err.into()));
        }
        info!(
            "event=session_add_missing module=session status=ok category={category} identifier={}",
            selected.value
        );

        match self.service.reconcile_tokens(&tokens, category) {
            Ok(reconciliation) => {
                self.state = SessionState::Results {
                    category,
                    tokens,
                    reconciliation,
                };
                self.message = Some(format!("Added {}.", selected.value));
                self.current_reconciliation()
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Returns to `Idle` and clears all input.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.input.clear();
        self.committed_input.clear();
        self.debounce.cancel();
        self.message = None;
    }

    fn current_reconciliation(&self) -> Result<&Reconciliation, SessionError> {
        self.state
            .reconciliation()
            .ok_or(SessionError::InvalidState {
                operation: "read results",
                state: self.state.name(),
            })
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        self.message = Some(err.to_string());
        err
    }
}
