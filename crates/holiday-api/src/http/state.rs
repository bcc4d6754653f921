//! Application state for HTTP handlers.

use std::sync::Arc;

use holiday_domain::{CalendarSource, SingleDateLookup, UpstreamFailurePolicy};
use holiday_server::handlers::batch::{
    BatchAggregator, BatchMode, CheckError, DateChecker, InProcessChecker, SelfCallChecker,
    DEFAULT_MAX_BATCH_DATES,
};
use holiday_server::{ConfigLoadError, ServerConfig};

/// Application state shared across all HTTP handlers.
///
/// Holds no per-request data: calendars and indexes are built inside each
/// handler call and dropped with it.
///
/// # Type Parameters
///
/// * `C` - The calendar source implementing `CalendarSource`
pub struct AppState<C: CalendarSource> {
    /// The upstream calendar source.
    pub source: Arc<C>,
    /// Single-date lookup over `source`.
    pub lookup: Arc<SingleDateLookup<C>>,
    /// Aggregator behind both batch endpoints.
    pub batch: Arc<BatchAggregator>,
}

impl<C: CalendarSource> AppState<C> {
    /// Creates a state with in-process batch checks and default policies.
    pub fn new(source: Arc<C>) -> Self {
        Self::in_process(
            source,
            UpstreamFailurePolicy::default(),
            DEFAULT_MAX_BATCH_DATES,
        )
    }

    /// Creates a state whose batch checks call the lookup directly.
    pub fn in_process(source: Arc<C>, policy: UpstreamFailurePolicy, max_dates: usize) -> Self {
        let lookup = Arc::new(SingleDateLookup::with_policy(Arc::clone(&source), policy));
        let checker: Arc<dyn DateChecker> = Arc::new(InProcessChecker::new(Arc::clone(&lookup)));
        Self::assemble(source, lookup, checker, max_dates)
    }

    /// Creates a state with an explicit batch checker.
    pub fn with_checker(
        source: Arc<C>,
        policy: UpstreamFailurePolicy,
        checker: Arc<dyn DateChecker>,
        max_dates: usize,
    ) -> Self {
        let lookup = Arc::new(SingleDateLookup::with_policy(Arc::clone(&source), policy));
        Self::assemble(source, lookup, checker, max_dates)
    }

    /// Creates the state described by `config`.
    ///
    /// `self_address` is where self-calls are sent when `batch.mode` is
    /// `self_call`; it must point at the listener serving this state.
    pub fn from_config(
        source: Arc<C>,
        config: &ServerConfig,
        self_address: &str,
    ) -> Result<Self, StateError> {
        let policy = if config.lookup.propagate_upstream_errors {
            UpstreamFailurePolicy::Propagate
        } else {
            UpstreamFailurePolicy::TreatAsNotFound
        };

        let state = match config.batch.batch_mode()? {
            BatchMode::InProcess => Self::in_process(source, policy, config.batch.max_dates),
            BatchMode::SelfCall => {
                let checker = SelfCallChecker::new(self_address, config.batch.timeout())?;
                Self::with_checker(source, policy, Arc::new(checker), config.batch.max_dates)
            }
        };
        Ok(state)
    }

    fn assemble(
        source: Arc<C>,
        lookup: Arc<SingleDateLookup<C>>,
        checker: Arc<dyn DateChecker>,
        max_dates: usize,
    ) -> Self {
        let batch = Arc::new(BatchAggregator::new(checker).with_max_dates(max_dates));
        Self {
            source,
            lookup,
            batch,
        }
    }
}

/// Errors building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigLoadError),

    #[error("failed to build self-call client: {0}")]
    Client(#[from] CheckError),
}
