//! Drawer protocol: open a corrective drawer, await its resolution, replay.
//!
//! The protocol is the only component that talks to the corrective surface
//! and the only one that decides whether to replay an action. Domain handlers
//! just describe *which* drawer to open; the interceptor just hands errors
//! over.
//!
//! ## Guarantees
//!
//! - At most one drawer per [`ActionKey`] at a time. A second recoverable
//!   error for a key under recovery joins the active recovery instead of
//!   stacking another drawer.
//! - Exactly one terminal signal per drawer (completion or dismissal), then at
//!   most one replay of the action.
//! - Recovery is bounded by [`RecoveryConfig::max_recovery_cycles`]; with the
//!   default of 1, a recoverable failure on replay is final.
//! - Only terminal outcomes reach the caller. Every failure after routing
//!   carries the original error.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use remedy_core::{
    ActionKey, Completion, CorrectiveRequest, DrawerId, Endpoint, Outcome, StructuredError,
};
use remedy_events::{DrawerSignal, SignalBus, SignalKind, Subscription};
use remedy_handlers::HandlerRegistry;

use crate::config::RecoveryConfig;
use crate::failure::{RecoveryFailure, RouteError, UnroutableReason};
use crate::session::{InFlightRecovery, RecoveryState};
use crate::surface::{CorrectiveSurface, DrawerOpening};

/// How a drawer cycle ended, shared with errors coalesced into it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Verdict {
    Completed,
    Dismissed,
    Detached(Endpoint),
    Failed,
}

/// Verdicts of the drawers opened for one action so far, in cycle order.
type VerdictLog = Vec<Verdict>;
type VerdictRx = watch::Receiver<VerdictLog>;

enum Registration<'a> {
    Leader(SessionGuard<'a>),
    /// Joined while the drawer of `cycle` (0-based) was pending.
    Follower { verdicts: VerdictRx, cycle: usize },
}

/// Owns an action's recovery entry and removes it when the recovery ends.
struct SessionGuard<'a> {
    sessions: &'a Mutex<HashMap<ActionKey, VerdictRx>>,
    key: ActionKey,
    verdicts: watch::Sender<VerdictLog>,
}

impl SessionGuard<'_> {
    /// Record how the current cycle's drawer ended.
    fn conclude(&self, verdict: Verdict) {
        self.verdicts.send_modify(|log| log.push(verdict));
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        lock(self.sessions).remove(&self.key);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct DrawerProtocol<S, B> {
    registry: Arc<HandlerRegistry>,
    surface: S,
    bus: B,
    config: RecoveryConfig,
    sessions: Mutex<HashMap<ActionKey, VerdictRx>>,
}

impl<S, B> DrawerProtocol<S, B> {
    pub fn new(registry: Arc<HandlerRegistry>, surface: S, bus: B, config: RecoveryConfig) -> Self {
        Self {
            registry,
            surface,
            bus,
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Whether a recovery is in flight for `key`.
    pub fn is_recovering(&self, key: &ActionKey) -> bool {
        lock(&self.sessions).contains_key(key)
    }

    pub fn active_recoveries(&self) -> Vec<ActionKey> {
        lock(&self.sessions).keys().cloned().collect()
    }

    /// Resolve `error` to a corrective request without opening anything.
    pub fn route(&self, error: &StructuredError) -> Result<CorrectiveRequest, RouteError> {
        if error.domain().is_empty() {
            return Err(UnroutableReason::MissingDomain.into());
        }
        if error.code().is_empty() {
            return Err(UnroutableReason::MissingCode.into());
        }
        let handler = self
            .registry
            .lookup(error.domain())
            .map_err(|_| UnroutableReason::UnregisteredDomain(error.domain().clone()))?;
        let request = handler
            .resolve(error.code(), error.payload())
            .map_err(|reason| reason.in_domain(error.domain()))?;
        Ok(request)
    }

    fn register(&self, key: &ActionKey) -> Registration<'_> {
        let mut sessions = lock(&self.sessions);
        if let Some(verdicts) = sessions.get(key) {
            let cycle = verdicts.borrow().len();
            return Registration::Follower {
                verdicts: verdicts.clone(),
                cycle,
            };
        }
        let (verdicts, rx) = watch::channel(VerdictLog::new());
        sessions.insert(key.clone(), rx);
        Registration::Leader(SessionGuard {
            sessions: &self.sessions,
            key: key.clone(),
            verdicts,
        })
    }

    fn endpoint_for(&self, request: &CorrectiveRequest) -> Endpoint {
        match self.config.drawer_base_path() {
            Some(base) => request.endpoint().with_base(base),
            None => request.endpoint().clone(),
        }
    }
}

impl<S, B> DrawerProtocol<S, B>
where
    S: CorrectiveSurface,
    B: SignalBus<DrawerSignal>,
{
    /// Recover from `error`, raised by `action` under `key`, then replay it.
    ///
    /// Errors that cannot be routed fail immediately, even while another
    /// recovery for `key` is in flight. Returns the replayed action's value,
    /// or the terminal failure.
    pub async fn recover<T, E, F, Fut>(
        &self,
        key: &ActionKey,
        error: StructuredError,
        action: &F,
    ) -> Result<T, RecoveryFailure<E>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Outcome<T, E>>,
    {
        let request = match self.route(&error) {
            Ok(request) => request,
            Err(route_err) => {
                warn!(action = %key, error = %error, reason = %route_err, "cannot route error");
                return Err(route_err.into_failure(error));
            }
        };

        match self.register(key) {
            Registration::Leader(guard) => self.lead(&guard, error, request, action).await,
            Registration::Follower { verdicts, cycle } => {
                self.follow(key, error, verdicts, cycle, action).await
            }
        }
    }

    async fn lead<T, E, F, Fut>(
        &self,
        guard: &SessionGuard<'_>,
        original: StructuredError,
        first: CorrectiveRequest,
        action: &F,
    ) -> Result<T, RecoveryFailure<E>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Outcome<T, E>>,
    {
        let key = &guard.key;
        let mut session = InFlightRecovery::begin(key.clone(), original.clone());
        let max_cycles = self.config.max_recovery_cycles();
        let mut request = first;
        session.advance(RecoveryState::Dispatching);

        loop {
            let current = session.current();
            info!(
                action = %key,
                domain = %current.domain(),
                code = %current.code(),
                attempt = session.attempt(),
                "dispatching recoverable error"
            );

            let drawer_id = DrawerId::new();
            let endpoint = self.endpoint_for(&request);
            let opening = DrawerOpening::new(
                drawer_id,
                key.clone(),
                endpoint.clone(),
                request.completion_event().map(str::to_string),
            );
            session.attach(drawer_id, request.clone());

            // Subscribe before opening so a fast surface cannot outrun us.
            let mut subscription = self.bus.subscribe();
            if let Err(reason) = self.surface.open(&opening).await {
                subscription.unsubscribe();
                session.advance(RecoveryState::Aborted);
                guard.conclude(Verdict::Failed);
                warn!(action = %key, %drawer_id, %reason, "corrective surface failed to open");
                return Err(RecoveryFailure::SurfaceUnavailable {
                    error: original,
                    reason,
                });
            }
            session.advance(RecoveryState::AwaitingResolution);
            info!(action = %key, %drawer_id, %endpoint, "awaiting drawer resolution");

            let verdict = match request.completion() {
                Completion::Standalone => Verdict::Detached(endpoint),
                Completion::Event(event) => {
                    self.await_resolution(&mut subscription, drawer_id, event).await
                }
            };
            subscription.unsubscribe();
            guard.conclude(verdict.clone());

            match verdict {
                Verdict::Completed => {}
                Verdict::Detached(endpoint) => {
                    session.advance(RecoveryState::Resolved);
                    info!(action = %key, %drawer_id, "standalone surface opened; action not replayed");
                    return Err(RecoveryFailure::Detached {
                        error: original,
                        endpoint,
                    });
                }
                Verdict::Dismissed | Verdict::Failed => {
                    session.advance(RecoveryState::Aborted);
                    info!(action = %key, %drawer_id, "drawer dismissed; surfacing original error");
                    return Err(RecoveryFailure::Cancelled { error: original });
                }
            }

            session.advance(RecoveryState::Retrying);
            info!(action = %key, attempt = session.attempt(), "replaying action");
            let next = match action().await {
                Outcome::Success(value) => {
                    session.advance(RecoveryState::Resolved);
                    info!(action = %key, attempt = session.attempt(), "action recovered");
                    return Ok(value);
                }
                Outcome::Unrecoverable(err) => {
                    session.advance(RecoveryState::Aborted);
                    warn!(action = %key, "replayed action failed unrecoverably");
                    return Err(RecoveryFailure::Action(err));
                }
                Outcome::Recoverable(next) => next,
            };

            if session.attempt() >= max_cycles {
                session.advance(RecoveryState::Aborted);
                warn!(
                    action = %key,
                    error = %next,
                    attempts = session.attempt(),
                    "replayed action failed again; recovery exhausted"
                );
                return Err(RecoveryFailure::Exhausted {
                    error: original,
                    last: next,
                    attempts: session.attempt(),
                });
            }

            session.chain(next);
            session.advance(RecoveryState::Dispatching);
            request = match self.route(session.current()) {
                Ok(request) => request,
                Err(route_err) => {
                    session.advance(RecoveryState::Aborted);
                    guard.conclude(Verdict::Failed);
                    warn!(
                        action = %key,
                        error = %session.current(),
                        reason = %route_err,
                        "cannot route chained error"
                    );
                    return Err(RecoveryFailure::Exhausted {
                        error: original,
                        last: session.current().clone(),
                        attempts: session.attempt() - 1,
                    });
                }
            };
        }
    }

    /// Join the recovery already running for `key` at drawer `cycle`.
    async fn follow<T, E, F, Fut>(
        &self,
        key: &ActionKey,
        error: StructuredError,
        mut verdicts: VerdictRx,
        cycle: usize,
        action: &F,
    ) -> Result<T, RecoveryFailure<E>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Outcome<T, E>>,
    {
        info!(action = %key, error = %error, cycle, "coalescing error into active recovery");

        let reached = verdicts
            .wait_for(|log| log.len() > cycle)
            .await
            .ok()
            .and_then(|log| log.get(cycle).cloned());
        // The recovery ended before opening that drawer; go by its last one.
        let verdict = match reached {
            Some(verdict) => verdict,
            None => verdicts.borrow().last().cloned().unwrap_or(Verdict::Failed),
        };

        match verdict {
            Verdict::Completed => {}
            Verdict::Detached(endpoint) => return Err(RecoveryFailure::Detached { error, endpoint }),
            Verdict::Dismissed | Verdict::Failed => return Err(RecoveryFailure::Cancelled { error }),
        }

        match action().await {
            Outcome::Success(value) => Ok(value),
            Outcome::Unrecoverable(err) => Err(RecoveryFailure::Action(err)),
            Outcome::Recoverable(next) => Err(RecoveryFailure::Exhausted {
                error,
                last: next,
                attempts: 1,
            }),
        }
    }

    async fn await_resolution(
        &self,
        subscription: &mut Subscription<DrawerSignal>,
        drawer_id: DrawerId,
        completion: &str,
    ) -> Verdict {
        while let Some(signal) = subscription.recv().await {
            if signal.drawer_id() != drawer_id {
                continue;
            }
            match signal.kind() {
                SignalKind::Event(name) if name == completion => return Verdict::Completed,
                SignalKind::Event(name) => {
                    debug!(%drawer_id, event = %name, "ignoring unrelated drawer event")
                }
                SignalKind::Dismissed => return Verdict::Dismissed,
            }
        }
        warn!(%drawer_id, "signal bus closed while awaiting resolution; treating as dismissal");
        Verdict::Dismissed
    }
}

impl<S, B> core::fmt::Debug for DrawerProtocol<S, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DrawerProtocol")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("active", &self.active_recoveries())
            .finish()
    }
}
