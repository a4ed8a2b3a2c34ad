//! Batch formation, dispatch, and reconciliation.
//!
//! A batch moves through four steps:
//!
//! 1. **Collect**: picks are filed into the coordinator's queue without
//!    awaiting, and the filer then yields once. Every future polled in the
//!    same instant (the branches of one `tokio::join!`, say) files before any
//!    of them resumes, so their picks share a batch.
//! 2. **Dispatch**: the first filer to resume drains the queue, groups it by
//!    player in order of first appearance, and starts one task per player
//!    with all of that player's requests and a snapshot of the store.
//! 3. **Join**: answers are gathered as tasks finish, and every task must
//!    finish before anything resolves. The first decider error or panic
//!    aborts the tasks still running and fails the batch for every pick in it.
//! 4. **Reconcile**: each request is checked on its own against its player's
//!    single answer, and the outcome is sent back to the pick's filer.
//!
//! Batches never overlap: the gate is held from draining to reconciliation,
//! and picks filed meanwhile wait for the next batch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{MutexGuard, PoisonError};
use std::time::Duration;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::core::error::{GameError, Result};
use crate::entities::Store;

use super::decider::GameView;
use super::request::{Answer, Pick, PickOutcome, PickRequest};

type Ticket = oneshot::Receiver<Result<PickOutcome>>;

/// A request waiting in the queue, with the channel its outcome goes back on.
#[derive(Debug)]
struct Filed {
    request: PickRequest,
    reply: oneshot::Sender<Result<PickOutcome>>,
}

/// The requests of one player within a batch.
#[derive(Debug)]
struct Participant {
    player: String,
    slots: SmallVec<[usize; 4]>,
}

/// Drained requests, grouped for dispatch.
#[derive(Debug)]
struct Batch {
    id: u64,
    requests: Vec<PickRequest>,
    participants: Vec<Participant>,
}

impl Batch {
    fn collect(id: u64, requests: Vec<PickRequest>) -> Self {
        let mut index: FxHashMap<&str, usize> = FxHashMap::default();
        let mut participants: Vec<Participant> = Vec::new();

        for (slot, request) in requests.iter().enumerate() {
            let p = *index.entry(request.player.as_str()).or_insert_with(|| {
                participants.push(Participant {
                    player: request.player.clone(),
                    slots: SmallVec::new(),
                });
                participants.len() - 1
            });
            participants[p].slots.push(slot);
        }

        Self {
            id,
            requests,
            participants,
        }
    }

    fn requests_for(&self, participant: &Participant) -> Vec<PickRequest> {
        participant
            .slots
            .iter()
            .map(|&slot| self.requests[slot].clone())
            .collect()
    }

    fn reconcile(&self, answers: &[Answer]) -> Vec<PickOutcome> {
        let mut outcomes = vec![PickOutcome::Declined; self.requests.len()];

        for (participant, answer) in self.participants.iter().zip(answers) {
            for &slot in &participant.slots {
                let request = &self.requests[slot];
                let outcome = request.reconcile(answer.as_deref());
                if outcome == PickOutcome::Rejected {
                    tracing::debug!(
                        batch = self.id,
                        player = %participant.player,
                        rule = %request.rule,
                        ?answer,
                        "answer rejected"
                    );
                }
                outcomes[slot] = outcome;
            }
        }

        outcomes
    }
}

/// Decision tasks of one batch; unfinished tasks are aborted on drop.
struct DecisionTasks {
    handles: Vec<JoinHandle<()>>,
}

impl Drop for DecisionTasks {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

/// Runs batches of picks against the players' deciders.
#[derive(Debug, Default)]
pub struct Coordinator {
    queue: std::sync::Mutex<Vec<Filed>>,
    gate: Mutex<()>,
    next_batch: AtomicU64,
    decision_timeout: Option<Duration>,
}

enum Reported {
    Answer(anyhow::Result<Answer>),
    Unwound,
}

/// Sends a decision task's answer back to the batch, or `Unwound` if the
/// task panics or is dropped before answering.
struct Report {
    slot: usize,
    tx: mpsc::UnboundedSender<(usize, Reported)>,
    sent: bool,
}

impl Report {
    fn send(mut self, answer: anyhow::Result<Answer>) {
        self.sent = true;
        let _ = self.tx.send((self.slot, Reported::Answer(answer)));
    }
}

impl Drop for Report {
    fn drop(&mut self) {
        if !self.sent {
            let _ = self.tx.send((self.slot, Reported::Unwound));
        }
    }
}

impl Coordinator {
    #[must_use]
    pub fn new(decision_timeout: Option<Duration>) -> Self {
        Self {
            decision_timeout,
            ..Self::default()
        }
    }

    /// Number of batches dispatched so far.
    #[must_use]
    pub fn batches_dispatched(&self) -> u64 {
        self.next_batch.load(Ordering::Relaxed)
    }

    /// Resolve `picks`, returning one outcome per pick in order.
    ///
    /// The picks join whatever batch is forming: concurrent calls polled in
    /// the same instant are dispatched together, and each player is asked
    /// once for all of them. Must be called from within a tokio runtime.
    pub async fn resolve(&self, store: &Store, picks: Vec<Pick>) -> Result<Vec<PickOutcome>> {
        let tickets = self.file(picks);
        if tickets.iter().all(Option::is_none) {
            return Ok(vec![PickOutcome::Declined; tickets.len()]);
        }

        tokio::task::yield_now().await;
        self.flush(store).await;

        let mut outcomes = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let outcome = match ticket {
                Some(ticket) => ticket.await.map_err(|_| GameError::BatchAbandoned)??,
                None => PickOutcome::Declined,
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    fn queue(&self) -> MutexGuard<'_, Vec<Filed>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn file(&self, picks: Vec<Pick>) -> Vec<Option<Ticket>> {
        let mut queue = self.queue();
        picks
            .into_iter()
            .map(|pick| match pick {
                Pick::Request(request) => {
                    let (reply, ticket) = oneshot::channel();
                    queue.push(Filed { request, reply });
                    Some(ticket)
                }
                Pick::Nothing => None,
            })
            .collect()
    }

    fn drain(&self) -> Vec<Filed> {
        std::mem::take(&mut *self.queue())
    }

    /// Dispatch everything filed so far as one batch, if anything is left.
    async fn flush(&self, store: &Store) {
        let _gate = self.gate.lock().await;
        let filed = self.drain();
        if filed.is_empty() {
            return;
        }

        let (requests, replies): (Vec<_>, Vec<_>) = filed
            .into_iter()
            .map(|filed| (filed.request, filed.reply))
            .unzip();
        let id = self.next_batch.fetch_add(1, Ordering::Relaxed);
        let batch = Batch::collect(id, requests);
        let span = tracing::debug_span!("batch", id, players = batch.participants.len());

        let result = async {
            tracing::debug!(requests = batch.requests.len(), "dispatching batch");
            let answers = self.dispatch(store, &batch).await?;
            let outcomes = batch.reconcile(&answers);
            tracing::debug!(?outcomes, "batch reconciled");
            Ok::<_, GameError>(outcomes)
        }
        .instrument(span)
        .await;

        // A filer that stopped waiting has dropped its ticket; nothing to do.
        match result {
            Ok(outcomes) => {
                for (reply, outcome) in replies.into_iter().zip(outcomes) {
                    let _ = reply.send(Ok(outcome));
                }
            }
            Err(err) => {
                tracing::debug!(batch = id, error = %err, "batch failed");
                for reply in replies {
                    let _ = reply.send(Err(err.clone()));
                }
            }
        }
    }

    async fn dispatch(&self, store: &Store, batch: &Batch) -> Result<Vec<Answer>> {
        let view = GameView::new(store.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = DecisionTasks {
            handles: Vec::with_capacity(batch.participants.len()),
        };

        for (slot, participant) in batch.participants.iter().enumerate() {
            let decider = store.decider(&participant.player)?;
            let requests = batch.requests_for(participant);
            let view = view.clone();
            let timeout = self.decision_timeout;
            let report = Report {
                slot,
                tx: tx.clone(),
                sent: false,
            };
            let span = tracing::debug_span!("decide", player = %participant.player);

            let handle = tokio::spawn(
                async move {
                    let call = decider.decide(&view, &requests);
                    let answer = match timeout {
                        Some(limit) => match tokio::time::timeout(limit, call).await {
                            Ok(answer) => answer,
                            Err(_) => {
                                tracing::warn!(?limit, "decision timed out, treating as declined");
                                Ok(None)
                            }
                        },
                        None => call.await,
                    };
                    report.send(answer);
                }
                .instrument(span),
            );
            tasks.handles.push(handle);
        }
        drop(tx);

        let mut answers: Vec<Option<Answer>> = vec![None; batch.participants.len()];
        for _ in 0..batch.participants.len() {
            let (slot, reported) = match rx.recv().await {
                Some(message) => message,
                None => break,
            };
            let player = &batch.participants[slot].player;
            match reported {
                Reported::Answer(Ok(answer)) => answers[slot] = Some(answer),
                Reported::Answer(Err(source)) => return Err(GameError::decision(player.clone(), source)),
                Reported::Unwound => {
                    return Err(GameError::DecisionPanicked {
                        player: player.clone(),
                    })
                }
            }
        }

        answers
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(GameError::BatchAbandoned)
    }
}
