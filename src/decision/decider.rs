//! Asynchronous abstraction for sourcing player choices.
//!
//! Games bind one [`Decider`] to each player, so the same rules program can
//! run with human input, scripted fixtures, or AI policies.
use std::fmt;
use std::ops::Deref;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::rng::GameRng;
use crate::entities::Store;

use super::request::{Answer, PickRequest};

/// Read-only snapshot of the store handed to deciders.
///
/// Taken when a batch is dispatched; later changes to the live game are not
/// visible through it.
#[derive(Clone, Debug)]
pub struct GameView {
    store: Store,
}

impl GameView {
    pub(crate) fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Deref for GameView {
    type Target = Store;

    fn deref(&self) -> &Store {
        &self.store
    }
}

/// Answers a player's pending picks.
///
/// Called once per batch with every pick pending for that player, and
/// returns a single answer that is checked against each pick on its own.
/// Returning `None` declines all of them.
#[async_trait]
pub trait Decider: Send + Sync {
    async fn decide(&self, view: &GameView, picks: &[PickRequest]) -> anyhow::Result<Answer>;
}

/// Always declines. Useful for seats that never need to act.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeclineDecider;

#[async_trait]
impl Decider for DeclineDecider {
    async fn decide(&self, _view: &GameView, _picks: &[PickRequest]) -> anyhow::Result<Answer> {
        Ok(None)
    }
}

/// Adapts a synchronous closure into a [`Decider`].
pub struct FnDecider<F> {
    decide: F,
}

impl<F> FnDecider<F>
where
    F: Fn(&GameView, &[PickRequest]) -> Answer + Send + Sync,
{
    pub fn new(decide: F) -> Self {
        Self { decide }
    }
}

impl<F> fmt::Debug for FnDecider<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDecider").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> Decider for FnDecider<F>
where
    F: Fn(&GameView, &[PickRequest]) -> Answer + Send + Sync,
{
    async fn decide(&self, view: &GameView, picks: &[PickRequest]) -> anyhow::Result<Answer> {
        Ok((self.decide)(view, picks))
    }
}

/// Fallback AI: answers one pending pick, chosen uniformly, with a random
/// admissible selection of its options.
///
/// Draws from its own RNG stream so it never disturbs the engine's sequence.
#[derive(Debug)]
pub struct RandomDecider {
    rng: Mutex<GameRng>,
}

impl RandomDecider {
    const ATTEMPTS: usize = 8;

    pub fn new(rng: GameRng) -> Self {
        Self { rng: Mutex::new(rng) }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(GameRng::new(seed))
    }

    fn sample(rng: &mut GameRng, picks: &[PickRequest]) -> Answer {
        let pick = rng.choose(picks)?;
        let (min, max) = pick.bounds();
        let max = max.min(pick.options().len());
        if min > max {
            return None;
        }

        for _ in 0..Self::ATTEMPTS {
            let size = rng.random_int(min as i64, max as i64 + 1) as usize;
            let choice = rng.random_sample(pick.options(), size);
            if pick.accepts(&choice) {
                return Some(choice);
            }
        }
        None
    }
}

#[async_trait]
impl Decider for RandomDecider {
    async fn decide(&self, _view: &GameView, picks: &[PickRequest]) -> anyhow::Result<Answer> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow::anyhow!("random decider RNG poisoned"))?;
        Ok(Self::sample(&mut rng, picks))
    }
}
