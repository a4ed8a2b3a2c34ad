//! Decision requests and their outcomes.
//!
//! A [`Pick`] is what a rules program holds between asking and awaiting: either
//! a real [`PickRequest`] addressed to one player, or `Nothing`, a placeholder
//! that keeps positions aligned in a [`group_picks`] call without asking
//! anyone anything.
//!
//! [`group_picks`]: crate::game::Game::group_picks

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::count::PickCount;

/// What a participant returns: `None` declines, `Some` proposes items.
pub type Answer = Option<Vec<String>>;

/// Extra validity check over a proposed answer.
pub type Condition = Arc<dyn Fn(&[String]) -> bool + Send + Sync>;

/// What the offered options name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickKind {
    /// Free-form choices ("Done", "Administrator", ...).
    Options,
    Cards,
    Locations,
}

/// One offer of options to one player.
#[derive(Clone)]
pub struct PickRequest {
    pub(crate) player: String,
    pub(crate) kind: PickKind,
    pub(crate) options: Vec<String>,
    pub(crate) count: PickCount,
    pub(crate) condition: Option<Condition>,
    pub(crate) rule: String,
}

impl PickRequest {
    /// Build a request, dropping repeated options.
    pub(crate) fn new<S: AsRef<str>>(player: &str, kind: PickKind, options: &[S], count: PickCount) -> Self {
        let mut seen = FxHashSet::default();
        let options = options
            .iter()
            .map(|o| o.as_ref())
            .filter(|o| seen.insert(*o))
            .map(str::to_string)
            .collect();

        Self {
            player: player.to_string(),
            kind,
            options,
            count,
            condition: None,
            rule: String::new(),
        }
    }

    #[must_use]
    pub fn player(&self) -> &str {
        &self.player
    }

    #[must_use]
    pub fn kind(&self) -> PickKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn count(&self) -> PickCount {
        self.count
    }

    /// Diagnostic tag naming the rule that raised this request.
    #[must_use]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Inclusive `(min, max)` answer length.
    #[must_use]
    pub fn bounds(&self) -> (usize, usize) {
        self.count.bounds(self.options.len())
    }

    /// Whether `items` would be accepted as an answer to this request.
    ///
    /// The length must fit the count, every item must be an offered option,
    /// no item may repeat, and the condition (if any) must hold.
    #[must_use]
    pub fn accepts(&self, items: &[String]) -> bool {
        if !self.count.admits(items.len(), self.options.len()) {
            return false;
        }

        let mut seen = FxHashSet::default();
        for item in items {
            if !self.options.contains(item) || !seen.insert(item.as_str()) {
                return false;
            }
        }

        self.condition.as_ref().map_or(true, |condition| condition(items))
    }

    /// Reconcile one participant answer against this request.
    #[must_use]
    pub fn reconcile(&self, answer: Option<&[String]>) -> PickOutcome {
        match answer {
            None => PickOutcome::Declined,
            Some(items) if self.accepts(items) => PickOutcome::Chosen(items.to_vec()),
            Some(_) => PickOutcome::Rejected,
        }
    }
}

impl fmt::Debug for PickRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickRequest")
            .field("player", &self.player)
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("count", &self.count)
            .field("conditional", &self.condition.is_some())
            .field("rule", &self.rule)
            .finish()
    }
}

/// A pending pick, not yet dispatched.
#[derive(Clone, Debug)]
pub enum Pick {
    Request(PickRequest),
    /// Resolves to [`PickOutcome::Declined`] without asking anyone.
    Nothing,
}

impl Pick {
    /// Attach a validity check over proposed answers.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Fn(&[String]) -> bool + Send + Sync + 'static) -> Self {
        if let Pick::Request(request) = &mut self {
            request.condition = Some(Arc::new(condition));
        }
        self
    }

    /// Tag the request with the rule that raised it.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        if let Pick::Request(request) = &mut self {
            request.rule = rule.into();
        }
        self
    }

    #[must_use]
    pub fn request(&self) -> Option<&PickRequest> {
        match self {
            Pick::Request(request) => Some(request),
            Pick::Nothing => None,
        }
    }
}

/// How a pick resolved.
///
/// `Declined` and `Rejected` are both "no answer" to the rules program; they
/// are kept apart so it can tell a deliberate pass from an unusable reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickOutcome {
    /// The participant's answer satisfied this request.
    Chosen(Vec<String>),
    /// The participant declined, timed out, or nothing was asked.
    Declined,
    /// The participant answered, but not acceptably for this request.
    Rejected,
}

impl PickOutcome {
    #[must_use]
    pub fn is_chosen(&self) -> bool {
        matches!(self, PickOutcome::Chosen(_))
    }

    #[must_use]
    pub fn choice(&self) -> Option<&[String]> {
        match self {
            PickOutcome::Chosen(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_choice(self) -> Option<Vec<String>> {
        match self {
            PickOutcome::Chosen(items) => Some(items),
            _ => None,
        }
    }
}
