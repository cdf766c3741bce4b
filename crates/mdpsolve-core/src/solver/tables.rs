use std::{
    collections::HashMap,
    fmt::{self, Debug},
    hash::Hash,
};

use crate::solver::error::SolveError;

/// Dense, ordered index over a declared state space.
#[derive(Debug, Clone)]
pub struct StateIndex<S>
where
    S: Clone + Eq + Hash,
{
    states: Vec<S>,
    state_to_index: HashMap<S, usize>,
}

impl<S> StateIndex<S>
where
    S: Clone + Eq + Hash + Debug,
{
    /// Index `states` in declaration order, rejecting duplicates.
    pub fn from_states(states: &[S]) -> Result<Self, SolveError> {
        let mut state_to_index = HashMap::with_capacity(states.len());
        for (idx, state) in states.iter().enumerate() {
            if state_to_index.insert(state.clone(), idx).is_some() {
                return Err(SolveError::DuplicateState {
                    state: format!("{state:?}"),
                });
            }
        }

        Ok(Self {
            states: states.to_vec(),
            state_to_index,
        })
    }

    pub fn index_of(&self, state: &S) -> Option<usize> {
        self.state_to_index.get(state).copied()
    }

    /// Like `index_of`, but a state outside the space is an error.
    pub fn require(&self, state: &S) -> Result<usize, SolveError> {
        self.index_of(state)
            .ok_or_else(|| SolveError::unknown_state(state))
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.states.get(index)
    }

    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// State value function `V`, defined over the whole declared state space.
#[derive(Debug, Clone)]
pub struct ValueTable<S>
where
    S: Clone + Eq + Hash,
{
    index: StateIndex<S>,
    values: Vec<f64>,
}

impl<S> ValueTable<S>
where
    S: Clone + Eq + Hash + Debug,
{
    /// Table with every state set to `0.0`.
    pub fn zeros(index: StateIndex<S>) -> Self {
        let values = vec![0.0; index.len()];
        Self { index, values }
    }

    /// Value of `state`, or `None` if it is not a declared state.
    pub fn get(&self, state: &S) -> Option<f64> {
        self.index.index_of(state).map(|idx| self.values[idx])
    }

    /// Iterate `(state, value)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, f64)> + '_ {
        self.index.states().iter().zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arithmetic mean over all states.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    pub(crate) fn values(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }
}

/// A deterministic policy: one action per non-terminal state.
#[derive(Clone)]
pub struct Policy<S, A> {
    actions: HashMap<S, A>,
}

impl<S, A> Default for Policy<S, A> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }
}

impl<S, A> Policy<S, A>
where
    S: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `action` to `state`, returning the previous assignment.
    pub fn insert(&mut self, state: S, action: A) -> Option<A> {
        self.actions.insert(state, action)
    }

    pub fn get(&self, state: &S) -> Option<&A> {
        self.actions.get(state)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &A)> + '_ {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<S, A> FromIterator<(S, A)> for Policy<S, A>
where
    S: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (S, A)>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

impl<S, A> PartialEq for Policy<S, A>
where
    S: Eq + Hash,
    A: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.actions == other.actions
    }
}

impl<S: Debug, A: Debug> Debug for Policy<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.actions.iter()).finish()
    }
}

/// Action-value function `Q`.
///
/// Holds exactly one entry per (non-terminal state, legal action) pair; rows
/// keep the order in which the problem listed its legal actions.
#[derive(Debug, Clone)]
pub struct ActionValueTable<S, A> {
    states: Vec<S>,
    rows: HashMap<S, Vec<(A, f64)>>,
}

impl<S, A> ActionValueTable<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + PartialEq + Debug,
{
    /// Build a table from `(state, legal actions)` rows, seeding each entry
    /// with `init`.
    pub(crate) fn from_rows<I, F>(rows: I, mut init: F) -> Self
    where
        I: IntoIterator<Item = (S, Vec<A>)>,
        F: FnMut() -> f64,
    {
        let mut states = Vec::new();
        let mut table = HashMap::new();
        for (state, actions) in rows {
            let row = actions.into_iter().map(|action| (action, init())).collect();
            states.push(state.clone());
            table.insert(state, row);
        }
        Self {
            states,
            rows: table,
        }
    }

    /// Action value of `(state, action)`, or `None` outside the key set.
    pub fn get(&self, state: &S, action: &A) -> Option<f64> {
        self.rows
            .get(state)?
            .iter()
            .find(|(a, _)| a == action)
            .map(|(_, q)| *q)
    }

    /// Row of `(action, value)` for `state`.
    pub fn actions(&self, state: &S) -> Option<&[(A, f64)]> {
        self.rows.get(state).map(Vec::as_slice)
    }

    /// Highest-valued action at `state`; the first one listed wins ties.
    pub fn greedy_action(&self, state: &S) -> Option<&A> {
        first_max(self.rows.get(state)?.iter().map(|(a, q)| (a, *q))).map(|(a, _)| a)
    }

    /// `max_a Q(state, a)`.
    pub fn max_value(&self, state: &S) -> Option<f64> {
        first_max(self.rows.get(state)?.iter().map(|(a, q)| (a, *q))).map(|(_, q)| q)
    }

    /// Greedy policy over every state in the table.
    pub fn greedy_policy(&self) -> Policy<S, A> {
        self.states
            .iter()
            .filter_map(|s| self.greedy_action(s).map(|a| (s.clone(), a.clone())))
            .collect()
    }

    /// States that carry a row, in the order they were declared.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Number of (state, action) entries.
    pub fn len(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn value(&self, state: &S, action: &A) -> Result<f64, SolveError> {
        self.get(state, action)
            .ok_or_else(|| SolveError::missing_action_value(state, action))
    }

    pub(crate) fn value_mut(&mut self, state: &S, action: &A) -> Result<&mut f64, SolveError> {
        self.rows
            .get_mut(state)
            .and_then(|row| row.iter_mut().find(|(a, _)| a == action))
            .map(|(_, q)| q)
            .ok_or_else(|| SolveError::missing_action_value(state, action))
    }
}

/// Arg-max over `(item, value)` pairs keeping the first of equal maxima.
pub(crate) fn first_max<T>(pairs: impl IntoIterator<Item = (T, f64)>) -> Option<(T, f64)> {
    let mut best: Option<(T, f64)> = None;
    for (item, value) in pairs {
        best = match best {
            Some((best_item, best_value)) if best_value >= value => Some((best_item, best_value)),
            _ => Some((item, value)),
        };
    }
    best
}
