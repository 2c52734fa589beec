use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Verdict reported by [`Automaton::finalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The machine halted in an accepting state.
    Accepted,
    /// The machine is in a defined state that is not accepting.
    NotAccepting,
    /// An undefined transition was taken at some point; the machine is stuck
    /// in the absorbing error condition.
    Invalid,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// A small deterministic finite automaton.
///
/// The transition table is partial: a missing `(state, input)` pair is legal
/// and means "no transition". Feeding an input with no defined transition
/// drops the machine into an absorbing error condition that no later input
/// can leave. Failure is deliberately not reported at `advance` time —
/// callers feed a short fixed input sequence and only inspect the verdict at
/// the end.
///
/// No validation of reachability or completeness is performed when building;
/// unreachable states and missing transitions simply behave as errors at
/// runtime.
pub struct Automaton<S, I> {
    transitions: HashMap<(S, I), S>,
    accepting: HashSet<S>,
    current: S,
    valid: bool,
}

impl<S, I> Automaton<S, I>
where
    S: Copy + Eq + Hash,
    I: Copy + Eq + Hash,
{
    pub fn new(
        transitions: HashMap<(S, I), S>,
        initial: S,
        accepting: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            transitions,
            accepting: accepting.into_iter().collect(),
            current: initial,
            valid: true,
        }
    }

    /// Consume one input. A no-op once the machine has become invalid.
    pub fn advance(&mut self, input: I) {
        if !self.valid {
            return;
        }
        match self.transitions.get(&(self.current, input)) {
            Some(&next) => self.current = next,
            None => self.valid = false,
        }
    }

    pub fn is_accepting(&self) -> bool {
        self.valid && self.accepting.contains(&self.current)
    }

    /// Report the current state and the final verdict.
    ///
    /// The state is returned even when the verdict is [`Verdict::Invalid`];
    /// in that case it names the last defined state the machine occupied.
    /// Idempotent: repeated calls return the same answer.
    pub fn finalize(&self) -> (S, Verdict) {
        let verdict = if !self.valid {
            Verdict::Invalid
        } else if self.accepting.contains(&self.current) {
            Verdict::Accepted
        } else {
            Verdict::NotAccepting
        };
        (self.current, verdict)
    }
}
