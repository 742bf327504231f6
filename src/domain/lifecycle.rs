use std::fmt::Display;

/// A status enum whose permitted transitions are given as a table.
///
/// Implementors only provide [`Lifecycle::next_states`]; every other check is
/// derived from that table so the rules live in exactly one place.
pub trait Lifecycle: Copy + Eq + Display + 'static {
    /// The statuses reachable from `self` in a single step.
    fn next_states(self) -> &'static [Self];

    fn can_transition_to(self, next: Self) -> bool {
        self.next_states().contains(&next)
    }

    /// True when no transition leaves this status.
    fn is_terminal(self) -> bool {
        self.next_states().is_empty()
    }
}
