//! Counter fixtures shared by the test suites.

use crate::TestError;

/// State folded by the counter reducers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterState {
    /// Current count
    pub count: i64,
}

impl CounterState {
    /// Create a state with the given count
    #[must_use]
    pub const fn new(count: i64) -> Self {
        Self { count }
    }
}

/// Actions understood by the counter reducers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAction {
    /// `count + 1`
    Increment,
    /// `count * 2`
    Double,
    /// `count * count`
    Square,
}

/// Infallible counter reducer (wrapping arithmetic)
#[must_use]
pub const fn counter_reducer(state: &CounterState, action: CounterAction) -> CounterState {
    let count = match action {
        CounterAction::Increment => state.count.wrapping_add(1),
        CounterAction::Double => state.count.wrapping_mul(2),
        CounterAction::Square => state.count.wrapping_mul(state.count),
    };
    CounterState { count }
}

/// Counter reducer that fails instead of overflowing
///
/// # Errors
///
/// Returns [`TestError::Overflow`] when the next count does not fit in an
/// `i64`.
pub fn fallible_counter_reducer(
    state: &CounterState,
    action: CounterAction,
) -> Result<CounterState, TestError> {
    let count = match action {
        CounterAction::Increment => state.count.checked_add(1),
        CounterAction::Double => state.count.checked_mul(2),
        CounterAction::Square => state.count.checked_mul(state.count),
    }
    .ok_or(TestError::Overflow { count: state.count, action })?;

    Ok(CounterState { count })
}
