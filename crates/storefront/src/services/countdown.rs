//! Confirmation page countdown.
//!
//! The countdown is a stream: it yields the seconds remaining once per second
//! and finishes with a single navigation event. Dropping the stream cancels
//! it, so nothing fires after the consumer has gone away.

use std::time::Duration;

use futures::Stream;

/// Where the countdown navigates when it reaches zero.
pub const HOME_PATH: &str = "/";

const TICK: Duration = Duration::from_secs(1);

/// One countdown event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// Seconds left before navigating.
    Tick(u64),
    /// Navigate to the given path. Always the last event.
    Navigate(&'static str),
}

enum Phase {
    Start(u64),
    Next(u64),
    Done,
}

/// Count down from `seconds`, one event per second, ending in
/// [`CountdownEvent::Navigate`] to [`HOME_PATH`].
///
/// `countdown(3)` yields `Tick(3)` immediately, then `Tick(2)`, `Tick(1)`,
/// and `Navigate("/")` a second apart.
pub fn countdown(seconds: u64) -> impl Stream<Item = CountdownEvent> {
    futures::stream::unfold(Phase::Start(seconds), |phase| async move {
        let remaining = match phase {
            Phase::Start(remaining) => remaining,
            Phase::Next(remaining) => {
                tokio::time::sleep(TICK).await;
                remaining
            }
            Phase::Done => return None,
        };

        if remaining == 0 {
            Some((CountdownEvent::Navigate(HOME_PATH), Phase::Done))
        } else {
            Some((CountdownEvent::Tick(remaining), Phase::Next(remaining - 1)))
        }
    })
}
