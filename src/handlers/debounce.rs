use std::time::{Duration, Instant};

/// Identifies one scheduled firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token(u64);

/// Trailing-edge debounce driven by the event loop's clock.
///
/// Every `schedule` supersedes the pending token; `poll` hands a token out
/// once its delay has elapsed and never again.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    next_token: u64,
    pending: Option<(Token, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_token: 0,
            pending: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) -> Token {
        self.next_token += 1;
        let token = Token(self.next_token);
        self.pending = Some((token, now + self.delay));
        token
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn poll(&mut self, now: Instant) -> Option<Token> {
        match self.pending {
            Some((token, due)) if now >= due => {
                self.pending = None;
                Some(token)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(1000);

    #[test]
    fn fires_once_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        let token = debouncer.schedule(start);

        assert_eq!(debouncer.poll(start + Duration::from_millis(999)), None);
        assert_eq!(debouncer.poll(start + DELAY), Some(token));
        assert_eq!(debouncer.poll(start + DELAY * 2), None);
    }

    #[test]
    fn rescheduling_supersedes_previous_token() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        let first = debouncer.schedule(start);
        let second = debouncer.schedule(start + Duration::from_millis(600));

        assert_ne!(first, second);
        assert_eq!(debouncer.poll(start + DELAY), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(1600)),
            Some(second)
        );
    }

    #[test]
    fn cancel_drops_pending_run() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start);
        debouncer.cancel();

        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + DELAY), None);
    }
}
