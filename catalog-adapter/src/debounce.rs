/// Pause after the last keystroke before a search keyword is applied.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// An adapter-driven debouncer for search input.
///
/// The debouncer reads no clock. Adapters report each input with `on_input(text, now_ms)` and
/// call `tick(now_ms)` from their frame/timer loop; `tick` yields the latest text once no input
/// has arrived for `delay_ms`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordDebouncer {
    delay_ms: u64,
    pending: Option<Pending>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Pending {
    text: String,
    last_input_ms: u64,
}

impl Default for KeywordDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl KeywordDebouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Records new input text, restarting the pause.
    pub fn on_input(&mut self, text: impl Into<String>, now_ms: u64) {
        self.pending = Some(Pending {
            text: text.into(),
            last_input_ms: now_ms,
        });
    }

    /// Returns the pending text once the pause has elapsed.
    pub fn tick(&mut self, now_ms: u64) -> Option<String> {
        let due = self.deadline_ms()?;
        if now_ms < due {
            return None;
        }
        self.pending.take().map(|p| p.text)
    }

    /// Returns the pending text immediately (e.g. on Enter).
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|p| p.text)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.text.as_str())
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending text becomes due, if any.
    pub fn deadline_ms(&self) -> Option<u64> {
        self.pending
            .as_ref()
            .map(|p| p.last_input_ms.saturating_add(self.delay_ms))
    }
}
