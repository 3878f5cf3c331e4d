//! Hero typewriter: types a phrase, holds it, deletes it, moves on.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::Deserialize;

use crate::dom::DomNode;
use crate::scheduler::{SharedScheduler, StopHandle};

const DEFAULT_TYPE_SPEED_MS: u32 = 100;
const DEFAULT_DELETE_SPEED_MS: u32 = 50;
const DEFAULT_DELAY_BETWEEN_WORDS_MS: u32 = 500;
const DEFAULT_DELAY_BEFORE_DELETE_MS: u32 = 2000;

/// Upper bound (exclusive) of the random delay added to each keystroke.
pub const MAX_JITTER: Duration = Duration::from_millis(50);

/// Timing options in milliseconds. Zero means "use the default".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypewriterConfig {
    pub type_speed: u32,
    pub delete_speed: u32,
    pub delay_between_words: u32,
    pub delay_before_delete: u32,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            type_speed: DEFAULT_TYPE_SPEED_MS,
            delete_speed: DEFAULT_DELETE_SPEED_MS,
            delay_between_words: DEFAULT_DELAY_BETWEEN_WORDS_MS,
            delay_before_delete: DEFAULT_DELAY_BEFORE_DELETE_MS,
        }
    }
}

impl TypewriterConfig {
    pub fn type_speed(&self) -> Duration {
        millis_or(self.type_speed, DEFAULT_TYPE_SPEED_MS)
    }

    pub fn delete_speed(&self) -> Duration {
        millis_or(self.delete_speed, DEFAULT_DELETE_SPEED_MS)
    }

    pub fn delay_between_words(&self) -> Duration {
        millis_or(self.delay_between_words, DEFAULT_DELAY_BETWEEN_WORDS_MS)
    }

    pub fn delay_before_delete(&self) -> Duration {
        millis_or(self.delay_before_delete, DEFAULT_DELAY_BEFORE_DELETE_MS)
    }
}

fn millis_or(value: u32, default: u32) -> Duration {
    Duration::from_millis(u64::from(if value == 0 { default } else { value }))
}

/// Map a uniform sample in `[0, 1)` onto `[0, MAX_JITTER)`.
fn jitter(sample: f64) -> Duration {
    let sample = if sample.is_finite() { sample.clamp(0.0, 1.0) } else { 0.0 };
    MAX_JITTER.mul_f64(sample).min(MAX_JITTER.saturating_sub(Duration::from_nanos(1)))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypewriterPhase {
    Typing,
    Deleting,
}

/// The typing state machine. Each [`tick`](Typewriter::tick) performs one
/// keystroke and returns how long to wait before the next one.
#[derive(Clone, Debug)]
pub struct Typewriter {
    phrases: Vec<String>,
    config: TypewriterConfig,
    phrase_index: usize,
    text: String,
    /// Characters of the current phrase shown; `text` is that prefix.
    shown: usize,
    phase: TypewriterPhase,
}

impl Typewriter {
    /// Returns `None` for an empty phrase list: there is nothing to animate.
    pub fn new(phrases: Vec<String>, config: TypewriterConfig) -> Option<Self> {
        if phrases.is_empty() {
            return None;
        }
        Some(Self {
            phrases,
            config,
            phrase_index: 0,
            text: String::new(),
            shown: 0,
            phase: TypewriterPhase::Typing,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    pub fn current_phrase(&self) -> &str {
        &self.phrases[self.phrase_index]
    }

    /// Advance by one keystroke. `sample` is a uniform random number in
    /// `[0, 1)` used for the keystroke jitter.
    pub fn tick(&mut self, sample: f64) -> Duration {
        let phrase_len = self.current_phrase().chars().count();

        let base = match self.phase {
            TypewriterPhase::Deleting => {
                self.shown = self.shown.saturating_sub(1);
                self.config.delete_speed()
            }
            TypewriterPhase::Typing => {
                self.shown = (self.shown + 1).min(phrase_len);
                self.config.type_speed()
            }
        };
        self.text = self.current_phrase().chars().take(self.shown).collect();

        match self.phase {
            TypewriterPhase::Typing if self.shown == phrase_len => {
                self.phase = TypewriterPhase::Deleting;
                self.config.delay_before_delete()
            }
            TypewriterPhase::Deleting if self.shown == 0 => {
                self.phase = TypewriterPhase::Typing;
                self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
                self.config.delay_between_words()
            }
            _ => base + jitter(sample),
        }
    }
}

struct TypewriterLoop<E> {
    element: E,
    typewriter: Typewriter,
    random: Box<dyn FnMut() -> f64>,
}

/// Drives a [`Typewriter`] against a text element until stopped.
pub struct TypewriterEffect {
    stop: StopHandle,
}

impl TypewriterEffect {
    /// Start typing into `element`. The first keystroke happens immediately.
    pub fn start<E: DomNode>(
        element: E,
        typewriter: Typewriter,
        scheduler: SharedScheduler,
        random: impl FnMut() -> f64 + 'static,
    ) -> Self {
        let stop = StopHandle::new();
        let state = Rc::new(RefCell::new(TypewriterLoop {
            element,
            typewriter,
            random: Box::new(random),
        }));
        step(state, scheduler, stop.clone());
        Self { stop }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}

fn step<E: DomNode>(
    state: Rc<RefCell<TypewriterLoop<E>>>,
    scheduler: SharedScheduler,
    stop: StopHandle,
) {
    if stop.is_stopped() {
        return;
    }

    let delay = {
        let mut guard = state.borrow_mut();
        let looped = &mut *guard;
        let sample = (looped.random)();
        let delay = looped.typewriter.tick(sample);
        looped.element.set_text(looped.typewriter.text());
        delay
    };

    let next = scheduler.clone();
    scheduler.set_timeout(delay, Box::new(move || step(state, next, stop)));
}
