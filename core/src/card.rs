use serde::{Deserialize, Serialize};

use crate::*;

/// Float slack when deciding a flip has reached its end.
const FLIP_EPSILON: f32 = 1e-4;

/// Valid transitions:
/// - Hidden -> Revealing -> Revealed
/// - Revealed -> Hiding -> Hidden
/// - Revealing <-> Hiding, when a flip is restarted mid-way
/// - any -> Matched, which is terminal
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
    Hidden,
    Revealing,
    Revealed,
    Hiding,
    Matched,
}

impl CardState {
    pub const fn is_transitioning(self) -> bool {
        matches!(self, Self::Revealing | Self::Hiding)
    }

    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Matched)
    }
}

impl Default for CardState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One grid cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Card {
    id: CardId,
    state: CardState,
    interactable: bool,
    /// Visual flip progress, 0 is face down and 1 face up.
    face: f32,
    flip_duration: Seconds,
}

impl Card {
    pub fn new(id: CardId, flip_duration: Seconds) -> Self {
        Self {
            id,
            state: CardState::Hidden,
            interactable: true,
            face: 0.,
            flip_duration,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    pub fn face(&self) -> f32 {
        self.face
    }

    pub fn is_matched(&self) -> bool {
        self.state.is_matched()
    }

    pub fn is_interactable(&self) -> bool {
        self.interactable
    }

    /// Whether a tap on this card may be accepted.
    pub fn can_be_tapped(&self) -> bool {
        self.interactable && matches!(self.state, CardState::Hidden)
    }

    /// Starts turning face up, continuing from the current flip progress. Returns whether a flip
    /// was started, which is always the case unless the card is matched.
    pub fn reveal(&mut self) -> bool {
        self.start_flip(CardState::Revealing)
    }

    /// Starts turning face down, see [`Card::reveal`].
    pub fn hide(&mut self) -> bool {
        self.start_flip(CardState::Hiding)
    }

    pub fn set_matched(&mut self) -> bool {
        if self.is_matched() {
            return false;
        }
        self.state = CardState::Matched;
        self.face = 1.;
        self.interactable = false;
        true
    }

    pub fn set_interactable(&mut self, interactable: bool) {
        self.interactable = interactable && !self.is_matched();
    }

    /// Moves an in-flight flip forward, returning the resting state it reached, if any.
    pub fn advance(&mut self, dt: Seconds) -> Option<CardState> {
        let step = if self.flip_duration > 0. {
            dt / self.flip_duration
        } else {
            1.
        };

        match self.state {
            CardState::Revealing => {
                self.face = (self.face + step).min(1.);
                if self.face >= 1. - FLIP_EPSILON {
                    self.face = 1.;
                    self.state = CardState::Revealed;
                    return Some(self.state);
                }
            }
            CardState::Hiding => {
                self.face = (self.face - step).max(0.);
                if self.face <= FLIP_EPSILON {
                    self.face = 0.;
                    self.state = CardState::Hidden;
                    return Some(self.state);
                }
            }
            CardState::Hidden | CardState::Revealed | CardState::Matched => {}
        }
        None
    }

    fn start_flip(&mut self, transition: CardState) -> bool {
        if self.is_matched() {
            return false;
        }
        self.state = transition;
        if self.flip_duration <= 0. {
            self.advance(0.);
        }
        true
    }
}
