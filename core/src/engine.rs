use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// Valid transitions:
/// - Idle -> Previewing -> Active
/// - Idle -> Active
/// - Active <-> Resolving, while pairs are in flight
/// - Previewing | Active | Resolving -> Ended
/// - any -> Idle or a fresh round, on restart
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    Idle,
    Previewing,
    Active,
    Resolving,
    Ended(Outcome),
}

impl EngineState {
    pub const fn accepts_taps(self) -> bool {
        matches!(self, Self::Active | Self::Resolving)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Ended(_))
    }
}

/// Counters of the current round.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub moves: u32,
    pub matches_found: u32,
    pub total_pairs: u32,
    pub score: u32,
    pub time_remaining: Seconds,
    /// Play time, preview excluded.
    pub elapsed: Seconds,
    /// Cleared exactly once, when the round is won or lost.
    pub active: bool,
}

impl RoundState {
    fn new(total_pairs: u32, time_remaining: Seconds) -> Self {
        Self {
            total_pairs,
            time_remaining,
            active: true,
            ..Default::default()
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Step {
    PreviewReveal,
    PreviewHide,
    PreviewEnd,
    Compare(usize, usize),
    Conceal(usize, usize),
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Continuation {
    round: u32,
    step: Step,
}

/// Turn-processing pipeline of a pairs round.
///
/// Taps queue cards, every two queued cards are dispatched as a pair whose resolution runs later
/// on the engine's own timeline. Several pairs may be in flight at once. Everything happens on the
/// thread that calls [`MatchEngine::tap`] and [`MatchEngine::advance`], continuations from a
/// superseded round are dropped by comparing round generations.
#[derive(Debug)]
pub struct MatchEngine<P> {
    bus: EventBus,
    progress: P,
    generator: Box<dyn PoolGenerator>,
    bounds: Bounds,
    config: Option<RoundConfig>,
    grid: Grid,
    state: EngineState,
    round: RoundState,
    timer: RoundTimer,
    pending: VecDeque<usize>,
    in_flight: BTreeSet<usize>,
    timeline: Timeline<Continuation>,
    generation: u32,
}

impl<P: ProgressStore> MatchEngine<P> {
    pub fn new(bus: EventBus, progress: P, bounds: Bounds, seed: u64) -> Self {
        Self::with_generator(bus, progress, bounds, ShuffledPoolGenerator::new(seed))
    }

    pub fn with_generator(
        bus: EventBus,
        progress: P,
        bounds: Bounds,
        generator: impl PoolGenerator + 'static,
    ) -> Self {
        Self {
            bus,
            progress,
            generator: Box::new(generator),
            bounds,
            config: None,
            grid: Grid::new(),
            state: EngineState::Idle,
            round: RoundState::default(),
            timer: RoundTimer::default(),
            pending: VecDeque::new(),
            in_flight: BTreeSet::new(),
            timeline: Timeline::new(),
            generation: 0,
        }
    }

    /// Hands the persistence collaborator back to the host.
    pub fn shutdown(mut self) -> P {
        self.teardown();
        log::debug!("Engine shut down");
        self.progress
    }

    pub fn state(&self) -> EngineState {
        match self.state {
            EngineState::Active if !self.in_flight.is_empty() => EngineState::Resolving,
            state => state,
        }
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn config(&self) -> Option<&RoundConfig> {
        self.config.as_ref()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn timer(&self) -> &RoundTimer {
        &self.timer
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Cards revealed and still waiting for a partner, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = usize> + '_ {
        self.pending.iter().copied()
    }

    /// Cards currently being resolved.
    pub fn in_flight(&self) -> impl Iterator<Item = usize> + '_ {
        self.in_flight.iter().copied()
    }

    /// Builds a new grid and begins a round with it. On error nothing about the current round
    /// changes.
    pub fn start_round(&mut self, config: RoundConfig) -> Result<()> {
        let mut grid = Grid::new();
        grid.generate(&config, self.bounds, self.generator.as_mut())?;

        self.teardown();
        self.grid = grid;
        self.round = RoundState::new(config.pair_count().into(), config.game_duration);
        self.timer = RoundTimer::from_config(&config);
        log::debug!(
            "Round {} started on level {}: {}x{}, {} pairs",
            self.generation,
            config.level,
            config.columns,
            config.rows,
            self.round.total_pairs
        );

        self.bus.publish(Event::RoundStarted(config.clone()));
        self.bus.publish(Event::MovesChanged(0));
        self.bus.publish(Event::ScoreChanged(0));
        self.bus.publish(Event::TimerChanged(self.timer.remaining()));

        if config.show_preview {
            self.state = EngineState::Previewing;
            self.grid.set_interactable(false);
            self.schedule(SETTLE_DELAY, Step::PreviewReveal);
        } else {
            self.state = EngineState::Active;
        }
        self.config = Some(config);
        Ok(())
    }

    /// Clears the grid and starts over with the same configuration. No-op without a round.
    pub fn restart_round(&mut self) -> Result<()> {
        let Some(config) = self.config.clone() else {
            return Ok(());
        };
        log::debug!("Restarting level {}", config.level);
        self.start_round(config)
    }

    /// Abandons the current round, if any, and goes back to idle.
    pub fn clear_round(&mut self) {
        self.teardown();
        self.config = None;
    }

    pub fn start_level(&mut self, catalog: &LevelCatalog, level: u32) -> Result<()> {
        let config = catalog.get(level).ok_or(GameError::UnknownLevel(level))?;
        if !self.progress.is_unlocked(level) {
            return Err(GameError::LevelLocked(level));
        }
        self.start_round(config.clone())?;
        self.progress.set_selected_level(level);
        Ok(())
    }

    pub fn start_selected(&mut self, catalog: &LevelCatalog) -> Result<()> {
        let level = self.progress.selected_level();
        self.start_level(catalog, level)
    }

    /// Moves on to the level after the current one when it exists and is unlocked. Returns whether
    /// a new round was started.
    pub fn advance_level(&mut self, catalog: &LevelCatalog) -> Result<bool> {
        let Some(current) = self.config.as_ref().map(|config| config.level) else {
            return Ok(false);
        };
        let Some(next) = catalog.next_after(current).map(|config| config.level) else {
            return Ok(false);
        };
        if !self.progress.is_unlocked(next) {
            return Ok(false);
        }
        self.start_level(catalog, next)?;
        Ok(true)
    }

    pub fn resize(&mut self, bounds: Bounds) -> Result<()> {
        self.grid.resize(bounds)?;
        self.bounds = bounds;
        Ok(())
    }

    /// Player input. Anything that cannot be acted upon right now is ignored rather than
    /// reported, late and duplicate taps are expected from an interactive front end.
    pub fn tap(&mut self, index: usize) -> TapOutcome {
        if !self.state.accepts_taps() {
            log::trace!("tap {} ignored in {:?}", index, self.state);
            return TapOutcome::Ignored;
        }
        let Some(card) = self.grid.card_mut(index) else {
            log::trace!("tap {} outside of the grid", index);
            return TapOutcome::Ignored;
        };
        if !card.can_be_tapped() || self.pending.contains(&index) || self.in_flight.contains(&index)
        {
            log::trace!("tap {} ignored, card is {:?}", index, card.state());
            return TapOutcome::Ignored;
        }

        card.reveal();
        self.pending.push_back(index);
        self.bus.publish(Event::CardFlipped(index));

        if self.dispatch_pending() > 0 {
            TapOutcome::Dispatched
        } else {
            TapOutcome::Queued
        }
    }

    /// Production tick, reads the frame delta off `ticker`.
    pub fn update<C: Clock>(&mut self, ticker: &mut Ticker<C>) {
        let dt = ticker.tick();
        self.advance(dt);
    }

    /// One scheduling tick of `dt` seconds: flips, timer, then due continuations.
    pub fn advance(&mut self, dt: Seconds) {
        let dt = if dt.is_finite() { dt.max(0.) } else { 0. };

        self.grid.advance(dt);

        if self.state.accepts_taps() {
            self.round.elapsed += dt;
            match self.timer.tick(dt) {
                TimerTick::Running(remaining) => {
                    self.round.time_remaining = remaining;
                    self.bus.publish(Event::TimerChanged(remaining));
                }
                TimerTick::Expired => {
                    self.round.time_remaining = 0.;
                    self.bus.publish(Event::TimerChanged(0.));
                    log::debug!("Time is up with {} pairs left", self.pairs_left());
                    self.end_round(false);
                }
                TimerTick::Disabled | TimerTick::Stopped => {}
            }
        }

        self.timeline.advance(dt);
        while let Some(continuation) = self.timeline.pop_due() {
            self.run(continuation);
        }

        if self.state.accepts_taps() {
            self.dispatch_pending();
        }
    }

    /// Decides the round. Only the first call has any effect.
    pub fn end_round(&mut self, won: bool) {
        if !self.round.active {
            return;
        }
        self.round.active = false;
        self.pending.clear();
        self.grid.set_interactable(false);

        let outcome = if won { Outcome::Won } else { Outcome::Lost };
        self.state = EngineState::Ended(outcome);
        log::debug!(
            "Round {} ended {:?} after {} moves",
            self.generation,
            outcome,
            self.round.moves
        );

        let Some(config) = self.config.as_ref() else {
            return;
        };
        if !won {
            self.bus.publish(Event::RoundLost);
            return;
        }

        let level = config.level;
        let scoring = config.scoring;
        let time_bonus = if self.timer.is_enabled() {
            // truncation floors the non-negative product
            (self.timer.remaining().max(0.) * scoring.time_bonus_per_second as f32) as u32
        } else {
            0
        };
        let moves_penalty = self.round.moves.saturating_mul(scoring.move_penalty);
        let score = self
            .round
            .score
            .saturating_add(time_bonus)
            .saturating_sub(moves_penalty);
        self.round.score = score;
        self.bus.publish(Event::ScoreChanged(score));

        let elapsed = self.round.elapsed;
        let high_score = self.progress.record_result(level, score, elapsed);
        if let Some(unlocked) = self.progress.complete_level(level) {
            self.bus.publish(Event::LevelUnlocked(unlocked));
        }
        if high_score {
            self.bus.publish(Event::HighScore { level, score });
        }
        self.bus.publish(Event::RoundWon(RoundSummary {
            moves: self.round.moves,
            elapsed,
            score,
        }));
    }

    pub fn snapshot(&self) -> Option<RoundSnapshot> {
        let config = self.config.as_ref()?;
        if !self.round.active {
            return None;
        }
        Some(RoundSnapshot {
            level: config.level,
            cards: self.grid.identities(),
            matched: self.grid.matched_indices(),
            moves: self.round.moves,
            score: self.round.score,
            time_remaining: self.timer.remaining(),
            elapsed: self.round.elapsed,
        })
    }

    /// Rebuilds the exact round described by `snapshot` and continues it without a preview.
    pub fn resume(&mut self, config: RoundConfig, snapshot: &RoundSnapshot) -> Result<()> {
        check_snapshot(&config, snapshot)?;
        let mut grid = Grid::new();
        grid.rebuild(&config, self.bounds, &snapshot.cards)?;
        grid.restore_matched(&snapshot.matched);

        self.teardown();
        self.grid = grid;
        self.round = RoundState {
            moves: snapshot.moves,
            matches_found: (snapshot.matched.len() / 2) as u32,
            total_pairs: config.pair_count().into(),
            score: snapshot.score,
            time_remaining: snapshot.time_remaining,
            elapsed: snapshot.elapsed,
            active: true,
        };
        self.timer = RoundTimer::from_config(&config);
        self.timer.set_remaining(snapshot.time_remaining);
        log::debug!(
            "Round {} resumed on level {} with {}/{} pairs",
            self.generation,
            config.level,
            self.round.matches_found,
            self.round.total_pairs
        );

        self.bus.publish(Event::RoundStarted(config.clone()));
        self.bus.publish(Event::MovesChanged(self.round.moves));
        self.bus.publish(Event::ScoreChanged(self.round.score));
        self.bus.publish(Event::TimerChanged(self.timer.remaining()));
        self.state = EngineState::Active;
        self.config = Some(config);
        Ok(())
    }

    fn pairs_left(&self) -> u32 {
        self.round.total_pairs - self.round.matches_found
    }

    /// Supersedes the current round: its continuations go stale and the grid is torn down.
    fn teardown(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending.clear();
        self.in_flight.clear();
        self.state = EngineState::Idle;
        self.round.active = false;
        if self.grid.clear() {
            self.bus.publish(Event::GridCleared);
        }
    }

    fn schedule(&mut self, delay: Seconds, step: Step) {
        let continuation = Continuation {
            round: self.generation,
            step,
        };
        self.timeline.schedule(delay, continuation);
    }

    /// Sends queued cards off two at a time, oldest first.
    fn dispatch_pending(&mut self) -> usize {
        let mut dispatched = 0;
        while self.pending.len() >= 2 {
            let (Some(first), Some(second)) = (self.pending.pop_front(), self.pending.pop_front())
            else {
                break;
            };
            self.in_flight.insert(first);
            self.in_flight.insert(second);
            self.round.moves = self.round.moves.saturating_add(1);
            self.bus.publish(Event::MovesChanged(self.round.moves));
            log::debug!("Pair ({}, {}) dispatched as move {}", first, second, self.round.moves);
            self.schedule(SETTLE_DELAY, Step::Compare(first, second));
            dispatched += 1;
        }
        dispatched
    }

    fn run(&mut self, continuation: Continuation) {
        if continuation.round != self.generation {
            log::trace!(
                "Discarding {:?} from superseded round {}",
                continuation.step,
                continuation.round
            );
            return;
        }

        match continuation.step {
            Step::PreviewReveal => {
                if self.state != EngineState::Previewing {
                    return;
                }
                log::debug!("Preview reveal");
                let bus = &mut self.bus;
                self.grid
                    .reveal_all(|index| bus.publish(Event::CardFlipped(index)));
                let duration = self.config.as_ref().map_or(0., |config| config.preview_duration);
                self.schedule(duration, Step::PreviewHide);
            }
            Step::PreviewHide => {
                if self.state != EngineState::Previewing {
                    return;
                }
                log::debug!("Preview hide");
                let bus = &mut self.bus;
                self.grid
                    .hide_all(|index| bus.publish(Event::CardFlipped(index)));
                self.schedule(SETTLE_DELAY, Step::PreviewEnd);
            }
            Step::PreviewEnd => {
                if self.state != EngineState::Previewing {
                    return;
                }
                log::debug!("Preview over, accepting taps");
                self.grid.set_interactable(true);
                self.state = EngineState::Active;
            }
            Step::Compare(first, second) => self.compare(first, second),
            Step::Conceal(first, second) => self.conceal(first, second),
        }
    }

    fn compare(&mut self, first: usize, second: usize) {
        let ids = (
            self.grid.card(first).map(Card::id),
            self.grid.card(second).map(Card::id),
        );
        let (Some(first_id), Some(second_id)) = ids else {
            self.in_flight.remove(&first);
            self.in_flight.remove(&second);
            return;
        };
        let decided = !self.round.active;

        if first_id != second_id {
            log::debug!("Mismatch at ({}, {})", first, second);
            if !decided {
                self.bus.publish(Event::Mismatched { first, second });
            }
            let delay = self.config.as_ref().map_or(0., |config| config.mismatch_delay);
            self.schedule(delay, Step::Conceal(first, second));
            return;
        }

        log::debug!("Match at ({}, {})", first, second);
        for index in [first, second] {
            if let Some(card) = self.grid.card_mut(index) {
                card.set_matched();
            }
            self.in_flight.remove(&index);
        }
        if decided {
            return;
        }

        self.bus.publish(Event::Matched { first, second });
        let points = self
            .config
            .as_ref()
            .map_or(0, |config| config.scoring.match_points);
        self.round.matches_found += 1;
        self.round.score = self.round.score.saturating_add(points);
        self.bus.publish(Event::ScoreChanged(self.round.score));

        if self.round.matches_found >= self.round.total_pairs {
            self.end_round(true);
        }
    }

    fn conceal(&mut self, first: usize, second: usize) {
        let decided = !self.round.active;
        for index in [first, second] {
            self.in_flight.remove(&index);
            let flipped = self.grid.card_mut(index).is_some_and(|card| card.hide());
            if flipped && !decided {
                self.bus.publish(Event::CardFlipped(index));
            }
        }
        if decided {
            return;
        }

        let penalty = self
            .config
            .as_ref()
            .map_or(0, |config| config.scoring.mismatch_penalty);
        self.round.score = self.round.score.saturating_sub(penalty);
        self.bus.publish(Event::ScoreChanged(self.round.score));
    }
}

/// Structural checks a snapshot must pass before it replaces the current round.
fn check_snapshot(config: &RoundConfig, snapshot: &RoundSnapshot) -> Result<()> {
    config.validate()?;
    if snapshot.level != config.level || snapshot.cards.len() != usize::from(config.total_cards()) {
        return Err(GameError::InvalidSnapshot);
    }

    let mut counts: BTreeMap<CardId, (usize, usize)> = BTreeMap::new();
    for &id in &snapshot.cards {
        counts.entry(id).or_default().0 += 1;
    }
    let mut seen = BTreeSet::new();
    for &index in &snapshot.matched {
        let Some(&id) = snapshot.cards.get(index) else {
            return Err(GameError::InvalidSnapshot);
        };
        if !seen.insert(index) {
            return Err(GameError::InvalidSnapshot);
        }
        counts.entry(id).or_default().1 += 1;
    }
    if counts
        .values()
        .any(|&(total, matched)| total % 2 != 0 || matched % 2 != 0)
    {
        return Err(GameError::InvalidSnapshot);
    }

    let unfinished = seen.len() < snapshot.cards.len();
    let time_left = !config.use_timer || snapshot.time_remaining > 0.;
    if !(unfinished && time_left) {
        return Err(GameError::InvalidSnapshot);
    }
    Ok(())
}
