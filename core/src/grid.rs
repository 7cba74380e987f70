use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;

/// The cards of a round, row-major, together with their layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    cards: Array2<Card>,
    layout: Option<CellLayout>,
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cards: empty_cards(),
            layout: None,
        }
    }

    /// Replaces the grid with a freshly generated one. On error the current grid is left untouched.
    pub fn generate(
        &mut self,
        config: &RoundConfig,
        bounds: Bounds,
        generator: &mut dyn PoolGenerator,
    ) -> Result<()> {
        config.validate()?;
        let layout = CellLayout::compute(config, bounds)?;
        let pool = generator.generate(&config.available_cards, config.pair_count().into())?;
        self.install(config, layout, &pool)
    }

    /// Replaces the grid with the given identities, in grid order.
    pub fn rebuild(&mut self, config: &RoundConfig, bounds: Bounds, ids: &[CardId]) -> Result<()> {
        config.validate()?;
        let layout = CellLayout::compute(config, bounds)?;
        if ids.len() != usize::from(config.total_cards()) {
            return Err(GameError::InvalidSnapshot);
        }
        self.install(config, layout, ids)
    }

    fn install(&mut self, config: &RoundConfig, layout: CellLayout, ids: &[CardId]) -> Result<()> {
        let (columns, rows) = config.size();
        let cards: Vec<Card> = ids
            .iter()
            .map(|&id| Card::new(id, config.flip_duration))
            .collect();
        self.cards = Array2::from_shape_vec((usize::from(rows), usize::from(columns)), cards)
            .map_err(|_| ConfigError::InvalidGridSize { columns, rows })?;
        self.layout = Some(layout);
        Ok(())
    }

    /// Recomputes the layout for a new container size, cards are untouched.
    pub fn resize(&mut self, bounds: Bounds) -> Result<()> {
        if let Some(layout) = self.layout {
            self.layout = Some(layout.refit(bounds)?);
        }
        Ok(())
    }

    /// Drops every card. Returns whether there was anything to clear.
    pub fn clear(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.cards = empty_cards();
        self.layout = None;
        true
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn columns(&self) -> Coord {
        self.layout.map_or(0, |layout| layout.columns)
    }

    pub fn layout(&self) -> Option<CellLayout> {
        self.layout
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        let pos = self.position(index)?;
        self.cards.get(pos.to_nd_index())
    }

    pub(crate) fn card_mut(&mut self, index: usize) -> Option<&mut Card> {
        let pos = self.position(index)?;
        self.cards.get_mut(pos.to_nd_index())
    }

    pub fn position(&self, index: usize) -> Option<Position> {
        (index < self.len()).then(|| Position::from_index(index, self.columns()))
    }

    /// Cards in row-major order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter()
    }

    pub fn identities(&self) -> Vec<CardId> {
        self.cards.iter().map(Card::id).collect()
    }

    /// Turns every card face up, bypassing tap gating. `on_flip` sees the index of every card
    /// that started a flip.
    pub fn reveal_all(&mut self, mut on_flip: impl FnMut(usize)) {
        for (index, card) in self.cards.iter_mut().enumerate() {
            if card.reveal() {
                on_flip(index);
            }
        }
    }

    /// Counterpart of [`Grid::reveal_all`].
    pub fn hide_all(&mut self, mut on_flip: impl FnMut(usize)) {
        for (index, card) in self.cards.iter_mut().enumerate() {
            if card.hide() {
                on_flip(index);
            }
        }
    }

    /// Matched cards stay non-interactable.
    pub fn set_interactable(&mut self, interactable: bool) {
        for card in self.cards.iter_mut() {
            card.set_interactable(interactable);
        }
    }

    pub fn advance(&mut self, dt: Seconds) {
        for card in self.cards.iter_mut() {
            card.advance(dt);
        }
    }

    pub fn matched_indices(&self) -> Vec<usize> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_matched())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_matched()).count()
    }

    /// Marks the given cards as matched, skipping indices outside the grid. Returns how many
    /// cards changed.
    pub fn restore_matched(&mut self, indices: &[usize]) -> usize {
        let mut restored = 0;
        for &index in indices {
            match self.card_mut(index) {
                Some(card) => {
                    if card.set_matched() {
                        restored += 1;
                    }
                }
                None => log::warn!("Ignoring matched index {} outside of the grid", index),
            }
        }
        restored
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_cards() -> Array2<Card> {
    Array2::from_shape_fn((0, 0), |_| Card::new(CardId(0), 0.))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const BOUNDS: Bounds = Bounds::new(800., 800.);

    fn grid(config: &RoundConfig) -> Grid {
        let mut grid = Grid::new();
        grid.generate(config, BOUNDS, &mut OrderedPoolGenerator).unwrap();
        grid
    }

    #[test]
    fn generate_builds_one_card_per_pool_entry() {
        let config = RoundConfig {
            columns: 4,
            rows: 2,
            ..Default::default()
        };
        let grid = grid(&config);

        assert_eq!(grid.len(), 8);
        assert_eq!(
            grid.identities(),
            [0, 0, 1, 1, 2, 2, 3, 3].map(CardId).to_vec()
        );
        assert_eq!(grid.position(6), Some(Position { row: 1, column: 2 }));
        assert_eq!(grid.card(6).map(Card::id), Some(CardId(3)));
        assert!(grid.card(8).is_none());
        assert!(grid.cards().all(|card| card.state() == CardState::Hidden));
    }

    #[test]
    fn failed_generate_keeps_previous_grid() {
        let mut grid = grid(&RoundConfig::default());
        let before = grid.clone();

        let bad = RoundConfig {
            available_cards: vec![],
            ..Default::default()
        };
        let err = grid.generate(&bad, BOUNDS, &mut OrderedPoolGenerator);
        assert_eq!(err, Err(GameError::Config(ConfigError::EmptyCardPool)));

        let err = grid.generate(
            &RoundConfig::default(),
            Bounds::new(10., 10.),
            &mut OrderedPoolGenerator,
        );
        assert!(matches!(err, Err(GameError::Layout { .. })));

        assert_eq!(grid, before);
    }

    #[test]
    fn broadcasts_reach_every_card() {
        let mut grid = grid(&RoundConfig::default());
        let mut flipped = vec![];

        grid.reveal_all(|index| flipped.push(index));
        assert_eq!(flipped.len(), 16);
        grid.advance(1.);
        assert!(grid.cards().all(|card| card.state() == CardState::Revealed));

        grid.hide_all(|_| {});
        grid.advance(1.);
        assert!(grid.cards().all(|card| card.state() == CardState::Hidden));
    }

    #[test]
    fn interactable_skips_matched_cards() {
        let mut grid = grid(&RoundConfig::default());
        grid.restore_matched(&[0, 1]);

        grid.set_interactable(false);
        assert!(grid.cards().all(|card| !card.is_interactable()));
        grid.set_interactable(true);
        assert!(!grid.card(0).unwrap().is_interactable());
        assert!(grid.card(2).unwrap().is_interactable());
    }

    #[test]
    fn matched_indices_track_restored_cards() {
        let mut grid = grid(&RoundConfig::default());

        assert_eq!(grid.restore_matched(&[3, 2, 99]), 2);
        assert_eq!(grid.matched_indices(), vec![2, 3]);
        assert_eq!(grid.matched_count(), 2);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut grid = grid(&RoundConfig::default());

        assert!(grid.clear());
        assert!(!grid.clear());
        assert!(grid.is_empty());
        assert_eq!(grid.layout(), None);
    }

    #[test]
    fn resize_keeps_cards() {
        let mut grid = grid(&RoundConfig::default());
        grid.restore_matched(&[0]);

        grid.resize(Bounds::new(470., 470.)).unwrap();
        assert_eq!(grid.layout().unwrap().cell_size, 100.);
        assert!(grid.card(0).unwrap().is_matched());
    }
}
