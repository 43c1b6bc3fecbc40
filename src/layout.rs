//! Pagination: stacking story frames onto spreads.
//!
//! Blocks are placed in document order. A block goes on the active spread if
//! its estimated height fits under the frames already there; otherwise a new
//! spread with a fresh page is opened first. Blocks are never split and never
//! moved once placed.

use log::{debug, warn};

use crate::config::FormatterConfig;
use crate::error::{Error, Result};
use crate::estimate::HeightEstimator;
use crate::geometry::PageGeometry;
use crate::package::{FrameLayout, PageAttributes, Spread, SpreadAttributes, StoryContent};

/// Per-kind id counters for one formatting call.
///
/// Ids are `<kind>_<n>` and never reused within a package. Each call owns
/// its own counters, so concurrent calls share nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counters {
    pub spread: usize,
    pub page: usize,
    pub story: usize,
    pub textframe: usize,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_spread_id(&mut self) -> String {
        next_id("spread", &mut self.spread)
    }

    pub fn next_page_id(&mut self) -> String {
        next_id("page", &mut self.page)
    }

    pub fn next_story_id(&mut self) -> String {
        next_id("story", &mut self.story)
    }

    pub fn next_textframe_id(&mut self) -> String {
        next_id("textframe", &mut self.textframe)
    }
}

fn next_id(kind: &str, counter: &mut usize) -> String {
    let id = format!("{kind}_{counter}");
    *counter += 1;
    id
}

/// Where the paginator stands with respect to its active spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    NoActiveSpread,
    HasActiveSpreadWithCapacity,
    /// The last block did not fit; a new spread opens before placing it.
    HasActiveSpreadFull,
}

/// What to do with the next block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Place on the active spread.
    Place,
    /// Open a new spread, then place.
    NewSpread,
    /// The block does not fit even on an empty page. It is placed anyway.
    Oversized,
}

/// Drives placement of stories onto spreads.
pub struct Paginator<'a> {
    page: PageGeometry,
    layout: FrameLayout,
    estimator: HeightEstimator,
    counters: &'a mut Counters,
    spreads: Vec<Spread>,
    state: PaginationState,
}

impl<'a> Paginator<'a> {
    pub fn new(config: &FormatterConfig, counters: &'a mut Counters) -> Self {
        Self {
            page: config.page,
            layout: FrameLayout {
                vertical_margin: config.vertical_margin,
                min_frame_height: config.min_frame_height,
            },
            estimator: HeightEstimator::new(config.page.inner_width())
                .with_table_height(config.table_height),
            counters,
            spreads: Vec::new(),
            state: PaginationState::NoActiveSpread,
        }
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    pub fn spreads(&self) -> &[Spread] {
        &self.spreads
    }

    /// Decide how a block of `height` will be placed, without placing it.
    pub fn decide(&self, height: f64) -> Result<Placement> {
        match (self.state, self.spreads.last()) {
            (PaginationState::HasActiveSpreadWithCapacity, Some(active)) => {
                if active.check_if_fits(height)? {
                    Ok(Placement::Place)
                } else if active.is_empty() {
                    Ok(Placement::Oversized)
                } else {
                    Ok(Placement::NewSpread)
                }
            }
            _ => Ok(Placement::NewSpread),
        }
    }

    /// Place one story on the active spread, opening a new spread first if
    /// needed. Returns the frame's height.
    pub fn place(&mut self, story: &dyn StoryContent) -> Result<f64> {
        let height = story.estimate_height(&self.estimator);

        let mut decision = self.decide(height)?;
        if decision == Placement::NewSpread {
            if self.state == PaginationState::HasActiveSpreadWithCapacity {
                self.state = PaginationState::HasActiveSpreadFull;
            }
            self.open_spread();
            decision = self.decide(height)?;
        }

        let frame_id = self.counters.next_textframe_id();
        let spread = self.active_spread()?;
        let spread_id = spread.self_id().to_string();

        if decision == Placement::Oversized {
            warn!(
                "{} is {height:.1}pt tall and does not fit on an empty page; placing it on {spread_id} anyway",
                story.self_id(),
            );
        }

        let frame = spread.place_text_frame(frame_id, story.self_id(), height)?;
        debug!(
            "placed {} on {spread_id} as {} at {} (height {:.1})",
            frame.parent_story, frame.self_id, frame.transform, frame.height
        );
        Ok(frame.height)
    }

    fn active_spread(&mut self) -> Result<&mut Spread> {
        self.spreads
            .last_mut()
            .ok_or_else(|| Error::StructuralPrecondition("no active spread to place on".into()))
    }

    fn open_spread(&mut self) {
        let mut spread = Spread::new(
            self.counters.next_spread_id(),
            self.page.width,
            self.page.height,
            self.layout,
            &SpreadAttributes::default(),
        );
        spread.add_page(
            self.counters.next_page_id(),
            self.page.margins,
            &PageAttributes::default(),
        );
        debug!("opened {}", spread.self_id());

        self.spreads.push(spread);
        self.state = PaginationState::HasActiveSpreadWithCapacity;
    }

    /// Finish pagination. A package always has at least one spread, even for
    /// an article without blocks.
    pub fn finish(mut self) -> Vec<Spread> {
        if self.spreads.is_empty() {
            self.open_spread();
        }
        self.spreads
    }
}

/// Lay out `stories` in order and return the spreads they were placed on.
pub fn paginate(
    stories: &[&dyn StoryContent],
    config: &FormatterConfig,
    counters: &mut Counters,
) -> Result<Vec<Spread>> {
    let mut paginator = Paginator::new(config, counters);
    for story in stories {
        paginator.place(*story)?;
    }
    Ok(paginator.finish())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;

    /// A story with a fixed estimated height.
    struct Fixed {
        id: String,
        height: f64,
    }

    impl StoryContent for Fixed {
        fn self_id(&self) -> &str {
            &self.id
        }

        fn length(&self) -> Result<usize> {
            Ok(0)
        }

        fn estimate_height(&self, _: &HeightEstimator) -> f64 {
            self.height
        }
    }

    fn fixed(heights: &[f64]) -> Vec<Fixed> {
        heights
            .iter()
            .enumerate()
            .map(|(i, &height)| Fixed {
                id: format!("story_{i}"),
                height,
            })
            .collect()
    }

    fn run(stories: &[Fixed]) -> Vec<Spread> {
        let refs: Vec<&dyn StoryContent> = stories.iter().map(|s| s as &dyn StoryContent).collect();
        paginate(&refs, &FormatterConfig::default(), &mut Counters::new()).unwrap()
    }

    #[test]
    fn test_counters_are_per_kind() {
        let mut counters = Counters::new();
        assert_eq!(counters.next_story_id(), "story_0");
        assert_eq!(counters.next_story_id(), "story_1");
        assert_eq!(counters.next_spread_id(), "spread_0");
        assert_eq!(counters.next_textframe_id(), "textframe_0");
        assert_eq!(counters.next_page_id(), "page_0");
    }

    #[test]
    fn test_single_block_single_spread() {
        let spreads = run(&fixed(&[22.0]));
        assert_eq!(spreads.len(), 1);
        assert!(spreads[0].has_page());
        assert_eq!(spreads[0].frames().len(), 1);
        assert_eq!(spreads[0].frames()[0].height, 22.0);
    }

    #[test]
    fn test_overflow_opens_new_spread() {
        // Four 140pt frames fit an A4 page with 50pt margins.
        let spreads = run(&fixed(&[140.0; 6]));
        assert_eq!(spreads.len(), 2);
        assert_eq!(spreads[0].frames().len(), 4);
        assert_eq!(spreads[1].frames().len(), 2);
        assert_eq!(spreads[1].self_id(), "spread_1");
        assert_eq!(spreads[1].page().unwrap().self_id, "page_1");
        assert_eq!(spreads[1].frames()[0].self_id, "textframe_4");
        assert_eq!(spreads[1].frames()[0].parent_story, "story_4");
    }

    #[test]
    fn test_oversized_block_does_not_loop() {
        let spreads = run(&fixed(&[2000.0, 10.0, 3000.0]));
        assert_eq!(spreads.len(), 3);
        assert!(spreads.iter().all(|s| s.frames().len() == 1));
        assert_eq!(spreads[0].frames()[0].height, 2000.0);
        assert_eq!(spreads[2].frames()[0].parent_story, "story_2");
    }

    #[test]
    fn test_empty_input_still_has_a_spread() {
        let spreads = run(&[]);
        assert_eq!(spreads.len(), 1);
        assert!(spreads[0].is_empty());
    }

    #[test]
    fn test_state_transitions() {
        let mut counters = Counters::new();
        let config = FormatterConfig::default();
        let mut paginator = Paginator::new(&config, &mut counters);
        assert_eq!(paginator.state(), PaginationState::NoActiveSpread);
        assert_eq!(paginator.decide(10.0).unwrap(), Placement::NewSpread);

        let tall = fixed(&[700.0, 700.0]);
        paginator.place(&tall[0]).unwrap();
        assert_eq!(paginator.state(), PaginationState::HasActiveSpreadWithCapacity);
        assert_eq!(paginator.decide(700.0).unwrap(), Placement::NewSpread);
        paginator.place(&tall[1]).unwrap();
        assert_eq!(paginator.spreads().len(), 2);
    }

    proptest! {
        #[test]
        fn prop_every_story_placed_exactly_once(heights in prop::collection::vec(1.0f64..900.0, 0..40)) {
            let stories = fixed(&heights);
            let spreads = run(&stories);

            let mut seen: HashMap<&str, usize> = HashMap::new();
            for frame in spreads.iter().flat_map(|s| s.frames()) {
                *seen.entry(frame.parent_story.as_str()).or_default() += 1;
            }
            prop_assert_eq!(seen.len(), stories.len());
            prop_assert!(seen.values().all(|&n| n == 1));

            // Document order is kept across spreads.
            let order: Vec<&str> = spreads
                .iter()
                .flat_map(|s| s.frames())
                .map(|f| f.parent_story.as_str())
                .collect();
            let expected: Vec<&str> = stories.iter().map(|s| s.id.as_str()).collect();
            prop_assert_eq!(order, expected);
        }
    }
}
