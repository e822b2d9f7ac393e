//! Carousel selection state.
//!
//! The carousel shows one title card at a time. Left/Right start a slide towards the
//! previous/next card; [`Carousel::update`] advances the slide by elapsed time at a fixed
//! speed until it has covered one image width (the width of the outgoing card), at which
//! point the carousel is idle on the new card. Indices wrap, so the list behaves as a ring.
//!
//! The state is independent of any rendering toolkit: [`Carousel::placements`] reports
//! where each visible card sits relative to its centred position and the UI maps that
//! onto pixels.

use std::time::Duration;

/// Direction of a slide, named after the key that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    /// Towards the previous card; content moves right
    Left,
    /// Towards the next card; content moves left
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselPhase {
    Idle,
    SlidingLeft,
    SlidingRight,
}

/// A card to draw and its horizontal displacement from the centre of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPlacement {
    pub index: usize,
    pub shift: f32,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    len: usize,
    current_index: usize,
    target_index: usize,
    direction: Option<SlideDirection>,
    offset: f32,
    card_widths: Vec<f32>,
    slide_width: f32,
    speed: f32,
}

impl Carousel {
    /// Create a carousel over `len` cards that are all `card_width` wide.
    ///
    /// `speed` is in the same units as `card_width`, per second.
    pub fn new(len: usize, card_width: f32, speed: f32) -> Self {
        Self::with_card_widths(vec![card_width; len], speed)
    }

    /// Create a carousel over cards of differing widths.
    ///
    /// Each slide travels the width of the card it leaves.
    pub fn with_card_widths(card_widths: Vec<f32>, speed: f32) -> Self {
        Self {
            len: card_widths.len(),
            current_index: 0,
            target_index: 0,
            direction: None,
            offset: 0.0,
            slide_width: card_widths.first().copied().unwrap_or(0.0),
            card_widths,
            speed,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Card fully shown when idle, or the outgoing card during a slide.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Card the carousel is on or moving to. This is the one Return launches.
    pub fn selected_index(&self) -> usize {
        self.target_index
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Distance the current (or next) slide travels.
    pub fn slide_width(&self) -> f32 {
        self.slide_width
    }

    pub fn phase(&self) -> CarouselPhase {
        match self.direction {
            None => CarouselPhase::Idle,
            Some(SlideDirection::Left) => CarouselPhase::SlidingLeft,
            Some(SlideDirection::Right) => CarouselPhase::SlidingRight,
        }
    }

    pub fn is_sliding(&self) -> bool {
        self.direction.is_some()
    }

    pub fn shift_left(&mut self) {
        self.start_slide(SlideDirection::Left);
    }

    pub fn shift_right(&mut self) {
        self.start_slide(SlideDirection::Right);
    }

    /// Advance an in-flight slide by `dt`.
    pub fn update(&mut self, dt: Duration) {
        if self.direction.is_none() {
            return;
        }

        self.offset += self.speed * dt.as_secs_f32();
        if self.offset >= self.slide_width || self.speed <= 0.0 || !self.offset.is_finite() {
            self.finish_slide();
        }
    }

    /// Cards to draw this frame: the current one, plus the incoming one while sliding.
    pub fn placements(&self) -> Vec<CardPlacement> {
        if self.is_empty() {
            return Vec::new();
        }

        match self.direction {
            None => vec![CardPlacement {
                index: self.current_index,
                shift: 0.0,
            }],
            Some(direction) => {
                let sign = match direction {
                    SlideDirection::Left => 1.0,
                    SlideDirection::Right => -1.0,
                };
                vec![
                    CardPlacement {
                        index: self.current_index,
                        shift: sign * self.offset,
                    },
                    CardPlacement {
                        index: self.target_index,
                        shift: -sign * (self.slide_width - self.offset),
                    },
                ]
            }
        }
    }

    fn start_slide(&mut self, direction: SlideDirection) {
        if self.is_empty() {
            return;
        }

        // A second key press during a slide lands the first slide immediately
        if self.is_sliding() {
            self.finish_slide();
        }

        let target = match direction {
            SlideDirection::Left => (self.current_index + self.len - 1) % self.len,
            SlideDirection::Right => (self.current_index + 1) % self.len,
        };

        if target == self.current_index {
            return;
        }

        self.target_index = target;
        self.direction = Some(direction);
        self.offset = 0.0;
    }

    fn finish_slide(&mut self) {
        self.current_index = self.target_index;
        self.direction = None;
        self.offset = 0.0;
        self.slide_width = self.card_widths[self.current_index];
    }
}
