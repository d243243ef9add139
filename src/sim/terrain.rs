//! Procedural ground streaming
//!
//! Segments live in world space (`world_x = screen_x + scroll_offset`) and
//! form a gapless run from just behind the camera to the lookahead margin.
//! Everything else in the simulation lives in viewport space.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::TickFault;
use super::obstacle::{Obstacle, ObstacleSink};
use crate::consts::*;

pub const SEGMENT_WIDTH: f32 = 150.0;
pub const SECTION_WIDTH: f32 = 800.0;
/// Sections per level, labelled `A`..`L`
pub const SECTIONS_PER_LEVEL: u32 = 12;
/// How far a crater floor sits below the flat surface
pub const CRATER_DEPTH: f32 = 55.0;
/// Generated window extends this far past the camera
pub const LOOKAHEAD: f32 = 2.0 * GAME_WIDTH;
/// Segments whose right edge is further behind the camera are pruned
pub const TRAIL_MARGIN: f32 = GAME_WIDTH;
/// No terrain rocks before this world x, so a run never opens on one
const ROCK_FREE_DISTANCE: f32 = 1.5 * GAME_WIDTH;

const MAX_CRATER_CHANCE: f64 = 0.35;

/// Ground segment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Flat,
    Crater,
}

/// One fixed-width slice of ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainSegment {
    /// World-space left edge
    pub x: f32,
    pub width: f32,
    /// Surface drop below the flat ground line (positive is lower)
    pub depth: f32,
    pub kind: SegmentKind,
    pub section: char,
}

impl TerrainSegment {
    pub fn new(x: f32, kind: SegmentKind) -> Self {
        let depth = match kind {
            SegmentKind::Flat => 0.0,
            SegmentKind::Crater => CRATER_DEPTH,
        };
        Self {
            x,
            width: SEGMENT_WIDTH,
            depth,
            kind,
            section: section_label(section_index(x)),
        }
    }

    #[inline]
    pub fn end(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn contains(&self, world_x: f32) -> bool {
        world_x >= self.x && world_x < self.end()
    }

    /// Surface y of this segment
    #[inline]
    pub fn ground_y(&self) -> f32 {
        GROUND_Y + self.depth
    }
}

/// Section index for a world x position
pub fn section_index(world_x: f32) -> u32 {
    (world_x.max(0.0) / SECTION_WIDTH).floor() as u32
}

/// Letter shown for a section index
pub fn section_label(section: u32) -> char {
    char::from(b'A' + (section % SECTIONS_PER_LEVEL) as u8)
}

/// Probability a new segment is a crater. The opening section is always clear.
pub fn crater_chance(section: u32) -> f64 {
    if section == 0 {
        return 0.0;
    }
    (0.03 + section as f64 * 0.005).min(MAX_CRATER_CHANCE)
}

/// Probability a flat segment carries a rock
pub fn rock_chance(section: u32) -> f64 {
    (0.02 * (1.0 + section as f64 * 0.2)).min(1.0)
}

/// Sliding window of ground segments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainStream {
    segments: VecDeque<TerrainSegment>,
    /// Total scrolled distance (world x of the viewport's left edge)
    scroll_offset: f32,
}

impl TerrainStream {
    /// Fresh stream at scroll 0, filled to the lookahead margin
    pub fn new(rng: &mut impl Rng, sink: &mut impl ObstacleSink) -> Self {
        let mut stream = Self {
            segments: VecDeque::new(),
            scroll_offset: 0.0,
        };
        stream.fill(rng, sink);
        stream
    }

    /// Stream over a fixed window, with no generation until the next advance
    pub fn from_segments(
        segments: impl IntoIterator<Item = TerrainSegment>,
        scroll_offset: f32,
    ) -> Self {
        Self {
            segments: segments.into_iter().collect(),
            scroll_offset,
        }
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn segments(&self) -> impl Iterator<Item = &TerrainSegment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn to_world(&self, screen_x: f32) -> f32 {
        screen_x + self.scroll_offset
    }

    #[inline]
    pub fn to_screen(&self, world_x: f32) -> f32 {
        world_x - self.scroll_offset
    }

    /// Segment covering a world x, if any
    pub fn segment_at_world(&self, world_x: f32) -> Option<&TerrainSegment> {
        let idx = self.segments.partition_point(|s| s.end() <= world_x);
        self.segments.get(idx).filter(|s| s.contains(world_x))
    }

    /// Surface y at a world x. Outside the window this is the flat ground line.
    pub fn ground_y_at_world(&self, world_x: f32) -> f32 {
        self.segment_at_world(world_x)
            .map_or(GROUND_Y, TerrainSegment::ground_y)
    }

    pub fn ground_y_at_screen(&self, screen_x: f32) -> f32 {
        self.ground_y_at_world(self.to_world(screen_x))
    }

    pub fn segment_at_screen(&self, screen_x: f32) -> Option<&TerrainSegment> {
        self.segment_at_world(self.to_world(screen_x))
    }

    /// Scroll forward, generating ahead and pruning behind
    pub fn advance_window(
        &mut self,
        delta: f32,
        rng: &mut impl Rng,
        sink: &mut impl ObstacleSink,
    ) -> Result<(), TickFault> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(TickFault::InvalidScroll { delta });
        }
        self.scroll_offset += delta;
        self.fill(rng, sink);
        self.prune();
        self.check_contiguity()
    }

    /// Every adjacent pair must meet exactly
    pub fn check_contiguity(&self) -> Result<(), TickFault> {
        for (a, b) in self.segments.iter().zip(self.segments.iter().skip(1)) {
            if (a.end() - b.x).abs() > 1e-3 {
                return Err(TickFault::TerrainGap {
                    expected_x: a.end(),
                    found_x: b.x,
                });
            }
        }
        Ok(())
    }

    fn next_x(&self) -> f32 {
        match self.segments.back() {
            Some(last) => last.end(),
            None => (self.scroll_offset / SEGMENT_WIDTH).floor() * SEGMENT_WIDTH,
        }
    }

    fn fill(&mut self, rng: &mut impl Rng, sink: &mut impl ObstacleSink) {
        loop {
            let x = self.next_x();
            if x - self.scroll_offset >= LOOKAHEAD {
                break;
            }
            let segment = self.generate(x, rng, sink);
            self.segments.push_back(segment);
        }
    }

    fn generate(
        &self,
        x: f32,
        rng: &mut impl Rng,
        sink: &mut impl ObstacleSink,
    ) -> TerrainSegment {
        let section = section_index(x);
        let kind = if rng.random_bool(crater_chance(section)) {
            SegmentKind::Crater
        } else {
            SegmentKind::Flat
        };

        if kind == SegmentKind::Flat
            && x > ROCK_FREE_DISTANCE
            && rng.random_bool(rock_chance(section))
        {
            let rock_x = self.to_screen(x + SEGMENT_WIDTH / 2.0);
            sink.push_obstacle(Obstacle::rock(rock_x));
        }

        TerrainSegment::new(x, kind)
    }

    fn prune(&mut self) {
        while let Some(front) = self.segments.front() {
            if front.end() - self.scroll_offset >= -TRAIL_MARGIN {
                break;
            }
            self.segments.pop_front();
        }
    }
}
