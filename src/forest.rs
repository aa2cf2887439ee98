//! Fractal forest generation.
//!
//! A run plants a handful of trees, each a fan of initial branches around one
//! origin, then grows every tree one level at a time. Each level turns every
//! live branch into one line segment and two thinner, shorter children until
//! the branches fall under their tree's minimum length.

use crate::config::Rgb;
use crate::error::Result;
use crate::rng::{unit, RandomStream};
use crate::seed::Seed;
use log::{debug, warn};
use rand::RngCore;
use serde::Serialize;
use std::f64::consts::{PI, TAU};

pub const MAX_TREES: u32 = 20;
pub const MIN_BRANCHES: u32 = 5;
/// Exclusive upper bound on initial branches per tree.
pub const MAX_BRANCHES: u32 = 12;
pub const MAX_DEPTH: usize = 10;
/// Length and stroke divisor between a branch and its children.
pub const SHRINK: f64 = 1.5;
/// Candidate draws per initial angle before falling back to even spacing.
pub const ANGLE_RETRY_LIMIT: u32 = 1000;

/// Shape parameters for one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForestParams {
    pub width: u32,
    pub height: u32,
    /// Angle between a branch and each of its children, in radians.
    pub branch_angle: f64,
    pub stroke: Rgb,
}

impl ForestParams {
    pub fn new(width: u32, height: u32, branch_angle: f64) -> Self {
        Self {
            width,
            height,
            branch_angle,
            stroke: Rgb::GREEN,
        }
    }
}

/// One emitted line, in normalised `[0, 1]` canvas space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LineSegment {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub stroke_width: f64,
    pub color: Rgb,
}

impl LineSegment {
    pub fn length(&self) -> f64 {
        (self.end_x - self.start_x).hypot(self.end_y - self.start_y)
    }

    /// Scale into pixel space. Stroke width follows the canvas width.
    pub fn scaled(&self, width: u32, height: u32) -> DrawCall {
        let w = f64::from(width);
        let h = f64::from(height);
        DrawCall {
            x0: self.start_x * w,
            y0: self.start_y * h,
            x1: self.end_x * w,
            y1: self.end_y * h,
            stroke_width: self.stroke_width * w,
            color: self.color,
        }
    }
}

/// "Move to (x0, y0), line to (x1, y1), stroke" in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DrawCall {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub stroke_width: f64,
    pub color: Rgb,
}

/// A planted tree: where it stands and how its first branches fan out.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    pub start_x: f64,
    pub start_y: f64,
    pub initial_length: f64,
    pub min_length: f64,
    pub angles: Vec<f64>,
}

impl Tree {
    pub fn num_branches(&self) -> usize {
        self.angles.len()
    }

    fn branches(&self) -> Vec<Branch> {
        self.angles
            .iter()
            .map(|&angle| Branch {
                origin_x: self.start_x,
                origin_y: self.start_y,
                x: self.start_x,
                y: self.start_y,
                angle,
                length: self.initial_length,
                min_length: self.min_length,
                stroke_width: self.initial_length / 10.0,
            })
            .collect()
    }
}

/// A growing tip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Branch {
    pub origin_x: f64,
    pub origin_y: f64,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub length: f64,
    pub min_length: f64,
    pub stroke_width: f64,
}

impl Branch {
    /// Emit this branch's segment and its two children, or `None` once the
    /// branch is shorter than its tree's minimum.
    pub fn grow(&self, branch_angle: f64, color: Rgb) -> Option<(LineSegment, [Branch; 2])> {
        if self.length < self.min_length {
            return None;
        }

        let end_x = self.x + self.angle.cos() * self.length;
        let end_y = self.y + self.angle.sin() * self.length;

        let segment = LineSegment {
            start_x: self.x,
            start_y: self.y,
            end_x,
            end_y,
            stroke_width: self.stroke_width,
            color,
        };

        let child = |angle| Branch {
            x: end_x,
            y: end_y,
            angle,
            length: self.length / SHRINK,
            stroke_width: self.stroke_width / SHRINK,
            ..*self
        };

        Some((
            segment,
            [child(self.angle - branch_angle), child(self.angle + branch_angle)],
        ))
    }
}

/// Trees drawn from the stream before any growth happens.
#[derive(Clone, Debug, PartialEq)]
pub struct Planting {
    pub trees: Vec<Tree>,
    /// Angles that hit the retry limit and were placed by even spacing.
    pub angle_fallbacks: usize,
}

/// Result of one generation run.
#[derive(Clone, Debug, PartialEq)]
pub struct Forest {
    pub params: ForestParams,
    pub trees: Vec<Tree>,
    pub segments: Vec<LineSegment>,
    /// Levels that had at least one live branch.
    pub depth: usize,
    pub angle_fallbacks: usize,
}

impl Forest {
    /// Draw calls at the canvas size the forest was generated for.
    pub fn draw_calls(&self) -> impl Iterator<Item = DrawCall> + '_ {
        self.draw_calls_at(self.params.width, self.params.height)
    }

    pub fn draw_calls_at(&self, width: u32, height: u32) -> impl Iterator<Item = DrawCall> + '_ {
        self.segments.iter().map(move |s| s.scaled(width, height))
    }
}

/// Generate the forest for a block seed.
pub fn generate(seed: Seed, width: u32, height: u32, branch_angle: f64) -> Forest {
    generate_params(seed, &ForestParams::new(width, height, branch_angle))
}

pub fn generate_params(seed: Seed, params: &ForestParams) -> Forest {
    let mut stream = RandomStream::from_block_seed(seed);
    debug!("growing forest for seed {} (key {})", seed, seed.stream_key());
    generate_with(&mut stream, params)
}

/// Parse `hash` and generate. Fails before drawing anything on a bad hash.
pub fn generate_from_hash(hash: &str, params: &ForestParams) -> Result<Forest> {
    let seed = Seed::from_hash(hash)?;
    Ok(generate_params(seed, params))
}

/// Generate from any random source. The stream is consumed in a fixed order,
/// so the same stream state always yields the same forest.
pub fn generate_with<R: RngCore + ?Sized>(rng: &mut R, params: &ForestParams) -> Forest {
    let Planting { trees, angle_fallbacks } = plant(rng);

    let mut live: Vec<Vec<Branch>> = trees.iter().map(Tree::branches).collect();
    let mut segments = Vec::new();
    let mut depth = 0;

    while depth < MAX_DEPTH && live.iter().any(|branches| !branches.is_empty()) {
        depth += 1;
        for branches in &mut live {
            let mut next = Vec::with_capacity(branches.len() * 2);
            for branch in branches.drain(..) {
                if let Some((segment, children)) = branch.grow(params.branch_angle, params.stroke) {
                    segments.push(segment);
                    next.extend(children);
                }
            }
            *branches = next;
        }
    }

    debug!(
        "forest: {} trees, {} segments, {} levels",
        trees.len(),
        segments.len(),
        depth
    );

    Forest {
        params: *params,
        trees,
        segments,
        depth,
        angle_fallbacks,
    }
}

/// Draw tree count, then each tree's origin, branch count, length and angles.
pub fn plant<R: RngCore + ?Sized>(rng: &mut R) -> Planting {
    let num_trees = (unit(rng) * f64::from(MAX_TREES)).floor() as u32 + 1;
    let mut angle_fallbacks = 0;

    let trees = (0..num_trees)
        .map(|_| {
            let start_x = unit(rng);
            let start_y = unit(rng);
            let num_branches = (unit(rng) * f64::from(MAX_BRANCHES - MIN_BRANCHES)).floor() as u32
                + MIN_BRANCHES;
            let initial_length = unit(rng) * 0.1 + 0.05;
            let min_length = initial_length / 10.0;
            let angles = spread_angles(rng, num_branches, &mut angle_fallbacks);

            Tree {
                start_x,
                start_y,
                initial_length,
                min_length,
                angles,
            }
        })
        .collect();

    Planting { trees, angle_fallbacks }
}

/// Draw `count` angles in `[0, 2π)` pairwise at least `π / count` apart.
fn spread_angles<R: RngCore + ?Sized>(rng: &mut R, count: u32, fallbacks: &mut usize) -> Vec<f64> {
    let min_gap = PI / f64::from(count);
    let mut angles: Vec<f64> = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let drawn = (0..ANGLE_RETRY_LIMIT)
            .map(|_| TAU * unit(rng))
            .find(|&candidate| clearance(candidate, &angles) >= min_gap);

        let angle = drawn.unwrap_or_else(|| {
            *fallbacks += 1;
            let slot = spaced_slot(&angles, count);
            warn!(
                "no clear angle after {} draws ({} branches), using slot {:.4}",
                ANGLE_RETRY_LIMIT, count, slot
            );
            slot
        });
        angles.push(angle);
    }

    angles
}

/// Distance from `angle` to the nearest accepted angle.
fn clearance(angle: f64, accepted: &[f64]) -> f64 {
    accepted
        .iter()
        .map(|a| (angle - a).abs())
        .fold(f64::INFINITY, f64::min)
}

/// Pick among `2 * count` evenly spaced slots the one farthest from every
/// accepted angle; the lowest slot wins ties.
///
/// Fewer than `count` accepted angles can block at most two slots each, so a
/// slot with clearance of at least one step always remains.
fn spaced_slot(accepted: &[f64], count: u32) -> f64 {
    let step = PI / f64::from(count);
    let mut best = (0.0, f64::NEG_INFINITY);
    for k in 0..count * 2 {
        let slot = f64::from(k) * step;
        let gap = clearance(slot, accepted);
        if gap > best.1 {
            best = (slot, gap);
        }
    }
    best.0
}
