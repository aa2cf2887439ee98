//! Cached forest for surfaces that redraw often.

use crate::forest::{generate_params, Forest, ForestParams};
use crate::seed::Seed;
use log::debug;

/// Holds the last generated forest and regenerates only when the seed or the
/// shape inputs change. Canvas size is not a shape input: segments are
/// normalised, so a resize only rescales at paint time.
#[derive(Default)]
pub struct Sketch {
    cached: Option<(Seed, f64, Forest)>,
    generations: usize,
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forest(&mut self, seed: Seed, params: &ForestParams) -> &Forest {
        let stale = match &self.cached {
            Some((cached_seed, angle, forest)) => {
                *cached_seed != seed
                    || angle.to_bits() != params.branch_angle.to_bits()
                    || forest.params.stroke != params.stroke
            }
            None => true,
        };

        if stale {
            self.cached = None;
        }

        let generations = &mut self.generations;
        let (_, _, forest) = self.cached.get_or_insert_with(|| {
            debug!("sketch: regenerating for seed {} angle {}", seed, params.branch_angle);
            *generations += 1;
            (seed, params.branch_angle, generate_params(seed, params))
        });
        forest
    }

    /// How many times a forest was actually generated.
    pub fn generations(&self) -> usize {
        self.generations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recomputes_only_on_shape_changes() {
        let seed = Seed::new(1000);
        let mut sketch = Sketch::new();

        let first = sketch.forest(seed, &ForestParams::new(500, 500, 0.4)).clone();
        let resized = sketch.forest(seed, &ForestParams::new(80, 24, 0.4)).clone();
        assert_eq!(sketch.generations(), 1);
        assert_eq!(first.segments, resized.segments);

        sketch.forest(seed, &ForestParams::new(500, 500, 0.45));
        assert_eq!(sketch.generations(), 2);

        sketch.forest(Seed::new(1001), &ForestParams::new(500, 500, 0.45));
        assert_eq!(sketch.generations(), 3);
    }
}
