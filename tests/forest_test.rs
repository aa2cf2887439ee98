use blockforest::forest::{generate_from_hash, plant, ForestParams, MAX_DEPTH, SHRINK};
use blockforest::{generate, Forest, ForestError, RandomStream, Seed};
use std::f64::consts::PI;

const HASH_1000: &str = "00000000000003e8abcdef";

fn forest_1000() -> Forest {
    generate_from_hash(HASH_1000, &ForestParams::new(500, 500, 0.4)).unwrap()
}

#[test]
fn golden_forest_for_seed_1000() {
    let forest = forest_1000();

    let branches: Vec<usize> = forest.trees.iter().map(|t| t.num_branches()).collect();
    assert_eq!(branches, vec![9, 6, 8, 6, 10, 9, 10, 11, 7, 9, 7, 9, 10, 11]);
    assert_eq!(forest.segments.len(), 7686);
    assert_eq!(forest.depth, 7);
    assert_eq!(forest.angle_fallbacks, 0);

    let first = forest.segments[0];
    assert_eq!(first.start_x, 0.20552172302268445);
    assert_eq!(first.start_y, 0.11500694020651281);
    assert!((first.end_x - 0.3502488612785536).abs() < 1e-12);
    assert!((first.end_y - 0.12434821948912274).abs() < 1e-12);
    assert_eq!(first.stroke_width, 0.01450282870559022);

    let last = forest.segments[forest.segments.len() - 1];
    assert!((last.start_x - 0.5499616044261395).abs() < 1e-12);
    assert!((last.start_y - 1.0207664577996396).abs() < 1e-12);
    assert!((last.end_x - 0.5465801621519495).abs() < 1e-12);
    assert!((last.end_y - 1.0266685050339068).abs() < 1e-12);
}

#[test]
fn draw_calls_scale_to_canvas() {
    let forest = forest_1000();
    let call = forest.draw_calls().next().unwrap();
    let segment = forest.segments[0];
    assert_eq!(call.x0, segment.start_x * 500.0);
    assert_eq!(call.y1, segment.end_y * 500.0);
    assert_eq!(call.stroke_width, segment.stroke_width * 500.0);
}

#[test]
fn generation_is_deterministic() {
    let a = generate(Seed::new(0xdead_beef), 640, 480, 0.3);
    let b = generate(Seed::new(0xdead_beef), 640, 480, 0.3);
    assert_eq!(a, b);
}

#[test]
fn every_hex_digit_of_the_window_matters() {
    let base = "0123456789abcdef";
    let reference = generate_from_hash(base, &ForestParams::new(500, 500, 0.4)).unwrap();

    for i in 0..16 {
        let mut changed: Vec<char> = base.chars().collect();
        changed[i] = if changed[i] == 'f' { '0' } else { 'f' };
        let changed: String = changed.into_iter().collect();
        let forest = generate_from_hash(&changed, &ForestParams::new(500, 500, 0.4)).unwrap();
        assert_ne!(forest.segments, reference.segments, "digit {i} had no effect");
    }
}

#[test]
fn characters_past_the_window_are_ignored() {
    let params = ForestParams::new(500, 500, 0.4);
    let a = generate_from_hash("00000000000003e8aaaa", &params).unwrap();
    let b = generate_from_hash("00000000000003e8bbbb", &params).unwrap();
    assert_eq!(a.segments, b.segments);
}

#[test]
fn malformed_hash_fails_before_generation() {
    let params = ForestParams::new(500, 500, 0.4);
    assert!(matches!(generate_from_hash("", &params), Err(ForestError::InvalidSeed(_))));
    assert!(matches!(generate_from_hash("not-a-hash", &params), Err(ForestError::InvalidSeed(_))));
}

#[test]
fn tree_and_branch_counts_stay_in_bounds() {
    for key in 0..200u64 {
        let forest = generate(Seed::new(key), 100, 100, 0.4);
        assert!((1..=20).contains(&forest.trees.len()));
        for tree in &forest.trees {
            assert!((5..=11).contains(&tree.num_branches()));
        }
        assert!(forest.depth <= MAX_DEPTH);
    }
}

#[test]
fn segments_shrink_by_a_constant_factor_per_level() {
    let forest = forest_1000();

    // Lengths within one tree only take values initial / 1.5^k.
    for segment in &forest.segments {
        let tree = forest
            .trees
            .iter()
            .find(|t| {
                let ratio = t.initial_length / segment.length();
                let level = ratio.ln() / SHRINK.ln();
                (level - level.round()).abs() < 1e-6 && level.round() >= 0.0
            })
            .expect("segment length matches some tree's level");
        assert!(segment.length() >= tree.min_length);
    }

    // Per level, the shortest segment is the previous level's divided by 1.5.
    let first_level: usize = forest.trees.iter().map(|t| t.num_branches()).sum();
    let level_0 = &forest.segments[..first_level];
    let level_1 = &forest.segments[first_level..first_level * 3];
    for (i, tree) in forest.trees.iter().enumerate() {
        let offset: usize = forest.trees[..i].iter().map(|t| t.num_branches()).sum();
        let parent = level_0[offset];
        assert!((parent.length() - tree.initial_length).abs() < 1e-12);

        let child = level_1[offset * 2];
        assert!((child.length() - tree.initial_length / SHRINK).abs() < 1e-12);
        assert_eq!((child.start_x, child.start_y), (parent.end_x, parent.end_y));
        assert_eq!(child.stroke_width, parent.stroke_width / SHRINK);
    }
}

#[test]
fn initial_angles_are_separated_for_ten_thousand_seeds() {
    for key in 0..10_000u32 {
        let mut stream = RandomStream::new(key);
        let planting = plant(&mut stream);
        assert_eq!(planting.angle_fallbacks, 0);

        for tree in &planting.trees {
            let min_gap = PI / tree.num_branches() as f64;
            for (i, a) in tree.angles.iter().enumerate() {
                for b in &tree.angles[..i] {
                    assert!((a - b).abs() >= min_gap, "seed {key}: {a} and {b} too close");
                }
            }
        }
    }
}
