//! Farkle scoring: exhaustive search for the best partition of a roll into
//! scoring combinations.
//!
//! A roll has at most six dice, so every subset of still-available dice fits
//! in a 6-bit mask and the whole search touches at most 64 memoized states.

use crate::error::EngineError;
use crate::model::{Face, ScoreEvaluation, ScoreLine, DICE_PER_ROLL};

pub const SINGLE_ONE: u32 = 100;
pub const SINGLE_FIVE: u32 = 50;
pub const THREE_ONES: u32 = 1000;
pub const STRAIGHT: u32 = 1500;
pub const THREE_PAIRS: u32 = 1500;
pub const TWO_TRIPLETS: u32 = 2500;
pub const FOUR_AND_PAIR: u32 = 1500;

type Mask = u8;

#[inline] fn bit(i: usize) -> Mask { 1 << i }

#[inline] fn is_face(face: Face) -> bool { (1..=6).contains(&face) }

/// Best completion found for one mask.
#[derive(Clone, Default)]
struct Path {
    points: u32,
    used: Vec<usize>,
    lines: Vec<ScoreLine>,
}

fn sorted(indices: &[usize]) -> Vec<usize> {
    let mut out = indices.to_vec();
    out.sort_unstable();
    out
}

/// More points, then more dice, then the lexicographically smaller index set.
/// A full tie goes to the candidate.
fn beats(candidate: &Path, best: &Path) -> bool {
    if candidate.points != best.points { return candidate.points > best.points; }
    if candidate.used.len() != best.used.len() { return candidate.used.len() > best.used.len(); }
    for (a, b) in sorted(&candidate.used).iter().zip(sorted(&best.used).iter()) {
        if a != b { return a < b; }
    }
    true
}

/// Indices still in `mask`, bucketed by face. Slot 0 stays empty.
fn indices_by_face(dice: &[Face], mask: Mask) -> [Vec<usize>; 7] {
    let mut by_face: [Vec<usize>; 7] = Default::default();
    for (i, &face) in dice.iter().enumerate() {
        if mask & bit(i) == 0 || !is_face(face) { continue; }
        by_face[face as usize].push(i);
    }
    by_face
}

/// Distinct faces still in `mask`, in the order they first show up in the roll.
/// Moves are tried in this order; on a complete tie the last one tried wins.
fn faces_in_roll_order(dice: &[Face], mask: Mask) -> Vec<usize> {
    let mut order = Vec::with_capacity(DICE_PER_ROLL);
    for (i, &face) in dice.iter().enumerate() {
        if mask & bit(i) == 0 || !is_face(face) || order.contains(&(face as usize)) { continue; }
        order.push(face as usize);
    }
    order
}

fn line(points: u32, label: impl Into<String>, used_indices: Vec<usize>) -> ScoreLine {
    ScoreLine { points, label: label.into(), used_indices }
}

fn collect_moves(dice: &[Face], mask: Mask) -> Vec<ScoreLine> {
    let by_face = indices_by_face(dice, mask);
    let order = faces_in_roll_order(dice, mask);
    let mut moves = Vec::new();

    for &face in &order {
        let points = match face {
            1 => SINGLE_ONE,
            5 => SINGLE_FIVE,
            _ => continue,
        };
        for &i in &by_face[face] { moves.push(line(points, format!("Single {}", face), vec![i])); }
    }

    for &face in &order {
        let idxs = &by_face[face];
        if idxs.len() < 3 { continue; }
        let (points, label) = if face == 1 {
            (THREE_ONES, "Three 1s".to_string())
        } else {
            (face as u32 * 100, format!("Three {}s", face))
        };
        moves.push(line(points, label, idxs[..3].to_vec()));
    }

    if mask.count_ones() as usize == DICE_PER_ROLL {
        let mut shape: Vec<usize> = by_face[1..].iter().map(Vec::len).filter(|&n| n > 0).collect();
        shape.sort_unstable();
        let all: Vec<usize> = sorted(&by_face.concat());
        if all.len() == DICE_PER_ROLL {
            if by_face[1..].iter().all(|idxs| idxs.len() == 1) {
                moves.push(line(STRAIGHT, "Straight (1-6)", all.clone()));
            }
            match shape.as_slice() {
                [2, 2, 2] => moves.push(line(THREE_PAIRS, "Three pairs", all)),
                [3, 3] => moves.push(line(TWO_TRIPLETS, "Two triplets", all)),
                [2, 4] => moves.push(line(FOUR_AND_PAIR, "Four of a kind + a pair", all)),
                _ => {}
            }
        }
    }
    moves
}

fn solve(dice: &[Face], mask: Mask, memo: &mut [Option<Path>]) -> Path {
    if let Some(done) = &memo[mask as usize] { return done.clone(); }
    let mut best = Path::default();
    for mv in collect_moves(dice, mask) {
        let mv_mask = mv.used_indices.iter().fold(0 as Mask, |acc, &i| acc | bit(i));
        let rest = solve(dice, mask & !mv_mask, memo);
        let mut used = mv.used_indices.clone();
        used.extend_from_slice(&rest.used);
        let mut lines = Vec::with_capacity(rest.lines.len() + 1);
        let points = mv.points + rest.points;
        lines.push(mv);
        lines.extend(rest.lines);
        let candidate = Path { points, used, lines };
        if beats(&candidate, &best) { best = candidate; }
    }
    memo[mask as usize] = Some(best.clone());
    best
}

/// Best achievable score for `dice`. Only the first six faces are considered;
/// faces outside 1-6 never score (see [`validate_faces`]).
pub fn score_roll(dice: &[Face]) -> ScoreEvaluation {
    let dice = &dice[..dice.len().min(DICE_PER_ROLL)];
    let full: Mask = ((1u16 << dice.len()) - 1) as Mask;
    let mut memo = vec![None; 1 << dice.len()];
    let best = solve(dice, full, &mut memo);
    let best_used_indices = sorted(&best.used);
    ScoreEvaluation {
        best_points: best.points,
        hot_dice: best_used_indices.len() == dice.len(),
        farkle: best.points == 0,
        best_used_indices,
        lines: best.lines,
    }
}

/// Points for a hand-picked set of dice, or 0 unless the best scoring of
/// exactly those dice consumes every one of them.
pub fn selection_points(values: &[Face]) -> u32 {
    if values.is_empty() { return 0; }
    let eval = score_roll(values);
    if eval.best_used_indices.len() == values.len() { eval.best_points } else { 0 }
}

pub fn validate_faces(dice: &[Face]) -> Result<(), EngineError> {
    match dice.iter().enumerate().find(|(_, &f)| !is_face(f)) {
        Some((index, &face)) => Err(EngineError::InvalidFace { index, face }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn has_line(eval: &ScoreEvaluation, label: &str) -> bool {
        eval.lines.iter().any(|l| l.label == label)
    }

    #[test]
    fn single_one_and_single_five() {
        let r = score_roll(&[1, 2, 3, 4, 6, 2]);
        assert_eq!(r.best_points, 100);
        assert_eq!(r.best_used_indices, vec![0]);
        assert!(!r.farkle);

        let r = score_roll(&[2, 5, 3, 4, 6, 2]);
        assert_eq!(r.best_points, 50);
        assert_eq!(r.best_used_indices, vec![1]);
    }

    #[test]
    fn mixed_singles() {
        let r = score_roll(&[1, 5, 2, 4, 5, 6]);
        assert_eq!(r.best_points, 200);
        assert_eq!(r.best_used_indices, vec![0, 1, 4]);
        assert_eq!(r.lines.len(), 3);
    }

    #[test]
    fn triples() {
        let r = score_roll(&[2, 2, 2, 3, 4, 6]);
        assert_eq!(r.best_points, 200);
        assert!(!r.hot_dice);
        assert!(has_line(&r, "Three 2s"));

        let r = score_roll(&[1, 1, 1, 2, 3, 4]);
        assert_eq!(r.best_points, 1000);
        assert!(has_line(&r, "Three 1s"));
        assert!(!r.hot_dice);
    }

    #[test]
    fn triple_ones_plus_single_five() {
        let r = score_roll(&[1, 1, 1, 5, 2, 4]);
        assert_eq!(r.best_points, 1050);
        assert_eq!(r.best_used_indices, vec![0, 1, 2, 3]);

        assert_eq!(score_roll(&[1, 1, 1, 2, 5, 6]).best_points, 1050);
    }

    #[test]
    fn six_dice_specials() {
        let r = score_roll(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(r.best_points, 1500);
        assert!(r.hot_dice);
        assert!(has_line(&r, "Straight (1-6)"));

        let r = score_roll(&[1, 1, 2, 2, 3, 3]);
        assert_eq!(r.best_points, 1500);
        assert!(has_line(&r, "Three pairs"));

        let r = score_roll(&[2, 2, 2, 3, 3, 3]);
        assert_eq!(r.best_points, 2500);
        assert!(has_line(&r, "Two triplets"));

        let r = score_roll(&[4, 4, 4, 4, 2, 2]);
        assert_eq!(r.best_points, 1500);
        assert!(r.hot_dice);
        assert!(has_line(&r, "Four of a kind + a pair"));
    }

    #[test]
    fn two_triplets_beat_decomposition() {
        let r = score_roll(&[1, 1, 1, 5, 5, 5]);
        assert_eq!(r.best_points, 2500);
        assert!(r.hot_dice);
        assert_eq!(r.best_used_indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(r.lines.len(), 1);
    }

    #[test]
    fn four_ones_and_pair_of_fives() {
        // 1500 beats three 1s + single 1 + two single 5s (1200)
        let r = score_roll(&[1, 1, 1, 1, 5, 5]);
        assert_eq!(r.best_points, 1500);
        assert!(has_line(&r, "Four of a kind + a pair"));
    }

    #[test]
    fn six_of_a_kind_splits_into_two_triples() {
        let r = score_roll(&[1, 1, 1, 1, 1, 1]);
        assert_eq!(r.best_points, 2000);
        assert_eq!(r.lines.len(), 2);
        assert!(r.hot_dice);

        assert_eq!(score_roll(&[5, 5, 5, 5, 5, 5]).best_points, 1000);
    }

    #[test]
    fn specials_need_all_six_dice() {
        let r = score_roll(&[2, 2, 3, 3, 4]);
        assert!(r.farkle);
        let r = score_roll(&[1, 2, 3, 4, 5]);
        assert_eq!(r.best_points, 150);
    }

    #[test]
    fn farkle_roll() {
        let r = score_roll(&[2, 3, 4, 6, 2, 3]);
        assert_eq!(r.best_points, 0);
        assert!(r.farkle);
        assert!(!r.hot_dice);
        assert!(r.best_used_indices.is_empty());
        assert!(r.lines.is_empty());
    }

    #[test]
    fn short_rolls() {
        let r = score_roll(&[5]);
        assert_eq!(r.best_points, 50);
        assert!(r.hot_dice);
        assert!(score_roll(&[3]).farkle);
    }

    #[test]
    fn more_dice_win_ties_on_points() {
        // three 5s (500) with nothing else vs. no alternative reaching 500 with fewer dice
        let r = score_roll(&[5, 5, 5, 2, 3, 4]);
        assert_eq!(r.best_points, 500);
        assert_eq!(r.best_used_indices, vec![0, 1, 2]);
        assert!(beats(
            &Path { points: 100, used: vec![0, 1], lines: vec![] },
            &Path { points: 100, used: vec![0], lines: vec![] },
        ));
        assert!(beats(
            &Path { points: 100, used: vec![2, 0], lines: vec![] },
            &Path { points: 100, used: vec![1, 2], lines: vec![] },
        ));
        assert!(!beats(
            &Path { points: 50, used: vec![0, 1, 2], lines: vec![] },
            &Path { points: 100, used: vec![3], lines: vec![] },
        ));
    }

    fn line_summary(eval: &ScoreEvaluation) -> Vec<(String, Vec<usize>)> {
        eval.lines.iter().map(|l| (l.label.clone(), l.used_indices.clone())).collect()
    }

    #[test]
    fn complete_ties_follow_roll_order() {
        // every ordering of the three singles scores 200 on dice {0,1,2}
        let r = score_roll(&[5, 5, 1, 3]);
        assert_eq!(r.best_points, 200);
        assert_eq!(r.best_used_indices, vec![0, 1, 2]);
        assert_eq!(
            line_summary(&r),
            vec![
                ("Single 1".to_string(), vec![2]),
                ("Single 5".to_string(), vec![1]),
                ("Single 5".to_string(), vec![0]),
            ]
        );

        let r = score_roll(&[5, 1, 2, 2, 3, 4]);
        assert_eq!(
            line_summary(&r),
            vec![("Single 1".to_string(), vec![1]), ("Single 5".to_string(), vec![0])]
        );
    }

    #[test]
    fn triple_and_single_tie_keeps_triple_first() {
        // S1 + Three 1s, Three 1s + S1 and the mirrored orders all use {0,1,2,3} for 1100
        let r = score_roll(&[1, 1, 1, 1]);
        assert_eq!(r.best_points, 1100);
        assert_eq!(r.best_used_indices, vec![0, 1, 2, 3]);
        assert_eq!(
            line_summary(&r),
            vec![("Three 1s".to_string(), vec![0, 1, 2]), ("Single 1".to_string(), vec![3])]
        );
    }

    #[test]
    fn triple_takes_earliest_dice() {
        let r = score_roll(&[3, 2, 2, 2, 2, 4]);
        assert_eq!(r.best_points, 200);
        assert_eq!(r.best_used_indices, vec![1, 2, 3]);
        assert_eq!(line_summary(&r), vec![("Three 2s".to_string(), vec![1, 2, 3])]);
    }

    #[test]
    fn faces_past_the_sixth_are_ignored() {
        let r = score_roll(&[2, 3, 4, 6, 2, 3, 1]);
        assert!(r.farkle);
        assert!(!r.hot_dice);
    }

    #[test]
    fn selection_points_requires_every_die_to_score() {
        assert_eq!(selection_points(&[]), 0);
        assert_eq!(selection_points(&[1, 5]), 150);
        assert_eq!(selection_points(&[1, 2]), 0);
        assert_eq!(selection_points(&[2, 2, 2]), 200);
        assert_eq!(selection_points(&[2, 2]), 0);
    }

    #[test]
    fn validate_faces_rejects_out_of_range() {
        assert!(validate_faces(&[1, 6, 3]).is_ok());
        assert!(matches!(
            validate_faces(&[1, 7, 3]),
            Err(EngineError::InvalidFace { index: 1, face: 7 })
        ));
        assert!(matches!(validate_faces(&[0]), Err(EngineError::InvalidFace { index: 0, face: 0 })));
    }

    fn random_roll(rng: &mut StdRng, n: usize) -> Vec<Face> {
        (0..n).map(|_| rng.gen_range(1..=6)).collect()
    }

    #[test]
    fn evaluation_is_internally_consistent() {
        let mut rng = StdRng::seed_from_u64(0xFA2C1E);
        for _ in 0..500 {
            let n = rng.gen_range(1..=6);
            let dice = random_roll(&mut rng, n);
            let r = score_roll(&dice);
            assert_eq!(r.farkle, r.best_points == 0);
            assert_eq!(r.hot_dice, r.best_used_indices.len() == dice.len());
            assert!(r.best_used_indices.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(r.lines.iter().map(|l| l.points).sum::<u32>(), r.best_points);
            let mut from_lines: Vec<usize> = r.lines.iter().flat_map(|l| l.used_indices.clone()).collect();
            from_lines.sort_unstable();
            assert_eq!(from_lines, r.best_used_indices, "lines share or drop dice for {:?}", dice);
        }
    }

    #[test]
    fn more_available_dice_never_score_worse() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..40 {
            let dice = random_roll(&mut rng, 6);
            for sup in 1u8..64 {
                let sup_vals: Vec<Face> = (0..6).filter(|&i| sup & bit(i) != 0).map(|i| dice[i]).collect();
                let sup_points = score_roll(&sup_vals).best_points;
                // every proper subset of `sup`
                let mut sub = (sup - 1) & sup;
                while sub > 0 {
                    let sub_vals: Vec<Face> = (0..6).filter(|&i| sub & bit(i) != 0).map(|i| dice[i]).collect();
                    assert!(score_roll(&sub_vals).best_points <= sup_points, "{:?} {:06b} {:06b}", dice, sub, sup);
                    sub = (sub - 1) & sup;
                }
            }
        }
    }
}
