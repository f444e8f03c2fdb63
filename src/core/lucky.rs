use crate::domain::model::LuckyStrategy;

const SEED_MODULUS: u32 = 100;
const CODE_MODULUS: u32 = 50;
const MIN_GAP: u32 = 10;
const REPAIR_STEP: u32 = 10;
const MAX_REPAIR_PASSES: usize = 3;

/// `(lp * pd * (birth_day + reference_day)) mod 100`, on single-digit LP/PD.
pub fn seed(lp_single: u32, pd_single: u32, birth_day: u32, reference_day: u32) -> u32 {
    (lp_single * pd_single * (birth_day + reference_day)) % SEED_MODULUS
}

/// Three codes in 1..=49, slot order preserved.
pub fn lucky_numbers(seed: u32, strategy: LuckyStrategy) -> [u32; 3] {
    let mut codes = strategy.offsets().map(|offset| (seed + offset) % CODE_MODULUS);
    avoid_zero(&mut codes);

    if strategy == LuckyStrategy::NarrowOffsetsWithRepair {
        repair_collisions(&mut codes);
        // 修正後可能再次出現 0
        avoid_zero(&mut codes);
    }

    codes
}

fn avoid_zero(codes: &mut [u32; 3]) {
    for code in codes.iter_mut() {
        if *code == 0 {
            *code = 1;
        }
    }
}

/// Pushes the later slot of any pair closer than `MIN_GAP` up by `REPAIR_STEP`.
/// Returns the number of passes that changed something.
fn repair_collisions(codes: &mut [u32; 3]) -> usize {
    let mut passes = 0;
    for _ in 0..MAX_REPAIR_PASSES {
        let mut changed = false;
        for i in 0..codes.len() {
            for j in (i + 1)..codes.len() {
                if codes[i].abs_diff(codes[j]) < MIN_GAP {
                    codes[j] = (codes[j] + REPAIR_STEP) % CODE_MODULUS;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
        passes += 1;
    }
    passes
}

pub fn format_code(code: u32) -> String {
    format!("{:02}", code)
}
