use crate::domain::model::{RootNumber, MASTER_NUMBERS};

/// Sum of the base-10 digits of `n`.
pub fn digit_sum(n: u32) -> u32 {
    n.to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .sum()
}

/// Repeated digit-sum until a single digit remains, stopping early on 11, 22 or 33.
pub fn reduce(mut n: u32) -> RootNumber {
    while n > 9 && !MASTER_NUMBERS.contains(&n) {
        n = digit_sum(n);
    }
    RootNumber::new(n)
}
