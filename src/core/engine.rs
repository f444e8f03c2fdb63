use crate::core::lucky::{format_code, lucky_numbers, seed};
use crate::core::reducer::{digit_sum, reduce};
use crate::domain::model::{BirthDate, LuckyStrategy, NumerologyResult, ReferenceDate};
use crate::domain::ports::EngineSettingsProvider;
use crate::utils::error::BirthDateError;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_MIN_BIRTH_YEAR: i32 = 1900;
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub min_birth_year: i32,
    pub reference_offset: FixedOffset,
    pub strategy: LuckyStrategy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            min_birth_year: DEFAULT_MIN_BIRTH_YEAR,
            reference_offset: utc_offset(DEFAULT_UTC_OFFSET_HOURS),
            strategy: LuckyStrategy::default(),
        }
    }
}

impl EngineSettingsProvider for EngineSettings {
    fn min_birth_year(&self) -> i32 {
        self.min_birth_year
    }

    fn reference_offset(&self) -> FixedOffset {
        self.reference_offset
    }

    fn strategy(&self) -> LuckyStrategy {
        self.strategy
    }
}

/// Fixed offset east of UTC; hours outside -23..=23 clamp to UTC.
pub fn utc_offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours.saturating_mul(3600)).unwrap_or_else(|| Utc.fix())
}

fn birth_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{4})([-/])(\d{1,2})([-/])(\d{1,2})$")
            .expect("birth date pattern is valid")
    })
}

/// Parses `YYYY-MM-DD` or `YYYY/MM/DD` (single separator style, one- or two-digit month/day).
pub fn parse_birth_date(
    text: &str,
    min_year: i32,
    max_year: i32,
) -> Result<BirthDate, BirthDateError> {
    let input = text.trim();
    let malformed = || BirthDateError::MalformedInput {
        input: input.to_string(),
    };

    let caps = birth_date_pattern().captures(input).ok_or_else(malformed)?;
    if caps[2] != caps[4] {
        return Err(malformed());
    }

    let year: i32 = caps[1].parse().map_err(|_| malformed())?;
    let month: u32 = caps[3].parse().map_err(|_| malformed())?;
    let day: u32 = caps[5].parse().map_err(|_| malformed())?;

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(BirthDateError::InvalidCalendarDate { year, month, day })?;

    if year < min_year || year > max_year {
        return Err(BirthDateError::YearOutOfRange {
            year,
            min_year,
            max_year,
        });
    }

    Ok(BirthDate::new(date))
}

#[derive(Debug, Clone, Default)]
pub struct NumerologyEngine {
    settings: EngineSettings,
}

impl NumerologyEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn from_provider<P: EngineSettingsProvider + ?Sized>(provider: &P) -> Self {
        Self::new(EngineSettings {
            min_birth_year: provider.min_birth_year(),
            reference_offset: provider.reference_offset(),
            strategy: provider.strategy(),
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Validates the text against the reference day's year, then computes.
    pub fn derive(
        &self,
        birth_text: &str,
        reference: ReferenceDate,
    ) -> Result<NumerologyResult, BirthDateError> {
        let birth = parse_birth_date(birth_text, self.settings.min_birth_year, reference.year())?;
        Ok(self.compute(birth, reference))
    }

    pub fn compute(&self, birth: BirthDate, reference: ReferenceDate) -> NumerologyResult {
        let life_path = reduce(
            year_digit_sum(birth.year()) + digit_sum(birth.month()) + digit_sum(birth.day()),
        );

        let personal_day = reduce(
            digit_sum(birth.month())
                + digit_sum(birth.day())
                + year_digit_sum(reference.year())
                + digit_sum(reference.month())
                + digit_sum(reference.day()),
        );

        let lp_single = life_path.single_digit();
        let pd_single = personal_day.single_digit();
        let seed = seed(lp_single, pd_single, birth.day(), reference.day());
        let codes = lucky_numbers(seed, self.settings.strategy);

        tracing::debug!(
            birth = %birth,
            reference = %reference,
            life_path = life_path.value(),
            personal_day = personal_day.value(),
            seed,
            ?codes,
            "numerology computed"
        );

        NumerologyResult {
            birth,
            reference,
            life_path,
            personal_day,
            lucky_codes: codes.map(format_code),
            lucky_digit: pd_single,
        }
    }
}

// 驗證後年份必為正數
fn year_digit_sum(year: i32) -> u32 {
    digit_sum(year.unsigned_abs())
}
