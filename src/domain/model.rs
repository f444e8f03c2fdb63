use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MASTER_NUMBERS: [u32; 3] = [11, 22, 33];

/// 完整縮減後的數字：1..=9 或大師數 11/22/33
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RootNumber(u32);

impl RootNumber {
    pub(crate) fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_master(self) -> bool {
        MASTER_NUMBERS.contains(&self.0)
    }

    /// 種子計算用的單數字：大師數只做一次位數加總
    pub fn single_digit(self) -> u32 {
        if self.0 < 10 {
            self.0
        } else {
            crate::core::reducer::digit_sum(self.0)
        }
    }
}

impl fmt::Display for RootNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    pub(crate) fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// The civil day that Personal-Day numbers and lucky codes are computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDate(NaiveDate);

impl ReferenceDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Civil date of `instant` in the given fixed offset, independent of the host time zone.
    pub fn from_instant(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self(instant.with_timezone(&offset).date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for ReferenceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LuckyStrategy {
    /// Offsets {0, 15, 33}; gaps stay wide enough that no repair pass runs.
    #[default]
    WideOffsets,
    /// Offsets {0, 10, 20} followed by up to three pairwise repair passes.
    NarrowOffsetsWithRepair,
}

impl LuckyStrategy {
    pub fn offsets(self) -> [u32; 3] {
        match self {
            LuckyStrategy::WideOffsets => [0, 15, 33],
            LuckyStrategy::NarrowOffsetsWithRepair => [0, 10, 20],
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "wide" | "wide_offsets" => Some(LuckyStrategy::WideOffsets),
            "narrow" | "narrow_offsets_with_repair" => Some(LuckyStrategy::NarrowOffsetsWithRepair),
            _ => None,
        }
    }
}

/// Output only; built by the engine, never read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumerologyResult {
    pub birth: BirthDate,
    pub reference: ReferenceDate,
    pub life_path: RootNumber,
    pub personal_day: RootNumber,
    /// 順序即顯示順序
    pub lucky_codes: [String; 3],
    pub lucky_digit: u32,
}

impl fmt::Display for NumerologyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "生日：{}（計算日 {}）", self.birth, self.reference)?;
        writeln!(f, "生命靈數：{}", self.life_path)?;
        writeln!(f, "今日個人日數：{}", self.personal_day)?;
        write!(
            f,
            "幸運尾號：兩碼 {}，單碼 {}",
            self.lucky_codes.join(", "),
            self.lucky_digit
        )
    }
}
