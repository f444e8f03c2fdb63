use thiserror::Error;

/// 生日輸入的驗證失敗，皆為使用者可修正的情況。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BirthDateError {
    #[error("Malformed birth date input: {input:?}")]
    MalformedInput { input: String },

    #[error("Birth year {year} is outside {min_year}..={max_year}")]
    YearOutOfRange {
        year: i32,
        min_year: i32,
        max_year: i32,
    },

    #[error("Not a real calendar date: {year:04}-{month:02}-{day:02}")]
    InvalidCalendarDate { year: i32, month: u32, day: u32 },
}

impl BirthDateError {
    /// 回覆給聊天使用者的訊息
    pub fn user_message(&self) -> String {
        match self {
            BirthDateError::MalformedInput { .. } => "請輸入正確格式：YYYY-MM-DD".to_string(),
            BirthDateError::YearOutOfRange { min_year, .. } => {
                format!("請輸入正確年份範圍：{}~現在", min_year)
            }
            BirthDateError::InvalidCalendarDate { .. } => {
                "請輸入存在的日期，例如 1990-05-20".to_string()
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum LuckError {
    #[error("Birth date rejected: {0}")]
    Validation(#[from] BirthDateError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value {value:?} for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Narrative generation failed: {message}")]
    NarrativeError { message: String },
}

impl LuckError {
    pub fn is_validation(&self) -> bool {
        matches!(self, LuckError::Validation(_))
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LuckError::Validation(e) => e.user_message(),
            LuckError::ApiError(_) | LuckError::NarrativeError { .. } => {
                "無法取得解說文字".to_string()
            }
            LuckError::IoError(e) => format!("檔案讀取失敗：{}", e),
            LuckError::SerializationError(e) => format!("輸出格式化失敗：{}", e),
            LuckError::ConfigValidationError { field, message } => {
                format!("設定檔錯誤 ({})：{}", field, message)
            }
            LuckError::InvalidConfigValueError { field, reason, .. } => {
                format!("設定值無效 ({})：{}", field, reason)
            }
            LuckError::MissingConfigError { field } => format!("缺少必要設定：{}", field),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LuckError::Validation(_) => "Enter the birth date as YYYY-MM-DD or YYYY/MM/DD",
            LuckError::ApiError(_) | LuckError::NarrativeError { .. } => {
                "Check the narrative endpoint, API key and network, then retry"
            }
            LuckError::IoError(_) => "Make sure the file exists and is readable",
            LuckError::SerializationError(_) => "Retry without --json",
            LuckError::ConfigValidationError { .. }
            | LuckError::InvalidConfigValueError { .. }
            | LuckError::MissingConfigError { .. } => {
                "Fix the configuration file or command line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LuckError>;
