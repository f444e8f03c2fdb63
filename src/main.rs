use chrono::{FixedOffset, NaiveDate, Utc};
use clap::Parser;
use lucky_numerology::core::Clock;
use lucky_numerology::utils::{logger, validation::Validate};
use lucky_numerology::{
    ChatCompletionNarrator, CliConfig, FixedClock, LuckError, LuckService, NarratorConfig,
    NumerologyEngine, SystemClock,
};
use std::sync::Arc;

const EXIT_CONFIG: i32 = 1;
const EXIT_REJECTED: i32 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e, EXIT_CONFIG);
    }

    // 載入設定檔
    let file = match config.load_toml().and_then(|file| file.validate().map(|_| file)) {
        Ok(file) => file,
        Err(e) => fail(&e, EXIT_CONFIG),
    };

    let settings = config.engine_settings(&file);
    tracing::debug!("Engine settings: {:?}", settings);
    let engine = NumerologyEngine::new(settings);

    // 旗標或 enabled 任一開啟即敘述；連線設定一律取自設定檔
    let narrator = if config.narrative || file.narrative_enabled() {
        match file.narrator_config(std::env::var("GROQ_API_KEY").ok()) {
            Ok(narrator) => Some(narrator),
            Err(e) => fail(&e, EXIT_CONFIG),
        }
    } else {
        None
    };

    // 建立時鐘並執行
    match config.today {
        Some(today) => {
            let clock = FixedClock::new(noon_utc(today, settings.reference_offset));
            run(LuckService::new(engine, clock), narrator, &config).await
        }
        None => run(LuckService::new(engine, SystemClock), narrator, &config).await,
    }
}

async fn run<C: Clock>(
    service: LuckService<C>,
    narrator: Option<NarratorConfig>,
    config: &CliConfig,
) -> anyhow::Result<()> {
    let result = match service.derive(&config.birth) {
        Ok(result) => result,
        Err(e) => fail(&e, EXIT_REJECTED),
    };

    let Some(narrator) = narrator else {
        if config.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", result);
        }
        return Ok(());
    };

    let service = service.with_narrator(Arc::new(ChatCompletionNarrator::new(narrator)));
    let caption = service.narrate(&result).await;

    // 敘述失敗時 caption 為備援訊息，仍以成功結束
    if config.json {
        let output = serde_json::json!({ "result": result, "narrative": caption });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", caption);
    }

    Ok(())
}

fn noon_utc(day: NaiveDate, offset: FixedOffset) -> chrono::DateTime<Utc> {
    let local_noon = day.and_hms_opt(12, 0, 0).unwrap_or_default();
    (local_noon - offset).and_utc()
}

fn fail(e: &LuckError, code: i32) -> ! {
    // 輸入錯誤只記 info，其餘附上建議
    if e.is_validation() {
        tracing::info!("Birth date rejected: {}", e);
    } else {
        tracing::error!("❌ {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    }
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(code);
}
