use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use tamna_mypage::adapters::itinerary_source;
use tamna_mypage::utils::error::ErrorSeverity;
use tamna_mypage::utils::{logger, validation::Validate};
use tamna_mypage::{
    AppConfig, CliConfig, Command, DateSelection, IntentOutcome, KvProfileStore, LocalStorage,
    MyPageError, PageIntent, PageView, ProfilePageController, SaveStatus,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting mypage");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入 TOML 配置，檔案不存在時使用預設值
    let mut config = match AppConfig::from_file_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config.display(), e);
            eprintln!("💡 Make sure the file is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(path) = &cli.storage_path {
        config.storage.path = path.clone();
        tracing::info!("🔧 Storage path overridden to: {}", path);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(&config.storage.path);
    let store = KvProfileStore::with_options(
        storage,
        config.storage.profile_key.clone(),
        config.profile_defaults(),
    );
    let mut controller = ProfilePageController::new(store, config.page_settings());

    if let Err(e) = run(&mut controller, cli.command).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }

    Ok(())
}

async fn run(
    controller: &mut ProfilePageController<KvProfileStore<LocalStorage>>,
    command: Command,
) -> Result<(), MyPageError> {
    match command {
        Command::Show {
            itineraries,
            search,
            sort,
        } => {
            let items = match itineraries {
                Some(path) => itinerary_source::load_itineraries(&path).await?,
                None => Vec::new(),
            };
            controller.start(items).await;

            if let Some(sort) = sort {
                controller.handle(PageIntent::SortChanged(sort)).await?;
            }
            controller.handle(PageIntent::SearchChanged(search)).await?;

            render(&controller.view());
        }
        Command::Nickname { name } => {
            controller.start(Vec::new()).await;
            controller.handle(PageIntent::EditNickname).await?;
            let outcome = controller.handle(PageIntent::ConfirmNickname(name)).await?;
            report_save(outcome)?;
            println!("✅ Nickname: {}", controller.profile().nickname);
        }
        Command::Avatar { image } => {
            controller.start(Vec::new()).await;
            let outcome = controller
                .handle(PageIntent::ImageSelected(Some(image)))
                .await?;
            report_save(outcome)?;
            println!("✅ Profile image: {}", controller.profile().profile_image);
        }
        Command::Dates { start, end } => {
            let selection = parse_selection(&start, end.as_deref())?;
            match controller.handle(PageIntent::DatesSelected(selection)).await? {
                IntentOutcome::DatesAccepted(accepted) => {
                    println!("✅ Selection accepted: {}", describe_selection(&accepted));
                }
                IntentOutcome::DatesRejected(rejection) => return Err(rejection.into()),
                other => tracing::debug!("Unexpected outcome for date selection: {:?}", other),
            }
        }
    }

    Ok(())
}

/// 儲存失敗時仍保留畫面上的新值，只提示使用者
fn report_save(outcome: IntentOutcome) -> Result<(), MyPageError> {
    match outcome {
        IntentOutcome::ProfileSaved(SaveStatus::Persisted) => Ok(()),
        IntentOutcome::ProfileSaved(SaveStatus::Failed(e)) => Err(e),
        IntentOutcome::ProfileSaved(SaveStatus::Superseded) | IntentOutcome::Unchanged => Ok(()),
        other => {
            tracing::debug!("Unexpected outcome for profile change: {:?}", other);
            Ok(())
        }
    }
}

fn render(view: &PageView<'_>) {
    println!("👤 {}", view.profile.nickname);
    println!("🖼  {}", view.profile.profile_image);
    println!();

    if !view.search.search_term.is_empty() {
        println!(
            "🔍 \"{}\" ({} first)",
            view.search.search_term, view.search.sort_mode
        );
    }

    if view.show_empty_state {
        println!("No itineraries yet. Plan a trip to see it here.");
        return;
    }

    for itinerary in view.itineraries {
        println!(
            "{}  {:<32} {}",
            itinerary.date, itinerary.title, itinerary.tags
        );
    }
}

fn parse_selection(start: &str, end: Option<&str>) -> Result<DateSelection, MyPageError> {
    let start = parse_calendar_value(start)?;
    let values = match end {
        Some(end) => vec![start, parse_calendar_value(end)?],
        None => vec![start],
    };

    DateSelection::try_from(values.as_slice()).map_err(|e| MyPageError::ValidationError {
        message: e.to_string(),
    })
}

fn parse_calendar_value(value: &str) -> Result<NaiveDateTime, MyPageError> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").map_err(|e| {
        MyPageError::ValidationError {
            message: format!("'{}' is not a date (YYYY-MM-DD): {}", value, e),
        }
    })
}

fn describe_selection(selection: &DateSelection) -> String {
    match selection {
        DateSelection::Single(at) => at.to_string(),
        DateSelection::Range { start, end } => format!("{} → {}", start, end),
    }
}

// 根據錯誤嚴重程度決定退出碼
fn exit_code(error: &MyPageError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 2, // 使用者可修正的輸入
        ErrorSeverity::Medium => 3, // 儲存或資料問題
        ErrorSeverity::High => 1, // 配置錯誤
    }
}
