use anyhow::Result;
use chrono::{Duration, NaiveDate};
use tamna_mypage::adapters::itinerary_source;
use tamna_mypage::core::itinerary_filter::derive;
use tamna_mypage::{
    AppConfig, DateSelection, IntentOutcome, Itinerary, ItineraryId, KvProfileStore,
    LocalStorage, PageIntent, ProfileDefaults, ProfilePageController, ProfileStore, SaveStatus,
    SelectionRejection, SortMode, UserProfile,
};
use tempfile::TempDir;

fn jeju_items() -> Vec<Itinerary> {
    vec![
        Itinerary {
            id: ItineraryId::from("1"),
            title: "Jeju Beach".to_string(),
            tags: "beach,summer".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        },
        Itinerary {
            id: ItineraryId::from("2"),
            title: "Hallasan Hike".to_string(),
            tags: "mountain".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        },
    ]
}

fn ids(items: &[Itinerary]) -> Vec<String> {
    items.iter().map(|i| i.id.to_string()).collect()
}

#[test]
fn test_jeju_scenario() {
    let items = jeju_items();

    assert_eq!(ids(&derive(&items, "beach", SortMode::Newest)), vec!["1"]);
    assert_eq!(ids(&derive(&items, "", SortMode::Oldest)), vec!["1", "2"]);
}

#[test]
fn test_seven_and_eight_day_ranges() {
    let policy = AppConfig::default().page_settings().date_policy;
    let start = NaiveDate::from_ymd_opt(2024, 8, 10).unwrap();

    assert!(policy
        .validate(DateSelection::days(start, start + Duration::days(7)))
        .is_ok());
    assert_eq!(
        policy.validate(DateSelection::days(start, start + Duration::days(8))),
        Err(SelectionRejection::RangeTooLong {
            max_span_days: 7,
            span_days: 8
        })
    );
    assert!(policy.validate(DateSelection::day(start)).is_ok());
}

/// 以磁碟儲存模擬整個頁面生命週期：載入、修改、重新開啟
#[tokio::test]
async fn test_profile_survives_page_reload() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = AppConfig::default();

    let store = KvProfileStore::with_options(
        LocalStorage::new(temp_dir.path()),
        config.storage.profile_key.clone(),
        config.profile_defaults(),
    );
    let mut page = ProfilePageController::new(store, config.page_settings());
    page.start(jeju_items()).await;

    assert_eq!(page.profile(), &ProfileDefaults::default().profile());

    page.handle(PageIntent::EditNickname).await?;
    let outcome = page
        .handle(PageIntent::ConfirmNickname("hallabong".to_string()))
        .await?;
    assert!(matches!(
        outcome,
        IntentOutcome::ProfileSaved(SaveStatus::Persisted)
    ));

    let outcome = page
        .handle(PageIntent::ImageSelected(Some(
            "https://cdn.example.com/avatars/hallabong.png".to_string(),
        )))
        .await?;
    assert!(matches!(
        outcome,
        IntentOutcome::ProfileSaved(SaveStatus::Persisted)
    ));

    // 重新開啟頁面
    let reopened_store = KvProfileStore::with_options(
        LocalStorage::new(temp_dir.path()),
        config.storage.profile_key.clone(),
        config.profile_defaults(),
    );
    let mut reopened = ProfilePageController::new(reopened_store, config.page_settings());
    reopened.start(Vec::new()).await;

    assert_eq!(reopened.profile().nickname, "hallabong");
    assert_eq!(
        reopened.profile().profile_image.as_str(),
        "https://cdn.example.com/avatars/hallabong.png"
    );
    assert!(reopened.view().show_empty_state);

    Ok(())
}

#[tokio::test]
async fn test_save_then_load_round_trip_on_disk() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = KvProfileStore::new(LocalStorage::new(temp_dir.path()));

    let profile = UserProfile {
        nickname: "탐탐이".to_string(),
        profile_image: tamna_mypage::ImageRef("file:///home/me/avatar.png".to_string()),
    };
    store.save(&profile).await?;

    assert_eq!(store.load().await, profile);
    Ok(())
}

#[tokio::test]
async fn test_corrupted_record_on_disk_falls_back_to_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    tokio::fs::write(temp_dir.path().join("userInfo.json"), b"{\"nickname\": ").await?;

    let store = KvProfileStore::new(LocalStorage::new(temp_dir.path()));
    assert_eq!(store.load().await, ProfileDefaults::default().profile());

    // 下一次儲存會覆蓋損壞的紀錄
    let mut page = ProfilePageController::new(store, Default::default());
    page.start(Vec::new()).await;
    let status = page.confirm_nickname("fresh").await?;
    assert!(status.is_persisted());

    let raw = tokio::fs::read_to_string(temp_dir.path().join("userInfo.json")).await?;
    let stored: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(stored["nickname"], "fresh");
    Ok(())
}

#[tokio::test]
async fn test_csv_snapshot_drives_listing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv_path = temp_dir.path().join("trips.csv");
    tokio::fs::write(
        &csv_path,
        "id,title,tags,date\n\
         1,Jeju Beach,\"beach,summer\",2024-05-01\n\
         2,Hallasan Hike,mountain,2024-06-01\n\
         3,Hyeopjae Sunset,\"Beach, sunset\",2024-06-01\n",
    )
    .await?;

    let items = itinerary_source::load_itineraries(&csv_path).await?;
    let store = KvProfileStore::new(LocalStorage::new(temp_dir.path().join("state")));
    let mut page = ProfilePageController::new(store, Default::default());

    assert_eq!(ids(page.start(items).await), vec!["2", "3", "1"]);
    assert_eq!(ids(page.set_search_term("BEACH")), vec!["3", "1"]);
    assert_eq!(ids(page.set_sort_mode(SortMode::Oldest)), vec!["1", "3"]);
    Ok(())
}

#[tokio::test]
async fn test_configured_span_limit_reaches_controller() -> Result<()> {
    let config = AppConfig::from_toml_str("[calendar]\nmax_span_days = 3\n")?;
    let temp_dir = TempDir::new()?;
    let store = KvProfileStore::new(LocalStorage::new(temp_dir.path()));
    let mut page = ProfilePageController::new(store, config.page_settings());
    page.start(Vec::new()).await;

    let start = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
    let outcome = page
        .handle(PageIntent::DatesSelected(DateSelection::days(
            start,
            start + Duration::days(4),
        )))
        .await?;

    assert!(matches!(
        outcome,
        IntentOutcome::DatesRejected(SelectionRejection::RangeTooLong {
            max_span_days: 3,
            span_days: 4
        })
    ));
    assert!(page.selected_dates().is_none());
    Ok(())
}
