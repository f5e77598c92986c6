//! Profile page state: owns the profile, the search/sort inputs and the
//! derived itinerary list, and turns user intents into state changes.
//!
//! Profile mutations are applied to memory first and then persisted. Each
//! mutation issues a [`PendingSave`] with an increasing generation; only the
//! completion of the newest one is reported, older completions are
//! [`SaveStatus::Superseded`]. A snapshot is never written once a newer one
//! has reached the store, whatever order the writes are started in.

use crate::core::date_range::{DateRangePolicy, SelectionRejection};
use crate::core::itinerary_filter;
use crate::core::profile_image::resolve_image_ref;
use crate::domain::model::{
    DateSelection, Itinerary, ProfileDefaults, SearchState, SortMode, UserProfile,
};
use crate::domain::ports::ProfileStore;
use crate::utils::error::{MyPageError, Result};
use crate::utils::validation::validate_non_empty_string;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSettings {
    pub default_sort: SortMode,
    /// Trim the search term before matching. Off by default: `" "` is a
    /// literal search for a space.
    pub trim_search_term: bool,
    pub date_policy: DateRangePolicy,
    /// Shown while the stored profile is still loading.
    pub profile_defaults: ProfileDefaults,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            default_sort: SortMode::Newest,
            trim_search_term: false,
            date_policy: DateRangePolicy::default(),
            profile_defaults: ProfileDefaults::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePhase {
    Loading,
    Ready,
}

/// A profile snapshot waiting to be written.
#[derive(Debug, Clone)]
pub struct PendingSave {
    generation: u64,
    profile: UserProfile,
    // newest generation that has reached the store, shared by every save of one page
    last_written: Arc<Mutex<u64>>,
}

impl PendingSave {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Writes the snapshot unless a newer one already reached the store.
    /// A newer write that failed still blocks older snapshots.
    pub async fn persist<P: ProfileStore + ?Sized>(self, store: &P) -> SaveCompletion {
        let mut last_written = self.last_written.lock().await;
        if *last_written > self.generation {
            tracing::debug!(
                "Skipping write of save #{}, #{} already reached the store",
                self.generation,
                *last_written
            );
            return SaveCompletion {
                generation: self.generation,
                result: None,
            };
        }

        *last_written = self.generation;
        let result = store.save(&self.profile).await;
        SaveCompletion {
            generation: self.generation,
            result: Some(result),
        }
    }
}

#[derive(Debug)]
pub struct SaveCompletion {
    generation: u64,
    // None when the write was skipped for a newer snapshot
    result: Option<Result<()>>,
}

#[derive(Debug)]
pub enum SaveStatus {
    Persisted,
    /// The in-memory profile keeps the new value; only durability was lost.
    Failed(MyPageError),
    /// A newer save was issued after this one; its outcome is discarded.
    Superseded,
}

impl SaveStatus {
    pub fn is_persisted(&self) -> bool {
        matches!(self, SaveStatus::Persisted)
    }
}

/// Everything the rendering layer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub phase: PagePhase,
    pub profile: &'a UserProfile,
    pub search: &'a SearchState,
    pub itineraries: &'a [Itinerary],
    /// No itineraries to show: render the "plan a trip" call to action.
    pub show_empty_state: bool,
    pub nickname_editor_open: bool,
    pub selected_dates: Option<DateSelection>,
    pub persistence_warning: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageIntent {
    SearchChanged(String),
    SortChanged(SortMode),
    ItinerariesChanged(Vec<Itinerary>),
    EditNickname,
    CancelNicknameEdit,
    ConfirmNickname(String),
    /// `None` when the picker was dismissed without a file.
    ImageSelected(Option<String>),
    DatesSelected(DateSelection),
}

#[derive(Debug)]
pub enum IntentOutcome {
    ListUpdated,
    EditorToggled,
    ProfileSaved(SaveStatus),
    Unchanged,
    DatesAccepted(DateSelection),
    /// The host must not commit the selection and should re-prompt.
    DatesRejected(SelectionRejection),
}

pub struct ProfilePageController<P: ProfileStore> {
    store: P,
    settings: PageSettings,
    phase: PagePhase,
    profile: UserProfile,
    items: Vec<Itinerary>,
    search: SearchState,
    display: Vec<Itinerary>,
    nickname_editor_open: bool,
    selected_dates: Option<DateSelection>,
    issued_saves: u64,
    last_written: Arc<Mutex<u64>>,
    persistence_warning: Option<String>,
}

impl<P: ProfileStore> ProfilePageController<P> {
    pub fn new(store: P, settings: PageSettings) -> Self {
        let search = SearchState {
            search_term: String::new(),
            sort_mode: settings.default_sort,
        };

        let profile = settings.profile_defaults.profile();

        Self {
            store,
            settings,
            phase: PagePhase::Loading,
            profile,
            items: Vec::new(),
            search,
            display: Vec::new(),
            nickname_editor_open: false,
            selected_dates: None,
            issued_saves: 0,
            last_written: Arc::new(Mutex::new(0)),
            persistence_warning: None,
        }
    }

    /// Loads the profile and derives the first list. Runs once; later calls
    /// only replace the itinerary snapshot.
    pub async fn start(&mut self, items: Vec<Itinerary>) -> &[Itinerary] {
        if self.phase == PagePhase::Ready {
            tracing::warn!("Profile page already started, keeping loaded profile");
            return self.set_itineraries(items);
        }

        self.profile = self.store.load().await;
        self.phase = PagePhase::Ready;
        tracing::info!("Profile page ready for '{}'", self.profile.nickname);

        self.set_itineraries(items)
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn itineraries(&self) -> &[Itinerary] {
        &self.display
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn view(&self) -> PageView<'_> {
        PageView {
            phase: self.phase,
            profile: &self.profile,
            search: &self.search,
            itineraries: &self.display,
            show_empty_state: self.display.is_empty(),
            nickname_editor_open: self.nickname_editor_open,
            selected_dates: self.selected_dates,
            persistence_warning: self.persistence_warning.as_deref(),
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) -> &[Itinerary] {
        self.search.search_term = term.into();
        self.rederive()
    }

    pub fn set_sort_mode(&mut self, sort_mode: SortMode) -> &[Itinerary] {
        self.search.sort_mode = sort_mode;
        self.rederive()
    }

    pub fn set_itineraries(&mut self, items: Vec<Itinerary>) -> &[Itinerary] {
        self.items = items;
        self.rederive()
    }

    fn rederive(&mut self) -> &[Itinerary] {
        let term = if self.settings.trim_search_term {
            self.search.search_term.trim()
        } else {
            self.search.search_term.as_str()
        };
        self.display = itinerary_filter::derive(&self.items, term, self.search.sort_mode);
        &self.display
    }

    pub fn open_nickname_editor(&mut self) {
        self.nickname_editor_open = true;
    }

    pub fn cancel_nickname_edit(&mut self) {
        self.nickname_editor_open = false;
    }

    pub fn nickname_editor_open(&self) -> bool {
        self.nickname_editor_open
    }

    /// Applies a confirmed nickname and closes the editor. A blank nickname
    /// is refused and leaves the editor open.
    pub fn update_nickname(&mut self, nickname: &str) -> Result<PendingSave> {
        self.ensure_ready()?;
        validate_non_empty_string("nickname", nickname).map_err(|_| {
            MyPageError::ValidationError {
                message: "nickname cannot be blank".to_string(),
            }
        })?;

        self.profile.nickname = nickname.to_string();
        self.nickname_editor_open = false;
        tracing::info!("Nickname changed to '{}'", self.profile.nickname);

        Ok(self.issue_save())
    }

    /// Applies a picked image and closes the nickname editor. `None` (picker
    /// dismissed) changes nothing.
    pub fn update_profile_image(&mut self, selected: Option<&str>) -> Result<Option<PendingSave>> {
        self.ensure_ready()?;
        let Some(selected) = selected else {
            return Ok(None);
        };

        self.profile.profile_image = resolve_image_ref(selected)?;
        self.nickname_editor_open = false;
        tracing::info!("Profile image changed to {}", self.profile.profile_image);

        Ok(Some(self.issue_save()))
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.phase {
            PagePhase::Ready => Ok(()),
            PagePhase::Loading => Err(MyPageError::PageNotReady),
        }
    }

    fn issue_save(&mut self) -> PendingSave {
        self.issued_saves += 1;
        PendingSave {
            generation: self.issued_saves,
            profile: self.profile.clone(),
            last_written: Arc::clone(&self.last_written),
        }
    }

    /// Records the outcome of a write. Completions older than the latest
    /// issued save, and skipped writes, are discarded.
    pub fn complete_save(&mut self, completion: SaveCompletion) -> SaveStatus {
        let result = match completion.result {
            Some(result) if completion.generation >= self.issued_saves => result,
            _ => {
                tracing::debug!(
                    "Discarding save #{} result, #{} is newer",
                    completion.generation,
                    self.issued_saves
                );
                return SaveStatus::Superseded;
            }
        };

        match result {
            Ok(()) => {
                self.persistence_warning = None;
                SaveStatus::Persisted
            }
            Err(e) => {
                tracing::warn!("Profile kept in memory but not saved: {}", e);
                self.persistence_warning = Some(e.user_friendly_message());
                SaveStatus::Failed(e)
            }
        }
    }

    pub async fn confirm_nickname(&mut self, nickname: &str) -> Result<SaveStatus> {
        let pending = self.update_nickname(nickname)?;
        Ok(self.persist_now(pending).await)
    }

    /// `Ok(None)` when the picker was dismissed and nothing was saved.
    pub async fn change_profile_image(
        &mut self,
        selected: Option<&str>,
    ) -> Result<Option<SaveStatus>> {
        match self.update_profile_image(selected)? {
            Some(pending) => Ok(Some(self.persist_now(pending).await)),
            None => Ok(None),
        }
    }

    async fn persist_now(&mut self, pending: PendingSave) -> SaveStatus {
        let completion = pending.persist(&self.store).await;
        self.complete_save(completion)
    }

    /// Validates a calendar emission; only accepted selections are kept.
    pub fn select_dates(
        &mut self,
        selection: DateSelection,
    ) -> std::result::Result<DateSelection, SelectionRejection> {
        let accepted = self.settings.date_policy.validate(selection)?;
        self.selected_dates = Some(accepted);
        Ok(accepted)
    }

    pub fn selected_dates(&self) -> Option<DateSelection> {
        self.selected_dates
    }

    pub async fn handle(&mut self, intent: PageIntent) -> Result<IntentOutcome> {
        let outcome = match intent {
            PageIntent::SearchChanged(term) => {
                self.set_search_term(term);
                IntentOutcome::ListUpdated
            }
            PageIntent::SortChanged(sort_mode) => {
                self.set_sort_mode(sort_mode);
                IntentOutcome::ListUpdated
            }
            PageIntent::ItinerariesChanged(items) => {
                self.set_itineraries(items);
                IntentOutcome::ListUpdated
            }
            PageIntent::EditNickname => {
                self.open_nickname_editor();
                IntentOutcome::EditorToggled
            }
            PageIntent::CancelNicknameEdit => {
                self.cancel_nickname_edit();
                IntentOutcome::EditorToggled
            }
            PageIntent::ConfirmNickname(nickname) => {
                IntentOutcome::ProfileSaved(self.confirm_nickname(&nickname).await?)
            }
            PageIntent::ImageSelected(selected) => {
                match self.change_profile_image(selected.as_deref()).await? {
                    Some(status) => IntentOutcome::ProfileSaved(status),
                    None => IntentOutcome::Unchanged,
                }
            }
            PageIntent::DatesSelected(selection) => match self.select_dates(selection) {
                Ok(accepted) => IntentOutcome::DatesAccepted(accepted),
                Err(rejection) => IntentOutcome::DatesRejected(rejection),
            },
        };
        Ok(outcome)
    }
}
