//! Application state and the operations that mutate it.
//!
//! The controller owns the fair collection, the current selection and the
//! transient UI flags. Views read through the accessor methods and change
//! state only through the named operations. Every change to the collection
//! is persisted before the operation returns.
//!
//! Selection is stored as ids and resolved against the collection on every
//! read, so the selected fair can never drift from its canonical copy.
//!
//! State sits behind a mutex that is never held across an await. Overlapping
//! calls (a double-submitted `add_fair`, say) each land without lost updates.

use parking_lot::Mutex;

use crate::enrich::Enricher;
use crate::error::{FairDeskError, FairDeskResult};
use crate::fair::{Meeting, MeetingStatus, PrepResult, TradeFair};
use crate::store::FairStore;

#[derive(Debug, Default)]
struct AppState {
    fairs: Vec<TradeFair>,
    selected_fair: Option<String>,
    selected_meeting: Option<String>,
    /// In-flight fair enrichments
    searching: usize,
    /// In-flight meeting preps
    prep_loading: usize,
    prep_result: Option<PrepResult>,
    /// Bumped whenever the prep panel is reset; a prep response is applied
    /// only if the generation it started under is still current.
    prep_generation: u64,
}

impl AppState {
    fn fair(&self, fair_id: &str) -> Option<&TradeFair> {
        self.fairs.iter().find(|f| f.id == fair_id)
    }

    fn selected_fair(&self) -> Option<&TradeFair> {
        self.selected_fair.as_deref().and_then(|id| self.fair(id))
    }

    fn selected_meeting(&self) -> Option<&Meeting> {
        let meeting_id = self.selected_meeting.as_deref()?;
        self.selected_fair()?.meeting(meeting_id)
    }

    fn reset_prep(&mut self) {
        self.prep_result = None;
        self.prep_generation += 1;
    }

    fn clear_meeting_selection(&mut self) {
        self.selected_meeting = None;
        self.reset_prep();
    }

    fn counter(&mut self, activity: Activity) -> &mut usize {
        match activity {
            Activity::Searching => &mut self.searching,
            Activity::PrepLoading => &mut self.prep_loading,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Activity {
    Searching,
    PrepLoading,
}

/// Holds an activity flag raised until dropped, whichever way the operation
/// exits.
struct ActivityGuard<'a> {
    state: &'a Mutex<AppState>,
    activity: Activity,
}

impl<'a> ActivityGuard<'a> {
    fn begin(state: &'a Mutex<AppState>, activity: Activity) -> Self {
        *state.lock().counter(activity) += 1;
        ActivityGuard { state, activity }
    }
}

impl Drop for ActivityGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        let counter = state.counter(self.activity);
        *counter = counter.saturating_sub(1);
    }
}

pub struct Controller {
    state: Mutex<AppState>,
    store: FairStore,
    enricher: Box<dyn Enricher>,
}

impl Controller {
    /// Build a controller over the persisted collection.
    pub fn new(store: FairStore, enricher: impl Enricher + 'static) -> Self {
        let fairs = store.load();
        tracing::debug!(count = fairs.len(), "Loaded fairs");

        Controller {
            state: Mutex::new(AppState {
                fairs,
                ..AppState::default()
            }),
            store,
            enricher: Box::new(enricher),
        }
    }

    // MUTATIONS:

    /// Add a fair, enriched on a best-effort basis.
    ///
    /// The fair is always added once the name is valid: if enrichment fails
    /// it gets "TBD" placeholders and no description instead.
    pub async fn add_fair(&self, name: &str) -> FairDeskResult<TradeFair> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FairDeskError::InvalidInput("Fair name must not be empty".into()));
        }

        let _searching = ActivityGuard::begin(&self.state, Activity::Searching);

        let fair = match self.enricher.enrich_fair(name).await {
            Ok(enrichment) => TradeFair::enriched(name, enrichment),
            Err(e) => {
                tracing::warn!(
                    fair = name,
                    error = %e,
                    "Fair enrichment failed, adding without details"
                );
                TradeFair::fallback(name)
            }
        };

        let mut state = self.state.lock();
        state.fairs.push(fair.clone());
        self.store.save(&state.fairs)?;

        tracing::info!(fair = %fair.name, id = %fair.id, "Added fair");
        Ok(fair)
    }

    /// Schedule a meeting with default time, place, history and goals.
    pub fn add_meeting(
        &self,
        fair_id: &str,
        contact_name: &str,
        company: Option<&str>,
    ) -> FairDeskResult<Meeting> {
        let contact_name = contact_name.trim();
        let mut state = self.state.lock();

        let fair = state
            .fairs
            .iter_mut()
            .find(|f| f.id == fair_id)
            .ok_or_else(|| FairDeskError::FairNotFound(fair_id.to_string()))?;

        if contact_name.is_empty() {
            return Err(FairDeskError::InvalidInput("Contact name must not be empty".into()));
        }

        let meeting = Meeting::new(&fair.id, contact_name, company);
        fair.meetings.push(meeting.clone());
        self.store.save(&state.fairs)?;

        tracing::info!(meeting = %meeting.id, fair = fair_id, "Added meeting");
        Ok(meeting)
    }

    pub fn set_meeting_status(
        &self,
        meeting_id: &str,
        status: MeetingStatus,
    ) -> FairDeskResult<Meeting> {
        let mut state = self.state.lock();

        let meeting = state
            .fairs
            .iter_mut()
            .flat_map(|f| f.meetings.iter_mut())
            .find(|m| m.id == meeting_id)
            .ok_or_else(|| FairDeskError::MeetingNotFound(meeting_id.to_string()))?;

        meeting.status = status;
        let updated = meeting.clone();
        self.store.save(&state.fairs)?;

        Ok(updated)
    }

    // SELECTION:

    /// Select a fair, or clear the selection with `None`. Moving to a
    /// different fair drops the selected meeting and any prep result.
    pub fn select_fair(&self, fair_id: Option<&str>) -> FairDeskResult<()> {
        let mut state = self.state.lock();

        match fair_id {
            None => {
                state.selected_fair = None;
                state.clear_meeting_selection();
            }
            Some(id) => {
                if state.fair(id).is_none() {
                    return Err(FairDeskError::FairNotFound(id.to_string()));
                }
                if state.selected_fair.as_deref() != Some(id) {
                    state.selected_fair = Some(id.to_string());
                    state.clear_meeting_selection();
                }
            }
        }

        Ok(())
    }

    /// Select a meeting of the selected fair, or clear it with `None`.
    pub fn select_meeting(&self, meeting_id: Option<&str>) -> FairDeskResult<()> {
        let mut state = self.state.lock();

        let Some(id) = meeting_id else {
            state.clear_meeting_selection();
            return Ok(());
        };

        let in_selected_fair = state
            .selected_fair()
            .is_some_and(|fair| fair.meeting(id).is_some());
        if !in_selected_fair {
            return Err(FairDeskError::MeetingNotFound(id.to_string()));
        }

        if state.selected_meeting.as_deref() != Some(id) {
            state.clear_meeting_selection();
            state.selected_meeting = Some(id.to_string());
        }

        Ok(())
    }

    // ENRICHMENT:

    /// Ask the backend for a meeting brief.
    ///
    /// Returns the result that was stored, or `None` when the call failed or
    /// the prep panel moved on (new request, different selection) before it
    /// resolved. Never touches fair or meeting data.
    pub async fn request_meeting_prep(&self, meeting: &Meeting) -> Option<PrepResult> {
        let _loading = ActivityGuard::begin(&self.state, Activity::PrepLoading);

        let generation = {
            let mut state = self.state.lock();
            state.reset_prep();
            state.prep_generation
        };

        match self.enricher.prepare_meeting_brief(&meeting.prep_details()).await {
            Ok(result) => {
                let mut state = self.state.lock();
                if state.prep_generation != generation {
                    tracing::debug!(meeting = %meeting.id, "Discarding stale meeting prep");
                    return None;
                }
                state.prep_result = Some(result.clone());
                Some(result)
            }
            Err(e) => {
                tracing::warn!(meeting = %meeting.id, error = %e, "Meeting prep failed");
                None
            }
        }
    }

    // READERS:

    pub fn fairs(&self) -> Vec<TradeFair> {
        self.state.lock().fairs.clone()
    }

    pub fn find_fair(&self, fair_id: &str) -> Option<TradeFair> {
        self.state.lock().fair(fair_id).cloned()
    }

    pub fn find_meeting(&self, meeting_id: &str) -> Option<Meeting> {
        self.state
            .lock()
            .fairs
            .iter()
            .find_map(|f| f.meeting(meeting_id))
            .cloned()
    }

    pub fn selected_fair(&self) -> Option<TradeFair> {
        self.state.lock().selected_fair().cloned()
    }

    pub fn selected_meeting(&self) -> Option<Meeting> {
        self.state.lock().selected_meeting().cloned()
    }

    pub fn is_searching(&self) -> bool {
        self.state.lock().searching > 0
    }

    pub fn is_prep_loading(&self) -> bool {
        self.state.lock().prep_loading > 0
    }

    pub fn prep_result(&self) -> Option<PrepResult> {
        self.state.lock().prep_result.clone()
    }
}
