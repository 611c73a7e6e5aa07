use chrono::NaiveDate;
use serde::Serialize;
use tokio::task::JoinHandle;

use super::refresh::{DebouncedFetcher, FetchedPage};
use crate::config::Settings;
use crate::errors::{AppError, AppResult};
use crate::models::proposal::filter::matches_all;
use crate::models::proposal::queries::{in_semester_range, latest_first};
use crate::models::proposal::{
    FilterSelection, ProposalListItem, ProposalSource, SemesterFilter, UserContext,
};
use crate::models::semester::Clock;
use crate::models::table_filter::prefs::{clear_pref, load_pref, pref_key, save_pref, PrefStore};
use crate::models::table_filter::{by_properties_of, Comparator};

pub const PROPOSAL_LIST_TABLE: &str = "proposal_list";

/// Newest semester first, then by proposal code.
pub const DEFAULT_SORT: &[&str] = &["-semester", "proposal_code"];

/// Who is looking at the list, and when. Built by the hosting view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListContext {
    pub user: UserContext,
    pub today: NaiveDate,
}

impl ListContext {
    pub fn new(user: UserContext, clock: &impl Clock) -> Self {
        ListContext { user, today: clock.today() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "text", rename_all = "snake_case")]
pub enum ListMessage {
    Error(String),
    Warning(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProposalListOutcome {
    pub proposals: Vec<ProposalListItem>,
    pub messages: Vec<ListMessage>,
    /// The resolved semester range, if resolution succeeded.
    pub range: Option<(String, String)>,
}

impl ProposalListOutcome {
    /// An empty list carrying the error text.
    pub fn failed(error: &AppError) -> Self {
        ProposalListOutcome {
            messages: vec![ListMessage::Error(error.to_string())],
            ..Default::default()
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().filter_map(|m| match m {
            ListMessage::Error(t) => Some(t.as_str()),
            ListMessage::Warning(_) => None,
        })
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().filter_map(|m| match m {
            ListMessage::Warning(t) => Some(t.as_str()),
            ListMessage::Error(_) => None,
        })
    }
}

pub fn truncation_warning(cap: usize) -> String {
    format!(
        "Only the latest {cap} proposals are shown. Further proposals exist but are not shown."
    )
}

/// State behind the proposal list page: the saved filter form plus the
/// ordering applied to whatever proposals are fetched.
pub struct ProposalListView<S: PrefStore> {
    store: S,
    key: String,
    selection: FilterSelection,
    result_cap: usize,
    comparator: Comparator<ProposalListItem>,
}

impl<S: PrefStore> ProposalListView<S> {
    /// Restore the saved selection before anything is filtered.
    pub fn open(store: S, settings: &Settings) -> AppResult<Self> {
        let key = pref_key(PROPOSAL_LIST_TABLE);
        let selection: FilterSelection = load_pref(&store, &key);
        log::debug!(
            "Opened proposal list with semester filter {:?} and {} checkbox filters",
            selection.semester_filter,
            selection.enabled_filters().len()
        );
        Ok(ProposalListView {
            store,
            key,
            selection,
            result_cap: settings.result_cap.max(1),
            comparator: by_properties_of(DEFAULT_SORT)?,
        })
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn result_cap(&self) -> usize {
        self.result_cap
    }

    fn save(&mut self) -> AppResult<()> {
        save_pref(&mut self.store, &self.key, &self.selection)
    }

    pub fn set_semester_filter(&mut self, mode: SemesterFilter) -> AppResult<()> {
        self.selection.set_semester_filter(mode);
        self.save()
    }

    pub fn set_semester_range(&mut self, start: &str, end: &str) -> AppResult<()> {
        self.selection.set_range_inputs(start, end);
        self.save()
    }

    /// Picking a semester from the dropdown also selects the single-semester mode.
    pub fn select_semester(&mut self, semester: &str) -> AppResult<()> {
        self.selection.select_semester(semester);
        self.selection.set_semester_filter(SemesterFilter::SingleSemester);
        self.save()
    }

    pub fn set_filter(&mut self, name: &str, enabled: bool) -> AppResult<()> {
        self.selection.set_filter(name, enabled)?;
        self.save()
    }

    /// Forget the saved selection and start over with the defaults.
    pub fn reset(&mut self) -> AppResult<()> {
        self.selection = FilterSelection::default();
        clear_pref(&mut self.store, &self.key)
    }

    pub fn set_sort_keys(&mut self, keys: &[&str]) -> AppResult<()> {
        self.comparator = by_properties_of(keys)?;
        Ok(())
    }

    pub fn semester_range(&self, ctx: &ListContext) -> AppResult<(String, String)> {
        self.selection.resolve_semesters(ctx.today)
    }

    /// Filter and order proposals that have already been fetched.
    pub fn apply(&self, ctx: &ListContext, proposals: Vec<ProposalListItem>) -> ProposalListOutcome {
        match self.semester_range(ctx) {
            Ok((start, end)) => self.apply_in_range(ctx, &start, &end, proposals),
            Err(e) => {
                log::info!("Proposal list semester filter rejected: {e}");
                ProposalListOutcome::failed(&e)
            }
        }
    }

    fn apply_in_range(
        &self,
        ctx: &ListContext,
        start: &str,
        end: &str,
        proposals: Vec<ProposalListItem>,
    ) -> ProposalListOutcome {
        let mut rows: Vec<ProposalListItem> = proposals
            .into_iter()
            .filter(|p| in_semester_range(p, start, end))
            .collect();

        let mut messages = Vec::new();
        if rows.len() >= self.result_cap {
            rows.sort_by(latest_first);
            rows.truncate(self.result_cap);
            log::info!("Proposal list for {start} to {end} reached the cap of {}", self.result_cap);
            messages.push(ListMessage::Warning(truncation_warning(self.result_cap)));
        }

        let filters = self.selection.enabled_filters();
        rows.retain(|p| matches_all(&filters, p, &ctx.user));
        self.comparator.sort(&mut rows);

        ProposalListOutcome {
            proposals: rows,
            messages,
            range: Some((start.to_string(), end.to_string())),
        }
    }

    /// Resolve the semester range, fetch it and filter the result.
    pub async fn refresh<P: ProposalSource>(&self, ctx: &ListContext, source: &P) -> ProposalListOutcome {
        let (start, end) = match self.semester_range(ctx) {
            Ok(range) => range,
            Err(e) => return ProposalListOutcome::failed(&e),
        };
        match source.fetch(&start, &end, self.result_cap).await {
            Ok(proposals) => self.apply_in_range(ctx, &start, &end, proposals),
            Err(e) => {
                log::error!("Fetching proposals for {start} to {end} failed: {e}");
                ProposalListOutcome {
                    messages: vec![ListMessage::Error(e.to_string())],
                    range: Some((start, end)),
                    ..Default::default()
                }
            }
        }
    }

    /// Ask the fetcher for the current range. Only the last request made
    /// through the fetcher is published to its subscribers. When the range
    /// can't be resolved, requests still in flight are superseded so their
    /// pages never replace the error.
    pub fn request_refresh<P>(&self, ctx: &ListContext, fetcher: &DebouncedFetcher<P>) -> AppResult<JoinHandle<()>>
    where
        P: ProposalSource + 'static,
    {
        match self.semester_range(ctx) {
            Ok((start, end)) => Ok(fetcher.request(&start, &end)),
            Err(e) => {
                let generation = fetcher.supersede();
                log::debug!("Semester filter rejected, superseding requests up to {generation}: {e}");
                Err(e)
            }
        }
    }

    /// Turn a page published by the fetcher into what the list shows.
    ///
    /// Returns `None` for a page that no longer answers the latest request
    /// or the current semester selection; the view keeps what it shows.
    pub fn handle_page<P>(
        &self,
        ctx: &ListContext,
        fetcher: &DebouncedFetcher<P>,
        page: &FetchedPage,
    ) -> Option<ProposalListOutcome>
    where
        P: ProposalSource + 'static,
    {
        if page.generation != fetcher.latest_generation() {
            log::debug!("Ignoring stale page {}", page.generation);
            return None;
        }
        let (start, end) = match self.semester_range(ctx) {
            Ok(range) => range,
            Err(e) => return Some(ProposalListOutcome::failed(&e)),
        };
        if start != page.start || end != page.end {
            log::debug!(
                "Ignoring page for {} to {}, selection is now {start} to {end}",
                page.start,
                page.end
            );
            return None;
        }
        Some(match &page.result {
            Ok(proposals) => self.apply_in_range(ctx, &start, &end, proposals.clone()),
            Err(e) => ProposalListOutcome {
                messages: vec![ListMessage::Error(e.to_string())],
                range: Some((start, end)),
                ..Default::default()
            },
        })
    }
}
