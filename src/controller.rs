//! Selection orchestration.
//!
//! [`SelectionController`] owns the single live selection. A map click runs
//! resolve then fetch; a language change re-runs the fetch alone for the
//! place already resolved.
//!
//! Requests are never cancelled. Instead two counters in [`SelectionState`]
//! decide whether a finishing task may still touch anything: the selection
//! token gates committing a resolved place, the render token gates every
//! write to the display. Starting a new selection or a new fetch bumps them,
//! so whatever the user did last is what ends up on screen.

use crate::display::{DisplayContent, DisplaySurface};
use crate::geocode::GeocodeResolver;
use crate::language::LanguageCode;
use crate::models::{Coordinate, PlaceName};
use crate::summary::{SummaryFetcher, SummaryOutcome};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Where the current selection is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    PinPlaced,
    Resolving,
    SummaryLoading,
    Displayed,
    DisplayedFallback,
    Failed,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::PinPlaced => "pin placed",
            Phase::Resolving => "resolving place",
            Phase::SummaryLoading => "loading summary",
            Phase::Displayed => "displayed",
            Phase::DisplayedFallback => "displayed (fallback)",
            Phase::Failed => "failed",
        }
    }

    fn is_resolving(self) -> bool {
        matches!(self, Phase::PinPlaced | Phase::Resolving)
    }
}

impl From<&SummaryOutcome> for Phase {
    fn from(outcome: &SummaryOutcome) -> Self {
        match outcome {
            SummaryOutcome::Displayed(_) => Phase::Displayed,
            SummaryOutcome::DisplayedFallback { .. } => Phase::DisplayedFallback,
            SummaryOutcome::NoArticle { .. } | SummaryOutcome::Failed { .. } => Phase::Failed,
        }
    }
}

#[derive(Debug, Default)]
pub struct SelectionState {
    current_place: Option<PlaceName>,
    pin: Option<Coordinate>,
    language: LanguageCode,
    phase: Phase,
    selection: u64,
    render: u64,
}

/// A language change claimed by [`SelectionController::begin_language_change`]
/// and not yet fetched.
#[derive(Debug, Clone)]
pub struct SummaryRefresh {
    place: PlaceName,
    language: LanguageCode,
    render: u64,
    pin: Option<Coordinate>,
}

pub struct SelectionController<D> {
    resolver: GeocodeResolver,
    fetcher: SummaryFetcher,
    display: D,
    state: Mutex<SelectionState>,
}

impl<D: DisplaySurface> SelectionController<D> {
    pub fn new(resolver: GeocodeResolver, fetcher: SummaryFetcher, display: D, language: LanguageCode) -> Self {
        Self {
            resolver,
            fetcher,
            display,
            state: Mutex::new(SelectionState {
                language,
                ..Default::default()
            }),
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn language(&self) -> LanguageCode {
        self.state().language
    }

    pub fn current_place(&self) -> Option<PlaceName> {
        self.state().current_place.clone()
    }

    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    /// Replaces the pin, resolves the place and shows its summary.
    pub async fn on_location_selected(&self, at: Coordinate) {
        let token = self.begin_selection(at);
        self.complete_selection(token, at).await;
    }

    /// Resolves and renders a selection started by [`Self::begin_selection`].
    /// Does nothing visible once a later selection has begun.
    pub async fn complete_selection(&self, token: u64, at: Coordinate) {
        let place = self.resolver.resolve(at).await;

        let Some((language, render)) = self.commit_place(token, &place) else {
            debug!("Dropping resolution of {} as {:?}: superseded", at, place.as_str());
            return;
        };
        if place.is_unknown() {
            info!("Selected {} -> no place name, querying the unknown label", at);
        } else {
            info!("Selected {} -> {}", at, place);
        }

        self.render_summary(render, &place, language).await;
        self.label_pin(render, at, &place);
    }

    /// Re-fetches the summary of the current place in `language`.
    ///
    /// Without a resolved place this only records the language. The same
    /// holds while a resolution is in flight: that selection picks the new
    /// language up once it reaches its fetch.
    pub async fn on_language_changed(&self, language: LanguageCode) {
        if let Some(refresh) = self.begin_language_change(language) {
            self.refresh_summary(refresh).await;
        }
    }

    /// Records `language` and, when a place is resolved, claims the display
    /// for a re-fetch. Call in key-press order.
    pub fn begin_language_change(&self, language: LanguageCode) -> Option<SummaryRefresh> {
        let mut state = self.state();
        state.language = language;
        match state.current_place.clone() {
            Some(place) if !state.phase.is_resolving() => {
                state.render += 1;
                state.phase = Phase::SummaryLoading;
                Some(SummaryRefresh {
                    place,
                    language,
                    render: state.render,
                    pin: state.pin,
                })
            }
            _ => {
                debug!("Language set to {}; nothing to refresh yet", language);
                None
            }
        }
    }

    pub async fn refresh_summary(&self, refresh: SummaryRefresh) {
        let SummaryRefresh {
            place,
            language,
            render,
            pin,
        } = refresh;
        self.render_summary(render, &place, language).await;
        if let Some(at) = pin {
            self.label_pin(render, at, &place);
        }
    }

    fn state(&self) -> MutexGuard<'_, SelectionState> {
        // The guarded data stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Starts a selection: invalidates everything in flight, swaps the pin
    /// and shows the loading state. Returns the new selection token.
    ///
    /// Call in click order; the returned token goes to
    /// [`Self::complete_selection`].
    pub fn begin_selection(&self, at: Coordinate) -> u64 {
        let mut state = self.state();
        state.selection += 1;
        state.render += 1;

        self.display.remove_pin();
        self.display.set_pin(at, None);
        state.pin = Some(at);
        state.phase = Phase::PinPlaced;

        self.display.set_content(DisplayContent::Loading);
        state.phase = Phase::Resolving;
        state.selection
    }

    /// Stores a resolved place if `token` is still the live selection, and
    /// hands back the language and render token to fetch with.
    pub(crate) fn commit_place(&self, token: u64, place: &PlaceName) -> Option<(LanguageCode, u64)> {
        let mut state = self.state();
        if state.selection != token {
            return None;
        }
        state.current_place = Some(place.clone());
        state.render += 1;
        state.phase = Phase::SummaryLoading;
        Some((state.language, state.render))
    }

    /// Runs `f` under the state lock if `render` is still current.
    pub(crate) fn gated<F>(&self, render: u64, f: F) -> bool
    where
        F: FnOnce(&mut SelectionState, &D),
    {
        let mut state = self.state();
        if state.render != render {
            return false;
        }
        f(&mut *state, &self.display);
        true
    }

    async fn render_summary(&self, render: u64, place: &PlaceName, language: LanguageCode) {
        let fallback = self.fetcher.default_language();
        let outcome = self
            .fetcher
            .fetch_summary(place, language, |requested, reason| {
                self.gated(render, |_, display| {
                    display.set_content(DisplayContent::FallbackNotice {
                        requested,
                        fallback,
                        reason,
                    })
                });
            })
            .await;

        let phase = Phase::from(&outcome);
        let content = DisplayContent::from(outcome);
        let applied = self.gated(render, |state, display| {
            state.phase = phase;
            display.set_content(content);
        });
        if !applied {
            debug!("Discarding stale summary for {:?}", place.as_str());
        }
    }

    fn label_pin(&self, render: u64, at: Coordinate, place: &PlaceName) {
        self.gated(render, |state, display| {
            if state.pin == Some(at) {
                display.set_pin(at, Some(place.to_string()));
            }
        });
    }
}
