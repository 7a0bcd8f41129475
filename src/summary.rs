//! Localized summaries with a single fallback to the default language.

use crate::api::SummaryClient;
use crate::error::{LookupError, LookupResult};
use crate::language::LanguageCode;
use crate::models::{PlaceName, Summary};
use tracing::{error, info, warn};

/// Why the requested language was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The language has no article for the place.
    NoArticle,
    /// The request itself failed.
    Error,
}

impl From<&LookupError> for FallbackReason {
    fn from(e: &LookupError) -> Self {
        if e.is_absence() {
            FallbackReason::NoArticle
        } else {
            FallbackReason::Error
        }
    }
}

/// Terminal result of one fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    /// Found in the requested language.
    Displayed(Summary),
    /// Found only in the default language.
    DisplayedFallback { summary: Summary, requested: LanguageCode },
    /// No article, even in the default language.
    NoArticle { place: PlaceName, language: LanguageCode },
    /// The last attempt broke at the transport level.
    Failed { place: PlaceName, language: LanguageCode },
}

#[derive(Clone)]
pub struct SummaryFetcher {
    client: SummaryClient,
}

impl SummaryFetcher {
    pub fn new(client: SummaryClient) -> Self {
        Self { client }
    }

    pub fn default_language(&self) -> LanguageCode {
        LanguageCode::default()
    }

    /// Tries `language`, then at most once the default language.
    ///
    /// `on_fallback` runs between the two attempts so the caller can show an
    /// interim notice. It is never called when `language` already is the
    /// default.
    pub async fn fetch_summary<F>(&self, place: &PlaceName, language: LanguageCode, on_fallback: F) -> SummaryOutcome
    where
        F: FnOnce(LanguageCode, FallbackReason),
    {
        let err = match self.attempt(place, language).await {
            Ok(summary) => return SummaryOutcome::Displayed(summary),
            Err(e) => e,
        };

        if language.is_default() {
            return Self::terminal(place, language, &err);
        }
        let fallback = self.default_language();

        on_fallback(language, FallbackReason::from(&err));
        info!(
            "Falling back from {} to {} for {:?}",
            language, fallback, place.as_str()
        );

        match self.attempt(place, fallback).await {
            Ok(summary) => SummaryOutcome::DisplayedFallback {
                summary,
                requested: language,
            },
            Err(e) => Self::terminal(place, fallback, &e),
        }
    }

    async fn attempt(&self, place: &PlaceName, language: LanguageCode) -> LookupResult<Summary> {
        let result = self.client.summary(place, language).await;
        match &result {
            Ok(_) => info!("Summary for {:?} found in {}", place.as_str(), language),
            Err(e) if e.is_absence() => warn!("No {} article for {:?}: {}", language, place.as_str(), e),
            Err(e) => error!("Summary request for {:?} in {} failed: {}", place.as_str(), language, e),
        }
        result
    }

    fn terminal(place: &PlaceName, language: LanguageCode, err: &LookupError) -> SummaryOutcome {
        match FallbackReason::from(err) {
            FallbackReason::NoArticle => SummaryOutcome::NoArticle {
                place: place.clone(),
                language,
            },
            FallbackReason::Error => SummaryOutcome::Failed {
                place: place.clone(),
                language,
            },
        }
    }
}
