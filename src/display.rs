//! What the pipeline shows, and the surface it shows it on.

use crate::language::LanguageCode;
use crate::models::{Coordinate, PlaceName, Summary};
use crate::summary::{FallbackReason, SummaryOutcome};
use std::fmt;

/// Content for the info panel. Each value replaces the previous one whole.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayContent {
    /// Nothing selected yet.
    Welcome,
    Loading,
    /// Shown while the default-language retry is in flight.
    FallbackNotice {
        requested: LanguageCode,
        fallback: LanguageCode,
        reason: FallbackReason,
    },
    Article {
        summary: Summary,
        /// Set when the article is in the default language instead of this one.
        fallback_from: Option<LanguageCode>,
    },
    NoArticle {
        place: PlaceName,
        language: LanguageCode,
    },
    Error,
}

impl DisplayContent {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DisplayContent::Article { .. } | DisplayContent::NoArticle { .. } | DisplayContent::Error
        )
    }
}

impl From<SummaryOutcome> for DisplayContent {
    fn from(outcome: SummaryOutcome) -> Self {
        match outcome {
            SummaryOutcome::Displayed(summary) => DisplayContent::Article {
                summary,
                fallback_from: None,
            },
            SummaryOutcome::DisplayedFallback { summary, requested } => DisplayContent::Article {
                summary,
                fallback_from: Some(requested),
            },
            SummaryOutcome::NoArticle { place, language } => DisplayContent::NoArticle { place, language },
            SummaryOutcome::Failed { .. } => DisplayContent::Error,
        }
    }
}

// Plain-text rendering; the TUI styles the article case itself.
impl fmt::Display for DisplayContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayContent::Welcome => write!(f, "Move the crosshair and press Enter to explore a place."),
            DisplayContent::Loading => write!(f, "🔄 Fetching location info…"),
            DisplayContent::FallbackNotice {
                requested,
                fallback,
                reason: FallbackReason::NoArticle,
            } => write!(
                f,
                "⚠️ No article in {}. Trying {}…",
                requested.display_name(),
                fallback.display_name()
            ),
            DisplayContent::FallbackNotice {
                requested,
                fallback,
                reason: FallbackReason::Error,
            } => write!(
                f,
                "⚠️ Error in {}. Trying {}…",
                requested.display_name(),
                fallback.display_name()
            ),
            DisplayContent::Article { summary, .. } => {
                write!(f, "[{}] {}\n\n{}", summary.language.display_name(), summary.title, summary.extract)?;
                if !summary.article_url.is_empty() {
                    write!(f, "\n\n🔗 Read more: {}", summary.article_url)?;
                }
                Ok(())
            }
            DisplayContent::NoArticle { place, language } => {
                write!(f, "❌ No article for “{}” in {}", place, language.display_name())
            }
            DisplayContent::Error => write!(f, "⚠️ Error fetching Wikipedia data."),
        }
    }
}

/// The map and info panel, as seen by the selection pipeline.
///
/// Implementations must keep at most one pin: `set_pin` at the pinned
/// coordinate updates its label, `remove_pin` clears it.
pub trait DisplaySurface: Send + Sync {
    fn set_pin(&self, at: Coordinate, label: Option<String>);
    fn remove_pin(&self);
    fn set_content(&self, content: DisplayContent);
}
