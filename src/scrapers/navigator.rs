//! Venue navigation.
//!
//! Drives one open page through the booking flow: load the venue, open the
//! booking activity, list courts, then for each court render its table,
//! extract it and return to the court list.

use std::fmt;

use thiserror::Error;

use super::adapter::{AdapterError, PageAdapter};
use super::events::{EventSink, NavigationState, ScrapeEvent};
use super::table::extract_court;
use crate::config::NavigationSettings;
use crate::models::CourtResult;

/// Coarse navigation steps whose failure ends a scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationStage {
    LoadVenue,
    OpenActivity,
    ListCourts,
}

impl fmt::Display for NavigationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LoadVenue => "loading the venue page",
            Self::OpenActivity => "opening the booking activity",
            Self::ListCourts => "listing courts",
        })
    }
}

/// Failures that end a venue scrape.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to open browser session: {0}")]
    Session(#[source] AdapterError),

    #[error("navigation failed while {stage}: {source}")]
    Navigation {
        stage: NavigationStage,
        #[source]
        source: AdapterError,
    },

    #[error("scrape aborted: {0}")]
    Panicked(String),
}

impl ScrapeError {
    fn at(stage: NavigationStage) -> impl FnOnce(AdapterError) -> Self {
        move |source| Self::Navigation { stage, source }
    }
}

/// Walks the courts of one venue over an already-open page.
pub struct CourtNavigator<'a> {
    adapter: &'a mut dyn PageAdapter,
    settings: &'a NavigationSettings,
    sink: &'a dyn EventSink,
}

impl<'a> CourtNavigator<'a> {
    pub fn new(
        adapter: &'a mut dyn PageAdapter,
        settings: &'a NavigationSettings,
        sink: &'a dyn EventSink,
    ) -> Self {
        Self {
            adapter,
            settings,
            sink,
        }
    }

    /// Scrape up to the configured number of courts.
    ///
    /// Only failures before the court loop are returned; a court that fails
    /// is reported and left out of the results.
    pub async fn run(
        &mut self,
        venue_url: &str,
        venue_name: &str,
    ) -> Result<Vec<CourtResult>, ScrapeError> {
        self.adapter
            .open_venue(venue_url)
            .await
            .map_err(ScrapeError::at(NavigationStage::LoadVenue))?;
        self.stage(NavigationState::PageLoaded, None);

        self.adapter
            .activate_booking(self.settings.element_timeout())
            .await
            .map_err(ScrapeError::at(NavigationStage::OpenActivity))?;
        self.stage(NavigationState::ActivityOpened, None);

        let listed = self
            .adapter
            .list_courts(self.settings.element_timeout())
            .await
            .map_err(ScrapeError::at(NavigationStage::ListCourts))?;
        let selected = listed.min(self.settings.court_limit());
        self.stage(NavigationState::CourtListed, None);
        self.sink.emit(ScrapeEvent::CourtsListed { listed, selected });

        let mut courts = Vec::with_capacity(selected);
        for index in 0..selected {
            let court_name = self.court_name(index).await;

            if let Err(e) = self.adapter.select_court(index).await {
                self.skip_court(index, &court_name, e);
                continue;
            }
            self.stage(NavigationState::CourtSelected, Some(&court_name));

            match self.extract_selected(venue_name, &court_name).await {
                Ok(court) => courts.push(court),
                Err(e) => self.skip_court(index, &court_name, e),
            }

            // The page has left the court list once a court is selected
            self.return_to_courts(&court_name).await;
        }

        self.stage(NavigationState::Done, None);
        Ok(courts)
    }

    async fn court_name(&mut self, index: usize) -> String {
        match self.adapter.court_name(index).await {
            Ok(name) if !name.trim().is_empty() => name.trim().to_string(),
            other => {
                let name = placeholder_name(index);
                let error = match other {
                    Err(e) => e.to_string(),
                    Ok(_) => "empty court name".to_string(),
                };
                self.sink.emit(ScrapeEvent::CourtNameFallback {
                    index,
                    name: name.clone(),
                    error,
                });
                name
            }
        }
    }

    async fn extract_selected(
        &mut self,
        venue_name: &str,
        court_name: &str,
    ) -> Result<CourtResult, AdapterError> {
        let table = self
            .adapter
            .wait_for_table(self.settings.render_timeout())
            .await?;
        self.stage(NavigationState::TableRendered, Some(court_name));

        let court = extract_court(table.as_ref(), venue_name, court_name, self.sink);
        self.stage(NavigationState::CourtResultReady, Some(court_name));
        Ok(court)
    }

    fn skip_court(&self, index: usize, court_name: &str, error: AdapterError) {
        self.sink.emit(ScrapeEvent::CourtSkipped {
            index,
            court: court_name.to_string(),
            error: error.to_string(),
        });
    }

    async fn return_to_courts(&mut self, court_name: &str) {
        if let Err(e) = self
            .adapter
            .return_to_courts(self.settings.return_timeout())
            .await
        {
            self.sink.emit(ScrapeEvent::ReturnFailed {
                court: court_name.to_string(),
                error: e.to_string(),
            });
        }
    }

    fn stage(&self, state: NavigationState, court: Option<&str>) {
        self.sink.emit(ScrapeEvent::Stage {
            state,
            court: court.map(str::to_string),
        });
    }
}

/// Name used when a court's own name cannot be read ("Court 1" for index 0).
pub fn placeholder_name(index: usize) -> String {
    format!("Court {}", index + 1)
}
