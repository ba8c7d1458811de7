//! Page adapter for Hudle venue pages.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::{debug, info};

use super::probes::{self, CourtListProbe};
use super::BrowserSession;
use crate::config::SiteSelectors;
use crate::scrapers::adapter::{AdapterError, AdapterResult, BookingTable, PageAdapter};
use crate::scrapers::html_table::HtmlTable;

/// Drives a Hudle venue page through its booking flow.
pub struct HudleAdapter {
    session: Option<BrowserSession>,
    selectors: SiteSelectors,
    poll_interval: Duration,
}

impl HudleAdapter {
    pub fn new(session: BrowserSession, selectors: SiteSelectors, poll_interval: Duration) -> Self {
        Self {
            session: Some(session),
            selectors,
            poll_interval,
        }
    }

    fn session(&self) -> AdapterResult<&BrowserSession> {
        self.session
            .as_ref()
            .ok_or_else(|| AdapterError::Browser("browser session already closed".to_string()))
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> AdapterResult<T> {
        self.session()?
            .page()
            .evaluate(script)
            .await
            .map_err(AdapterError::browser)?
            .into_value::<T>()
            .map_err(AdapterError::browser)
    }

    /// Re-evaluate `script` until `ready` accepts its value or `timeout` passes.
    ///
    /// Evaluation errors while the page is mid-transition count as "not ready".
    async fn poll<T, F>(
        &self,
        what: &str,
        timeout: Duration,
        script: String,
        ready: F,
    ) -> AdapterResult<T>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match tokio::time::timeout(remaining, self.eval::<T>(script.clone())).await {
                Ok(Ok(value)) if ready(&value) => return Ok(value),
                Ok(Ok(_)) => {}
                Ok(Err(e)) => debug!("Probe for {} failed: {}", what, e),
                Err(_) => {}
            }

            if Instant::now() + self.poll_interval >= deadline {
                return Err(AdapterError::timeout(what, timeout));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn wait_for_court_list(&self, timeout: Duration) -> AdapterResult<usize> {
        let probe: CourtListProbe = self
            .poll(
                "court list",
                timeout,
                probes::court_list(&self.selectors),
                CourtListProbe::is_settled,
            )
            .await?;
        Ok(probe.count)
    }
}

#[async_trait]
impl PageAdapter for HudleAdapter {
    async fn open_venue(&mut self, url: &str) -> AdapterResult<()> {
        info!("Navigating to {}", url);
        self.session()?
            .page()
            .goto(url)
            .await
            .map_err(|e| AdapterError::Browser(format!("Failed to load {}: {}", url, e)))?;
        Ok(())
    }

    async fn activate_booking(&mut self, timeout: Duration) -> AdapterResult<()> {
        self.poll(
            "booking button",
            timeout,
            probes::click_activity(&self.selectors),
            |clicked: &bool| *clicked,
        )
        .await?;
        Ok(())
    }

    async fn list_courts(&mut self, timeout: Duration) -> AdapterResult<usize> {
        let count = self.wait_for_court_list(timeout).await?;
        if count == 0 {
            info!("Venue page reports no bookable courts");
        }
        Ok(count)
    }

    async fn court_name(&mut self, index: usize) -> AdapterResult<String> {
        self.eval::<Option<String>>(probes::court_name(&self.selectors, index))
            .await?
            .ok_or_else(|| AdapterError::NotFound(format!("name of court {}", index + 1)))
    }

    async fn select_court(&mut self, index: usize) -> AdapterResult<()> {
        let clicked: bool = self
            .eval(probes::click_court(&self.selectors, index))
            .await?;
        if clicked {
            Ok(())
        } else {
            Err(AdapterError::NotFound(format!(
                "booking button of court {}",
                index + 1
            )))
        }
    }

    async fn wait_for_table(&mut self, timeout: Duration) -> AdapterResult<Box<dyn BookingTable>> {
        let html: Option<String> = self
            .poll(
                "slot table",
                timeout,
                probes::table_html(&self.selectors),
                |html: &Option<String>| html.is_some(),
            )
            .await?;
        let html = html.unwrap_or_default();
        let table = HtmlTable::parse(&html, &self.selectors.date_selector)?;
        Ok(Box::new(table))
    }

    async fn return_to_courts(&mut self, timeout: Duration) -> AdapterResult<()> {
        let _: bool = self.eval(probes::HISTORY_BACK.to_string()).await?;
        self.wait_for_court_list(timeout).await?;
        Ok(())
    }

    async fn close(&mut self) -> AdapterResult<()> {
        match self.session.take() {
            Some(session) => session.close().await,
            None => Ok(()),
        }
    }
}
