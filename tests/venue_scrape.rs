//! End-to-end venue scrapes over scripted page adapters.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use courtslots::config::NavigationSettings;
use courtslots::scrapers::{
    AdapterError, AdapterResult, BookingTable, HtmlTable, MemorySink, PageAdapter, ScrapeEvent,
    SessionFactory, VenueScraper,
};
use courtslots::{ScrapeStatus, VenueResult};

const DATE_SELECTOR: &str = ".style_date__vVFsu";

const WEEK_TABLE: &str = r#"
    <table class="style_table__gYUfm">
      <tr>
        <th></th>
        <th><span>Mon</span><span class="style_date__vVFsu">14</span></th>
        <th><span>Tue</span><span class="style_date__vVFsu">15</span></th>
      </tr>
      <tr>
        <td>06:00 AM</td>
        <td>₹500</td>
        <td>Booked</td>
      </tr>
      <tr>
        <td>07:00 AM</td>
        <td>2 left ₹600</td>
        <td class="slot_disabled">₹600</td>
      </tr>
    </table>
"#;

#[derive(Clone, Default)]
struct FakeCourt {
    name: Option<&'static str>,
    /// `None` never renders.
    table: Option<&'static str>,
    select_fails: bool,
    panics: bool,
}

impl FakeCourt {
    fn named(name: &'static str) -> Self {
        Self {
            name: Some(name),
            table: Some(WEEK_TABLE),
            ..Default::default()
        }
    }
}

#[derive(Clone, Default)]
struct Script {
    open_fails: bool,
    activate_fails: bool,
    list_fails: bool,
    return_fails: bool,
    courts: Vec<FakeCourt>,
}

#[derive(Debug, Default)]
struct Calls {
    sessions: usize,
    closed: usize,
    selected: Vec<usize>,
    returns: usize,
}

struct FakeAdapter {
    script: Script,
    calls: Arc<Mutex<Calls>>,
    current: Option<usize>,
}

#[async_trait]
impl PageAdapter for FakeAdapter {
    async fn open_venue(&mut self, _url: &str) -> AdapterResult<()> {
        Ok(())
    }

    async fn activate_booking(&mut self, timeout: Duration) -> AdapterResult<()> {
        if self.script.activate_fails {
            return Err(AdapterError::timeout("booking button", timeout));
        }
        Ok(())
    }

    async fn list_courts(&mut self, timeout: Duration) -> AdapterResult<usize> {
        if self.script.list_fails {
            return Err(AdapterError::timeout("court list", timeout));
        }
        Ok(self.script.courts.len())
    }

    async fn court_name(&mut self, index: usize) -> AdapterResult<String> {
        self.script.courts[index]
            .name
            .map(str::to_string)
            .ok_or_else(|| AdapterError::NotFound("court title".to_string()))
    }

    async fn select_court(&mut self, index: usize) -> AdapterResult<()> {
        self.calls.lock().unwrap().selected.push(index);
        if self.script.courts[index].select_fails {
            return Err(AdapterError::NotFound("court button".to_string()));
        }
        self.current = Some(index);
        Ok(())
    }

    async fn wait_for_table(&mut self, timeout: Duration) -> AdapterResult<Box<dyn BookingTable>> {
        let court = &self.script.courts[self.current.unwrap()];
        if court.panics {
            panic!("renderer crashed");
        }
        match court.table {
            Some(html) => Ok(Box::new(HtmlTable::parse(html, DATE_SELECTOR)?)),
            None => Err(AdapterError::timeout("slot table", timeout)),
        }
    }

    async fn return_to_courts(&mut self, timeout: Duration) -> AdapterResult<()> {
        self.calls.lock().unwrap().returns += 1;
        self.current = None;
        if self.script.return_fails {
            return Err(AdapterError::timeout("court list", timeout));
        }
        Ok(())
    }

    async fn close(&mut self) -> AdapterResult<()> {
        self.calls.lock().unwrap().closed += 1;
        Ok(())
    }
}

struct FakeFactory {
    script: Script,
    calls: Arc<Mutex<Calls>>,
}

#[async_trait]
impl SessionFactory for FakeFactory {
    async fn open(&self) -> AdapterResult<Box<dyn PageAdapter>> {
        if self.script.open_fails {
            return Err(AdapterError::Browser("Chrome/Chromium not found".to_string()));
        }
        self.calls.lock().unwrap().sessions += 1;
        Ok(Box::new(FakeAdapter {
            script: self.script.clone(),
            calls: self.calls.clone(),
            current: None,
        }))
    }
}

struct Harness {
    scraper: VenueScraper,
    sink: Arc<MemorySink>,
    calls: Arc<Mutex<Calls>>,
}

fn harness(script: Script) -> Harness {
    let calls = Arc::new(Mutex::new(Calls::default()));
    let sink = Arc::new(MemorySink::new());
    let factory = FakeFactory {
        script,
        calls: calls.clone(),
    };
    let scraper =
        VenueScraper::new(Arc::new(factory), NavigationSettings::default()).with_sink(sink.clone());
    Harness {
        scraper,
        sink,
        calls,
    }
}

fn court_names(result: &VenueResult) -> Vec<&str> {
    result.courts().iter().map(|c| c.court_name()).collect()
}

#[tokio::test]
async fn test_scrapes_at_most_three_courts() {
    let h = harness(Script {
        courts: ["A", "B", "C", "D", "E"]
            .into_iter()
            .map(FakeCourt::named)
            .collect(),
        ..Default::default()
    });

    let result = h.scraper.scrape("https://hudle.in/venues/arena", "Arena").await;

    assert!(result.is_success());
    assert_eq!(result.total_courts(), 3);
    assert_eq!(court_names(&result), vec!["A", "B", "C"]);
    assert_eq!(h.calls.lock().unwrap().selected, vec![0, 1, 2]);
    assert_eq!(
        h.sink.count(|e| matches!(
            e,
            ScrapeEvent::CourtsListed {
                listed: 5,
                selected: 3
            }
        )),
        1
    );
}

#[tokio::test]
async fn test_slots_are_classified() {
    let h = harness(Script {
        courts: vec![FakeCourt::named("Court A")],
        ..Default::default()
    });

    let result = h.scraper.scrape("https://hudle.in/venues/arena", "Arena").await;
    let court = &result.courts()[0];

    assert_eq!(court.total_slots(), 4);
    assert_eq!(court.available_slots(), 2);
    assert_eq!(court.unavailable_slots(), 2);

    let slots = court.slots();
    assert_eq!(slots[0].venue, "Arena");
    assert_eq!(slots[0].court, "Court A");
    assert_eq!((slots[0].date.as_str(), slots[0].time.as_str()), ("14", "06:00 AM"));
    assert_eq!(slots[0].price.as_deref(), Some("₹500"));
    assert_eq!(slots[0].availability, "Available");
    assert!(slots[0].is_available);

    assert_eq!((slots[1].date.as_str(), slots[1].time.as_str()), ("15", "06:00 AM"));
    assert_eq!(slots[1].availability, "Booked");
    assert!(!slots[1].is_available);

    assert_eq!(slots[2].availability, "2 left");
    assert_eq!(slots[2].price.as_deref(), Some("₹600"));
    assert!(slots[2].is_available);

    assert_eq!(slots[3].availability, "Unavailable (Disabled)");
    assert_eq!(slots[3].cell_classes, "slot_disabled");
    assert!(!slots[3].is_available);
}

#[tokio::test]
async fn test_venue_without_courts_succeeds() {
    let h = harness(Script::default());

    let result = h.scraper.scrape("https://hudle.in/venues/empty", "Empty").await;

    assert_eq!(result.status(), ScrapeStatus::Success);
    assert_eq!(result.total_courts(), 0);
    assert!(result.courts().is_empty());
    assert_eq!(h.calls.lock().unwrap().closed, 1);
}

#[tokio::test]
async fn test_activation_timeout_is_an_error() {
    let h = harness(Script {
        activate_fails: true,
        courts: vec![FakeCourt::named("A")],
        ..Default::default()
    });

    let result = h.scraper.scrape("https://hudle.in/venues/arena", "Arena").await;

    assert_eq!(result.status(), ScrapeStatus::Error);
    let message = result.error_message().unwrap();
    assert!(!message.is_empty());
    assert!(message.contains("booking button"));
    assert_eq!(result.total_courts(), 0);
    assert!(h.calls.lock().unwrap().selected.is_empty());
    assert_eq!(h.calls.lock().unwrap().closed, 1);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["venue_name"], "Arena");
    assert!(json.get("courts").is_none());
}

#[tokio::test]
async fn test_court_list_timeout_is_an_error() {
    let h = harness(Script {
        list_fails: true,
        courts: vec![FakeCourt::named("A"), FakeCourt::named("B")],
        ..Default::default()
    });

    let result = h.scraper.scrape("https://hudle.in/venues/arena", "Arena").await;

    assert_eq!(result.status(), ScrapeStatus::Error);
    let message = result.error_message().unwrap();
    assert!(message.contains("listing courts"));
    assert!(message.contains("court list"));
    assert!(result.courts().is_empty());
    assert_eq!(result.total_courts(), 0);

    let calls = h.calls.lock().unwrap();
    assert!(calls.selected.is_empty());
    assert_eq!(calls.closed, 1);
    assert_eq!(
        h.sink.count(|e| matches!(e, ScrapeEvent::ScrapeFailed { .. })),
        1
    );
    assert_eq!(
        h.sink.count(|e| matches!(e, ScrapeEvent::ScrapeFinished { .. })),
        0
    );
}

#[tokio::test]
async fn test_failed_court_is_skipped() {
    let h = harness(Script {
        courts: vec![
            FakeCourt::named("A"),
            FakeCourt {
                table: None,
                ..FakeCourt::named("B")
            },
            FakeCourt::named("C"),
        ],
        ..Default::default()
    });

    let result = h.scraper.scrape("https://hudle.in/venues/arena", "Arena").await;

    assert!(result.is_success());
    assert_eq!(court_names(&result), vec!["A", "C"]);
    assert_eq!(result.total_courts(), 2);
    assert_eq!(
        h.sink.count(|e| matches!(
            e,
            ScrapeEvent::CourtSkipped { index: 1, court, .. } if court == "B"
        )),
        1
    );
    // Every selected court still returns to the list
    assert_eq!(h.calls.lock().unwrap().returns, 3);
}

#[tokio::test]
async fn test_failed_selection_does_not_navigate_back() {
    let h = harness(Script {
        courts: vec![
            FakeCourt {
                select_fails: true,
                ..FakeCourt::named("A")
            },
            FakeCourt::named("B"),
        ],
        ..Default::default()
    });

    let result = h.scraper.scrape("https://hudle.in/venues/arena", "Arena").await;

    assert_eq!(court_names(&result), vec!["B"]);
    assert_eq!(h.calls.lock().unwrap().returns, 1);
}

#[tokio::test]
async fn test_missing_court_name_uses_placeholder() {
    let h = harness(Script {
        courts: vec![
            FakeCourt::named("Centre"),
            FakeCourt {
                name: None,
                ..FakeCourt::named("")
            },
        ],
        ..Default::default()
    });

    let result = h.scraper.scrape("https://hudle.in/venues/arena", "Arena").await;

    assert_eq!(court_names(&result), vec!["Centre", "Court 2"]);
    assert!(result.courts()[1].slots().iter().all(|s| s.court == "Court 2"));
    assert_eq!(
        h.sink
            .count(|e| matches!(e, ScrapeEvent::CourtNameFallback { index: 1, .. })),
        1
    );
}

#[tokio::test]
async fn test_failed_return_keeps_results() {
    let h = harness(Script {
        return_fails: true,
        courts: vec![FakeCourt::named("A"), FakeCourt::named("B")],
        ..Default::default()
    });

    let result = h.scraper.scrape("https://hudle.in/venues/arena", "Arena").await;

    assert!(result.is_success());
    assert_eq!(court_names(&result), vec!["A", "B"]);
    assert_eq!(
        h.sink.count(|e| matches!(e, ScrapeEvent::ReturnFailed { .. })),
        2
    );
}

#[tokio::test]
async fn test_session_open_failure() {
    let h = harness(Script {
        open_fails: true,
        ..Default::default()
    });

    let result = h.scraper.scrape("https://hudle.in/venues/arena", "Arena").await;

    assert_eq!(result.status(), ScrapeStatus::Error);
    assert!(result.error_message().unwrap().contains("Chrome/Chromium not found"));
    let calls = h.calls.lock().unwrap();
    assert_eq!(calls.sessions, 0);
    assert_eq!(calls.closed, 0);
    assert_eq!(
        h.sink.count(|e| matches!(e, ScrapeEvent::SessionOpenFailed { .. })),
        1
    );
    assert_eq!(h.sink.count(|e| matches!(e, ScrapeEvent::SessionClosed)), 0);
}

#[tokio::test]
async fn test_panic_still_closes_session() {
    let h = harness(Script {
        courts: vec![
            FakeCourt::named("A"),
            FakeCourt {
                panics: true,
                ..FakeCourt::named("B")
            },
        ],
        ..Default::default()
    });

    let result = h.scraper.scrape("https://hudle.in/venues/arena", "Arena").await;

    assert_eq!(result.status(), ScrapeStatus::Error);
    assert!(result.error_message().unwrap().contains("renderer crashed"));
    assert_eq!(result.total_courts(), 0);
    assert_eq!(h.calls.lock().unwrap().closed, 1);
    assert_eq!(h.sink.count(|e| matches!(e, ScrapeEvent::SessionClosed)), 1);
}

#[tokio::test]
async fn test_each_scrape_gets_its_own_session() {
    let h = harness(Script {
        courts: vec![FakeCourt::named("A")],
        ..Default::default()
    });

    let first = h.scraper.scrape("https://hudle.in/venues/a", "A").await;
    let second = h.scraper.scrape("https://hudle.in/venues/b", "B").await;

    assert!(first.is_success() && second.is_success());
    assert_eq!(second.venue_url(), "https://hudle.in/venues/b");
    let calls = h.calls.lock().unwrap();
    assert_eq!(calls.sessions, 2);
    assert_eq!(calls.closed, 2);
}
