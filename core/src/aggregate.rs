use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::CountsError,
    notion::{NotionClient, Page},
    status::{StatusCounts, StatusValue},
};


/// Walks the whole database one page at a time and tallies the status property.
///
/// Calls are strictly sequential: the first has no cursor, each later one sends
/// the previous page's `next_cursor`. Stops after `config.max_pages` calls with
/// `PageLimitExceeded` if the upstream still reports more pages, and fails with
/// `MissingCursor` if it reports more pages but gives no cursor to fetch them.
pub async fn aggregate(client: &NotionClient, config: &Config) -> Result<StatusCounts, CountsError> {
    let mut counts = StatusCounts::new(config.statuses.iter().cloned());
    let mut cursor: Option<String> = None;

    for page_no in 1..=config.max_pages {
        let res = client.query(config.page_size, cursor.as_deref()).await?;
        let matched = tally_page(&mut counts, &res.results, &config.status_prop);
        debug!(page = page_no, records = res.results.len(), matched, has_more = res.has_more, "tallied page");

        if !res.has_more {
            info!(pages = page_no, total = counts.total(), "aggregation finished");
            return Ok(counts);
        }

        match res.next_cursor {
            Some(next) => cursor = Some(next),
            None => {
                warn!(page = page_no, "upstream reported more pages without a cursor");
                return Err(CountsError::MissingCursor(page_no));
            }
        }
    }

    warn!(max_pages = config.max_pages, "pagination limit reached");
    Err(CountsError::PageLimitExceeded(config.max_pages))
}

/// Adds one page of records to `counts`, returns how many landed on a known label.
pub fn tally_page(counts: &mut StatusCounts, results: &[Page], status_prop: &str) -> usize {
    let mut matched = 0;
    for page in results {
        let value = StatusValue::resolve(page.properties.get(status_prop));
        if counts.record(value.label()) {
            matched += 1;
        }
    }
    matched
}
