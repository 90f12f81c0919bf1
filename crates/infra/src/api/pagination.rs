//! Full-collection fetch
//!
//! Pages through an endpoint with `limit = 100`, starting at `offset = 0` and
//! advancing by 100. A page holding exactly 100 records is the only signal
//! to continue; any shorter page, including an empty one, ends the fetch. No
//! total-count field is consulted, so a collection whose size is a multiple
//! of 100 costs one extra, empty call.

use openwowi_domain::constants::PAGE_SIZE;
use openwowi_domain::Result;
use serde_json::Value;
use tracing::{debug, instrument};

use super::client::{ApiRequest, RequestExecutor};
use super::params::QueryParams;

/// State of the merge loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchState {
    Fetching { offset: u64 },
    Done,
}

/// Fetch every page of `endpoint` and concatenate the records in server
/// order.
///
/// `base_params` may carry filters and include flags; `limit` and `offset`
/// in it are overridden. There is no upper bound on the number of pages.
///
/// # Errors
///
/// The first error raised by the executor aborts the fetch; records gathered
/// from earlier pages are discarded.
#[instrument(skip(executor, base_params))]
pub fn fetch_all<E>(
    executor: &mut E,
    endpoint: &str,
    base_params: &QueryParams,
    bypass_cache: bool,
) -> Result<Vec<Value>>
where
    E: RequestExecutor + ?Sized,
{
    let mut records = Vec::new();
    let mut state = FetchState::Fetching { offset: 0 };

    while let FetchState::Fetching { offset } = state {
        let params = base_params
            .clone()
            .with(QueryParams::LIMIT, PAGE_SIZE)
            .with(QueryParams::OFFSET, offset);
        let page = executor.execute(&ApiRequest::get(endpoint).with_params(params), bypass_cache)?;

        let page_len = page.len();
        records.extend(page.into_data());
        debug!(offset, page_len, total = records.len(), "fetched page");

        state = if page_len == PAGE_SIZE as usize {
            FetchState::Fetching { offset: offset + u64::from(PAGE_SIZE) }
        } else {
            FetchState::Done
        };
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use openwowi_domain::{ApiResponse, WowiError};
    use serde_json::json;

    use super::*;

    /// Executor answering from a script of page sizes, recording every
    /// request it sees.
    struct ScriptedPages {
        pages: VecDeque<Result<usize>>,
        seen: Vec<ApiRequest>,
    }

    impl ScriptedPages {
        fn new(pages: impl IntoIterator<Item = Result<usize>>) -> Self {
            Self { pages: pages.into_iter().collect(), seen: Vec::new() }
        }

        fn offsets(&self) -> Vec<u64> {
            self.seen.iter().map(|r| r.params.offset()).collect()
        }
    }

    impl RequestExecutor for ScriptedPages {
        fn execute(&mut self, request: &ApiRequest, _bypass_cache: bool) -> Result<ApiResponse> {
            let base = request.params.offset();
            self.seen.push(request.clone());
            let size = self.pages.pop_front().unwrap_or(Ok(0))?;
            let data = (0..size).map(|i| json!({"Id": base + i as u64})).collect();
            Ok(ApiResponse { status_code: 200, message: "OK".into(), data })
        }
    }

    #[test]
    fn stops_after_short_page() {
        let mut executor = ScriptedPages::new([Ok(100), Ok(100), Ok(37)]);

        let records = fetch_all(&mut executor, "PersonsRead/Persons", &QueryParams::new(), false).unwrap();

        assert_eq!(executor.offsets(), vec![0, 100, 200]);
        assert_eq!(records.len(), 237);
        let ids: Vec<u64> = records.iter().filter_map(|r| r["Id"].as_u64()).collect();
        assert_eq!(ids, (0..237).collect::<Vec<_>>());
    }

    #[test]
    fn empty_first_page_costs_one_call() {
        let mut executor = ScriptedPages::new([Ok(0)]);

        let records = fetch_all(&mut executor, "PersonsRead/Persons", &QueryParams::new(), false).unwrap();

        assert!(records.is_empty());
        assert_eq!(executor.seen.len(), 1);
    }

    #[test]
    fn exact_multiple_of_page_size_costs_an_extra_empty_call() {
        let mut executor = ScriptedPages::new([Ok(100), Ok(0)]);

        let records = fetch_all(&mut executor, "x", &QueryParams::new(), false).unwrap();

        assert_eq!(records.len(), 100);
        assert_eq!(executor.offsets(), vec![0, 100]);
    }

    #[test]
    fn caller_paging_is_overridden_but_filters_kept() {
        let mut executor = ScriptedPages::new([Ok(3)]);
        let params = QueryParams::new().with("limit", 5).with("offset", 40).with("personId", 9);

        fetch_all(&mut executor, "x", &params, false).unwrap();

        let sent = &executor.seen[0].params;
        assert_eq!(sent.get("limit"), Some("100"));
        assert_eq!(sent.get("offset"), Some("0"));
        assert_eq!(sent.get("personId"), Some("9"));
    }

    #[test]
    fn error_aborts_and_discards_partial_pages() {
        let mut executor = ScriptedPages::new([
            Ok(100),
            Err(WowiError::Api { status: 500, reason: "Internal Server Error".into(), body: String::new() }),
            Ok(10),
        ]);

        let err = fetch_all(&mut executor, "x", &QueryParams::new(), false).unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(executor.seen.len(), 2);
    }
}
