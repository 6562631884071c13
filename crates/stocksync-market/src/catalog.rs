//! Full-catalog pagination over a marketplace's offer listing.
//!
//! Marketplaces signal exhaustion in one of two ways:
//!
//! - an opaque next-page token that is absent or empty on the last page
//!   (Yandex Market `paging.nextPageToken`);
//! - a last-seen id to resume from, plus a server-reported total that the
//!   running item count eventually reaches (Ozon `last_id` / `total`).

use crate::error::MarketError;

/// Continuation info returned alongside one catalog page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCursor {
    /// Token for the next page; `None` or empty on the last page.
    NextPageToken(Option<String>),
    /// Id to resume after, and the total number of offers in the catalog.
    LastId { last_id: String, total: usize },
}

/// One page of a marketplace catalog listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    pub offer_ids: Vec<String>,
    pub cursor: CatalogCursor,
}

/// A marketplace catalog that can be listed one page at a time.
pub trait CatalogSource {
    /// Name used in logs and reports, e.g. `"ozon"` or `"yandex-fbs"`.
    fn label(&self) -> &str;

    /// Fetches the page following `cursor`; `None` requests the first page.
    ///
    /// # Errors
    ///
    /// Transport, status and decoding failures are returned unchanged.
    fn fetch_catalog_page(&self, cursor: Option<&str>) -> Result<CatalogPage, MarketError>;
}

/// Lists every offer id in the catalog by following cursors until the
/// marketplace reports exhaustion.
///
/// There is no page ceiling. A last-id page that comes back empty before the
/// reported total is reached fails with [`MarketError::PaginationStalled`],
/// and a page token equal to the one just requested fails with
/// [`MarketError::RepeatedPageToken`], rather than requesting the same
/// cursor forever.
///
/// # Errors
///
/// Propagates any error from [`CatalogSource::fetch_catalog_page`]. Offers
/// gathered from earlier pages are discarded on failure.
pub fn list_all_offer_ids<S>(source: &S) -> Result<Vec<String>, MarketError>
where
    S: CatalogSource + ?Sized,
{
    let mut offer_ids: Vec<String> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = source.fetch_catalog_page(cursor.as_deref())?;
        pages += 1;
        let page_len = page.offer_ids.len();
        offer_ids.extend(page.offer_ids);

        tracing::debug!(
            marketplace = source.label(),
            page = pages,
            page_len,
            fetched = offer_ids.len(),
            "catalog page fetched"
        );

        match page.cursor {
            CatalogCursor::NextPageToken(next) => match next.filter(|t| !t.is_empty()) {
                Some(token) if cursor.as_deref() == Some(token.as_str()) => {
                    return Err(MarketError::RepeatedPageToken {
                        marketplace: source.label().to_owned(),
                        token,
                        fetched: offer_ids.len(),
                    });
                }
                Some(token) => cursor = Some(token),
                None => break,
            },
            CatalogCursor::LastId { last_id, total } => {
                if offer_ids.len() >= total {
                    break;
                }
                if page_len == 0 {
                    return Err(MarketError::PaginationStalled {
                        marketplace: source.label().to_owned(),
                        fetched: offer_ids.len(),
                        total,
                    });
                }
                cursor = Some(last_id);
            }
        }
    }

    tracing::info!(
        marketplace = source.label(),
        pages,
        offers = offer_ids.len(),
        "catalog listing complete"
    );
    Ok(offer_ids)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Replays canned pages and records the cursor of every request.
    struct ScriptedCatalog {
        pages: RefCell<VecDeque<Result<CatalogPage, MarketError>>>,
        cursors: RefCell<Vec<Option<String>>>,
    }

    impl ScriptedCatalog {
        fn new(pages: Vec<Result<CatalogPage, MarketError>>) -> Self {
            Self {
                pages: RefCell::new(pages.into()),
                cursors: RefCell::new(Vec::new()),
            }
        }
    }

    impl CatalogSource for ScriptedCatalog {
        fn label(&self) -> &str {
            "scripted"
        }

        fn fetch_catalog_page(&self, cursor: Option<&str>) -> Result<CatalogPage, MarketError> {
            self.cursors.borrow_mut().push(cursor.map(str::to_owned));
            self.pages
                .borrow_mut()
                .pop_front()
                .expect("aggregator requested more pages than scripted")
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    fn token_page(values: &[&str], next: Option<&str>) -> Result<CatalogPage, MarketError> {
        Ok(CatalogPage {
            offer_ids: ids(values),
            cursor: CatalogCursor::NextPageToken(next.map(str::to_owned)),
        })
    }

    fn last_id_page(values: &[&str], last_id: &str, total: usize) -> Result<CatalogPage, MarketError> {
        Ok(CatalogPage {
            offer_ids: ids(values),
            cursor: CatalogCursor::LastId {
                last_id: last_id.to_owned(),
                total,
            },
        })
    }

    #[test]
    fn token_cursor_follows_pages_until_token_is_absent() {
        let catalog = ScriptedCatalog::new(vec![
            token_page(&["a", "b"], Some("p2")),
            token_page(&["c"], Some("p3")),
            token_page(&["d"], None),
        ]);
        let offers = list_all_offer_ids(&catalog).unwrap();
        assert_eq!(offers, ids(&["a", "b", "c", "d"]));
        assert_eq!(
            *catalog.cursors.borrow(),
            vec![None, Some("p2".to_owned()), Some("p3".to_owned())]
        );
    }

    #[test]
    fn empty_token_counts_as_exhausted() {
        let catalog = ScriptedCatalog::new(vec![token_page(&["a"], Some(""))]);
        assert_eq!(list_all_offer_ids(&catalog).unwrap(), ids(&["a"]));
    }

    #[test]
    fn empty_catalog_yields_no_offers() {
        let catalog = ScriptedCatalog::new(vec![token_page(&[], None)]);
        assert!(list_all_offer_ids(&catalog).unwrap().is_empty());
    }

    #[test]
    fn last_id_cursor_stops_when_count_reaches_total() {
        let catalog = ScriptedCatalog::new(vec![
            last_id_page(&["a", "b"], "b", 3),
            last_id_page(&["c"], "c", 3),
        ]);
        let offers = list_all_offer_ids(&catalog).unwrap();
        assert_eq!(offers, ids(&["a", "b", "c"]));
        assert_eq!(
            *catalog.cursors.borrow(),
            vec![None, Some("b".to_owned())]
        );
    }

    #[test]
    fn last_id_cursor_with_zero_total_stops_after_first_page() {
        let catalog = ScriptedCatalog::new(vec![last_id_page(&[], "", 0)]);
        assert!(list_all_offer_ids(&catalog).unwrap().is_empty());
    }

    #[test]
    fn last_id_cursor_fails_on_empty_page_below_total() {
        let catalog = ScriptedCatalog::new(vec![
            last_id_page(&["a"], "a", 5),
            last_id_page(&[], "a", 5),
        ]);
        let err = list_all_offer_ids(&catalog).unwrap_err();
        assert!(
            matches!(err, MarketError::PaginationStalled { fetched: 1, total: 5, .. }),
            "expected PaginationStalled, got: {err:?}"
        );
    }

    #[test]
    fn token_cursor_fails_when_token_repeats() {
        let catalog = ScriptedCatalog::new(vec![
            token_page(&["a", "b"], Some("p2")),
            token_page(&["c"], Some("p2")),
        ]);
        let err = list_all_offer_ids(&catalog).unwrap_err();
        match err {
            MarketError::RepeatedPageToken { token, fetched, .. } => {
                assert_eq!(token, "p2");
                assert_eq!(fetched, 3);
            }
            other => panic!("expected RepeatedPageToken, got: {other:?}"),
        }
        assert_eq!(catalog.cursors.borrow().len(), 2);
    }

    #[test]
    fn page_error_propagates_unchanged() {
        let catalog = ScriptedCatalog::new(vec![
            token_page(&["a"], Some("p2")),
            Err(MarketError::UnexpectedStatus {
                status: 401,
                url: "http://mock/catalog".into(),
                body: "unauthorized".into(),
            }),
        ]);
        let err = list_all_offer_ids(&catalog).unwrap_err();
        assert!(
            matches!(err, MarketError::UnexpectedStatus { status: 401, .. }),
            "expected UnexpectedStatus(401), got: {err:?}"
        );
    }
}
