use crate::capacity;
use crate::cell::{Cell, SearchKey};
use crate::error::{ChequeError, Result};
use crate::provider::ChequeProvider;

use ckb_types::bytes::Bytes;
use ckb_types::core::Capacity;
use ckb_types::packed::Script;

/// No query returns more cells than this, however many the indexer has.
pub const MAX_COLLECTED_CELLS: usize = 1000;

const PAGE_SIZE: usize = 100;

/// Walks the indexer result set of one search key page by page.
///
/// The pager never asks for more than [`MAX_COLLECTED_CELLS`] cells in total.
pub struct CellPager<'a, P: ?Sized> {
    provider: &'a P,
    search_key: &'a SearchKey,
    cursor: Option<Bytes>,
    fetched: usize,
    exhausted: bool,
}

impl<'a, P> CellPager<'a, P>
where
    P: ChequeProvider + ?Sized,
{
    pub fn new(provider: &'a P, search_key: &'a SearchKey) -> Self {
        CellPager {
            provider,
            search_key,
            cursor: None,
            fetched: 0,
            exhausted: false,
        }
    }

    /// The next page, or `None` once the indexer or the cap is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Cell>>> {
        if self.exhausted || self.fetched >= MAX_COLLECTED_CELLS {
            return Ok(None);
        }
        let limit = PAGE_SIZE.min(MAX_COLLECTED_CELLS - self.fetched);
        let page = self
            .provider
            .get_cells(self.search_key, limit as u32, self.cursor.take())
            .await?;
        let mut cells = page.cells;
        cells.truncate(limit);
        if cells.is_empty() {
            self.exhausted = true;
            return Ok(None);
        }
        self.fetched += cells.len();
        match page.cursor {
            Some(cursor) if !cursor.is_empty() => self.cursor = Some(cursor),
            _ => self.exhausted = true,
        }
        Ok(Some(cells))
    }
}

/// Collects cells matching `search_key` until `stop` holds for what has been
/// collected, the indexer runs dry or [`MAX_COLLECTED_CELLS`] is reached.
pub async fn collect<P, F>(provider: &P, search_key: &SearchKey, mut stop: F) -> Result<Vec<Cell>>
where
    P: ChequeProvider + ?Sized,
    F: FnMut(&[Cell]) -> bool,
{
    let mut collected = Vec::new();
    if stop(&collected) {
        return Ok(collected);
    }
    let mut pager = CellPager::new(provider, search_key);
    while let Some(page) = pager.next_page().await? {
        for cell in page {
            collected.push(cell);
            if collected.len() >= MAX_COLLECTED_CELLS || stop(&collected) {
                return Ok(collected);
            }
        }
    }
    Ok(collected)
}

/// Collects lock-only cells of `lock` until they hold at least `min_amount`.
///
/// At least one cell is always collected, since it becomes the change
/// output that pays the fee.
pub async fn collect_lock_only_cells<P>(
    provider: &P,
    lock: &Script,
    min_amount: Capacity,
) -> Result<Vec<Cell>>
where
    P: ChequeProvider + ?Sized,
{
    let search_key = SearchKey::lock(lock.clone());
    let mut pager = CellPager::new(provider, &search_key);
    let mut collected = Vec::new();
    let mut total = Capacity::zero();

    while total < min_amount || collected.is_empty() {
        let page = match pager.next_page().await? {
            Some(page) => page,
            None => break,
        };
        for cell in page {
            if !cell.is_lock_only() || &cell.lock() != lock {
                continue;
            }
            total = capacity::add(total, cell.capacity())?;
            collected.push(cell);
            if total >= min_amount {
                break;
            }
        }
    }

    if total < min_amount || collected.is_empty() {
        return Err(ChequeError::InsufficientFunds {
            required: min_amount.as_u64(),
            available: total.as_u64(),
        });
    }
    log::debug!(
        "collected {} lock-only cells holding {} shannons",
        collected.len(),
        total.as_u64()
    );
    Ok(collected)
}
