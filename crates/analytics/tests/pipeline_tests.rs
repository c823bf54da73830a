//! Scan-to-report pipeline tests

use blockstats_analytics::*;
use blockstats_config::ReportLayout;
use blockstats_ledger::{Block, BlockBuilder, BlockHeight};
use blockstats_persistence::{self as persistence, BlockStore, MemoryBlockStore};
use proptest::prelude::*;
use std::cell::Cell;

const T: u64 = 1_700_000_000_000_000_000;
const SECOND: u64 = 1_000_000_000;

fn block(height: BlockHeight, timestamp: u64, txs: usize) -> Block {
    BlockBuilder::new(height)
        .timestamp(timestamp)
        .empty_transactions(txs)
        .build()
        .unwrap()
}

fn store_from(spec: &[(u64, usize)]) -> MemoryBlockStore {
    let blocks = spec
        .iter()
        .enumerate()
        .map(|(index, &(timestamp, txs))| block(index as u64 + 1, timestamp, txs));
    MemoryBlockStore::from_blocks(blocks).unwrap()
}

fn scanner(page_size: usize, policy: ContinuationPolicy) -> BlockScanner {
    BlockScanner::new(ScanOptions {
        start_height: 1,
        page_size,
        policy,
    })
}

/// Serves blocks from an inner store and fails on a chosen read
struct FlakyStore {
    inner: MemoryBlockStore,
    fail_on_read: usize,
    reads: Cell<usize>,
}

impl BlockStore for FlakyStore {
    fn last_height(&self) -> persistence::Result<BlockHeight> {
        self.inner.last_height()
    }

    fn read_range(&self, from: BlockHeight, limit: usize) -> persistence::Result<Vec<Block>> {
        self.reads.set(self.reads.get() + 1);
        if self.reads.get() == self.fail_on_read {
            return Err(persistence::Error::Database("disk went away".to_string()));
        }
        self.inner.read_range(from, limit)
    }
}

/// Store whose tip cannot be read
struct OfflineStore;

impl BlockStore for OfflineStore {
    fn last_height(&self) -> persistence::Result<BlockHeight> {
        Err(persistence::Error::Database("not mounted".to_string()))
    }

    fn read_range(&self, _from: BlockHeight, _limit: usize) -> persistence::Result<Vec<Block>> {
        unreachable!("the scan must not page an unavailable store")
    }
}

/// Store that breaks the paging contract by handing over an empty page
struct EmptyPageStore {
    inner: MemoryBlockStore,
}

impl BlockStore for EmptyPageStore {
    fn last_height(&self) -> persistence::Result<BlockHeight> {
        self.inner.last_height()
    }

    fn read_range(&self, from: BlockHeight, limit: usize) -> persistence::Result<Vec<Block>> {
        self.inner.read_range(from, limit)
    }

    fn scan_blocks(
        &self,
        start: BlockHeight,
        page_size: usize,
        on_page: &mut dyn FnMut(BlockHeight, &[Block]) -> bool,
    ) -> persistence::Result<()> {
        let first = self.inner.read_range(start, page_size)?;
        if on_page(start, &first) {
            on_page(start + first.len() as u64, &[]);
        }
        Ok(())
    }
}

#[test]
fn test_three_block_scenario() {
    let store = store_from(&[(T, 2), (T + SECOND, 3), (T + 3 * SECOND, 0)]);

    let rows = scanner(3, ContinuationPolicy::ToTip).run(&store).unwrap();

    assert_eq!(rows.len(), 1);
    let row = rows[0];
    assert_eq!(row.timestamp, T + 3 * SECOND);
    assert_eq!(row.block_height, 3);
    assert_eq!(row.tx_count, 5);
    // mean of the 1000 ms and 2000 ms gaps, within histogram precision
    assert!(
        (1470..=1530).contains(&row.mean_closing_time_ms),
        "got {}",
        row.mean_closing_time_ms
    );
}

#[test]
fn test_empty_store_renders_header_only() {
    let store = MemoryBlockStore::new();

    let rows = scanner(1000, ContinuationPolicy::ToTip).run(&store).unwrap();
    let report = render_report(&rows, ReportLayout::Full).unwrap();

    assert!(rows.is_empty());
    assert_eq!(report, format!("{}\n", FULL_HEADER));
}

#[test]
fn test_failure_on_second_page_discards_rows() {
    let store = FlakyStore {
        inner: store_from(&[(T, 1), (T + SECOND, 1), (T + 2 * SECOND, 1), (T + 3 * SECOND, 1)]),
        fail_on_read: 2,
        reads: Cell::new(0),
    };

    let err = scanner(2, ContinuationPolicy::ToTip).run(&store).unwrap_err();

    assert!(matches!(err, ScanError::ScanFailed { .. }), "got {:?}", err);
    assert_eq!(err.last_processed(), Some(2));
}

#[test]
fn test_unavailable_store_fails_before_scanning() {
    let err = scanner(10, ContinuationPolicy::ToTip)
        .run(&OfflineStore)
        .unwrap_err();

    assert!(matches!(err, ScanError::StoreUnavailable { .. }));
    assert_eq!(err.last_processed(), None);
}

#[test]
fn test_empty_page_is_malformed() {
    let store = EmptyPageStore {
        inner: store_from(&[(T, 1), (T + SECOND, 1), (T + 2 * SECOND, 1)]),
    };

    let err = scanner(2, ContinuationPolicy::ToTip).run(&store).unwrap_err();

    match err {
        ScanError::MalformedPage {
            first_height,
            last_processed,
            source,
        } => {
            assert_eq!(first_height, 3);
            assert_eq!(last_processed, Some(2));
            assert_eq!(source, AggregateError::EmptyPage);
        }
        other => panic!("expected MalformedPage, got {:?}", other),
    }
}

#[test]
fn test_boundary_gap_is_carried_between_pages() {
    // gaps: 10 ms inside the first page, 20 ms across the boundary, 30 ms inside the second
    let ms = 1_000_000;
    let store = store_from(&[(0, 0), (10 * ms, 0), (30 * ms, 0), (60 * ms, 0)]);

    let rows = scanner(2, ContinuationPolicy::ToTip).run(&store).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].mean_closing_time_ms, 10);
    assert_eq!(rows[1].mean_closing_time_ms, 25);
}

#[test]
fn test_backwards_clock_is_reported_on_its_row() {
    let store = store_from(&[
        (T + 10 * SECOND, 1),
        (T + 5 * SECOND, 1),
        (T + 6 * SECOND, 1),
        (T + 7 * SECOND, 1),
    ]);

    let rows = scanner(3, ContinuationPolicy::ToTip).run(&store).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].clamped_gaps, 1);
    assert_eq!(rows[1].clamped_gaps, 0);
}

#[test]
fn test_ceiling_stops_before_tip() {
    let spec: Vec<(u64, usize)> = (0..50).map(|i| (T + i * SECOND, 1)).collect();
    let store = store_from(&spec);

    let rows = scanner(10, ContinuationPolicy::Ceiling(25)).run(&store).unwrap();

    let heights: Vec<u64> = rows.iter().map(|row| row.block_height).collect();
    assert_eq!(heights, vec![10, 20, 25]);
    assert_eq!(rows.iter().map(|row| row.tx_count).sum::<u64>(), 25);
}

#[test]
fn test_ceiling_above_tip_stops_at_tip() {
    let spec: Vec<(u64, usize)> = (0..12).map(|i| (T + i * SECOND, 0)).collect();
    let store = store_from(&spec);

    let rows = scanner(5, ContinuationPolicy::Ceiling(1_000))
        .run(&store)
        .unwrap();

    assert_eq!(rows.last().map(|row| row.block_height), Some(12));
}

#[test]
fn test_scan_then_render() {
    let store = store_from(&[(T, 2), (T + SECOND, 3), (T + 3 * SECOND, 0)]);
    let rows = scanner(2, ContinuationPolicy::ToTip).run(&store).unwrap();

    let compact = render_report(&rows, ReportLayout::Compact).unwrap();

    assert_eq!(compact, "blockHeight,txCount\n2,5\n3,0\n");
}

fn chain_strategy() -> impl Strategy<Value = Vec<(u64, usize)>> {
    prop::collection::vec((0u64..5_000, 0usize..20), 1..120).prop_map(|steps| {
        let mut timestamp = T;
        steps
            .into_iter()
            .map(|(gap_ms, txs)| {
                timestamp += gap_ms * 1_000_000;
                (timestamp, txs)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_aggregate_is_deterministic(spec in chain_strategy(), previous_gap in 0u64..5_000) {
        let blocks: Vec<Block> = spec
            .iter()
            .enumerate()
            .map(|(index, &(timestamp, txs))| block(index as u64 + 2, timestamp, txs))
            .collect();
        let previous = block(1, T.saturating_sub(previous_gap * 1_000_000), 0).mark();

        let first = aggregate_page(Some(previous), &blocks).unwrap();
        let second = aggregate_page(Some(previous), &blocks).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(first.0.block_height, blocks.last().unwrap().height());
        prop_assert_eq!(
            first.0.tx_count,
            spec.iter().map(|&(_, txs)| txs as u64).sum::<u64>()
        );
    }

    #[test]
    fn prop_scan_rows_cover_the_chain(
        spec in chain_strategy(),
        page_size in 1usize..40,
        ceiling in prop::option::of(1u64..150),
    ) {
        let store = store_from(&spec);
        let policy = ContinuationPolicy::from_ceiling(ceiling);
        let stopping_height = policy.stopping_height(spec.len() as u64);

        let rows = scanner(page_size, policy).run(&store).unwrap();

        let heights: Vec<u64> = rows.iter().map(|row| row.block_height).collect();
        prop_assert!(heights.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(heights.last().copied(), Some(stopping_height));

        let expected_txs: u64 = spec
            .iter()
            .take(stopping_height as usize)
            .map(|&(_, txs)| txs as u64)
            .sum();
        prop_assert_eq!(rows.iter().map(|row| row.tx_count).sum::<u64>(), expected_txs);
    }
}
