use crate::*;

use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }
}

#[derive(Debug)]
struct Row {
    id: usize,
    size: u32,
    index: usize,
    focused: bool,
    measured: usize,
    rect: Option<Rect>,
}

#[derive(Debug, Default)]
struct RowPool {
    pool: Vec<Row>,
    created: usize,
    recycled: usize,
    focus_cleared: usize,
    last_owner: Option<OwnerId>,
}

impl ElementFactory<u32> for RowPool {
    type Element = Row;

    fn get_or_create(&mut self, item: &u32, index: usize, owner: OwnerId) -> Row {
        self.last_owner = Some(owner);
        match self.pool.pop() {
            Some(mut row) => {
                row.size = *item;
                row.index = index;
                row.measured = 0;
                row.rect = None;
                row
            }
            None => {
                let id = self.created;
                self.created += 1;
                Row {
                    id,
                    size: *item,
                    index,
                    focused: false,
                    measured: 0,
                    rect: None,
                }
            }
        }
    }

    fn recycle(&mut self, row: Row) {
        self.recycled += 1;
        self.pool.push(row);
    }

    fn update_index(&mut self, row: &mut Row, _old_index: usize, new_index: usize) {
        row.index = new_index;
    }

    fn clear_focus(&mut self, row: &mut Row) {
        row.focused = false;
        self.focus_cleared += 1;
    }
}

#[derive(Debug)]
struct Rows {
    orientation: Orientation,
    cross_of: fn(usize) -> f64,
}

impl Rows {
    fn vertical() -> Self {
        Self {
            orientation: Orientation::Vertical,
            cross_of: |_| 100.0,
        }
    }
}

impl LayoutStrategy<Row> for Rows {
    fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn measure_element(&mut self, row: &mut Row, index: usize, constraint: Constraint) -> Size {
        row.measured += 1;
        let cross = constraint
            .cross(self.orientation)
            .unwrap_or((self.cross_of)(index));
        self.orientation.size(row.size as f64, cross)
    }

    fn arrange_element(&mut self, row: &mut Row, _index: usize, rect: Rect) {
        row.rect = Some(rect);
    }
}

/// A vertical scroll surface that clamps to the arranged extent.
#[derive(Debug)]
struct TestHost {
    height: f64,
    scroll: f64,
    respond: bool,
    ancestor: Option<Rect>,
    extent: Size,
    candidates: Vec<usize>,
    requests: Vec<Rect>,
}

impl TestHost {
    fn new(height: f64) -> Self {
        Self {
            height,
            scroll: 0.0,
            respond: true,
            ancestor: None,
            extent: Size::ZERO,
            candidates: Vec::new(),
            requests: Vec::new(),
        }
    }

    fn viewport(&self) -> Rect {
        Rect::new(0.0, self.scroll, 100.0, self.height)
    }

    fn scroll_to(&mut self, offset: f64) {
        let max = (self.extent.height - self.height).max(0.0);
        self.scroll = offset.max(0.0).min(max);
    }
}

impl ScrollHost<Row> for TestHost {
    fn ancestor_viewport(&self) -> Option<Rect> {
        self.ancestor
    }

    fn extent_changed(&mut self, extent: Size) {
        self.extent = extent;
    }

    fn realigned(&mut self, delta: f64) {
        self.scroll = (self.scroll + delta).max(0.0);
    }

    fn clear_anchor_candidates(&mut self) {
        self.candidates.clear();
    }

    fn register_anchor_candidate(&mut self, index: usize, _row: &Row, _rect: Rect) {
        self.candidates.push(index);
    }

    fn bring_into_view(&mut self, _row: &Row, rect: Rect) -> Option<Rect> {
        self.requests.push(rect);
        if rect.y < self.scroll {
            self.scroll_to(rect.y);
        } else if rect.bottom() > self.scroll + self.height {
            self.scroll_to(rect.bottom() - self.height);
        }
        self.respond.then(|| self.viewport())
    }
}

type Engine = VirtualizingEngine<u32, RowPool, Rows>;

const AVAILABLE: Constraint = Constraint::new(Some(100.0), None);

fn engine_with_estimate(estimate: f64) -> Engine {
    VirtualizingEngine::with_options(
        RowPool::default(),
        Rows::vertical(),
        EngineOptions::new().with_estimated_element_size(estimate),
    )
}

fn settle<F, L>(engine: &mut VirtualizingEngine<u32, F, L>, items: &[u32], host: &mut TestHost)
where
    F: ElementFactory<u32, Element = Row>,
    L: LayoutStrategy<Row>,
{
    engine.on_viewport_changed(host.viewport());
    engine.layout(items, AVAILABLE, host);
}

fn range(start_index: usize, end_index: usize) -> Option<RealizedRange> {
    Some(RealizedRange {
        start_index,
        end_index,
    })
}

fn assert_bindings(engine: &Engine, items: &[u32]) {
    assert!(engine.window().is_contiguous());
    for (index, row) in engine.realized_elements() {
        assert_eq!(row.index, index);
        assert_eq!(row.size, items[index], "row bound to a stale item at {index}");
    }
}

fn assert_pool_accounting(engine: &Engine) {
    let live = engine.realized_elements().count();
    assert_eq!(engine.factory().created, live + engine.factory().pool.len());

    let mut ids: Vec<usize> = engine.realized_elements().map(|(_, r)| r.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), live, "an element is bound to two indices");
}

#[test]
fn small_list_is_fully_realized() {
    let items = vec![20u32; 3];
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(50.0);
    settle(&mut engine, &items, &mut host);

    assert_eq!(engine.realized_range(), range(0, 3));
    assert_eq!(engine.desired_size(), Size::new(100.0, 60.0));
    assert_eq!(engine.element_rect(2), Some(Rect::new(0.0, 40.0, 100.0, 20.0)));
    assert_eq!(host.candidates, vec![0, 1, 2]);
    assert_eq!(host.extent, Size::new(100.0, 60.0));
    assert!(!engine.needs_measure());
}

#[test]
fn estimated_anchor_realizes_only_the_viewport() {
    let items = vec![20u32; 1000];
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(50.0);
    host.scroll = 100.0;
    settle(&mut engine, &items, &mut host);

    // Default estimate of 25 puts index 4 at offset 100.
    assert_eq!(engine.realized_range(), range(4, 7));
    assert_eq!(engine.element_rect(4), Some(Rect::new(0.0, 100.0, 100.0, 20.0)));
    assert_eq!(engine.estimated_element_size(), 20.0);
    assert_eq!(engine.desired_size().height, 160.0 + 993.0 * 20.0);
    assert_eq!(engine.last_measure_constraint(), Some(AVAILABLE));
}

#[test]
fn repeated_layout_is_idempotent() {
    let items = vec![20u32; 1000];
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(100.0);
    host.scroll = 300.0;
    settle(&mut engine, &items, &mut host);

    let first_range = engine.realized_range();
    let first_desired = engine.desired_size();
    let ids: Vec<usize> = engine.realized_elements().map(|(_, r)| r.id).collect();

    assert!(!engine.on_viewport_changed(host.viewport()));
    engine.layout(&items, AVAILABLE, &mut host);

    assert_eq!(engine.realized_range(), first_range);
    assert_eq!(engine.desired_size(), first_desired);
    let again: Vec<usize> = engine.realized_elements().map(|(_, r)| r.id).collect();
    assert_eq!(again, ids);
    assert_eq!(engine.factory().recycled, 0);
}

#[test]
fn recycling_everything_and_remeasuring_reproduces_the_window() {
    let items = vec![20u32; 1000];
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(100.0);
    host.scroll = 300.0;
    settle(&mut engine, &items, &mut host);
    settle(&mut engine, &items, &mut host);
    // The first pass used the default estimate of 25; the estimate is now 20.
    assert_eq!(engine.realized_range(), range(12, 17));
    assert_eq!(engine.estimated_element_size(), 20.0);
    let before: Vec<(usize, Option<Rect>)> = engine
        .realized_elements()
        .map(|(i, _)| (i, engine.element_rect(i)))
        .collect();

    engine.reset();
    assert_eq!(engine.realized_range(), None);
    settle(&mut engine, &items, &mut host);

    let after: Vec<(usize, Option<Rect>)> = engine
        .realized_elements()
        .map(|(i, _)| (i, engine.element_rect(i)))
        .collect();
    assert_eq!(after, before);
    assert_eq!(engine.factory().created, 5);
}

#[test]
fn viewport_far_away_recycles_and_stays_bounded() {
    let items = vec![20u32; 100_000];
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(200.0);
    settle(&mut engine, &items, &mut host);
    assert_eq!(engine.realized_range(), range(0, 10));

    let mut rng = Lcg::new(7);
    let mut offsets = vec![1_000_000.0, 1_999_800.0, 37_420.0, 0.0];
    for _ in 0..50 {
        offsets.push(rng.gen_range_usize(0, 1_999_801) as f64);
    }

    for offset in offsets {
        host.scroll = offset;
        settle(&mut engine, &items, &mut host);

        assert!(engine.window().len() <= 30, "window too large at {offset}");
        let visible = (offset / 20.0) as usize;
        assert!(
            engine.realized_range().is_some_and(|r| r.contains(visible)),
            "index {visible} not realized at {offset}"
        );
        assert_bindings(&engine, &items);
        assert_pool_accounting(&engine);
    }
    assert!(engine.factory().created <= 30);
}

#[test]
fn random_scrolling_and_mutations_keep_window_contiguous() {
    let mut rng = Lcg::new(0x5eed);
    let mut items: Vec<u32> = (0..300).map(|_| rng.gen_range_u32(10, 41)).collect();
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(120.0);
    settle(&mut engine, &items, &mut host);

    for _ in 0..400 {
        match rng.gen_range_u32(0, 8) {
            0 | 1 => {
                let max = (host.extent.height - host.height).max(0.0) as usize;
                host.scroll = rng.gen_range_usize(0, max + 1) as f64;
            }
            2 => {
                let at = rng.gen_range_usize(0, items.len() + 1);
                let count = rng.gen_range_usize(1, 4);
                let added: Vec<u32> = (0..count).map(|_| rng.gen_range_u32(10, 41)).collect();
                items.splice(at..at, added);
                engine.items_changed(ItemsChanged::Insert { at, count });
            }
            3 if items.len() > 20 => {
                let at = rng.gen_range_usize(0, items.len() - 5);
                let count = rng.gen_range_usize(1, 5);
                items.drain(at..at + count);
                engine.items_changed(ItemsChanged::Remove { at, count });
            }
            4 if items.len() > 20 => {
                let at = rng.gen_range_usize(0, items.len() - 3);
                let old_count = rng.gen_range_usize(1, 3);
                let new_count = rng.gen_range_usize(1, 4);
                let added: Vec<u32> = (0..new_count)
                    .map(|_| rng.gen_range_u32(10, 41))
                    .collect();
                items.splice(at..at + old_count, added);
                engine.items_changed(ItemsChanged::Replace {
                    at,
                    old_count,
                    new_count,
                });
            }
            5 if items.len() > 20 => {
                let from = rng.gen_range_usize(0, items.len() - 3);
                let count = rng.gen_range_usize(1, 3);
                let moved: Vec<u32> = items.drain(from..from + count).collect();
                let to = rng.gen_range_usize(0, items.len() + 1);
                items.splice(to..to, moved);
                engine.items_changed(ItemsChanged::Move { from, to, count });
            }
            6 => {
                if let Some(r) = engine.realized_range() {
                    engine.focus_entered(rng.gen_range_usize(r.start_index, r.end_index));
                }
            }
            _ => engine.focus_lost(),
        }

        settle(&mut engine, &items, &mut host);

        assert!(engine.window().len() <= 40);
        assert_bindings(&engine, &items);
        assert_pool_accounting(&engine);
        if let Some(focused) = engine.focused_index() {
            assert!(focused < items.len());
        }
    }
}

#[test]
fn insert_inside_window_shifts_elements() {
    let mut items = vec![20u32; 100];
    let mut engine = engine_with_estimate(20.0);
    let mut host = TestHost::new(200.0);
    host.scroll = 100.0;
    settle(&mut engine, &items, &mut host);
    assert_eq!(engine.realized_range(), range(5, 15));

    let id8 = engine.try_get_element(8).map(|r| r.id);
    items.splice(8..8, [20, 20, 20]);
    engine.items_changed(ItemsChanged::Insert { at: 8, count: 3 });

    assert!(engine.needs_measure());
    assert_eq!(engine.try_get_element(11).map(|r| r.id), id8);
    assert_eq!(engine.try_get_element(11).map(|r| r.index), Some(11));
    assert!(engine.try_get_element(8).is_none());
    assert_eq!(engine.realized_range(), range(5, 18));
    assert!(!engine.is_realized(8));
    assert!(engine.is_realized(11));

    settle(&mut engine, &items, &mut host);
    assert_eq!(engine.realized_range(), range(5, 15));
    assert_eq!(engine.try_get_element(11).map(|r| r.id), id8);
    assert_bindings(&engine, &items);
}

#[test]
fn remove_evicts_focused_element() {
    let mut items = vec![20u32; 100];
    let mut engine = engine_with_estimate(20.0);
    let mut host = TestHost::new(200.0);
    host.scroll = 100.0;
    settle(&mut engine, &items, &mut host);

    engine.focus_entered(6);
    let id6 = {
        let row = engine.try_get_element_mut(6).expect("row 6 realized");
        row.focused = true;
        row.id
    };
    let id8 = engine.try_get_element(8).map(|r| r.id);

    items.drain(5..8);
    engine.items_changed(ItemsChanged::Remove { at: 5, count: 3 });

    assert_eq!(engine.focused_index(), None);
    assert_eq!(engine.factory().focus_cleared, 1);
    let evicted = engine.factory().pool.iter().find(|r| r.id == id6);
    assert!(evicted.is_some_and(|r| !r.focused));
    assert_eq!(engine.try_get_element(5).map(|r| r.id), id8);
    assert_eq!(engine.realized_range(), range(5, 12));

    settle(&mut engine, &items, &mut host);
    assert_bindings(&engine, &items);
    assert_pool_accounting(&engine);
}

#[test]
fn focused_element_survives_scrolling() {
    let items = vec![20u32; 1000];
    let mut engine = engine_with_estimate(20.0);
    let mut host = TestHost::new(100.0);
    settle(&mut engine, &items, &mut host);

    engine.focus_entered(2);
    let id2 = engine.try_get_element(2).map(|r| r.id);

    host.scroll = 5000.0;
    settle(&mut engine, &items, &mut host);
    assert_eq!(engine.realized_range(), range(250, 255));
    assert_eq!(engine.try_get_element(2).map(|r| r.id), id2);
    assert!(engine.realized_elements().any(|(i, _)| i == 2));
    assert!(engine.element_rect(2).is_some());
    assert!(!host.candidates.contains(&2));

    host.scroll = 0.0;
    settle(&mut engine, &items, &mut host);
    assert_eq!(engine.realized_range(), range(0, 5));
    assert_eq!(engine.try_get_element(2).map(|r| r.id), id2);

    host.scroll = 5000.0;
    settle(&mut engine, &items, &mut host);
    let recycled = engine.factory().recycled;
    engine.focus_lost();
    assert!(engine.try_get_element(2).is_none());
    assert_eq!(engine.factory().recycled, recycled + 1);
    assert_pool_accounting(&engine);
}

#[test]
fn insert_before_parked_focus_shifts_pin() {
    let mut items = vec![20u32; 1000];
    let mut engine = engine_with_estimate(20.0);
    let mut host = TestHost::new(100.0);
    settle(&mut engine, &items, &mut host);

    engine.focus_entered(2);
    let id2 = engine.try_get_element(2).map(|r| r.id);
    host.scroll = 5000.0;
    settle(&mut engine, &items, &mut host);

    items.insert(0, 20);
    engine.items_changed(ItemsChanged::Insert { at: 0, count: 1 });
    assert_eq!(engine.focused_index(), Some(3));
    assert_eq!(engine.try_get_element(3).map(|r| (r.id, r.index)), id2.map(|id| (id, 3)));
    assert!(engine.try_get_element(2).is_none());
}

#[test]
fn bring_into_view_scrolls_unrealized_item_into_view() {
    let items = vec![20u32; 1000];
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(100.0);
    settle(&mut engine, &items, &mut host);
    assert_eq!(engine.realized_range(), range(0, 5));

    for index in [500, 999, 0, 250] {
        let found = engine
            .bring_into_view(&items, index, None, &mut host)
            .map(|r| r.index);
        assert_eq!(found, Some(index));

        let rect = engine.element_rect(index).expect("arranged");
        assert!(host.viewport().contains(&rect), "index {index} not visible");
        assert!(!engine.is_waiting_for_viewport());
        assert_bindings(&engine, &items);
        assert_pool_accounting(&engine);
    }
    assert_eq!(engine.realized_range(), range(246, 251));
}

#[test]
fn bring_into_view_towards_smaller_rows_stays_reachable() {
    // Rows below index 100 are a third of the size of the realized ones, so extrapolating back
    // with the realized mean would place index 10 far before offset 0.
    let mut items = vec![20u32; 100];
    items.extend(core::iter::repeat_n(60u32, 900));
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(100.0);
    host.scroll = 3000.0;
    settle(&mut engine, &items, &mut host);
    assert_eq!(engine.realized_range(), range(120, 122));

    let found = engine
        .bring_into_view(&items, 10, None, &mut host)
        .map(|r| r.index);
    assert_eq!(found, Some(10));
    let rect = engine.element_rect(10).expect("arranged");
    assert!(rect.y >= 0.0);
    assert!(rect.intersects(&host.viewport()), "{rect:?} outside {:?}", host.viewport());
    assert_eq!(host.scroll, 250.0);
    assert_eq!(engine.realized_range(), range(10, 15));

    host.scroll = 0.0;
    settle(&mut engine, &items, &mut host);
    assert_eq!(engine.realized_range(), range(0, 5));
    assert_eq!(engine.element_rect(0), Some(Rect::new(0.0, 0.0, 100.0, 20.0)));
    assert_bindings(&engine, &items);
    assert_pool_accounting(&engine);
}

#[test]
fn bring_into_view_moves_target_into_a_host_that_cannot_scroll() {
    struct FixedHost(Rect);
    impl ScrollHost<Row> for FixedHost {
        fn bring_into_view(&mut self, _row: &Row, _rect: Rect) -> Option<Rect> {
            Some(self.0)
        }
    }

    let items = vec![20u32; 1000];
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
    let mut host = FixedHost(viewport);
    engine.on_viewport_changed(viewport);
    engine.layout(&items, AVAILABLE, &mut host);
    assert_eq!(engine.realized_range(), range(0, 5));

    let found = engine
        .bring_into_view(&items, 500, None, &mut host)
        .map(|r| r.index);
    assert_eq!(found, Some(500));
    assert!(!engine.is_waiting_for_viewport());
    assert_eq!(engine.element_rect(500), Some(Rect::new(0.0, 80.0, 100.0, 20.0)));
    assert_eq!(engine.realized_range(), range(496, 501));
    assert_pool_accounting(&engine);
}

#[test]
fn bring_into_view_of_realized_element_uses_sub_rect() {
    let items = vec![20u32; 1000];
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(100.0);
    settle(&mut engine, &items, &mut host);

    let found = engine
        .bring_into_view(&items, 2, Some(Rect::new(0.0, 5.0, 10.0, 10.0)), &mut host)
        .map(|r| r.index);
    assert_eq!(found, Some(2));
    assert_eq!(host.requests.last(), Some(&Rect::new(0.0, 45.0, 10.0, 10.0)));
    assert_eq!(host.scroll, 0.0);
    assert_eq!(engine.factory().created, 5);
}

#[test]
fn bring_into_view_grows_extent_before_scrolling() {
    let mut items = vec![20u32; 1000];
    items[999] = 60;
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(100.0);
    settle(&mut engine, &items, &mut host);
    assert_eq!(host.extent.height, 20_000.0);

    // Estimated at 19980..20040, past the arranged extent: the host can only scroll there once the
    // extent has grown.
    let found = engine
        .bring_into_view(&items, 999, None, &mut host)
        .map(|r| r.index);
    assert_eq!(found, Some(999));
    assert_eq!(host.extent.height, 20_040.0);
    assert_eq!(host.scroll, 19_940.0);
    assert_eq!(engine.realized_range(), range(997, 1000));
    let rect = engine.element_rect(999).expect("arranged");
    assert!(host.viewport().contains(&rect));
}

#[test]
fn late_viewport_report_completes_bring_into_view() {
    let items = vec![20u32; 1000];
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(100.0);
    settle(&mut engine, &items, &mut host);

    host.respond = false;
    let found = engine
        .bring_into_view(&items, 500, None, &mut host)
        .map(|r| r.index);
    assert_eq!(found, Some(500));
    assert!(!engine.is_waiting_for_viewport());
    assert_eq!(engine.realized_range(), range(500, 505));
    assert_eq!(host.scroll, 9920.0);

    assert!(engine.on_viewport_changed(host.viewport()));
    engine.layout(&items, AVAILABLE, &mut host);
    assert_eq!(engine.realized_range(), range(496, 501));
    let rect = engine.element_rect(500).expect("arranged");
    assert!(host.viewport().contains(&rect));
    assert_pool_accounting(&engine);
}

#[test]
fn bring_into_view_before_first_measure_does_nothing() {
    let items = vec![20u32; 10];
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(100.0);
    assert!(engine.bring_into_view(&items, 3, None, &mut host).is_none());
    assert_eq!(engine.factory().created, 0);
    assert!(host.requests.is_empty());
}

#[test]
#[should_panic(expected = "out of range")]
fn bring_into_view_rejects_out_of_range_index() {
    let items = vec![20u32; 10];
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(100.0);
    settle(&mut engine, &items, &mut host);
    let _ = engine.bring_into_view(&items, 10, None, &mut host);
}

#[test]
fn zero_area_viewport_is_unknown() {
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    assert!(!engine.on_viewport_changed(Rect::new(0.0, 0.0, 0.0, 0.0)));
    assert_eq!(engine.viewport(), Viewport::Unknown);

    assert!(engine.on_viewport_changed(Rect::new(0.0, 0.0, 100.0, 50.0)));
    assert!(engine.viewport().is_known());

    // A cross-axis move does not require a new measure pass.
    assert!(!engine.on_viewport_changed(Rect::new(30.0, 0.0, 100.0, 50.0)));

    assert!(engine.on_viewport_changed(Rect::new(0.0, 0.0, 100.0, 0.0)));
    assert_eq!(engine.viewport(), Viewport::Unknown);
}

#[test]
fn unknown_viewport_falls_back_to_ancestor_then_constraint() {
    let items = vec![20u32; 100];

    let mut engine = engine_with_estimate(20.0);
    let mut host = TestHost::new(100.0);
    engine.layout(&items, Constraint::new(Some(100.0), Some(60.0)), &mut host);
    assert_eq!(engine.realized_range(), range(0, 3));

    let mut engine = engine_with_estimate(20.0);
    host.ancestor = Some(Rect::new(0.0, 40.0, 100.0, 40.0));
    engine.layout(&items, AVAILABLE, &mut host);
    assert_eq!(engine.realized_range(), range(2, 4));
}

#[test]
fn shared_pool_serves_two_engines() {
    let items = vec![20u32; 50];
    let pool = Rc::new(RefCell::new(RowPool::default()));
    let mut a: VirtualizingEngine<u32, _, _> = VirtualizingEngine::with_options(
        Rc::clone(&pool),
        Rows::vertical(),
        EngineOptions::new().with_owner(OwnerId(1)),
    );
    let mut b: VirtualizingEngine<u32, _, _> = VirtualizingEngine::with_options(
        Rc::clone(&pool),
        Rows::vertical(),
        EngineOptions::new().with_owner(OwnerId(2)),
    );

    let mut host_a = TestHost::new(100.0);
    settle(&mut a, &items, &mut host_a);
    assert_eq!(pool.borrow().created, 5);
    assert_eq!(pool.borrow().last_owner, Some(OwnerId(1)));

    a.detach();
    assert_eq!(a.realized_range(), None);
    assert_eq!(a.viewport(), Viewport::Unknown);
    assert_eq!(pool.borrow().pool.len(), 5);

    let mut host_b = TestHost::new(100.0);
    settle(&mut b, &items, &mut host_b);
    assert_eq!(pool.borrow().created, 5);
    assert_eq!(pool.borrow().last_owner, Some(OwnerId(2)));
    assert!(pool.borrow().pool.is_empty());
}

#[test]
fn shared_cross_layout_remeasures_to_widest() {
    let items = vec![20u32; 100];
    let strategy = SharedCrossLayout::new(Rows {
        orientation: Orientation::Vertical,
        cross_of: |i| 40.0 + (i % 4) as f64 * 10.0,
    });
    let mut engine: VirtualizingEngine<u32, _, _> = VirtualizingEngine::with_options(
        RowPool::default(),
        strategy,
        EngineOptions::new().with_estimated_element_size(20.0),
    );
    let mut host = TestHost::new(100.0);
    engine.on_viewport_changed(host.viewport());
    engine.layout(&items, Constraint::UNBOUNDED, &mut host);

    assert_eq!(engine.strategy().committed_cross(), Some(70.0));
    assert_eq!(engine.desired_size().width, 70.0);
    assert_eq!(engine.window().len(), 5);
    for (_, row) in engine.realized_elements() {
        assert_eq!(row.measured, 2);
        assert_eq!(row.rect.map(|r| r.width), Some(70.0));
    }
}

#[test]
fn index_zero_is_realigned_after_estimate_drift() {
    let items = vec![20u32; 1000];
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(100.0);
    host.scroll = 1000.0;
    settle(&mut engine, &items, &mut host);
    assert_eq!(engine.realized_range(), range(40, 45));

    // The estimate placed index 40 at 1000 although 40 rows of 20 only reach 800.
    host.scroll = 0.0;
    settle(&mut engine, &items, &mut host);
    assert_eq!(engine.realized_range(), range(0, 5));
    assert_eq!(engine.element_rect(0), Some(Rect::new(0.0, 0.0, 100.0, 20.0)));
    assert_eq!(engine.element_rect(4), Some(Rect::new(0.0, 80.0, 100.0, 20.0)));
    assert_eq!(engine.desired_size().height, 20_000.0);
}

#[test]
fn realignment_keeps_scroll_target_visible() {
    let items = vec![20u32; 1000];
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(100.0);
    host.scroll = 1000.0;
    settle(&mut engine, &items, &mut host);
    assert_eq!(engine.realized_range(), range(40, 45));

    // The host jumps to the top without reporting it; index 3 is then estimated at 260, below
    // the host viewport, and the walk back reaches index 0 at 200.
    host.scroll = 0.0;
    let found = engine
        .bring_into_view(&items, 3, None, &mut host)
        .map(|r| r.index);
    assert_eq!(found, Some(3));
    assert_eq!(host.scroll, 0.0);
    assert_eq!(engine.viewport(), Viewport::Known(Rect::new(0.0, 0.0, 100.0, 100.0)));
    assert_eq!(engine.element_rect(0), Some(Rect::new(0.0, 0.0, 100.0, 20.0)));
    assert_eq!(engine.element_rect(3), Some(Rect::new(0.0, 60.0, 100.0, 20.0)));
    assert_eq!(engine.realized_range(), range(0, 5));
}

#[test]
fn reset_releases_everything() {
    let mut items = vec![20u32; 100];
    let mut engine = Engine::new(RowPool::default(), Rows::vertical());
    let mut host = TestHost::new(100.0);
    settle(&mut engine, &items, &mut host);
    engine.focus_entered(1);

    items.clear();
    engine.items_changed(ItemsChanged::Reset);
    assert_eq!(engine.focused_index(), None);
    assert_eq!(engine.factory().focus_cleared, 1);
    assert_eq!(engine.factory().pool.len(), engine.factory().created);

    settle(&mut engine, &items, &mut host);
    assert_eq!(engine.desired_size(), Size::ZERO);
    assert_eq!(engine.realized_range(), None);
}

#[test]
fn reset_clears_focus_on_parked_element() {
    let items = vec![20u32; 1000];
    let mut engine = engine_with_estimate(20.0);
    let mut host = TestHost::new(100.0);
    settle(&mut engine, &items, &mut host);

    engine.focus_entered(2);
    let id2 = {
        let row = engine.try_get_element_mut(2).expect("row 2 realized");
        row.focused = true;
        row.id
    };
    host.scroll = 5000.0;
    settle(&mut engine, &items, &mut host);
    assert!(!engine.window().spans(2));

    engine.items_changed(ItemsChanged::Reset);
    assert_eq!(engine.focused_index(), None);
    assert_eq!(engine.factory().focus_cleared, 1);
    let pooled = engine.factory().pool.iter().find(|r| r.id == id2);
    assert!(pooled.is_some_and(|r| !r.focused));
}

#[test]
fn shrunk_source_clears_focus_on_parked_element() {
    let items = vec![20u32; 1000];
    let mut engine = engine_with_estimate(20.0);
    let mut host = TestHost::new(100.0);
    settle(&mut engine, &items, &mut host);

    engine.focus_entered(2);
    if let Some(row) = engine.try_get_element_mut(2) {
        row.focused = true;
    }
    host.scroll = 5000.0;
    settle(&mut engine, &items, &mut host);

    // The source shrank without a change notification; the pin is pruned on the next pass.
    let short = vec![20u32; 2];
    settle(&mut engine, &short, &mut host);
    assert_eq!(engine.focused_index(), None);
    assert_eq!(engine.factory().focus_cleared, 1);
    assert!(engine.factory().pool.iter().all(|r| !r.focused));
}

#[test]
fn horizontal_orientation_uses_x_as_primary_axis() {
    let items = vec![20u32; 100];
    let mut engine: VirtualizingEngine<u32, _, _> = VirtualizingEngine::with_options(
        RowPool::default(),
        Rows {
            orientation: Orientation::Horizontal,
            cross_of: |_| 30.0,
        },
        EngineOptions::new().with_estimated_element_size(20.0),
    );
    let mut host = TestHost::new(100.0);
    engine.on_viewport_changed(Rect::new(100.0, 0.0, 50.0, 30.0));
    engine.layout(&items, Constraint::new(None, Some(30.0)), &mut host);

    assert_eq!(engine.realized_range(), range(5, 8));
    assert_eq!(engine.element_rect(5), Some(Rect::new(100.0, 0.0, 20.0, 30.0)));
    assert_eq!(engine.desired_size(), Size::new(2000.0, 30.0));
}

#[test]
#[should_panic(expected = "does not extend")]
fn window_append_rejects_gaps() {
    let mut window = ItemWindow::new();
    window.append(Slot::new(3, ()));
    window.append(Slot::new(5, ()));
}

#[test]
fn anchor_on_shared_boundary_prefers_later_index() {
    let mut window = ItemWindow::new();
    for i in 0..3 {
        let mut slot = Slot::new(i, ());
        slot.start = i as f64 * 20.0;
        slot.size = 20.0;
        window.append(slot);
    }

    assert_eq!(
        window.get_or_estimate_anchor(20.0, 60.0, 10, 25.0),
        Some(Anchor {
            index: 1,
            offset: 20.0
        })
    );
    assert_eq!(
        window.get_or_estimate_anchor(100.0, 140.0, 10, 25.0),
        Some(Anchor {
            index: 5,
            offset: 100.0
        })
    );
    // Clamped to the last valid index.
    assert_eq!(
        window.get_or_estimate_anchor(1000.0, 1040.0, 10, 25.0),
        Some(Anchor {
            index: 9,
            offset: 180.0
        })
    );
    assert_eq!(window.get_or_estimate_offset(7, 25.0), 140.0);
    assert_eq!(
        ItemWindow::<()>::new().get_or_estimate_anchor(0.0, 10.0, 0, 25.0),
        None
    );
}

#[test]
fn backward_extrapolation_never_goes_negative() {
    let mut window = ItemWindow::new();
    for i in 120..122 {
        let mut slot = Slot::new(i, ());
        slot.start = 3000.0 + (i - 120) as f64 * 60.0;
        slot.size = 60.0;
        window.append(slot);
    }

    // The realized mean of 60 would put index 10 at -3600; the space before index 120 only
    // allows 25 per item.
    assert_eq!(window.get_or_estimate_offset(10, 25.0), 250.0);
    assert_eq!(
        window.get_or_estimate_anchor(0.0, 100.0, 1000, 25.0),
        Some(Anchor {
            index: 0,
            offset: 0.0
        })
    );
    assert_eq!(
        window.get_or_estimate_anchor(1000.0, 1100.0, 1000, 25.0),
        Some(Anchor {
            index: 40,
            offset: 1000.0
        })
    );
}

#[test]
fn window_removal_reindexes_survivors() {
    struct Sink(Vec<usize>);
    impl WindowSink<usize> for Sink {
        fn recycle(&mut self, slot: Slot<usize>) {
            self.0.push(slot.element);
        }

        fn reindex(&mut self, element: &mut usize, _old_index: usize, new_index: usize) {
            *element = new_index;
        }
    }

    let mut window = ItemWindow::new();
    for i in 10..16 {
        window.append(Slot::new(i, i));
    }
    let mut sink = Sink(Vec::new());
    window.items_removed(11, 2, &mut sink);

    assert_eq!(sink.0, vec![11, 12]);
    assert_eq!(window.range(), range(10, 14));
    assert_eq!(window.get(11), Some(&11));
    assert!(window.is_contiguous());

    // The moved index is not realized yet, so it leaves a hole until the next measure pass.
    window.items_moved(10, 12, 1, &mut sink);
    assert_eq!(sink.0, vec![11, 12, 10]);
    assert_eq!(window.range(), range(10, 14));
    assert!(window.get(12).is_none());
    assert!(!window.is_contiguous());
}
