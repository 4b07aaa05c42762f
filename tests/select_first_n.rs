use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use easel::{
    select_first_n, Artwork, FetchError, FetchedPage, RecordSource, SelectError, Session,
};

/// In-memory source: ids 1..=total, counts fetches, can fail chosen offsets.
struct MockSource {
    total: u64,
    page_size: u64,
    calls: Mutex<Vec<u64>>,
    fail_offsets: Mutex<HashSet<u64>>,
}

impl MockSource {
    fn new(total: u64, page_size: u64) -> Self {
        Self {
            total,
            page_size,
            calls: Mutex::new(Vec::new()),
            fail_offsets: Mutex::new(HashSet::new()),
        }
    }

    fn fail_at(self, offset: u64) -> Self {
        self.fail_offsets.lock().unwrap().insert(offset);
        self
    }

    fn heal(&self) {
        self.fail_offsets.lock().unwrap().clear();
    }

    fn calls(&self) -> Vec<u64> {
        self.calls.lock().unwrap().clone()
    }
}

fn artwork(id: u64) -> Artwork {
    Artwork {
        id,
        title: format!("Artwork {id}"),
        place_of_origin: Some("Chicago".into()),
        artist_display: None,
        inscriptions: None,
        date_start: Some(1900),
        date_end: Some(1901),
    }
}

#[async_trait]
impl RecordSource for MockSource {
    async fn fetch(&self, offset: u64) -> Result<FetchedPage, FetchError> {
        self.calls.lock().unwrap().push(offset);
        if self.fail_offsets.lock().unwrap().contains(&offset) {
            return Err(FetchError::Unavailable(format!("offset {offset}")));
        }
        let end = (offset + self.page_size).min(self.total);
        Ok(FetchedPage {
            records: (offset + 1..=end).map(artwork).collect(),
            total: self.total,
        })
    }
}

/// Session primed with page 1, as the table has it after startup.
async fn primed(source: &MockSource) -> Session {
    let mut session = Session::new(source.page_size);
    session.fetch_page(source, 1).await.unwrap();
    source.calls.lock().unwrap().clear();
    session
}

#[tokio::test]
async fn twenty_then_twenty_five_across_three_pages() {
    let source = MockSource::new(30, 12);
    let mut session = Session::new(12);

    let first = select_first_n(&mut session, &source, "20").await.unwrap();
    assert_eq!(first.selected, 20);
    assert_eq!(first.fetched_pages, vec![1, 2]);
    assert_eq!(source.calls(), vec![0, 12]);
    assert!(!session.cache.contains(3));
    assert_eq!(session.selection.selected_ids(), (1..=20).collect::<Vec<_>>());

    let second = select_first_n(&mut session, &source, "25").await.unwrap();
    assert_eq!(second.selected, 25);
    assert_eq!(second.fetched_pages, vec![3]);
    assert_eq!(source.calls(), vec![0, 12, 24]);
    assert_eq!(session.selection.selected_ids(), (1..=25).collect::<Vec<_>>());
}

#[tokio::test]
async fn satisfied_target_fetches_nothing() {
    let source = MockSource::new(30, 12);
    let mut session = primed(&source).await;

    select_first_n(&mut session, &source, "15").await.unwrap();
    let pages = session.cache.page_numbers();
    let selection = session.selection.clone();
    let calls = source.calls().len();

    let again = select_first_n(&mut session, &source, "15").await.unwrap();
    assert!(again.fetched_pages.is_empty());
    assert_eq!(source.calls().len(), calls);
    assert_eq!(session.cache.page_numbers(), pages);
    assert_eq!(session.selection, selection);

    // A smaller target is already met too.
    select_first_n(&mut session, &source, "3").await.unwrap();
    assert_eq!(session.selection.count(), 15);
}

#[tokio::test]
async fn larger_target_never_unselects() {
    let source = MockSource::new(30, 12);
    let mut stepped = primed(&source).await;
    select_first_n(&mut stepped, &source, "8").await.unwrap();
    select_first_n(&mut stepped, &source, "18").await.unwrap();

    let fresh_source = MockSource::new(30, 12);
    let mut direct = primed(&fresh_source).await;
    select_first_n(&mut direct, &fresh_source, "18").await.unwrap();

    let stepped_ids: HashSet<u64> = stepped.selection.selected_ids().into_iter().collect();
    let direct_ids: HashSet<u64> = direct.selection.selected_ids().into_iter().collect();
    assert!(stepped_ids.is_superset(&direct_ids));
}

#[tokio::test]
async fn manual_picks_count_toward_target_and_are_kept() {
    let source = MockSource::new(30, 12);
    let mut session = primed(&source).await;
    session.fetch_page(&source, 3).await.unwrap();
    session.selection.toggle(27, true);
    session.selection.toggle(2, false);

    select_first_n(&mut session, &source, "5").await.unwrap();

    // 27 counts as one; the walk then takes ids 1..=4 from page 1. An
    // explicit false on 2 does not keep the walk from picking it.
    assert_eq!(session.selection.count(), 5);
    assert!(session.selection.is_selected(27));
    assert_eq!(session.selection.selected_ids(), vec![1, 2, 3, 4, 27]);
}

#[tokio::test]
async fn walk_starts_at_page_one_whatever_is_cached() {
    let source = MockSource::new(30, 12);
    let mut session = Session::new(12);
    session.fetch_page(&source, 3).await.unwrap();
    source.calls.lock().unwrap().clear();

    select_first_n(&mut session, &source, "2").await.unwrap();
    assert_eq!(source.calls(), vec![0]);
    assert_eq!(session.selection.selected_ids(), vec![1, 2]);
}

#[tokio::test]
async fn target_above_total_stops_at_total() {
    let source = MockSource::new(30, 12);
    let mut session = primed(&source).await;

    let outcome = select_first_n(&mut session, &source, "500").await.unwrap();
    assert_eq!(outcome.selected, 30);
    assert_eq!(outcome.fetched_pages, vec![2, 3]);
    assert_eq!(session.selection.count(), 30);
}

#[tokio::test]
async fn count_beyond_usize_walks_every_page() {
    let source = MockSource::new(30, 12);
    let mut session = Session::new(12);

    let outcome = select_first_n(&mut session, &source, "99999999999999999999999")
        .await
        .unwrap();
    assert_eq!(outcome.selected, 30);
    assert_eq!(outcome.fetched_pages, vec![1, 2, 3]);
}

#[tokio::test]
async fn invalid_counts_change_nothing() {
    let source = MockSource::new(30, 12);
    let mut session = primed(&source).await;
    session.selection.toggle(4, true);
    let pages = session.cache.page_numbers();
    let selection = session.selection.clone();

    for bad in ["0", "-5", "abc", ""] {
        let err = select_first_n(&mut session, &source, bad).await.unwrap_err();
        assert!(matches!(err, SelectError::InvalidCount(_)), "{bad:?}");
    }
    assert!(source.calls().is_empty());
    assert_eq!(session.cache.page_numbers(), pages);
    assert_eq!(session.selection, selection);
}

#[tokio::test]
async fn failed_page_aborts_but_keeps_progress() {
    let source = MockSource::new(40, 10).fail_at(10);
    let mut session = Session::new(10);

    let err = select_first_n(&mut session, &source, "35").await.unwrap_err();
    match err {
        SelectError::Fetch { page, selected, .. } => {
            assert_eq!(page, 2);
            assert_eq!(selected, 10);
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
    // Page 3 was never attempted and page 2 was not cached.
    assert_eq!(source.calls(), vec![0, 10]);
    assert!(!session.cache.contains(2));
    assert_eq!(session.selection.selected_ids(), (1..=10).collect::<Vec<_>>());

    source.heal();
    let outcome = select_first_n(&mut session, &source, "35").await.unwrap();
    assert_eq!(outcome.selected, 35);
    assert_eq!(outcome.fetched_pages, vec![2, 3, 4]);
}

#[tokio::test]
async fn selected_records_follow_the_union_of_cached_pages() {
    let source = MockSource::new(30, 12);
    let mut session = Session::new(12);
    select_first_n(&mut session, &source, "14").await.unwrap();

    let ids: Vec<u64> = session.selected_records().iter().map(|a| a.id).collect();
    assert_eq!(ids, (1..=14).collect::<Vec<_>>());
}
