//! Paged, deduplicated list of feed items.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::api::VideoItem;
use crate::feed::interaction::StatsPatch;

pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// Request the next page once the active item is this close to the end.
pub const PREFETCH_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    pub added: usize,
    pub replaced: bool,
}

#[derive(Debug)]
pub struct FeedList {
    items: Vec<VideoItem>,
    seen: HashSet<String>,
    limit: u32,
    next_page: u32,
    has_more: bool,
    in_flight: Option<u32>,
    loading_start: Option<Instant>,
    error: Option<String>,
    failed_page: Option<u32>,
}

impl Default for FeedList {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl FeedList {
    pub fn new(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            limit: limit.max(1),
            next_page: 1,
            has_more: true,
            in_flight: None,
            loading_start: None,
            error: None,
            failed_page: None,
        }
    }

    /// Marks `page` as in flight. Refuses while another fetch is running, and
    /// refuses pages past the first once the backend has run out.
    pub fn begin_load(&mut self, page: u32) -> Option<PageRequest> {
        if self.in_flight.is_some() || (page > 1 && !self.has_more) {
            return None;
        }
        self.in_flight = Some(page);
        self.loading_start = Some(Instant::now());
        Some(PageRequest {
            page,
            limit: self.limit,
        })
    }

    pub fn begin_refresh(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() {
            return None;
        }
        self.has_more = true;
        self.error = None;
        self.failed_page = None;
        self.begin_load(1)
    }

    pub fn next_request(&mut self) -> Option<PageRequest> {
        self.begin_load(self.next_page)
    }

    /// Merges a fetched page. `returned` is the backend's entry count before
    /// unplayable entries were dropped; a short count means the end.
    pub fn apply_page(&mut self, page: u32, items: Vec<VideoItem>, returned: usize) -> MergeOutcome {
        self.in_flight = None;
        self.error = None;
        self.failed_page = None;
        self.has_more = returned >= self.limit as usize;
        self.next_page = page + 1;

        let replaced = page <= 1;
        if replaced {
            self.items.clear();
            self.seen.clear();
        }
        let before = self.items.len();
        for item in items {
            if self.seen.insert(item.id.clone()) {
                self.items.push(item);
            }
        }
        MergeOutcome {
            added: self.items.len() - before,
            replaced,
        }
    }

    /// Stops further page requests until the next refresh.
    pub fn end_paging(&mut self) {
        self.has_more = false;
    }

    /// Records a failed fetch. Loaded items stay as they were.
    pub fn apply_error(&mut self, page: u32, message: impl Into<String>) {
        if self.in_flight == Some(page) {
            self.in_flight = None;
        }
        self.error = Some(message.into());
        self.failed_page = Some(page);
    }

    /// True when the last fetch that failed was a later page with items
    /// already on screen, so a retry should ask for that page again.
    pub fn load_more_failed(&self) -> bool {
        !self.items.is_empty() && self.failed_page.is_some_and(|page| page > 1)
    }

    pub fn patch(&mut self, id: &str, patch: &StatsPatch) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Updates the follow flag on every loaded item by `creator_id`.
    pub fn set_following(&mut self, creator_id: &str, following: bool) {
        for item in self
            .items
            .iter_mut()
            .filter(|item| item.created_by.id == creator_id)
        {
            item.is_following_creator = following;
        }
    }

    /// Replaces an item in place, e.g. after a purchase refetch.
    pub fn replace(&mut self, item: VideoItem) {
        if let Some(index) = self.position(&item.id) {
            self.items[index] = item;
        }
    }

    pub fn get(&self, index: usize) -> Option<&VideoItem> {
        self.items.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn items(&self) -> &[VideoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn loading_start(&self) -> Option<Instant> {
        self.loading_start
    }

    pub fn is_loading_more(&self) -> bool {
        self.in_flight.is_some_and(|page| page > 1)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn should_prefetch(&self, active: usize) -> bool {
        !self.is_loading()
            && self.has_more
            && !self.items.is_empty()
            && active + PREFETCH_THRESHOLD >= self.items.len()
    }

    pub fn should_show_spinner(&self) -> bool {
        const MIN_SPINNER_DURATION: Duration = Duration::from_millis(500);
        match self.loading_start {
            Some(start) => self.is_loading() || start.elapsed() < MIN_SPINNER_DURATION,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::VideoBuilder;

    fn videos(ids: &[&str]) -> Vec<VideoItem> {
        ids.iter().map(|id| VideoBuilder::new().id(id).build()).collect()
    }

    /// Applies a page where every entry the backend sent was playable.
    fn load(list: &mut FeedList, page: u32, page_ids: &[&str]) -> MergeOutcome {
        list.apply_page(page, videos(page_ids), page_ids.len())
    }

    fn ids(list: &FeedList) -> Vec<&str> {
        list.items().iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn full_first_page_has_more() {
        let mut list = FeedList::new(6);
        let req = list.next_request().unwrap();
        assert_eq!(req, PageRequest { page: 1, limit: 6 });

        let outcome = load(&mut list, 1, &["a", "b", "c", "d", "e", "f"]);

        assert_eq!(
            outcome,
            MergeOutcome {
                added: 6,
                replaced: true
            }
        );
        assert!(list.has_more());
        assert_eq!(list.next_page(), 2);
        assert!(!list.is_loading());
    }

    #[test]
    fn short_page_ends_pagination() {
        let mut list = FeedList::new(6);
        list.next_request();
        load(&mut list, 1, &["a", "b", "c"]);

        assert!(!list.has_more());
        assert!(list.next_request().is_none());
    }

    #[test]
    fn filtered_entries_do_not_end_pagination() {
        let mut list = FeedList::new(6);
        list.next_request();
        // Six entries came back, one without media was dropped.
        list.apply_page(1, videos(&["a", "b", "c", "d", "e"]), 6);

        assert_eq!(list.len(), 5);
        assert!(list.has_more());
        assert_eq!(list.next_request(), Some(PageRequest { page: 2, limit: 6 }));
    }

    #[test]
    fn end_paging_blocks_later_pages_until_refresh() {
        let mut list = FeedList::new(2);
        list.next_request();
        load(&mut list, 1, &["a", "b"]);
        list.end_paging();
        assert!(list.next_request().is_none());
        assert!(list.begin_refresh().is_some());
    }

    #[test]
    fn later_pages_append_only_unseen_ids() {
        let mut list = FeedList::new(3);
        list.next_request();
        load(&mut list, 1, &["a", "b", "c"]);
        list.next_request();
        let outcome = load(&mut list, 2, &["c", "d", "a"]);

        assert_eq!(outcome.added, 1);
        assert!(!outcome.replaced);
        assert_eq!(ids(&list), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn duplicates_within_a_page_are_dropped() {
        let mut list = FeedList::new(6);
        list.next_request();
        load(&mut list, 1, &["a", "a", "b"]);
        assert_eq!(ids(&list), vec!["a", "b"]);
    }

    #[test]
    fn page_one_replaces() {
        let mut list = FeedList::new(2);
        list.next_request();
        load(&mut list, 1, &["a", "b"]);
        list.next_request();
        load(&mut list, 2, &["c", "d"]);

        list.begin_refresh().unwrap();
        load(&mut list, 1, &["x", "a"]);

        assert_eq!(ids(&list), vec!["x", "a"]);
        assert_eq!(list.next_page(), 2);
    }

    #[test]
    fn never_duplicates_over_any_sequence() {
        let mut list = FeedList::new(3);
        let pages = [
            vec!["a", "b", "c"],
            vec!["b", "c", "d"],
            vec!["d", "e", "a"],
            vec!["f", "f", "g"],
        ];
        for (i, page) in pages.iter().enumerate() {
            let page_no = i as u32 + 1;
            assert!(list.begin_load(page_no).is_some());
            load(&mut list, page_no, page);
        }
        let mut seen = HashSet::new();
        for item in list.items() {
            assert!(seen.insert(item.id.clone()), "duplicate {}", item.id);
        }
        assert_eq!(list.len(), 7);
    }

    #[test]
    fn in_flight_guard_blocks_second_request() {
        let mut list = FeedList::new(6);
        assert!(list.next_request().is_some());
        assert!(list.next_request().is_none());
        assert!(list.begin_refresh().is_none());
    }

    #[test]
    fn error_keeps_loaded_items() {
        let mut list = FeedList::new(2);
        list.next_request();
        load(&mut list, 1, &["a", "b"]);
        list.next_request();
        list.apply_error(2, "Network error: connection failed");

        assert_eq!(ids(&list), vec!["a", "b"]);
        assert_eq!(list.error(), Some("Network error: connection failed"));
        assert!(!list.is_loading());
        assert!(list.load_more_failed());
        // Retry asks for the same page again.
        assert_eq!(list.next_request().unwrap().page, 2);
        load(&mut list, 2, &["c", "d"]);
        assert!(!list.load_more_failed());
    }

    #[test]
    fn refresh_clears_error_and_resets_has_more() {
        let mut list = FeedList::new(6);
        list.next_request();
        load(&mut list, 1, &["a"]);
        list.apply_error(1, "boom");
        assert!(!list.has_more());

        let req = list.begin_refresh().unwrap();
        assert_eq!(req.page, 1);
        assert!(list.has_more());
        assert!(list.error().is_none());
    }

    #[test]
    fn patch_and_follow_update_items() {
        let mut list = FeedList::new(6);
        list.next_request();
        list.apply_page(
            1,
            vec![
                VideoBuilder::new().id("a").creator("c1", "maya").build(),
                VideoBuilder::new().id("b").creator("c2", "bo").build(),
                VideoBuilder::new().id("c").creator("c1", "maya").build(),
            ],
            3,
        );

        assert!(list.patch("b", &StatsPatch::likes(42)));
        assert!(!list.patch("zzz", &StatsPatch::likes(1)));
        assert_eq!(list.get(1).unwrap().stats.likes, 42);

        list.set_following("c1", true);
        let following: Vec<bool> = list
            .items()
            .iter()
            .map(|i| i.is_following_creator)
            .collect();
        assert_eq!(following, vec![true, false, true]);
    }

    #[test]
    fn prefetch_near_the_end() {
        let mut list = FeedList::new(6);
        list.next_request();
        load(&mut list, 1, &["a", "b", "c", "d", "e", "f"]);

        assert!(!list.should_prefetch(0));
        assert!(!list.should_prefetch(3));
        assert!(list.should_prefetch(4));
        list.next_request();
        assert!(!list.should_prefetch(5));
    }
}
