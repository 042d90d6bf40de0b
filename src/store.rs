//! Cross-screen cache of video items so the feed and the single-video screen
//! agree on counters and follow state.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::api::VideoItem;
use crate::feed::StatsPatch;

#[derive(Debug, Clone, Default)]
pub struct SharedVideoStore {
    inner: Arc<RwLock<HashMap<String, VideoItem>>>,
}

impl SharedVideoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, item: VideoItem) {
        self.inner.write().insert(item.id.clone(), item);
    }

    pub fn upsert_many<'a>(&self, items: impl IntoIterator<Item = &'a VideoItem>) {
        let mut map = self.inner.write();
        for item in items {
            map.insert(item.id.clone(), item.clone());
        }
    }

    pub fn get(&self, id: &str) -> Option<VideoItem> {
        self.inner.read().get(id).cloned()
    }

    pub fn patch(&self, id: &str, patch: &StatsPatch) -> bool {
        match self.inner.write().get_mut(id) {
            Some(item) => {
                item.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn set_following(&self, creator_id: &str, following: bool) {
        for item in self
            .inner
            .write()
            .values_mut()
            .filter(|i| i.created_by.id == creator_id)
        {
            item.is_following_creator = following;
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::VideoBuilder;

    #[test]
    fn patches_are_visible_through_clones() {
        let store = SharedVideoStore::new();
        let other = store.clone();
        store.upsert(VideoBuilder::new().id("a").build());

        assert!(other.patch("a", &StatsPatch::shares(9)));

        assert_eq!(store.get("a").unwrap().stats.shares, 9);
    }

    #[test]
    fn patch_of_unknown_id_is_noop() {
        let store = SharedVideoStore::new();
        assert!(!store.patch("missing", &StatsPatch::likes(1)));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn upsert_many_and_follow() {
        let store = SharedVideoStore::new();
        let items = vec![
            VideoBuilder::new().id("a").creator("c1", "maya").build(),
            VideoBuilder::new().id("b").creator("c2", "bo").build(),
        ];
        store.upsert_many(&items);
        store.set_following("c1", true);

        assert!(store.get("a").unwrap().is_following_creator);
        assert!(!store.get("b").unwrap().is_following_creator);

        store.clear();
        assert!(store.get("a").is_none());
    }
}
