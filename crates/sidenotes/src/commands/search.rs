use crate::model::Note;
use crate::search::{filter_by_tag, filter_notes, Query};
use crate::store::{NoteStore, StorageBackend};
use tracing::debug;

/// Notes whose title, content or tags contain `query` (case-insensitive).
/// An empty query returns the full list. Order matches `list`.
pub fn run<B: StorageBackend>(store: &NoteStore<B>, query: &str) -> Vec<Note> {
    let query = Query::parse(query);
    let results = filter_notes(store.load_notes(), &query);
    debug!(query = query.as_str(), result_count = results.len(), "Search");
    results
}

/// Notes tagged exactly `tag`, ignoring case.
pub fn by_tag<B: StorageBackend>(store: &NoteStore<B>, tag: &str) -> Vec<Note> {
    filter_by_tag(store.load_notes(), tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create, init, list};
    use crate::model::NoteDraft;
    use crate::store::MemBackend;

    fn make_store() -> NoteStore<MemBackend> {
        let store = NoteStore::with_backend(MemBackend::new());
        init::run(&store).unwrap();
        store
    }

    #[test]
    fn test_empty_search_equals_list() {
        let store = make_store();
        create::run(&store, NoteDraft::new().title("Extra")).unwrap();
        assert_eq!(run(&store, ""), list::run(&store));
        assert_eq!(run(&store, "   "), list::run(&store));
    }

    #[test]
    fn test_search_matches_each_field() {
        let store = make_store();
        let titled = create::run(&store, NoteDraft::new().title("Kayak trip")).unwrap();
        let bodied = create::run(&store, NoteDraft::new().content("rent a KAYAK")).unwrap();
        let tagged = create::run(&store, NoteDraft::new().tags(["kayaking"])).unwrap();

        let ids: Vec<String> = run(&store, "Kayak").into_iter().map(|n| n.id).collect();

        assert_eq!(ids.len(), 3);
        for id in [&titled.id, &bodied.id, &tagged.id] {
            assert!(ids.contains(id));
        }
    }

    #[test]
    fn test_search_is_subset_of_list() {
        let store = make_store();
        let all = list::run(&store);
        for q in ["meeting", "e", "TODO", "xyz"] {
            let found = run(&store, q);
            assert!(found.iter().all(|n| all.contains(n)));
        }
    }

    #[test]
    fn test_by_tag_seed_notes() {
        let store = make_store();
        let work = by_tag(&store, "WORK");
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].id, "3");
        assert!(by_tag(&store, "wor").is_empty());
    }
}
