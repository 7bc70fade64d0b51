use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use secureprofile_core::{NotificationEvent, NotificationKind, NotificationStore};

fn unread_by_scan(store: &NotificationStore) -> usize {
    store.notifications().filter(|entry| !entry.read).count()
}

#[test]
fn two_adds_are_most_recent_first_and_mark_read_decrements_unread() {
    let mut store = NotificationStore::new();
    let a = store.add(NotificationKind::Info, "A", "a");
    let b = store.add(NotificationKind::Error, "B", "b");

    let titles: Vec<&str> = store.notifications().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["B", "A"]);
    assert_eq!(store.notifications().next().map(|n| n.id), Some(b));
    assert_eq!(store.unread_count(), 2);

    store.mark_read(a);
    assert_eq!(store.unread_count(), 1);
    assert!(store.get(a).expect("A should exist").read);
    assert!(!store.get(b).expect("B should exist").read);
}

#[test]
fn unread_count_tracks_random_operation_sequences() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut store = NotificationStore::new();
    let mut ids = Vec::new();

    for step in 0..500 {
        match rng.gen_range(0..10) {
            0..=5 => {
                let kind = NotificationKind::ALL[rng.gen_range(0..4)];
                ids.push(store.add_at(kind, format!("t{step}"), "m", step));
            }
            6..=7 if !ids.is_empty() => {
                let id = ids[rng.gen_range(0..ids.len())];
                store.mark_read(id);
            }
            8 => store.mark_all_read(),
            9 if rng.gen_bool(0.1) => {
                store.clear();
                ids.clear();
            }
            _ => {}
        }
        assert_eq!(store.unread_count(), unread_by_scan(&store));
    }
}

#[test]
fn ordering_is_by_creation_even_with_out_of_order_timestamps() {
    let mut store = NotificationStore::new();
    store.add_at(NotificationKind::Info, "first", "", 3_000);
    store.add_at(NotificationKind::Info, "second", "", 1_000);
    store.add_at(NotificationKind::Info, "third", "", 2_000);

    let ids: Vec<u64> = store.notifications().map(|n| n.id.value()).collect();
    assert!(ids.windows(2).all(|pair| pair[0] > pair[1]));
    assert_eq!(store.latest().map(|n| n.title.as_str()), Some("third"));
}

#[test]
fn mark_all_read_zeroes_unread_count() {
    let mut store = NotificationStore::new();
    for index in 0..4 {
        store.add(NotificationKind::Warning, format!("w{index}"), "");
    }
    store.mark_all_read();
    assert_eq!(store.unread_count(), 0);
    assert_eq!(store.len(), 4);
}

#[test]
fn clear_empties_store() {
    let mut store = NotificationStore::new();
    store.add(NotificationKind::Success, "done", "");
    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.unread_count(), 0);
    assert!(store.latest().is_none());
}

#[test]
fn mark_read_unknown_id_is_a_noop() {
    let mut store = NotificationStore::new();
    let id = store.add(NotificationKind::Info, "A", "a");
    store.clear();
    let events = store.subscribe();

    assert!(!store.mark_read(id));
    assert!(events.try_recv().is_err());
}

#[test]
fn subscribers_see_every_mutation_in_order() {
    let mut store = NotificationStore::new();
    let events = store.subscribe();

    let id = store.add(NotificationKind::Info, "A", "a");
    store.mark_read(id);
    store.mark_all_read();
    store.clear();

    let received: Vec<NotificationEvent> = events.try_iter().collect();
    assert_eq!(received.len(), 4);
    assert!(matches!(&received[0], NotificationEvent::Added(n) if n.id == id && !n.read));
    assert_eq!(received[1], NotificationEvent::Read(id));
    assert_eq!(received[2], NotificationEvent::AllRead);
    assert_eq!(received[3], NotificationEvent::Cleared);
}

#[test]
fn ids_keep_increasing_across_clear() {
    let mut store = NotificationStore::new();
    let before = store.add(NotificationKind::Info, "A", "a");
    store.clear();
    let after = store.add(NotificationKind::Info, "B", "b");
    assert!(after > before);
}
