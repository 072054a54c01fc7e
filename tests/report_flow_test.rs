use chrono::NaiveDate;
use litterbook::{
    EntityStore, LifecycleManager, LitterUpdate, LitterbookError, OffspringState,
    ReportAggregator, Sex,
};
use std::sync::Arc;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn setup() -> (Arc<EntityStore>, LifecycleManager, ReportAggregator) {
    let store = Arc::new(EntityStore::new());
    let lifecycle = LifecycleManager::new(store.clone());
    let aggregator = ReportAggregator::new(store.clone());
    (store, lifecycle, aggregator)
}

#[tokio::test]
async fn test_mother_with_zero_litters_in_range() {
    let (store, _, aggregator) = setup();
    store.add_mother("M1").await.unwrap();

    let entries = aggregator
        .generate_report("M1", date("2026-01-01"), date("2026-06-30"), "spring")
        .await
        .unwrap();

    assert_eq!(
        entries,
        vec!["Mother M1 (2026-01-01 to 2026-06-30): litters=0, offspring=0, weaning rate=N/A"]
    );
}

#[tokio::test]
async fn test_litter_without_recorded_offspring() {
    let (store, _, aggregator) = setup();
    store.add_mother("M1").await.unwrap();
    store
        .record_litter("M1", None, date("2026-02-01"), 12, None)
        .await
        .unwrap();

    let entries = aggregator
        .generate_report("M1", date("2026-01-01"), date("2026-06-30"), "spring")
        .await
        .unwrap();

    assert!(entries[0].contains("litters=1, offspring=0, weaning rate=N/A"));
}

#[tokio::test]
async fn test_reported_size_never_drives_the_math() {
    let (store, lifecycle, aggregator) = setup();
    store.add_mother("M1").await.unwrap();
    let litter = store
        .record_litter("M1", None, date("2026-02-01"), 10, None)
        .await
        .unwrap();
    for id in ["O1", "O2", "O3"] {
        store
            .record_offspring(&litter, id, Sex::Female, None)
            .await
            .unwrap();
    }
    lifecycle.record_weaning("O1").await.unwrap();

    let entries = aggregator
        .generate_report("M1", date("2026-01-01"), date("2026-06-30"), "spring")
        .await
        .unwrap();

    assert!(entries[0].contains("litters=1, offspring=3, weaning rate=33.33%"));
}

#[tokio::test]
async fn test_editing_reported_size_changes_nothing() {
    let (store, lifecycle, aggregator) = setup();
    store.add_mother("M1").await.unwrap();
    let litter = store
        .record_litter("M1", None, date("2026-02-01"), 4, None)
        .await
        .unwrap();
    for id in ["O1", "O2", "O3", "O4"] {
        store
            .record_offspring(&litter, id, Sex::Male, None)
            .await
            .unwrap();
    }
    lifecycle.record_weaning("O1").await.unwrap();
    lifecycle.record_weaning("O2").await.unwrap();

    let before = aggregator
        .generate_report("M1", date("2026-01-01"), date("2026-06-30"), "spring")
        .await
        .unwrap();
    assert!(before[0].contains("offspring=4, weaning rate=50.00%"));

    store
        .update_litter(
            &litter,
            LitterUpdate {
                reported_litter_size: Some(10),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let after = aggregator
        .generate_report("M1", date("2026-01-01"), date("2026-06-30"), "spring")
        .await
        .unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_sticky_weaning_over_six_offspring() {
    let (store, lifecycle, aggregator) = setup();
    store.add_mother("M1").await.unwrap();
    let litter = store
        .record_litter("M1", None, date("2026-02-01"), 6, None)
        .await
        .unwrap();
    for id in ["O1", "O2", "O3", "O4", "O5", "O6"] {
        store
            .record_offspring(&litter, id, Sex::Female, None)
            .await
            .unwrap();
    }

    // O1 weaned and alive, O2 and O6 weaned then died, O3 and O5 died
    // unweaned, O4 alive and unweaned: three of six count as weaned.
    lifecycle.record_weaning("O1").await.unwrap();
    lifecycle.record_weaning("O2").await.unwrap();
    lifecycle.record_death("O2").await.unwrap();
    lifecycle.record_death("O3").await.unwrap();
    lifecycle.record_death("O5").await.unwrap();
    lifecycle.record_weaning("O6").await.unwrap();
    lifecycle.record_death("O6").await.unwrap();

    let entries = aggregator
        .generate_report("M1", date("2026-01-01"), date("2026-06-30"), "spring")
        .await
        .unwrap();
    assert!(entries[0].contains("offspring=6, weaning rate=50.00%"));
}

#[tokio::test]
async fn test_weaning_a_dead_offspring_is_invalid_state() {
    let (store, lifecycle, _) = setup();
    store.add_mother("M1").await.unwrap();
    let litter = store
        .record_litter("M1", None, date("2026-02-01"), 2, None)
        .await
        .unwrap();
    store
        .record_offspring(&litter, "O1", Sex::Female, None)
        .await
        .unwrap();
    store
        .record_offspring(&litter, "O2", Sex::Male, None)
        .await
        .unwrap();

    // O1 dies unweaned, O2 dies after weaning.
    lifecycle.record_death("O1").await.unwrap();
    lifecycle.record_weaning("O2").await.unwrap();
    lifecycle.record_death("O2").await.unwrap();

    for id in ["O1", "O2"] {
        let before = store.get_offspring(id).await.unwrap().survived_till_weaning;
        let err = lifecycle.record_weaning(id).await.unwrap_err();
        assert!(matches!(err, LitterbookError::InvalidState { .. }));
        let after = store.get_offspring(id).await.unwrap().survived_till_weaning;
        assert_eq!(before, after);
    }

    assert_eq!(
        lifecycle.state_of("O1").await.unwrap(),
        OffspringState::DeadUnweaned
    );
    assert_eq!(
        lifecycle.state_of("O2").await.unwrap(),
        OffspringState::DeadWeaned
    );
}

#[tokio::test]
async fn test_full_workflow_across_two_mothers_and_reports() {
    let (store, lifecycle, aggregator) = setup();
    store.add_mother("M1").await.unwrap();
    store.add_mother("M2").await.unwrap();

    let l1 = store
        .record_litter("M1", Some("F1"), date("2026-02-01"), 5, None)
        .await
        .unwrap();
    let l2 = store
        .record_litter("M2", Some("F1"), date("2026-03-15"), 7, None)
        .await
        .unwrap();

    for (litter, id) in [(&l1, "A1"), (&l1, "A2"), (&l2, "B1"), (&l2, "B2"), (&l2, "B3")] {
        store
            .record_offspring(litter, id, Sex::Female, None)
            .await
            .unwrap();
    }
    lifecycle.record_weaning("A1").await.unwrap();
    lifecycle.record_weaning("B1").await.unwrap();
    lifecycle.record_weaning("B2").await.unwrap();

    aggregator
        .generate_report("M1", date("2026-01-01"), date("2026-06-30"), "spring")
        .await
        .unwrap();
    let entries = aggregator
        .generate_report("M2", date("2026-01-01"), date("2026-06-30"), "spring")
        .await
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert!(entries[0].contains("Mother M1"));
    assert!(entries[0].contains("weaning rate=50.00%"));
    assert!(entries[1].contains("Mother M2"));
    assert!(entries[1].contains("weaning rate=66.67%"));

    aggregator.rename_report("spring", "h1-2026").await.unwrap();
    assert!(store.get_report("spring").await.is_none());
    assert_eq!(store.get_report("h1-2026").await.unwrap().entries.len(), 2);

    aggregator.delete_report("h1-2026").await.unwrap();
    assert!(store.get_report("h1-2026").await.is_none());
}
