//! Tests for the status checker.

use chrono::NaiveDate;

use super::*;
use crate::probe::mock::MockProber;
use crate::targets::parse_targets;
use crate::time::FixedClock;

const A: &str = "http://a.test";
const B: &str = "http://b.test";
const C: &str = "http://c.test";

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn targets(names: &[&str]) -> Vec<Target> {
    names.iter().map(|n| Target::new(*n)).collect()
}

fn checker(prober: MockProber, date: NaiveDate) -> StatusChecker<MockProber, FixedClock> {
    StatusChecker::new(prober).with_clock(FixedClock(date))
}

fn names(report: &ChangeReport) -> Vec<&str> {
    report.iter().map(|o| o.name.as_str()).collect()
}

mod observe_fn {
    use super::*;

    #[test]
    fn absent_previous_is_a_change() {
        let obs = observe(&Target::new(A), None, 200, day(1));

        assert!(obs.changed_since_last_check);
        assert_eq!(obs.status, Some(200));
        assert_eq!(obs.name, A);
        assert_eq!(obs.last_checked, Some(day(1)));
    }

    #[test]
    fn same_status_is_not_a_change() {
        let obs = observe(&Target::new(A), Some(200), 200, day(1));
        assert!(!obs.changed_since_last_check);
    }

    #[test]
    fn different_status_is_a_change() {
        let obs = observe(&Target::new(A), Some(200), 500, day(1));
        assert!(obs.changed_since_last_check);
    }
}

mod check_all {
    use super::*;

    #[tokio::test]
    async fn status_change_and_new_target_are_reported_in_input_order() {
        let prior: State = serde_json::from_str(r#"{"http://a.test": {"status": 200}}"#).unwrap();
        let prober = MockProber::new()
            .script(A, [Some(500)])
            .script(B, [Some(200)]);

        let (state, report) = checker(prober, day(2))
            .check_all(&targets(&[A, B]), prior)
            .await;

        let a = state.get(A).unwrap();
        assert_eq!(a.status, Some(500));
        assert!(a.changed_since_last_check);
        let b = state.get(B).unwrap();
        assert_eq!(b.status, Some(200));
        assert!(b.changed_since_last_check);
        assert_eq!(names(&report), [A, B]);
    }

    #[tokio::test]
    async fn first_successful_probe_is_a_change() {
        let prober = MockProber::new().script(A, [Some(200)]);

        let (state, report) = checker(prober, day(1))
            .check_all(&targets(&[A]), State::new())
            .await;

        assert!(state.get(A).unwrap().changed_since_last_check);
        assert_eq!(report.len(), 1);
    }

    #[tokio::test]
    async fn unchanged_status_on_second_run_is_not_reported() {
        let prober = MockProber::new()
            .script(A, [Some(200), Some(200)])
            .script(B, [Some(404), Some(404)]);
        let checker = checker(prober, day(3));
        let list = targets(&[A, B]);

        let (state, first) = checker.check_all(&list, State::new()).await;
        let (state, second) = checker.check_all(&list, state).await;

        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
        assert!(!state.get(A).unwrap().changed_since_last_check);
        assert!(!state.get(B).unwrap().changed_since_last_check);
    }

    #[tokio::test]
    async fn unreachable_target_keeps_prior_entry_untouched() {
        let prior: State = [
            Observation::new(A, Some(200), false, day(1)),
            Observation::new(B, Some(200), true, day(1)),
            Observation::new(C, Some(200), false, day(1)),
        ]
        .into_iter()
        .collect();
        let prober = MockProber::new()
            .script(A, [Some(200)])
            .script(B, [None])
            .script(C, [Some(502)]);

        let (state, report) = checker(prober, day(5))
            .check_all(&targets(&[A, B, C]), prior.clone())
            .await;

        assert_eq!(state.get(B), prior.get(B));
        assert_eq!(state.get(A).unwrap().last_checked, Some(day(5)));
        assert_eq!(state.get(C).unwrap().status, Some(502));
        assert_eq!(names(&report), [C]);
    }

    #[tokio::test]
    async fn unreachable_new_target_is_not_recorded() {
        let prober = MockProber::new().script(A, [None]);

        let (state, report) = checker(prober, day(1))
            .check_all(&targets(&[A]), State::new())
            .await;

        assert!(state.get(A).is_none());
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn recovery_from_error_status_is_a_change() {
        let prior: State = [Observation::new(A, Some(503), true, day(1))]
            .into_iter()
            .collect();
        let prober = MockProber::new().script(A, [Some(200)]);

        let (_, report) = checker(prober, day(2))
            .check_all(&targets(&[A]), prior)
            .await;

        assert_eq!(report.entries()[0].status, Some(200));
    }

    #[tokio::test]
    async fn duplicate_target_compares_against_earlier_probe() {
        let prober = MockProber::new().script(A, [Some(200), Some(200)]);
        let list = parse_targets("http://a.test\nhttp://a.test\n");

        let (state, report) = checker(prober, day(1)).check_all(&list, State::new()).await;

        assert_eq!(report.len(), 1);
        assert_eq!(state.len(), 1);
        assert!(!state.get(A).unwrap().changed_since_last_check);
    }

    #[tokio::test]
    async fn targets_are_probed_in_list_order() {
        let prober = MockProber::new()
            .script(C, [Some(200)])
            .script(A, [Some(200)])
            .script(B, [Some(200)]);
        let checker = checker(prober, day(1));

        checker.check_all(&targets(&[C, A, B]), State::new()).await;

        assert_eq!(checker.prober().probed(), [C, A, B]);
    }

    #[tokio::test]
    async fn untouched_entries_for_unlisted_targets_survive() {
        let prior: State = [Observation::new(C, Some(200), false, day(1))]
            .into_iter()
            .collect();
        let prober = MockProber::new().script(A, [Some(200)]);

        let (state, _) = checker(prober, day(2))
            .check_all(&targets(&[A]), prior)
            .await;

        assert_eq!(state.len(), 2);
        assert_eq!(state.get(C).unwrap().last_checked, Some(day(1)));
    }

    #[tokio::test]
    async fn report_serializes_as_array_of_observations() {
        let prober = MockProber::new().script(A, [Some(200)]);

        let (_, report) = checker(prober, day(7))
            .check_all(&targets(&[A]), State::new())
            .await;

        let value: serde_json::Value =
            serde_json::from_str(&report.to_pretty_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "name": A,
                "status": 200,
                "statusChangedRecently": true,
                "last_checked": "2024-06-07"
            }])
        );
    }
}

mod run_cycle {
    use super::*;
    use crate::state::mock::MockStateStore;
    use crate::state::{FileStateStore, StateError, StateStore};

    #[tokio::test]
    async fn saves_updated_state_and_returns_report() {
        let prior: State = [Observation::new(A, Some(200), false, day(1))]
            .into_iter()
            .collect();
        let store = MockStateStore::with_state(prior);
        let prober = MockProber::new().script(A, [Some(404)]);

        let report = checker(prober, day(2))
            .run(&store, &targets(&[A]))
            .await
            .unwrap();

        assert_eq!(names(&report), [A]);
        let saved = store.saved_state().unwrap();
        assert_eq!(saved.status_of(A), Some(404));
    }

    #[tokio::test]
    async fn nothing_changed_still_saves() {
        let prior: State = [Observation::new(A, Some(200), true, day(1))]
            .into_iter()
            .collect();
        let store = MockStateStore::with_state(prior);
        let prober = MockProber::new().script(A, [Some(200)]);

        let report = checker(prober, day(2))
            .run(&store, &targets(&[A]))
            .await
            .unwrap();

        assert!(report.is_empty());
        let saved = store.saved_state().unwrap();
        assert!(!saved.get(A).unwrap().changed_since_last_check);
        assert_eq!(saved.get(A).unwrap().last_checked, Some(day(2)));
    }

    #[tokio::test]
    async fn load_failure_probes_nothing_and_saves_nothing() {
        let store = MockStateStore::corrupted();
        let checker = checker(MockProber::new().script(A, [Some(200)]), day(1));

        let result = checker.run(&store, &targets(&[A])).await;

        assert!(matches!(result, Err(StateError::Corrupt { .. })));
        assert!(checker.prober().probed().is_empty());
        assert!(store.saved_state().is_none());
    }

    #[tokio::test]
    async fn save_failure_is_returned() {
        let store = MockStateStore::empty().failing_save();
        let prober = MockProber::new().script(A, [Some(200)]);

        let result = checker(prober, day(1)).run(&store, &targets(&[A])).await;

        assert!(matches!(result, Err(StateError::Write(_))));
    }

    #[tokio::test]
    async fn consecutive_runs_against_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("history.json"));
        let list = targets(&[A, B]);

        let prober = MockProber::new()
            .script(A, [Some(200), Some(200)])
            .script(B, [Some(200), Some(503)]);
        let checker = checker(prober, day(4));

        let first = checker.run(&store, &list).await.unwrap();
        let second = checker.run(&store, &list).await.unwrap();

        assert_eq!(names(&first), [A, B]);
        assert_eq!(names(&second), [B]);
        let state = store.load().unwrap();
        assert_eq!(state.status_of(B), Some(503));
        assert!(!state.get(A).unwrap().changed_since_last_check);
    }
}
