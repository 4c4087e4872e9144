mod common;

use drowsiness::{
    DriverStatus, DrowsinessMonitor, FeatureExtractor, FeatureTriple, MonitorConfig,
    ScoreWeights, Timestamp,
};
use proptest::prelude::*;

fn fresh_monitor() -> DrowsinessMonitor {
    DrowsinessMonitor::starting_at(MonitorConfig::default(), Timestamp::from_millis(0)).unwrap()
}

/// Detected frame or no face
fn frame_strategy() -> impl Strategy<Value = Option<FeatureTriple>> {
    prop_oneof![
        1 => Just(None),
        4 => (0.05_f64..0.4, 0.0_f64..1.0, 0.0_f64..=100.0)
            .prop_map(|(ear, mar, pose)| Some(FeatureTriple::new(ear, mar, pose))),
    ]
}

proptest! {
    #[test]
    fn pt_score_monotonic_in_each_term(
        closed in any::<bool>(),
        yawning in any::<bool>(),
        micro in any::<bool>(),
        pose in 0.0_f64..=100.0,
        worse_by in 0.0_f64..=100.0,
        minutes in 0.0_f64..120.0,
    ) {
        let w = ScoreWeights::default();
        let base = w.score(closed, yawning, micro, pose, minutes);

        prop_assert!(w.score(true, yawning, micro, pose, minutes) >= base);
        prop_assert!(w.score(closed, true, micro, pose, minutes) >= base);
        prop_assert!(w.score(closed, yawning, true, pose, minutes) >= base);
        prop_assert!(w.score(closed, yawning, micro, (pose - worse_by).max(0.0), minutes) >= base);
        prop_assert!(base <= 100);
    }

    #[test]
    fn pt_micro_sleep_alone_is_drowsy(pose in 0.0_f64..=100.0, yawning in any::<bool>()) {
        let config = MonitorConfig::default();
        let score = config.score_weights.score(true, yawning, true, pose, 0.0);
        prop_assert_eq!(
            DriverStatus::from_score(score, &config.status_thresholds),
            DriverStatus::Drowsy
        );
    }

    #[test]
    fn pt_worse_features_never_lower_score(
        history in prop::collection::vec(frame_strategy(), 0..40),
        ear in 0.05_f64..0.4,
        mar in 0.0_f64..1.0,
        pose in 0.0_f64..=100.0,
        ear_drop in 0.0_f64..0.3,
        mar_rise in 0.0_f64..1.0,
        pose_drop in 0.0_f64..=100.0,
    ) {
        let mut monitor = fresh_monitor();
        for (i, f) in history.iter().enumerate() {
            monitor.process_features(*f, Timestamp::from_millis(i as u64 * 33)).unwrap();
        }
        let now = Timestamp::from_millis(history.len() as u64 * 33);

        let score_of = |features: FeatureTriple| {
            let mut m = monitor.clone();
            m.process_features(Some(features), now).unwrap().0.drowsiness_score().unwrap()
        };

        let base = score_of(FeatureTriple::new(ear, mar, pose));
        prop_assert!(score_of(FeatureTriple::new((ear - ear_drop).max(0.0), mar, pose)) >= base);
        prop_assert!(score_of(FeatureTriple::new(ear, mar + mar_rise, pose)) >= base);
        prop_assert!(score_of(FeatureTriple::new(ear, mar, (pose - pose_drop).max(0.0))) >= base);
    }

    #[test]
    fn pt_no_face_never_resets_state(
        history in prop::collection::vec(frame_strategy(), 1..60),
        gap in 1_usize..10,
    ) {
        let mut monitor = fresh_monitor();
        let mut t = 0;
        for f in &history {
            t += 33;
            monitor.process_features(*f, Timestamp::from_millis(t)).unwrap();
        }
        let counters = monitor.counters();
        let alarm = monitor.alarm_active();

        for _ in 0..gap {
            t += 33;
            let (verdict, events) = monitor.process_features(None, Timestamp::from_millis(t)).unwrap();
            prop_assert!(events.is_empty());
            prop_assert_eq!(verdict.alarm(), alarm);
        }
        prop_assert_eq!(monitor.counters(), counters);
        prop_assert_eq!(monitor.alarm_active(), alarm);
    }

    #[test]
    fn pt_counters_never_decrease(history in prop::collection::vec(frame_strategy(), 1..80)) {
        let mut monitor = fresh_monitor();
        let mut previous = monitor.counters();
        for (i, f) in history.iter().enumerate() {
            let (verdict, _) = monitor
                .process_features(*f, Timestamp::from_millis(i as u64 * 33))
                .unwrap();
            let c = *verdict.counters();
            prop_assert!(c.blink_count >= previous.blink_count);
            prop_assert!(c.yawn_count >= previous.yawn_count);
            prop_assert!(c.micro_sleep_count >= previous.micro_sleep_count);
            prop_assert!(c.alert_count >= previous.alert_count);
            prop_assert_eq!(c.alert_count, c.micro_sleep_count);
            previous = c;
        }
    }

    #[test]
    fn pt_extractor_is_pure(
        eye in 0.2_f64..5.0,
        mouth in 0.0_f64..8.0,
        nose_dx in -40.0_f64..40.0,
    ) {
        let set = common::face(eye, mouth, nose_dx);
        let copy = set.clone();
        let extractor = FeatureExtractor::default();

        let a = extractor.extract(&set).unwrap();
        let b = extractor.extract(&set).unwrap();

        prop_assert_eq!(a.ear.to_bits(), b.ear.to_bits());
        prop_assert_eq!(a.mar.to_bits(), b.mar.to_bits());
        prop_assert_eq!(a.head_pose_score.to_bits(), b.head_pose_score.to_bits());
        prop_assert_eq!(set, copy);
        prop_assert!(a.ear > 0.0 && a.ear.is_finite());
        prop_assert!((0.0..=100.0).contains(&a.head_pose_score));
    }
}
