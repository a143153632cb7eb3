use chrono::{Duration, NaiveDate};
use damages_engine::{
    closest_scenarios, coin_presets, compute_amount, project_seconds, resolve_span,
    solve_rate_for_target, to_unit, Boundary, DamagesError, RatePreset, TimeUnit,
};
use proptest::prelude::*;

fn unit_strategy() -> impl Strategy<Value = TimeUnit> {
    prop::sample::select(TimeUnit::ALL.to_vec())
}

fn presets_strategy() -> impl Strategy<Value = Vec<RatePreset>> {
    prop::collection::vec(1u32..10_000, 0..8).prop_map(|cents| {
        cents
            .into_iter()
            .enumerate()
            .map(|(i, c)| RatePreset::new(format!("P{i}"), c as f64 / 100.0))
            .collect()
    })
}

fn units_strategy() -> impl Strategy<Value = Vec<TimeUnit>> {
    prop::collection::vec(unit_strategy(), 0..6)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #[test]
    fn prop_second_conversion_is_identity(seconds in 0.0f64..1e10) {
        prop_assert_eq!(to_unit(seconds, TimeUnit::Second), seconds);
    }

    #[test]
    fn prop_amount_is_units_times_rate(
        seconds in 0.0f64..1e9,
        unit in unit_strategy(),
        rate in 0.0f64..10_000.0
    ) {
        let expected = (seconds / unit.seconds_per_unit()) * rate;
        prop_assert_eq!(compute_amount(seconds, unit, rate), expected);
    }

    #[test]
    fn prop_solve_inverts_compute(
        seconds in 1.0f64..1e9,
        unit in unit_strategy(),
        rate in 0.01f64..10_000.0
    ) {
        let amount = compute_amount(seconds, unit, rate);
        let solved = solve_rate_for_target(seconds, unit, amount).unwrap();
        prop_assert!(close(solved, rate), "solved {} vs rate {}", solved, rate);
    }

    #[test]
    fn prop_solve_zero_duration_is_degenerate(
        unit in unit_strategy(),
        target in 0.0f64..1e7
    ) {
        let result = solve_rate_for_target(0.0, unit, target);
        prop_assert!(matches!(result, Err(DamagesError::DegenerateSolve(_))));
    }

    #[test]
    fn prop_scenario_grid_size_and_order(
        seconds in 0.0f64..1e9,
        target in 0.0f64..1e7,
        units in units_strategy(),
        presets in presets_strategy(),
        top_k in 1usize..40
    ) {
        let search = closest_scenarios(seconds, target, &units, &presets, top_k);
        prop_assert_eq!(search.ranked().len(), units.len() * presets.len());
        prop_assert_eq!(search.top().len(), top_k.min(units.len() * presets.len()));
        for pair in search.top().windows(2) {
            prop_assert!(pair[0].absolute_delta <= pair[1].absolute_delta);
            if pair[0].absolute_delta == pair[1].absolute_delta {
                prop_assert!(pair[0].index < pair[1].index);
            }
        }
    }

    #[test]
    fn prop_zero_target_never_has_percent(
        seconds in 0.0f64..1e9,
        units in units_strategy()
    ) {
        let search = closest_scenarios(seconds, 0.0, &units, &coin_presets(), 20);
        prop_assert!(search.ranked().iter().all(|row| row.percent_delta.is_none()));
    }

    #[test]
    fn prop_projection_is_linear(days in 0.0f64..10_000.0, years in 0.0f64..100.0) {
        let combined = project_seconds(days, years);
        let split = project_seconds(days, 0.0) + project_seconds(0.0, years);
        prop_assert!(close(combined, split));
    }

    #[test]
    fn prop_date_only_span_covers_whole_days(offset in 0i64..3650, length in 0i64..400) {
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap() + Duration::days(offset);
        let end = start + Duration::days(length);
        let span = resolve_span(Boundary::Date(start), Boundary::Date(end), chrono_tz::UTC).unwrap();
        let expected = (length as f64 + 1.0) * 86_400.0 - 0.000_001;
        prop_assert!((span.duration_seconds() - expected).abs() < 1e-5);
    }

    #[test]
    fn prop_date_only_end_before_start_is_invalid(offset in 0i64..3650, back in 1i64..400) {
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap() + Duration::days(offset);
        let end = start - Duration::days(back);
        let result = resolve_span(Boundary::Date(start), Boundary::Date(end), chrono_tz::UTC);
        prop_assert!(matches!(result, Err(DamagesError::InvalidRange(_))));
    }
}
