#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use outbreak_engine::aggregation::{daily_totals, latest_snapshot};
    use outbreak_engine::correlation::correlate;
    use outbreak_engine::metrics::{fatality_rate, growth_rate, smoothed_growth_rate};
    use outbreak_engine::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config(start: NaiveDate, end: NaiveDate, seed: u64) -> PipelineConfig {
        PipelineConfig {
            start_date: start,
            end_date: end,
            random_seed: seed,
            ..PipelineConfig::default()
        }
    }

    fn full_year_table(seed: u64) -> ObservationTable {
        let cfg = config(date(2020, 1, 22), date(2020, 12, 31), seed);
        OutbreakPipeline::new(cfg).unwrap().generate().unwrap().table
    }

    // ========== Generation Invariants ==========

    #[test]
    fn test_counts_non_negative_and_active_identity() {
        let table = full_year_table(42);
        for r in table.records() {
            let expected = (r.confirmed as i128 - r.deaths as i128 - r.recovered as i128).max(0);
            assert_eq!(r.active as i128, expected, "active mismatch at {} {}", r.date, r.entity_id);
        }
    }

    #[test]
    fn test_four_day_axis_yields_four_records_per_entity() {
        let cfg = config(date(2020, 1, 22), date(2020, 1, 25), 42);
        let table = OutbreakPipeline::new(cfg).unwrap().generate().unwrap().table;
        for id in parameters::DEFAULT_ENTITIES {
            let series = table.entity_series(id);
            assert_eq!(series.len(), 4, "{} emitted {} records", id, series.len());
            let dates: Vec<NaiveDate> = series.iter().map(|r| r.date).collect();
            assert_eq!(dates, vec![date(2020, 1, 22), date(2020, 1, 23), date(2020, 1, 24), date(2020, 1, 25)]);
        }
    }

    #[test]
    fn test_every_archetype_emits_full_year() {
        // All five archetypes, including "general", cover every day.
        let table = full_year_table(1);
        for id in ["China", "Italy", "US", "Brazil", "Germany", "Netherlands"] {
            assert_eq!(table.entity_series(id).len(), 345);
        }
        assert_eq!(table.len(), 15 * 345);
    }

    #[test]
    fn test_same_seed_is_bit_identical() {
        assert_eq!(full_year_table(2020), full_year_table(2020));
        assert_ne!(full_year_table(2020), full_year_table(2021));
    }

    #[test]
    fn test_large_archetypes_dominate() {
        let snapshot = latest_snapshot(&full_year_table(42)).unwrap();
        let confirmed = |id: &str| snapshot.iter().find(|s| s.entity_id == id).unwrap().confirmed;
        // US decays from a 20M scale, China from 80k with a 30-day peak.
        assert!(confirmed("US") > confirmed("China"));
        assert!(confirmed("Brazil") > confirmed("Italy"));
    }

    // ========== Aggregation ==========

    #[test]
    fn test_daily_totals_equal_column_sums() {
        let table = full_year_table(42);
        let totals = daily_totals(&table).unwrap();
        assert_eq!(totals.len(), 345);
        for day in totals.iter().step_by(37) {
            let rows: Vec<&ObservationRecord> = table.records().iter().filter(|r| r.date == day.date).collect();
            assert_eq!(rows.len(), 15);
            assert_eq!(day.confirmed, rows.iter().map(|r| r.confirmed).sum::<u64>());
            assert_eq!(day.deaths, rows.iter().map(|r| r.deaths).sum::<u64>());
            assert_eq!(day.recovered, rows.iter().map(|r| r.recovered).sum::<u64>());
            assert_eq!(day.active, rows.iter().map(|r| r.active).sum::<u64>());
        }
    }

    #[test]
    fn test_new_cases_first_difference() {
        let totals = daily_totals(&full_year_table(42)).unwrap();
        assert_eq!(totals[0].new_cases, None);
        assert_eq!(totals[0].new_deaths, None);
        for w in totals.windows(2) {
            assert_eq!(w[1].new_cases, Some(w[1].confirmed as i64 - w[0].confirmed as i64));
            assert_eq!(w[1].new_deaths, Some(w[1].deaths as i64 - w[0].deaths as i64));
        }
    }

    #[test]
    fn test_hand_built_two_entity_sum() {
        let rows = vec![
            ObservationRecord::new(date(2020, 5, 1), "A", 100, 2, 70),
            ObservationRecord::new(date(2020, 5, 1), "B", 50, 1, 30),
        ];
        let table = ObservationTable::from_records(rows).unwrap();
        assert_eq!(daily_totals(&table).unwrap()[0].confirmed, 150);
    }

    #[test]
    fn test_snapshot_one_row_per_entity() {
        let snapshot = latest_snapshot(&full_year_table(42)).unwrap();
        assert_eq!(snapshot.len(), 15);
        for s in &snapshot {
            assert_eq!(s.fatality_rate, fatality_rate(s.confirmed, s.deaths));
            assert!((0.0..=100.0).contains(&s.fatality_rate));
            assert!((0.0..=100.0).contains(&s.recovery_rate));
        }
    }

    // ========== Derived Metrics ==========

    #[test]
    fn test_growth_rate_reference_series() {
        let rates = growth_rate(&[100u64, 150, 150, 0, 10]);
        assert_eq!(rates, vec![None, Some(50.0), Some(0.0), Some(-100.0), None]);
    }

    #[test]
    fn test_growth_rates_never_infinite() {
        let table = full_year_table(3);
        for id in ["US", "China", "India"] {
            for rate in growth_rate(&table.confirmed_series(id)).into_iter().flatten() {
                assert!(rate.is_finite());
            }
        }
    }

    #[test]
    fn test_smoothed_growth_shape() {
        let series = full_year_table(42).confirmed_series("Italy");
        let smoothed = smoothed_growth_rate(&series, 7);
        assert_eq!(smoothed.len(), series.len());
        assert!(smoothed[..6].iter().all(Option::is_none));
        assert!(smoothed.iter().any(Option::is_some));
    }

    // ========== Correlation ==========

    #[test]
    fn test_snapshot_correlation_symmetric() {
        let snapshot = latest_snapshot(&full_year_table(42)).unwrap();
        let m = correlate(&snapshot, &SnapshotField::ALL);
        let k = m.fields.len();
        for i in 0..k {
            for j in 0..k {
                assert_eq!(m.matrix[i][j], m.matrix[j][i]);
            }
        }
        for f in SnapshotField::ALL {
            let column: Vec<f64> = snapshot.iter().map(|s| f.value(s)).collect();
            let varies = column.iter().any(|v| *v != column[0]);
            if varies {
                assert_eq!(m.get(f, f), Some(1.0));
            }
        }
    }

    // ========== Full Pipeline ==========

    #[test]
    fn test_report_serializes_undefined_as_null() {
        let cfg = config(date(2020, 1, 22), date(2020, 2, 10), 42);
        let report = OutbreakPipeline::new(cfg).unwrap().run().unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["daily_totals"][0]["new_cases"].is_null());
        assert_eq!(json["daily_totals"][0]["date"], "2020-01-22");
        assert_eq!(json["observations"].as_array().unwrap().len(), 15 * 20);
    }

    #[test]
    fn test_custom_provider_entity() {
        let provider = CurveParameterProvider::empty()
            .with_entity("Atlantis", Archetype::EarlyContained)
            .with_entity("Lemuria", Archetype::LateSurge);
        let cfg = PipelineConfig {
            entity_list: vec!["Atlantis".into(), "Lemuria".into()],
            focus_entities: vec!["Lemuria".into()],
            end_date: date(2020, 3, 31),
            ..PipelineConfig::default()
        };
        let report = OutbreakPipeline::with_provider(cfg, provider).unwrap().run().unwrap();
        assert_eq!(report.snapshot.len(), 2);
        assert_eq!(report.growth.len(), 1);
        assert!(report.growth[0].average_growth_rate.is_some());
    }

    #[test]
    fn test_unknown_entity_skipped_without_aborting() {
        let cfg = PipelineConfig {
            entity_list: vec!["US".into(), "Atlantis".into()],
            focus_entities: vec!["US".into(), "Atlantis".into()],
            end_date: date(2020, 2, 10),
            ..PipelineConfig::default()
        };
        let report = OutbreakPipeline::new(cfg).unwrap().run().unwrap();
        assert_eq!(report.skipped_entities, vec!["Atlantis".to_string()]);
        assert_eq!(report.observations.len(), 20);
        assert_eq!(report.observations.entity_series("US").len(), 20);
        assert_eq!(report.snapshot.len(), 1);

        let atlantis = report.growth.iter().find(|g| g.entity_id == "Atlantis").unwrap();
        assert_eq!(atlantis.average_growth_rate, None);
        let us = report.growth.iter().find(|g| g.entity_id == "US").unwrap();
        assert!(us.average_growth_rate.is_some());

        let direct = CurveParameterProvider::default().get_parameters("Atlantis").unwrap_err();
        assert_eq!(direct, OutbreakError::UnknownEntity("Atlantis".into()));
    }
}
