//! Engine integration tests: dispatcher, filters, aggregation, partitioning,
//! regression and table attachment working together.

mod common;

use approx::assert_relative_eq;
use common::*;
use taframe::domain::dispatcher::{Dispatcher, Invocation};
use taframe::domain::error::TaframeError;
use taframe::domain::indicator::Category;
use taframe::domain::indicator::ssf::SuperSmoother;
use taframe::domain::indicator::vp::volume_profile;
use taframe::domain::indicator::vwap::vwap;
use taframe::domain::params::ParamValue;
use taframe::domain::regression::{RegressionBackend, linear_regression};
use taframe::domain::table::Table;

mod super_smoother {
    use super::*;

    #[test]
    fn output_length_and_seed() {
        let index = daily_index(date(2024, 1, 2), 40);
        let close = series("close", &index, &wave(40));
        for poles in [2, 3] {
            let out = SuperSmoother::new(10, poles).apply(&close).unwrap();
            assert_eq!(out.len(), close.len());
            assert_eq!(&out.values[..poles], &close.values[..poles]);
            assert_eq!(out.index, close.index);
        }
    }

    #[test]
    fn deterministic() {
        let index = daily_index(date(2024, 1, 2), 60);
        let close = series("close", &index, &wave(60));
        let smoother = SuperSmoother::new(14, 3);
        let a = smoother.apply(&close).unwrap();
        let b = smoother.apply(&close).unwrap();
        assert_eq!(a.values, b.values);
    }

    #[test]
    fn constant_input_stays_constant() {
        let index = daily_index(date(2024, 1, 2), 200);
        let close = series("close", &index, &[100.0; 200]);
        for poles in [2, 3] {
            let out = SuperSmoother::new(10, poles).apply(&close).unwrap();
            for v in &out.values {
                assert_relative_eq!(*v, 100.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn input_series_untouched() {
        let index = daily_index(date(2024, 1, 2), 30);
        let close = series("close", &index, &wave(30));
        let before = close.clone();
        SuperSmoother::new(5, 2).apply(&close).unwrap();
        assert_eq!(close, before);
    }

    #[test]
    fn invalid_arguments_fall_back() {
        let smoother = SuperSmoother::new(0, 7);
        assert_eq!(smoother.length(), 10);
        assert_eq!(smoother.poles(), 2);
        assert_eq!(smoother.name(), "SSF_10_2");
    }
}

mod vwap_anchoring {
    use super::*;

    #[test]
    fn single_day_matches_classic_formula() {
        let index = session(date(2024, 3, 4), 30);
        let table = ohlcv_table(index, &wave(30));
        let get = |name: &str| table.series(name).unwrap();
        let out = vwap(&get("high"), &get("low"), &get("close"), &get("volume")).unwrap();

        let (high, low, close, volume) = (get("high"), get("low"), get("close"), get("volume"));
        let mut pv = 0.0;
        let mut v = 0.0;
        for i in 0..out.len() {
            let tp = (high.values[i] + low.values[i] + close.values[i]) / 3.0;
            pv += tp * volume.values[i];
            v += volume.values[i];
            assert_relative_eq!(out.values[i], pv / v, max_relative = 1e-12);
        }
    }

    #[test]
    fn each_day_is_independent() {
        let mut index = session(date(2024, 3, 4), 20);
        index.extend(session(date(2024, 3, 5), 20));
        let closes = wave(40);
        let mut both = ohlcv_table(index.clone(), &closes);
        // same volume pattern on both days
        let volume = (0..40).map(|i| 1000.0 + 10.0 * (i % 20) as f64).collect();
        both.insert_column("volume", volume).unwrap();
        let second_only = ohlcv_table(index[20..].to_vec(), &closes[20..]);

        let run = |table: &Table| {
            let get = |name: &str| table.series(name).unwrap();
            vwap(&get("high"), &get("low"), &get("close"), &get("volume")).unwrap()
        };
        let full = run(&both);
        let alone = run(&second_only);

        assert_relative_eq!(full.values[20], closes[20], max_relative = 1e-12);
        for i in 0..20 {
            assert_relative_eq!(full.values[20 + i], alone.values[i], max_relative = 1e-12);
        }
    }

    #[test]
    fn dispatch_resolves_capitalized_columns() {
        let mut table = capitalized_table(session(date(2024, 3, 4), 5), &wave(5));
        let out = Dispatcher::default()
            .invoke(&mut table, &Invocation::new("VWAP"))
            .unwrap();
        assert_eq!(out.name(), "VWAP");
        assert_eq!(out.category(), Some(Category::Overlap));
    }
}

mod volume_profile_bins {
    use super::*;

    #[test]
    fn chronological_conservation() {
        let index = daily_index(date(2024, 1, 2), 37);
        let table = ohlcv_table(index, &wave(37));
        let close = table.series("close").unwrap();
        let volume = table.series("volume").unwrap();
        let frame = volume_profile(&close, &volume, 6, false).unwrap();

        let total: f64 = volume.values.iter().sum();
        let pos: f64 = frame.column("pos_volume").unwrap().iter().sum();
        let neg: f64 = frame.column("neg_volume").unwrap().iter().sum();
        assert_relative_eq!(pos + neg, total, max_relative = 1e-12);
        let per_bin: f64 = frame.column("total_volume").unwrap().iter().sum();
        assert_relative_eq!(per_bin, total, max_relative = 1e-12);
        assert_eq!(frame.rows(), 6);
    }

    #[test]
    fn dispatch_with_sort_close() {
        let mut table = ohlcv_table(daily_index(date(2024, 1, 2), 50), &wave(50));
        let inv = Invocation::new("vp")
            .param("width", ParamValue::Int(4))
            .param("sort_close", ParamValue::Bool(true));
        let out = Dispatcher::default().invoke(&mut table, &inv).unwrap();
        let frame = out.as_frame().unwrap();
        assert_eq!(frame.name, "VP_4");
        let lows = frame.column("low_close").unwrap();
        let highs = frame.column("high_close").unwrap();
        for i in 1..4 {
            if !lows[i].is_nan() && !highs[i - 1].is_nan() {
                assert!(lows[i] > highs[i - 1]);
            }
        }
    }
}

mod regression {
    use super::*;

    #[test]
    fn two_observations_have_nan_t() {
        let index = daily_index(date(2024, 1, 2), 2);
        let fit = linear_regression(
            &series("x", &index, &[1.0, 2.0]),
            &series("y", &index, &[1.0, 3.0]),
        )
        .unwrap();
        assert!(fit.t_statistic.is_nan());
        assert_relative_eq!(fit.slope, 2.0, epsilon = 1e-12);
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn backends_agree_on_market_data() {
        let index = daily_index(date(2024, 1, 2), 80);
        let closes = wave(80);
        let x = series("x", &index, &(0..80).map(|i| i as f64).collect::<Vec<_>>());
        let y = series("y", &index, &closes);
        let closed = RegressionBackend::ClosedForm.fit(&x, &y).unwrap();
        let matrix = RegressionBackend::Matrix.fit(&x, &y).unwrap();
        assert_relative_eq!(closed.slope, matrix.slope, epsilon = 1e-9);
        assert_relative_eq!(closed.intercept, matrix.intercept, epsilon = 1e-9);
        assert_relative_eq!(closed.correlation, matrix.correlation, epsilon = 1e-9);
        assert_relative_eq!(closed.t_statistic, matrix.t_statistic, epsilon = 1e-9);
    }

    #[test]
    fn detect_picks_a_backend() {
        let backend = RegressionBackend::detect();
        let index = daily_index(date(2024, 1, 2), 3);
        let x = series("x", &index, &[1.0, 2.0, 4.0]);
        let y = series("y", &index, &[1.0, 2.0, 3.0]);
        assert_eq!(linear_regression(&x, &y).unwrap().backend, backend);
    }
}

mod resolution {
    use super::*;

    #[test]
    fn defaults_match_capitalized_columns() {
        let mut table = capitalized_table(daily_index(date(2024, 1, 2), 30), &wave(30));
        let out = Dispatcher::default()
            .invoke(&mut table, &Invocation::new("ssf"))
            .unwrap();
        assert_eq!(out.name(), "SSF_10_2");
        assert_eq!(out.as_series().unwrap().values[0], wave(30)[0]);
    }

    #[test]
    fn missing_column_names_request_and_available() {
        let mut table = Table::new(daily_index(date(2024, 1, 2), 3))
            .with_column("Open", vec![1.0; 3])
            .unwrap()
            .with_column("Close", vec![1.0; 3])
            .unwrap();
        let err = Dispatcher::default()
            .invoke(&mut table, &Invocation::new("vwap"))
            .unwrap_err();
        let message = err.root_cause().to_string();
        assert!(message.contains("'high'"));
        assert!(message.contains("Open, Close"));
        assert_eq!(err.exit_status(), 3);
    }

    #[test]
    fn explicit_column_override() {
        let mut table = ohlcv_table(daily_index(date(2024, 1, 2), 10), &wave(10));
        table.insert_column("Adj Close", vec![7.0; 10]).unwrap();
        let inv = Invocation::new("sma")
            .input("close", "adj close")
            .param("length", ParamValue::Int(2));
        let out = Dispatcher::default().invoke(&mut table, &inv).unwrap();
        assert_eq!(out.as_series().unwrap().values[1], 7.0);
    }

    #[test]
    fn unknown_indicator_exit_status() {
        let mut table = ohlcv_table(daily_index(date(2024, 1, 2), 3), &[1.0, 2.0, 3.0]);
        let err = Dispatcher::default()
            .invoke(&mut table, &Invocation::new("ichimoku"))
            .unwrap_err();
        assert!(matches!(err, TaframeError::UnknownIndicator { .. }));
        assert_eq!(err.exit_status(), 5);
    }
}

mod catalogue {
    use super::*;

    #[test]
    fn registered_category_matches_output() {
        let dispatcher = Dispatcher::default();
        let none: [&str; 0] = [];
        for name in dispatcher.registry().names(&none) {
            let mut table = ohlcv_table(daily_index(date(2024, 1, 2), 40), &wave(40));
            let def = dispatcher.registry().get(name).unwrap();
            let out = dispatcher.invoke(&mut table, &Invocation::new(name)).unwrap();
            assert_eq!(out.category(), Some(def.category), "{name}");
        }
    }
}

mod append {
    use super::*;

    #[test]
    fn repeated_append_overwrites_in_place() {
        let mut table = ohlcv_table(daily_index(date(2024, 1, 2), 30), &wave(30));
        let dispatcher = Dispatcher::default();
        let ssf = Invocation::new("ssf").append(true);
        let sma = Invocation::new("sma").append(true);

        dispatcher.invoke(&mut table, &ssf).unwrap();
        dispatcher.invoke(&mut table, &sma).unwrap();
        let order = table.column_names();
        dispatcher.invoke(&mut table, &ssf).unwrap();

        assert_eq!(table.column_names(), order);
        assert_eq!(
            &order[5..],
            &["SSF_10_2".to_string(), "SMA_10".to_string()]
        );
    }

    #[test]
    fn frame_append_requires_matching_rows() {
        let mut table = ohlcv_table(daily_index(date(2024, 1, 2), 4), &[1.0, 2.0, 3.0, 4.0]);
        let fits = Invocation::new("vp")
            .param("width", ParamValue::Int(4))
            .append(true);
        Dispatcher::default().invoke(&mut table, &fits).unwrap();
        assert!(table.contains("total_volume"));
        assert_eq!(table.values("total_volume").unwrap().len(), 4);
    }

    #[test]
    fn timed_alias_and_offset() {
        let mut table = ohlcv_table(daily_index(date(2024, 1, 2), 10), &wave(10));
        let inv = Invocation::new("hl2")
            .param("offset", ParamValue::Int(1))
            .alias("mid")
            .timed(true);
        let out = Dispatcher::default().invoke(&mut table, &inv).unwrap();
        let values = &out.as_series().unwrap().values;
        assert!(values[0].is_nan());
        assert_relative_eq!(values[1], wave(10)[0], epsilon = 1e-12);
        assert_eq!(out.alias(), Some("mid"));
        assert!(out.elapsed().is_some());
    }
}
