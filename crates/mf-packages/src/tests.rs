//! Unit tests for mf-packages.

use mf_core::{GridShape, StressPeriod, TimeDiscretization, TimeUnit, UnitNumber};
use mf_input::{DataUnits, ExternalUnitTable, InputError, LineSource, OpenUnits};

use crate::DecodeContext;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn src(text: &str) -> LineSource {
    LineSource::from_text("pkg", text)
}

/// One-day periods with the given step counts.
fn time(steps: &[u32]) -> TimeDiscretization {
    TimeDiscretization {
        periods:        steps
            .iter()
            .map(|&s| StressPeriod { length: 1.0, steps: s, multiplier: 1.0 })
            .collect(),
        time_unit:      TimeUnit::Days,
        start_datetime: None,
    }
}

fn with_ctx<R>(
    shape: GridShape,
    time: &TimeDiscretization,
    f: impl FnOnce(&mut DecodeContext<'_>) -> R,
) -> R {
    let table = ExternalUnitTable::new();
    let mut open = OpenUnits::new();
    let units = DataUnits::new(&table, &mut open, Some(UnitNumber(11)));
    let mut ctx = DecodeContext::new(shape, time, units);
    f(&mut ctx)
}

const GRID_133: GridShape = GridShape { nlay: 1, nrow: 3, ncol: 3 };

// ── Basic ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod bas {
    use super::*;
    use crate::bas::{decode, parse_activation};

    const BAS: &str = "\
demo model
heading line two
         1         3         3         2         4
  1  0  0  0  0  0  0  0  0  0  0  0
         0         1
CONSTANT 1
    -999.0
CONSTANT 10.0
     100.0         2       1.0
      50.0         1       1.0
";

    fn decode_text(text: &str) -> Result<crate::BasicPackage, crate::PackageError> {
        let table = ExternalUnitTable::new();
        let mut open = OpenUnits::new();
        let mut units = DataUnits::new(&table, &mut open, Some(UnitNumber(1)));
        decode(&mut src(text), &mut units)
    }

    #[test]
    fn decodes_header_mask_heads_and_periods() {
        let bas = decode_text(BAS).unwrap();
        assert_eq!(bas.heading, vec!["demo model", "heading line two"]);
        assert_eq!(bas.shape, GRID_133);
        assert_eq!(bas.nper(), 2);
        assert_eq!(bas.time_unit, TimeUnit::Days);
        assert_eq!(bas.activation.len(), 12);
        assert_eq!(bas.active_slots().collect::<Vec<_>>(), vec![(0, 1)]);
        assert_eq!((bas.iapart, bas.istrt), (0, 1));
        assert_eq!(bas.active_cells(), 9);
        assert_eq!(bas.hnoflo, -999.0);
        assert!(bas.strt.iter().all(|&h| h == 10.0));
        assert_eq!(bas.periods[0], StressPeriod { length: 100.0, steps: 2, multiplier: 1.0 });

        let tdis = bas.time_discretization(Some("1-1-1970".into()));
        assert_eq!(tdis.total_steps(), 3);
        assert_eq!(tdis.start_datetime.as_deref(), Some("1-1-1970"));
    }

    #[test]
    fn activation_vector_is_ragged() {
        assert_eq!(parse_activation("  1 11  0 12"), vec![1, 11, 0, 12]);
        assert_eq!(parse_activation("  1 -5 xx  3"), vec![1, 0]);
        assert_eq!(parse_activation(""), Vec::<i64>::new());
        let full = "  1".repeat(30);
        assert_eq!(parse_activation(&full).len(), 24);
    }

    #[test]
    fn malformed_header() {
        let text = BAS.replacen("         1         3         3         2         4", "1 3", 1);
        let err = decode_text(&text).unwrap_err();
        assert!(matches!(err.source, InputError::HeaderParse { .. }));

        let text = BAS.replacen("         1         3", "         0         3", 1);
        assert!(matches!(decode_text(&text).unwrap_err().source, InputError::HeaderParse { .. }));
    }

    #[test]
    fn header_with_overflowing_cell_count() {
        let text = BAS.replacen(
            "         1         3         3         2         4",
            "1 8589934592 8589934592 1 4",
            1,
        );
        let err = decode_text(&text).unwrap_err();
        assert!(matches!(err.source, InputError::HeaderParse { ref reason, .. } if reason.contains("too many cells")));
    }

    #[test]
    fn missing_period_record_names_period() {
        let text = BAS.trim_end().rsplit_once('\n').map(|(head, _)| format!("{head}\n")).unwrap();
        let err = decode_text(&text).unwrap_err();
        assert_eq!(err.site.period, Some(1));
        assert!(matches!(err.source, InputError::UnexpectedEof { .. }));
    }
}

// ── Block-centered flow ───────────────────────────────────────────────────────

#[cfg(test)]
mod bcf {
    use super::*;
    use crate::bcf::decode;
    use crate::{LayerArrays, LayerCode, LayerType};

    #[test]
    fn decision_table() {
        let confined_last = LayerArrays::for_layer(LayerType::Confined, false, true);
        assert_eq!(confined_last, LayerArrays {
            sf1: false, tran: true, hy: false, bot: false, vcont: false, sf2: false, top: false,
        });

        let convertible = LayerArrays::for_layer(LayerType::FullyConvertible, true, false);
        assert_eq!(convertible, LayerArrays {
            sf1: true, tran: false, hy: true, bot: true, vcont: true, sf2: true, top: true,
        });

        let limited_steady = LayerArrays::for_layer(LayerType::LimitedConvertible, false, false);
        assert!(limited_steady.tran && limited_steady.top && !limited_steady.sf2);
    }

    #[test]
    fn layer_code_digits() {
        let code = LayerCode::from_raw(13).unwrap();
        assert_eq!(code.averaging, 1);
        assert_eq!(code.layer_type, LayerType::FullyConvertible);
        assert_eq!(code.raw(), 13);
        assert!(LayerCode::from_raw(4).is_none());
        assert!(LayerCode::from_raw(-1).is_none());
    }

    #[test]
    fn steady_two_layer_model() {
        let text = "\
         1         0
 1 0
CONSTANT 1.0
CONSTANT 100.0
CONSTANT 50.0
CONSTANT 10.0
CONSTANT -20.0
CONSTANT 0.01
CONSTANT 500.0
";
        let shape = GridShape::new(2, 3, 3);
        let t = time(&[1]);
        let bcf = with_ctx(shape, &t, |ctx| decode(&mut src(text), ctx)).unwrap();

        assert!(!bcf.is_transient());
        assert_eq!(bcf.delr, vec![100.0; 3]);
        assert_eq!(bcf.delc, vec![50.0; 3]);

        let top = &bcf.layers[0];
        assert_eq!(top.code.layer_type, LayerType::Unconfined);
        assert_eq!(top.hy.as_ref().unwrap()[(0, 0)], 10.0);
        assert_eq!(top.bot.as_ref().unwrap()[(2, 2)], -20.0);
        assert!(top.vcont.is_some() && top.tran.is_none() && top.sf1.is_none());

        let bottom = &bcf.layers[1];
        assert_eq!(bottom.code.layer_type, LayerType::Confined);
        assert_eq!(bottom.tran.as_ref().unwrap()[(1, 1)], 500.0);
        assert!(bottom.vcont.is_none());
    }

    #[test]
    fn transient_convertible_layer() {
        let text = "\
         0         0
13
CONSTANT 1.0
CONSTANT 1.0
CONSTANT 1.0
CONSTANT 0.0001
CONSTANT 5.0
CONSTANT 0.0
CONSTANT 0.2
CONSTANT 10.0
";
        let t = time(&[1]);
        let bcf = with_ctx(GRID_133, &t, |ctx| decode(&mut src(text), ctx)).unwrap();
        let layer = &bcf.layers[0];
        assert!(bcf.is_transient());
        assert_eq!(layer.code.averaging, 1);
        assert_eq!(layer.sf1.as_ref().unwrap()[(0, 0)], 0.0001);
        assert_eq!(layer.sf2.as_ref().unwrap()[(0, 0)], 0.2);
        assert_eq!(layer.top.as_ref().unwrap()[(0, 0)], 10.0);
        assert!(layer.vcont.is_none());
    }

    #[test]
    fn layer_codes_continue_on_second_line() {
        let mut text = format!("1 0\n{}\n13\n", "00".repeat(40));
        // TRPY DELR DELC, then TRAN and VCONT for each of the 40 confined layers
        text.push_str(&"CONSTANT 1.0\n".repeat(3 + 40 * 2));
        text.push_str("CONSTANT 2.0\nCONSTANT -5.0\nCONSTANT 7.5\n");

        let shape = GridShape::new(41, 1, 1);
        let t = time(&[1]);
        let mut s = src(&text);
        let bcf = with_ctx(shape, &t, |ctx| decode(&mut s, ctx)).unwrap();

        assert_eq!(bcf.layers.len(), 41);
        assert!(bcf.layers[..40].iter().all(|l| l.code.raw() == 0 && l.tran.is_some()));
        let last = &bcf.layers[40];
        assert_eq!(last.code.raw(), 13);
        assert_eq!(last.code.layer_type, LayerType::FullyConvertible);
        assert_eq!(last.hy.as_ref().unwrap()[(0, 0)], 2.0);
        assert_eq!(last.bot.as_ref().unwrap()[(0, 0)], -5.0);
        assert_eq!(last.top.as_ref().unwrap()[(0, 0)], 7.5);
        assert!(last.vcont.is_none());
        assert!(s.try_next_line().unwrap().is_none());
    }

    #[test]
    fn blank_layer_code_is_confined() {
        let text = "1 0\n\nCONSTANT 1\nCONSTANT 1\nCONSTANT 1\nCONSTANT 7\n";
        let t = time(&[1]);
        let bcf = with_ctx(GRID_133, &t, |ctx| decode(&mut src(text), ctx)).unwrap();
        assert_eq!(bcf.layers[0].code.layer_type, LayerType::Confined);
        assert!(bcf.layers[0].tran.is_some());
    }

    #[test]
    fn bad_layer_code() {
        let t = time(&[1]);
        let err = with_ctx(GRID_133, &t, |ctx| decode(&mut src("1 0\n 4\n"), ctx)).unwrap_err();
        assert!(matches!(err.source, InputError::InvalidField { .. }));
    }

    #[test]
    fn array_error_carries_layer() {
        let text = "1 0\n 0 0\nCONSTANT 1\nCONSTANT 1\nCONSTANT 1\nCONSTANT 1\nCONSTANT 1\n";
        let shape = GridShape::new(2, 3, 3);
        let t = time(&[1]);
        let err = with_ctx(shape, &t, |ctx| decode(&mut src(text), ctx)).unwrap_err();
        assert_eq!(err.site.layer, Some(1));
        assert!(err.to_string().starts_with("BCF layer 2"));
    }
}

// ── Boundary lists ────────────────────────────────────────────────────────────

#[cfg(test)]
mod boundary {
    use mf_core::{CellIndex, PackageKind};

    use super::*;
    use crate::boundary::decode;
    use crate::{RiverPackage, WellPackage};

    #[test]
    fn well_list_with_reuse() {
        let text = "\
         2         0
         2
         1         1         1    -100.0
1 3 2 50.0
        -1
";
        let t = time(&[1, 1]);
        let wel: WellPackage =
            with_ctx(GRID_133, &t, |ctx| decode(&mut src(text), ctx, PackageKind::Well)).unwrap();

        assert_eq!(wel.max_active, 2);
        assert_eq!(wel.records(0).len(), 2);
        assert_eq!(wel.records(0)[0].cell, CellIndex::new(0, 0, 0));
        assert_eq!(wel.records(0)[1].cell, CellIndex::new(0, 2, 1));
        assert_eq!(wel.records(0)[1].flux, 50.0);
        assert!(wel.periods.is_reused(1));
        assert_eq!(wel.records(1), wel.records(0));
    }

    #[test]
    fn river_zero_count_and_fields() {
        let text = "1 40\n0\n1\n1 2 3 10.0 5.0 8.0\n";
        let t = time(&[1, 1]);
        let riv: RiverPackage =
            with_ctx(GRID_133, &t, |ctx| decode(&mut src(text), ctx, PackageKind::River)).unwrap();
        assert_eq!(riv.cbc_unit, 40);
        assert!(riv.records(0).is_empty());
        let r = riv.records(1)[0];
        assert_eq!((r.stage, r.conductance, r.bottom), (10.0, 5.0, 8.0));
        assert!(!riv.periods.is_reused(1));
    }

    #[test]
    fn short_record_names_package_period_and_record() {
        let text = "1 0\n1\n1 1 1 10.0 5.0\n";
        let t = time(&[1]);
        let err = with_ctx(GRID_133, &t, |ctx| {
            decode::<crate::RiverRecord>(&mut src(text), ctx, PackageKind::River)
        })
        .unwrap_err();
        assert_eq!(err.kind(), PackageKind::River);
        assert_eq!(err.site.period, Some(0));
        assert!(matches!(
            err.source,
            InputError::RecordFieldCount { record: Some(1), expected: 6, found: 5, .. }
        ));
    }

    #[test]
    fn huge_record_count_runs_out_of_input() {
        let text = "1 0\n99999999999\n1 1 1 -100.0\n";
        let t = time(&[1]);
        let err = with_ctx(GRID_133, &t, |ctx| {
            decode::<crate::WellRecord>(&mut src(text), ctx, PackageKind::Well)
        })
        .unwrap_err();
        assert_eq!(err.site.period, Some(0));
        assert!(matches!(err.source, InputError::UnexpectedEof { .. }));
    }

    #[test]
    fn reuse_in_first_period_rejected() {
        let t = time(&[1]);
        let err = with_ctx(GRID_133, &t, |ctx| {
            decode::<crate::DrainRecord>(&mut src("1 0\n-1\n"), ctx, PackageKind::Drain)
        })
        .unwrap_err();
        assert!(matches!(err.source, InputError::InvalidReuseAtFirstPeriod { .. }));
    }
}

// ── Horizontal flow barrier ───────────────────────────────────────────────────

#[cfg(test)]
mod hfb {
    use mf_core::CellIndex;

    use super::*;
    use crate::hfb::decode;

    #[test]
    fn barriers_grouped_by_layer() {
        let text = "2\n1\n1 1 1 2 0.5\n1\n2 2 3 2 0.1\n";
        let shape = GridShape::new(2, 3, 3);
        let t = time(&[1]);
        let hfb = with_ctx(shape, &t, |ctx| decode(&mut src(text), ctx)).unwrap();
        assert_eq!(hfb.declared, 2);
        assert_eq!(hfb.barriers.len(), 2);
        let b = hfb.barriers[1];
        assert_eq!(b.first, CellIndex::new(1, 1, 1));
        assert_eq!(b.second, CellIndex::new(1, 2, 1));
        assert_eq!(b.hydchr, 0.1);
        assert_eq!(hfb.in_layer(0).count(), 1);
    }

    #[test]
    fn count_mismatch_is_not_an_error() {
        let text = "5\n1\n1 1 1 2 0.5\n";
        let t = time(&[1]);
        let hfb = with_ctx(GRID_133, &t, |ctx| decode(&mut src(text), ctx)).unwrap();
        assert_eq!(hfb.declared, 5);
        assert_eq!(hfb.barriers.len(), 1);
    }

    #[test]
    fn barrier_outside_grid() {
        let t = time(&[1]);
        let err = with_ctx(GRID_133, &t, |ctx| decode(&mut src("1\n1\n1 1 1 4 0.5\n"), ctx)).unwrap_err();
        assert_eq!(err.site.layer, Some(0));
        assert!(matches!(err.source, InputError::CellOutOfBounds { col: 4, .. }));
    }
}

// ── Recharge / evapotranspiration ─────────────────────────────────────────────

#[cfg(test)]
mod areal {
    use super::*;

    #[test]
    fn recharge_reuse_and_no_layer_array() {
        let text = "1 0\n0 0\nCONSTANT 0.001\n-1 0\n";
        let t = time(&[1, 1]);
        let rch = with_ctx(GRID_133, &t, |ctx| crate::rch::decode(&mut src(text), ctx)).unwrap();
        assert!(rch.irch.is_none());
        assert!(rch.rech.is_reused(1));
        assert_eq!(rch.rech.get(1).unwrap()[(2, 2)], 0.001);
    }

    #[test]
    fn recharge_layer_array_series() {
        let text = "2 0\n0 0\nCONSTANT 0.001\nCONSTANT 1\n0 -1\nCONSTANT 0.002\n";
        let t = time(&[1, 1]);
        let rch = with_ctx(GRID_133, &t, |ctx| crate::rch::decode(&mut src(text), ctx)).unwrap();
        let irch = rch.irch.as_ref().unwrap();
        assert_eq!(irch.len(), 2);
        assert!(irch.is_reused(1));
        assert!(!rch.rech.is_reused(1));
        assert_eq!(rch.rech.get(1).unwrap()[(0, 0)], 0.002);
    }

    #[test]
    fn evapotranspiration_three_series() {
        let text = "\
1 0
0 0 0
CONSTANT 10.0
CONSTANT 0.004
CONSTANT 2.0
-1 0 -1
CONSTANT 0.005
";
        let t = time(&[1, 1]);
        let evt = with_ctx(GRID_133, &t, |ctx| crate::evt::decode(&mut src(text), ctx)).unwrap();
        assert!(evt.ievt.is_none());
        assert!(evt.surf.is_reused(1));
        assert!(!evt.evtr.is_reused(1));
        assert!(evt.exdp.is_reused(1));
        assert_eq!(evt.evtr.get(1).unwrap()[(0, 0)], 0.005);
    }

    #[test]
    fn evapotranspiration_flag_record_needs_layer_flag_for_option_two() {
        let t = time(&[1]);
        let err = with_ctx(GRID_133, &t, |ctx| crate::evt::decode(&mut src("2 0\n0 0 0\n"), ctx))
            .unwrap_err();
        assert_eq!(err.site.period, Some(0));
        assert!(matches!(err.source, InputError::RecordFieldCount { expected: 4, .. }));
    }
}

// ── Solvers ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod solver {
    use super::*;
    use crate::solver::{DEFAULT_IPRSIP, DEFAULT_WSEED, decode_sip, decode_sor};

    #[test]
    fn sip_defaults_when_seed_is_computed() {
        let sip = decode_sip(&mut src("50 5\n1.0 0.01 1\n")).unwrap();
        assert_eq!((sip.mxiter, sip.nparm, sip.ipcalc), (50, 5, 1));
        assert_eq!(sip.wseed, DEFAULT_WSEED);
        assert_eq!(sip.iprsip, DEFAULT_IPRSIP);
    }

    #[test]
    fn sip_requires_seed_when_ipcalc_zero() {
        let sip = decode_sip(&mut src("50 5\n1.0 0.01 0 0.5 2\n")).unwrap();
        assert_eq!((sip.wseed, sip.iprsip), (0.5, 2));
        let err = decode_sip(&mut src("50 5\n1.0 0.01 0\n")).unwrap_err();
        assert!(matches!(err.source, InputError::RecordFieldCount { expected: 5, .. }));
    }

    #[test]
    fn sor_fixed_columns() {
        let text = format!("{:>10}\n{:>10}{:>10}{:>10}\n", 100, "1.2", "0.001", 3);
        let sor = decode_sor(&mut src(&text)).unwrap();
        assert_eq!(sor.mxiter, 100);
        assert_eq!((sor.accl, sor.hclose, sor.iprsor), (1.2, 0.001, 3));
    }
}

// ── Output control ────────────────────────────────────────────────────────────

#[cfg(test)]
mod oc {
    use super::*;
    use crate::OutputCodes;
    use crate::oc::decode;

    #[test]
    fn per_step_codes_with_reuse() {
        let text = "\
0 0 30 31
0 1 1 0
1 0 1 0
-1 0 0
1 1 0 1
1 1 1 1
0 0 0 0
";
        let shape = GridShape::new(2, 3, 3);
        let t = time(&[2, 1]);
        let oc = with_ctx(shape, &t, |ctx| decode(&mut src(text), ctx)).unwrap();

        assert_eq!((oc.ihedun, oc.iddnun), (30, 31));
        assert_eq!(oc.flags.len(), 3);
        assert_eq!(oc.flags[1].icbcfl, 0);
        assert_eq!(oc.flags[2].icbcfl, 1);
        assert!(oc.codes.is_reused(1));
        assert!(matches!(oc.codes.get(0), Some(OutputCodes::Uniform(c)) if c.hdsv == 1));
        let per_layer = oc.codes.get(2).unwrap();
        assert_eq!(per_layer.for_layer(0).unwrap().hdpr, 1);
        assert_eq!(per_layer.for_layer(1).unwrap().hdpr, 0);
        assert!(per_layer.for_layer(2).is_none());
    }

    #[test]
    fn reuse_at_first_step_rejected() {
        let t = time(&[1]);
        let err = with_ctx(GRID_133, &t, |ctx| decode(&mut src("0 0 30 31\n-1 0 0\n"), ctx)).unwrap_err();
        assert_eq!(err.site.step, Some(0));
        assert!(matches!(err.source, InputError::InvalidReuseAtFirstPeriod { .. }));
    }

    #[test]
    fn icbcfl_required_when_codes_follow() {
        let t = time(&[1]);
        let err = with_ctx(GRID_133, &t, |ctx| decode(&mut src("0 0 30 31\n0 1 1\n"), ctx)).unwrap_err();
        assert!(matches!(err.source, InputError::RecordFieldCount { .. }));
    }
}

// ── Package dispatch ──────────────────────────────────────────────────────────

#[cfg(test)]
mod package {
    use mf_core::PackageKind;

    use super::*;
    use crate::Package;
    use crate::package::decode;

    #[test]
    fn basic_is_not_dispatched() {
        let t = time(&[1]);
        let out = with_ctx(GRID_133, &t, |ctx| decode(PackageKind::Basic, &mut src(""), ctx));
        assert!(out.is_none());
    }

    #[test]
    fn kind_round_trips_through_decode() {
        let t = time(&[1]);
        let pkg = with_ctx(GRID_133, &t, |ctx| {
            decode(PackageKind::SuccessiveOverRelaxation, &mut src("10\n1.0 0.01 1\n"), ctx)
        })
        .unwrap()
        .unwrap();
        assert_eq!(pkg.kind(), PackageKind::SuccessiveOverRelaxation);
        assert!(matches!(pkg, Package::SuccessiveOverRelaxation(ref s) if s.mxiter == 10));
    }
}
