//! Unit tests for mf-core primitives.

#[cfg(test)]
mod ids {
    use crate::{MAX_SLOTS, PackageKind, SLOT_TABLE, Slot, UnitNumber, position_of, slot_at};

    #[test]
    fn unit_number_rejects_non_positive() {
        assert_eq!(UnitNumber::from_raw(11), Some(UnitNumber(11)));
        assert_eq!(UnitNumber::from_raw(0), None);
        assert_eq!(UnitNumber::from_raw(-3), None);
    }

    #[test]
    fn slot_table_matches_legacy_iunit_order() {
        assert_eq!(SLOT_TABLE.len(), MAX_SLOTS);
        assert_eq!(slot_at(0), Slot::Package(PackageKind::BlockCenteredFlow));
        assert_eq!(slot_at(5), Slot::Package(PackageKind::HorizontalFlowBarrier));
        assert_eq!(slot_at(8), Slot::Package(PackageKind::StronglyImplicitProcedure));
        assert_eq!(slot_at(9), Slot::Reserved);
        assert_eq!(slot_at(10), Slot::Package(PackageKind::SuccessiveOverRelaxation));
        assert_eq!(slot_at(11), Slot::Package(PackageKind::OutputControl));
        assert_eq!(slot_at(23), Slot::Reserved);
        assert_eq!(slot_at(99), Slot::Reserved);
    }

    #[test]
    fn every_non_basic_kind_has_exactly_one_slot() {
        for kind in PackageKind::ALL {
            let n = SLOT_TABLE.iter().filter(|s| **s == Slot::Package(kind)).count();
            let expected = if kind == PackageKind::Basic { 0 } else { 1 };
            assert_eq!(n, expected, "{kind}");
        }
        assert_eq!(position_of(PackageKind::Recharge), Some(7));
        assert_eq!(position_of(PackageKind::Basic), None);
    }

    #[test]
    fn keyword_round_trip() {
        for kind in PackageKind::ALL {
            assert_eq!(kind.keyword().parse::<PackageKind>().unwrap(), kind);
        }
        assert_eq!("bcf".parse::<PackageKind>().unwrap(), PackageKind::BlockCenteredFlow);
        assert!("XYZ".parse::<PackageKind>().is_err());
    }
}

#[cfg(test)]
mod array {
    use ndarray::array;

    use crate::{Array2, CoreError, layer_from_vec, stack_layers};

    #[test]
    fn layer_from_vec_checks_length() {
        let err = layer_from_vec(2, 3, vec![0; 5]).unwrap_err();
        assert_eq!(
            err,
            CoreError::ShapeMismatch { shape: vec![2, 3], expected: 6, got: 5 }
        );
    }

    #[test]
    fn row_major_indexing() {
        let a = layer_from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(a.get((1, 0)), Some(&4));
        assert_eq!(a.get((2, 0)), None);
        assert_eq!(a, array![[1, 2, 3], [4, 5, 6]]);
    }

    #[test]
    fn stack_layers_leading_axis() {
        let l0 = Array2::from_elem((2, 2), 1.0);
        let l1 = Array2::from_elem((2, 2), 2.0);
        let a = stack_layers(2, 2, &[l0, l1]).unwrap();
        assert_eq!(a.dim(), (2, 2, 2));
        assert_eq!(a[(1, 1, 1)], 2.0);
        assert!(a.outer_iter().next().unwrap().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn stack_rejects_wrong_layer_shape() {
        let l0 = Array2::from_elem((2, 2), 0);
        let l1 = Array2::from_elem((3, 2), 0);
        assert!(matches!(
            stack_layers(2, 2, &[l0, l1]),
            Err(CoreError::ShapeMismatch { got: 6, .. })
        ));
    }

    #[test]
    fn stack_of_no_layers_is_empty() {
        let a = stack_layers::<f64>(3, 4, &[]).unwrap();
        assert_eq!(a.dim(), (0, 3, 4));
    }
}

#[cfg(test)]
mod cell {
    use crate::{CellIndex, GridShape};

    #[test]
    fn one_based_conversion() {
        assert_eq!(CellIndex::from_one_based(1, 1, 1), Some(CellIndex::new(0, 0, 0)));
        assert_eq!(CellIndex::from_one_based(2, 5, 3), Some(CellIndex::new(1, 4, 2)));
        assert_eq!(CellIndex::from_one_based(0, 1, 1), None);
        assert_eq!(CellIndex::from_one_based(1, -1, 1), None);
    }

    #[test]
    fn shape_contains() {
        let s = GridShape::new(1, 3, 3);
        assert!(s.contains(CellIndex::new(0, 2, 2)));
        assert!(!s.contains(CellIndex::new(1, 0, 0)));
        assert_eq!(s.ncells(), 9);
    }

    #[test]
    fn checked_ncells_catches_overflow() {
        assert_eq!(GridShape::new(2, 3, 4).checked_ncells(), Some(24));
        assert_eq!(GridShape::new(1, usize::MAX / 2, 3).checked_ncells(), None);
    }

    #[test]
    fn lateral_neighbors() {
        let a = CellIndex::new(0, 1, 1);
        assert!(a.is_lateral_neighbor(&CellIndex::new(0, 1, 2)));
        assert!(a.is_lateral_neighbor(&CellIndex::new(0, 0, 1)));
        assert!(!a.is_lateral_neighbor(&CellIndex::new(0, 2, 2)));
        assert!(!a.is_lateral_neighbor(&CellIndex::new(1, 1, 2)));
    }
}

#[cfg(test)]
mod time {
    use crate::{StressPeriod, TimeDiscretization, TimeUnit};

    #[test]
    fn uniform_steps() {
        let p = StressPeriod { length: 10.0, steps: 4, multiplier: 1.0 };
        assert_eq!(p.step_lengths(), vec![2.5; 4]);
    }

    #[test]
    fn geometric_steps_sum_to_period_length() {
        let p = StressPeriod { length: 100.0, steps: 5, multiplier: 1.2 };
        let dts = p.step_lengths();
        assert_eq!(dts.len(), 5);
        let total: f64 = dts.iter().sum();
        assert!((total - 100.0).abs() < 1e-9, "got {total}");
        assert!((dts[1] / dts[0] - 1.2).abs() < 1e-12);
    }

    #[test]
    fn step_enumeration() {
        let td = TimeDiscretization {
            periods: vec![
                StressPeriod { length: 1.0, steps: 2, multiplier: 1.0 },
                StressPeriod { length: 1.0, steps: 1, multiplier: 1.0 },
            ],
            time_unit: TimeUnit::Days,
            start_datetime: None,
        };
        assert_eq!(td.total_steps(), 3);
        assert_eq!(td.steps().collect::<Vec<_>>(), vec![(0, 0), (0, 1), (1, 0)]);
        assert_eq!(td.total_time(), 2.0);
    }

    #[test]
    fn time_unit_codes() {
        assert_eq!(TimeUnit::try_from(4).unwrap(), TimeUnit::Days);
        assert!(TimeUnit::try_from(9).is_err());
        assert_eq!(TimeUnit::Years.code(), 5);
    }
}

#[cfg(test)]
mod geo {
    use crate::{CoordinateInfo, LengthUnit};

    #[test]
    fn length_unit_from_letters_and_codes() {
        assert_eq!("m".parse::<LengthUnit>().unwrap(), LengthUnit::Meters);
        assert_eq!("Feet".parse::<LengthUnit>().unwrap(), LengthUnit::Feet);
        assert_eq!("3".parse::<LengthUnit>().unwrap(), LengthUnit::Centimeters);
        assert!("x".parse::<LengthUnit>().is_err());
        assert!("7".parse::<LengthUnit>().is_err());
    }

    #[test]
    fn constructors() {
        let c = CoordinateInfo::upper_left(10.0, 20.0).with_rotation(15.0);
        assert_eq!(c.xul, Some(10.0));
        assert_eq!(c.xll, None);
        assert_eq!(c.rotation, 15.0);
    }
}
