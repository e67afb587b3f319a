use super::{Dimension, DimensionKind};
use super::plan::{AxisPlan, Dispatch, Plan};

/// Returns the [`Dimension`]s of the result of selecting `plan` from an array
/// described by `dims`, followed by one [`Dimension::unit()`] per inserted
/// axis.
///
/// Axes that select exactly one position are dropped. A
/// [`Dispatch::TakeValues`] selection has a single axis enumerating the
/// gathered points.
pub fn rebuild(dims: &[Dimension], plan: &Plan, new_axes: usize) -> Vec<Dimension> {
    assert_eq!(dims.len(), plan.axes.len(), "Expected one Dimension per axis");
    let mut ret: Vec<Dimension> = match plan.dispatch {
        Dispatch::TakeValues => {
            let n = plan.shape()[0];
            if n == 1 { Vec::new() } else { vec![Dimension::regular(DimensionKind::Other, 0.0, 1.0, n)] }
        },
        _ => dims.iter().zip(&plan.axes).filter(|(_, a)| a.len() != 1).map(|(dim, a)| match a {
            AxisPlan::Section {section, flip: false} => dim.extract(*section),
            AxisPlan::Section {section, flip: true} => dim.extract(*section).reversed(),
            AxisPlan::Take(list) => dim.extract_indices(list),
            AxisPlan::Empty => dim.extract_indices(&[]),
        }).collect(),
    };
    ret.extend((0..new_axes).map(|_| Dimension::unit()));
    ret
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Section};

    fn dims() -> Vec<Dimension> {
        vec![
            Dimension::regular(DimensionKind::T, 100.0, 1.0, 4).with_name("time"),
            Dimension::regular(DimensionKind::Y, 50.0, -10.0, 5),
            Dimension::regular(DimensionKind::X, 0.0, 10.0, 6),
        ]
    }

    #[test]
    fn drops_single_positions() {
        let plan = Plan {
            axes: vec![
                AxisPlan::Section {section: Section::single(2), flip: false},
                AxisPlan::Section {section: Section::new(1, 3, 2), flip: true},
                AxisPlan::Take(vec![5, 0]),
            ],
            dispatch: Dispatch::Take,
        };
        let ret = rebuild(&dims(), &plan, 1);
        assert_eq!(ret.len(), 3);
        assert_eq!(ret[0].values(), [20.0, 40.0]);
        assert_eq!(ret[0].kind(), DimensionKind::Y);
        assert_eq!(ret[1].values(), [50.0, 0.0]);
        assert_eq!(ret[2], Dimension::unit());
    }

    #[test]
    fn empty_axes_are_kept() {
        let plan = Plan {
            axes: vec![AxisPlan::Empty, AxisPlan::Section {section: Section::full(5), flip: false}, AxisPlan::Take(vec![1])],
            dispatch: Dispatch::Section,
        };
        let ret = rebuild(&dims(), &plan, 0);
        assert_eq!(ret.len(), 2);
        assert!(ret[0].is_empty());
        assert_eq!(ret[0].name(), "time");
        assert_eq!(ret[1].len(), 5);
    }

    #[test]
    fn paired_points() {
        let plan = Plan {
            axes: vec![AxisPlan::Take(vec![0, 1, 2]), AxisPlan::Take(vec![0, 1, 2]), AxisPlan::Take(vec![3, 3, 3])],
            dispatch: Dispatch::TakeValues,
        };
        let ret = rebuild(&dims(), &plan, 0);
        assert_eq!(ret.len(), 1);
        assert_eq!(ret[0].kind(), DimensionKind::Other);
        assert_eq!(ret[0].values(), [0.0, 1.0, 2.0]);
    }
}
