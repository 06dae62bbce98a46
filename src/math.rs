use num::Float;

/// Similar to numpy.interp for a single x: linear between neighbouring
/// coordinates, flat beyond the first and last ones. `coords` must be sorted by x.
/// Returns zero for NaN input or an empty coordinate list.
pub(crate) fn interp<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let (Some(&(x_first, y_first)), Some(&(x_last, y_last))) = (coords.first(), coords.last()) else {
        return F::zero();
    };

    if x.is_nan() {
        return F::zero();
    }
    if x <= x_first {
        return y_first;
    }
    if x >= x_last {
        return y_last;
    }

    for window in coords.windows(2) {
        let (x1, y1) = window[0];
        let (x2, y2) = window[1];

        if x1 <= x && x <= x2 {
            // Repeated x coordinates describe a vertical jump
            if x2 == x1 {
                return y2;
            }

            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    y_last
}

#[test]
fn test_interp() {
    let xs = [1., 2., 3.];
    let ys = [3., 2., 0.];
    let coords: Vec<(f64, f64)> = xs.into_iter().zip(ys).collect();
    let got: Vec<_> = [0., 1., 1.5, 2.72, 3.24].into_iter().map(|x| interp(x, &coords)).collect();

    assert_eq!(got, vec![3., 3., 2.5, 0.5599999999999996, 0.]);

    let xs = [0., 1., 2., 3., 4.5];
    let ys = [0., 2., 5., 3., 2.];
    let coords: Vec<(f64, f64)> = xs.into_iter().zip(ys).collect();
    let got: Vec<_> = [2.5, -1., 7.5].into_iter().map(|x| interp(x, &coords)).collect();

    assert_eq!(got, vec![4., 0., 2.]);
}

#[test]
fn test_interp_degenerate() {
    assert_eq!(interp(0.5, &[] as &[(f64, f64)]), 0.);
    assert_eq!(interp(f64::NAN, &[(0., 1.), (1., 0.)]), 0.);
    assert_eq!(interp(7., &[(3., 0.4)]), 0.4);
}
