//! End-to-end checks: put raw instrument samples onto the common time grid.
use approx::assert_abs_diff_eq;
use cloudnet_rs::{
    masked::MaskedArray2,
    rebin::{rebin_mean, rebin_mean_nan},
    time_axis::{build_time_grid, epoch_to_decimal_hour, DayEpoch},
};
use ndarray::{Array1, Array2};

#[test]
fn test_rebin_raw_samples_onto_hourly_grid() {
    let epoch = DayEpoch::new(2020, 1, 1).unwrap();
    // One sample every 10 minutes for the whole day, ending on the next midnight.
    let raw_times = (0..=144).map(|i| i as f64 * 600.0).collect::<Vec<_>>();
    let hours = Array1::from(epoch_to_decimal_hour(&epoch, &raw_times).unwrap());
    assert_eq!(hours[0], 0.0);
    assert_eq!(hours[144], 24.0);

    // Two columns: the decimal hour itself, and a column that is always invalid.
    let mut data = Array2::from_elem((hours.len(), 2), f64::NAN);
    data.column_mut(0).assign(&hours);

    // Hourly centers at 0.5, 1.5, ..., 23.5 give edges at 0, 1, ..., 24
    let x_new = Array1::from_shape_fn(24, |i| i as f64 + 0.5);
    let out = rebin_mean_nan(hours.view(), data.view(), x_new.view()).unwrap();

    assert_eq!(out.shape(), (24, 2));
    // Hour 0 holds 0, 1/6, ..., 5/6 -> mean 5/12
    assert_abs_diff_eq!(out.get(0, 0).unwrap(), 5.0 / 12.0, epsilon = 1e-12);
    // The last bin also picks up the 24.0 end-of-day sample
    let last_expected = (0..=6).map(|i| 23.0 + i as f64 / 6.0).sum::<f64>() / 7.0;
    assert_abs_diff_eq!(out.get(23, 0).unwrap(), last_expected, epsilon = 1e-12);
    assert!((0..24).all(|i| out.is_masked(i, 1)));
}

#[test]
fn test_fine_grid_has_gaps_masked() {
    let x_new = build_time_grid(60).unwrap();
    let x_in = Array1::from(vec![0.5, 12.0, 12.001]);
    let data = MaskedArray2::unmasked(Array2::from_shape_vec((3, 1), vec![1.0, 2.0, 4.0]).unwrap());
    let out = rebin_mean(x_in.view(), &data, x_new.view()).unwrap();

    assert_eq!(out.nrows(), x_new.len());
    assert_eq!(out.ncols(), 1);
    // The outer edges round to 0 and 24 h, so the bins are 24/1439 h wide
    // and both samples near noon share a bin.
    assert_eq!(out.count_valid(), 2);
    assert_eq!(out.get(719, 0), Some(3.0));
}
