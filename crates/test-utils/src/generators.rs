//! Synthetic swath and profile generators.
//!
//! Values follow simple closed-form patterns so tests can check selections
//! without reference files.

/// Latitudes and longitudes of a synthetic swath of `n_scans` x `n_pixels`.
///
/// Scans run northward from `lat0` in steps of `dlat`; pixels spread across
/// track from `lon0` in steps of `dlon`. Row-major (scan, pixel).
pub fn create_swath_geolocation(
    n_scans: usize,
    n_pixels: usize,
    lat0: f64,
    dlat: f64,
    lon0: f64,
    dlon: f64,
) -> (Vec<f64>, Vec<f64>) {
    let mut lat = Vec::with_capacity(n_scans * n_pixels);
    let mut lon = Vec::with_capacity(n_scans * n_pixels);
    for scan in 0..n_scans {
        for pixel in 0..n_pixels {
            lat.push(lat0 + scan as f64 * dlat);
            lon.push(lon0 + pixel as f64 * dlon);
        }
    }
    (lat, lon)
}

/// Brightness temperatures of shape (scan, pixel, channel).
///
/// Each value is `200 + 10 * channel + pixel * 0.5 + scan * 0.01`, so the
/// across-track standard deviation is well above the flatline threshold.
pub fn create_tb_swath(n_scans: usize, n_pixels: usize, n_channels: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(n_scans * n_pixels * n_channels);
    for scan in 0..n_scans {
        for pixel in 0..n_pixels {
            for channel in 0..n_channels {
                data.push(200.0 + 10.0 * channel as f64 + pixel as f64 * 0.5 + scan as f64 * 0.01);
            }
        }
    }
    data
}

/// A standard-atmosphere-like temperature profile in K on `heights` (m).
pub fn create_temperature_profile(heights: &[f64]) -> Vec<f64> {
    heights
        .iter()
        .map(|h| if *h < 11000.0 { 288.15 - 0.0065 * h } else { 216.65 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swath_geolocation_layout() {
        let (lat, lon) = create_swath_geolocation(3, 4, 80.0, 0.1, 10.0, 1.0);
        assert_eq!(lat.len(), 12);
        assert_eq!(lat[4], 80.1);
        assert_eq!(lon[5], 11.0);
    }

    #[test]
    fn test_tb_swath_layout() {
        let tb = create_tb_swath(2, 3, 2);
        assert_eq!(tb.len(), 12);
        assert_eq!(tb[0], 200.0);
        assert_eq!(tb[1], 210.0);
        assert_eq!(tb[2], 200.5);
    }

    #[test]
    fn test_temperature_profile() {
        let t = create_temperature_profile(&[0.0, 1000.0, 12000.0]);
        assert_eq!(t, vec![288.15, 281.65, 216.65]);
    }
}
