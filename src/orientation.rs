//! Tilt estimate used to pan the still image across the capture window.

use crate::platform::MotionSample;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Arctangent on [-1, 1], max error around 0.0015 rad
fn atan_unit(z: f32) -> f32 {
    let a = z.abs();
    FRAC_PI_4 * z - z * (a - 1.0) * (0.2447 + 0.0663 * a)
}

/// Polynomial `atan2` covering the full (-π, π] range
pub fn fast_atan2(y: f32, x: f32) -> f32 {
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }

    if x.abs() >= y.abs() {
        let a = atan_unit(y / x);
        if x > 0.0 {
            a
        } else if y >= 0.0 {
            a + PI
        } else {
            a - PI
        }
    } else {
        let a = -atan_unit(x / y);
        if y > 0.0 {
            FRAC_PI_2 + a
        } else {
            -FRAC_PI_2 + a
        }
    }
}

/// Horizontal and vertical pan, each in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanRates {
    pub width: f32,
    pub height: f32,
}

impl PanRates {
    pub const CENTERED: PanRates = PanRates {
        width: 0.0,
        height: 0.0,
    };
}

impl Default for PanRates {
    fn default() -> Self {
        Self::CENTERED
    }
}

/// Pitch and roll in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    pub pitch: f32,
    pub roll: f32,
}

/// Converts accelerometer samples into pan rates
#[derive(Debug, Default, Clone, Copy)]
pub struct OrientationEstimator;

impl OrientationEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Gravity direction in the screen frame: x right, y up, z out of the
    /// screen. The sensor reports specific force, which points away from
    /// gravity.
    pub fn gravity(&self, sample: &MotionSample) -> [f32; 3] {
        let [x, y, z] = sample.accel;
        [-x, -y, -z]
    }

    pub fn attitude(&self, sample: &MotionSample) -> Option<Attitude> {
        let [x, y, z] = self.gravity(sample);
        if !(x * x + y * y + z * z).is_normal() {
            return None;
        }

        let pitch = fast_atan2(z, -y);
        let sign = if -pitch < 0.0 { -1.0 } else { 1.0 };
        let roll = fast_atan2(-x, -z * sign);
        Some(Attitude { pitch, roll })
    }

    /// Pan rates for one sample, centered when the sensor is unavailable
    pub fn pan_rates(&self, sample: Option<&MotionSample>) -> PanRates {
        let Some(attitude) = sample.and_then(|s| self.attitude(s)) else {
            return PanRates::CENTERED;
        };

        PanRates {
            width: clamp_rate(-attitude.roll),
            height: clamp_rate(-(attitude.pitch + FRAC_PI_2)),
        }
    }
}

fn clamp_rate(rate: f32) -> f32 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(accel: [f32; 3]) -> MotionSample {
        MotionSample {
            accel,
            gyro: [0.0; 3],
        }
    }

    #[test]
    fn test_fast_atan2_tracks_libm() {
        for i in 0..72 {
            let angle = (i as f32) * 5.0_f32.to_radians() - PI;
            for radius in [0.01, 1.0, 250.0] {
                let (y, x) = (angle.sin() * radius, angle.cos() * radius);
                let approx = fast_atan2(y, x);
                let exact = y.atan2(x);
                let mut diff = (approx - exact).abs();
                if diff > PI {
                    diff = 2.0 * PI - diff;
                }
                assert!(diff < 0.005, "atan2({}, {}) = {} vs {}", y, x, approx, exact);
            }
        }
    }

    #[test]
    fn test_fast_atan2_axes() {
        assert_eq!(fast_atan2(0.0, 0.0), 0.0);
        assert!((fast_atan2(1.0, 0.0) - FRAC_PI_2).abs() < 1e-6);
        assert!((fast_atan2(-1.0, 0.0) + FRAC_PI_2).abs() < 1e-6);
        assert!((fast_atan2(0.0, -1.0) - PI).abs() < 1e-6);
        assert!(fast_atan2(0.0, 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_flat_face_up_is_centered() {
        let estimator = OrientationEstimator::new();
        let pan = estimator.pan_rates(Some(&sample([0.0, 0.0, 1.0])));
        assert!(pan.width.abs() < 1e-3);
        assert!(pan.height.abs() < 1e-3);
    }

    #[test]
    fn test_tilt_moves_the_window() {
        let estimator = OrientationEstimator::new();

        // roughly 30 degrees either way around the y axis
        let one_way = estimator.pan_rates(Some(&sample([0.5, 0.0, 0.866])));
        let other_way = estimator.pan_rates(Some(&sample([-0.5, 0.0, 0.866])));
        assert!((one_way.width + 0.5236).abs() < 0.005);
        assert!((other_way.width - 0.5236).abs() < 0.005);
        assert!(one_way.height.abs() < 1e-3);

        let upright = estimator.pan_rates(Some(&sample([0.0, 1.0, 0.0])));
        assert_eq!(upright.height, -1.0);
    }

    #[test]
    fn test_rates_stay_clamped() {
        let estimator = OrientationEstimator::new();
        for accel in [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, -1.0],
            [0.3, -0.7, -0.2],
        ] {
            let pan = estimator.pan_rates(Some(&sample(accel)));
            assert!((-1.0..=1.0).contains(&pan.width));
            assert!((-1.0..=1.0).contains(&pan.height));
        }
    }

    #[test]
    fn test_unavailable_sensor_is_centered() {
        let estimator = OrientationEstimator::new();
        assert_eq!(estimator.pan_rates(None), PanRates::CENTERED);
        assert_eq!(
            estimator.pan_rates(Some(&sample([0.0, 0.0, 0.0]))),
            PanRates::CENTERED
        );
    }
}
