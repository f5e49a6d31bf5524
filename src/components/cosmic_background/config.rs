/// Area-based population rule for one entity class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Density {
	pub divisor: f64,
	pub min: usize,
	pub max: usize,
}

impl Density {
	pub const fn new(divisor: f64, min: usize, max: usize) -> Self {
		Self { divisor, min, max }
	}

	/// `round(amount / divisor)` clamped to `[min, max]`. Degenerate inputs
	/// (zero, negative, NaN) fall back to `min`, and so does an inverted
	/// `min > max` range.
	pub fn count(&self, amount: f64) -> usize {
		let raw = amount / self.divisor;
		if !raw.is_finite() || raw <= 0.0 {
			return self.min;
		}
		(raw.round() as usize).min(self.max).max(self.min)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundConfig {
	pub stars: Density,
	pub nodes: Density,
	pub nebulae: Density,
	pub glyphs: Density,
	pub traces: Density,
	/// Applied to the node count rather than the viewport area.
	pub packets: Density,
	pub max_device_pixel_ratio: f64,
	/// Pointer offset in pixels at the viewport edge, per axis.
	pub pointer_amplitude: (f64, f64),
}

impl Default for BackgroundConfig {
	fn default() -> Self {
		Self {
			stars: Density::new(6800.0, 90, 260),
			nodes: Density::new(41000.0, 16, 36),
			nebulae: Density::new(240000.0, 3, 7),
			glyphs: Density::new(130000.0, 6, 16),
			traces: Density::new(170000.0, 7, 18),
			packets: Density::new(2.0, 6, 16),
			max_device_pixel_ratio: 2.0,
			pointer_amplitude: (24.0, 20.0),
		}
	}
}

impl BackgroundConfig {
	pub fn device_pixel_ratio(&self, reported: f64) -> f64 {
		if reported.is_finite() && reported > 0.0 {
			reported.min(self.max_device_pixel_ratio)
		} else {
			1.0
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zero_area_yields_minimum() {
		let config = BackgroundConfig::default();
		assert_eq!(config.stars.count(0.0), 90);
		assert_eq!(config.nodes.count(-10.0), 16);
		assert_eq!(config.glyphs.count(f64::NAN), 6);
	}

	#[test]
	fn inverted_range_does_not_panic() {
		let density = Density::new(41000.0, 40, 10);
		assert_eq!(density.count(0.0), 40);
		assert_eq!(density.count(41000.0 * 25.0), 40);
		assert_eq!(density.count(f64::MAX), 40);
		assert_eq!(Density::new(0.0, 3, 1).count(100.0), 3);
	}

	#[test]
	fn count_is_monotonic_in_area() {
		let density = BackgroundConfig::default().stars;
		let mut last = 0;
		for step in 0..400 {
			let count = density.count(step as f64 * 7_500.0);
			assert!(count >= last);
			assert!((90..=260).contains(&count));
			last = count;
		}
		assert_eq!(last, 260);
	}

	#[test]
	fn device_pixel_ratio_is_capped() {
		let config = BackgroundConfig::default();
		assert_eq!(config.device_pixel_ratio(3.0), 2.0);
		assert_eq!(config.device_pixel_ratio(1.5), 1.5);
		assert_eq!(config.device_pixel_ratio(0.0), 1.0);
	}
}
