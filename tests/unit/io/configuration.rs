//! Tests for synthesis constants and per-tier filter limits

#[cfg(test)]
mod tests {
    use poisonpix::io::configuration::{
        DEFAULT_FILTER_DEADLINE, DEFAULT_HEIGHT, DEFAULT_NAME_LENGTH, DEFAULT_WIDTH, DENSITY_MAX,
        DENSITY_MIN, FilterLimits, POINTS_MAX, POINTS_MIN,
    };
    use poisonpix::synthesis::Intensity;
    use std::time::Duration;

    // Tests defaults describe a full HD canvas with 32-character names
    // Verified by swapping width and height
    #[test]
    fn test_defaults() {
        assert_eq!((DEFAULT_WIDTH, DEFAULT_HEIGHT), (1920, 1080));
        assert_eq!(DEFAULT_NAME_LENGTH, 32);
        assert_eq!(DEFAULT_FILTER_DEADLINE, Duration::from_secs(1));
    }

    // Tests sampling ranges are non-empty
    // Verified by setting POINTS_MIN above POINTS_MAX
    #[test]
    fn test_ranges_are_ordered() {
        assert!(DENSITY_MIN >= 1 && DENSITY_MIN <= DENSITY_MAX);
        assert!(POINTS_MIN >= 3 && POINTS_MIN <= POINTS_MAX);
    }

    // Tests filter limits grow monotonically with intensity
    // Verified by giving medium the heavy kernel size
    #[test]
    fn test_filter_limits_scale_with_intensity() {
        let light = FilterLimits::for_intensity(Intensity::Light);
        let medium = FilterLimits::for_intensity(Intensity::Medium);
        let heavy = FilterLimits::for_intensity(Intensity::Heavy);

        assert_eq!(light.max_kernel, (100.0, 10));
        assert_eq!(medium.max_kernel, (500.0, 50));
        assert_eq!(heavy.max_kernel, (1000.0, 100));

        assert!(light.max_percent < medium.max_percent);
        assert!(medium.max_percent < heavy.max_percent);
        assert!(light.max_offset < heavy.max_offset);
    }
}
