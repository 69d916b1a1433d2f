//! Tests for the filter catalog, argument sampling and spec binding

#[cfg(test)]
mod tests {
    use poisonpix::PoisonError;
    use poisonpix::filters::{FilterArgs, FilterKind, FilterSpec};
    use poisonpix::io::configuration::FilterLimits;
    use poisonpix::synthesis::Intensity;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn args_with_kernel(coefficients: usize) -> FilterArgs {
        FilterArgs {
            radius: 2.0,
            percent: 150,
            threshold: 3,
            kernel: (0..coefficients).map(|i| i as f32).collect(),
            scale: 4.0,
            offset: 1.0,
            rank: 1_000,
            size: (12, 3),
        }
    }

    // Tests the catalog partitions into parameterless, parametric and rank-order kinds
    // Verified by marking kernel as parameterless
    #[test]
    fn test_catalog_partition() {
        assert_eq!(FilterKind::ALL.len(), 19);
        let parameterless = FilterKind::ALL.iter().filter(|k| k.is_parameterless()).count();
        let rank_order = FilterKind::ALL.iter().filter(|k| k.is_rank_order()).count();

        assert_eq!(parameterless, 10);
        assert_eq!(rank_order, FilterKind::RANK_ORDER.len());
        assert!(FilterKind::RANK_ORDER.iter().all(|k| k.is_rank_order()));
    }

    // Tests names parse regardless of case and separators
    // Verified by comparing names without squashing separators
    #[test]
    fn test_filter_name_parsing() {
        assert_eq!("GaussianBlur".parse::<FilterKind>().ok(), Some(FilterKind::GaussianBlur));
        assert_eq!("gaussian-blur".parse::<FilterKind>().ok(), Some(FilterKind::GaussianBlur));
        assert_eq!(
            "EDGE_ENHANCE_MORE".parse::<FilterKind>().ok(),
            Some(FilterKind::EdgeEnhanceMore)
        );

        for kind in FilterKind::ALL {
            assert_eq!(kind.name().parse::<FilterKind>().ok(), Some(kind));
        }
    }

    // Tests unknown names map to the unsupported filter error
    // Verified by reporting unknown names as configuration errors
    #[test]
    fn test_unknown_filter() {
        let result = "posterize".parse::<FilterKind>();
        assert!(matches!(
            result,
            Err(PoisonError::UnsupportedFilter { ref name }) if name == "posterize"
        ));
    }

    // Tests sampled arguments respect the tier limits
    // Verified by ignoring max_percent
    #[test]
    fn test_args_within_limits() {
        let limits = FilterLimits::for_intensity(Intensity::Light);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            let args = FilterArgs::sample(120, 200, 7, &limits, &mut rng);
            assert!(args.percent <= limits.max_percent);
            assert!(args.threshold <= limits.max_threshold);
            assert_eq!(args.kernel.len(), limits.max_kernel.1);
            assert!(args.kernel.iter().all(|&w| (0.0..=limits.max_kernel.0).contains(&w)));
            assert!((1.0..=limits.max_scale).contains(&args.scale));
            assert!((1.0..=120.0).contains(&args.radius));
            assert!((10..=30).contains(&args.size.0));
            assert!((1..=28).contains(&args.size.1));
            assert!(args.rank <= 30);
        }
    }

    // Tests short coefficient lists bind to a zero-padded 3x3 kernel
    // Verified by always choosing a 5x5 kernel
    #[test]
    fn test_kernel_binding_small() {
        let spec = FilterSpec::from_args(FilterKind::Kernel, &args_with_kernel(4));
        match spec {
            FilterSpec::Kernel { side, weights, .. } => {
                assert_eq!(side, 3);
                assert_eq!(weights, vec![0.0, 1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
            }
            other => panic!("expected a kernel spec, got {other:?}"),
        }
    }

    // Tests long coefficient lists bind to a truncated 5x5 kernel
    // Verified by keeping every coefficient
    #[test]
    fn test_kernel_binding_large() {
        let spec = FilterSpec::from_args(FilterKind::Kernel, &args_with_kernel(100));
        match spec {
            FilterSpec::Kernel { side, weights, .. } => {
                assert_eq!(side, 5);
                assert_eq!(weights.len(), 25);
            }
            other => panic!("expected a kernel spec, got {other:?}"),
        }
    }

    // Tests rank windows are odd and ranks stay inside the window
    // Verified by passing the sampled rank through unclamped
    #[test]
    fn test_rank_binding() {
        let spec = FilterSpec::from_args(FilterKind::RankFilter, &args_with_kernel(0));
        assert_eq!(spec, FilterSpec::Rank { size: 13, rank: 168 });
    }

    // Tests every kind binds to a spec reporting the same kind
    // Verified by binding min filters as max filters
    #[test]
    fn test_spec_kind_round_trip() {
        let args = args_with_kernel(10);
        for kind in FilterKind::ALL {
            let spec = FilterSpec::from_args(kind, &args);
            assert_eq!(spec.kind(), kind);
            assert_eq!(matches!(spec, FilterSpec::Fixed(_)), kind.is_parameterless());
        }
    }
}
