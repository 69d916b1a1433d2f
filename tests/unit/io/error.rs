//! Tests for error types including source chaining and message formatting

#[cfg(test)]
mod tests {
    use poisonpix::PoisonError;
    use poisonpix::io::error::{file_system, invalid_configuration};
    use std::error::Error;
    use std::path::PathBuf;
    use std::time::Duration;

    // Tests error source chaining works correctly
    // Verified by breaking source chain
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = file_system("/tmp/test.png", "read", io_error);

        assert!(error.source().is_some());
        assert!(invalid_configuration("width", &0, &"too small").source().is_none());
    }

    // Tests only filter failures are recoverable
    // Verified by marking image load errors recoverable
    #[test]
    fn test_recoverable_classification() {
        let timeout = PoisonError::RenderTimeout {
            filter: "median_filter",
            deadline: Duration::from_secs(1),
        };
        let failed = PoisonError::FilterFailed {
            filter: "kernel",
            reason: "worker exited".to_string(),
        };
        let shape = PoisonError::UnsupportedShape {
            name: "hexagon".to_string(),
        };
        let io = file_system("out", "write image", std::io::Error::other("disk full"));

        assert!(timeout.is_recoverable());
        assert!(failed.is_recoverable());
        assert!(!shape.is_recoverable());
        assert!(!io.is_recoverable());
    }

    // Tests timeout messages name the filter and deadline
    // Verified by omitting the deadline from the message
    #[test]
    fn test_render_timeout_message() {
        let error = PoisonError::RenderTimeout {
            filter: "rank_filter",
            deadline: Duration::from_millis(250),
        };

        let message = error.to_string();
        assert!(message.contains("rank_filter"));
        assert!(message.contains("250 ms"));
    }

    // Tests invalid configuration error contains all fields
    // Verified by omitting value from message
    #[test]
    fn test_invalid_configuration_error() {
        let error = invalid_configuration("mode", &"extreme", &"expected one of light, medium, heavy");

        let message = error.to_string();
        assert!(message.contains("mode"));
        assert!(message.contains("extreme"));
        assert!(message.contains("heavy"));
    }

    // Tests unsupported catalog entries echo the offending name
    // Verified by dropping the name from the noise message
    #[test]
    fn test_unsupported_messages() {
        let noise = PoisonError::UnsupportedNoise {
            name: "perlin".to_string(),
        };
        let filter = PoisonError::UnsupportedFilter {
            name: "posterize".to_string(),
        };
        assert!(noise.to_string().contains("perlin"));
        assert!(filter.to_string().contains("posterize"));
    }

    // Tests conversions from library errors keep their source
    // Verified by discarding the source in the From impl
    #[test]
    fn test_from_conversions() {
        let io: PoisonError = std::io::Error::other("broken pipe").into();
        assert!(matches!(io, PoisonError::FileSystem { .. }));
        assert!(io.source().is_some());

        let decode = image::ImageError::IoError(std::io::Error::other("truncated"));
        let converted: PoisonError = decode.into();
        match converted {
            PoisonError::ImageExport { path, .. } => assert_eq!(path, PathBuf::from("<memory>")),
            other => panic!("expected an export error, got {other:?}"),
        }
    }
}
