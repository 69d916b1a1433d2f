//! Tests for batch progress tracking

#[cfg(test)]
mod tests {
    use poisonpix::io::progress::ProgressManager;
    use poisonpix::synthesis::Intensity;
    use std::path::Path;

    // Tests completions are counted per batch
    // Verified by not resetting the count on initialize
    #[test]
    fn test_completion_counting() {
        let mut manager = ProgressManager::new();
        manager.initialize(3, Intensity::Medium);

        manager.complete_image(Path::new("out/a.jpg"));
        manager.complete_image(Path::new("out/b.jpg"));
        assert_eq!(manager.completed(), 2);

        manager.finish();
        manager.initialize(1, Intensity::Light);
        assert_eq!(manager.completed(), 0);
    }

    // Tests an uninitialized manager tolerates updates
    // Verified by requiring initialize before completing
    #[test]
    fn test_hidden_manager_accepts_updates() {
        let mut manager = ProgressManager::default();
        manager.complete_image(Path::new("x.png"));
        manager.finish();
        assert_eq!(manager.completed(), 1);
    }
}
