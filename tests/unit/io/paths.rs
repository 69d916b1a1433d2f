//! Tests for output directory resolution and unique naming

#[cfg(test)]
mod tests {
    use poisonpix::PoisonError;
    use poisonpix::canvas::ImageExtension;
    use poisonpix::io::paths::{
        generate_unique_filename, image_directory, random_stem, resolve_output_directory,
    };
    use poisonpix::synthesis::Intensity;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::TempDir;

    // Tests missing intermediate directories are created
    // Verified by using create_dir instead of create_dir_all
    #[test]
    fn test_resolve_creates_directories() {
        let dir = TempDir::new().expect("temp dir");
        let base = dir.path().join("a").join("b");

        let resolved = resolve_output_directory(&base, "Images").expect("resolve");
        assert_eq!(resolved, base.join("Images"));
        assert!(resolved.is_dir());
    }

    // Tests a base already ending in the subfolder is reused
    // Verified by always joining the subfolder
    #[test]
    fn test_resolve_reuses_subfolder() {
        let dir = TempDir::new().expect("temp dir");
        let base = dir.path().join("Images");

        let resolved = resolve_output_directory(&base, "Images").expect("resolve");
        assert_eq!(resolved, base);
    }

    // Tests a file in place of the base directory is an error
    // Verified by removing the is_dir check
    #[test]
    fn test_resolve_rejects_file_base() {
        let dir = TempDir::new().expect("temp dir");
        let file = dir.path().join("occupied");
        std::fs::write(&file, b"x").expect("write file");

        let result = resolve_output_directory(&file, "Images");
        assert!(matches!(result, Err(PoisonError::FileSystem { .. })));
    }

    // Tests the image tree is laid out by tier and size
    // Verified by swapping width and height in the leaf name
    #[test]
    fn test_image_directory_layout() {
        let dir = TempDir::new().expect("temp dir");

        let leaf = image_directory(dir.path(), Intensity::Medium, 640, 480).expect("layout");
        assert_eq!(leaf, dir.path().join("Images").join("medium").join("640_480"));
        assert!(leaf.is_dir());
    }

    // Tests stems are alphanumeric and of the requested length
    // Verified by sampling from the full ASCII range
    #[test]
    fn test_random_stem() {
        let mut rng = StdRng::seed_from_u64(3);
        let stem = random_stem(32, &mut rng);

        assert_eq!(stem.len(), 32);
        assert!(stem.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    // Tests generated names do not collide with existing files
    // Verified by returning the first candidate unconditionally
    #[test]
    fn test_unique_filename_avoids_existing() {
        let dir = TempDir::new().expect("temp dir");
        let mut rng = StdRng::seed_from_u64(5);

        // Single-character stems force collisions quickly
        let mut seen = Vec::new();
        for _ in 0..20 {
            let path = generate_unique_filename(dir.path(), ImageExtension::Png, 1, &mut rng)
                .expect("unique name");
            assert!(!path.exists());
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
            std::fs::write(&path, b"").expect("claim name");
            seen.push(path);
        }

        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 20);
    }

    // Tests an empty stem length is refused
    // Verified by looping forever on empty stems
    #[test]
    fn test_unique_filename_zero_length() {
        let dir = TempDir::new().expect("temp dir");
        let mut rng = StdRng::seed_from_u64(9);

        let result = generate_unique_filename(dir.path(), ImageExtension::Jpg, 0, &mut rng);
        assert!(matches!(
            result,
            Err(PoisonError::InvalidConfiguration {
                parameter: "name_length",
                ..
            })
        ));
    }

    // Tests an exhausted name space gives up with a file system error
    // Verified by looping until a free name appears
    #[test]
    fn test_unique_filename_exhausted() {
        let dir = TempDir::new().expect("temp dir");
        let stems = ('a'..='z').chain('A'..='Z').chain('0'..='9');
        for stem in stems {
            std::fs::write(dir.path().join(format!("{stem}.png")), b"").expect("claim name");
        }
        let mut rng = StdRng::seed_from_u64(10);

        let result = generate_unique_filename(dir.path(), ImageExtension::Png, 1, &mut rng);
        assert!(matches!(
            result,
            Err(PoisonError::FileSystem { ref path, .. }) if path == dir.path()
        ));

        // Another extension is still free
        assert!(generate_unique_filename(dir.path(), ImageExtension::Jpg, 1, &mut rng).is_ok());
    }
}
