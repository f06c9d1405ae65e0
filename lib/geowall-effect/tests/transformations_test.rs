// cargo test -p geowall-effect --test transformations_test

use geowall_effect::{ImageEffectError, Registry, TransformSettings, Transformation};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

fn settings() -> TransformSettings {
    let mut settings = TransformSettings::default();
    settings.seed = Some(2024);
    settings.watercolor.command = "geowall-missing-watercolor".to_string();
    settings
}

fn solid(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([40, 120, 200])))
}

#[test]
fn test_every_transformation_final_size() -> anyhow::Result<()> {
    let registry = Registry::new(&settings())?;

    for name in registry.names() {
        let out = registry.process(name, solid(100, 100))?;
        assert_eq!((out.width(), out.height()), (1280, 800), "{name}");
    }

    Ok(())
}

#[test]
fn test_default_on_full_size_input() -> anyhow::Result<()> {
    let registry = Registry::new(&settings())?;
    let out = registry.process("default", solid(1280, 850))?;
    assert_eq!((out.width(), out.height()), (1280, 800));
    Ok(())
}

#[test]
fn test_custom_geometry() -> anyhow::Result<()> {
    let mut settings = settings();
    settings.width = 320;
    settings.height = 240;
    settings.crop_bottom = 40;
    settings.blob.min_radius = 5;
    settings.blob.max_radius = 20;

    let registry = Registry::new(&settings)?;
    for name in registry.names() {
        let out = registry.process(name, solid(64, 64))?;
        assert_eq!((out.width(), out.height()), (320, 200), "{name}");
    }

    Ok(())
}

#[test]
fn test_crop_larger_than_resize_fails() -> anyhow::Result<()> {
    let mut settings = settings();
    settings.height = 50;
    settings.crop_bottom = 50;

    let registry = Registry::new(&settings)?;
    let err = registry.process("glitch", solid(10, 10)).unwrap_err();
    assert!(matches!(err, ImageEffectError::InvalidDimension(_)));
    Ok(())
}

#[test]
fn test_unknown_name_not_found() -> anyhow::Result<()> {
    let registry = Registry::new(&settings())?;
    let err = registry.process("hellzone", solid(10, 10)).unwrap_err();
    assert!(matches!(err, ImageEffectError::NotFound(name) if name == "hellzone"));
    Ok(())
}

#[test]
fn test_default_without_noise_is_gray() -> anyhow::Result<()> {
    let mut settings = settings();
    settings.noise.default_stddev = 0.0;

    let registry = Registry::new(&settings)?;
    let out = registry.process("default", solid(200, 200))?.to_rgb8();

    // Monochrome runs before the blob mask, so both layers are already gray.
    assert!(out.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
    Ok(())
}

#[test]
fn test_seeded_runs_match() -> anyhow::Result<()> {
    let registry = Registry::new(&settings())?;
    let first = registry.process("simple_noise", solid(50, 50))?;
    let second = registry.process("simple_noise", solid(50, 50))?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_rgba_input_keeps_alpha() -> anyhow::Result<()> {
    let registry = Registry::new(&settings())?;
    let input = DynamicImage::ImageRgba8(RgbaImage::from_pixel(30, 30, Rgba([200, 10, 10, 90])));
    let out = registry.process("red_overlay", input)?;

    let DynamicImage::ImageRgba8(out) = out else {
        panic!("expected RGBA output");
    };
    assert!(out.pixels().all(|p| (89..=91).contains(&p[3])));
    Ok(())
}

#[test]
fn test_parallel_invocations_share_registry() -> anyhow::Result<()> {
    let registry = Registry::new(&settings())?;

    std::thread::scope(|s| {
        let handles: Vec<_> = Transformation::all()
            .iter()
            .map(|t| {
                let registry = &registry;
                s.spawn(move || registry.process(t.name(), solid(80, 60)))
            })
            .collect();

        for handle in handles {
            let out = handle.join().expect("worker panicked")?;
            assert_eq!((out.width(), out.height()), (1280, 800));
        }

        Ok(())
    })
}
