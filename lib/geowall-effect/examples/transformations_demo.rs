/// Renders every built-in transformation of a synthetic gradient
/// Output goes to tmp/transformations/

use geowall_effect::{Registry, TransformSettings};
use image::{DynamicImage, Rgb, RgbImage};
use std::{fs, path::Path, time::Instant};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let output_dir = Path::new("tmp/transformations");
    fs::create_dir_all(output_dir)?;

    let base = RgbImage::from_fn(1600, 1000, |x, y| {
        Rgb([
            (x * 255 / 1600) as u8,
            (y * 255 / 1000) as u8,
            ((x + y) * 255 / 2600) as u8,
        ])
    });
    let base = DynamicImage::ImageRgb8(base);

    let settings = TransformSettings {
        seed: Some(42),
        ..TransformSettings::default()
    };
    let registry = Registry::new(&settings)?;

    println!("{:<15} {:>12} {:>12}  {}", "Transform", "Time (ms)", "Size", "Effects");
    println!("{}", "-".repeat(80));

    for (name, pipeline) in registry.iter() {
        let start = Instant::now();
        let output = registry.process(name, base.clone())?;
        let elapsed = start.elapsed().as_secs_f64() * 1000.0;

        output.save(output_dir.join(format!("{name}.png")))?;

        println!(
            "{:<15} {:>12.1} {:>12}  {}",
            name,
            elapsed,
            format!("{}x{}", output.width(), output.height()),
            pipeline.describe()
        );
    }

    println!("\nCheck {} for the results.", output_dir.display());
    Ok(())
}
