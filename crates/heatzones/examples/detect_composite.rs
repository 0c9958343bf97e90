use heatzones::{HarvestConfig, HotZoneDetector};
use image::ImageReader;

#[cfg(feature = "tracing")]
use heatzones::core::init_tracing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    init_tracing(false);

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: detect_composite <composite_path> [config.json]");
        return Ok(());
    };

    let config = match std::env::args().nth(2) {
        Some(config_path) => HarvestConfig::from_json_file(config_path)?,
        None => HarvestConfig::default(),
    };
    config.validate()?;

    let composite = ImageReader::open(path)?.decode()?.to_rgb8();
    let detector = HotZoneDetector::new(config.detect.clone());
    let zones = detector.detect(&composite, &config.bounds);

    match zones.len() {
        0 => println!("no hot zones detected"),
        n => {
            println!("detected {n} hot zone(s):");
            for zone in &zones {
                println!(
                    "  {} at ({:.6}, {:.6}), {:.0} m2, confidence {:.2}",
                    zone.band, zone.geo_center.lat, zone.geo_center.lng,
                    zone.geo_area_m2, zone.confidence
                );
            }
        }
    }

    Ok(())
}
