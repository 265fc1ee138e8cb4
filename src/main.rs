use rtstruct_overlay::pipeline::load_series;
use rtstruct_overlay::windowing::WindowSetting;

const USAGE: &str = "usage: rtstruct-overlay <ct-dir> <rtstruct.dcm> [center width]";

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let ct_dir = args.next().expect(USAGE);
    let rtstruct_path = args.next().expect(USAGE);
    let window = match (args.next(), args.next()) {
        (Some(center), Some(width)) => WindowSetting::new(
            center.parse().expect("window center must be an integer"),
            width.parse().expect("window width must be an integer"),
        )
        .expect("window setting out of range"),
        _ => WindowSetting::default(),
    };

    let series = load_series(&ct_dir, &rtstruct_path, window)
        .expect("should have loaded the CT series");
    println!(
        "Loaded {} slices, structure color {:?}",
        series.frames.len(),
        series.color
    );

    if let Some(frame) = series.frames.iter().find(|frame| !frame.points.is_empty()) {
        frame
            .save("result.png")
            .expect("should have saved the overlaid slice");
        println!("Saved {} as result.png", frame.source.display());
    }
}
