use eframe::{NativeOptions, egui};
use qpcrview::{app::QpcrApp, viewer_config::ViewerConfig};
use std::env;

const DEFAULT_DATASET: &str = "assets/sample_plate.json";

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("qpcrview {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut source: Option<String> = None;
    let mut threshold: Option<f64> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--threshold" => {
                threshold = args.get(i + 1).and_then(|v| v.parse::<f64>().ok());
                if threshold.is_none() {
                    eprintln!("--threshold needs a numeric value");
                    std::process::exit(1);
                }
                i += 1;
            }
            arg if !arg.starts_with('-') && source.is_none() => source = Some(arg.to_string()),
            _ => {}
        }
        i += 1;
    }

    let mut config = ViewerConfig::new(source.unwrap_or_else(|| DEFAULT_DATASET.to_string()));
    config.info = true;
    config.threshold = threshold;

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 880.0])
            .with_min_inner_size([400.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "qPCRview",
        options,
        Box::new(move |_cc| Ok(Box::new(QpcrApp::new(config)?))),
    )
}
