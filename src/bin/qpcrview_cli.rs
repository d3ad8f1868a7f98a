use anyhow::{Result, anyhow};
use qpcrview::controller::PlateController;
use qpcrview::palette::LineGrouping;
use qpcrview::render_export::{export_chart_svg, export_grid_svg};
use qpcrview::viewer_config::ViewerConfig;
use std::{env, fs};

fn usage() -> ! {
    eprintln!(
        "Usage: qpcrview_cli <dataset> [--stats] [--chart FILE.svg] [--grid FILE.svg]\n\
         \x20                [--threshold N] [--grouping row|col|cell] [--palette NAME]"
    );
    std::process::exit(1);
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut source: Option<String> = None;
    let mut stats = false;
    let mut chart_out: Option<String> = None;
    let mut grid_out: Option<String> = None;
    let mut threshold: Option<f64> = None;
    let mut grouping: Option<String> = None;
    let mut palette: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--stats" => stats = true,
            "--chart" => {
                chart_out = args.get(i + 1).cloned();
                i += 1;
            }
            "--grid" => {
                grid_out = args.get(i + 1).cloned();
                i += 1;
            }
            "--threshold" => {
                threshold = args.get(i + 1).and_then(|v| v.parse::<f64>().ok());
                if threshold.is_none() {
                    usage();
                }
                i += 1;
            }
            "--grouping" => {
                grouping = args.get(i + 1).cloned();
                i += 1;
            }
            "--palette" => {
                palette = args.get(i + 1).cloned();
                i += 1;
            }
            arg if !arg.starts_with('-') && source.is_none() => source = Some(arg.to_string()),
            _ => usage(),
        }
        i += 1;
    }
    let Some(source) = source else { usage() };

    let mut config = ViewerConfig::new(source);
    config.threshold = threshold;
    if let Some(text) = grouping {
        let chart = config.chart.as_mut().expect("chart options are on by default");
        chart.grouping =
            LineGrouping::parse(&text).ok_or_else(|| anyhow!("unknown grouping {text:?}"))?;
    }
    if let Some(name) = palette {
        config.chart.as_mut().expect("chart options are on by default").palette = name;
    }

    let mut controller = PlateController::from_config(&config)?;
    controller.load(&config.data_source)?;
    let plate = controller
        .plate()
        .ok_or_else(|| anyhow!("dataset did not reach the ready state"))?;

    if stats {
        println!("{}", serde_json::to_string_pretty(&plate.summary())?);
    }
    if let Some(path) = chart_out {
        let chart_options = config.chart.as_ref().expect("chart options are on by default");
        let svg = export_chart_svg(plate, chart_options, config.threshold, config.threshold_color);
        fs::write(&path, svg)?;
        log::info!("wrote chart SVG to {path}");
    }
    if let Some(path) = grid_out {
        let grid_options = config.grid.as_ref().expect("grid options are on by default");
        let svg = export_grid_svg(plate, grid_options);
        fs::write(&path, svg)?;
        log::info!("wrote grid SVG to {path}");
    }

    Ok(())
}
