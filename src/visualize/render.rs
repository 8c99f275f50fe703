use std::path::Path;

use anyhow::Context;
use plotters::coord::Shift;
use plotters::prelude::*;
use svg2pdf::usvg;

use crate::config::ChartFormat;
use crate::model::ChainSlice;

use super::font;
use super::layout::{ChartLayout, percent_tick_label};

/// Canvas size in pixels. Marker areas are taken as px^2.
const CANVAS: (u32, u32) = (2000, 1000);
const FONT: &str = "sans-serif";

pub fn render(
    path: &Path,
    format: ChartFormat,
    title: &str,
    slice: &ChainSlice,
    layout: &ChartLayout,
) -> anyhow::Result<()> {
    font::ensure_registered()?;
    match format {
        ChartFormat::Pdf => {
            let mut svg = String::new();
            draw(SVGBackend::with_string(&mut svg, CANVAS).into_drawing_area(), title, slice, layout)?;
            std::fs::write(path, svg_to_pdf(&svg)?)?;
            Ok(())
        }
        ChartFormat::Svg => draw(SVGBackend::new(path, CANVAS).into_drawing_area(), title, slice, layout),
        ChartFormat::Png => draw(BitMapBackend::new(path, CANVAS).into_drawing_area(), title, slice, layout),
    }
}

/// Convert a rendered SVG chart into a single-page PDF.
pub fn svg_to_pdf(svg: &str) -> anyhow::Result<Vec<u8>> {
    let mut options = usvg::Options::default();
    options.font_family = font::SANS_SERIF_FAMILY.to_string();
    let fontdb = options.fontdb_mut();
    fontdb.load_font_data(font::SANS_SERIF.to_vec());
    fontdb.set_sans_serif_family(font::SANS_SERIF_FAMILY);

    let tree = usvg::Tree::from_str(svg, &options).context("parsing rendered SVG")?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|e| anyhow::anyhow!("converting chart to PDF: {e:?}"))
}

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    title: &str,
    slice: &ChainSlice,
    layout: &ChartLayout,
) -> anyhow::Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    // Bubble chart on the left three quarters, volume legend on the right.
    let (main, side) = root.split_horizontally(CANVAS.0 * 3 / 4);

    draw_bubbles(&main, title, slice, layout)?;
    draw_volume_legend(&side, layout)?;

    root.present()?;
    Ok(())
}

fn draw_bubbles<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    slice: &ChainSlice,
    layout: &ChartLayout,
) -> anyhow::Result<()>
where
    DB::ErrorType: 'static,
{
    let (x0, x1) = layout.strike_range;
    let (y0, y1) = layout.premium_range;
    let price = layout.current_price;

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 32))
        .margin(20)
        .x_label_area_size(60)
        .top_x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x0..x1, y0..y1)?
        .set_secondary_coord(x0..x1, y0..y1);

    chart
        .configure_mesh()
        .x_desc("Strike")
        .y_desc("Premium")
        .draw()?;

    // Same range as the strike axis, so ticks line up; only the labels differ.
    let pct_label = |x: &f64| percent_tick_label(*x, price);
    chart
        .configure_secondary_axes()
        .x_desc("Percentage Change (%)")
        .x_label_formatter(&pct_label)
        .draw()?;

    chart
        .draw_series(
            slice
                .calls
                .iter()
                .map(|q| TriangleMarker::new((q.strike(), q.last()), 8, GREEN.filled())),
        )?
        .label("calls")
        .legend(|(x, y)| TriangleMarker::new((x, y), 8, GREEN.filled()));

    chart
        .draw_series(slice.puts.iter().map(|q| {
            EmptyElement::at((q.strike(), q.last()))
                + Polygon::new(vec![(-8, -6), (8, -6), (0, 8)], RED.filled())
        }))?
        .label("puts")
        .legend(|(x, y)| {
            EmptyElement::at((x, y)) + Polygon::new(vec![(-8, -6), (8, -6), (0, 8)], RED.filled())
        });

    let bubble = |volume: u64| layout.volume.marker_radius(volume as f64).round() as i32;

    chart
        .draw_series(
            slice
                .calls
                .iter()
                .map(|q| Circle::new((q.strike(), q.last()), bubble(q.volume()), GREEN.stroke_width(2))),
        )?
        .label("Call Volume")
        .legend(|(x, y)| Circle::new((x, y), 8, GREEN.stroke_width(2)));

    chart
        .draw_series(
            slice
                .puts
                .iter()
                .map(|q| Circle::new((q.strike(), q.last()), bubble(q.volume()), RED.stroke_width(2))),
        )?
        .label("Put Volume")
        .legend(|(x, y)| Circle::new((x, y), 8, RED.stroke_width(2)));

    chart
        .draw_series(LineSeries::new([(price, y0), (price, y1)], BLACK.stroke_width(2)))?
        .label("Stock Price")
        .legend(|(x, y)| PathElement::new(vec![(x - 10, y), (x + 10, y)], BLACK.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, 20))
        .draw()?;

    Ok(())
}

fn draw_volume_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    layout: &ChartLayout,
) -> anyhow::Result<()>
where
    DB::ErrorType: 'static,
{
    let (v0, v1) = layout.legend_range;

    let mut chart = ChartBuilder::on(area)
        .caption("Volume Size", (FONT, 28))
        .margin(20)
        .x_label_area_size(60)
        .top_x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..2.0, v0..v1)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(0)
        .y_desc("Volume")
        .draw()?;

    chart.draw_series(layout.legend_samples.iter().map(|&v| {
        Circle::new(
            (1.0, v),
            layout.volume.marker_radius(v).round() as i32,
            BLACK.stroke_width(2),
        )
    }))?;

    Ok(())
}
