//! Gallery of vizprint output kinds.
//!
//! Run under the viewer with: VIZTERM=1 cargo run -p gallery-demo
//!
//! Or send to a viewer listening on a port:
//! cargo run -p gallery-demo -- --port 9999 [--jpeg photo.jpg]

use std::{io, path::PathBuf, thread, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vizprint::{Content, Figure, HtmlRepr, Printer, RasterImage, vprint};

/// A JPEG file loaded from disk, passed through as-is.
struct Photo {
    bytes: Vec<u8>,
}

impl RasterImage for Photo {
    fn write_jpeg(&self, buf: &mut Vec<u8>) -> io::Result<()> {
        buf.extend_from_slice(&self.bytes);
        Ok(())
    }
}

/// Bar chart rendered as a grayscale PNG.
struct BarChart {
    values: Vec<u8>,
}

const BAR_WIDTH: usize = 6;
const CHART_HEIGHT: usize = 64;

impl BarChart {
    fn pixels(&self) -> Vec<u8> {
        let width = self.values.len() * BAR_WIDTH;
        let mut pixels = Vec::with_capacity(width * CHART_HEIGHT);
        for row in 0..CHART_HEIGHT {
            for column in 0..width {
                let level = usize::from(self.values[column / BAR_WIDTH]) * CHART_HEIGHT / 256;
                let filled = CHART_HEIGHT - row <= level && column % BAR_WIDTH != 0;
                pixels.push(if filled { 0x30 } else { 0xff });
            }
        }
        pixels
    }
}

impl Figure for BarChart {
    fn write_png(&self, buf: &mut Vec<u8>) -> io::Result<()> {
        let (Ok(width), Ok(height)) = (
            u32::try_from(self.values.len() * BAR_WIDTH),
            u32::try_from(CHART_HEIGHT),
        ) else {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "chart too large"));
        };
        let mut encoder = png::Encoder::new(buf, width, height);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(io::Error::other)?;
        writer.write_image_data(&self.pixels()).map_err(io::Error::other)?;
        writer.finish().map_err(io::Error::other)
    }
}

/// Status badge with its own HTML.
struct Badge<'a> {
    label: &'a str,
    ok: bool,
}

impl HtmlRepr for Badge<'_> {
    fn to_html(&self) -> String {
        let color = if self.ok { "#2a2" } else { "#c22" };
        format!(
            "<span style=\"background:{color};color:#fff;padding:0 4px\">{}</span>",
            self.label
        )
    }
}

#[derive(Serialize)]
struct RunSummary {
    name: &'static str,
    steps: u32,
    losses: Vec<f64>,
}

/// Show every vizprint output kind.
#[derive(Debug, Parser)]
#[command(name = "gallery", about = "Show every vizprint output kind")]
struct Args {
    /// Send output to a viewer listening on this port
    #[arg(long)]
    port: Option<u16>,

    /// JPEG file to show as an image
    #[arg(long)]
    jpeg: Option<PathBuf>,
}

/// Cheap deterministic noise for the animated chart.
fn noise(seed: u32, len: usize) -> Vec<u8> {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state.to_le_bytes()[0]
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout may be the wire.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let mut printer = Printer::from_env();
    if let Some(port) = args.port {
        printer.activate(port)?;
    }
    tracing::info!(redirecting = printer.is_redirecting(), "gallery started");

    if let Some(path) = &args.jpeg {
        let photo = Photo {
            bytes: std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        };
        vprint!(printer, "an image:", Content::image(&photo))?;
    }

    let chart = BarChart {
        values: vec![40, 90, 160, 220, 130, 70],
    };
    vprint!(printer, "a figure:", Content::figure(&chart))?;
    vprint!(printer, "build:", Content::html(&Badge { label: "passing", ok: true }))?;

    let summary = RunSummary {
        name: "warmup",
        steps: 12,
        losses: vec![2.31, 1.87, 1.52, 1.21, 0.98, 0.84, 0.77, 0.71, 0.69, 0.66, 0.65, 0.64],
    };
    vprint!(printer, "summary:", Content::json(&summary)?; width = 40)?;
    vprint!(printer, "squares:", Content::seq((1..=12).map(|n| n * n))?; compact = true, width = 30)?;
    printer.tick()?;

    vprint!(printer)?;
    vprint!(printer, "you can repeatedly update an output by giving it an id:")?;
    for frame in 0..12 {
        let chart = BarChart {
            values: noise(frame, 10),
        };
        vprint!(printer, Content::figure(&chart); id = "etc")?;
        thread::sleep(Duration::from_millis(500));
    }

    Ok(())
}
