use std::sync::OnceLock;

use plotters::style::{FontStyle, register_font};

/// Bundled so charts render the same with or without system fonts.
pub const SANS_SERIF: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Family name of [`SANS_SERIF`], as looked up in the PDF font database.
pub const SANS_SERIF_FAMILY: &str = "DejaVu Sans";

static REGISTERED: OnceLock<bool> = OnceLock::new();

/// Register the bundled font as plotters' `sans-serif` family. Idempotent.
pub fn ensure_registered() -> anyhow::Result<()> {
    let ok = *REGISTERED.get_or_init(|| register_font("sans-serif", FontStyle::Normal, SANS_SERIF).is_ok());
    if !ok {
        anyhow::bail!("bundled chart font could not be parsed");
    }
    Ok(())
}
