use crate::compositor::types::Resolved;
use tracing::warn;

const WHITE: [u8; 3] = [255, 255, 255];

/// Parses a color name or an `R,G,B` triple. Anything unrecognized resolves
/// to white with a logged warning, never an error.
pub fn parse_color(input: &str) -> Resolved<[u8; 3]> {
    let normalized = input.trim().to_lowercase();
    if let Some(rgb) = named_color(&normalized) {
        return Resolved::exact(rgb);
    }
    if let Some(rgb) = rgb_triple(&normalized) {
        return Resolved::exact(rgb);
    }
    warn!("Unrecognized color '{}', using white", input);
    Resolved::defaulted(WHITE, input, "not a known color name or R,G,B triple")
}

fn named_color(name: &str) -> Option<[u8; 3]> {
    match name {
        "white" => Some([255, 255, 255]),
        "black" => Some([0, 0, 0]),
        "red" => Some([255, 0, 0]),
        "green" => Some([0, 255, 0]),
        "blue" => Some([0, 0, 255]),
        "yellow" => Some([255, 255, 0]),
        "cyan" => Some([0, 255, 255]),
        "magenta" => Some([255, 0, 255]),
        "gray" | "grey" => Some([128, 128, 128]),
        _ => None,
    }
}

fn rgb_triple(s: &str) -> Option<[u8; 3]> {
    let mut parts = s.split(',');
    let r = parts.next()?.trim().parse::<u8>().ok()?;
    let g = parts.next()?.trim().parse::<u8>().ok()?;
    let b = parts.next()?.trim().parse::<u8>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some([r, g, b])
}
