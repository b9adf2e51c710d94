/// Color utilities
///
/// This module converts between the representations a nail color passes
/// through:
/// - the free-text field (hex, `rgb()`/`rgba()` or a CSS color name)
/// - RGBA8 pixels used by the compositor
/// - `iced::Color` used by the picker and the overlay strokes

use image::Rgba;

/// Color the editor starts with
pub const DEFAULT_COLOR: &str = "#FF0066";

/// Swatches offered next to the picker
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#FF0066", "#FF6699", "#FFCC00", "#66FF66", "#00CCFF", "#CC00FF",
];

/// Fill used when a color string does not parse, matching a 2D context
/// whose fill style assignment was ignored
pub const FALLBACK_FILL: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Parse a CSS-style color string.
///
/// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
/// `rgba(r, g, b, a)`, `transparent` and the CSS named colors, all
/// case-insensitive. Returns `None` for anything else.
pub fn parse_color(input: &str) -> Option<Rgba<u8>> {
    let text = input.trim().to_ascii_lowercase();

    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = text.strip_prefix("rgba(").and_then(|rest| rest.strip_suffix(')')) {
        return parse_rgb_args(args, true);
    }
    if let Some(args) = text.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')')) {
        return parse_rgb_args(args, false);
    }
    if text == "transparent" {
        return Some(Rgba([0, 0, 0, 0]));
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == text)
        .map(|&(_, [r, g, b])| Rgba([r, g, b, 255]))
}

/// Parse a color, falling back to [`FALLBACK_FILL`]
pub fn fill_color(input: &str) -> Rgba<u8> {
    parse_color(input).unwrap_or_else(|| {
        log::debug!("Unrecognised color {:?}, painting with the default fill", input);
        FALLBACK_FILL
    })
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
        4 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?])),
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

fn parse_rgb_args(args: &str, with_alpha: bool) -> Option<Rgba<u8>> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let channel = |part: &str| -> Option<u8> {
        let value: f32 = part.parse().ok()?;
        Some(value.round().clamp(0.0, 255.0) as u8)
    };

    let alpha = if with_alpha {
        let value: f32 = parts[3].parse().ok()?;
        (value.clamp(0.0, 1.0) * 255.0).round() as u8
    } else {
        255
    };

    Some(Rgba([channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, alpha]))
}

/// Format a picker color as `#RRGGBB`
pub fn to_hex(color: iced::Color) -> String {
    let [r, g, b, _] = color.into_rgba8();
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Convert a parsed color into an iced color (for swatches and the picker)
pub fn to_iced(color: Rgba<u8>) -> iced::Color {
    let [r, g, b, a] = color.0;
    iced::Color::from_rgba8(r, g, b, a as f32 / 255.0)
}

/// CSS named colors
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aliceblue", [240, 248, 255]),
    ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]),
    ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]),
    ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]),
    ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]),
    ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]),
    ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]),
    ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]),
    ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]),
    ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]),
    ("darkslategrey", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("greenyellow", [173, 255, 47]),
    ("grey", [128, 128, 128]),
    ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]),
    ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]),
    ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]),
    ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]),
    ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightgrey", [211, 211, 211]),
    ("lightpink", [255, 182, 193]),
    ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]),
    ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]),
    ("lightslategrey", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]),
    ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]),
    ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 219]),
    ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]),
    ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]),
    ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]),
    ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]),
    ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]),
    ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]),
    ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]),
    ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]),
    ("palevioletred", [219, 112, 147]),
    ("papayawhip", [255, 239, 213]),
    ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]),
    ("rebeccapurple", [102, 51, 153]),
    ("red", [255, 0, 0]),
    ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]),
    ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]),
    ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]),
    ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("snow", [255, 250, 250]),
    ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(parse_color("#FF0066"), Some(Rgba([255, 0, 102, 255])));
        assert_eq!(parse_color("#f06"), Some(Rgba([255, 0, 102, 255])));
        assert_eq!(parse_color("#ff006680"), Some(Rgba([255, 0, 102, 128])));
        assert_eq!(parse_color("#f068"), Some(Rgba([255, 0, 102, 136])));
        assert_eq!(parse_color("  #00ccff "), Some(Rgba([0, 204, 255, 255])));
    }

    #[test]
    fn test_named_and_functional_forms() {
        assert_eq!(parse_color("green"), Some(Rgba([0, 128, 0, 255])));
        assert_eq!(parse_color("HotPink"), Some(Rgba([255, 105, 180, 255])));
        assert_eq!(parse_color("rgb(10, 20, 30)"), Some(Rgba([10, 20, 30, 255])));
        assert_eq!(parse_color("rgba(10,20,30,0.5)"), Some(Rgba([10, 20, 30, 128])));
        assert_eq!(parse_color("transparent"), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn test_garbage_is_rejected() {
        for input in ["", "#", "#12", "#12345", "#ggg", "notacolor", "rgb(1,2)", "rgb(a,b,c)"] {
            assert_eq!(parse_color(input), None, "{input:?} should not parse");
        }
        assert_eq!(fill_color("notacolor"), FALLBACK_FILL);
    }

    #[test]
    fn test_palette_parses() {
        for swatch in DEFAULT_PALETTE {
            assert!(parse_color(swatch).is_some());
        }
    }

    #[test]
    fn test_hex_round_trip_through_iced() {
        let parsed = parse_color(DEFAULT_COLOR).unwrap();
        assert_eq!(to_hex(to_iced(parsed)), DEFAULT_COLOR);
    }
}
