//! ASCII banner with a vertical gradient (ROLLCALL).

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::ExecutableCommand;
use figlet_rs::FIGfont;
use std::io::{stdout, Write};

/// Stage amber (#ffb000).
const STAGE_AMBER: (u8, u8, u8) = (0xff, 0xb0, 0x00);
/// Pit red (#e0225c).
const PIT_RED: (u8, u8, u8) = (0xe0, 0x22, 0x5c);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Prints the welcome banner: "ROLLCALL" in figlet's standard font with an
/// amber-to-red gradient, then the version line.
pub fn print_welcome() {
    let mut out = stdout();
    let font = FIGfont::standard().expect("figlet standard font");
    let figure = font.convert("ROLLCALL").expect("figlet convert ROLLCALL");
    let art = figure.to_string();
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(STAGE_AMBER, PIT_RED, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let version = env!("CARGO_PKG_VERSION");
    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: STAGE_AMBER.0,
        g: STAGE_AMBER.1,
        b: STAGE_AMBER.2,
    }));
    let _ = out.execute(Print(format!("v{} — оркестровая перекличка\r\n", version)));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
