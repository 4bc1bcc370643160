//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use allocpad_protocol::{Rect, RenderCommand, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions. A `Clear` that
/// covers the whole viewBox discards everything drawn before it; smaller
/// clears paint the background over their rectangle.
/// `dark` selects the background; stroke colors are fixed.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let bg = if dark { "#1a1a2e" } else { "#ffffff" };
    let mut body: Vec<String> = Vec::with_capacity(commands.len());

    for cmd in commands {
        match cmd {
            RenderCommand::Clear { rect } => {
                if covers(rect, width, height) {
                    body.clear();
                } else {
                    body.push(format!(
                        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{bg}"/>"#,
                        rect.x, rect.y, rect.w, rect.h,
                    ));
                }
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color);
                body.push(format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                ));
            }
        }
    }

    let mut svg = String::with_capacity(body.len() * 96 + 256);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}">"#,
    ));
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}" fill="{bg}"/>"#,
    ));
    for element in &body {
        svg.push_str(element);
    }
    svg.push_str("</svg>");
    svg
}

fn covers(rect: &Rect, width: f64, height: f64) -> bool {
    rect.x <= 0.0 && rect.y <= 0.0 && rect.x + rect.w >= width && rect.y + rect.h >= height
}

fn resolve_color(token: ThemeToken) -> String {
    token.color().to_hex()
}
