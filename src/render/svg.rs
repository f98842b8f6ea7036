//! SVG serialization and chart file output

use fs2::FileExt;
use regex::Regex;
use std::fmt::Write as _;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use super::canvas::{Canvas, Element};
use super::format::escape_xml;
use super::tooltip::{TooltipContent, TOOLTIP_OFFSET};
use crate::types::{Result, SalesvizError};

pub const TOOLTIP_ID: &str = "salesviz-tooltip";

const STYLE: &str = ".tooltip{background:#fff;border:1px solid #999;border-radius:4px;\
padding:6px 8px;font:12px sans-serif;color:#222;box-shadow:0 1px 3px rgba(0,0,0,.2);\
display:inline-block;white-space:nowrap}";

/// CSS-safe class name derived from arbitrary text
pub fn safe_class(text: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let re = UNSAFE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("valid regex"));
    format!("item-{}", re.replace_all(text, "-"))
}

/// Coordinates with at most two decimals
fn num(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".into()
    } else {
        s.to_string()
    }
}

fn hover_attrs(out: &mut String, tooltip: Option<&TooltipContent>) {
    if let Some(t) = tooltip {
        let _ = write!(out, " data-tooltip=\"{}\"", escape_xml(&t.to_html()));
    }
}

fn close_with_title(out: &mut String, tag: &str, tooltip: Option<&TooltipContent>) {
    match tooltip {
        Some(t) => {
            let _ = writeln!(out, "><title>{}</title></{}>", escape_xml(&t.to_plain()), tag);
        }
        None => out.push_str("/>\n"),
    }
}

fn write_element(out: &mut String, element: &Element) {
    match element {
        Element::Rect(r) => {
            let _ = write!(
                out,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"",
                num(r.x),
                num(r.y),
                num(r.width),
                num(r.height),
                escape_xml(&r.fill)
            );
            if r.opacity < 1.0 {
                let _ = write!(out, " opacity=\"{}\"", num(r.opacity));
            }
            if let Some(stroke) = &r.stroke {
                let _ = write!(out, " stroke=\"{}\" stroke-width=\"0.5\"", escape_xml(stroke));
            }
            if let Some(class) = &r.class {
                let _ = write!(out, " class=\"{}\"", escape_xml(class));
            }
            hover_attrs(out, r.tooltip.as_ref());
            close_with_title(out, "rect", r.tooltip.as_ref());
        }
        Element::Circle(c) => {
            let _ = write!(
                out,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"",
                num(c.cx),
                num(c.cy),
                num(c.r),
                escape_xml(&c.fill)
            );
            if let Some(class) = &c.class {
                let _ = write!(out, " class=\"{}\"", escape_xml(class));
            }
            hover_attrs(out, c.tooltip.as_ref());
            close_with_title(out, "circle", c.tooltip.as_ref());
        }
        Element::Line(l) => {
            let _ = writeln!(
                out,
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                num(l.x1),
                num(l.y1),
                num(l.x2),
                num(l.y2),
                escape_xml(&l.stroke),
                num(l.width)
            );
        }
        Element::Path(p) => {
            if p.points.is_empty() {
                return;
            }
            let d: Vec<String> = p
                .points
                .iter()
                .enumerate()
                .map(|(i, (x, y))| format!("{}{},{}", if i == 0 { "M" } else { "L" }, num(*x), num(*y)))
                .collect();
            let _ = write!(
                out,
                "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"",
                d.join(""),
                escape_xml(&p.stroke),
                num(p.width)
            );
            if let Some(class) = &p.class {
                let _ = write!(out, " class=\"{}\"", escape_xml(class));
            }
            out.push_str("/>\n");
        }
        Element::Text(t) => {
            let _ = write!(
                out,
                "<text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"{}\"",
                num(t.x),
                num(t.y),
                num(t.size),
                escape_xml(&t.fill),
                t.anchor.as_svg()
            );
            if t.bold {
                out.push_str(" font-weight=\"bold\"");
            }
            if let Some(deg) = t.rotate {
                let _ = write!(
                    out,
                    " transform=\"rotate({} {} {})\"",
                    num(deg),
                    num(t.x),
                    num(t.y)
                );
            }
            let _ = writeln!(out, ">{}</text>", escape_xml(&t.content));
        }
    }
}

fn tooltip_script() -> String {
    format!(
        r#"<script><![CDATA[
(function () {{
  var tip = document.getElementById('{id}');
  if (!tip) return;
  var root = tip.ownerSVGElement || document.documentElement;
  var box = tip.firstElementChild;
  function toLocal(evt) {{
    var p = root.createSVGPoint();
    p.x = evt.clientX;
    p.y = evt.clientY;
    return p.matrixTransform(root.getScreenCTM().inverse());
  }}
  root.querySelectorAll('[data-tooltip]').forEach(function (el) {{
    el.addEventListener('mousemove', function (evt) {{
      var p = toLocal(evt);
      box.innerHTML = el.getAttribute('data-tooltip');
      tip.setAttribute('x', p.x + ({dx}));
      tip.setAttribute('y', p.y + ({dy}));
      tip.style.visibility = 'visible';
    }});
    el.addEventListener('mouseleave', function () {{
      tip.style.visibility = 'hidden';
      box.innerHTML = '';
    }});
  }});
}})();
]]></script>
"#,
        id = TOOLTIP_ID,
        dx = num(TOOLTIP_OFFSET.0),
        dy = num(TOOLTIP_OFFSET.1),
    )
}

/// Serialize a canvas as a standalone SVG document with one shared tooltip
/// overlay
pub fn to_svg(canvas: &Canvas) -> String {
    let mut out = String::with_capacity(4096 + canvas.elements().len() * 160);
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {w} {h}\" width=\"{w}\" height=\"{h}\" font-family=\"sans-serif\">",
        w = canvas.width,
        h = canvas.height
    );
    if let Some(title) = canvas.title() {
        let _ = writeln!(out, "<title>{}</title>", escape_xml(title));
    }
    let _ = writeln!(out, "<style>{}</style>", STYLE);
    let _ = writeln!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"white\"/>",
        canvas.width, canvas.height
    );

    for element in canvas.elements() {
        write_element(&mut out, element);
    }

    let _ = writeln!(
        out,
        "<foreignObject id=\"{}\" x=\"0\" y=\"0\" width=\"320\" height=\"160\" style=\"visibility:hidden;pointer-events:none;overflow:visible\"><div xmlns=\"http://www.w3.org/1999/xhtml\" class=\"tooltip\"></div></foreignObject>",
        TOOLTIP_ID
    );
    out.push_str(&tooltip_script());
    out.push_str("</svg>\n");
    out
}

/// Replace the file at `path` with the canvas's SVG. The target is held
/// under an exclusive lock while the new content is moved into place.
pub fn write_svg(path: &Path, canvas: &Canvas) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let content = to_svg(canvas);
    let temp_path = path.with_extension("svg.tmp");
    {
        let mut file = File::create(&temp_path)
            .map_err(|e| SalesvizError::Render(format!("Failed to create temp file: {}", e)))?;
        file.write_all(content.as_bytes())
            .map_err(|e| SalesvizError::Render(format!("Failed to write temp file: {}", e)))?;
        file.sync_all()
            .map_err(|e| SalesvizError::Render(format!("Failed to sync temp file: {}", e)))?;
    }

    let target = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    target
        .lock_exclusive()
        .map_err(|e| SalesvizError::Render(format!("Failed to acquire write lock: {}", e)))?;

    fs::rename(&temp_path, path)
        .map_err(|e| SalesvizError::Render(format!("Failed to rename temp file: {}", e)))?;

    let _ = target.unlock();
    debug!(path = %path.display(), bytes = content.len(), "chart written");
    Ok(())
}
