/// Pieces of a standalone visualization page.
pub struct PageParts<'a> {
    pub title: &'a str,
    pub css: &'a str,
    pub js: &'a str,
    pub width: i32,
    pub height: i32,
    /// Where `js/viz.js` and `css/viz.css` are served from.
    pub asset_base: &'a str,
    pub vis_id: &'a str,
    pub controls_id: &'a str,
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Keep embedded text from closing the surrounding element early.
fn guard_close_tag(s: &str) -> String {
    s.replace("</", "<\\/")
}

/// A complete HTML document hosting one visualization and its controls.
pub fn write_page(p: &PageParts<'_>) -> String {
    let base = escape_html(p.asset_base.trim_end_matches('/'));
    let title = escape_html(p.title);
    let vis_id = escape_html(p.vis_id);
    let controls_id = escape_html(p.controls_id);
    let css = guard_close_tag(p.css);
    let js = guard_close_tag(p.js);
    let (width, height) = (p.width, p.height);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" type="text/css" href="{base}/css/viz.css">
<style>
{css}
</style>
<script src="https://d3js.org/d3.v4.min.js" charset="utf-8"></script>
<script src="{base}/js/viz.js"></script>
</head>
<body style="margin:0">
<svg id="{vis_id}" width="{width}" height="{height}"></svg>
<div id="{controls_id}" class="viz-controls"></div>
<script>
{js}
</script>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts<'a>(js: &'a str, base: &'a str) -> PageParts<'a> {
        PageParts {
            title: "Cars <2024>",
            css: "",
            js,
            width: 800,
            height: 600,
            asset_base: base,
            vis_id: "visualization",
            controls_id: "controls",
        }
    }

    #[test]
    fn page_links_assets_and_sizes_svg() {
        let html = write_page(&parts("render();", "../../vizsupport/"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<script src="../../vizsupport/js/viz.js"></script>"#));
        assert!(html.contains(r#"href="../../vizsupport/css/viz.css""#));
        assert!(html.contains(r#"<svg id="visualization" width="800" height="600">"#));
        assert!(html.contains("<title>Cars &lt;2024&gt;</title>"));
        assert!(html.contains("render();"));
    }

    #[test]
    fn script_cannot_close_its_tag() {
        let html = write_page(&parts("var s = \"</script><b>\";", "/assets"));
        assert!(html.contains("var s = \"<\\/script><b>\";"));
        assert_eq!(html.matches("</script>").count(), 3);
    }
}
