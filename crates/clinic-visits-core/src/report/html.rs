//! HTML fragment rendering for the PDF exporter.

use super::{ReportDocument, ReportSection};

pub(super) fn render(report: &ReportDocument) -> String {
    let mut html = String::new();

    html.push_str("<div class=\"report\">\n");
    html.push_str(&format!("  <h1>{}</h1>\n", escape_html(&report.title)));
    html.push_str("  <table class=\"summary\">\n");
    html.push_str(&format!(
        "    <tr><th>Total Kunjungan</th><td>{}</td></tr>\n",
        report.total_visits
    ));
    html.push_str(&format!(
        "    <tr><th>Total Hari Istirahat</th><td>{}</td></tr>\n",
        report.total_rest_days
    ));
    html.push_str("  </table>\n");

    for section in report.sections() {
        render_section(&mut html, section);
    }

    html.push_str("</div>\n");
    html
}

fn render_section(html: &mut String, section: &ReportSection) {
    html.push_str("  <section>\n");
    html.push_str(&format!("    <h2>{}</h2>\n", escape_html(&section.heading)));
    html.push_str("    <table>\n");
    html.push_str("      <tr><th>No</th><th>Nama</th><th>Jumlah</th><th>%</th></tr>\n");

    if section.rows.is_empty() {
        html.push_str("      <tr><td colspan=\"4\">Tidak ada data</td></tr>\n");
    }
    for (i, row) in section.rows.iter().enumerate() {
        html.push_str(&format!(
            "      <tr><td>{}</td><td>{}</td><td>{}</td><td>{}%</td></tr>\n",
            i + 1,
            escape_html(&row.label),
            row.count,
            row.percentage
        ));
    }

    html.push_str("    </table>\n");
    html.push_str("  </section>\n");
}

/// Escape text for HTML element content and attribute values.
pub(super) fn escape_html(s: &str) -> String {
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
