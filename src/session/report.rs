//! Plain-text reading report.

use once_cell::sync::Lazy;
use tera::{Context, Tera};

use super::{Session, SessionError};

const REPORT_TEMPLATE_NAME: &str = "report.txt";

const REPORT_TEMPLATE: &str = "Astrology Report for {{ details.name }}
Born {{ details.dob }} at {{ details.tob }} in {{ details.pob }} ({{ details.timezone }})

{% for turn in history %}{{ turn.role | capitalize }}: {{ turn.content }}

{% endfor %}";

static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_template(REPORT_TEMPLATE_NAME, REPORT_TEMPLATE)
        .expect("embedded report template must parse");
    tera
});

/// Render the session as a text report: a header, then one paragraph per turn.
pub fn render_report(session: &Session) -> Result<String, SessionError> {
    let mut context = Context::new();
    context.insert("details", session.birth_details());
    context.insert("history", session.history());
    TEMPLATES
        .render(REPORT_TEMPLATE_NAME, &context)
        .map_err(|e| SessionError::Report(e.to_string()))
}

/// Suggested download name, e.g. `Asha_Astrology_Report.txt`.
///
/// Anything but ASCII letters, digits and `-` becomes `_`, so the name is
/// safe in a quoted `Content-Disposition` filename.
pub fn report_file_name(session: &Session) -> String {
    let name: String = session
        .birth_details()
        .name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("{}_Astrology_Report.txt", name)
}
