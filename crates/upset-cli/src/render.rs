use console::style;
use upset_signals::AnalysisResult;

/// Pretty-printed JSON; non-ASCII text is emitted as-is.
pub fn render_json(result: &AnalysisResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Human-readable `label: value` lines.
pub fn render_text(result: &AnalysisResult, colored: bool) -> String {
    let label = |name: &str| style(format!("{name}:")).bold().force_styling(colored);

    let verdict = if result.is_upset {
        style(result.is_upset).red()
    } else {
        style(result.is_upset).green()
    }
    .force_styling(colored);

    let mut lines = vec![
        format!("{} {}", label("is_upset"), verdict),
        format!("{} {:?}", label("confidence"), result.confidence),
    ];

    if !result.signals.is_empty() {
        lines.push(label("signals").to_string());
        lines.extend(result.signals.iter().map(|signal| format!("  - {signal}")));
    }

    lines.push(format!("{} {}", label("reason"), result.reason));
    lines.push(format!(
        "{} {}",
        label("suggested_action"),
        result.suggested_action
    ));

    lines.join("\n")
}
