use watermark_core::{
    AppViewModel, DetectRowView, EmbedRowView, WorkflowKind, WorkflowState, WorkflowView,
};

/// Renders one workflow panel as terminal lines.
pub fn render(kind: WorkflowKind, view: &AppViewModel) -> Vec<String> {
    match kind {
        WorkflowKind::Embed => render_panel(&view.embed, embed_row, |lines| {
            if let Some(bulk) = &view.embed.bulk_download {
                lines.push(format!("{} -> {}", bulk.label, bulk.reference));
            }
        }),
        WorkflowKind::Detect => render_panel(&view.detect, detect_row, |_| {}),
    }
}

fn render_panel<Row>(
    panel: &WorkflowView<Row>,
    row: fn(&Row) -> String,
    extra: impl FnOnce(&mut Vec<String>),
) -> Vec<String> {
    let mut lines = Vec::new();
    match panel.state {
        WorkflowState::Idle => lines.push(format!("[{}] no files selected", panel.kind)),
        WorkflowState::Selected => {
            lines.push(format!(
                "[{}] {} file(s) selected",
                panel.kind,
                panel.files.len()
            ));
            lines.extend(panel.files.iter().map(|file| format!("  {file}")));
            if let Some(warning) = &panel.error {
                lines.push(format!("warning: {warning}"));
            }
            if panel.can_submit {
                lines.push(format!("ready: {}", panel.submit_label));
            }
        }
        WorkflowState::Submitting => {
            lines.push(format!(
                "[{}] processing {} file(s)...",
                panel.kind,
                panel.files.len()
            ));
        }
        WorkflowState::Succeeded => {
            lines.push(format!("[{}] {} result(s)", panel.kind, panel.rows.len()));
            lines.extend(panel.rows.iter().map(row));
            if let Some(partial) = panel.partial {
                lines.push(format!(
                    "note: {} file(s) submitted, {} result(s) returned",
                    partial.submitted, partial.returned
                ));
            }
            extra(&mut lines);
        }
        WorkflowState::Failed => {
            let message = panel.error.as_deref().unwrap_or("unknown error");
            lines.push(format!("[{}] failed: {message}", panel.kind));
        }
    }
    lines
}

fn embed_row(row: &EmbedRowView) -> String {
    format!(
        "  {}  RMS {}  SI-SNR {}",
        row.filename, row.rms, row.si_snr
    )
}

fn detect_row(row: &DetectRowView) -> String {
    format!("  {}  {}  {}", row.filename, row.percentage, row.verdict)
}
