use crate::workflow::{Workflow, WorkflowKind, WorkflowState};
use crate::{AppState, DetectResult, EmbedResult};

/// Display name used when the embed batch archive is retrieved.
pub const ARCHIVE_DISPLAY_NAME: &str = "watermarked_audio.zip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub embed: WorkflowView<EmbedRowView>,
    pub detect: WorkflowView<DetectRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowView<Row> {
    pub kind: WorkflowKind,
    pub state: WorkflowState,
    /// Relative paths of the selected files.
    pub files: Vec<String>,
    pub can_submit: bool,
    pub submit_label: String,
    /// Rows in the order the service returned them.
    pub rows: Vec<Row>,
    pub error: Option<String>,
    pub bulk_download: Option<BulkDownload>,
    pub partial: Option<PartialResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedRowView {
    pub filename: String,
    pub download_ref: String,
    pub rms: String,
    pub si_snr: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectRowView {
    pub filename: String,
    pub percentage: String,
    pub is_watermarked: bool,
    pub verdict: &'static str,
}

/// Single action covering the whole embed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDownload {
    pub reference: String,
    pub count: usize,
    pub label: String,
}

/// The service answered with a different number of results than files sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialResult {
    pub submitted: usize,
    pub returned: usize,
}

/// `0.873` renders as `87.3%`; exact ties round up, so `0.0625` is `6.3%`.
pub fn format_percentage(probability: f64) -> String {
    format!("{:.1}%", round_half_up(probability * 100.0, 1))
}

/// Rounds half away from zero. `{:.N}` alone rounds ties to even.
fn round_half_up(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

pub fn verdict_label(is_watermarked: bool) -> &'static str {
    if is_watermarked {
        "Watermarked"
    } else {
        "Not Watermarked"
    }
}

impl AppViewModel {
    pub(crate) fn build(state: &AppState) -> Self {
        let mut embed = workflow_view(&state.embed, embed_row);
        embed.bulk_download = state.embed.archive_ref().map(|reference| BulkDownload {
            reference: reference.to_string(),
            count: embed.rows.len(),
            label: format!("Download All ({})", embed.rows.len()),
        });
        let detect = workflow_view(&state.detect, detect_row);
        Self { embed, detect }
    }
}

fn workflow_view<R, Row>(workflow: &Workflow<R>, to_row: fn(&R) -> Row) -> WorkflowView<Row> {
    let files: Vec<String> = workflow
        .files()
        .iter()
        .map(|file| file.relative_path.clone())
        .collect();
    let rows: Vec<Row> = workflow.results().iter().map(to_row).collect();
    let partial = (workflow.state() == WorkflowState::Succeeded && rows.len() != files.len())
        .then_some(PartialResult {
            submitted: files.len(),
            returned: rows.len(),
        });
    let submit_label = match workflow.kind() {
        WorkflowKind::Embed => format!("Generate Watermarked Audio ({})", files.len()),
        WorkflowKind::Detect => format!("Detect Watermark ({})", files.len()),
    };
    WorkflowView {
        kind: workflow.kind(),
        state: workflow.state(),
        can_submit: workflow.can_submit(),
        submit_label,
        files,
        rows,
        error: workflow.error().map(ToOwned::to_owned),
        bulk_download: None,
        partial,
    }
}

fn embed_row(result: &EmbedResult) -> EmbedRowView {
    EmbedRowView {
        filename: result.filename.clone(),
        download_ref: result.download_ref.clone(),
        rms: format!("{:.6}", round_half_up(result.rms, 6)),
        si_snr: format!("{:.2} dB", round_half_up(result.si_snr, 2)),
    }
}

fn detect_row(result: &DetectResult) -> DetectRowView {
    DetectRowView {
        filename: result.filename.clone(),
        percentage: format_percentage(result.probability),
        is_watermarked: result.is_watermarked,
        verdict: verdict_label(result.is_watermarked),
    }
}
