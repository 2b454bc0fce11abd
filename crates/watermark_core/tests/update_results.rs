use pretty_assertions::assert_eq;
use watermark_core::{
    format_percentage, update, AppState, DetectResult, Effect, EmbedResult, FileCandidate, Msg,
    PartialResult, PickMode, PickOrigin, WorkflowKind, ARCHIVE_DISPLAY_NAME,
};

fn submitted(workflow: WorkflowKind, names: &[&str]) -> (AppState, u64) {
    let (state, _) = update(
        AppState::new(),
        Msg::FilesPicked {
            workflow,
            origin: PickOrigin::Picker,
            mode: PickMode::Directory,
            candidates: names
                .iter()
                .map(|name| {
                    FileCandidate::new(format!("/in/set/{name}"), *name)
                        .with_relative_path(format!("set/{name}"))
                        .with_media_type("audio/wav")
                })
                .collect(),
        },
    );
    let (state, effects) = update(state, Msg::SubmitClicked(workflow));
    let request_id = match effects.as_slice() {
        [Effect::Submit { request_id, .. }] => *request_id,
        other => panic!("unexpected effects {other:?}"),
    };
    (state, request_id)
}

fn embed_success(archive_ref: Option<&str>) -> AppState {
    let (state, request_id) = submitted(WorkflowKind::Embed, &["a.wav", "b.wav"]);
    let (state, _) = update(
        state,
        Msg::EmbedSucceeded {
            request_id,
            results: vec![
                EmbedResult {
                    filename: "set/b.wav".to_string(),
                    download_ref: "/embed/download/123_b_wm.wav".to_string(),
                    rms: 0.0012345678,
                    si_snr: 31.4567,
                },
                EmbedResult {
                    filename: "set/a.wav".to_string(),
                    download_ref: "/embed/download/456_a_wm.wav".to_string(),
                    rms: 0.5,
                    si_snr: -2.0,
                },
            ],
            archive_ref: archive_ref.map(ToOwned::to_owned),
        },
    );
    state
}

#[test]
fn detect_rows_format_percentage_and_keep_verdict() {
    let (state, request_id) = submitted(WorkflowKind::Detect, &["a.wav", "b.wav"]);
    let (state, _) = update(
        state,
        Msg::DetectSucceeded {
            request_id,
            results: vec![
                DetectResult {
                    filename: "a.wav".to_string(),
                    probability: 0.873,
                    is_watermarked: true,
                },
                // Verdict is authoritative even when it disagrees with the probability.
                DetectResult {
                    filename: "b.wav".to_string(),
                    probability: 0.9,
                    is_watermarked: false,
                },
            ],
        },
    );

    let rows = state.view().detect.rows;
    assert_eq!(rows[0].percentage, "87.3%");
    assert_eq!(rows[0].verdict, "Watermarked");
    assert_eq!(rows[1].percentage, "90.0%");
    assert_eq!(rows[1].verdict, "Not Watermarked");
    assert!(!rows[1].is_watermarked);
}

#[test]
fn embed_rows_keep_server_order_and_format_metrics() {
    let state = embed_success(Some("/embed/download/batch_watermarked.zip"));
    let view = state.view().embed;

    let names: Vec<_> = view.rows.iter().map(|row| row.filename.as_str()).collect();
    assert_eq!(names, vec!["set/b.wav", "set/a.wav"]);
    assert_eq!(view.rows[0].rms, "0.001235");
    assert_eq!(view.rows[0].si_snr, "31.46 dB");
    assert_eq!(view.rows[1].rms, "0.500000");
    assert_eq!(view.rows[1].si_snr, "-2.00 dB");
    assert_eq!(view.partial, None);
    assert_eq!(view.files, vec!["set/a.wav", "set/b.wav"]);

    let bulk = view.bulk_download.expect("bulk download");
    assert_eq!(bulk.count, 2);
    assert_eq!(bulk.label, "Download All (2)");
}

#[test]
fn missing_archive_disables_bulk_download() {
    let state = embed_success(None);

    assert_eq!(state.view().embed.bulk_download, None);
    let (_, effects) = update(state, Msg::DownloadAllClicked);
    assert!(effects.is_empty());
}

#[test]
fn download_clicks_emit_retrievals_without_state_change() {
    let state = embed_success(Some("/embed/download/batch_watermarked.zip"));
    let before = state.clone();

    let (state, effects) = update(state, Msg::DownloadClicked { index: 1 });
    assert_eq!(state, before);
    assert_eq!(
        effects,
        vec![Effect::Retrieve {
            reference: "/embed/download/456_a_wm.wav".to_string(),
            display_name: "set/a.wav".to_string(),
        }]
    );

    let (state, effects) = update(state, Msg::DownloadAllClicked);
    assert_eq!(
        effects,
        vec![Effect::Retrieve {
            reference: "/embed/download/batch_watermarked.zip".to_string(),
            display_name: ARCHIVE_DISPLAY_NAME.to_string(),
        }]
    );

    let (_, effects) = update(state, Msg::DownloadClicked { index: 7 });
    assert!(effects.is_empty());
}

#[test]
fn short_result_set_is_shown_as_returned() {
    let (state, request_id) = submitted(WorkflowKind::Detect, &["a.wav", "b.wav", "c.wav"]);
    let (state, _) = update(
        state,
        Msg::DetectSucceeded {
            request_id,
            results: vec![DetectResult {
                filename: "set/c.wav".to_string(),
                probability: 0.02,
                is_watermarked: false,
            }],
        },
    );

    let view = state.view().detect;
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].filename, "set/c.wav");
    assert_eq!(
        view.partial,
        Some(PartialResult {
            submitted: 3,
            returned: 1,
        })
    );
}

#[test]
fn submit_labels_count_selected_files() {
    let (state, _) = submitted(WorkflowKind::Embed, &["a.wav", "b.wav"]);
    let view = state.view();

    assert_eq!(view.embed.submit_label, "Generate Watermarked Audio (2)");
    assert_eq!(view.detect.submit_label, "Detect Watermark (0)");
    assert!(!view.embed.can_submit);
}

#[test]
fn exact_ties_round_up_for_display() {
    assert_eq!(format_percentage(0.0625), "6.3%");

    let (state, request_id) = submitted(WorkflowKind::Embed, &["a.wav", "b.wav"]);
    let (state, _) = update(
        state,
        Msg::EmbedSucceeded {
            request_id,
            results: vec![
                EmbedResult {
                    filename: "set/a.wav".to_string(),
                    download_ref: "/embed/download/a_wm.wav".to_string(),
                    rms: 0.25,
                    si_snr: 30.125,
                },
                EmbedResult {
                    filename: "set/b.wav".to_string(),
                    download_ref: "/embed/download/b_wm.wav".to_string(),
                    rms: 0.25,
                    si_snr: -2.125,
                },
            ],
            archive_ref: None,
        },
    );

    let rows = state.view().embed.rows;
    assert_eq!(rows[0].si_snr, "30.13 dB");
    assert_eq!(rows[1].si_snr, "-2.13 dB");
}

#[test]
fn row_without_download_reference_emits_nothing() {
    let (state, request_id) = submitted(WorkflowKind::Embed, &["a.wav"]);
    let (state, _) = update(
        state,
        Msg::EmbedSucceeded {
            request_id,
            results: vec![EmbedResult {
                filename: "set/a.wav".to_string(),
                download_ref: String::new(),
                rms: 0.1,
                si_snr: 20.0,
            }],
            archive_ref: None,
        },
    );
    let before = state.clone();

    let (state, effects) = update(state, Msg::DownloadClicked { index: 0 });

    assert!(effects.is_empty());
    assert_eq!(state, before);
}
