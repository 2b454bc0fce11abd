use std::mem;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use watermark_core::{
    update, AppState, AppViewModel, Effect, Msg, PickMode, PickOrigin, WorkflowKind,
    WorkflowState,
};
use watermark_engine::{ensure_output_dir, ClientSettings};
use watermark_logging::{wm_info, wm_warn};

use super::effects::{EffectRunner, Incoming};
use super::pick::collect_candidates;
use super::ui;
use crate::cli::{Cli, Command, SelectionArgs};

/// Runs one batch from the command line and reports how it ended.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let settings = ClientSettings::with_origin(cli.origin);
    // Fail on a malformed origin before any file is read.
    settings
        .resolve("/")
        .with_context(|| format!("invalid service origin {:?}", settings.base_origin))?;

    match cli.command {
        Command::Embed {
            selection,
            out,
            download_each,
            download_all,
        } => {
            ensure_output_dir(&out)
                .with_context(|| format!("preparing output directory {}", out.display()))?;
            let runner = EffectRunner::new(settings, out)?;
            let mut session = Session::new(runner);
            let state = session.run_batch(WorkflowKind::Embed, &selection)?;
            if state == WorkflowState::Succeeded {
                session.download(download_each, download_all);
            }
            Ok(exit_code(state))
        }
        Command::Detect { selection } => {
            // Detect produces no artifacts, so nothing is ever written here.
            let output_dir = std::env::temp_dir();
            let runner = EffectRunner::new(settings, output_dir)?;
            let mut session = Session::new(runner);
            let state = session.run_batch(WorkflowKind::Detect, &selection)?;
            Ok(exit_code(state))
        }
    }
}

fn exit_code(state: WorkflowState) -> ExitCode {
    match state {
        WorkflowState::Succeeded => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    pending_retrievals: usize,
}

impl Session {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            pending_retrievals: 0,
        }
    }

    fn workflow_state(&self, kind: WorkflowKind) -> WorkflowState {
        match kind {
            WorkflowKind::Embed => self.state.embed().state(),
            WorkflowKind::Detect => self.state.detect().state(),
        }
    }

    fn can_submit(&self, kind: WorkflowKind) -> bool {
        match kind {
            WorkflowKind::Embed => self.state.embed().can_submit(),
            WorkflowKind::Detect => self.state.detect().can_submit(),
        }
    }

    /// Picks, submits and waits for the outcome. Returns the final state.
    fn run_batch(&mut self, kind: WorkflowKind, selection: &SelectionArgs) -> Result<WorkflowState> {
        let mode = if selection.dir {
            PickMode::Directory
        } else {
            PickMode::Files
        };
        let candidates = collect_candidates(&selection.paths, mode)?;
        self.dispatch(
            kind,
            Msg::FilesPicked {
                workflow: kind,
                origin: PickOrigin::Picker,
                mode,
                candidates,
            },
        );
        if !self.can_submit(kind) {
            return Ok(self.workflow_state(kind));
        }

        self.dispatch(kind, Msg::SubmitClicked(kind));
        while self.workflow_state(kind) == WorkflowState::Submitting {
            match self.runner.next() {
                Some(Incoming::Msg(msg)) => self.dispatch(kind, msg),
                Some(Incoming::Retrieved { reference, .. }) => {
                    wm_warn!("unexpected retrieval result for {reference}");
                }
                None => bail!("engine stopped while {kind} request was in flight"),
            }
        }
        Ok(self.workflow_state(kind))
    }

    /// Requests artifacts for a succeeded embed batch and waits for each.
    fn download(&mut self, each: bool, all: bool) {
        if each {
            let count = self.state.embed().results().len();
            for index in 0..count {
                self.dispatch(WorkflowKind::Embed, Msg::DownloadClicked { index });
            }
        }
        if all {
            if self.state.embed().archive_ref().is_none() {
                wm_warn!("service offered no archive for this batch");
            }
            self.dispatch(WorkflowKind::Embed, Msg::DownloadAllClicked);
        }

        while self.pending_retrievals > 0 {
            match self.runner.next() {
                Some(Incoming::Retrieved { reference, result }) => {
                    self.pending_retrievals -= 1;
                    match result {
                        Ok(path) => {
                            wm_info!("saved {reference} to {}", path.display());
                            println!("saved {}", path.display());
                        }
                        // Retrieval failures are logged by the engine and leave state untouched.
                        Err(err) => eprintln!("download failed: {err}"),
                    }
                }
                Some(Incoming::Msg(msg)) => self.dispatch(WorkflowKind::Embed, msg),
                None => {
                    wm_warn!("engine stopped with {} download(s) pending", self.pending_retrievals);
                    break;
                }
            }
        }
    }

    fn dispatch(&mut self, kind: WorkflowKind, msg: Msg) {
        let state = mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.view();
        let was_dirty = state.consume_dirty();
        self.state = state;

        if was_dirty {
            self.render(kind, &view);
        }
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        if effects.is_empty() {
            return;
        }
        self.pending_retrievals += self.runner.run(effects);
    }

    fn render(&self, kind: WorkflowKind, view: &AppViewModel) {
        for line in ui::render::render(kind, view) {
            println!("{line}");
        }
    }
}
