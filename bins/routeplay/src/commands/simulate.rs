//! Simulate command - play a route on the virtual clock

use anyhow::Result;
use routeplay_cli::output::{format_count, format_duration, Status};
use routeplay_cli::progress::{finish_success, frame_progress};
use routeplay_core::config::Config;
use routeplay_core::{Error, ResultExt};
use routeplay_playback::{
    run_virtual, RecordingSurface, RouteView, RunSummary, StopSet, VirtualScheduler,
};
use std::path::Path;

/// Flags of the simulate command
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub realtime: bool,
    pub reveal: bool,
    pub json: bool,
}

pub async fn run(
    input: &Path,
    stops: Option<&Path>,
    options: Options,
    config: &Config,
) -> Result<()> {
    let doc = super::load_route(input, &config.schema.parser, false)?;
    let stops = match stops {
        Some(path) => {
            let text = super::read_input(path)?;
            let precision = config.schema.parser.coordinate_precision;
            StopSet::from_geojson_str_with_precision(&text, precision)
                .map_err(Error::from)
                .context(format!("While loading stops from {}", path.display()))?
        }
        None => StopSet::empty(),
    };

    let mut view = RouteView::from_document(&doc, stops, &config.schema).map_err(Error::from)?;
    let mut surface = RecordingSurface::new();
    let mut scheduler = VirtualScheduler::new(config.schema.playback.frame_interval());
    view.register(&mut surface);
    if options.reveal {
        view.toggle_route(&mut scheduler, &mut surface);
    }

    let summary = if options.realtime {
        run_paced(&mut view, &mut scheduler, &mut surface, !options.json).await
    } else {
        run_virtual(&mut view, &mut scheduler, &mut surface)
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    Status::header("Playback");
    Status::field("Frames", format!("{} of {}", summary.frames, summary.path_len));
    Status::field("Stops", format_count(view.player().stops().len(), "stop", "stops"));
    Status::field("Dwells", summary.dwells);
    Status::field("Duration", format_duration(summary.elapsed()));
    if let Some(bounds) = view.bounds() {
        let center = bounds.center();
        Status::field("Center", format!("{:.6}, {:.6}", center.longitude, center.latitude));
    }
    if summary.completed {
        Status::success("Playback completed");
    } else {
        Status::warning("Playback did not complete");
    }
    Ok(())
}

/// Like `run_virtual`, but sleeps through each ticket's wait
async fn run_paced(
    view: &mut RouteView,
    scheduler: &mut VirtualScheduler,
    surface: &mut RecordingSurface,
    show_progress: bool,
) -> RunSummary {
    let total = view.player().path().len() as u64;
    let progress = show_progress.then(|| frame_progress(total));

    view.start_playback(scheduler, surface);
    while let Some(due) = scheduler.pop() {
        tokio::time::sleep(due.wait).await;
        view.dispatch(due.ticket, scheduler, surface);
        if let Some(pb) = &progress {
            pb.set_position(view.player().stats().frames);
        }
    }

    if let Some(pb) = &progress {
        finish_success(pb, "done");
    }
    RunSummary::collect(view, scheduler)
}
