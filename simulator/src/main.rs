use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use rehabcore::generator::ProfileId;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use tokio::sync::mpsc;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod gui_bridge;
mod workflow;

/// Pending control requests between the HTTP bridge and the playback loop.
const COMMAND_QUEUE: usize = 32;

#[derive(Parser)]
#[command(author, version, about = "Rehabilitation session driver")]
struct Args {
    /// Generate one session, play it headless and print a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// baseline, fatigued or high-performer (also a, b, c)
    #[arg(long, default_value = "baseline")]
    profile: ProfileId,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1.0)]
    speed: f32,
    #[arg(long, default_value_t = 30.0)]
    tick_hz: f32,
    /// Write the session CSV after the offline run
    #[arg(long, default_value_t = false)]
    export: bool,
    /// Serve the dashboard bridge and play sessions in real time
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.profile, args.seed, args.speed, args.tick_hz)
    };
    let runner = Runner::new(workflow_config);

    if args.offline {
        let result = runner.execute(args.export)?;

        println!(
            "Offline run -> {} frames {}/{}, ticks {}, anomalies {} scheduled / {} onsets",
            result.profile_name,
            result.final_frame,
            result.frame_count,
            result.ticks,
            result.anomalies_scheduled,
            result.anomaly_onsets
        );
        println!(
            "  mean accuracy {:.2}%, fatigue range {:?}",
            result.mean_accuracy, result.fatigue_extent
        );
        if let Some(path) = &result.export_path {
            println!("  exported {}", path.display());
        }

        let report = format!(
            "profile={} frames={} ticks={} scheduled={} onsets={} mean_accuracy={:.2} reasons={:?}\n",
            result.profile_name,
            result.frame_count,
            result.ticks,
            result.anomalies_scheduled,
            result.anomaly_onsets,
            result.mean_accuracy,
            result.reasons_seen
        );
        let report_path = PathBuf::from("tools/data/offline_sessions.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
    }
    if args.serve {
        let (tx, rx) = mpsc::channel(COMMAND_QUEUE);
        let gui_bridge = GuiBridge::new();
        gui_bridge.serve(gui_bind_address(), tx)?;
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");

        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for playback loop")?;
        runtime.block_on(async {
            let mut coordinator = runner.coordinator();
            let shutdown = async {
                if let Err(err) = signal::ctrl_c().await {
                    log::warn!("awaiting Ctrl+C failed: {}", err);
                }
            };
            runner
                .run_realtime(&mut coordinator, &gui_bridge, rx, shutdown)
                .await
        })?;
    }

    Ok(())
}
