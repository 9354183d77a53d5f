use crate::gui_bridge::model::VisualizationModel;
use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use rehabcore::ControlCommand;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use tokio::sync::mpsc;
use warp::{http::StatusCode, Filter};

pub fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

type SharedModel = Arc<RwLock<VisualizationModel>>;

/// Holds the latest dashboard model and serves it over HTTP. Control
/// requests are forwarded to the playback loop, which owns the coordinator.
pub struct GuiBridge {
    state: SharedModel,
}

impl GuiBridge {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(VisualizationModel::default())),
        }
    }

    /// Starts `GET /payload` and `POST /control` on a dedicated thread.
    pub fn serve(&self, addr: SocketAddr, commands: mpsc::Sender<ControlCommand>) -> Result<()> {
        let state_for_filter = self.state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let command_filter = warp::any().map(move || commands.clone());

        let get_route = warp::path("payload")
            .and(warp::path::end())
            .and(warp::get())
            .and(state_filter)
            .map(|state: SharedModel| match state.read() {
                Ok(guard) => warp::reply::json(&*guard),
                Err(poisoned) => warp::reply::json(&*poisoned.into_inner()),
            });

        let control_route = warp::path("control")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(command_filter)
            .and_then(
                |command: ControlCommand, sender: mpsc::Sender<ControlCommand>| async move {
                    debug!("control request {:?}", command);
                    match sender.send(command).await {
                        Ok(()) => Ok::<_, warp::Rejection>(warp::reply::with_status(
                            warp::reply::json(&json!({"status": "queued"})),
                            StatusCode::ACCEPTED,
                        )),
                        Err(err) => {
                            warn!("control channel closed, dropping {:?}", err.0);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("building bridge runtime")?;
        thread::Builder::new()
            .name("gui-bridge".into())
            .spawn(move || {
                let routes = get_route.or(control_route);
                runtime.block_on(async move {
                    match warp::serve(routes).try_bind_ephemeral(addr) {
                        Ok((bound, server)) => {
                            info!("GUI bridge listening on http://{}", bound);
                            server.await;
                        }
                        Err(err) => error!("GUI bridge failed to bind {}: {}", addr, err),
                    }
                });
            })
            .context("spawning bridge thread")?;
        Ok(())
    }

    /// Replaces the served model. The last status line is kept.
    pub fn publish(&self, model: &VisualizationModel) -> Result<()> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| anyhow!("bridge state lock poisoned"))?;
        let status = std::mem::take(&mut guard.status);
        *guard = VisualizationModel {
            status,
            ..model.clone()
        };
        debug!(
            "[GUI] frame {} of {}, {} onsets",
            guard.snapshot.frame_index, guard.frame_count, guard.anomaly_onsets
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
        match self.state.write() {
            Ok(mut guard) => guard.status = message.to_string(),
            Err(poisoned) => poisoned.into_inner().status = message.to_string(),
        }
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        self.state.read().unwrap().clone()
    }
}

impl Default for GuiBridge {
    fn default() -> Self {
        Self::new()
    }
}
