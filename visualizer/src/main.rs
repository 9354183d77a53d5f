use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, progress_bar, row, scrollable, slider, text, text_input, Column, Container,
    },
    Alignment, Color, Element, Length, Pixels, Point, Rectangle, Renderer, Size, Subscription,
    Task, Theme,
};
use rehabcore::chart::{AxisTick, ChartProjector, ProjectionRect};
use rehabcore::playback::{MAX_SPEED, MIN_SPEED};
use rehabcore::{ChartPoint, ControlCommand, MetricsSnapshot, SimState};
use serde::Deserialize;
use std::time::Duration;

const BRIDGE_URL: &str = "http://127.0.0.1:9000";
const HISTORY_LIMIT: usize = 20;

fn main() -> iced::Result {
    iced::application(Dashboard::boot, Dashboard::update, Dashboard::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(state: &Dashboard) -> String {
    match &state.payload {
        Some(payload) if !payload.profile_name.is_empty() => {
            format!("Rehab Dashboard - {}", payload.profile_name)
        }
        _ => "Rehab Dashboard".into(),
    }
}

fn application_subscription(_: &Dashboard) -> Subscription<Message> {
    time::every(Duration::from_millis(100)).map(|_| Message::Tick)
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Dashboard {
    payload: Option<VisualizationPayload>,
    speed: f32,
    speed_dragging: bool,
    seek_frame: String,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    PayloadFetched(Result<VisualizationPayload, String>),
    Control(ControlCommand),
    SpeedChanged(f32),
    SpeedReleased,
    SeekInputChanged(String),
    SubmitSeek,
    ControlSent(Result<String, String>),
}

impl Dashboard {
    fn boot() -> (Self, Task<Message>) {
        (
            Dashboard {
                payload: None,
                speed: 1.0,
                speed_dragging: false,
                seek_frame: String::new(),
                status: "Waiting for session bridge...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_payload(), Message::PayloadFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_payload(), Message::PayloadFetched),
            Message::PayloadFetched(Ok(payload)) => {
                if !state.speed_dragging {
                    state.speed = payload.speed;
                }
                if !payload.status.is_empty() && payload.status != state.status {
                    state.status = payload.status.clone();
                    state.push_history(payload.status.clone());
                }
                state.payload = Some(payload);
                Task::none()
            }
            Message::PayloadFetched(Err(err)) => {
                state.status = format!("Bridge error: {err}");
                Task::none()
            }
            Message::Control(command) => Task::perform(post_control(command), Message::ControlSent),
            Message::SpeedChanged(speed) => {
                state.speed = speed;
                state.speed_dragging = true;
                Task::none()
            }
            Message::SpeedReleased => {
                state.speed_dragging = false;
                let command = ControlCommand::SetSpeed { speed: state.speed };
                Task::perform(post_control(command), Message::ControlSent)
            }
            Message::SeekInputChanged(value) => {
                state.seek_frame = value;
                Task::none()
            }
            Message::SubmitSeek => match state.seek_frame.trim().parse::<usize>() {
                Ok(frame) => Task::perform(
                    post_control(ControlCommand::Seek { frame }),
                    Message::ControlSent,
                ),
                Err(_) => {
                    state.status = format!("Not a frame number: {}", state.seek_frame);
                    Task::none()
                }
            },
            Message::ControlSent(Ok(_)) => Task::perform(fetch_payload(), Message::PayloadFetched),
            Message::ControlSent(Err(err)) => {
                state.status = format!("Control error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let header = match &state.payload {
            Some(payload) if !payload.profile_key.is_empty() => {
                format!("Profile {}: {}", payload.profile_key, payload.profile_name)
            }
            _ => "No model assigned".to_string(),
        };

        let controls = column![
            text(header).size(24),
            row![
                button("Generate")
                    .on_press(Message::Control(ControlCommand::Generate))
                    .padding(8),
                button("Next profile")
                    .on_press(Message::Control(ControlCommand::NextProfile))
                    .padding(8),
            ]
            .spacing(8),
            row![
                button("Play")
                    .on_press(Message::Control(ControlCommand::Start))
                    .padding(8),
                button("Pause")
                    .on_press(Message::Control(ControlCommand::Pause))
                    .padding(8),
                button("Stop")
                    .on_press(Message::Control(ControlCommand::Stop))
                    .padding(8),
            ]
            .spacing(8),
            text(format!("Speed {:.1}x", state.speed)).size(14),
            slider(MIN_SPEED..=MAX_SPEED, state.speed, Message::SpeedChanged)
                .step(0.1)
                .on_release(Message::SpeedReleased),
            row![
                text_input("Frame", &state.seek_frame)
                    .on_input(Message::SeekInputChanged)
                    .on_submit(Message::SubmitSeek)
                    .padding(6),
                button("Seek").on_press(Message::SubmitSeek).padding(8),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
            button("Export CSV")
                .on_press(Message::Control(ControlCommand::Export))
                .padding(8),
            text(&state.status).size(14),
            text("Activity log").size(16),
            Container::new(scrollable(history_column(&state.history)).height(Length::Fixed(160.0)))
                .padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(320.0));

        let telemetry = match &state.payload {
            Some(payload) => telemetry_column(payload),
            None => column![text("No telemetry yet").size(18)],
        }
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![controls, telemetry]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
    }
}

fn history_column(history: &[String]) -> Column<'_, Message> {
    if history.is_empty() {
        return Column::new().push(text("No activity yet").size(12));
    }
    history
        .iter()
        .rev()
        .fold(Column::new().spacing(4), |col, entry| {
            col.push(text(entry.clone()).size(12))
        })
}

fn telemetry_column(payload: &VisualizationPayload) -> Column<'_, Message> {
    let snapshot = &payload.snapshot;
    let values = row![
        metric_text("Accuracy", format!("{:.1}%", snapshot.accuracy)),
        metric_text("Velocity", format!("{:.2} m/s", snapshot.velocity)),
        metric_text("Fatigue", format!("{:.1}%", snapshot.fatigue)),
        metric_text("Confidence", format!("{:.1}%", snapshot.confidence)),
    ]
    .spacing(24);

    let anomaly = if snapshot.anomaly_active {
        text(format!("Anomaly: {}", snapshot.anomaly_reason))
            .size(18)
            .color(Color::from_rgb(0.95, 0.35, 0.3))
    } else {
        text("No anomaly").size(18)
    };

    let position = format!(
        "{} | {} / {} frames | {} anomalies scheduled, {} seen",
        clock_label(snapshot.elapsed_seconds),
        snapshot.frame_index,
        payload.frame_count,
        payload.anomalies_scheduled,
        payload.anomaly_onsets
    );

    let charts = payload.charts.iter().fold(Column::new().spacing(8), |col, series| {
        col.push(text(format!("{} ({})", series.title, series.unit)).size(16))
            .push(
                Canvas::new(MetricCanvas {
                    series: series.clone(),
                    alert: snapshot.anomaly_active,
                })
                .width(Length::Fill)
                .height(Length::Fixed(170.0)),
            )
    });

    column![
        text(format!("Telemetry ({})", state_label(payload.state))).size(26),
        values,
        anomaly,
        progress_bar(0.0..=1.0, payload.progress),
        text(position).size(14),
        charts,
    ]
}

fn metric_text<'a>(label: &'a str, value: String) -> Column<'a, Message> {
    column![text(label).size(12), text(value).size(22)].spacing(2)
}

fn state_label(state: SimState) -> &'static str {
    match state {
        SimState::Stopped => "stopped",
        SimState::Playing => "playing",
        SimState::Paused => "paused",
    }
}

/// `mm:ss` for an elapsed time in seconds.
fn clock_label(seconds: f32) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

async fn fetch_payload() -> Result<VisualizationPayload, String> {
    let response = reqwest::get(format!("{BRIDGE_URL}/payload"))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<VisualizationPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_control(command: ControlCommand) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{BRIDGE_URL}/control"))
        .json(&command)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok("Command queued".into())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        Err(format!("{}: {}", status, text))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ChartSeries {
    title: String,
    unit: String,
    value_min: f32,
    value_max: f32,
    points: Vec<ChartPoint>,
    value_ticks: Vec<AxisTick>,
    time_ticks: Vec<AxisTick>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct VisualizationPayload {
    snapshot: MetricsSnapshot,
    state: SimState,
    profile_name: String,
    profile_key: String,
    speed: f32,
    frame_count: usize,
    progress: f32,
    anomalies_scheduled: usize,
    anomaly_onsets: usize,
    charts: Vec<ChartSeries>,
    status: String,
}

/// Margins around the plot area, leaving room for axis labels.
const PLOT_LEFT: f32 = 44.0;
const PLOT_RIGHT: f32 = 12.0;
const PLOT_TOP: f32 = 10.0;
const PLOT_BOTTOM: f32 = 20.0;

#[derive(Clone)]
struct MetricCanvas {
    series: ChartSeries,
    alert: bool,
}

impl MetricCanvas {
    fn plot_rect(&self, size: Size) -> ProjectionRect {
        ProjectionRect::y_down(
            PLOT_LEFT,
            PLOT_TOP,
            (size.width - PLOT_LEFT - PLOT_RIGHT).max(1.0),
            (size.height - PLOT_TOP - PLOT_BOTTOM).max(1.0),
        )
    }
}

impl canvas::Program<Message> for MetricCanvas {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.05),
        );

        let rect = self.plot_rect(bounds.size());
        let top = rect.bottom + rect.height;
        let grid_color = Color::from_rgb(0.25, 0.25, 0.3);
        let label_color = Color::from_rgb(0.6, 0.6, 0.65);

        for tick in &self.series.value_ticks {
            let y = rect.bottom + tick.position * rect.height;
            let line = Path::line(
                Point::new(rect.left, y),
                Point::new(rect.left + rect.width, y),
            );
            frame.stroke(&line, Stroke::default().with_color(grid_color).with_width(1.0));
            frame.fill_text(canvas::Text {
                content: format!("{:.1}", tick.value),
                position: Point::new(4.0, y - 6.0),
                color: label_color,
                size: Pixels(11.0),
                ..canvas::Text::default()
            });
        }

        for tick in &self.series.time_ticks {
            let x = rect.left + tick.position * rect.width;
            frame.fill_text(canvas::Text {
                content: clock_label(tick.value),
                position: Point::new(x - 12.0, rect.bottom + 4.0),
                color: label_color,
                size: Pixels(11.0),
                ..canvas::Text::default()
            });
        }

        let projected = ChartProjector::project(
            &self.series.points,
            self.series.value_min,
            self.series.value_max,
            rect,
        );
        if let Some((first, rest)) = projected.split_first() {
            let path = Path::new(|builder| {
                builder.move_to(Point::new(first.x, first.y));
                for point in rest {
                    builder.line_to(Point::new(point.x, point.y));
                }
            });
            let color = if self.alert {
                Color::from_rgb(0.95, 0.45, 0.3)
            } else {
                Color::from_rgb(0.18, 0.72, 0.89)
            };
            frame.stroke(&path, Stroke::default().with_width(2.0).with_color(color));
        }

        let border = Path::rectangle(
            Point::new(rect.left, top),
            Size::new(rect.width, -rect.height),
        );
        frame.stroke(&border, Stroke::default().with_color(grid_color));

        vec![frame.into_geometry()]
    }
}
