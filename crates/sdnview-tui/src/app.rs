//! Application core: event loop and action dispatch.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use sdnview_core::{ChannelSink, Controller, RefreshScheduler, RenderFrame};

use crate::action::{self, Action};
use crate::event::{Event, EventReader};
use crate::tui::Tui;
use crate::view;

const RENDER_RATE: Duration = Duration::from_millis(33);

pub struct App {
    scheduler: RefreshScheduler<Controller>,
    frames: mpsc::UnboundedReceiver<Arc<RenderFrame>>,
    frame: Option<Arc<RenderFrame>>,
    url: String,
    auto: bool,
    running: bool,
}

impl App {
    pub fn new(controller: &Controller, auto: bool) -> Self {
        let (sink, frames) = ChannelSink::new();
        Self {
            scheduler: controller.scheduler(Arc::new(sink)),
            frames,
            frame: None,
            url: controller.base_url().to_string(),
            auto,
            running: true,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let (cols, rows) = tui.size().unwrap_or((80, 24));
        self.update(Action::Resize(cols, rows)).await;

        let mut events = EventReader::new(RENDER_RATE);
        self.update(Action::Refresh).await;
        if self.auto {
            self.auto = self.scheduler.enable_auto().await;
        }
        info!(url = %self.url, "TUI event loop started");

        while self.running {
            let action = tokio::select! {
                event = events.next() => {
                    let Some(event) = event else { break };
                    match event {
                        Event::Key(key) => action::for_key(key),
                        Event::Resize(w, h) => Some(Action::Resize(w, h)),
                        Event::Render => Some(Action::Render),
                    }
                }
                Some(frame) = self.frames.recv() => Some(Action::FrameReady(frame)),
            };
            let Some(action) = action else { continue };

            if matches!(action, Action::Render) {
                let frame = self.frame.as_deref();
                tui.draw(|f| view::render(f, frame, &self.url, self.auto))?;
            } else {
                self.update(action).await;
            }
        }

        events.stop();
        self.scheduler.shutdown().await;
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    async fn update(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Refresh => {
                // Detached: the frame comes back through the sink.
                drop(self.scheduler.trigger_refresh());
            }
            Action::ToggleAuto => {
                self.auto = self.scheduler.toggle_auto().await;
                debug!(auto = self.auto, "auto refresh toggled");
            }
            Action::Resize(cols, rows) => {
                let canvas = view::canvas_for_terminal(cols, rows);
                self.scheduler.set_canvas(canvas);
            }
            Action::FrameReady(frame) => {
                debug!(seq = frame.seq, phase = %frame.phase, "frame received");
                self.frame = Some(frame);
            }
            Action::Render => {}
        }
    }
}
