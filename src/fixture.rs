//! Threaded runtime for one fixture.
//!
//! [`Fixture`] spawns a single worker thread that owns the [`LightController`], the
//! render sink and the satellite link. Property writes travel over a bounded channel
//! and every call blocks until the worker has applied and rendered it, so writes and
//! cycle ticks are strictly serialized. Ticks fire from the same thread whenever no
//! request arrives before the next deadline.

use std::fmt;
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{debug, info, warn};

use crate::command::{LightCommand, LightState};
use crate::config::FixtureConfig;
use crate::controller::{LightController, Reaction};
use crate::satellite::SatelliteLink;
use crate::sink::{self, RenderSink};
use crate::types::{CycleChange, FrameKind};

const REQUEST_CHANNEL_SIZE: usize = 10;

/// Errors that can occur while talking to a fixture worker.
#[derive(Debug)]
pub enum FixtureError {
    /// The worker thread has exited.
    Disconnected,

    /// The worker thread could not be spawned, or the satellite socket could not be
    /// bound.
    Io(io::Error),
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureError::Disconnected => write!(f, "fixture worker is not running"),
            FixtureError::Io(e) => write!(f, "fixture worker I/O error: {}", e),
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FixtureError::Io(e) => Some(e),
            FixtureError::Disconnected => None,
        }
    }
}

impl From<io::Error> for FixtureError {
    fn from(err: io::Error) -> Self {
        FixtureError::Io(err)
    }
}

enum Request {
    Command(LightCommand, SyncSender<LightState>),
    StopCycle(SyncSender<LightState>),
    State(SyncSender<LightState>),
}

/// Handle to a running fixture worker.
///
/// Dropping the handle shuts the worker down: the channel closes, the worker turns
/// every LED off and the thread is joined.
pub struct Fixture {
    sender: Option<SyncSender<Request>>,
    join: Option<JoinHandle<()>>,
}

impl Fixture {
    /// Spawns a worker for a fresh controller built from `config`.
    pub fn spawn<S>(
        config: FixtureConfig,
        sink: S,
        satellites: SatelliteLink,
    ) -> Result<Fixture, FixtureError>
    where
        S: RenderSink + Send + 'static,
    {
        Self::spawn_with_controller(LightController::new(config), sink, satellites)
    }

    /// Spawns a worker around an existing controller.
    pub fn spawn_with_controller<S>(
        controller: LightController,
        sink: S,
        satellites: SatelliteLink,
    ) -> Result<Fixture, FixtureError>
    where
        S: RenderSink + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel::<Request>(REQUEST_CHANNEL_SIZE);
        let name = format!("fixture-{}", controller.config().name());
        let worker = Worker {
            frame: vec![0; controller.config().led_count()],
            controller,
            sink,
            satellites,
            next_tick: None,
        };
        let join = thread::Builder::new()
            .name(name)
            .spawn(move || worker.run(rx))?;

        Ok(Fixture {
            sender: Some(tx),
            join: Some(join),
        })
    }

    pub fn set_power(&self, on: bool) -> Result<LightState, FixtureError> {
        self.send(LightCommand::SetPower(on))
    }

    pub fn set_hue(&self, hue: f32) -> Result<LightState, FixtureError> {
        self.send(LightCommand::SetHue(hue))
    }

    pub fn set_saturation(&self, saturation: f32) -> Result<LightState, FixtureError> {
        self.send(LightCommand::SetSaturation(saturation))
    }

    pub fn set_brightness(&self, brightness: u8) -> Result<LightState, FixtureError> {
        self.send(LightCommand::SetBrightness(brightness))
    }

    /// Applies a property write and waits until it has been rendered.
    pub fn send(&self, command: LightCommand) -> Result<LightState, FixtureError> {
        self.request(|reply| Request::Command(command, reply))
    }

    /// Stops the color cycle. No tick fires after this returns.
    pub fn stop_cycle(&self) -> Result<LightState, FixtureError> {
        self.request(Request::StopCycle)
    }

    /// Current property values.
    pub fn state(&self) -> Result<LightState, FixtureError> {
        self.request(Request::State)
    }

    /// Shuts the worker down and waits for it to turn the strip off.
    pub fn shutdown(self) {}

    fn request<F>(&self, make: F) -> Result<LightState, FixtureError>
    where
        F: FnOnce(SyncSender<LightState>) -> Request,
    {
        let sender = self.sender.as_ref().ok_or(FixtureError::Disconnected)?;
        let (reply, response) = mpsc::sync_channel(1);
        sender
            .send(make(reply))
            .map_err(|_| FixtureError::Disconnected)?;
        response.recv().map_err(|_| FixtureError::Disconnected)
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.sender = None;
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                warn!("fixture worker panicked");
            }
        }
    }
}

struct Worker<S> {
    controller: LightController,
    sink: S,
    satellites: SatelliteLink,
    frame: Vec<u32>,
    next_tick: Option<Instant>,
}

impl<S: RenderSink> Worker<S> {
    fn run(mut self, requests: Receiver<Request>) {
        info!(
            "fixture {} running {} LEDs",
            self.controller.config().name(),
            self.frame.len()
        );

        loop {
            let request = match self.next_tick {
                Some(deadline) => {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match requests.recv_timeout(wait) {
                        Ok(request) => request,
                        Err(RecvTimeoutError::Timeout) => {
                            self.tick();
                            continue;
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match requests.recv() {
                    Ok(request) => request,
                    Err(_) => break,
                },
            };
            self.handle(request);
        }

        self.sink.all_off();
        info!("fixture {} stopped", self.controller.config().name());
    }

    fn handle(&mut self, request: Request) {
        let reply = match request {
            Request::Command(command, reply) => {
                debug!("{:?}", command);
                let reaction = self.controller.apply(command);
                self.play(&reaction);
                reply
            }
            Request::StopCycle(reply) => {
                let reaction = self.controller.stop_cycle();
                self.play(&reaction);
                reply
            }
            Request::State(reply) => reply,
        };
        // The caller may have given up waiting.
        let _ = reply.send(self.controller.state());
    }

    fn tick(&mut self) {
        let reaction = self.controller.tick();
        self.play(&reaction);

        let interval = self.controller.tick_interval();
        self.next_tick = match self.next_tick {
            Some(deadline) if self.controller.is_cycling() => {
                let now = Instant::now();
                let next = deadline + interval;
                // Skip missed ticks instead of bursting to catch up.
                Some(if next <= now { now + interval } else { next })
            }
            _ => None,
        };
    }

    fn play(&mut self, reaction: &Reaction) {
        for frame in reaction.frames() {
            sink::render_color(&mut self.sink, &mut self.frame, frame.color);
            match frame.kind {
                FrameKind::Flash => thread::sleep(self.controller.config().flash_hold()),
                FrameKind::Static | FrameKind::Cycle => self.satellites.broadcast(frame.color),
            }
        }

        match reaction.cycle() {
            CycleChange::Started => {
                self.next_tick = Some(Instant::now() + self.controller.tick_interval());
            }
            CycleChange::Stopped => self.next_tick = None,
            CycleChange::Unchanged => {}
        }
    }
}
