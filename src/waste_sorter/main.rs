use crate::capture_session::CaptureSession;
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::image_classifier::labels::LabelSet;
use crate::library::logger::interface::Logger;
use crate::orchestrator::Orchestrator;
use crate::waste_sorter::camera_worker::{spawn_camera_worker, CameraCommand};
use crate::waste_sorter::core::{init, transition, Effect, Event, State};
use crate::waste_sorter::render::Render;
use crate::waste_sorter::run_effect::{EngineLoader, RunEffect};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

pub struct WasteSorter {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    event_sender: Sender<Event>,
    event_receiver: Receiver<Event>,
    camera_sender: Sender<CameraCommand>,
    camera_worker: JoinHandle<()>,
    run_effect: RunEffect,
    render: Render,
}

impl WasteSorter {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        engine_loader: EngineLoader,
    ) -> Self {
        let logger = logger.with_namespace("waste_sorter");
        let (event_sender, event_receiver) = channel();
        let (camera_sender, camera_receiver) = channel();

        let orchestrator = Arc::new(Orchestrator::new(
            LabelSet::waste(),
            config.top_k,
            config.input_size,
            logger.clone(),
        ));

        let session = CaptureSession::new(device_camera, config.preferred_facing, logger.clone());
        let camera_worker = spawn_camera_worker(
            session,
            camera_receiver,
            event_sender.clone(),
            logger.with_namespace("camera_worker"),
        );

        let run_effect = RunEffect::new(
            config.clone(),
            logger.clone(),
            orchestrator,
            engine_loader,
            event_sender.clone(),
        );

        Self {
            config,
            logger,
            event_sender,
            event_receiver,
            camera_sender,
            camera_worker,
            run_effect,
            render: Render::new(device_display),
        }
    }

    /// Input side of the command queue. Events are processed one at a time, in order.
    pub fn event_sender(&self) -> Sender<Event> {
        self.event_sender.clone()
    }

    /// Camera effects go to the camera worker so they keep their order. Everything else runs
    /// on its own thread and reports back through the event queue.
    fn spawn_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let command = match effect {
                Effect::StartCamera { reset_first } => CameraCommand::Start { reset_first },
                Effect::CapturePhoto => CameraCommand::Capture,
                Effect::ResetCamera => CameraCommand::Reset,
                effect => {
                    let run_effect = self.run_effect.clone();
                    std::thread::spawn(move || run_effect.run_effect(effect));
                    continue;
                }
            };
            if self.camera_sender.send(command).is_err() {
                let _ = self
                    .logger
                    .error(&format!("Camera worker is gone, dropped {:?}", command));
            }
        }
    }

    /// Processes events until `Shutdown`, then waits for the camera to be released.
    pub fn run(self) -> Result<State, Box<dyn std::error::Error + Send + Sync>> {
        let (mut state, effects) = init(&self.config);

        self.render.render(&state)?;
        self.spawn_effects(effects);

        while state.running {
            let event = self.event_receiver.recv()?;

            let _ = self.logger.info(&format!(
                "\nold state:\n\t{:?}\n\nevent:\n\t{}",
                state.view,
                event.to_display_string(),
            ));

            let previous_view = state.view.clone();
            let (new_state, effects) = transition(state, event);

            let _ = self.logger.info(&format!(
                "\nnew state:\n\t{:?} model={:?} camera={:?}\n\neffects:\n\t{:?}",
                new_state.view,
                new_state.model,
                new_state.camera,
                effects
                    .iter()
                    .map(Effect::to_display_string)
                    .collect::<Vec<_>>()
            ));

            if new_state.view != previous_view {
                if let Err(e) = self.render.render(&new_state) {
                    let _ = self.logger.error(&format!("Render failed: {}", e));
                }
            }

            self.spawn_effects(effects);
            state = new_state;
        }

        let WasteSorter {
            camera_sender,
            camera_worker,
            logger,
            ..
        } = self;
        drop(camera_sender);
        if camera_worker.join().is_err() {
            let _ = logger.error("Camera worker panicked");
        }

        Ok(state)
    }
}
