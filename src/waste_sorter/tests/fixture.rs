use crate::config::Config;
use crate::device_camera::impl_fake::DeviceCameraFake;
use crate::device_display::impl_fake::DeviceDisplayFake;
use crate::device_display::interface::View;
use crate::image_classifier::impl_fake::InferenceEngineFake;
use crate::image_classifier::interface::InferenceEngine;
use crate::library::logger::{impl_console::LoggerConsole, interface::Logger};
use crate::waste_sorter::core::{Event, State};
use crate::waste_sorter::main::WasteSorter;
use crate::waste_sorter::run_effect::{EngineLoader, LoadResult};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

pub const WAIT: Duration = Duration::from_secs(10);

#[allow(dead_code)]
pub struct Fixture {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub device_camera: Arc<DeviceCameraFake>,
    pub device_display: DeviceDisplayFake,
    pub engine: Arc<InferenceEngineFake>,
    pub event_sender: Sender<Event>,
    pub running: Option<JoinHandle<Result<State, String>>>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_engine_loader(None)
    }

    pub fn with_failing_engine() -> Self {
        let loader: EngineLoader =
            Arc::new(|| -> LoadResult { Err("model/model_resnet18.onnx not found".into()) });
        Self::with_engine_loader(Some(loader))
    }

    fn with_engine_loader(loader: Option<EngineLoader>) -> Self {
        let mut config = Config::default();
        config.model_status_linger = Duration::from_millis(10);

        let logger: Arc<dyn Logger + Send + Sync> =
            Arc::new(LoggerConsole::new(config.logger_timezone));
        let device_camera = Arc::new(DeviceCameraFake::new(logger.clone()));
        let device_display = DeviceDisplayFake::new();
        let engine = Arc::new(InferenceEngineFake::with_scores(vec![
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 6.0, 0.0, 0.0,
        ]));

        let engine_loader: EngineLoader = match loader {
            Some(loader) => loader,
            None => {
                let engine = engine.clone();
                Arc::new(move || -> LoadResult {
                    Ok(engine.clone() as Arc<dyn InferenceEngine + Send + Sync>)
                })
            }
        };

        let waste_sorter = WasteSorter::new(
            config.clone(),
            logger.clone(),
            device_camera.clone(),
            Arc::new(Mutex::new(device_display.clone())),
            engine_loader,
        );
        let event_sender = waste_sorter.event_sender();
        let running = std::thread::spawn(move || waste_sorter.run().map_err(|e| e.to_string()));

        Self {
            config,
            logger,
            device_camera,
            device_display,
            engine,
            event_sender,
            running: Some(running),
        }
    }

    pub fn send(&self, event: Event) {
        self.event_sender.send(event).unwrap();
    }

    /// Waits until the display has shown a view matching `predicate`, counting from the
    /// `skip`th view shown.
    pub fn wait_for_view<P>(&self, skip: usize, predicate: P) -> View
    where
        P: Fn(&View) -> bool,
    {
        let deadline = Instant::now() + WAIT;
        loop {
            if let Some(view) = self
                .device_display
                .views()
                .into_iter()
                .skip(skip)
                .find(|view| predicate(view))
            {
                return view;
            }
            assert!(
                Instant::now() < deadline,
                "view never shown, got {:?}",
                self.device_display.views()
            );
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    pub fn view_count(&self) -> usize {
        self.device_display.views().len()
    }

    pub fn shutdown(&mut self) -> State {
        self.send(Event::Shutdown);
        self.running
            .take()
            .unwrap()
            .join()
            .unwrap()
            .unwrap()
    }
}
