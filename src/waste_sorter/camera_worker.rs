use crate::capture_session::{CaptureSession, CaptureState};
use crate::library::logger::interface::Logger;
use crate::waste_sorter::core::Event;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraCommand {
    Start { reset_first: bool },
    Capture,
    Reset,
}

/// Runs camera commands one at a time, in the order they were sent, on a thread that owns
/// the capture session. The session is dropped, and its stream released, when every sender
/// is gone.
pub fn spawn_camera_worker(
    mut session: CaptureSession,
    commands: Receiver<CameraCommand>,
    event_sender: Sender<Event>,
    logger: Arc<dyn Logger + Send + Sync>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for command in commands {
            let _ = logger.info(&format!(
                "Camera command {:?} in state {:?}",
                command,
                session.state()
            ));

            match command {
                CameraCommand::Start { reset_first } => {
                    if reset_first && session.state() == CaptureState::Captured {
                        session.reset();
                    }
                    let started = session.start();
                    let _ = event_sender.send(Event::CameraStartDone(started));
                }
                CameraCommand::Capture => {
                    let captured = session.capture();
                    let _ = event_sender.send(Event::CaptureDone(captured));
                }
                CameraCommand::Reset => session.reset(),
            }

            let _ = logger.info(&format!("Displaying {:?}", session.display_source()));
        }

        session.reset();
        let _ = logger.info("Camera worker stopped");
    })
}
