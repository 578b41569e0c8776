use crate::device_display::interface::{DeviceDisplay, View};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Records every view it is asked to show.
#[derive(Clone, Default)]
pub struct DeviceDisplayFake {
    views: Arc<Mutex<Vec<View>>>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self) -> Vec<View> {
        self.views
            .lock()
            .map(|views| views.clone())
            .unwrap_or_default()
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn show(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.views
            .lock()
            .map_err(|e| e.to_string())?
            .push(view.clone());
        Ok(())
    }
}
