use crate::settings::Settings;
use crate::storage;

pub struct AppState {
    pub settings: Settings,
}

impl AppState {
    pub fn load() -> Self {
        Self {
            settings: storage::load_settings(),
        }
    }
}
