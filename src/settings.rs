use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub general: GeneralSettings,
    pub voice: VoiceSettings,
    pub text: TextSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    pub monitor: String,
    pub xoffset: i32,
    pub yoffset: i32,
    pub hide_when_idle: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub align_right: bool,
    pub align_bottom: bool,
    pub horizontal: bool,
    pub icon_size: u32,
    pub icon_spacing: u32,
    pub opacity: f32,
    pub only_speaking: bool,
    pub highlight_self: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSettings {
    pub enabled: bool,
    pub popup_timer_secs: u32,
    pub font: String,
    pub opacity: f32,
    pub line_limit: u32,
    pub show_attachments: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings {
                monitor: "default".to_string(),
                xoffset: 0,
                yoffset: 0,
                hide_when_idle: false,
            },
            voice: VoiceSettings {
                align_right: false,
                align_bottom: false,
                horizontal: false,
                icon_size: 48,
                icon_spacing: 8,
                opacity: 0.85,
                only_speaking: false,
                highlight_self: true,
            },
            text: TextSettings {
                enabled: true,
                popup_timer_secs: 10,
                font: "Sans 12".to_string(),
                opacity: 0.85,
                line_limit: 20,
                show_attachments: true,
            },
        }
    }
}
