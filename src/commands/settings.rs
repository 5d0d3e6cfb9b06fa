use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::palette::{Tone, dim};
use crate::settings::{AppPaths, MAX_TYPING_SPEED, MIN_TYPING_SPEED, Settings};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}

pub fn apply(settings: Settings, speed: Option<u32>, sound: Option<Toggle>) -> Settings {
    let mut updated = settings;
    if let Some(speed) = speed {
        updated = updated.with_typing_speed(speed);
    }
    if let Some(sound) = sound {
        updated = updated.with_sound(sound.enabled());
    }
    updated
}

pub fn run(
    paths: &AppPaths,
    settings: Settings,
    speed: Option<u32>,
    sound: Option<Toggle>,
) -> Result<()> {
    let changed = speed.is_some() || sound.is_some();
    let settings = if changed {
        let updated = apply(settings, speed, sound);
        updated
            .save(&paths.settings)
            .context("Unable to save settings")?;
        tracing::info!(
            typing_speed = updated.typing_speed,
            sound_enabled = updated.sound_enabled,
            "settings updated"
        );
        if let Some(requested) = speed
            && requested != updated.typing_speed
        {
            println!(
                "{}",
                dim(format!(
                    "Typing speed must be between {} and {}; using {}.",
                    MIN_TYPING_SPEED, MAX_TYPING_SPEED, updated.typing_speed
                ))
            );
        }
        updated
    } else {
        settings
    };

    println!(
        "{} {}",
        dim("Typing speed:"),
        Tone::Info.paint(format!("{} characters per second", settings.typing_speed))
    );
    let (sound_label, sound_color) = if settings.sound_enabled {
        ("enabled", Tone::Correct)
    } else {
        ("disabled", Tone::Warning)
    };
    println!(
        "{} {}",
        dim("Sounds:"),
        sound_color.paint(sound_label)
    );
    println!(
        "{} {}",
        dim("Sounds directory:"),
        Tone::Info.paint(settings.sounds_dir_or(&paths.data_dir).display())
    );
    println!(
        "{} {}",
        dim("Results file:"),
        Tone::Info.paint(paths.results.display())
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_updates_only_given_fields() {
        let base = Settings::default();
        let updated = apply(base.clone(), Some(80), None);
        assert_eq!(updated.typing_speed, 80);
        assert!(updated.sound_enabled);

        let updated = apply(base, None, Some(Toggle::Off));
        assert_eq!(updated.typing_speed, 50);
        assert!(!updated.sound_enabled);
    }

    #[test]
    fn apply_clamps_speed() {
        let updated = apply(Settings::default(), Some(5), None);
        assert_eq!(updated.typing_speed, MIN_TYPING_SPEED);
    }
}
