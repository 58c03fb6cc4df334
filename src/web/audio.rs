use wasm_bindgen::JsValue;
use web_sys::HtmlAudioElement;

use crate::game::{GameEvent, SoundCue};

pub const NICE_SOUND: &str = "/sounds/Nice-sound.mp3";
pub const OOPS_SOUND: &str = "/sounds/Oops.mp3";
pub const POP_SOUNDS: &[&str] = &["/sounds/pop-423717.mp3", "/sounds/pop-2.mp3"];
pub const MUSIC_TRACK: &str = "/sounds/game-bg-music.mp3";

const CUE_VOLUME: f64 = 0.7;
const MUSIC_VOLUME: f64 = 0.3;

/// Preloaded audio elements, one per cue.
pub struct AudioBank {
    nice: HtmlAudioElement,
    oops: HtmlAudioElement,
    pops: Vec<HtmlAudioElement>,
    music: HtmlAudioElement,
}

fn load(src: &str, volume: f64) -> Result<HtmlAudioElement, JsValue> {
    let el = HtmlAudioElement::new_with_src(src)?;
    el.set_volume(volume);
    el.set_preload("auto");
    Ok(el)
}

impl AudioBank {
    pub fn load() -> Result<Self, JsValue> {
        let music = load(MUSIC_TRACK, MUSIC_VOLUME)?;
        music.set_loop(true);
        Ok(Self {
            nice: load(NICE_SOUND, CUE_VOLUME)?,
            oops: load(OOPS_SOUND, CUE_VOLUME)?,
            pops: POP_SOUNDS
                .iter()
                .map(|src| load(src, CUE_VOLUME))
                .collect::<Result<_, _>>()?,
            music,
        })
    }

    /// Plays whatever cues `events` ask for. Playback failures (autoplay
    /// policy, missing asset) are ignored.
    pub fn play_events(&self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::Sound(cue) = event {
                self.play(*cue);
            }
        }
    }

    pub fn play(&self, cue: SoundCue) {
        match cue {
            SoundCue::Pop { variant } => {
                if let Some(el) = self.pops.get(variant % self.pops.len().max(1)) {
                    restart(el);
                }
            }
            SoundCue::Nice => restart(&self.nice),
            SoundCue::Oops => restart(&self.oops),
            SoundCue::MusicOn => {
                // Resumes where it paused, unlike the cues.
                let _ = self.music.play();
            }
            SoundCue::MusicOff => {
                let _ = self.music.pause();
            }
        }
    }
}

// Cues interrupt themselves when retriggered.
fn restart(el: &HtmlAudioElement) {
    el.set_current_time(0.0);
    let _ = el.play();
}
