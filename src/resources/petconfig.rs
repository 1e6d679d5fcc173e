//! Pet configuration resource.
//!
//! Holds the constants the host sets once at construction: movement speed,
//! vertical step, scale factor, window margin, carriage counts, rotation
//! angles and crop rectangles. Defaults are safe for startup; values can be
//! loaded from and saved to an INI file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [motion]
//! mode = border
//! move_speed = 5
//! vertical_step = 50
//! window_margin = 20
//! tick_ms = 16
//!
//! [render]
//! scale_factor = 0.2
//! native_facing = left
//! cache_capacity = 64
//!
//! [train]
//! min_carriages = 1
//! max_carriages = 10
//! default_carriages = 3
//!
//! [rotation]
//! bottom = 0
//! right = 270
//! top = 180
//! left = 90
//! level = 0
//! climb = 270
//! descend = 90
//!
//! [crop]
//! head = 9,0,1271,255
//! body = 9,513,788,768
//! tail = 9,257,1270,511
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;
use std::str::FromStr;

use crate::geometry::Rect;

const DEFAULT_MOVE_SPEED: i32 = 5;
const DEFAULT_VERTICAL_STEP: i32 = 50;
const DEFAULT_WINDOW_MARGIN: i32 = 20;
const DEFAULT_TICK_MS: u64 = 16;
const DEFAULT_SCALE_FACTOR: f32 = 0.2;
const DEFAULT_CACHE_CAPACITY: usize = 64;
const DEFAULT_MIN_CARRIAGES: usize = 1;
const DEFAULT_MAX_CARRIAGES: usize = 10;
const DEFAULT_CARRIAGES: usize = 3;
const DEFAULT_HEAD_CROP: Rect = Rect {
    x: 9,
    y: 0,
    w: 1271,
    h: 255,
};
const DEFAULT_BODY_CROP: Rect = Rect {
    x: 9,
    y: 513,
    w: 788,
    h: 768,
};
const DEFAULT_TAIL_CROP: Rect = Rect {
    x: 9,
    y: 257,
    w: 1270,
    h: 511,
};
const DEFAULT_CONFIG_PATH: &str = "./trainpet.ini";

/// Which motion pattern drives the pet. The two are never combined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MotionMode {
    /// Follow the four screen corners.
    #[default]
    Border,
    /// Bounce left/right and step down in rows.
    Sweep,
}

impl FromStr for MotionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "border" => Ok(MotionMode::Border),
            "sweep" => Ok(MotionMode::Sweep),
            other => Err(format!("unknown motion mode '{}'", other)),
        }
    }
}

impl std::fmt::Display for MotionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotionMode::Border => write!(f, "border"),
            MotionMode::Sweep => write!(f, "sweep"),
        }
    }
}

/// The horizontal direction the unrotated source artwork faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Left,
    Right,
}

impl FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Facing::Left),
            "right" => Ok(Facing::Right),
            other => Err(format!("unknown facing '{}'", other)),
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facing::Left => write!(f, "left"),
            Facing::Right => write!(f, "right"),
        }
    }
}

/// Rotation angles in degrees.
///
/// The four edge angles orient the sprite so its bottom rests on the named
/// screen edge while following the border. `level`, `climb` and `descend`
/// are used by the sweep modes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationAngles {
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
    pub left: f32,
    pub level: f32,
    pub climb: f32,
    pub descend: f32,
}

impl Default for RotationAngles {
    fn default() -> Self {
        Self {
            bottom: 0.0,
            right: 270.0,
            top: 180.0,
            left: 90.0,
            level: 0.0,
            climb: 270.0,
            descend: 90.0,
        }
    }
}

/// Crop rectangles carving the train parts out of the source sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRects {
    pub head: Rect,
    pub body: Rect,
    pub tail: Rect,
}

impl Default for CropRects {
    fn default() -> Self {
        Self {
            head: DEFAULT_HEAD_CROP,
            body: DEFAULT_BODY_CROP,
            tail: DEFAULT_TAIL_CROP,
        }
    }
}

/// Pet configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct PetConfig {
    /// Motion pattern selected by the host.
    pub mode: MotionMode,
    /// Pixels moved per tick.
    pub move_speed: i32,
    /// Row height for the sweep modes.
    pub vertical_step: i32,
    /// Distance kept from the screen border.
    pub window_margin: i32,
    /// Nominal tick period in milliseconds.
    pub tick_ms: u64,
    /// Global sprite scale factor.
    pub scale_factor: f32,
    /// Direction the source artwork faces before mirroring.
    pub native_facing: Facing,
    /// Maximum transform cache entries, 0 for unbounded.
    pub cache_capacity: usize,
    pub min_carriages: usize,
    pub max_carriages: usize,
    pub default_carriages: usize,
    pub angles: RotationAngles,
    pub crops: CropRects,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_rect(value: &str) -> Result<Rect, String> {
    let parts: Vec<i32> = value
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid rectangle '{}': {}", value, e))?;
    match parts.as_slice() {
        [x, y, w, h] => Ok(Rect::new(*x, *y, *w, *h)),
        _ => Err(format!(
            "invalid rectangle '{}': expected x,y,width,height",
            value
        )),
    }
}

/// Pixel quantity from the INI file, at least `min`.
fn pixels_in_range(key: &str, value: i64, min: i32) -> Result<i32, String> {
    match i32::try_from(value) {
        Ok(v) if v >= min => Ok(v),
        _ => Err(format!("{} must be at least {}, got {}", key, min, value)),
    }
}

fn format_rect(rect: &Rect) -> String {
    format!("{},{},{},{}", rect.x, rect.y, rect.w, rect.h)
}

impl PetConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            mode: MotionMode::default(),
            move_speed: DEFAULT_MOVE_SPEED,
            vertical_step: DEFAULT_VERTICAL_STEP,
            window_margin: DEFAULT_WINDOW_MARGIN,
            tick_ms: DEFAULT_TICK_MS,
            scale_factor: DEFAULT_SCALE_FACTOR,
            native_facing: Facing::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            min_carriages: DEFAULT_MIN_CARRIAGES,
            max_carriages: DEFAULT_MAX_CARRIAGES,
            default_carriages: DEFAULT_CARRIAGES,
            angles: RotationAngles::default(),
            crops: CropRects::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Clamp a requested carriage count into the configured range.
    pub fn clamp_carriages(&self, requested: usize) -> usize {
        requested.clamp(self.min_carriages, self.max_carriages.max(self.min_carriages))
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or a value is malformed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [motion] section
        if let Some(mode) = config.get("motion", "mode") {
            self.mode = mode.parse()?;
        }
        if let Some(speed) = config.getint("motion", "move_speed").ok().flatten() {
            self.move_speed = pixels_in_range("move_speed", speed, 1)?;
        }
        if let Some(step) = config.getint("motion", "vertical_step").ok().flatten() {
            self.vertical_step = pixels_in_range("vertical_step", step, 1)?;
        }
        if let Some(margin) = config.getint("motion", "window_margin").ok().flatten() {
            self.window_margin = pixels_in_range("window_margin", margin, 0)?;
        }
        if let Some(tick) = config.getuint("motion", "tick_ms").ok().flatten() {
            self.tick_ms = tick;
        }

        // [render] section
        if let Some(scale) = config.getfloat("render", "scale_factor").ok().flatten() {
            if scale <= 0.0 {
                return Err(format!("scale_factor must be positive, got {}", scale));
            }
            self.scale_factor = scale as f32;
        }
        if let Some(facing) = config.get("render", "native_facing") {
            self.native_facing = facing.parse()?;
        }
        if let Some(capacity) = config.getuint("render", "cache_capacity").ok().flatten() {
            self.cache_capacity = capacity as usize;
        }

        // [train] section
        if let Some(min) = config.getuint("train", "min_carriages").ok().flatten() {
            self.min_carriages = min as usize;
        }
        if let Some(max) = config.getuint("train", "max_carriages").ok().flatten() {
            self.max_carriages = max as usize;
        }
        if let Some(default) = config.getuint("train", "default_carriages").ok().flatten() {
            self.default_carriages = default as usize;
        }
        if self.min_carriages > self.max_carriages {
            return Err(format!(
                "min_carriages ({}) exceeds max_carriages ({})",
                self.min_carriages, self.max_carriages
            ));
        }

        // [rotation] section
        let angles = &mut self.angles;
        for (key, slot) in [
            ("bottom", &mut angles.bottom),
            ("right", &mut angles.right),
            ("top", &mut angles.top),
            ("left", &mut angles.left),
            ("level", &mut angles.level),
            ("climb", &mut angles.climb),
            ("descend", &mut angles.descend),
        ] {
            if let Some(value) = config.getfloat("rotation", key).ok().flatten() {
                *slot = value as f32;
            }
        }

        // [crop] section
        if let Some(head) = config.get("crop", "head") {
            self.crops.head = parse_rect(&head)?;
        }
        if let Some(body) = config.get("crop", "body") {
            self.crops.body = parse_rect(&body)?;
        }
        if let Some(tail) = config.get("crop", "tail") {
            self.crops.tail = parse_rect(&tail)?;
        }

        info!(
            "Loaded config: mode={}, speed={}, step={}, margin={}, scale={}, carriages={}..{} (default {})",
            self.mode,
            self.move_speed,
            self.vertical_step,
            self.window_margin,
            self.scale_factor,
            self.min_carriages,
            self.max_carriages,
            self.default_carriages
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("motion", "mode", Some(self.mode.to_string()));
        config.set("motion", "move_speed", Some(self.move_speed.to_string()));
        config.set("motion", "vertical_step", Some(self.vertical_step.to_string()));
        config.set("motion", "window_margin", Some(self.window_margin.to_string()));
        config.set("motion", "tick_ms", Some(self.tick_ms.to_string()));

        config.set("render", "scale_factor", Some(self.scale_factor.to_string()));
        config.set("render", "native_facing", Some(self.native_facing.to_string()));
        config.set("render", "cache_capacity", Some(self.cache_capacity.to_string()));

        config.set("train", "min_carriages", Some(self.min_carriages.to_string()));
        config.set("train", "max_carriages", Some(self.max_carriages.to_string()));
        config.set(
            "train",
            "default_carriages",
            Some(self.default_carriages.to_string()),
        );

        let a = &self.angles;
        for (key, value) in [
            ("bottom", a.bottom),
            ("right", a.right),
            ("top", a.top),
            ("left", a.left),
            ("level", a.level),
            ("climb", a.climb),
            ("descend", a.descend),
        ] {
            config.set("rotation", key, Some(value.to_string()));
        }

        config.set("crop", "head", Some(format_rect(&self.crops.head)));
        config.set("crop", "body", Some(format_rect(&self.crops.body)));
        config.set("crop", "tail", Some(format_rect(&self.crops.tail)));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = PetConfig::new();
        assert_eq!(cfg.mode, MotionMode::Border);
        assert_eq!(cfg.move_speed, 5);
        assert_eq!(cfg.vertical_step, 50);
        assert_eq!(cfg.default_carriages, 3);
        assert_eq!(cfg.crops.head, Rect::new(9, 0, 1271, 255));
    }

    #[test]
    fn clamp_carriages_respects_bounds() {
        let cfg = PetConfig::new();
        assert_eq!(cfg.clamp_carriages(0), 1);
        assert_eq!(cfg.clamp_carriages(4), 4);
        assert_eq!(cfg.clamp_carriages(99), 10);
    }

    #[test]
    fn parse_rect_accepts_four_numbers() {
        assert_eq!(parse_rect(" 1, 2,3 ,4").unwrap(), Rect::new(1, 2, 3, 4));
        assert!(parse_rect("1,2,3").is_err());
        assert!(parse_rect("a,b,c,d").is_err());
    }

    #[test]
    fn load_overrides_only_present_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[motion]\nmode = sweep\nmove_speed = 7\n\n[rotation]\ntop = 0\n\n[crop]\nhead = 0,0,10,20\n"
        )
        .unwrap();

        let mut cfg = PetConfig::with_path(file.path());
        cfg.load_from_file().unwrap();

        assert_eq!(cfg.mode, MotionMode::Sweep);
        assert_eq!(cfg.move_speed, 7);
        assert_eq!(cfg.vertical_step, 50);
        assert_eq!(cfg.angles.top, 0.0);
        assert_eq!(cfg.angles.right, 270.0);
        assert_eq!(cfg.crops.head, Rect::new(0, 0, 10, 20));
    }

    #[test]
    fn load_rejects_unknown_mode() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[motion]\nmode = zigzag\n").unwrap();
        let mut cfg = PetConfig::with_path(file.path());
        assert!(cfg.load_from_file().is_err());
    }

    #[test]
    fn load_rejects_speed_that_never_arrives() {
        for bad in ["move_speed = 0", "move_speed = -5", "vertical_step = 0", "window_margin = -1"] {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "[motion]\n{}\n", bad).unwrap();
            let mut cfg = PetConfig::with_path(file.path());
            let err = cfg.load_from_file().unwrap_err();
            assert!(err.contains("must be at least"), "{bad}: {err}");
        }
    }

    #[test]
    fn load_accepts_zero_margin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[motion]\nwindow_margin = 0\nmove_speed = 1\n").unwrap();
        let mut cfg = PetConfig::with_path(file.path());
        cfg.load_from_file().unwrap();
        assert_eq!(cfg.window_margin, 0);
        assert_eq!(cfg.move_speed, 1);
    }

    #[test]
    fn load_rejects_inverted_carriage_range() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[train]\nmin_carriages = 5\nmax_carriages = 2\n").unwrap();
        let mut cfg = PetConfig::with_path(file.path());
        assert!(cfg.load_from_file().is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut cfg = PetConfig::with_path("/nonexistent/trainpet.ini");
        assert!(cfg.load_from_file().is_err());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pet.ini");

        let mut saved = PetConfig::with_path(&path);
        saved.mode = MotionMode::Sweep;
        saved.window_margin = 33;
        saved.native_facing = Facing::Right;
        saved.crops.tail = Rect::new(1, 2, 3, 4);
        saved.save_to_file().unwrap();

        let mut loaded = PetConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded.mode, MotionMode::Sweep);
        assert_eq!(loaded.window_margin, 33);
        assert_eq!(loaded.native_facing, Facing::Right);
        assert_eq!(loaded.crops.tail, Rect::new(1, 2, 3, 4));
        assert_eq!(loaded.angles, RotationAngles::default());
    }
}
