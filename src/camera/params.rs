/// Camera settings kept per device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    Saturation,
    Brightness,
    Contrast,
    Sharpness,
    Reverse,
    Effect,
    Ev,
    Zoom,
    AntiFlicker,
    Iso,
    Gain,
    WhiteBalance,
    Backlight,
    Nightmode,
    ExposureCeiling,
    AutoControlHold,
}

impl ParameterKind {
    pub const ALL: [ParameterKind; 16] = [
        ParameterKind::Saturation,
        ParameterKind::Brightness,
        ParameterKind::Contrast,
        ParameterKind::Sharpness,
        ParameterKind::Reverse,
        ParameterKind::Effect,
        ParameterKind::Ev,
        ParameterKind::Zoom,
        ParameterKind::AntiFlicker,
        ParameterKind::Iso,
        ParameterKind::Gain,
        ParameterKind::WhiteBalance,
        ParameterKind::Backlight,
        ParameterKind::Nightmode,
        ParameterKind::ExposureCeiling,
        ParameterKind::AutoControlHold,
    ];

    /// Value reported before any successful set
    pub fn default_value(&self) -> i32 {
        match self {
            ParameterKind::Brightness | ParameterKind::Contrast => 127,
            // 1.0x sharpness
            ParameterKind::Sharpness => 1,
            // 1.0x zoom, in tenths
            ParameterKind::Zoom => 10,
            // automatic
            ParameterKind::AntiFlicker | ParameterKind::Iso => 1,
            _ => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParameterKind::Saturation => "saturation",
            ParameterKind::Brightness => "brightness",
            ParameterKind::Contrast => "contrast",
            ParameterKind::Sharpness => "sharpness",
            ParameterKind::Reverse => "reverse",
            ParameterKind::Effect => "effect",
            ParameterKind::Ev => "ev",
            ParameterKind::Zoom => "zoom",
            ParameterKind::AntiFlicker => "anti_flicker",
            ParameterKind::Iso => "iso",
            ParameterKind::Gain => "gain",
            ParameterKind::WhiteBalance => "white_balance",
            ParameterKind::Backlight => "backlight",
            ParameterKind::Nightmode => "nightmode",
            ParameterKind::ExposureCeiling => "exposure_ceiling",
            ParameterKind::AutoControlHold => "auto_control_hold",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Flat per-device parameter block. Values are stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterStore {
    values: [i32; 16],
}

impl ParameterStore {
    pub fn new() -> Self {
        let mut values = [0; 16];
        for kind in ParameterKind::ALL {
            values[kind.index()] = kind.default_value();
        }
        Self { values }
    }

    pub fn get(&self, kind: ParameterKind) -> i32 {
        self.values[kind.index()]
    }

    pub fn set(&mut self, kind: ParameterKind, value: i32) {
        self.values[kind.index()] = value;
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}
