use crate::camera::{CameraInfo, CameraRead, DeviceLocation, ParameterKind};

/// Identifier of the camera library every export is imported from
pub const LIBRARY_NID: u32 = 0xDA91_B3ED;

/// One intercepted export of the camera library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    Open,
    Close,
    Start,
    Stop,
    Read,
    IsActive,
    GetDeviceLocation,
    GetParameter(ParameterKind),
    SetParameter(ParameterKind),
}

/// (kind, getter name, getter NID, setter name, setter NID)
const PARAMETER_EXPORTS: [(ParameterKind, &str, u32, &str, u32); 16] = [
    (
        ParameterKind::Saturation,
        "sceCameraGetSaturation",
        0x624F_7653,
        "sceCameraSetSaturation",
        0xF9F7_CA3D,
    ),
    (
        ParameterKind::Brightness,
        "sceCameraGetBrightness",
        0x85D5_951D,
        "sceCameraSetBrightness",
        0x98D7_1588,
    ),
    (
        ParameterKind::Contrast,
        "sceCameraGetContrast",
        0x8FBE_84BE,
        "sceCameraSetContrast",
        0x06FB_2900,
    ),
    (
        ParameterKind::Sharpness,
        "sceCameraGetSharpness",
        0xAA72_C3DC,
        "sceCameraSetSharpness",
        0xD1A5_BB0B,
    ),
    (
        ParameterKind::Reverse,
        "sceCameraGetReverse",
        0x44F6_043F,
        "sceCameraSetReverse",
        0x1175_F477,
    ),
    (
        ParameterKind::Effect,
        "sceCameraGetEffect",
        0x7E8E_F3B2,
        "sceCameraSetEffect",
        0xE9D2_CFB1,
    ),
    (
        ParameterKind::Ev,
        "sceCameraGetEV",
        0x8B5E_6147,
        "sceCameraSetEV",
        0x62AF_F0B8,
    ),
    (
        ParameterKind::Zoom,
        "sceCameraGetZoom",
        0x06D3_816C,
        "sceCameraSetZoom",
        0xF746_4216,
    ),
    (
        ParameterKind::AntiFlicker,
        "sceCameraGetAntiFlicker",
        0x9FDA_CB99,
        "sceCameraSetAntiFlicker",
        0xE312_958A,
    ),
    (
        ParameterKind::Iso,
        "sceCameraGetISO",
        0x4EBD_5C68,
        "sceCameraSetISO",
        0x3CF6_30A1,
    ),
    (
        ParameterKind::Gain,
        "sceCameraGetGain",
        0x2C36_D6F3,
        "sceCameraSetGain",
        0xE65C_FE86,
    ),
    (
        ParameterKind::WhiteBalance,
        "sceCameraGetWhiteBalance",
        0xDBFF_A1DA,
        "sceCameraSetWhiteBalance",
        0x4D45_14AC,
    ),
    (
        ParameterKind::Backlight,
        "sceCameraGetBacklight",
        0x8DD1_292B,
        "sceCameraSetBacklight",
        0xAE07_1044,
    ),
    (
        ParameterKind::Nightmode,
        "sceCameraGetNightmode",
        0x12B6_FF26,
        "sceCameraSetNightmode",
        0x3F26_233E,
    ),
    (
        ParameterKind::ExposureCeiling,
        "sceCameraGetExposureCeiling",
        0x5FA5_B1BB,
        "sceCameraSetExposureCeiling",
        0x04F3_4BEE,
    ),
    (
        ParameterKind::AutoControlHold,
        "sceCameraGetAutoControlHold",
        0x06A2_1BBB,
        "sceCameraSetAutoControlHold",
        0x3A0D_ABBD,
    ),
];

impl EntryPoint {
    /// Every intercepted export, in installation order
    pub fn all() -> impl Iterator<Item = EntryPoint> {
        [
            EntryPoint::Open,
            EntryPoint::Close,
            EntryPoint::Start,
            EntryPoint::Stop,
            EntryPoint::Read,
            EntryPoint::IsActive,
            EntryPoint::GetDeviceLocation,
        ]
        .into_iter()
        .chain(
            ParameterKind::ALL
                .into_iter()
                .flat_map(|kind| [EntryPoint::GetParameter(kind), EntryPoint::SetParameter(kind)]),
        )
    }

    pub fn export_nid(&self) -> u32 {
        match self {
            EntryPoint::Open => 0xA462_F801,
            EntryPoint::Close => 0xCD6E_1CFC,
            EntryPoint::Start => 0xA8FE_AE35,
            EntryPoint::Stop => 0x1DD9_C9CE,
            EntryPoint::Read => 0x79B5_C2DE,
            EntryPoint::IsActive => 0x103A_75B8,
            EntryPoint::GetDeviceLocation => 0x274E_F751,
            EntryPoint::GetParameter(kind) => parameter_export(*kind).2,
            EntryPoint::SetParameter(kind) => parameter_export(*kind).4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EntryPoint::Open => "sceCameraOpen",
            EntryPoint::Close => "sceCameraClose",
            EntryPoint::Start => "sceCameraStart",
            EntryPoint::Stop => "sceCameraStop",
            EntryPoint::Read => "sceCameraRead",
            EntryPoint::IsActive => "sceCameraIsActive",
            EntryPoint::GetDeviceLocation => "sceCameraGetDeviceLocation",
            EntryPoint::GetParameter(kind) => parameter_export(*kind).1,
            EntryPoint::SetParameter(kind) => parameter_export(*kind).3,
        }
    }
}

fn parameter_export(kind: ParameterKind) -> (ParameterKind, &'static str, u32, &'static str, u32) {
    PARAMETER_EXPORTS[kind as usize]
}

/// Arguments of one intercepted call. Output pointers the caller passed as
/// null are `None`.
#[derive(Debug)]
pub enum CameraCall<'a> {
    Open {
        devnum: i32,
        info: Option<&'a mut CameraInfo>,
    },
    Close {
        devnum: i32,
    },
    Start {
        devnum: i32,
    },
    Stop {
        devnum: i32,
    },
    Read {
        devnum: i32,
        read: Option<&'a mut CameraRead>,
    },
    IsActive {
        devnum: i32,
    },
    GetDeviceLocation {
        devnum: i32,
        location: Option<&'a mut DeviceLocation>,
    },
    GetParameter {
        devnum: i32,
        kind: ParameterKind,
        value: Option<&'a mut i32>,
    },
    SetParameter {
        devnum: i32,
        kind: ParameterKind,
        value: i32,
    },
}

impl CameraCall<'_> {
    pub fn entry_point(&self) -> EntryPoint {
        match self {
            CameraCall::Open { .. } => EntryPoint::Open,
            CameraCall::Close { .. } => EntryPoint::Close,
            CameraCall::Start { .. } => EntryPoint::Start,
            CameraCall::Stop { .. } => EntryPoint::Stop,
            CameraCall::Read { .. } => EntryPoint::Read,
            CameraCall::IsActive { .. } => EntryPoint::IsActive,
            CameraCall::GetDeviceLocation { .. } => EntryPoint::GetDeviceLocation,
            CameraCall::GetParameter { kind, .. } => EntryPoint::GetParameter(*kind),
            CameraCall::SetParameter { kind, .. } => EntryPoint::SetParameter(*kind),
        }
    }

    pub fn devnum(&self) -> i32 {
        match self {
            CameraCall::Open { devnum, .. }
            | CameraCall::Close { devnum }
            | CameraCall::Start { devnum }
            | CameraCall::Stop { devnum }
            | CameraCall::Read { devnum, .. }
            | CameraCall::IsActive { devnum }
            | CameraCall::GetDeviceLocation { devnum, .. }
            | CameraCall::GetParameter { devnum, .. }
            | CameraCall::SetParameter { devnum, .. } => *devnum,
        }
    }
}
