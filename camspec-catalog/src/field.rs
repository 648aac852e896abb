/// Column identifiers for the `cameras` table.
///
/// This enum is the closed set of queryable and persistable fields. Callers
/// name columns through it rather than through raw strings, so an unknown
/// column is rejected when the name is parsed instead of when the store
/// executes a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CameraField {
    // Identity
    Url,
    ImageUrl,
    Brand,
    Model,
    AlsoKnownAs,
    Year,

    // Imaging
    Megapixels,
    EffectiveMegapixels,
    TotalMegapixels,
    SensorSize,
    SensorType,
    SensorResolution,
    MaxImageResolution,
    CropFactor,
    OpticalZoom,
    DigitalZoom,
    Iso,
    RawSupport,

    // Focus and exposure
    ManualFocus,
    NormalFocusRange,
    MacroFocusRange,
    FocalLength35,
    AperturePriority,
    MaxAperture,
    MaxAperture35,
    DepthOfField,
    Metering,
    ExposureCompensation,
    ShutterPriority,
    MinShutterSpeed,
    MaxShutterSpeed,

    // Body
    BuiltInFlash,
    ExternalFlash,
    Viewfinder,
    WhiteBalancePresets,
    ScreenSize,
    ScreenResolution,
    VideoCapture,
    MaxVideoResolution,
    StorageTypes,
    Usb,
    Hdmi,
    Wireless,
    Gps,
    Battery,
    Weight,
    Dimensions,

    // Derived from sensor_size / sensor_resolution
    SensorSizeW,
    SensorSizeH,
    SensorPxW,
    SensorPxH,
}

/// All fields in table column order.
const ALL_FIELDS: &[CameraField] = &[
    CameraField::Url,
    CameraField::ImageUrl,
    CameraField::Brand,
    CameraField::Model,
    CameraField::AlsoKnownAs,
    CameraField::Year,
    CameraField::Megapixels,
    CameraField::EffectiveMegapixels,
    CameraField::TotalMegapixels,
    CameraField::SensorSize,
    CameraField::SensorType,
    CameraField::SensorResolution,
    CameraField::MaxImageResolution,
    CameraField::CropFactor,
    CameraField::OpticalZoom,
    CameraField::DigitalZoom,
    CameraField::Iso,
    CameraField::RawSupport,
    CameraField::ManualFocus,
    CameraField::NormalFocusRange,
    CameraField::MacroFocusRange,
    CameraField::FocalLength35,
    CameraField::AperturePriority,
    CameraField::MaxAperture,
    CameraField::MaxAperture35,
    CameraField::DepthOfField,
    CameraField::Metering,
    CameraField::ExposureCompensation,
    CameraField::ShutterPriority,
    CameraField::MinShutterSpeed,
    CameraField::MaxShutterSpeed,
    CameraField::BuiltInFlash,
    CameraField::ExternalFlash,
    CameraField::Viewfinder,
    CameraField::WhiteBalancePresets,
    CameraField::ScreenSize,
    CameraField::ScreenResolution,
    CameraField::VideoCapture,
    CameraField::MaxVideoResolution,
    CameraField::StorageTypes,
    CameraField::Usb,
    CameraField::Hdmi,
    CameraField::Wireless,
    CameraField::Gps,
    CameraField::Battery,
    CameraField::Weight,
    CameraField::Dimensions,
    CameraField::SensorSizeW,
    CameraField::SensorSizeH,
    CameraField::SensorPxW,
    CameraField::SensorPxH,
];

/// Storage type of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Real,
    Bool,
    /// Ordered list of strings, stored as comma-joined text.
    List,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Bool => "boolean",
            Self::List => "list",
        }
    }

    /// SQLite column type used in the table DDL.
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::Text | Self::List => "TEXT",
            Self::Integer | Self::Bool => "INTEGER",
            Self::Real => "REAL",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CameraField {
    /// Every field, in table column order.
    pub const ALL: &'static [CameraField] = ALL_FIELDS;

    /// Column identifier in the `cameras` table and key in normalized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::ImageUrl => "image_url",
            Self::Brand => "brand",
            Self::Model => "model",
            Self::AlsoKnownAs => "also_known_as",
            Self::Year => "year",
            Self::Megapixels => "megapixels",
            Self::EffectiveMegapixels => "effective_megapixels",
            Self::TotalMegapixels => "total_megapixels",
            Self::SensorSize => "sensor_size",
            Self::SensorType => "sensor_type",
            Self::SensorResolution => "sensor_resolution",
            Self::MaxImageResolution => "max_image_resolution",
            Self::CropFactor => "crop_factor",
            Self::OpticalZoom => "optical_zoom",
            Self::DigitalZoom => "digital_zoom",
            Self::Iso => "iso",
            Self::RawSupport => "raw_support",
            Self::ManualFocus => "manual_focus",
            Self::NormalFocusRange => "normal_focus_range",
            Self::MacroFocusRange => "macro_focus_range",
            Self::FocalLength35 => "focal_length_35",
            Self::AperturePriority => "aperture_priority",
            Self::MaxAperture => "max_aperture",
            Self::MaxAperture35 => "max_aperture_35",
            Self::DepthOfField => "depth_of_field",
            Self::Metering => "metering",
            Self::ExposureCompensation => "exposure_compensation",
            Self::ShutterPriority => "shutter_priority",
            Self::MinShutterSpeed => "min_shutter_speed",
            Self::MaxShutterSpeed => "max_shutter_speed",
            Self::BuiltInFlash => "built_in_flash",
            Self::ExternalFlash => "external_flash",
            Self::Viewfinder => "viewfinder",
            Self::WhiteBalancePresets => "white_balance_presets",
            Self::ScreenSize => "screen_size",
            Self::ScreenResolution => "screen_resolution",
            Self::VideoCapture => "video_capture",
            Self::MaxVideoResolution => "max_video_resolution",
            Self::StorageTypes => "storage_types",
            Self::Usb => "usb",
            Self::Hdmi => "hdmi",
            Self::Wireless => "wireless",
            Self::Gps => "gps",
            Self::Battery => "battery",
            Self::Weight => "weight",
            Self::Dimensions => "dimensions",
            Self::SensorSizeW => "sensor_size_w",
            Self::SensorSizeH => "sensor_size_h",
            Self::SensorPxW => "sensor_px_w",
            Self::SensorPxH => "sensor_px_h",
        }
    }

    /// The value type this field holds.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Year | Self::SensorPxW | Self::SensorPxH => FieldKind::Integer,

            Self::Megapixels
            | Self::EffectiveMegapixels
            | Self::TotalMegapixels
            | Self::CropFactor
            | Self::OpticalZoom
            | Self::SensorSizeW
            | Self::SensorSizeH => FieldKind::Real,

            Self::RawSupport
            | Self::ManualFocus
            | Self::AperturePriority
            | Self::ShutterPriority
            | Self::BuiltInFlash
            | Self::ExternalFlash
            | Self::WhiteBalancePresets
            | Self::VideoCapture
            | Self::Hdmi
            | Self::Wireless => FieldKind::Bool,

            Self::Iso => FieldKind::List,

            _ => FieldKind::Text,
        }
    }

    /// Whether a record cannot be built without this field.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Self::Brand
                | Self::Model
                | Self::SensorSizeW
                | Self::SensorSizeH
                | Self::SensorPxW
                | Self::SensorPxH
        )
    }

    /// The capability flags that accept yes/no coercion.
    pub fn boolean_fields() -> impl Iterator<Item = CameraField> {
        ALL_FIELDS
            .iter()
            .copied()
            .filter(|f| f.kind() == FieldKind::Bool)
    }
}

impl std::fmt::Display for CameraField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a camera column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl std::fmt::Display for UnknownField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown camera field: '{}'", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl std::str::FromStr for CameraField {
    type Err = UnknownField;

    /// Parse a column identifier. Matching is exact: keys are already
    /// lower-case by the time they reach this point.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_FIELDS
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
