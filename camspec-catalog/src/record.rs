//! The typed camera record and its builder.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::field::{CameraField, FieldKind, UnknownField};
use crate::value::{FieldValue, RawRecord};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("{0}")]
    UnknownField(#[from] UnknownField),
    #[error("Type mismatch for '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        field: CameraField,
        expected: FieldKind,
        found: FieldKind,
    },
    #[error("Missing required field: {0}")]
    MissingField(CameraField),
}

/// One camera's technical specifications.
///
/// Instances are built through [`CameraRecordBuilder`] and are not mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRecord {
    pub brand: String,
    pub model: String,
    pub sensor_size_w: f64,
    pub sensor_size_h: f64,
    pub sensor_px_w: i64,
    pub sensor_px_h: i64,

    pub url: Option<String>,
    pub image_url: Option<String>,
    pub also_known_as: Option<String>,
    pub year: Option<i64>,
    pub megapixels: Option<f64>,
    pub effective_megapixels: Option<f64>,
    pub total_megapixels: Option<f64>,
    /// Original text the `sensor_size_*` dimensions were parsed from.
    pub sensor_size: Option<String>,
    pub sensor_type: Option<String>,
    /// Original text the `sensor_px_*` dimensions were parsed from.
    pub sensor_resolution: Option<String>,
    pub max_image_resolution: Option<String>,
    pub crop_factor: Option<f64>,
    pub optical_zoom: Option<f64>,
    pub digital_zoom: Option<String>,
    pub iso: Option<Vec<String>>,
    pub raw_support: Option<bool>,
    pub manual_focus: Option<bool>,
    pub normal_focus_range: Option<String>,
    pub macro_focus_range: Option<String>,
    pub focal_length_35: Option<String>,
    pub aperture_priority: Option<bool>,
    pub max_aperture: Option<String>,
    pub max_aperture_35: Option<String>,
    pub depth_of_field: Option<String>,
    pub metering: Option<String>,
    pub exposure_compensation: Option<String>,
    pub shutter_priority: Option<bool>,
    pub min_shutter_speed: Option<String>,
    pub max_shutter_speed: Option<String>,
    pub built_in_flash: Option<bool>,
    pub external_flash: Option<bool>,
    pub viewfinder: Option<String>,
    pub white_balance_presets: Option<bool>,
    pub screen_size: Option<String>,
    pub screen_resolution: Option<String>,
    pub video_capture: Option<bool>,
    pub max_video_resolution: Option<String>,
    pub storage_types: Option<String>,
    pub usb: Option<String>,
    pub hdmi: Option<bool>,
    pub wireless: Option<bool>,
    pub gps: Option<String>,
    pub battery: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
}

impl CameraRecord {
    pub fn builder() -> CameraRecordBuilder {
        CameraRecordBuilder::new()
    }

    /// Build a record from a loosely keyed mapping, rejecting unknown keys.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, RecordError> {
        CameraRecordBuilder::from_raw(raw)?.build()
    }

    /// Sensor diagonal in millimetres.
    pub fn diagonal_size_mm(&self) -> f64 {
        self.sensor_size_w.hypot(self.sensor_size_h)
    }

    /// Sensor diagonal in pixels.
    pub fn diagonal_size_px(&self) -> f64 {
        (self.sensor_px_w as f64).hypot(self.sensor_px_h as f64)
    }

    /// `(size_w, size_h, px_w, px_h)`.
    pub fn sensor(&self) -> (f64, f64, i64, i64) {
        (
            self.sensor_size_w,
            self.sensor_size_h,
            self.sensor_px_w,
            self.sensor_px_h,
        )
    }

    /// The value of `field`, or `None` when it is null.
    pub fn get(&self, field: CameraField) -> Option<FieldValue> {
        use CameraField as F;

        fn text(v: &Option<String>) -> Option<FieldValue> {
            v.clone().map(FieldValue::Text)
        }
        fn int(v: &Option<i64>) -> Option<FieldValue> {
            v.map(FieldValue::Integer)
        }
        fn real(v: &Option<f64>) -> Option<FieldValue> {
            v.map(FieldValue::Real)
        }
        fn flag(v: &Option<bool>) -> Option<FieldValue> {
            v.map(FieldValue::Bool)
        }

        match field {
            F::Brand => Some(FieldValue::Text(self.brand.clone())),
            F::Model => Some(FieldValue::Text(self.model.clone())),
            F::SensorSizeW => Some(FieldValue::Real(self.sensor_size_w)),
            F::SensorSizeH => Some(FieldValue::Real(self.sensor_size_h)),
            F::SensorPxW => Some(FieldValue::Integer(self.sensor_px_w)),
            F::SensorPxH => Some(FieldValue::Integer(self.sensor_px_h)),

            F::Url => text(&self.url),
            F::ImageUrl => text(&self.image_url),
            F::AlsoKnownAs => text(&self.also_known_as),
            F::Year => int(&self.year),
            F::Megapixels => real(&self.megapixels),
            F::EffectiveMegapixels => real(&self.effective_megapixels),
            F::TotalMegapixels => real(&self.total_megapixels),
            F::SensorSize => text(&self.sensor_size),
            F::SensorType => text(&self.sensor_type),
            F::SensorResolution => text(&self.sensor_resolution),
            F::MaxImageResolution => text(&self.max_image_resolution),
            F::CropFactor => real(&self.crop_factor),
            F::OpticalZoom => real(&self.optical_zoom),
            F::DigitalZoom => text(&self.digital_zoom),
            F::Iso => self.iso.clone().map(FieldValue::List),
            F::RawSupport => flag(&self.raw_support),
            F::ManualFocus => flag(&self.manual_focus),
            F::NormalFocusRange => text(&self.normal_focus_range),
            F::MacroFocusRange => text(&self.macro_focus_range),
            F::FocalLength35 => text(&self.focal_length_35),
            F::AperturePriority => flag(&self.aperture_priority),
            F::MaxAperture => text(&self.max_aperture),
            F::MaxAperture35 => text(&self.max_aperture_35),
            F::DepthOfField => text(&self.depth_of_field),
            F::Metering => text(&self.metering),
            F::ExposureCompensation => text(&self.exposure_compensation),
            F::ShutterPriority => flag(&self.shutter_priority),
            F::MinShutterSpeed => text(&self.min_shutter_speed),
            F::MaxShutterSpeed => text(&self.max_shutter_speed),
            F::BuiltInFlash => flag(&self.built_in_flash),
            F::ExternalFlash => flag(&self.external_flash),
            F::Viewfinder => text(&self.viewfinder),
            F::WhiteBalancePresets => flag(&self.white_balance_presets),
            F::ScreenSize => text(&self.screen_size),
            F::ScreenResolution => text(&self.screen_resolution),
            F::VideoCapture => flag(&self.video_capture),
            F::MaxVideoResolution => text(&self.max_video_resolution),
            F::StorageTypes => text(&self.storage_types),
            F::Usb => text(&self.usb),
            F::Hdmi => flag(&self.hdmi),
            F::Wireless => flag(&self.wireless),
            F::Gps => text(&self.gps),
            F::Battery => text(&self.battery),
            F::Weight => text(&self.weight),
            F::Dimensions => text(&self.dimensions),
        }
    }

    /// All non-null values, in table column order.
    pub fn fields(&self) -> Vec<(CameraField, FieldValue)> {
        CameraField::ALL
            .iter()
            .filter_map(|&f| self.get(f).map(|v| (f, v)))
            .collect()
    }
}

/// Accumulates validated field values and produces a [`CameraRecord`].
#[derive(Debug, Default, Clone)]
pub struct CameraRecordBuilder {
    values: BTreeMap<CameraField, FieldValue>,
}

impl CameraRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder from every entry of `raw`.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, RecordError> {
        let mut builder = Self::new();
        for (key, value) in raw {
            builder.set_key(key, value.clone())?;
        }
        Ok(builder)
    }

    /// Set a field after checking the value against the field's kind.
    ///
    /// An integer is accepted for a real-valued field, and comma-joined text
    /// is accepted for a list field. Any other mismatch is an error. An empty
    /// list leaves the field null.
    pub fn set(
        &mut self,
        field: CameraField,
        value: impl Into<FieldValue>,
    ) -> Result<&mut Self, RecordError> {
        let value = value.into();
        let expected = field.kind();
        let value = match (expected, value) {
            (FieldKind::Real, FieldValue::Integer(n)) => FieldValue::Real(n as f64),
            (FieldKind::List, FieldValue::Text(s)) => FieldValue::List(FieldValue::split_list(&s)),
            (kind, value) if value.kind() == kind => value,
            (_, value) => {
                return Err(RecordError::TypeMismatch {
                    field,
                    expected,
                    found: value.kind(),
                });
            }
        };
        match value {
            FieldValue::List(items) if items.is_empty() => {
                self.values.remove(&field);
            }
            value => {
                self.values.insert(field, value);
            }
        }
        Ok(self)
    }

    /// Set a field by column name.
    pub fn set_key(&mut self, key: &str, value: FieldValue) -> Result<&mut Self, RecordError> {
        let field: CameraField = key.parse()?;
        self.set(field, value)
    }

    pub fn build(self) -> Result<CameraRecord, RecordError> {
        use CameraField as F;

        if let Some(&missing) = CameraField::ALL
            .iter()
            .find(|f| f.is_required() && !self.values.contains_key(f))
        {
            return Err(RecordError::MissingField(missing));
        }

        // Kinds were checked in `set`, so each accessor only sees its own variant.
        let mut v = self.values;
        let mut text = |f: CameraField| match v.remove(&f) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        };
        let brand = text(F::Brand).unwrap_or_default();
        let model = text(F::Model).unwrap_or_default();
        let url = text(F::Url);
        let image_url = text(F::ImageUrl);
        let also_known_as = text(F::AlsoKnownAs);
        let sensor_size = text(F::SensorSize);
        let sensor_type = text(F::SensorType);
        let sensor_resolution = text(F::SensorResolution);
        let max_image_resolution = text(F::MaxImageResolution);
        let digital_zoom = text(F::DigitalZoom);
        let normal_focus_range = text(F::NormalFocusRange);
        let macro_focus_range = text(F::MacroFocusRange);
        let focal_length_35 = text(F::FocalLength35);
        let max_aperture = text(F::MaxAperture);
        let max_aperture_35 = text(F::MaxAperture35);
        let depth_of_field = text(F::DepthOfField);
        let metering = text(F::Metering);
        let exposure_compensation = text(F::ExposureCompensation);
        let min_shutter_speed = text(F::MinShutterSpeed);
        let max_shutter_speed = text(F::MaxShutterSpeed);
        let viewfinder = text(F::Viewfinder);
        let screen_size = text(F::ScreenSize);
        let screen_resolution = text(F::ScreenResolution);
        let max_video_resolution = text(F::MaxVideoResolution);
        let storage_types = text(F::StorageTypes);
        let usb = text(F::Usb);
        let gps = text(F::Gps);
        let battery = text(F::Battery);
        let weight = text(F::Weight);
        let dimensions = text(F::Dimensions);

        let int = |f: CameraField| match v.get(&f) {
            Some(FieldValue::Integer(n)) => Some(*n),
            _ => None,
        };
        let real = |f: CameraField| match v.get(&f) {
            Some(FieldValue::Real(x)) => Some(*x),
            _ => None,
        };
        let flag = |f: CameraField| match v.get(&f) {
            Some(FieldValue::Bool(b)) => Some(*b),
            _ => None,
        };

        Ok(CameraRecord {
            brand,
            model,
            sensor_size_w: real(F::SensorSizeW).unwrap_or_default(),
            sensor_size_h: real(F::SensorSizeH).unwrap_or_default(),
            sensor_px_w: int(F::SensorPxW).unwrap_or_default(),
            sensor_px_h: int(F::SensorPxH).unwrap_or_default(),
            url,
            image_url,
            also_known_as,
            year: int(F::Year),
            megapixels: real(F::Megapixels),
            effective_megapixels: real(F::EffectiveMegapixels),
            total_megapixels: real(F::TotalMegapixels),
            sensor_size,
            sensor_type,
            sensor_resolution,
            max_image_resolution,
            crop_factor: real(F::CropFactor),
            optical_zoom: real(F::OpticalZoom),
            digital_zoom,
            iso: match v.get(&F::Iso) {
                Some(FieldValue::List(items)) => Some(items.clone()),
                _ => None,
            },
            raw_support: flag(F::RawSupport),
            manual_focus: flag(F::ManualFocus),
            normal_focus_range,
            macro_focus_range,
            focal_length_35,
            aperture_priority: flag(F::AperturePriority),
            max_aperture,
            max_aperture_35,
            depth_of_field,
            metering,
            exposure_compensation,
            shutter_priority: flag(F::ShutterPriority),
            min_shutter_speed,
            max_shutter_speed,
            built_in_flash: flag(F::BuiltInFlash),
            external_flash: flag(F::ExternalFlash),
            viewfinder,
            white_balance_presets: flag(F::WhiteBalancePresets),
            screen_size,
            screen_resolution,
            video_capture: flag(F::VideoCapture),
            max_video_resolution,
            storage_types,
            usb,
            hdmi: flag(F::Hdmi),
            wireless: flag(F::Wireless),
            gps,
            battery,
            weight,
            dimensions,
        })
    }
}
