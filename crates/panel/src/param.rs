use haunted_common::{Color, ColorError};
use std::str::FromStr;

/// Errors from parameter lookup and assignment.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PanelError {
    #[error("unknown parameter {0:?}")]
    UnknownParameter(String),
    #[error("parameter {id} expects a {expected} value")]
    KindMismatch { id: ParamId, expected: &'static str },
    #[error("assignment {0:?} must look like name=value")]
    MalformedAssignment(String),
    #[error("invalid number {value:?} for {id}")]
    BadNumber { id: ParamId, value: String },
    #[error("invalid color for {id}: {source}")]
    BadColor {
        id: ParamId,
        #[source]
        source: ColorError,
    },
}

/// The panel's parameters, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    AmbientIntensity,
    MoonIntensity,
    DoorIntensity,
    FogColor,
    FogNear,
    FogFar,
}

/// Folder a control is grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folder {
    Lighting,
    Fog,
}

impl Folder {
    pub fn title(self) -> &'static str {
        match self {
            Self::Lighting => "Lighting",
            Self::Fog => "Fog Settings",
        }
    }
}

/// Kind and bounds of a control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlSpec {
    Range { min: f32, max: f32, step: f32 },
    Color,
}

impl ControlSpec {
    /// Clamp a scalar into the control's range, as a slider would.
    pub fn clamp(&self, v: f32) -> f32 {
        match *self {
            Self::Range { min, max, .. } => v.clamp(min, max),
            Self::Color => v,
        }
    }
}

/// A value carried by a control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Scalar(f32),
    Color(Color),
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{v}"),
            Self::Color(c) => write!(f, "{c}"),
        }
    }
}

impl ParamId {
    pub const ALL: [Self; 6] = [
        Self::AmbientIntensity,
        Self::MoonIntensity,
        Self::DoorIntensity,
        Self::FogColor,
        Self::FogNear,
        Self::FogFar,
    ];

    /// Stable key used on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Self::AmbientIntensity => "ambientIntensity",
            Self::MoonIntensity => "moonIntensity",
            Self::DoorIntensity => "doorIntensity",
            Self::FogColor => "fogColor",
            Self::FogNear => "fogNear",
            Self::FogFar => "fogFar",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AmbientIntensity => "Ambient Light",
            Self::MoonIntensity => "Moon Light",
            Self::DoorIntensity => "Door Light",
            Self::FogColor => "Fog Color",
            Self::FogNear => "Fog Near",
            Self::FogFar => "Fog Far",
        }
    }

    pub fn folder(self) -> Folder {
        match self {
            Self::AmbientIntensity | Self::MoonIntensity | Self::DoorIntensity => Folder::Lighting,
            Self::FogColor | Self::FogNear | Self::FogFar => Folder::Fog,
        }
    }

    pub fn spec(self) -> ControlSpec {
        let range = |min, max, step| ControlSpec::Range { min, max, step };
        match self {
            Self::AmbientIntensity | Self::MoonIntensity => range(0.0, 1.0, 0.01),
            Self::DoorIntensity => range(0.0, 2.0, 0.01),
            Self::FogColor => ControlSpec::Color,
            Self::FogNear => range(0.0, 5.0, 0.1),
            Self::FogFar => range(5.0, 30.0, 0.1),
        }
    }

    /// Parse a textual value for this parameter: a number, or `#rrggbb` for colors.
    pub fn parse_value(self, s: &str) -> Result<ParamValue, PanelError> {
        match self.spec() {
            ControlSpec::Color => s
                .parse::<Color>()
                .map(ParamValue::Color)
                .map_err(|source| PanelError::BadColor { id: self, source }),
            ControlSpec::Range { .. } => s
                .trim()
                .parse::<f32>()
                .map(ParamValue::Scalar)
                .map_err(|_| PanelError::BadNumber {
                    id: self,
                    value: s.to_string(),
                }),
        }
    }
}

impl std::fmt::Display for ParamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ParamId {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.key() == s)
            .ok_or_else(|| PanelError::UnknownParameter(s.to_string()))
    }
}

/// Parse `name=value`, e.g. `fogNear=2` or `fogColor=#000000`.
pub fn parse_assignment(s: &str) -> Result<(ParamId, ParamValue), PanelError> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| PanelError::MalformedAssignment(s.to_string()))?;
    let id: ParamId = name.trim().parse()?;
    let value = id.parse_value(value.trim())?;
    Ok((id, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_bounds() {
        assert_eq!(
            ParamId::DoorIntensity.spec(),
            ControlSpec::Range {
                min: 0.0,
                max: 2.0,
                step: 0.01
            }
        );
        assert_eq!(
            ParamId::FogFar.spec(),
            ControlSpec::Range {
                min: 5.0,
                max: 30.0,
                step: 0.1
            }
        );
        assert_eq!(ParamId::FogColor.spec(), ControlSpec::Color);
    }

    #[test]
    fn keys_round_trip() {
        for id in ParamId::ALL {
            assert_eq!(id.key().parse::<ParamId>().unwrap(), id);
        }
        assert_eq!(
            "fogDensity".parse::<ParamId>(),
            Err(PanelError::UnknownParameter("fogDensity".into()))
        );
    }

    #[test]
    fn folders_group_lights_and_fog() {
        let lighting: Vec<ParamId> = ParamId::ALL
            .into_iter()
            .filter(|id| id.folder() == Folder::Lighting)
            .collect();
        assert_eq!(lighting.len(), 3);
        assert_eq!(Folder::Fog.title(), "Fog Settings");
    }

    #[test]
    fn parses_assignments() {
        assert_eq!(
            parse_assignment("fogNear=2").unwrap(),
            (ParamId::FogNear, ParamValue::Scalar(2.0))
        );
        let (id, v) = parse_assignment("fogColor = #000000").unwrap();
        assert_eq!(id, ParamId::FogColor);
        assert_eq!(v, ParamValue::Color(Color::BLACK));
    }

    #[test]
    fn rejects_bad_assignments() {
        assert!(matches!(
            parse_assignment("fogNear"),
            Err(PanelError::MalformedAssignment(_))
        ));
        assert!(matches!(
            parse_assignment("fogNear=close"),
            Err(PanelError::BadNumber { .. })
        ));
        assert!(matches!(
            parse_assignment("fogColor=red"),
            Err(PanelError::BadColor { .. })
        ));
    }

    #[test]
    fn clamp_respects_range() {
        let spec = ParamId::FogFar.spec();
        assert_eq!(spec.clamp(1.0), 5.0);
        assert_eq!(spec.clamp(40.0), 30.0);
        assert_eq!(spec.clamp(12.5), 12.5);
    }
}
