use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Orders at or below this weight ride a three-wheeler.
pub const LIGHT_LOAD_MAX_WEIGHT: i64 = 100;

/// Vehicle class assigned to an order.
///
/// Variants are declared in label order so that sorting by vehicle matches
/// sorting by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VehicleType {
    /// Three-wheeler, combustion
    ThreeWheeler,
    /// Three-wheeler, electric
    ThreeWheelerEv,
    /// Four-wheeler, combustion
    FourWheeler,
    /// Four-wheeler, electric
    FourWheelerEv,
}

impl VehicleType {
    pub const ALL: [VehicleType; 4] = [
        VehicleType::ThreeWheeler,
        VehicleType::ThreeWheelerEv,
        VehicleType::FourWheeler,
        VehicleType::FourWheelerEv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::ThreeWheeler => "3W",
            VehicleType::ThreeWheelerEv => "3W EV",
            VehicleType::FourWheeler => "4W",
            VehicleType::FourWheelerEv => "4W EV",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "3W" => Some(VehicleType::ThreeWheeler),
            "3W EV" => Some(VehicleType::ThreeWheelerEv),
            "4W" => Some(VehicleType::FourWheeler),
            "4W EV" => Some(VehicleType::FourWheelerEv),
            _ => None,
        }
    }

    /// Pick the vehicle for a load of `weight` units.
    pub fn for_load(weight: i64, electric: bool) -> Self {
        match (weight <= LIGHT_LOAD_MAX_WEIGHT, electric) {
            (true, false) => VehicleType::ThreeWheeler,
            (true, true) => VehicleType::ThreeWheelerEv,
            (false, false) => VehicleType::FourWheeler,
            (false, true) => VehicleType::FourWheelerEv,
        }
    }

    /// Tariff in currency units per kilometer.
    pub fn cost_per_km(&self) -> f64 {
        match self {
            VehicleType::ThreeWheeler => 6.0,
            VehicleType::ThreeWheelerEv => 4.0,
            VehicleType::FourWheeler => 10.0,
            VehicleType::FourWheelerEv => 7.0,
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Labels contain a space, so serde's rename_all cannot express them.
impl Serialize for VehicleType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VehicleType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        VehicleType::from_str(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown vehicle label: {label}")))
    }
}
