use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ============================================================================
// Fabric Components
// ============================================================================

/// Structural element category with its own area and U-value column
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FabricComponent {
    Roof,
    Wall,
    Floor,
    Window,
    Door,
}

impl FabricComponent {
    /// Components a retrofit policy can target, in reporting order
    pub const RETROFITTABLE: [FabricComponent; 3] = [
        FabricComponent::Wall,
        FabricComponent::Roof,
        FabricComponent::Window,
    ];

    /// Name of the area column (m²)
    pub fn area_column(&self) -> &'static str {
        match self {
            FabricComponent::Roof => "roof_area",
            FabricComponent::Wall => "wall_area",
            FabricComponent::Floor => "floor_area",
            FabricComponent::Window => "window_area",
            FabricComponent::Door => "door_area",
        }
    }

    /// Name of the U-value column (W/m²K)
    pub fn uvalue_column(&self) -> &'static str {
        match self {
            FabricComponent::Roof => "roof_uvalue",
            FabricComponent::Wall => "wall_uvalue",
            FabricComponent::Floor => "floor_uvalue",
            FabricComponent::Window => "window_uvalue",
            FabricComponent::Door => "door_uvalue",
        }
    }

    /// Capitalised label used in output tables
    pub fn label(&self) -> &'static str {
        match self {
            FabricComponent::Roof => "Roof",
            FabricComponent::Wall => "Wall",
            FabricComponent::Floor => "Floor",
            FabricComponent::Window => "Window",
            FabricComponent::Door => "Door",
        }
    }

    pub fn is_retrofittable(&self) -> bool {
        Self::RETROFITTABLE.contains(self)
    }
}

/// Area and U-value of one component of one dwelling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FabricElement {
    /// Exposed area (m²)
    pub area: f64,
    /// Thermal transmittance (W/m²K)
    pub uvalue: f64,
}

impl FabricElement {
    pub fn new(area: f64, uvalue: f64) -> Self {
        Self { area, uvalue }
    }

    /// Steady-state plane heat loss through this element (W/K)
    pub fn heat_loss_w_k(&self) -> f64 {
        self.area * self.uvalue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_component_columns() {
        assert_eq!(FabricComponent::Wall.area_column(), "wall_area");
        assert_eq!(FabricComponent::Window.uvalue_column(), "window_uvalue");
        assert_eq!(FabricComponent::iter().count(), 5);
    }

    #[test]
    fn test_component_parse_and_display() {
        assert_eq!(FabricComponent::from_str("roof").unwrap(), FabricComponent::Roof);
        assert_eq!(FabricComponent::Door.to_string(), "door");
        assert_eq!(FabricComponent::Window.label(), "Window");
    }

    #[test]
    fn test_retrofittable_components() {
        assert!(FabricComponent::Wall.is_retrofittable());
        assert!(FabricComponent::Roof.is_retrofittable());
        assert!(FabricComponent::Window.is_retrofittable());
        assert!(!FabricComponent::Floor.is_retrofittable());
        assert!(!FabricComponent::Door.is_retrofittable());
    }

    #[test]
    fn test_element_heat_loss() {
        let element = FabricElement::new(70.0, 0.5);
        assert!((element.heat_loss_w_k() - 35.0).abs() < 1e-12);
    }
}
