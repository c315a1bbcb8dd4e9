//! Entity type names and the asset allow-list.
//!
//! STEP files spell entity types in upper case (`IFCWALLSTANDARDCASE`).
//! Stored rows and API responses use the schema spelling (`IfcWallStandardCase`),
//! so every product type we extract is listed here with its schema name.

/// How a product type is laid out past the common `IfcProduct` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    /// `IfcElement` subtype; attribute 7 is `Tag`.
    Element,
    /// `IfcSpatialElement` subtype; attribute 7 is `LongName`.
    Spatial,
    /// Any other `IfcProduct` (annotations, grids, ports, proxies).
    Other,
}

use ProductKind::{Element, Other, Spatial};

/// `IfcProduct` subtypes across IFC2X3, IFC4 and IFC4X3, grouped by family.
const PRODUCT_TYPES: &[(&str, ProductKind)] = &[
    // Spatial structure
    ("IfcSite", Spatial),
    ("IfcBuilding", Spatial),
    ("IfcBuildingStorey", Spatial),
    ("IfcSpace", Spatial),
    ("IfcExternalSpatialElement", Spatial),
    ("IfcSpatialZone", Spatial),
    ("IfcSpatialElement", Spatial),
    ("IfcSpatialStructureElement", Spatial),
    // Facilities (IFC4X3)
    ("IfcFacility", Spatial),
    ("IfcFacilityPart", Spatial),
    ("IfcFacilityPartCommon", Spatial),
    ("IfcBridge", Spatial),
    ("IfcBridgePart", Spatial),
    ("IfcRoad", Spatial),
    ("IfcRoadPart", Spatial),
    ("IfcRailway", Spatial),
    ("IfcRailwayPart", Spatial),
    ("IfcMarineFacility", Spatial),
    ("IfcMarinePart", Spatial),
    // Building elements
    ("IfcBeam", Element),
    ("IfcBeamStandardCase", Element),
    ("IfcBuildingElement", Element),
    ("IfcBuildingElementPart", Element),
    ("IfcBuildingElementProxy", Element),
    ("IfcChimney", Element),
    ("IfcColumn", Element),
    ("IfcColumnStandardCase", Element),
    ("IfcCovering", Element),
    ("IfcCurtainWall", Element),
    ("IfcDoor", Element),
    ("IfcDoorStandardCase", Element),
    ("IfcElement", Element),
    ("IfcElementAssembly", Element),
    ("IfcFooting", Element),
    ("IfcMember", Element),
    ("IfcMemberStandardCase", Element),
    ("IfcPile", Element),
    ("IfcPlate", Element),
    ("IfcPlateStandardCase", Element),
    ("IfcRailing", Element),
    ("IfcRamp", Element),
    ("IfcRampFlight", Element),
    ("IfcRoof", Element),
    ("IfcShadingDevice", Element),
    ("IfcSlab", Element),
    ("IfcSlabElementedCase", Element),
    ("IfcSlabStandardCase", Element),
    ("IfcStair", Element),
    ("IfcStairFlight", Element),
    ("IfcWall", Element),
    ("IfcWallElementedCase", Element),
    ("IfcWallStandardCase", Element),
    ("IfcWindow", Element),
    ("IfcWindowStandardCase", Element),
    // Components and reinforcement
    ("IfcDiscreteAccessory", Element),
    ("IfcFastener", Element),
    ("IfcMechanicalFastener", Element),
    ("IfcReinforcingBar", Element),
    ("IfcReinforcingMesh", Element),
    ("IfcTendon", Element),
    ("IfcTendonAnchor", Element),
    ("IfcVibrationIsolator", Element),
    // Furnishing
    ("IfcFurnishingElement", Element),
    ("IfcFurniture", Element),
    ("IfcSystemFurnitureElement", Element),
    // Openings and features
    ("IfcOpeningElement", Element),
    ("IfcOpeningStandardCase", Element),
    ("IfcProjectionElement", Element),
    ("IfcVoidingFeature", Element),
    ("IfcSurfaceFeature", Element),
    ("IfcFeatureElement", Element),
    ("IfcFeatureElementAddition", Element),
    ("IfcFeatureElementSubtraction", Element),
    // Other elements
    ("IfcCivilElement", Element),
    ("IfcGeographicElement", Element),
    ("IfcTransportElement", Element),
    ("IfcVirtualElement", Element),
    // Distribution (IFC2X3 generic)
    ("IfcDistributionElement", Element),
    ("IfcDistributionFlowElement", Element),
    ("IfcDistributionControlElement", Element),
    ("IfcDistributionChamberElement", Element),
    ("IfcEnergyConversionDevice", Element),
    ("IfcFlowController", Element),
    ("IfcFlowFitting", Element),
    ("IfcFlowMovingDevice", Element),
    ("IfcFlowSegment", Element),
    ("IfcFlowStorageDevice", Element),
    ("IfcFlowTerminal", Element),
    ("IfcFlowTreatmentDevice", Element),
    // Distribution (IFC4 specific)
    ("IfcActuator", Element),
    ("IfcAirTerminal", Element),
    ("IfcAirTerminalBox", Element),
    ("IfcAirToAirHeatRecovery", Element),
    ("IfcAlarm", Element),
    ("IfcAudioVisualAppliance", Element),
    ("IfcBoiler", Element),
    ("IfcBurner", Element),
    ("IfcCableCarrierFitting", Element),
    ("IfcCableCarrierSegment", Element),
    ("IfcCableFitting", Element),
    ("IfcCableSegment", Element),
    ("IfcChiller", Element),
    ("IfcCoil", Element),
    ("IfcCommunicationsAppliance", Element),
    ("IfcCompressor", Element),
    ("IfcCondenser", Element),
    ("IfcController", Element),
    ("IfcCooledBeam", Element),
    ("IfcCoolingTower", Element),
    ("IfcDamper", Element),
    ("IfcDuctFitting", Element),
    ("IfcDuctSegment", Element),
    ("IfcDuctSilencer", Element),
    ("IfcElectricAppliance", Element),
    ("IfcElectricDistributionBoard", Element),
    ("IfcElectricFlowStorageDevice", Element),
    ("IfcElectricGenerator", Element),
    ("IfcElectricMotor", Element),
    ("IfcElectricTimeControl", Element),
    ("IfcEngine", Element),
    ("IfcEvaporativeCooler", Element),
    ("IfcEvaporator", Element),
    ("IfcFan", Element),
    ("IfcFilter", Element),
    ("IfcFireSuppressionTerminal", Element),
    ("IfcFlowInstrument", Element),
    ("IfcFlowMeter", Element),
    ("IfcHeatExchanger", Element),
    ("IfcHumidifier", Element),
    ("IfcInterceptor", Element),
    ("IfcJunctionBox", Element),
    ("IfcLamp", Element),
    ("IfcLightFixture", Element),
    ("IfcMedicalDevice", Element),
    ("IfcMotorConnection", Element),
    ("IfcOutlet", Element),
    ("IfcPipeFitting", Element),
    ("IfcPipeSegment", Element),
    ("IfcProtectiveDevice", Element),
    ("IfcProtectiveDeviceTrippingUnit", Element),
    ("IfcPump", Element),
    ("IfcSanitaryTerminal", Element),
    ("IfcSensor", Element),
    ("IfcSolarDevice", Element),
    ("IfcSpaceHeater", Element),
    ("IfcStackTerminal", Element),
    ("IfcSwitchingDevice", Element),
    ("IfcTank", Element),
    ("IfcTransformer", Element),
    ("IfcTubeBundle", Element),
    ("IfcUnitaryControlElement", Element),
    ("IfcUnitaryEquipment", Element),
    ("IfcValve", Element),
    ("IfcWasteTerminal", Element),
    // IFC2X3-only elements
    ("IfcBuildingElementComponent", Element),
    ("IfcEdgeFeature", Element),
    ("IfcChamferEdgeFeature", Element),
    ("IfcRoundedEdgeFeature", Element),
    ("IfcElectricalElement", Element),
    ("IfcElectricDistributionPoint", Element),
    ("IfcEquipmentElement", Element),
    ("IfcReinforcingElement", Element),
    // Infrastructure elements (IFC4X3)
    ("IfcBearing", Element),
    ("IfcBorehole", Element),
    ("IfcBuiltElement", Element),
    ("IfcCaissonFoundation", Element),
    ("IfcConveyorSegment", Element),
    ("IfcCourse", Element),
    ("IfcDeepFoundation", Element),
    ("IfcDistributionBoard", Element),
    ("IfcEarthworksCut", Element),
    ("IfcEarthworksElement", Element),
    ("IfcEarthworksFill", Element),
    ("IfcElectricFlowTreatmentDevice", Element),
    ("IfcGeomodel", Element),
    ("IfcGeoslice", Element),
    ("IfcGeotechnicalAssembly", Element),
    ("IfcGeotechnicalElement", Element),
    ("IfcGeotechnicalStratum", Element),
    ("IfcImpactProtectionDevice", Element),
    ("IfcKerb", Element),
    ("IfcLiquidTerminal", Element),
    ("IfcMobileTelecommunicationsAppliance", Element),
    ("IfcNavigationElement", Element),
    ("IfcPavement", Element),
    ("IfcRail", Element),
    ("IfcReinforcedSoil", Element),
    ("IfcSign", Element),
    ("IfcSignal", Element),
    ("IfcTrackElement", Element),
    ("IfcVibrationDamper", Element),
    // Structural analysis items
    ("IfcStructuralItem", Other),
    ("IfcStructuralMember", Other),
    ("IfcStructuralCurveMember", Other),
    ("IfcStructuralCurveMemberVarying", Other),
    ("IfcStructuralSurfaceMember", Other),
    ("IfcStructuralSurfaceMemberVarying", Other),
    ("IfcStructuralConnection", Other),
    ("IfcStructuralPointConnection", Other),
    ("IfcStructuralCurveConnection", Other),
    ("IfcStructuralSurfaceConnection", Other),
    ("IfcStructuralActivity", Other),
    ("IfcStructuralAction", Other),
    ("IfcStructuralPointAction", Other),
    ("IfcStructuralLinearAction", Other),
    ("IfcStructuralLinearActionVarying", Other),
    ("IfcStructuralPlanarAction", Other),
    ("IfcStructuralPlanarActionVarying", Other),
    ("IfcStructuralCurveAction", Other),
    ("IfcStructuralSurfaceAction", Other),
    ("IfcStructuralReaction", Other),
    ("IfcStructuralPointReaction", Other),
    ("IfcStructuralCurveReaction", Other),
    ("IfcStructuralSurfaceReaction", Other),
    // Positioning
    ("IfcGrid", Other),
    ("IfcPositioningElement", Other),
    ("IfcLinearPositioningElement", Other),
    ("IfcLinearElement", Other),
    ("IfcAlignment", Other),
    ("IfcAlignmentCant", Other),
    ("IfcAlignmentHorizontal", Other),
    ("IfcAlignmentSegment", Other),
    ("IfcAlignmentVertical", Other),
    ("IfcReferent", Other),
    // Ports, annotations and proxies
    ("IfcPort", Other),
    ("IfcDistributionPort", Other),
    ("IfcAnnotation", Other),
    ("IfcProxy", Other),
];

/// Value types seen inside `IfcPropertySingleValue.NominalValue`.
const VALUE_TYPES: &[&str] = &[
    "IfcAreaMeasure",
    "IfcBoolean",
    "IfcCountMeasure",
    "IfcDate",
    "IfcDateTime",
    "IfcDescriptiveMeasure",
    "IfcDuration",
    "IfcDynamicViscosityMeasure",
    "IfcElectricCurrentMeasure",
    "IfcElectricResistanceMeasure",
    "IfcElectricVoltageMeasure",
    "IfcEnergyMeasure",
    "IfcForceMeasure",
    "IfcFrequencyMeasure",
    "IfcHeatFluxDensityMeasure",
    "IfcIdentifier",
    "IfcIlluminanceMeasure",
    "IfcInteger",
    "IfcLabel",
    "IfcLengthMeasure",
    "IfcLinearForceMeasure",
    "IfcLogical",
    "IfcLuminousFluxMeasure",
    "IfcMassDensityMeasure",
    "IfcMassMeasure",
    "IfcMomentOfInertiaMeasure",
    "IfcMonetaryMeasure",
    "IfcNormalisedRatioMeasure",
    "IfcPlaneAngleMeasure",
    "IfcPositiveLengthMeasure",
    "IfcPositivePlaneAngleMeasure",
    "IfcPositiveRatioMeasure",
    "IfcPowerMeasure",
    "IfcPressureMeasure",
    "IfcRatioMeasure",
    "IfcReal",
    "IfcSoundPowerMeasure",
    "IfcSoundPressureMeasure",
    "IfcSpecificHeatCapacityMeasure",
    "IfcText",
    "IfcThermalConductivityMeasure",
    "IfcThermalResistanceMeasure",
    "IfcThermalTransmittanceMeasure",
    "IfcThermodynamicTemperatureMeasure",
    "IfcTime",
    "IfcTimeMeasure",
    "IfcTorqueMeasure",
    "IfcVolumeMeasure",
    "IfcVolumetricFlowRateMeasure",
];

/// Types that become tracked assets.
const ASSET_TYPES: &[&str] = &[
    "IfcBeam",
    "IfcColumn",
    "IfcSlab",
    "IfcWall",
    "IfcDoor",
    "IfcWindow",
    "IfcBuildingElementProxy",
    "IfcBuildingElement",
    "IfcElement",
    "IfcFlowTerminal",
    "IfcFlowController",
    "IfcFlowMovingDevice",
    "IfcDistributionElement",
    "IfcDistributionFlowElement",
];

/// Look up a product type by its STEP spelling, in any case.
///
/// Returns the schema spelling and layout, or `None` for non-products.
pub fn product_type(step_name: &str) -> Option<(&'static str, ProductKind)> {
    PRODUCT_TYPES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(step_name))
        .copied()
}

/// Schema spelling of a property value type (`IFCLABEL` -> `IfcLabel`).
///
/// Unlisted types keep the `Ifc` prefix and title-case the rest.
pub fn value_type_name(step_name: &str) -> String {
    if let Some(name) = VALUE_TYPES
        .iter()
        .find(|name| name.eq_ignore_ascii_case(step_name))
    {
        return (*name).to_string();
    }
    let lower = step_name.to_ascii_lowercase();
    match lower.strip_prefix("ifc") {
        Some(rest) => {
            let mut chars = rest.chars();
            match chars.next() {
                Some(first) => format!("Ifc{}{}", first.to_ascii_uppercase(), chars.as_str()),
                None => "Ifc".to_string(),
            }
        }
        None => step_name.to_string(),
    }
}

/// Whether an element of `type_name` is tracked as an asset.
///
/// Exact match on the allow-list, except that `IfcWallStandardCase`
/// counts as `IfcWall`.
pub fn should_create_asset(type_name: &str) -> bool {
    let type_name = if type_name == "IfcWallStandardCase" {
        "IfcWall"
    } else {
        type_name
    };
    ASSET_TYPES.contains(&type_name)
}
